//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수에서 서버 설정값을 읽어오는 모듈입니다.
//! `.env` 파일이나 시스템 환경변수에서 값을 가져옵니다.
//!
//! 설정 항목:
//! - `DATABASE_URL`: SQLite 데이터베이스 경로
//! - `JWT_SECRET`: JWT 토큰 서명에 사용할 비밀키
//! - `AI_SERVICE_URL`: 외부 AI 평가 서비스 주소
//! - `ENFORCE_INTERVIEW_OWNERSHIP`: save-result 시 소유권 검사 여부
//! - `ADMIN_EMAIL` / `ADMIN_PASSWORD`: 시작 시 관리자 계정 시드(둘 다 있을 때만)
//! - `FRONTEND_DIST`: 빌드된 프론트엔드 정적 파일 경로
//! - `HOST`: 서버 바인딩 주소
//! - `PORT`: 서버 포트 번호

// std::env: Rust 표준 라이브러리의 환경변수 모듈
use std::env;

// #[derive(...)]: 자동으로 트레이트 구현을 생성하는 **derive 매크로**
// - Debug: {:?} 포맷으로 출력 가능 (디버깅용 문자열 표현)
// - Clone: .clone() 메서드로 값을 복제 가능
//
// Rust에서 트레이트(trait)는 "이 타입이 할 수 있는 행동"을 정의합니다.
// derive를 사용하면 컴파일러가 보일러플레이트 코드를 자동으로 생성합니다.
#[derive(Debug, Clone)]
/// 애플리케이션 전체 설정을 담는 구조체
///
/// 서버 시작 시 환경변수에서 한 번 읽어온 후,
/// 애플리케이션 전체에서 공유됩니다.
pub struct Config {
    /// SQLite 데이터베이스 파일 경로 (예: "sqlite:data/intervue.db")
    pub database_url: String,
    /// JWT 토큰 서명/검증에 사용하는 비밀키
    pub jwt_secret: String,
    /// 외부 AI 평가 서비스의 베이스 URL (질문 생성/세션 시작을 위임)
    pub ai_service_url: String,
    /// save-result 호출 시 면접 레코드 소유권을 검사할지 여부
    ///
    /// 원본 시스템은 레코드 id를 아는 누구나 답변을 추가할 수 있었습니다
    /// (id를 일종의 capability로 취급). 이를 명시적인 정책 토글로 만들어
    /// 기본값은 원본과 같은 false, 필요 시 true로 켤 수 있게 합니다.
    pub enforce_interview_ownership: bool,
    /// 시작 시 보장할 관리자 계정 이메일 (선택)
    ///
    /// `ADMIN_EMAIL`과 `ADMIN_PASSWORD`가 모두 설정된 경우에만 서버 시작 시
    /// 관리자 계정을 생성(또는 기존 계정을 승격)합니다. 관리자 엔드포인트는
    /// 이 부트스트랩 없이는 접근할 수 있는 계정이 존재하지 않습니다.
    pub admin_email: Option<String>,
    /// 시드할 관리자 계정 비밀번호 (선택, `admin_email`과 함께 사용)
    pub admin_password: Option<String>,
    /// 빌드된 프론트엔드 정적 파일 디렉토리 경로
    pub frontend_dist: String,
    /// 서버가 바인딩할 호스트 주소 (기본값: "0.0.0.0")
    pub host: String,
    /// 서버 포트 번호 (기본값: 5000)
    /// u16: 0~65535 범위의 부호 없는 16비트 정수. 포트 번호에 딱 맞는 타입입니다.
    pub port: u16,
}

// impl: 구조체에 메서드를 추가하는 블록
// 다른 언어의 class 내부 메서드와 비슷합니다.
impl Config {
    /// 환경변수에서 설정값을 읽어 Config 인스턴스를 생성합니다.
    ///
    /// # 반환값
    /// - `Ok(Config)`: 필수 환경변수가 모두 있으면 설정 객체 반환
    /// - `Err(VarError)`: 필수 환경변수(DATABASE_URL, JWT_SECRET)가 없으면 에러
    ///
    /// # 에러
    /// `DATABASE_URL`과 `JWT_SECRET`은 필수이며, 없으면 에러가 발생합니다.
    /// 나머지 설정은 기본값이 있어 환경변수가 없어도 동작합니다.
    pub fn from_env() -> Result<Self, env::VarError> {
        // Ok(Self { ... }): 성공 시 Config 인스턴스를 Result::Ok로 감싸 반환
        // Self는 impl 블록의 대상 타입(Config)을 가리킵니다.
        Ok(Self {
            // env::var("KEY"): 환경변수를 읽습니다.
            // 반환 타입은 Result<String, VarError>이며,
            // `?`를 사용해 변수가 없으면 즉시 에러를 반환합니다.
            database_url: env::var("DATABASE_URL")?,  // 필수: 없으면 에러
            jwt_secret: env::var("JWT_SECRET")?,       // 필수: 없으면 에러

            // unwrap_or_else(|_| ...): Result가 Err일 때 실행할 클로저(익명 함수)를 지정합니다.
            // |_|: 클로저의 매개변수. `_`는 "이 값은 사용하지 않겠다"는 의미입니다.
            // .to_string(): &str(문자열 슬라이스)를 String(소유된 문자열)으로 변환
            ai_service_url: env::var("AI_SERVICE_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:8000".to_string()), // 선택: 기본값 제공
            enforce_interview_ownership: env::var("ENFORCE_INTERVIEW_OWNERSHIP")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false), // 기본값: 원본 시스템과 동일하게 검사하지 않음

            // .ok(): Result<String, VarError> → Option<String> 변환.
            // 환경변수가 없으면 None이 되어 부트스트랩을 건너뜁니다.
            admin_email: env::var("ADMIN_EMAIL").ok(),
            admin_password: env::var("ADMIN_PASSWORD").ok(),
            frontend_dist: env::var("FRONTEND_DIST")
                .unwrap_or_else(|_| "../frontend/dist".to_string()),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),

            // 포트 번호는 문자열 → 숫자 변환이 필요합니다.
            // .parse(): 문자열을 다른 타입으로 파싱. 여기서는 u16으로 변환합니다.
            // .unwrap_or(5000): 파싱 실패 시 기본값 5000 사용
            port: env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()        // "5000" → 5000u16
                .unwrap_or(5000), // 파싱 실패 시 기본값
        })
    }
}
