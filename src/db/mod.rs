//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 데이터베이스와 직접 상호작용하는 함수들을 모아둔 모듈입니다.
//! 라우트 핸들러(routes/)에서 이 모듈의 함수를 호출하여 DB 작업을 수행합니다.
//!
//! 각 하위 모듈:
//! - `interviews`: 면접 세션 라이프사이클(생성/답변 추가/완료) 및 조회 쿼리
//! - `stats`: 관리자 대시보드용 플랫폼 전역 집계 쿼리
//! - `users`: 사용자 계정/인증 관련 쿼리

pub mod interviews;
pub mod stats;
pub mod users;
