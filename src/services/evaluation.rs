//! # 외부 AI 평가 서비스 클라이언트
//!
//! 질문 생성과 답변 채점을 담당하는 외부 평가 서비스(FastAPI)를 호출하는
//! HTTP 클라이언트입니다. 이 저장소는 채점 알고리즘을 구현하지 않으며,
//! 외부 서비스를 협력자(collaborator)로만 사용합니다.
//!
//! 정책: 타임아웃/재시도를 자체적으로 두지 않습니다. 다운스트림 장애는
//! 그대로 `ServiceUnavailable`로 전파되어 요청 전체가 실패합니다.
//! (면접 시작이 실패하면 부분 레코드를 만들지 않습니다 — 호출자 책임)

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// `POST {base}/interview/start` 요청 본문
#[derive(Debug, Serialize)]
struct StartSessionRequest<'a> {
    domain: &'a str,
    level: &'a str,
}

/// 외부 서비스가 세션을 생성하며 돌려주는 응답
///
/// `session_id`는 외부 서비스와 공유하는 상관관계 키로, 내부 면접 레코드
/// id와는 별개입니다. `questions`는 클라이언트로 그대로 전달만 하고
/// 이 서버에는 저장하지 않으므로 형태를 강제하지 않습니다.
#[derive(Debug, Clone, Deserialize)]
pub struct EvaluationSession {
    pub session_id: String,
    pub domain: String,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub total_questions: i64,
    #[serde(default)]
    pub questions: Vec<serde_json::Value>,
}

/// 외부 평가 서비스 HTTP 클라이언트
///
/// `reqwest::Client`는 내부적으로 커넥션 풀을 공유하므로 clone이 저렴합니다.
#[derive(Debug, Clone)]
pub struct EvaluationClient {
    http: reqwest::Client,
    base_url: String,
}

impl EvaluationClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// 외부 서비스에 세션 생성을 요청하고 질문 세트를 받아옵니다.
    ///
    /// 연결 실패 또는 non-success 응답은 모두 `ServiceUnavailable`로
    /// 변환됩니다. 이 경우 호출측은 면접 레코드를 생성하지 않습니다.
    pub async fn start_session(
        &self,
        domain: &str,
        level: &str,
    ) -> Result<EvaluationSession, AppError> {
        let url = format!("{}/interview/start", self.base_url);

        let response = self
            .http
            .post(&url)
            .json(&StartSessionRequest { domain, level })
            .send()
            .await
            .map_err(|e| {
                AppError::ServiceUnavailable(format!("AI service unreachable: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(AppError::ServiceUnavailable(format!(
                "AI service returned status {}",
                response.status()
            )));
        }

        response
            .json::<EvaluationSession>()
            .await
            .map_err(|e| AppError::ServiceUnavailable(format!("AI service response invalid: {}", e)))
    }
}
