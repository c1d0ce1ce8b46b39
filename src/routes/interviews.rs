//! # 면접(Interview) 라우트 핸들러
//!
//! 면접 세션 라이프사이클과 사용자 분석을 처리하는 HTTP 핸들러 함수들입니다.
//!
//! ## 엔드포인트
//! - `POST /api/v1/interview/start`       → 면접 시작 (외부 서비스에서 질문 수신)
//! - `POST /api/v1/interview/save-result` → 답변 추가 + (마지막 질문이면) 완료 처리
//! - `GET  /api/v1/interview/history`     → 완료된 면접 목록 (페이지네이션, 답변 제외)
//! - `GET  /api/v1/interview/result/{id}` → 단일 면접 결과 (답변 포함, 본인 소유만)
//! - `GET  /api/v1/interview/analytics`   → 사용자 분석 통계
//!
//! ## Axum 핸들러 패턴
//! Axum 핸들러는 **Extractor(추출기)**를 매개변수로 받습니다.
//! Extractor는 HTTP 요청에서 데이터를 자동으로 추출합니다:
//! - `State(state)`: 앱 전역 상태 (DB 풀, 설정 등)
//! - `auth_user: AuthUser`: Authorization 헤더의 JWT를 검증해 사용자 식별
//! - `Path(id)`: URL 경로 파라미터
//! - `Json(body)`: 요청 본문을 JSON으로 파싱하여 구조체로 변환
//!
//! 반환 타입이 `Result<T, AppError>`이면, Axum이 자동으로:
//! - `Ok(T)` → T를 HTTP 응답으로 변환 (IntoResponse 트레이트 사용)
//! - `Err(AppError)` → AppError를 에러 JSON 응답으로 변환

use crate::{
    db,
    error::AppError,
    middleware::auth::AuthUser,
    models::*,
    services,
    services::evaluation::EvaluationClient,
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};
use sqlx::SqlitePool;

/// 애플리케이션 공유 상태
///
/// 모든 요청 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// Axum의 의존성 주입(Dependency Injection) 메커니즘입니다.
#[derive(Clone)]
pub struct AppState {
    /// SQLite 연결 풀 (내부적으로 Arc로 공유)
    pub pool: SqlitePool,
    /// JWT 토큰 서명용 비밀키
    pub jwt_secret: String,
    /// 외부 AI 평가 서비스 클라이언트
    pub evaluation: EvaluationClient,
    /// save-result 시 면접 레코드 소유권을 검사할지 여부 (정책 토글)
    pub enforce_interview_ownership: bool,
}

/// `POST /interview/start` — 새 면접 세션을 시작합니다.
///
/// 순서가 중요합니다:
/// 1. 도메인 검증 — 외부 서비스를 호출하기 **전에** 빈 도메인을 거부합니다.
/// 2. 외부 평가 서비스에 세션 생성을 요청합니다. 실패하면 여기서 전체가
///    실패하며 부분 레코드를 남기지 않습니다 (503).
/// 3. 성공 시에만 면접 레코드를 생성합니다. `total_questions`는 외부
///    응답에서 그대로 가져오며, 질문 목록은 저장하지 않고 통과만 시킵니다.
pub async fn start_interview(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(req): Json<StartInterviewRequest>,
) -> Result<Json<StartInterviewResponse>, AppError> {
    if req.domain.trim().is_empty() {
        return Err(AppError::BadRequest("Domain is required".to_string()));
    }

    // level 미지정 시 "all" (원본 시스템의 기본값)
    let level = req.level.unwrap_or_else(|| "all".to_string());

    // 외부 서비스 호출. 여기서 Err이면 레코드는 생성되지 않습니다.
    let session = state.evaluation.start_session(&req.domain, &level).await?;
    let level = session.level.unwrap_or(level);

    let interview_id = uuid::Uuid::now_v7().to_string();
    let interview = db::interviews::create_interview(
        &state.pool,
        &interview_id,
        &auth_user.user_id,
        &session.session_id,
        &session.domain,
        &level,
        session.total_questions,
    )
    .await?;

    tracing::info!(
        "Started interview {} (external session {}) for user {}",
        interview.id,
        interview.session_id,
        auth_user.user_id
    );

    Ok(Json(StartInterviewResponse {
        interview_id: interview.id,
        session_id: interview.session_id,
        domain: interview.domain,
        level: interview.level,
        total_questions: interview.total_questions,
        questions: session.questions,
    }))
}

/// `POST /interview/save-result` — 채점된 답변을 추가하고,
/// 마지막 질문이면 같은 요청에서 세션을 완료 처리합니다.
///
/// scoreData가 있으면 도착 순서대로 추가합니다 (멱등하지 않음 — 같은
/// 답변을 두 번 보내면 두 번 저장됩니다). isFinished && finalResult이면
/// 이어서 완료 전환과 소유자 통계 재계산이 한 트랜잭션에서 수행됩니다.
/// 완료는 단방향이므로 이미 완료된 세션에는 아무 효과가 없습니다.
///
/// 소유권 검사는 정책 토글입니다. 기본값(off)에서는 원본 시스템처럼
/// 레코드 id를 아는 호출자라면 누구든 답변을 추가할 수 있습니다.
pub async fn save_result(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(req): Json<SaveResultRequest>,
) -> Result<Json<Value>, AppError> {
    let interview = db::interviews::get_interview(&state.pool, &req.interview_id)
        .await?
        .ok_or(AppError::NotFound)?;

    if state.enforce_interview_ownership && interview.user_id != auth_user.user_id {
        // 소유권 검사가 켜진 경우 타인의 레코드는 존재 자체를 숨깁니다
        return Err(AppError::NotFound);
    }

    if let Some(score_data) = &req.score_data {
        db::interviews::append_answer(&state.pool, &interview.id, score_data).await?;
    }

    if req.is_finished {
        if let Some(final_result) = &req.final_result {
            // 통계는 호출자가 아니라 레코드 **소유자**에 대해 재계산합니다
            db::interviews::finalize_interview(
                &state.pool,
                &interview.id,
                &interview.user_id,
                final_result,
            )
            .await?;
        }
    }

    Ok(Json(json!({ "success": true })))
}

/// `GET /interview/history?page&limit` — 완료된 면접 목록을 조회합니다.
///
/// 최근 완료 순으로 정렬되며 답변은 포함하지 않습니다 (목록 경량화).
/// 기본값: page=1, limit=10.
pub async fn history(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, AppError> {
    // 호출자 입력을 안전한 범위로 고정해야 offset 곱셈이 오버플로하지 않습니다
    let page = query.page.unwrap_or(1).clamp(1, 1_000_000);
    let limit = query.limit.unwrap_or(10).clamp(1, 100);
    let offset = (page - 1) * limit;

    let interviews = db::interviews::list_completed(&state.pool, &auth_user.user_id, limit, offset)
        .await?;
    let total = db::interviews::count_completed(&state.pool, &auth_user.user_id).await?;

    Ok(Json(HistoryResponse {
        interviews: interviews.into_iter().map(Interview::from).collect(),
        pagination: Pagination {
            page,
            limit,
            total,
            // 올림 나눗셈: pages = ceil(total / limit)
            pages: (total + limit - 1) / limit,
        },
    }))
}

/// `GET /interview/result/{id}` — 답변을 포함한 단일 면접 결과를 조회합니다.
///
/// 본인 소유의 레코드만 조회할 수 있습니다. 타인의 레코드는 404입니다.
pub async fn get_result(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let interview =
        db::interviews::get_interview_for_user(&state.pool, &id, &auth_user.user_id)
            .await?
            .ok_or(AppError::NotFound)?;

    let answers = db::interviews::list_answers(&state.pool, &interview.id).await?;

    let result = InterviewWithAnswers {
        interview: Interview::from(interview),
        answers: answers.into_iter().map(Answer::from).collect(),
    };

    Ok(Json(json!({ "interview": result })))
}

/// `GET /interview/analytics` — 사용자의 완료된 세션 집합에서
/// 요약 통계를 계산합니다. 저장하지 않고 읽기 시점에 계산합니다.
pub async fn analytics(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<AnalyticsResponse>, AppError> {
    let completed =
        db::interviews::list_completed_chronological(&state.pool, &auth_user.user_id).await?;

    Ok(Json(services::analytics::compute_analytics(&completed)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::users as db_users;
    use sqlx::sqlite::SqlitePoolOptions;

    // 외부 서비스 주소로 연결 불가능한 로컬 포트를 사용합니다.
    // start_interview가 실제로 네트워크를 시도하면 ServiceUnavailable이 됩니다.
    async fn test_state(enforce_ownership: bool) -> AppState {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();

        AppState {
            pool,
            jwt_secret: "test-secret".to_string(),
            evaluation: EvaluationClient::new("http://127.0.0.1:1"),
            enforce_interview_ownership: enforce_ownership,
        }
    }

    fn auth(user_id: &str) -> AuthUser {
        AuthUser {
            user_id: user_id.to_string(),
            role: "candidate".to_string(),
        }
    }

    async fn interview_count(pool: &SqlitePool) -> i64 {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM interviews")
            .fetch_one(pool)
            .await
            .unwrap();
        count
    }

    #[tokio::test]
    async fn empty_domain_fails_before_contacting_the_service() {
        let state = test_state(false).await;
        db_users::create_user(&state.pool, "u1", "A", "a@example.com", "h")
            .await
            .unwrap();

        let req = StartInterviewRequest {
            domain: "  ".to_string(),
            level: None,
        };
        let result = start_interview(State(state.clone()), auth("u1"), Json(req)).await;

        // 검증이 네트워크 호출보다 먼저이므로 BadRequest여야 합니다
        // (서비스에 닿았다면 ServiceUnavailable이 나왔을 것)
        assert!(matches!(result, Err(AppError::BadRequest(_))));
        assert_eq!(interview_count(&state.pool).await, 0);
    }

    #[tokio::test]
    async fn unreachable_service_creates_no_partial_record() {
        let state = test_state(false).await;
        db_users::create_user(&state.pool, "u1", "A", "a@example.com", "h")
            .await
            .unwrap();

        let req = StartInterviewRequest {
            domain: "frontend".to_string(),
            level: None,
        };
        let result = start_interview(State(state.clone()), auth("u1"), Json(req)).await;

        assert!(matches!(result, Err(AppError::ServiceUnavailable(_))));
        assert_eq!(interview_count(&state.pool).await, 0);
    }

    #[tokio::test]
    async fn save_result_on_unknown_interview_is_not_found() {
        let state = test_state(false).await;
        db_users::create_user(&state.pool, "u1", "A", "a@example.com", "h")
            .await
            .unwrap();

        let req = SaveResultRequest {
            interview_id: "missing".to_string(),
            score_data: Some(AnswerPayload::default()),
            is_finished: false,
            final_result: None,
        };
        let result = save_result(State(state), auth("u1"), Json(req)).await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn ownership_policy_gates_foreign_appends() {
        // 토글 off: 레코드 id를 아는 호출자는 누구든 추가 가능 (원본 동작)
        let open = test_state(false).await;
        db_users::create_user(&open.pool, "owner", "A", "a@example.com", "h")
            .await
            .unwrap();
        db::interviews::create_interview(&open.pool, "i1", "owner", "ext", "frontend", "all", 5)
            .await
            .unwrap();

        let req = SaveResultRequest {
            interview_id: "i1".to_string(),
            score_data: Some(AnswerPayload::default()),
            is_finished: false,
            final_result: None,
        };
        assert!(save_result(State(open), auth("stranger"), Json(req)).await.is_ok());

        // 토글 on: 타인의 레코드는 404로 숨겨집니다
        let enforced = test_state(true).await;
        db_users::create_user(&enforced.pool, "owner", "A", "a@example.com", "h")
            .await
            .unwrap();
        db::interviews::create_interview(&enforced.pool, "i1", "owner", "ext", "frontend", "all", 5)
            .await
            .unwrap();

        let req = SaveResultRequest {
            interview_id: "i1".to_string(),
            score_data: Some(AnswerPayload::default()),
            is_finished: false,
            final_result: None,
        };
        let result = save_result(State(enforced), auth("stranger"), Json(req)).await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn history_tolerates_extreme_pagination_input() {
        let state = test_state(false).await;
        db_users::create_user(&state.pool, "u1", "A", "a@example.com", "h")
            .await
            .unwrap();

        // 극단적인 page/limit 값은 오버플로 없이 빈 페이지로 처리됩니다
        let query = HistoryQuery {
            page: Some(i64::MAX),
            limit: Some(i64::MAX),
        };
        let result = history(State(state.clone()), auth("u1"), Query(query))
            .await
            .unwrap();
        assert!(result.0.interviews.is_empty());

        let query = HistoryQuery {
            page: Some(-5),
            limit: Some(0),
        };
        let result = history(State(state), auth("u1"), Query(query)).await.unwrap();
        assert_eq!(result.0.pagination.page, 1);
        assert_eq!(result.0.pagination.limit, 1);
    }

    #[tokio::test]
    async fn result_endpoint_hides_foreign_interviews() {
        let state = test_state(false).await;
        db_users::create_user(&state.pool, "owner", "A", "a@example.com", "h")
            .await
            .unwrap();
        db::interviews::create_interview(&state.pool, "i1", "owner", "ext", "frontend", "all", 5)
            .await
            .unwrap();

        let mine = get_result(
            State(state.clone()),
            auth("owner"),
            Path("i1".to_string()),
        )
        .await;
        assert!(mine.is_ok());

        let foreign = get_result(State(state), auth("stranger"), Path("i1".to_string())).await;
        assert!(matches!(foreign, Err(AppError::NotFound)));
    }
}
