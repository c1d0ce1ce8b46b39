//! # 관리자(Admin) 라우트 핸들러
//!
//! 플랫폼 전역 통계와 사용자 목록을 제공하는 관리자 전용 핸들러입니다.
//!
//! ## 엔드포인트
//! - `GET /api/v1/admin/dashboard` → 전역 통계 대시보드
//! - `GET /api/v1/admin/users`     → 전체 사용자 목록 (최신 가입 순)
//!
//! 두 핸들러 모두 `AdminUser` extractor를 매개변수로 받습니다.
//! 인증되지 않았거나 관리자 역할이 아닌 호출자는 쿼리가 실행되기 전에
//! extractor 단계에서 401/403으로 거부됩니다.

use crate::{
    db,
    error::AppError,
    middleware::auth::AdminUser,
    models::analytics::{AdminUsersResponse, DashboardResponse, RecentInterview, RecentInterviewUser},
    models::interview::Interview,
    routes::interviews::AppState,
};
use axum::{extract::State, Json};

/// 대시보드에 포함할 최근 완료 면접 수
const RECENT_INTERVIEW_LIMIT: i64 = 10;

/// `GET /admin/dashboard` — 플랫폼 전역 통계를 조회합니다.
///
/// - totalUsers: role = candidate 인 계정 수 (관리자 계정 제외)
/// - totalInterviews: 전체 사용자의 완료된 면접 수
/// - averageScore: 완료된 전체 면접의 percentage 평균 (없으면 0)
/// - recentInterviews: 최근 완료 10건 (소유자의 이름/이메일 포함)
/// - domainStats: 도메인별 평균/건수
pub async fn dashboard(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<DashboardResponse>, AppError> {
    let total_users = db::users::count_candidates(&state.pool).await?;
    let total_interviews = db::stats::count_completed_all(&state.pool).await?;
    let average_score = db::stats::average_percentage_all(&state.pool).await?;
    let domain_stats = db::stats::domain_stats(&state.pool).await?;

    let recent_interviews = db::stats::recent_completed(&state.pool, RECENT_INTERVIEW_LIMIT)
        .await?
        .into_iter()
        .map(|row| {
            let user_id = row.interview.user_id.clone();
            RecentInterview {
                interview: Interview::from(row.interview),
                user: RecentInterviewUser {
                    id: user_id,
                    name: row.user_name,
                    email: row.user_email,
                },
            }
        })
        .collect();

    Ok(Json(DashboardResponse {
        total_users,
        total_interviews,
        average_score,
        recent_interviews,
        domain_stats,
    }))
}

/// `GET /admin/users` — 전체 사용자 목록을 최신 가입 순으로 조회합니다.
///
/// `UserResponse` 변환 과정에서 password_hash는 제거됩니다.
pub async fn list_users(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<AdminUsersResponse>, AppError> {
    let users = db::users::list_users(&state.pool).await?;

    Ok(Json(AdminUsersResponse {
        users: users.into_iter().map(Into::into).collect(),
    }))
}
