//! # 플랫폼 전역 통계 쿼리 모듈
//!
//! 관리자 대시보드가 사용하는 전체 사용자 대상 집계 쿼리들입니다.
//! 사용자별 분석(analytics)과 달리 여기의 집계는 SQL에서 직접 수행합니다.

use crate::error::AppError;
use crate::models::analytics::DomainStat;
use crate::models::interview::InterviewRow;
use sqlx::SqlitePool;

/// 완료된 면접 + 소유자의 이름/이메일을 함께 담는 조회 결과
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RecentCompletedRow {
    #[sqlx(flatten)]
    pub interview: InterviewRow,
    pub user_name: String,
    pub user_email: String,
}

/// 전체 사용자의 완료된 면접 수
pub async fn count_completed_all(pool: &SqlitePool) -> Result<i64, AppError> {
    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM interviews WHERE completed = 1")
            .fetch_one(pool)
            .await?;

    Ok(count)
}

/// 완료된 전체 면접의 percentage 평균. 완료된 면접이 없으면 0.
pub async fn average_percentage_all(pool: &SqlitePool) -> Result<f64, AppError> {
    let (avg,): (Option<f64>,) =
        sqlx::query_as("SELECT AVG(percentage) FROM interviews WHERE completed = 1")
            .fetch_one(pool)
            .await?;

    Ok(avg.unwrap_or(0.0))
}

/// 가장 최근에 완료된 면접 `limit`건. 소유자의 이름/이메일을 JOIN으로 함께 가져옵니다.
pub async fn recent_completed(
    pool: &SqlitePool,
    limit: i64,
) -> Result<Vec<RecentCompletedRow>, AppError> {
    let rows = sqlx::query_as::<_, RecentCompletedRow>(
        r#"
        SELECT i.id, i.user_id, i.session_id, i.domain, i.level, i.total_questions,
               i.completed, i.average_score, i.percentage, i.skill_technical,
               i.skill_communication, i.skill_problem_solving, i.skill_confidence,
               i.strengths, i.weaknesses, i.dominant_emotion, i.grade,
               i.started_at, i.completed_at,
               u.name AS user_name, u.email AS user_email
        FROM interviews i
        JOIN users u ON u.id = i.user_id
        WHERE i.completed = 1
        ORDER BY i.completed_at DESC
        LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// 완료된 전체 면접의 도메인별 평균/건수.
/// 그룹 키는 도메인 문자열 그대로입니다 (SQLite BINARY 콜레이션 → 대소문자 구분).
pub async fn domain_stats(pool: &SqlitePool) -> Result<Vec<DomainStat>, AppError> {
    let rows: Vec<(String, f64, i64)> = sqlx::query_as(
        r#"
        SELECT domain, AVG(percentage), COUNT(*)
        FROM interviews
        WHERE completed = 1
        GROUP BY domain
        ORDER BY domain
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(domain, avg, count)| DomainStat {
            domain,
            avg_score: avg.round() as i64,
            count,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{interviews as db_interviews, users as db_users};
    use crate::models::interview::FinalResultPayload;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        pool
    }

    async fn complete_interview(pool: &SqlitePool, id: &str, user: &str, domain: &str, pct: f64) {
        db_interviews::create_interview(pool, id, user, "ext", domain, "all", 5)
            .await
            .unwrap();
        let result = FinalResultPayload {
            percentage: pct,
            ..Default::default()
        };
        db_interviews::finalize_interview(pool, id, user, &result)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn domain_grouping_is_case_sensitive() {
        let pool = test_pool().await;
        db_users::create_user(&pool, "u1", "A", "a@example.com", "h")
            .await
            .unwrap();

        // "frontend"와 "Frontend"는 서로 다른 그룹이어야 합니다
        complete_interview(&pool, "i1", "u1", "frontend", 60.0).await;
        complete_interview(&pool, "i2", "u1", "Frontend", 90.0).await;

        let stats = domain_stats(&pool).await.unwrap();
        assert_eq!(stats.len(), 2);
        let domains: Vec<&str> = stats.iter().map(|s| s.domain.as_str()).collect();
        assert!(domains.contains(&"frontend"));
        assert!(domains.contains(&"Frontend"));
    }

    #[tokio::test]
    async fn platform_averages_ignore_active_sessions() {
        let pool = test_pool().await;
        db_users::create_user(&pool, "u1", "A", "a@example.com", "h")
            .await
            .unwrap();

        complete_interview(&pool, "i1", "u1", "backend", 70.0).await;
        // 미완료 세션은 집계에서 제외됩니다
        db_interviews::create_interview(&pool, "i2", "u1", "ext", "backend", "all", 5)
            .await
            .unwrap();

        assert_eq!(count_completed_all(&pool).await.unwrap(), 1);
        assert_eq!(average_percentage_all(&pool).await.unwrap(), 70.0);
    }

    #[tokio::test]
    async fn recent_completed_resolves_owner() {
        let pool = test_pool().await;
        db_users::create_user(&pool, "u1", "Jamie", "jamie@example.com", "h")
            .await
            .unwrap();
        complete_interview(&pool, "i1", "u1", "frontend", 85.0).await;

        let recent = recent_completed(&pool, 10).await.unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].user_name, "Jamie");
        assert_eq!(recent[0].user_email, "jamie@example.com");
    }
}
