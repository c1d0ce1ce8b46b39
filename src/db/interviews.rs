//! # 면접 세션 데이터베이스 쿼리 모듈
//!
//! 면접 세션 레코드의 생성, 답변 추가, 완료 처리, 조회를 담당하는
//! SQL 쿼리 함수들입니다.
//!
//! ## 세션 라이프사이클
//! ```text
//! [시작] create_interview() → 진행 중(completed = 0, 답변이 도착 순서대로 누적)
//!      → finalize_interview() → [완료] (completed = 1, 이후 불변)
//! ```
//!
//! 핵심 불변식:
//! - `total_questions`는 생성 시 고정되며 답변 추가로 변하지 않습니다.
//! - 답변은 도착 순서(seq)가 곧 정답 순서입니다. 중복 제거를 하지 않으므로
//!   같은 답변을 두 번 보내면 두 행이 저장됩니다.
//! - 완료는 단방향입니다. 두 번째 finalize 호출은 아무것도 바꾸지 않습니다.
//! - finalize와 사용자 통계 재계산은 하나의 트랜잭션에서 수행됩니다.
//!   (원본 시스템은 read-then-write 두 번의 왕복이어서 동시 완료 시
//!   lost update가 가능했습니다. 여기서는 트랜잭션으로 묶어 제거합니다.)

use crate::error::AppError;
use crate::models::interview::{AnswerPayload, AnswerRow, FinalResultPayload, InterviewRow};
use sqlx::SqlitePool;

const INTERVIEW_COLUMNS: &str = "id, user_id, session_id, domain, level, total_questions, \
    completed, average_score, percentage, skill_technical, skill_communication, \
    skill_problem_solving, skill_confidence, strengths, weaknesses, dominant_emotion, \
    grade, started_at, completed_at";

const ANSWER_COLUMNS: &str = "interview_id, seq, question, category, difficulty, weight, \
    transcript, overall_marks, overall_percentage, relevance, completeness, clarity, \
    technical_accuracy, visual_confidence, vocal_confidence, text_confidence, \
    skill_technical, skill_communication, skill_problem_solving, skill_confidence, \
    emotion, sentiment, feedback, voice_wpm, voice_pace, voice_duration, \
    keywords_matched, keywords_missed";

/// 새 면접 세션 레코드를 생성합니다.
///
/// `total_questions`는 외부 평가 서비스의 응답에서 그대로 가져온 값이며
/// 이후 변경되지 않습니다. `started_at`은 DB의 DEFAULT 값으로 기록됩니다.
pub async fn create_interview(
    pool: &SqlitePool,
    id: &str,
    user_id: &str,
    session_id: &str,
    domain: &str,
    level: &str,
    total_questions: i64,
) -> Result<InterviewRow, AppError> {
    sqlx::query(
        r#"
        INSERT INTO interviews (id, user_id, session_id, domain, level, total_questions)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(session_id)
    .bind(domain)
    .bind(level)
    .bind(total_questions)
    .execute(pool)
    .await?;

    // 생성 직후 조회하여 DB가 채운 기본값(started_at 등)이 포함된 완전한 객체를 반환
    get_interview(pool, id)
        .await?
        .ok_or(AppError::Internal(
            "Failed to retrieve created interview".to_string(),
        ))
}

/// 내부 레코드 id로 면접 세션 하나를 조회합니다.
pub async fn get_interview(pool: &SqlitePool, id: &str) -> Result<Option<InterviewRow>, AppError> {
    let interview = sqlx::query_as::<_, InterviewRow>(&format!(
        "SELECT {INTERVIEW_COLUMNS} FROM interviews WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(interview)
}

/// 특정 사용자 소유의 면접 세션 하나를 조회합니다 (result/:id 용).
pub async fn get_interview_for_user(
    pool: &SqlitePool,
    id: &str,
    user_id: &str,
) -> Result<Option<InterviewRow>, AppError> {
    let interview = sqlx::query_as::<_, InterviewRow>(&format!(
        "SELECT {INTERVIEW_COLUMNS} FROM interviews WHERE id = ? AND user_id = ?"
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(interview)
}

/// 채점된 답변 하나를 세션에 추가합니다.
///
/// seq는 해당 세션의 현재 최대 seq + 1로 결정되므로 도착 순서가 보존됩니다.
/// 멱등하지 않습니다: 같은 논리적 답변으로 두 번 호출하면 두 행이 생깁니다.
/// 질문 인덱스에 의한 중복 제거나 순서 검증은 하지 않습니다.
pub async fn append_answer(
    pool: &SqlitePool,
    interview_id: &str,
    answer: &AnswerPayload,
) -> Result<(), AppError> {
    // 문자열 리스트는 JSON 텍스트로 직렬화하여 저장합니다.
    let keywords_matched = serde_json::to_string(&answer.keywords.matched)
        .map_err(|e| AppError::Internal(format!("Keyword serialization failed: {}", e)))?;
    let keywords_missed = serde_json::to_string(&answer.keywords.missed)
        .map_err(|e| AppError::Internal(format!("Keyword serialization failed: {}", e)))?;

    sqlx::query(&format!(
        r#"
        INSERT INTO answers ({ANSWER_COLUMNS})
        VALUES (
            ?,
            (SELECT COALESCE(MAX(seq) + 1, 0) FROM answers WHERE interview_id = ?),
            ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?
        )
        "#
    ))
    .bind(interview_id)
    .bind(interview_id)
    .bind(&answer.question)
    .bind(&answer.category)
    .bind(&answer.difficulty)
    .bind(answer.weight)
    .bind(&answer.transcript)
    .bind(answer.overall_marks)
    .bind(answer.overall_percentage)
    .bind(answer.breakdown.relevance)
    .bind(answer.breakdown.completeness)
    .bind(answer.breakdown.clarity)
    .bind(answer.breakdown.technical_accuracy)
    .bind(answer.breakdown.visual_confidence)
    .bind(answer.breakdown.vocal_confidence)
    .bind(answer.breakdown.text_confidence)
    .bind(answer.skill_scores.technical)
    .bind(answer.skill_scores.communication)
    .bind(answer.skill_scores.problem_solving)
    .bind(answer.skill_scores.confidence)
    .bind(&answer.emotion)
    .bind(&answer.sentiment)
    .bind(&answer.feedback)
    .bind(answer.voice_analysis.wpm)
    .bind(&answer.voice_analysis.pace)
    .bind(answer.voice_analysis.duration)
    .bind(keywords_matched)
    .bind(keywords_missed)
    .execute(pool)
    .await?;

    Ok(())
}

/// 세션의 모든 답변을 도착 순서(seq)대로 조회합니다.
pub async fn list_answers(
    pool: &SqlitePool,
    interview_id: &str,
) -> Result<Vec<AnswerRow>, AppError> {
    let answers = sqlx::query_as::<_, AnswerRow>(&format!(
        "SELECT {ANSWER_COLUMNS} FROM answers WHERE interview_id = ? ORDER BY seq"
    ))
    .bind(interview_id)
    .fetch_all(pool)
    .await?;

    Ok(answers)
}

/// 면접 세션을 완료 상태로 전환하고 소유자의 롤링 통계를 재계산합니다.
///
/// 최종 집계 필드는 외부 평가 서비스가 산출한 payload를 그대로 복사합니다
/// (answers로부터 재계산하지 않음). `WHERE completed = 0` 조건이 단방향
/// 전환을 보장합니다: 이미 완료된 세션이면 UPDATE가 0행에 적용되고,
/// 이어지는 통계 재계산도 건너뜁니다.
///
/// 세션 UPDATE와 사용자 통계 UPDATE는 같은 트랜잭션에서 커밋되므로
/// 같은 사용자의 두 세션이 동시에 완료되어도 통계가 유실되지 않습니다.
pub async fn finalize_interview(
    pool: &SqlitePool,
    interview_id: &str,
    user_id: &str,
    result: &FinalResultPayload,
) -> Result<(), AppError> {
    let strengths = serde_json::to_string(&result.strengths)
        .map_err(|e| AppError::Internal(format!("Strengths serialization failed: {}", e)))?;
    let weaknesses = serde_json::to_string(&result.weaknesses)
        .map_err(|e| AppError::Internal(format!("Weaknesses serialization failed: {}", e)))?;

    let mut tx = pool.begin().await?;

    let updated = sqlx::query(
        r#"
        UPDATE interviews
        SET completed = 1,
            completed_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now'),
            average_score = ?,
            percentage = ?,
            skill_technical = ?,
            skill_communication = ?,
            skill_problem_solving = ?,
            skill_confidence = ?,
            strengths = ?,
            weaknesses = ?,
            dominant_emotion = ?,
            grade = ?
        WHERE id = ? AND completed = 0
        "#,
    )
    .bind(result.average_score)
    .bind(result.percentage)
    .bind(result.skill_averages.technical)
    .bind(result.skill_averages.communication)
    .bind(result.skill_averages.problem_solving)
    .bind(result.skill_averages.confidence)
    .bind(strengths)
    .bind(weaknesses)
    .bind(&result.dominant_emotion)
    .bind(&result.grade)
    .bind(interview_id)
    .execute(&mut *tx)
    .await?;

    // 이미 완료된 세션: 아무것도 바꾸지 않고 종료 (재완료 없음)
    if updated.rows_affected() == 0 {
        tx.rollback().await?;
        return Ok(());
    }

    // 완료된 전체 세션을 기준으로 통계를 재계산합니다 (증분 아님).
    // 방금 완료한 세션도 같은 트랜잭션 안에서 보이므로 집합에 포함됩니다.
    let (count, avg): (i64, Option<f64>) = sqlx::query_as(
        r#"
        SELECT COUNT(*), AVG(percentage)
        FROM interviews
        WHERE user_id = ? AND completed = 1
        "#,
    )
    .bind(user_id)
    .fetch_one(&mut *tx)
    .await?;

    // 집합이 비어 읽히는 경우에는 이 세션 자신의 percentage로 대체합니다.
    let average_score = avg.unwrap_or(result.percentage).round() as i64;

    sqlx::query(
        r#"
        UPDATE users
        SET total_interviews = ?,
            average_score = ?,
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ?
        "#,
    )
    .bind(count)
    .bind(average_score)
    .bind(user_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(())
}

/// 사용자의 완료된 세션을 최근 완료 순으로 페이지 단위 조회합니다 (history 용).
pub async fn list_completed(
    pool: &SqlitePool,
    user_id: &str,
    limit: i64,
    offset: i64,
) -> Result<Vec<InterviewRow>, AppError> {
    let interviews = sqlx::query_as::<_, InterviewRow>(&format!(
        r#"
        SELECT {INTERVIEW_COLUMNS}
        FROM interviews
        WHERE user_id = ? AND completed = 1
        ORDER BY completed_at DESC
        LIMIT ? OFFSET ?
        "#
    ))
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(interviews)
}

pub async fn count_completed(pool: &SqlitePool, user_id: &str) -> Result<i64, AppError> {
    let (count,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM interviews WHERE user_id = ? AND completed = 1",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}

/// 사용자의 완료된 세션 전체를 완료 시각 오름차순으로 조회합니다 (analytics 용).
pub async fn list_completed_chronological(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Vec<InterviewRow>, AppError> {
    let interviews = sqlx::query_as::<_, InterviewRow>(&format!(
        r#"
        SELECT {INTERVIEW_COLUMNS}
        FROM interviews
        WHERE user_id = ? AND completed = 1
        ORDER BY completed_at ASC
        "#
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(interviews)
}
