//! # 면접 세션 데이터 모델
//!
//! 면접 세션 레코드와 답변의 타입 정의입니다.
//!
//! 원본 시스템은 느슨한 JSON 문서(필드가 없으면 읽는 곳마다 0으로 처리)를
//! 사용했지만, 여기서는 모든 필드가 항상 존재하는 명시적 타입으로 표현하고
//! 기본값(0, 빈 문자열)은 역직렬화 경계에서 `#[serde(default)]`로 한 번만
//! 적용합니다. 저장소에는 "없는 점수"가 존재하지 않습니다.
//!
//! ## 이중 식별자
//! - `id`: 내부 레코드 식별자 (UUIDv7). 모든 내부 변경은 이 키로 수행합니다.
//! - `session_id`: 외부 AI 평가 서비스와 공유하는 상관관계 키.
//!   외부 세션 데이터 조회는 이 키로만 이루어지며, 두 키를 절대 혼용하지 않습니다.

use serde::{Deserialize, Serialize};

/// 네 가지 고정 스킬 점수 (각 0~100)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkillScores {
    #[serde(default)]
    pub technical: f64,
    #[serde(default)]
    pub communication: f64,
    #[serde(default)]
    pub problem_solving: f64,
    #[serde(default)]
    pub confidence: f64,
}

/// 답변 하나의 세부 점수 분해 (각 0~100)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    #[serde(default)]
    pub relevance: f64,
    #[serde(default)]
    pub completeness: f64,
    #[serde(default)]
    pub clarity: f64,
    #[serde(default)]
    pub technical_accuracy: f64,
    #[serde(default)]
    pub visual_confidence: f64,
    #[serde(default)]
    pub vocal_confidence: f64,
    #[serde(default)]
    pub text_confidence: f64,
}

/// 음성 분석 메타데이터
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VoiceAnalysis {
    #[serde(default)]
    pub wpm: f64,
    #[serde(default)]
    pub pace: String,
    #[serde(default)]
    pub duration: f64,
}

/// 키워드 매칭 결과
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Keywords {
    #[serde(default)]
    pub matched: Vec<String>,
    #[serde(default)]
    pub missed: Vec<String>,
}

/// 저장된 답변의 점수 묶음 (분해 점수 + 두 집계 필드)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnswerScores {
    /// 0~10 스케일 종합 점수
    #[serde(default)]
    pub overall_marks: f64,
    /// 0~100 스케일 종합 점수
    #[serde(default)]
    pub overall_percentage: f64,
    #[serde(default)]
    pub relevance: f64,
    #[serde(default)]
    pub completeness: f64,
    #[serde(default)]
    pub clarity: f64,
    #[serde(default)]
    pub technical_accuracy: f64,
    #[serde(default)]
    pub visual_confidence: f64,
    #[serde(default)]
    pub vocal_confidence: f64,
    #[serde(default)]
    pub text_confidence: f64,
}

/// 면접 세션에 내장된 답변 (독립적인 수명 없음)
#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    pub question: String,
    pub category: String,
    pub difficulty: String,
    pub weight: f64,
    pub transcript: String,
    pub scores: AnswerScores,
    pub skill_scores: SkillScores,
    pub emotion: String,
    pub sentiment: String,
    pub feedback: String,
    pub voice_analysis: VoiceAnalysis,
    pub keywords: Keywords,
}

/// `answers` 테이블의 행 (평탄화된 컬럼 구조)
///
/// API에 내보낼 때는 `From<AnswerRow> for Answer`로 중첩 구조로 되돌립니다.
/// 키워드 리스트는 JSON 텍스트 컬럼이므로 이 변환에서 한 번만 파싱합니다.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AnswerRow {
    pub interview_id: String,
    pub seq: i64,
    pub question: String,
    pub category: String,
    pub difficulty: String,
    pub weight: f64,
    pub transcript: String,
    pub overall_marks: f64,
    pub overall_percentage: f64,
    pub relevance: f64,
    pub completeness: f64,
    pub clarity: f64,
    pub technical_accuracy: f64,
    pub visual_confidence: f64,
    pub vocal_confidence: f64,
    pub text_confidence: f64,
    pub skill_technical: f64,
    pub skill_communication: f64,
    pub skill_problem_solving: f64,
    pub skill_confidence: f64,
    pub emotion: String,
    pub sentiment: String,
    pub feedback: String,
    pub voice_wpm: f64,
    pub voice_pace: String,
    pub voice_duration: f64,
    pub keywords_matched: String,
    pub keywords_missed: String,
}

impl From<AnswerRow> for Answer {
    fn from(row: AnswerRow) -> Self {
        Self {
            question: row.question,
            category: row.category,
            difficulty: row.difficulty,
            weight: row.weight,
            transcript: row.transcript,
            scores: AnswerScores {
                overall_marks: row.overall_marks,
                overall_percentage: row.overall_percentage,
                relevance: row.relevance,
                completeness: row.completeness,
                clarity: row.clarity,
                technical_accuracy: row.technical_accuracy,
                visual_confidence: row.visual_confidence,
                vocal_confidence: row.vocal_confidence,
                text_confidence: row.text_confidence,
            },
            skill_scores: SkillScores {
                technical: row.skill_technical,
                communication: row.skill_communication,
                problem_solving: row.skill_problem_solving,
                confidence: row.skill_confidence,
            },
            emotion: row.emotion,
            sentiment: row.sentiment,
            feedback: row.feedback,
            voice_analysis: VoiceAnalysis {
                wpm: row.voice_wpm,
                pace: row.voice_pace,
                duration: row.voice_duration,
            },
            // 잘못된 JSON은 빈 리스트로 처리 (경계에서 한 번만 방어)
            keywords: Keywords {
                matched: serde_json::from_str(&row.keywords_matched).unwrap_or_default(),
                missed: serde_json::from_str(&row.keywords_missed).unwrap_or_default(),
            },
        }
    }
}

/// `interviews` 테이블의 행
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct InterviewRow {
    pub id: String,
    pub user_id: String,
    pub session_id: String,
    pub domain: String,
    pub level: String,
    pub total_questions: i64,
    pub completed: bool,
    pub average_score: f64,
    pub percentage: f64,
    pub skill_technical: f64,
    pub skill_communication: f64,
    pub skill_problem_solving: f64,
    pub skill_confidence: f64,
    pub strengths: String,
    pub weaknesses: String,
    pub dominant_emotion: String,
    pub grade: String,
    pub started_at: String,
    pub completed_at: Option<String>,
}

/// 면접 세션 레코드의 API 표현 (답변 제외)
#[derive(Debug, Clone, Serialize)]
pub struct Interview {
    pub id: String,
    pub user_id: String,
    pub session_id: String,
    pub domain: String,
    pub level: String,
    pub total_questions: i64,
    pub completed: bool,
    pub average_score: f64,
    pub percentage: f64,
    pub skill_averages: SkillScores,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub dominant_emotion: String,
    pub grade: String,
    pub started_at: String,
    pub completed_at: Option<String>,
}

impl From<InterviewRow> for Interview {
    fn from(row: InterviewRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            session_id: row.session_id,
            domain: row.domain,
            level: row.level,
            total_questions: row.total_questions,
            completed: row.completed,
            average_score: row.average_score,
            percentage: row.percentage,
            skill_averages: SkillScores {
                technical: row.skill_technical,
                communication: row.skill_communication,
                problem_solving: row.skill_problem_solving,
                confidence: row.skill_confidence,
            },
            strengths: serde_json::from_str(&row.strengths).unwrap_or_default(),
            weaknesses: serde_json::from_str(&row.weaknesses).unwrap_or_default(),
            dominant_emotion: row.dominant_emotion,
            grade: row.grade,
            started_at: row.started_at,
            completed_at: row.completed_at,
        }
    }
}

/// 답변을 포함한 단일 면접 결과 (`GET /interview/result/:id`)
#[derive(Debug, Clone, Serialize)]
pub struct InterviewWithAnswers {
    #[serde(flatten)]
    pub interview: Interview,
    pub answers: Vec<Answer>,
}

// ── 요청/응답 타입 ──

#[derive(Debug, Deserialize)]
pub struct StartInterviewRequest {
    /// 면접 도메인 (예: "frontend"). 비어 있으면 외부 서비스 호출 전에 거부됩니다.
    #[serde(default)]
    pub domain: String,
    pub level: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartInterviewResponse {
    pub interview_id: String,
    #[serde(rename = "session_id")]
    pub session_id: String,
    pub domain: String,
    pub level: String,
    #[serde(rename = "total_questions")]
    pub total_questions: i64,
    /// 질문 목록은 외부 서비스의 응답을 그대로 통과시킵니다 (저장하지 않음).
    pub questions: Vec<serde_json::Value>,
}

/// 클라이언트가 외부 평가 서비스에게서 받아 전달하는 답변 채점 결과
///
/// 모든 수치 필드는 누락 시 0으로 저장됩니다 (부재가 아니라 0).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnswerPayload {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub transcript: String,
    #[serde(default)]
    pub overall_marks: f64,
    #[serde(default)]
    pub overall_percentage: f64,
    #[serde(default)]
    pub breakdown: ScoreBreakdown,
    #[serde(default)]
    pub skill_scores: SkillScores,
    #[serde(default)]
    pub emotion: String,
    #[serde(default)]
    pub sentiment: String,
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub voice_analysis: VoiceAnalysis,
    #[serde(default)]
    pub keywords: Keywords,
}

/// 세션 완료 시 외부 평가 서비스가 산출한 최종 집계
///
/// 이 값들은 answers로부터 재계산하지 않고 그대로 복사합니다.
/// 집계의 출처(source of truth)는 외부 평가 서비스입니다.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FinalResultPayload {
    #[serde(default)]
    pub average_score: f64,
    #[serde(default)]
    pub percentage: f64,
    #[serde(default)]
    pub skill_averages: SkillScores,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub dominant_emotion: String,
    #[serde(default)]
    pub grade: String,
}

/// `POST /interview/save-result` 요청 본문
///
/// 마지막 질문 제출 시에는 scoreData와 finalResult가 같은 요청에 함께 오며,
/// 답변 추가 → 완료 처리 순서로 한 논리 연산에서 모두 적용됩니다.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResultRequest {
    pub interview_id: String,
    pub score_data: Option<AnswerPayload>,
    #[serde(default)]
    pub is_finished: bool,
    pub final_result: Option<FinalResultPayload>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub interviews: Vec<Interview>,
    pub pagination: Pagination,
}
