use serde::Serialize;

use crate::models::interview::Interview;
use crate::models::user::UserResponse;

/// 진행 추이의 한 점: 완료된 세션 하나를 날짜/점수/도메인/등급으로 축약
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressionPoint {
    pub date: String,
    pub score: f64,
    pub domain: String,
    pub grade: String,
}

/// 도메인별 통계. 그룹 키는 저장된 도메인 문자열 그대로이며
/// 대소문자를 구분합니다 ("frontend"와 "Frontend"는 서로 다른 그룹).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainStat {
    pub domain: String,
    pub avg_score: i64,
    pub count: i64,
}

/// 스킬별 평균 (반올림된 정수). 나누는 수는 항상 완료된 세션 전체 수입니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SkillAverages {
    pub technical: i64,
    pub communication: i64,
    pub problem_solving: i64,
    pub confidence: i64,
}

/// `GET /interview/analytics` 응답
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResponse {
    pub total_interviews: i64,
    pub average_score: i64,
    pub best_score: f64,
    pub progression: Vec<ProgressionPoint>,
    pub by_domain: Vec<DomainStat>,
    pub skill_averages: SkillAverages,
}

impl AnalyticsResponse {
    /// 완료된 세션이 하나도 없을 때의 정의된 종료 상태 (에러가 아님)
    pub fn empty() -> Self {
        Self {
            total_interviews: 0,
            average_score: 0,
            best_score: 0.0,
            progression: Vec::new(),
            by_domain: Vec::new(),
            skill_averages: SkillAverages::default(),
        }
    }
}

/// 최근 완료된 면접 + 소유자의 공개 프로필 (관리자 대시보드용)
#[derive(Debug, Clone, Serialize)]
pub struct RecentInterview {
    #[serde(flatten)]
    pub interview: Interview,
    pub user: RecentInterviewUser,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecentInterviewUser {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// `GET /admin/dashboard` 응답
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    /// role = candidate 인 계정만 셉니다 (관리자 제외)
    pub total_users: i64,
    /// 전체 사용자의 완료된 면접 수
    pub total_interviews: i64,
    /// 완료된 전체 면접의 percentage 평균 (없으면 0)
    pub average_score: f64,
    pub recent_interviews: Vec<RecentInterview>,
    pub domain_stats: Vec<DomainStat>,
}

/// `GET /admin/users` 응답
#[derive(Debug, Clone, Serialize)]
pub struct AdminUsersResponse {
    pub users: Vec<UserResponse>,
}
