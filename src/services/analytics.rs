//! # 사용자 분석 집계 서비스
//!
//! 완료된 면접 세션 집합에서 요약 통계를 계산하는 순수 함수입니다.
//! 아무것도 저장하지 않으며(materialized view 없음), 읽기 시점마다
//! 완료 집합으로부터 결정론적으로 다시 계산합니다.
//!
//! 집계 규칙:
//! - `progression`: 완료 시각 오름차순 기준 마지막 20개 (chronological tail)
//! - `byDomain`: 도메인 문자열 **그대로**를 그룹 키로 사용합니다.
//!   정규화하지 않으므로 "frontend"와 "Frontend"는 다른 그룹입니다 (의도된 동작).
//! - `skillAverages`: 나누는 수는 항상 완료된 세션 전체 수입니다.
//!   스킬 데이터가 비어 있는 세션도 모든 스킬에 0으로 기여합니다.

use std::collections::HashMap;

use crate::models::analytics::{AnalyticsResponse, DomainStat, ProgressionPoint, SkillAverages};
use crate::models::interview::InterviewRow;

/// 진행 추이에 포함할 최근 세션 수
const PROGRESSION_WINDOW: usize = 20;

/// 완료된 세션 집합(완료 시각 오름차순)에서 분석 응답을 계산합니다.
///
/// 완료된 세션이 없으면 0/빈 리스트로 채워진 응답을 반환합니다.
/// 이것은 정의된 종료 상태이지 에러가 아닙니다.
pub fn compute_analytics(completed: &[InterviewRow]) -> AnalyticsResponse {
    if completed.is_empty() {
        return AnalyticsResponse::empty();
    }

    let total = completed.len() as i64;

    let percentage_sum: f64 = completed.iter().map(|i| i.percentage).sum();
    let average_score = (percentage_sum / total as f64).round() as i64;
    let best_score = completed
        .iter()
        .map(|i| i.percentage)
        .fold(0.0_f64, f64::max);

    // 마지막 20개: 입력이 완료 시각 오름차순이므로 꼬리가 곧 최근입니다
    let progression: Vec<ProgressionPoint> = completed
        .iter()
        .skip(completed.len().saturating_sub(PROGRESSION_WINDOW))
        .map(|i| ProgressionPoint {
            date: i.completed_at.clone().unwrap_or_default(),
            score: i.percentage,
            domain: i.domain.clone(),
            grade: i.grade.clone(),
        })
        .collect();

    // 도메인별 합계/건수. 그룹 순서는 첫 등장 순서를 유지합니다.
    let mut domain_order: Vec<String> = Vec::new();
    let mut domain_acc: HashMap<String, (f64, i64)> = HashMap::new();
    for interview in completed {
        let entry = domain_acc
            .entry(interview.domain.clone())
            .or_insert_with(|| {
                domain_order.push(interview.domain.clone());
                (0.0, 0)
            });
        entry.0 += interview.percentage;
        entry.1 += 1;
    }
    let by_domain: Vec<DomainStat> = domain_order
        .into_iter()
        .map(|domain| {
            let (sum, count) = domain_acc[&domain];
            DomainStat {
                domain,
                avg_score: (sum / count as f64).round() as i64,
                count,
            }
        })
        .collect();

    // 스킬 평균: 분모는 항상 전체 완료 세션 수 (스킬 데이터 유무와 무관)
    let (mut technical, mut communication, mut problem_solving, mut confidence) =
        (0.0_f64, 0.0_f64, 0.0_f64, 0.0_f64);
    for interview in completed {
        technical += interview.skill_technical;
        communication += interview.skill_communication;
        problem_solving += interview.skill_problem_solving;
        confidence += interview.skill_confidence;
    }
    let divisor = total as f64;
    let skill_averages = SkillAverages {
        technical: (technical / divisor).round() as i64,
        communication: (communication / divisor).round() as i64,
        problem_solving: (problem_solving / divisor).round() as i64,
        confidence: (confidence / divisor).round() as i64,
    };

    AnalyticsResponse {
        total_interviews: total,
        average_score,
        best_score,
        progression,
        by_domain,
        skill_averages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completed_interview(id: &str, domain: &str, percentage: f64) -> InterviewRow {
        InterviewRow {
            id: id.to_string(),
            user_id: "u1".to_string(),
            session_id: format!("ext-{id}"),
            domain: domain.to_string(),
            level: "all".to_string(),
            total_questions: 5,
            completed: true,
            average_score: percentage / 10.0,
            percentage,
            skill_technical: 0.0,
            skill_communication: 0.0,
            skill_problem_solving: 0.0,
            skill_confidence: 0.0,
            strengths: "[]".to_string(),
            weaknesses: "[]".to_string(),
            dominant_emotion: "neutral".to_string(),
            grade: "B".to_string(),
            started_at: "2025-01-01T00:00:00.000Z".to_string(),
            completed_at: Some(format!("2025-01-01T00:00:{:02}.000Z", id.len())),
        }
    }

    #[test]
    fn empty_set_is_a_defined_state_not_an_error() {
        let analytics = compute_analytics(&[]);
        assert_eq!(analytics.total_interviews, 0);
        assert_eq!(analytics.average_score, 0);
        assert_eq!(analytics.best_score, 0.0);
        assert!(analytics.progression.is_empty());
        assert!(analytics.by_domain.is_empty());
        assert_eq!(analytics.skill_averages, SkillAverages::default());
    }

    #[test]
    fn average_and_best_over_completed_set() {
        // 60, 80, 100 → 평균 80, 최고 100
        let interviews = vec![
            completed_interview("a", "frontend", 60.0),
            completed_interview("b", "frontend", 80.0),
            completed_interview("c", "backend", 100.0),
        ];

        let analytics = compute_analytics(&interviews);
        assert_eq!(analytics.total_interviews, 3);
        assert_eq!(analytics.average_score, 80);
        assert_eq!(analytics.best_score, 100.0);
    }

    #[test]
    fn domain_grouping_is_exact_match() {
        // "frontend"와 "Frontend"는 별도 그룹으로 나와야 합니다
        let interviews = vec![
            completed_interview("a", "frontend", 60.0),
            completed_interview("b", "Frontend", 90.0),
            completed_interview("c", "frontend", 80.0),
        ];

        let analytics = compute_analytics(&interviews);
        assert_eq!(
            analytics.by_domain,
            vec![
                DomainStat {
                    domain: "frontend".to_string(),
                    avg_score: 70,
                    count: 2,
                },
                DomainStat {
                    domain: "Frontend".to_string(),
                    avg_score: 90,
                    count: 1,
                },
            ]
        );
    }

    #[test]
    fn progression_is_the_chronological_tail_of_twenty() {
        let interviews: Vec<InterviewRow> = (0..25)
            .map(|n| {
                let mut i = completed_interview("x", "frontend", n as f64);
                i.completed_at = Some(format!("2025-01-01T00:{:02}:00.000Z", n));
                i
            })
            .collect();

        let analytics = compute_analytics(&interviews);
        assert_eq!(analytics.progression.len(), 20);
        // 처음 5개(score 0~4)는 잘려나가고, 5부터 시작해야 합니다
        assert_eq!(analytics.progression[0].score, 5.0);
        assert_eq!(analytics.progression[19].score, 24.0);
    }

    #[test]
    fn skill_divisor_is_the_full_completed_count() {
        // 한 세션만 스킬 데이터가 있어도 분모는 2 (스킬 없는 세션은 0으로 기여)
        let mut with_skills = completed_interview("a", "frontend", 80.0);
        with_skills.skill_technical = 80.0;
        with_skills.skill_communication = 60.0;
        with_skills.skill_problem_solving = 40.0;
        with_skills.skill_confidence = 20.0;
        let without_skills = completed_interview("b", "frontend", 70.0);

        let analytics = compute_analytics(&[with_skills, without_skills]);
        assert_eq!(
            analytics.skill_averages,
            SkillAverages {
                technical: 40,
                communication: 30,
                problem_solving: 20,
                confidence: 10,
            }
        );
    }
}
