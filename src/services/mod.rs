//! # 서비스(비즈니스 로직) 모듈
//!
//! DB 쿼리도 HTTP 핸들러도 아닌 로직을 담는 계층입니다.
//! - `analytics`: 완료된 세션 집합에서 통계를 계산하는 순수 함수
//! - `bootstrap`: 시작 시 관리자 계정 시드
//! - `evaluation`: 외부 AI 평가 서비스 HTTP 클라이언트

pub mod analytics;
pub mod bootstrap;
pub mod evaluation;
