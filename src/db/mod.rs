//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 데이터베이스와 직접 상호작용하는 함수들을 모아둔 모듈입니다.
//! 서비스 계층(services/)과 라우트 핸들러(routes/)에서 이 모듈의 함수를 호출합니다.
//!
//! 각 하위 모듈:
//! - `users`: 사용자 생성/조회, 학습 통계 집계
//! - `words`: 사전 항목 저장 및 전체 재구성
//! - `vocabulary`: 사용자별 학습 단어(user_words)
//! - `reviews`: 복습 스케줄 갱신과 복습 이력

pub mod reviews;
pub mod users;
pub mod vocabulary;
pub mod words;
