//! # 미들웨어 모듈
//!
//! - `auth`: 세션 쿠키로 사용자를 식별하는 추출기와 쿠키 생성 도우미

pub mod auth;
