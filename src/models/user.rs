//! # 사용자 모델 정의
//!
//! 사용자는 고유한 사용자 이름(username)만으로 식별됩니다 (비밀번호 없음).
//! 생성 이후에는 변경되지 않으며, 삭제 시 학습 상태와 이력이 함께 삭제됩니다.

use serde::{Deserialize, Serialize};

/// 사용자 엔티티 — DB의 `users` 테이블 한 행에 대응합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// 사용자 고유 식별자 (UUIDv7)
    pub id: String,
    /// 3~20자, 영문/숫자/밑줄만 허용
    pub username: String,
    pub created_at: String,
}

/// 회원 가입 요청 — `POST /api/users`
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
}

/// 로그인 요청 — `POST /api/auth/login`
/// 처음 보는 사용자 이름이면 사용자를 새로 만듭니다.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
}

/// 학습 통계 — `GET /api/user/stats`
#[derive(Debug, Clone, Serialize)]
pub struct UserStats {
    pub username: String,
    pub total_words: i64,
    /// 지금 복습해야 하는 단어 수 (next_review_date <= now)
    pub due_today: i64,
    pub learning: i64,
    pub reviewing: i64,
    pub mastered: i64,
    pub total_reviews: i64,
    /// 오늘 또는 어제까지 이어지는 연속 복습 일수
    pub current_streak: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_review_date: Option<String>,
}
