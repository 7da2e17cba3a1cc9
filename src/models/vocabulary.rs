//! # 사용자 학습 상태(UserWord) 모델
//!
//! (사용자, 단어) 쌍마다 최대 하나의 UserWord가 존재합니다.
//! 학습 목록에 단어를 추가할 때 생성되고, 이후에는 복습 스케줄러만 값을 바꿉니다.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 숙련도 상태. DB에는 소문자 문자열로 저장됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum WordStatus {
    Learning,
    Reviewing,
    Mastered,
}

impl WordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WordStatus::Learning => "learning",
            WordStatus::Reviewing => "reviewing",
            WordStatus::Mastered => "mastered",
        }
    }
}

impl fmt::Display for WordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WordStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "learning" => Ok(WordStatus::Learning),
            "reviewing" => Ok(WordStatus::Reviewing),
            "mastered" => Ok(WordStatus::Mastered),
            other => Err(format!("unknown status '{}'", other)),
        }
    }
}

/// 사용자 학습 상태 — `user_words` 행 + 표제어(JOIN)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserWord {
    pub id: String,
    pub user_id: String,
    pub word_id: String,
    /// `words.word` (JOIN으로 채워짐)
    pub word: String,
    pub status: WordStatus,
    /// 난이도 계수 (>= 1.3, 기본 2.5)
    pub ease_factor: f64,
    /// 복습 간격 일수 (>= 1, 기본 1)
    pub interval_days: i64,
    pub next_review_date: String,
    pub added_at: String,
}

/// `GET /api/words?status=learning` 쿼리 파라미터
#[derive(Debug, Deserialize)]
pub struct ListWordsQuery {
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_only_known_values() {
        assert_eq!("mastered".parse::<WordStatus>(), Ok(WordStatus::Mastered));
        assert!("Mastered".parse::<WordStatus>().is_err());
        assert_eq!(WordStatus::Reviewing.to_string(), "reviewing");
    }
}
