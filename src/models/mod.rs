//! # 데이터 모델 모듈
//!
//! 애플리케이션에서 사용하는 데이터 구조체(struct)들을 정의합니다.
//! - `user`: 사용자(User)와 학습 통계
//! - `word`: 사전 항목(Word)과 그 하위 구조(Meaning, Definition, Phonetic)
//! - `vocabulary`: 사용자별 학습 상태(UserWord)
//! - `review`: 복습 이력(ReviewHistory)과 복습 요청
//!
//! 시각 값은 모두 `TIMESTAMP_FORMAT` 형식의 UTC 문자열로 저장/전달됩니다.
//! 고정 길이 형식이므로 문자열 비교 결과가 시간 순서와 같습니다.

pub mod review;
pub mod user;
pub mod vocabulary;
pub mod word;

pub use review::*;
pub use user::*;
pub use vocabulary::*;
pub use word::*;

use chrono::{DateTime, Utc};

/// DB와 API에서 공통으로 사용하는 시각 형식 (예: "2026-02-16T12:00:00.000Z")
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// UTC 시각을 저장용 문자열로 변환합니다.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamp_format_is_fixed_width() {
        let at = Utc.with_ymd_and_hms(2026, 2, 16, 12, 30, 5).unwrap();
        let text = format_timestamp(at);
        assert_eq!(text, "2026-02-16T12:30:05.000Z");
    }

    #[test]
    fn formatted_order_is_chronological() {
        let earlier = Utc.with_ymd_and_hms(2026, 2, 9, 23, 59, 59).unwrap();
        let later = Utc.with_ymd_and_hms(2026, 2, 10, 0, 0, 0).unwrap();
        assert!(format_timestamp(earlier) < format_timestamp(later));
    }
}
