//! # 간격 반복(SM-2) 스케줄러
//!
//! 복습 결과(품질 점수 0~5)를 새로운 난이도 계수, 복습 간격, 숙련도 상태로 바꾸는
//! 순수 함수들입니다. DB에 접근하지 않으므로 시각(`now`)도 인자로 받습니다.
//!
//! 품질 점수:
//! - 0: 전혀 기억나지 않음
//! - 1: 틀렸지만 답을 보고 기억남
//! - 2: 틀렸지만 답이 쉽게 떠오름
//! - 3: 어렵게 맞힘
//! - 4: 약간 망설이고 맞힘
//! - 5: 바로 맞힘
//!
//! ## 상태 전이
//! ```text
//! q < 3            → interval = 1, learning
//! q >= 3, I == 1   → interval = 6
//! q >= 3, I > 1    → interval = round(I × EF')
//! interval < 21    → reviewing,  interval >= 21 → mastered
//! ```

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::error::AppError;
use crate::models::WordStatus;

/// 난이도 계수의 하한. 이보다 낮아지면 간격이 계속 줄어들기만 합니다.
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// 새로 추가된 단어의 난이도 계수
pub const DEFAULT_EASE_FACTOR: f64 = 2.5;

/// 이 간격(일) 이상이면 `mastered`
pub const MASTERED_INTERVAL_DAYS: i64 = 21;

/// 첫 성공 이후의 고정 간격 (SM-2의 두 번째 단계)
const SECOND_STEP_INTERVAL_DAYS: i64 = 6;

/// 복습 한 번의 계산 결과
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    pub ease_factor: f64,
    pub interval_days: i64,
    pub status: WordStatus,
    pub next_review: DateTime<Utc>,
}

/// 품질 점수가 0~5 범위인지 검사합니다.
pub fn validate_quality(quality: i64) -> Result<u8, AppError> {
    match quality {
        0..=5 => Ok(quality as u8),
        other => Err(AppError::InvalidQuality(other)),
    }
}

/// EF' = EF + (0.1 − (5 − q) × (0.08 + (5 − q) × 0.02)), 하한 1.3
pub fn next_ease_factor(ease_factor: f64, quality: u8) -> f64 {
    let miss = f64::from(5 - quality.min(5));
    let updated = ease_factor + (0.1 - miss * (0.08 + miss * 0.02));
    updated.max(MIN_EASE_FACTOR)
}

/// 현재 상태와 품질 점수로 다음 복습 일정을 계산합니다.
///
/// `quality`는 `validate_quality`를 통과한 값이어야 합니다.
pub fn next_schedule(
    ease_factor: f64,
    interval_days: i64,
    quality: u8,
    now: DateTime<Utc>,
) -> Schedule {
    let ease_factor = next_ease_factor(ease_factor, quality);

    let (interval_days, status) = if quality < 3 {
        (1, WordStatus::Learning)
    } else {
        let interval = if interval_days == 1 {
            SECOND_STEP_INTERVAL_DAYS
        } else {
            (interval_days as f64 * ease_factor).round() as i64
        };
        let status = if interval < MASTERED_INTERVAL_DAYS {
            WordStatus::Reviewing
        } else {
            WordStatus::Mastered
        };
        (interval, status)
    };
    let interval_days = interval_days.max(1);

    Schedule {
        ease_factor,
        interval_days,
        status,
        next_review: now + Duration::days(interval_days),
    }
}

/// 연속 복습 일수를 계산합니다.
///
/// `review_days`는 복습이 있었던 UTC 날짜들입니다 (순서/중복 무관).
/// 가장 최근 복습일이 어제보다 이전이면 0이고,
/// 그렇지 않으면 최근 날짜부터 하루씩 거슬러 올라가며 끊기기 전까지 셉니다.
pub fn current_streak(review_days: &[NaiveDate], today: NaiveDate) -> u32 {
    let mut days = review_days.to_vec();
    days.sort_unstable_by(|a, b| b.cmp(a));
    days.dedup();

    let Some(most_recent) = days.first() else {
        return 0;
    };
    if (today - *most_recent).num_days() > 1 {
        return 0;
    }

    let mut streak = 1;
    for pair in days.windows(2) {
        if (pair[0] - pair[1]).num_days() == 1 {
            streak += 1;
        } else {
            break;
        }
    }
    streak
}
