//! # 사용자 서비스
//!
//! 사용자 이름 검증, 생성, 로그인 시 자동 생성, 학습 통계 계산을 담당합니다.

use std::sync::OnceLock;

use chrono::{NaiveDate, Utc};
use regex::Regex;
use sqlx::SqlitePool;

use crate::db;
use crate::error::AppError;
use crate::models::*;
use crate::services::scheduler;

/// 사용자 이름 길이 제한 (문자 수)
const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 20;

fn username_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("valid username regex"))
}

/// 앞뒤 공백을 제거한 뒤 길이(3~20자)와 문자 집합(영문/숫자/밑줄)을 검사합니다.
pub fn validate_username(raw: &str) -> Result<String, AppError> {
    let username = raw.trim();
    let len = username.chars().count();
    if !(USERNAME_MIN..=USERNAME_MAX).contains(&len) {
        return Err(AppError::BadRequest(format!(
            "Username must be between {} and {} characters",
            USERNAME_MIN, USERNAME_MAX
        )));
    }
    if !username_pattern().is_match(username) {
        return Err(AppError::BadRequest(
            "Username can only contain letters, numbers, and underscores".to_string(),
        ));
    }
    Ok(username.to_string())
}

pub async fn create_user(pool: &SqlitePool, raw_username: &str) -> Result<User, AppError> {
    let username = validate_username(raw_username)?;
    let id = uuid::Uuid::now_v7().to_string();
    let user = db::users::create_user(pool, &id, &username).await?;
    tracing::info!(username = %user.username, "User created");
    Ok(user)
}

pub async fn get_user(pool: &SqlitePool, username: &str) -> Result<User, AppError> {
    db::users::find_by_username(pool, username.trim())
        .await?
        .ok_or(AppError::NotFound("user"))
}

/// 로그인: 기존 사용자를 찾고, 없으면 새로 만듭니다.
///
/// 두 요청이 동시에 같은 이름을 만들면 한쪽은 `Conflict`를 받으므로 다시 조회합니다.
pub async fn get_or_create_user(pool: &SqlitePool, raw_username: &str) -> Result<User, AppError> {
    let username = validate_username(raw_username)?;
    if let Some(user) = db::users::find_by_username(pool, &username).await? {
        return Ok(user);
    }

    match create_user(pool, &username).await {
        Err(AppError::Conflict(_)) => get_user(pool, &username).await,
        other => other,
    }
}

/// 학습 통계를 계산합니다. 연속 학습일 계산이 실패하면 0으로 대체합니다.
pub async fn user_stats(pool: &SqlitePool, user: &User) -> Result<UserStats, AppError> {
    let now = format_timestamp(Utc::now());
    let counts = db::users::count_words(pool, &user.id, &now).await?;
    let (total_reviews, last_review_date) = db::reviews::review_totals(pool, &user.id).await?;

    let current_streak = match streak_for_user(pool, &user.id).await {
        Ok(streak) => streak,
        Err(e) => {
            tracing::warn!(username = %user.username, "Streak computation failed: {}", e);
            0
        }
    };

    Ok(UserStats {
        username: user.username.clone(),
        total_words: counts.total,
        due_today: counts.due,
        learning: counts.learning,
        reviewing: counts.reviewing,
        mastered: counts.mastered,
        total_reviews,
        current_streak,
        last_review_date,
    })
}

async fn streak_for_user(pool: &SqlitePool, user_id: &str) -> Result<u32, AppError> {
    let days = db::reviews::list_review_days(pool, user_id)
        .await?
        .iter()
        .map(|day| {
            NaiveDate::parse_from_str(day, "%Y-%m-%d")
                .map_err(|e| AppError::Internal(format!("Bad review day '{}': {}", day, e)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(scheduler::current_streak(&days, Utc::now().date_naive()))
}
