//! # 학습 목록 서비스
//!
//! 사용자가 단어를 학습 목록에 추가하고 조회하는 기능입니다.
//! 단어 추가 시 사전 항목은 `WordResolver`로 확보합니다 (필요하면 외부 조회).

use chrono::{Duration, Utc};
use sqlx::SqlitePool;

use crate::db;
use crate::error::AppError;
use crate::models::*;
use crate::services::resolver::WordResolver;

/// 새로 추가한 단어의 첫 복습까지의 시간
const FIRST_REVIEW_DELAY_HOURS: i64 = 1;

/// 단어를 학습 목록에 추가합니다. 이미 있으면 기존 항목을 그대로 반환합니다.
pub async fn add_word(
    pool: &SqlitePool,
    resolver: &WordResolver,
    user: &User,
    raw_word: &str,
) -> Result<UserWord, AppError> {
    let word = resolver.resolve(raw_word).await?;

    if let Some(existing) = db::vocabulary::find_user_word(pool, &user.id, &word.id).await? {
        return Ok(existing);
    }

    let id = uuid::Uuid::now_v7().to_string();
    let next_review = format_timestamp(Utc::now() + Duration::hours(FIRST_REVIEW_DELAY_HOURS));
    let user_word =
        match db::vocabulary::insert_user_word(pool, &id, &user.id, &word.id, &next_review).await {
            Ok(user_word) => user_word,
            // 동시에 같은 단어를 추가한 요청이 먼저 저장한 경우
            Err(AppError::Conflict(_)) => {
                return db::vocabulary::find_user_word(pool, &user.id, &word.id)
                    .await?
                    .ok_or(AppError::NotFound("user word"));
            }
            Err(e) => return Err(e),
        };

    tracing::info!(username = %user.username, word = %word.word, "Word added to study list");
    Ok(user_word)
}

/// 학습 목록 조회. `status` 문자열이 주어지면 해당 상태만 반환합니다.
pub async fn list_words(
    pool: &SqlitePool,
    user: &User,
    status: Option<&str>,
) -> Result<Vec<UserWord>, AppError> {
    let status = status
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<WordStatus>().map_err(AppError::BadRequest))
        .transpose()?;

    db::vocabulary::list_user_words(pool, &user.id, status).await
}
