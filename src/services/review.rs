//! # 복습 서비스
//!
//! 복습 제출(SM-2 적용), 복습 예정 단어 조회, 복습 이력 조회를 담당합니다.
//!
//! 복습 제출은 하나의 트랜잭션입니다. 학습 상태 갱신과 이력 추가가
//! 함께 커밋되거나 함께 롤백되므로 중간 상태는 관찰되지 않습니다.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::db;
use crate::error::AppError;
use crate::models::*;
use crate::services::scheduler;

/// 복습 결과를 반영하고 갱신된 학습 상태를 반환합니다.
///
/// - 품질 점수가 0~5가 아니면 `InvalidQuality`
/// - 로컬에 없는 단어이거나 학습 목록에 없으면 `NotInStudyList`
pub async fn submit_review(
    pool: &SqlitePool,
    user: &User,
    raw_word: &str,
    quality: i64,
) -> Result<UserWord, AppError> {
    submit_review_at(pool, user, raw_word, quality, Utc::now()).await
}

pub(crate) async fn submit_review_at(
    pool: &SqlitePool,
    user: &User,
    raw_word: &str,
    quality: i64,
    now: DateTime<Utc>,
) -> Result<UserWord, AppError> {
    let quality = scheduler::validate_quality(quality)?;
    let word = find_local_word(pool, raw_word).await?;

    let mut tx = pool.begin().await?;

    if db::reviews::lock_user_word(&mut *tx, &user.id, &word.id).await? == 0 {
        return Err(AppError::NotInStudyList);
    }
    let current = db::vocabulary::find_user_word(&mut *tx, &user.id, &word.id)
        .await?
        .ok_or(AppError::NotInStudyList)?;

    let schedule = scheduler::next_schedule(current.ease_factor, current.interval_days, quality, now);

    db::reviews::update_schedule(&mut *tx, &current.id, &schedule).await?;
    db::reviews::insert_review(
        &mut *tx,
        &user.id,
        &word.id,
        quality,
        &schedule,
        &format_timestamp(now),
    )
    .await?;

    let updated = db::vocabulary::find_user_word(&mut *tx, &user.id, &word.id)
        .await?
        .ok_or(AppError::Internal("Reviewed word vanished".to_string()))?;
    tx.commit().await?;

    tracing::debug!(
        username = %user.username,
        word = %word.word,
        quality,
        interval = schedule.interval_days,
        status = %schedule.status,
        "Review recorded"
    );
    Ok(updated)
}

/// 지금 복습해야 하는 단어, 가장 오래 밀린 것부터.
pub async fn due_words(pool: &SqlitePool, user: &User) -> Result<Vec<UserWord>, AppError> {
    due_words_at(pool, user, Utc::now()).await
}

pub(crate) async fn due_words_at(
    pool: &SqlitePool,
    user: &User,
    now: DateTime<Utc>,
) -> Result<Vec<UserWord>, AppError> {
    db::vocabulary::list_due_words(pool, &user.id, &format_timestamp(now)).await
}

/// (사용자, 단어)의 복습 이력, 최신순.
pub async fn review_history(
    pool: &SqlitePool,
    user: &User,
    raw_word: &str,
) -> Result<Vec<ReviewHistory>, AppError> {
    let key = normalize_word(raw_word);
    let word = db::words::find_by_word(pool, &key)
        .await?
        .ok_or(AppError::NotFound("word"))?;
    db::reviews::list_history(pool, &user.id, &word.id).await
}

/// 복습 대상 단어는 학습 목록에 들어갈 때 이미 로컬에 저장되었으므로
/// 외부 사전을 호출하지 않습니다.
async fn find_local_word(pool: &SqlitePool, raw_word: &str) -> Result<Word, AppError> {
    let key = normalize_word(raw_word);
    db::words::find_by_word(pool, &key)
        .await?
        .ok_or(AppError::NotInStudyList)
}
