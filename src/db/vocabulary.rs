//! # 사용자 학습 단어(user_words) 쿼리 모듈
//!
//! 단건 조회 함수는 `sqlx::Executor`를 제네릭으로 받아
//! 커넥션 풀과 트랜잭션 양쪽에서 사용할 수 있습니다.

use sqlx::{Executor, Sqlite, SqlitePool};

use crate::error::AppError;
use crate::models::*;
use crate::services::scheduler::DEFAULT_EASE_FACTOR;

/// user_words + 표제어 JOIN 쿼리. 조건절을 붙여 `&'static str`을 만듭니다.
macro_rules! select_user_words {
    ($tail:literal) => {
        concat!(
            "SELECT uw.id, uw.user_id, uw.word_id, w.word, uw.status, uw.ease_factor, ",
            "uw.interval_days, uw.next_review_date, uw.added_at ",
            "FROM user_words uw JOIN words w ON w.id = uw.word_id ",
            $tail
        )
    };
}

pub async fn find_user_word<'e, E>(
    executor: E,
    user_id: &str,
    word_id: &str,
) -> Result<Option<UserWord>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, UserWord>(select_user_words!(
        "WHERE uw.user_id = ? AND uw.word_id = ?"
    ))
    .bind(user_id)
    .bind(word_id)
    .fetch_optional(executor)
    .await
}

/// 새 학습 단어를 추가합니다 (learning, EF 2.5, 간격 1일).
///
/// 같은 (사용자, 단어) 쌍이 이미 있으면 `Conflict`.
pub async fn insert_user_word(
    pool: &SqlitePool,
    id: &str,
    user_id: &str,
    word_id: &str,
    next_review_date: &str,
) -> Result<UserWord, AppError> {
    sqlx::query(
        r#"
        INSERT INTO user_words (id, user_id, word_id, status, ease_factor, interval_days, next_review_date)
        VALUES (?, ?, ?, 'learning', ?, 1, ?)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(word_id)
    .bind(DEFAULT_EASE_FACTOR)
    .bind(next_review_date)
    .execute(pool)
    .await
    .map_err(|e| AppError::from_insert(e, "study list entry"))?;

    find_user_word(pool, user_id, word_id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created user word".to_string()))
}

/// 사용자의 학습 단어 목록 (최근 추가 순). `status`가 있으면 해당 상태만.
pub async fn list_user_words(
    pool: &SqlitePool,
    user_id: &str,
    status: Option<WordStatus>,
) -> Result<Vec<UserWord>, AppError> {
    let words = match status {
        Some(status) => {
            sqlx::query_as::<_, UserWord>(select_user_words!(
                "WHERE uw.user_id = ? AND uw.status = ? ORDER BY uw.added_at DESC"
            ))
            .bind(user_id)
            .bind(status)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, UserWord>(select_user_words!(
                "WHERE uw.user_id = ? ORDER BY uw.added_at DESC"
            ))
            .bind(user_id)
            .fetch_all(pool)
            .await?
        }
    };

    Ok(words)
}

/// 복습 예정 단어 (next_review_date <= now), 가장 오래 밀린 것부터.
pub async fn list_due_words(
    pool: &SqlitePool,
    user_id: &str,
    now: &str,
) -> Result<Vec<UserWord>, AppError> {
    let words = sqlx::query_as::<_, UserWord>(select_user_words!(
        "WHERE uw.user_id = ? AND uw.next_review_date <= ? ORDER BY uw.next_review_date ASC"
    ))
    .bind(user_id)
    .bind(now)
    .fetch_all(pool)
    .await?;

    Ok(words)
}
