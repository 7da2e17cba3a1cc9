//! # 사용자 데이터베이스 쿼리 모듈
//!
//! 사용자 생성/조회와 학습 통계 집계 쿼리입니다.

use sqlx::SqlitePool;

use crate::error::AppError;
use crate::models::*;

/// 사용자를 생성합니다. 사용자 이름이 이미 있으면 `Conflict`.
pub async fn create_user(pool: &SqlitePool, id: &str, username: &str) -> Result<User, AppError> {
    sqlx::query(
        r#"
        INSERT INTO users (id, username)
        VALUES (?, ?)
        "#,
    )
    .bind(id)
    .bind(username)
    .execute(pool)
    .await
    .map_err(|e| AppError::from_insert(e, "username"))?;

    find_by_id(pool, id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created user".to_string()))
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, created_at
        FROM users
        WHERE username = ?
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, created_at
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// 학습 단어 수 집계 (전체, 복습 예정, 상태별)
#[derive(Debug, Default, sqlx::FromRow)]
pub struct WordCounts {
    pub total: i64,
    pub due: i64,
    pub learning: i64,
    pub reviewing: i64,
    pub mastered: i64,
}

/// 사용자의 학습 단어를 한 번의 쿼리로 집계합니다.
///
/// `now`보다 이르거나 같은 `next_review_date`를 복습 예정으로 셉니다.
pub async fn count_words(pool: &SqlitePool, user_id: &str, now: &str) -> Result<WordCounts, AppError> {
    let counts = sqlx::query_as::<_, WordCounts>(
        r#"
        SELECT COUNT(*) AS total,
               COALESCE(SUM(next_review_date <= ?), 0) AS due,
               COALESCE(SUM(status = 'learning'), 0) AS learning,
               COALESCE(SUM(status = 'reviewing'), 0) AS reviewing,
               COALESCE(SUM(status = 'mastered'), 0) AS mastered
        FROM user_words
        WHERE user_id = ?
        "#,
    )
    .bind(now)
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::memory_pool;

    #[tokio::test]
    async fn duplicate_username_is_a_conflict() {
        let pool = memory_pool().await;
        create_user(&pool, "u1", "valid_user1").await.unwrap();

        let err = create_user(&pool, "u2", "valid_user1").await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn lookup_by_name_and_id() {
        let pool = memory_pool().await;
        let created = create_user(&pool, "u1", "alice").await.unwrap();

        assert_eq!(find_by_username(&pool, "alice").await.unwrap(), Some(created.clone()));
        assert_eq!(find_by_id(&pool, "u1").await.unwrap(), Some(created));
        assert_eq!(find_by_username(&pool, "bob").await.unwrap(), None);
    }
}
