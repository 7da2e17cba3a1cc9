//! # 복습 관련 쿼리 모듈
//!
//! 복습 제출은 서비스 계층이 연 트랜잭션 안에서 아래 순서로 실행됩니다.
//! ```text
//! lock_user_word()  → 행 쓰기 잠금 획득 (없으면 0행)
//! find_user_word()  → 잠금 이후의 최신 값 읽기
//! update_schedule() → 새 EF / 간격 / 상태 / 다음 복습일 기록
//! insert_review()   → 복습 이력 추가
//! ```

use sqlx::{SqliteConnection, SqlitePool};

use crate::error::AppError;
use crate::models::*;
use crate::services::scheduler::Schedule;

/// 아무 값도 바꾸지 않는 UPDATE로 쓰기 잠금을 먼저 잡습니다.
///
/// SQLite는 트랜잭션의 첫 쓰기에서 데이터베이스 쓰기 잠금을 얻으므로,
/// 이후의 읽기-계산-쓰기가 같은 행에 대한 다른 복습과 섞이지 않습니다.
/// 반환값은 영향받은 행 수 (0이면 학습 목록에 없는 단어).
pub async fn lock_user_word(
    conn: &mut SqliteConnection,
    user_id: &str,
    word_id: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE user_words SET interval_days = interval_days WHERE user_id = ? AND word_id = ?",
    )
    .bind(user_id)
    .bind(word_id)
    .execute(conn)
    .await?;

    Ok(result.rows_affected())
}

pub async fn update_schedule(
    conn: &mut SqliteConnection,
    user_word_id: &str,
    schedule: &Schedule,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE user_words
        SET ease_factor = ?, interval_days = ?, next_review_date = ?, status = ?
        WHERE id = ?
        "#,
    )
    .bind(schedule.ease_factor)
    .bind(schedule.interval_days)
    .bind(format_timestamp(schedule.next_review))
    .bind(schedule.status)
    .bind(user_word_id)
    .execute(conn)
    .await?;

    Ok(())
}

pub async fn insert_review(
    conn: &mut SqliteConnection,
    user_id: &str,
    word_id: &str,
    quality: u8,
    schedule: &Schedule,
    reviewed_at: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO review_history (id, user_id, word_id, quality, interval_days, ease_factor, reviewed_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(uuid::Uuid::now_v7().to_string())
    .bind(user_id)
    .bind(word_id)
    .bind(i64::from(quality))
    .bind(schedule.interval_days)
    .bind(schedule.ease_factor)
    .bind(reviewed_at)
    .execute(conn)
    .await?;

    Ok(())
}

/// (사용자, 단어)의 복습 이력, 최신순.
///
/// 같은 밀리초에 기록된 이력은 ID(UUIDv7, 생성 순)로 순서를 정합니다.
pub async fn list_history(
    pool: &SqlitePool,
    user_id: &str,
    word_id: &str,
) -> Result<Vec<ReviewHistory>, AppError> {
    let history = sqlx::query_as::<_, ReviewHistory>(
        r#"
        SELECT rh.id, rh.user_id, rh.word_id, w.word, rh.quality,
               rh.interval_days, rh.ease_factor, rh.reviewed_at
        FROM review_history rh
        JOIN words w ON w.id = rh.word_id
        WHERE rh.user_id = ? AND rh.word_id = ?
        ORDER BY rh.reviewed_at DESC, rh.id DESC
        "#,
    )
    .bind(user_id)
    .bind(word_id)
    .fetch_all(pool)
    .await?;

    Ok(history)
}

/// 복습이 있었던 UTC 날짜("YYYY-MM-DD") 목록, 중복 없이 최신순.
pub async fn list_review_days(pool: &SqlitePool, user_id: &str) -> Result<Vec<String>, AppError> {
    let rows: Vec<(String,)> = sqlx::query_as(
        r#"
        SELECT DISTINCT substr(reviewed_at, 1, 10) AS review_day
        FROM review_history
        WHERE user_id = ?
        ORDER BY review_day DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|(day,)| day).collect())
}

/// 전체 복습 횟수와 마지막 복습 시각
pub async fn review_totals(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<(i64, Option<String>), AppError> {
    let totals: (i64, Option<String>) = sqlx::query_as(
        "SELECT COUNT(*), MAX(reviewed_at) FROM review_history WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(totals)
}
