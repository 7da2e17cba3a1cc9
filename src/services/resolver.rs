//! # 단어 조회 (cache-aside)
//!
//! ```text
//! resolve("Hello ")
//!   ├─ 정규화 → "hello"
//!   ├─ 로컬 DB 조회 ── 있음 → 그대로 반환 (부수 효과 없음)
//!   │               └─ 저장소 오류 → 그대로 실패 (외부 호출하지 않음)
//!   └─ 없음 → 외부 사전 조회
//!         ├─ 404 → NotFound (캐시하지 않음)
//!         ├─ 전송 오류 → Transport
//!         └─ 성공 → 트랜잭션으로 저장 (실패해도 경고만 남기고 결과 반환)
//! ```
//! 사전 항목은 한 번 가져오면 바뀌지 않으므로 캐시 만료 정책이 없습니다.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::db;
use crate::error::AppError;
use crate::models::{normalize_word, Word};
use crate::services::dictionary::{DictionaryError, DictionarySource};

pub struct WordResolver {
    pool: SqlitePool,
    source: Arc<dyn DictionarySource>,
}

impl WordResolver {
    pub fn new(pool: SqlitePool, source: Arc<dyn DictionarySource>) -> Self {
        Self { pool, source }
    }

    /// 단어를 정규화된 사전 항목으로 조회합니다.
    pub async fn resolve(&self, raw: &str) -> Result<Word, AppError> {
        let key = normalize_word(raw);
        if key.is_empty() {
            return Err(AppError::BadRequest("Word cannot be empty".to_string()));
        }

        if let Some(word) = db::words::find_by_word(&self.pool, &key).await? {
            tracing::debug!(word = %key, "Cache hit");
            return Ok(word);
        }

        tracing::info!(word = %key, "Cache miss, fetching from dictionary API");
        let mut word = self.source.fetch(&key).await.map_err(|e| match e {
            DictionaryError::NotFound => AppError::NotFound("word"),
            DictionaryError::Transport(msg) => AppError::Transport(msg),
        })?;
        // 원본이 돌려준 표제어 대신 요청 키로 저장해야 다음 조회가 적중합니다
        word.word = key;

        match db::words::save_word(&self.pool, &word).await {
            Ok(()) => Ok(word),
            Err(e) => {
                tracing::warn!(word = %word.word, "Failed to cache fetched word: {}", e);
                // 동시에 같은 단어를 가져온 다른 요청이 먼저 저장했다면 그 항목을 돌려줍니다
                match db::words::find_by_word(&self.pool, &word.word).await {
                    Ok(Some(stored)) => Ok(stored),
                    _ => Ok(word),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{memory_pool, FakeDictionary};

    #[tokio::test]
    async fn miss_fetches_once_then_hits_cache() {
        let pool = memory_pool().await;
        let dictionary = Arc::new(FakeDictionary::with_words(&["lucid"]));
        let resolver = WordResolver::new(pool, dictionary.clone());

        let first = resolver.resolve("  LUCID ").await.unwrap();
        assert_eq!(first.word, "lucid");
        assert_eq!(dictionary.calls(), 1);

        let second = resolver.resolve("lucid").await.unwrap();
        assert_eq!(dictionary.calls(), 1);
        assert_eq!(second, first);
    }

    #[tokio::test]
    async fn upstream_not_found_is_not_cached() {
        let pool = memory_pool().await;
        let dictionary = Arc::new(FakeDictionary::with_words(&[]));
        let resolver = WordResolver::new(pool.clone(), dictionary.clone());

        let err = resolver.resolve("zzyzx").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound("word")));

        // 다음 조회도 다시 외부로 나갑니다
        let _ = resolver.resolve("zzyzx").await;
        assert_eq!(dictionary.calls(), 2);

        let (words,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM words")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(words, 0);
    }

    #[tokio::test]
    async fn transport_failure_is_distinct_from_not_found() {
        let pool = memory_pool().await;
        let dictionary = Arc::new(FakeDictionary::failing());
        let resolver = WordResolver::new(pool.clone(), dictionary);

        let err = resolver.resolve("lucid").await.unwrap_err();
        assert!(matches!(err, AppError::Transport(_)));
        assert!(db::words::find_by_word(&pool, "lucid").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn cache_write_failure_still_returns_fetched_word() {
        let pool = memory_pool().await;
        let dictionary = Arc::new(FakeDictionary::with_words(&["lucid"]));
        let resolver = WordResolver::new(pool.clone(), dictionary.clone());

        sqlx::query("DROP TABLE source_urls").execute(&pool).await.unwrap();

        let word = resolver.resolve("lucid").await.unwrap();
        assert_eq!(word.word, "lucid");
        // 롤백되어 부분 저장된 항목이 없어야 합니다
        assert!(db::words::find_by_word(&pool, "lucid").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn empty_input_is_rejected_without_lookup() {
        let pool = memory_pool().await;
        let dictionary = Arc::new(FakeDictionary::with_words(&["lucid"]));
        let resolver = WordResolver::new(pool, dictionary.clone());

        assert!(matches!(
            resolver.resolve("   ").await,
            Err(AppError::BadRequest(_))
        ));
        assert_eq!(dictionary.calls(), 0);
    }

    #[tokio::test]
    async fn storage_fault_skips_the_upstream_call() {
        let pool = memory_pool().await;
        let dictionary = Arc::new(FakeDictionary::with_words(&["lucid"]));
        let resolver = WordResolver::new(pool.clone(), dictionary.clone());

        pool.close().await;
        let err = resolver.resolve("lucid").await.unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
        assert_eq!(dictionary.calls(), 0);
    }
}
