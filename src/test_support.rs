//! 테스트 공용 도우미: 인메모리 DB, 가짜 사전 원본, 샘플 데이터

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::models::*;
use crate::services::dictionary::{DictionaryError, DictionarySource};

/// 마이그레이션이 적용된 인메모리 SQLite 풀
///
/// `sqlite::memory:`는 커넥션마다 별도 DB이므로 커넥션을 하나로 제한합니다.
pub async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations");
    pool
}

/// 여러 커넥션이 동시에 쓰는 상황을 재현하기 위한 임시 파일 DB
///
/// 반환된 경로의 파일(-wal, -shm 포함)은 호출자가 `remove_db_files`로 지웁니다.
pub async fn file_pool(connections: u32) -> (SqlitePool, PathBuf) {
    let path = std::env::temp_dir().join(format!("words-test-{}.db", uuid::Uuid::now_v7()));
    let options = SqliteConnectOptions::new()
        .filename(&path)
        .create_if_missing(true)
        .busy_timeout(Duration::from_secs(30));
    let pool = SqlitePoolOptions::new()
        .max_connections(connections)
        .connect_with(options)
        .await
        .expect("file sqlite");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations");
    (pool, path)
}

pub async fn remove_db_files(pool: SqlitePool, path: PathBuf) {
    pool.close().await;
    for suffix in ["", "-wal", "-shm"] {
        let mut file = path.clone().into_os_string();
        file.push(suffix);
        let _ = tokio::fs::remove_file(PathBuf::from(file)).await;
    }
}

/// 의미 2개, 발음 1개, 출처 1개를 가진 샘플 항목
pub fn sample_word(headword: &str) -> Word {
    let now = format_timestamp(chrono::Utc::now());
    Word {
        id: uuid::Uuid::now_v7().to_string(),
        word: headword.to_string(),
        phonetic: format!("/{}/", headword),
        meanings: vec![
            Meaning {
                part_of_speech: "adjective".to_string(),
                definitions: vec![
                    Definition {
                        definition: format!("first sense of {}", headword),
                        example: Some(format!("a {} example", headword)),
                        synonyms: vec!["clear".to_string(), "plain".to_string()],
                        antonyms: vec!["murky".to_string()],
                    },
                    Definition {
                        definition: format!("second sense of {}", headword),
                        example: None,
                        synonyms: vec![],
                        antonyms: vec![],
                    },
                ],
                synonyms: vec!["transparent".to_string()],
                antonyms: vec!["opaque".to_string(), "obscure".to_string()],
            },
            Meaning {
                part_of_speech: "noun".to_string(),
                definitions: vec![Definition {
                    definition: format!("{} as a thing", headword),
                    example: None,
                    synonyms: vec![],
                    antonyms: vec![],
                }],
                synonyms: vec![],
                antonyms: vec![],
            },
        ],
        phonetics: vec![Phonetic {
            text: format!("/{}/", headword),
            audio: Some(format!("https://audio.example/{}.mp3", headword)),
        }],
        source_urls: vec![format!("https://en.wiktionary.org/wiki/{}", headword)],
        created_at: now.clone(),
        updated_at: now,
    }
}

/// 호출 횟수를 세는 가짜 사전 원본
pub struct FakeDictionary {
    known: HashSet<String>,
    fail: bool,
    calls: AtomicUsize,
}

impl FakeDictionary {
    pub fn with_words(words: &[&str]) -> Self {
        Self {
            known: words.iter().map(|w| w.to_string()).collect(),
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    /// 모든 요청에 전송 오류를 돌려줍니다.
    pub fn failing() -> Self {
        Self {
            known: HashSet::new(),
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DictionarySource for FakeDictionary {
    async fn fetch(&self, word: &str) -> Result<Word, DictionaryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(DictionaryError::Transport("connection refused".to_string()));
        }
        if self.known.contains(word) {
            Ok(sample_word(word))
        } else {
            Err(DictionaryError::NotFound)
        }
    }
}
