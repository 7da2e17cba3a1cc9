//! # Wordset 사전 일괄 가져오기
//!
//! `words-api import <dir>`로 실행됩니다.
//!
//! 1단계: 디렉토리의 `*.json` 파일을 읽어 `WordIndex`에 모읍니다 (대소문자 무시 중복 병합).
//! 2단계: 단어마다 별도의 트랜잭션으로 저장합니다. 이미 있는 단어는 건너뜁니다.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Utc;
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::db;
use crate::error::AppError;
use crate::models::*;

/// 모든 Wordset 항목에 붙는 출처
pub const WORDSET_SOURCE_URL: &str = "https://github.com/wordset/wordset-dictionary";

/// 진행 상황을 로그로 남기는 간격 (단어 수)
const PROGRESS_EVERY: usize = 1000;

/// 정규화된 표제어 → 병합 중인 항목
///
/// 처음 본 순서를 유지합니다.
#[derive(Debug, Default)]
pub struct WordIndex {
    positions: HashMap<String, usize>,
    words: Vec<Word>,
}

impl WordIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// 새 항목을 추가하거나 같은 표제어의 기존 항목에 병합합니다.
    ///
    /// 의미/발음/출처는 뒤에 이어 붙이기만 하고, 발음 표기는 더 긴 경우에만 교체합니다.
    pub fn add_or_merge(&mut self, mut word: Word) {
        let key = normalize_word(&word.word);
        if key.is_empty() {
            return;
        }

        match self.positions.get(&key) {
            Some(&i) => {
                let existing = &mut self.words[i];
                existing.meanings.append(&mut word.meanings);
                existing.phonetics.append(&mut word.phonetics);
                existing.source_urls.append(&mut word.source_urls);
                if word.phonetic.chars().count() > existing.phonetic.chars().count() {
                    existing.phonetic = word.phonetic;
                }
            }
            None => {
                word.word = key.clone();
                self.positions.insert(key, self.words.len());
                self.words.push(word);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn into_words(self) -> Vec<Word> {
        self.words
    }
}

// ── Wordset JSON 형식: { "<headword>": { word, meanings: [...] }, ... } ──

#[derive(Debug, Deserialize)]
struct WordsetEntry {
    word: String,
    #[serde(default)]
    meanings: Vec<WordsetMeaning>,
}

#[derive(Debug, Deserialize)]
struct WordsetMeaning {
    #[serde(default)]
    def: String,
    #[serde(default)]
    example: Option<String>,
    #[serde(default)]
    speech_part: String,
    #[serde(default)]
    synonyms: Vec<String>,
}

/// Wordset 항목 하나를 사전 항목으로 변환합니다.
///
/// 같은 품사의 정의는 하나의 의미로 묶고, 품사는 처음 나온 순서를 따릅니다.
fn convert_wordset_entry(entry: WordsetEntry) -> Word {
    let mut meanings: Vec<Meaning> = Vec::new();

    for m in entry.meanings {
        let definition = Definition {
            definition: m.def,
            example: m.example.filter(|e| !e.is_empty()),
            synonyms: m.synonyms,
            antonyms: vec![],
        };

        match meanings
            .iter_mut()
            .find(|existing| existing.part_of_speech == m.speech_part)
        {
            Some(meaning) => meaning.definitions.push(definition),
            None => meanings.push(Meaning {
                part_of_speech: m.speech_part,
                definitions: vec![definition],
                synonyms: vec![],
                antonyms: vec![],
            }),
        }
    }

    let now = format_timestamp(Utc::now());
    Word {
        id: uuid::Uuid::now_v7().to_string(),
        word: normalize_word(&entry.word),
        phonetic: String::new(),
        meanings,
        phonetics: vec![],
        source_urls: vec![WORDSET_SOURCE_URL.to_string()],
        created_at: now.clone(),
        updated_at: now,
    }
}

/// Wordset JSON 문자열 하나를 인덱스에 병합하고 읽은 항목 수를 반환합니다.
pub fn load_wordset_json(json: &str, index: &mut WordIndex) -> Result<usize, AppError> {
    let entries: HashMap<String, WordsetEntry> = serde_json::from_str(json)
        .map_err(|e| AppError::BadRequest(format!("Invalid Wordset JSON: {}", e)))?;

    let count = entries.len();
    for entry in entries.into_values() {
        index.add_or_merge(convert_wordset_entry(entry));
    }
    Ok(count)
}

/// 디렉토리의 모든 `*.json` 파일을 이름순으로 읽어 인덱스를 만듭니다.
///
/// 읽을 수 없는 파일은 경고를 남기고 건너뜁니다.
pub async fn load_wordset_dir(dir: &Path) -> Result<WordIndex, AppError> {
    let mut files: Vec<PathBuf> = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();

    let mut index = WordIndex::new();
    let mut loaded = 0;
    for (i, path) in files.iter().enumerate() {
        let result = match tokio::fs::read_to_string(path).await {
            Ok(json) => load_wordset_json(&json, &mut index),
            Err(e) => Err(e.into()),
        };
        match result {
            Ok(count) => {
                loaded += count;
                tracing::info!("[{}/{}] {}: {} entries", i + 1, files.len(), path.display(), count);
            }
            Err(e) => tracing::warn!("Skipping {}: {}", path.display(), e),
        }
    }

    tracing::info!(
        "Loaded {} entries, deduplicated to {} unique words",
        loaded,
        index.len()
    );
    Ok(index)
}

/// 가져오기 결과
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// 단어마다 별도의 트랜잭션으로 저장합니다.
///
/// 이미 저장된 표제어는 건너뛰고, 실패한 단어는 세고 넘어갑니다.
pub async fn import_words(pool: &SqlitePool, words: Vec<Word>) -> Result<ImportReport, AppError> {
    let total = words.len();
    let started = Instant::now();
    let mut report = ImportReport::default();

    for (i, word) in words.into_iter().enumerate() {
        match import_one(pool, &word).await {
            Ok(true) => report.imported += 1,
            Ok(false) => report.skipped += 1,
            Err(e) => {
                tracing::warn!(word = %word.word, "Error importing word: {}", e);
                report.failed += 1;
            }
        }

        let done = i + 1;
        if done % PROGRESS_EVERY == 0 || done == total {
            let elapsed = started.elapsed().as_secs_f64();
            let rate = if elapsed > 0.0 { done as f64 / elapsed } else { 0.0 };
            tracing::info!(
                "Progress: {}/{} ({:.1}%) | {:.0} words/sec | errors: {}",
                done,
                total,
                done as f64 / total as f64 * 100.0,
                rate,
                report.failed
            );
        }
    }

    Ok(report)
}

/// 저장했으면 `true`, 이미 있어서 건너뛰었으면 `false`
async fn import_one(pool: &SqlitePool, word: &Word) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;
    if db::words::word_exists(&mut *tx, &word.word).await? {
        return Ok(false);
    }
    db::words::insert_word(&mut *tx, word).await?;
    tx.commit().await?;
    Ok(true)
}
