//! # 외부 사전 API 클라이언트
//!
//! 로컬 DB에 없는 단어를 가져오는 권위 있는 원본(system of record)입니다.
//! 기본 구현은 dictionaryapi.dev의 `GET {base}/{word}` 엔드포인트를 사용합니다.
//!
//! 결과 구분:
//! - HTTP 404 → `DictionaryError::NotFound` (캐시하지 않음)
//! - 그 외 비정상 상태 코드, 연결 실패, 시간 초과, 잘못된 본문 → `DictionaryError::Transport`

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use thiserror::Error;

use crate::models::{format_timestamp, normalize_word, Definition, Meaning, Phonetic, Word};

/// 외부 사전 조회 실패 종류
#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("word not found upstream")]
    NotFound,
    #[error("{0}")]
    Transport(String),
}

/// 단어 하나를 사전 항목으로 가져오는 원본
///
/// 반환되는 `Word`는 아직 저장되지 않은 임시 항목입니다 (새 UUID, 현재 시각).
#[async_trait]
pub trait DictionarySource: Send + Sync {
    async fn fetch(&self, word: &str) -> Result<Word, DictionaryError>;
}

/// dictionaryapi.dev HTTP 클라이언트
#[derive(Debug, Clone)]
pub struct HttpDictionary {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpDictionary {
    /// `timeout`을 넘는 요청은 `Transport` 에러로 실패합니다.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, DictionaryError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| DictionaryError::Transport(format!("invalid base url: {}", e)))?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DictionaryError::Transport(format!("client setup failed: {}", e)))?;

        Ok(Self { client, base_url })
    }

    fn entry_url(&self, word: &str) -> Result<Url, DictionaryError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| DictionaryError::Transport("base url cannot have a path".to_string()))?
            .pop_if_empty()
            .push(word);
        Ok(url)
    }
}

#[async_trait]
impl DictionarySource for HttpDictionary {
    async fn fetch(&self, word: &str) -> Result<Word, DictionaryError> {
        let url = self.entry_url(word)?;
        tracing::debug!(%url, "Fetching word from dictionary API");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DictionaryError::Transport(format!("request failed: {}", e)))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(DictionaryError::NotFound);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DictionaryError::Transport(format!(
                "API returned status {}: {}",
                status, body
            )));
        }

        let entries: Vec<ApiEntry> = response
            .json()
            .await
            .map_err(|e| DictionaryError::Transport(format!("failed to decode response: {}", e)))?;

        entries
            .into_iter()
            .next()
            .map(ApiEntry::into_word)
            .ok_or_else(|| DictionaryError::Transport("empty response from API".to_string()))
    }
}

// ── dictionaryapi.dev 응답 형식 ──
// 필드가 빠진 항목이 많아 모두 #[serde(default)]로 받습니다.

#[derive(Debug, Deserialize)]
struct ApiEntry {
    #[serde(default)]
    word: String,
    #[serde(default)]
    phonetic: Option<String>,
    #[serde(default)]
    phonetics: Vec<ApiPhonetic>,
    #[serde(default)]
    meanings: Vec<ApiMeaning>,
    #[serde(default, rename = "sourceUrls")]
    source_urls: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ApiPhonetic {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    audio: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiMeaning {
    #[serde(default, rename = "partOfSpeech")]
    part_of_speech: String,
    #[serde(default)]
    definitions: Vec<ApiDefinition>,
    #[serde(default)]
    synonyms: Vec<String>,
    #[serde(default)]
    antonyms: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ApiDefinition {
    #[serde(default)]
    definition: String,
    #[serde(default)]
    example: Option<String>,
    #[serde(default)]
    synonyms: Vec<String>,
    #[serde(default)]
    antonyms: Vec<String>,
}

impl ApiEntry {
    fn into_word(self) -> Word {
        let now = format_timestamp(Utc::now());

        Word {
            id: uuid::Uuid::now_v7().to_string(),
            word: normalize_word(&self.word),
            phonetic: self.phonetic.unwrap_or_default(),
            meanings: self
                .meanings
                .into_iter()
                .map(|m| Meaning {
                    part_of_speech: m.part_of_speech,
                    definitions: m
                        .definitions
                        .into_iter()
                        .map(|d| Definition {
                            definition: d.definition,
                            example: d.example.filter(|e| !e.is_empty()),
                            synonyms: d.synonyms,
                            antonyms: d.antonyms,
                        })
                        .collect(),
                    synonyms: m.synonyms,
                    antonyms: m.antonyms,
                })
                .collect(),
            // 표기 없이 음성만 있는 항목은 버립니다
            phonetics: self
                .phonetics
                .into_iter()
                .filter_map(|p| {
                    let text = p.text.filter(|t| !t.is_empty())?;
                    Some(Phonetic {
                        text,
                        audio: p.audio.filter(|a| !a.is_empty()),
                    })
                })
                .collect(),
            source_urls: self.source_urls,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}
