//! # 사전 항목(Word) 모델 정의
//!
//! 하나의 단어(headword)는 여러 개의 의미(Meaning)를 가지며,
//! 각 의미는 품사 하나와 순서 있는 정의(Definition) 목록으로 구성됩니다.
//! 유의어/반의어는 의미 수준과 정의 수준 양쪽에 붙을 수 있습니다.
//!
//! JSON 필드 이름(`partOfSpeech`, `sourceUrls`)은 외부 사전 API와 동일하게 유지합니다.

use serde::{Deserialize, Serialize};

/// 정규화된 사전 항목. 표제어(`word`)는 항상 소문자입니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub id: String,
    pub word: String,
    /// 대표 발음 기호 (없으면 빈 문자열)
    #[serde(default)]
    pub phonetic: String,
    #[serde(default)]
    pub meanings: Vec<Meaning>,
    #[serde(default)]
    pub phonetics: Vec<Phonetic>,
    #[serde(rename = "sourceUrls", default)]
    pub source_urls: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// 품사 하나에 속한 정의 묶음
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meaning {
    #[serde(rename = "partOfSpeech")]
    pub part_of_speech: String,
    #[serde(default)]
    pub definitions: Vec<Definition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub synonyms: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub antonyms: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    pub definition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub synonyms: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub antonyms: Vec<String>,
}

/// 발음 정보 (표기 + 선택적 음성 파일 URL)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Phonetic {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,
}

/// 단어 조회 키를 정규화합니다 (앞뒤 공백 제거 + 소문자).
pub fn normalize_word(raw: &str) -> String {
    raw.trim().to_lowercase()
}
