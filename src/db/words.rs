//! # 사전 항목 데이터베이스 쿼리 모듈
//!
//! `words`와 그 하위 테이블(phonetics, meanings, definitions, related_terms, source_urls)을
//! 하나의 `Word` 값으로 재구성하거나, 하나의 트랜잭션 안에서 저장합니다.
//!
//! ```text
//! words ─┬─ phonetics
//!        ├─ source_urls
//!        └─ meanings ─┬─ definitions ── related_terms (definition_id)
//!                     └─ related_terms (meaning_id)
//! ```
//! 모든 하위 행에는 `position` 컬럼이 있어 순서가 그대로 복원됩니다.

use std::collections::HashMap;

use sqlx::{SqliteConnection, SqlitePool};

use crate::error::AppError;
use crate::models::*;

#[derive(sqlx::FromRow)]
struct WordRow {
    id: String,
    word: String,
    phonetic: String,
    created_at: String,
    updated_at: String,
}

#[derive(sqlx::FromRow)]
struct DefinitionRow {
    id: String,
    meaning_id: String,
    definition: String,
    example: Option<String>,
}

/// 유의어/반의어 한 행. 소유자는 meaning 또는 definition 중 하나입니다.
#[derive(sqlx::FromRow)]
struct RelatedRow {
    owner_id: String,
    relation: String,
    term: String,
}

/// 의미/정의 ID별 (유의어, 반의어) 목록
type RelatedTerms = HashMap<String, (Vec<String>, Vec<String>)>;

/// 정규화된 표제어로 사전 항목을 조회합니다.
///
/// - `Ok(Some(Word))`: 모든 하위 구조를 채운 항목
/// - `Ok(None)`: 저장된 적 없는 단어 (캐시 미스)
/// - `Err(AppError::Database)`: 그 외 저장소 오류
pub async fn find_by_word(pool: &SqlitePool, key: &str) -> Result<Option<Word>, AppError> {
    let row = sqlx::query_as::<_, WordRow>(
        r#"
        SELECT id, word, phonetic, created_at, updated_at
        FROM words
        WHERE word = ?
        "#,
    )
    .bind(key)
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let phonetics = sqlx::query_as::<_, Phonetic>(
        "SELECT text, audio FROM phonetics WHERE word_id = ? ORDER BY position",
    )
    .bind(&row.id)
    .fetch_all(pool)
    .await?;

    let meaning_rows: Vec<(String, String)> = sqlx::query_as(
        "SELECT id, part_of_speech FROM meanings WHERE word_id = ? ORDER BY position",
    )
    .bind(&row.id)
    .fetch_all(pool)
    .await?;

    let definition_rows = sqlx::query_as::<_, DefinitionRow>(
        r#"
        SELECT d.id, d.meaning_id, d.definition, d.example
        FROM definitions d
        JOIN meanings m ON m.id = d.meaning_id
        WHERE m.word_id = ?
        ORDER BY d.meaning_id, d.position
        "#,
    )
    .bind(&row.id)
    .fetch_all(pool)
    .await?;

    // 의미 수준과 정의 수준의 유의어/반의어를 한 번에 가져옵니다
    let related_rows = sqlx::query_as::<_, RelatedRow>(
        r#"
        SELECT COALESCE(rt.meaning_id, rt.definition_id) AS owner_id, rt.relation, rt.term
        FROM related_terms rt
        LEFT JOIN definitions d ON d.id = rt.definition_id
        JOIN meanings m ON m.id = COALESCE(rt.meaning_id, d.meaning_id)
        WHERE m.word_id = ?
        ORDER BY rt.position
        "#,
    )
    .bind(&row.id)
    .fetch_all(pool)
    .await?;

    let source_urls: Vec<(String,)> =
        sqlx::query_as("SELECT url FROM source_urls WHERE word_id = ? ORDER BY position")
            .bind(&row.id)
            .fetch_all(pool)
            .await?;

    let mut related: RelatedTerms = HashMap::new();
    for r in related_rows {
        let entry = related.entry(r.owner_id).or_default();
        match r.relation.as_str() {
            "synonym" => entry.0.push(r.term),
            _ => entry.1.push(r.term),
        }
    }

    let mut definitions_by_meaning: HashMap<String, Vec<Definition>> = HashMap::new();
    for d in definition_rows {
        let (synonyms, antonyms) = related.remove(&d.id).unwrap_or_default();
        definitions_by_meaning
            .entry(d.meaning_id)
            .or_default()
            .push(Definition {
                definition: d.definition,
                example: d.example,
                synonyms,
                antonyms,
            });
    }

    let meanings = meaning_rows
        .into_iter()
        .map(|(id, part_of_speech)| {
            let (synonyms, antonyms) = related.remove(&id).unwrap_or_default();
            Meaning {
                part_of_speech,
                definitions: definitions_by_meaning.remove(&id).unwrap_or_default(),
                synonyms,
                antonyms,
            }
        })
        .collect();

    Ok(Some(Word {
        id: row.id,
        word: row.word,
        phonetic: row.phonetic,
        meanings,
        phonetics,
        source_urls: source_urls.into_iter().map(|(url,)| url).collect(),
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

/// 표제어가 이미 저장되어 있는지 확인합니다.
pub async fn word_exists(conn: &mut SqliteConnection, key: &str) -> Result<bool, sqlx::Error> {
    let row: Option<(String,)> = sqlx::query_as("SELECT id FROM words WHERE word = ?")
        .bind(key)
        .fetch_optional(conn)
        .await?;
    Ok(row.is_some())
}

/// 사전 항목 하나를 하위 구조까지 모두 저장합니다 (단일 트랜잭션).
///
/// 도중에 실패하면 트랜잭션이 롤백되어 일부만 저장된 항목은 남지 않습니다.
pub async fn save_word(pool: &SqlitePool, word: &Word) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    insert_word(&mut *tx, word).await?;
    tx.commit().await
}

/// 호출자가 연 트랜잭션 안에서 사전 항목을 삽입합니다.
pub async fn insert_word(conn: &mut SqliteConnection, word: &Word) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO words (id, word, phonetic, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&word.id)
    .bind(&word.word)
    .bind(&word.phonetic)
    .bind(&word.created_at)
    .bind(&word.updated_at)
    .execute(&mut *conn)
    .await?;

    for (position, p) in word.phonetics.iter().enumerate() {
        sqlx::query(
            "INSERT INTO phonetics (id, word_id, position, text, audio) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(new_id())
        .bind(&word.id)
        .bind(position as i64)
        .bind(&p.text)
        .bind(&p.audio)
        .execute(&mut *conn)
        .await?;
    }

    for (position, m) in word.meanings.iter().enumerate() {
        let meaning_id = new_id();
        sqlx::query(
            "INSERT INTO meanings (id, word_id, position, part_of_speech) VALUES (?, ?, ?, ?)",
        )
        .bind(&meaning_id)
        .bind(&word.id)
        .bind(position as i64)
        .bind(&m.part_of_speech)
        .execute(&mut *conn)
        .await?;

        insert_related(conn, Owner::Meaning(&meaning_id), &m.synonyms, &m.antonyms).await?;

        for (position, d) in m.definitions.iter().enumerate() {
            let definition_id = new_id();
            sqlx::query(
                r#"
                INSERT INTO definitions (id, meaning_id, position, definition, example)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(&definition_id)
            .bind(&meaning_id)
            .bind(position as i64)
            .bind(&d.definition)
            .bind(&d.example)
            .execute(&mut *conn)
            .await?;

            insert_related(
                conn,
                Owner::Definition(&definition_id),
                &d.synonyms,
                &d.antonyms,
            )
            .await?;
        }
    }

    for (position, url) in word.source_urls.iter().enumerate() {
        sqlx::query("INSERT INTO source_urls (id, word_id, position, url) VALUES (?, ?, ?, ?)")
            .bind(new_id())
            .bind(&word.id)
            .bind(position as i64)
            .bind(url)
            .execute(&mut *conn)
            .await?;
    }

    Ok(())
}

enum Owner<'a> {
    Meaning(&'a str),
    Definition(&'a str),
}

async fn insert_related(
    conn: &mut SqliteConnection,
    owner: Owner<'_>,
    synonyms: &[String],
    antonyms: &[String],
) -> Result<(), sqlx::Error> {
    let (meaning_id, definition_id) = match owner {
        Owner::Meaning(id) => (Some(id), None),
        Owner::Definition(id) => (None, Some(id)),
    };

    let terms = synonyms
        .iter()
        .map(|t| ("synonym", t))
        .chain(antonyms.iter().map(|t| ("antonym", t)));

    for (position, (relation, term)) in terms.enumerate() {
        sqlx::query(
            r#"
            INSERT INTO related_terms (id, meaning_id, definition_id, relation, position, term)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(new_id())
        .bind(meaning_id)
        .bind(definition_id)
        .bind(relation)
        .bind(position as i64)
        .bind(term)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

fn new_id() -> String {
    uuid::Uuid::now_v7().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{memory_pool, sample_word};

    #[tokio::test]
    async fn missing_word_is_a_miss_not_an_error() {
        let pool = memory_pool().await;
        assert!(find_by_word(&pool, "ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn saved_word_is_reconstructed_in_full() {
        let pool = memory_pool().await;
        let word = sample_word("lucid");
        save_word(&pool, &word).await.unwrap();

        let stored = find_by_word(&pool, "lucid").await.unwrap().unwrap();
        assert_eq!(stored, word);
    }

    #[tokio::test]
    async fn duplicate_headword_rolls_back_everything() {
        let pool = memory_pool().await;
        save_word(&pool, &sample_word("lucid")).await.unwrap();

        let err = save_word(&pool, &sample_word("lucid")).await.unwrap_err();
        assert!(matches!(
            AppError::from_insert(err, "word"),
            AppError::Conflict(_)
        ));

        let (meanings,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM meanings")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(meanings, 2);
    }
}
