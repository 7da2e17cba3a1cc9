//! # 단어 라우트 핸들러
//!
//! ## 엔드포인트
//! - `GET  /api/words/{word}`     → 사전 조회 (공개, 필요하면 외부 사전에서 가져와 저장)
//! - `POST /api/words/{word}`     → 학습 목록에 추가
//! - `GET  /api/words?status=...` → 학습 목록 조회 (상태 필터 선택)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::error::AppError;
use crate::middleware::auth::AuthUser;
use crate::models::*;
use crate::routes::AppState;
use crate::services::vocabulary;

pub async fn get_word(
    State(state): State<AppState>,
    Path(word): Path<String>,
) -> Result<Json<Word>, AppError> {
    // 로컬 DB에 없으면 외부 사전에서 가져와 저장합니다.
    // 외부에도 없으면 404, 외부 사전 연결 실패는 502로 응답합니다.
    let word = state.resolver.resolve(&word).await?;
    Ok(Json(word))
}

pub async fn add_word(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(word): Path<String>,
) -> Result<(StatusCode, Json<UserWord>), AppError> {
    // &Arc<WordResolver>는 역참조로 &WordResolver가 됩니다
    let user_word = vocabulary::add_word(&state.pool, &state.resolver, &auth.user, &word).await?;
    Ok((StatusCode::CREATED, Json(user_word)))
}

pub async fn list_words(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListWordsQuery>,
) -> Result<Json<Value>, AppError> {
    // Query 추출기: `?status=learning` → ListWordsQuery { status: Some("learning") }
    // 알 수 없는 상태 값은 서비스 계층에서 400으로 거부합니다.
    let words = vocabulary::list_words(&state.pool, &auth.user, query.status.as_deref()).await?;
    Ok(Json(json!({
        "count": words.len(),
        "words": words,
    })))
}
