//! # 복습 라우트 핸들러
//!
//! ## 엔드포인트
//! - `GET  /api/review`                → 지금 복습할 단어 (가장 오래 밀린 것부터)
//! - `POST /api/review/{word}`         → 복습 결과 제출 `{ "quality": 0..=5 }`
//! - `GET  /api/review/{word}/history` → 복습 이력 (최신순)

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::error::AppError;
use crate::middleware::auth::AuthUser;
use crate::models::*;
use crate::routes::AppState;
use crate::services::review;

pub async fn due_words(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Value>, AppError> {
    // next_review_date <= 지금 인 단어만, 가장 오래 밀린 것부터
    let words = review::due_words(&state.pool, &auth.user).await?;
    Ok(Json(json!({
        "count": words.len(),
        "words": words,
    })))
}

pub async fn submit_review(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(word): Path<String>,
    Json(req): Json<ReviewRequest>,
) -> Result<Json<UserWord>, AppError> {
    // Json 추출기는 본문을 소비하므로 항상 마지막 매개변수여야 합니다.
    // 품질 점수 범위 검사(0~5)와 학습 목록 확인은 서비스 계층에서 수행합니다.
    let updated = review::submit_review(&state.pool, &auth.user, &word, req.quality).await?;
    Ok(Json(updated))
}

pub async fn review_history(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(word): Path<String>,
) -> Result<Json<Value>, AppError> {
    // 최신 복습이 먼저 오도록 정렬되어 있습니다
    let history = review::review_history(&state.pool, &auth.user, &word).await?;
    Ok(Json(json!({
        "count": history.len(),
        "history": history,
    })))
}
