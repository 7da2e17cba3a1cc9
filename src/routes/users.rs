//! # 사용자 라우트 핸들러
//!
//! ## 엔드포인트
//! - `POST /api/users`      → 사용자 생성 (중복이면 409)
//! - `GET  /api/user`       → 내 정보
//! - `GET  /api/user/stats` → 학습 통계

use axum::{extract::State, http::StatusCode, Json};

use crate::error::AppError;
use crate::middleware::auth::AuthUser;
use crate::models::*;
use crate::routes::AppState;
use crate::services::users;

pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    // 형식 검증과 중복 검사(409)는 서비스 계층이 담당합니다
    let user = users::create_user(&state.pool, &req.username).await?;
    // (상태 코드, 본문) 튜플로 201 Created를 반환
    Ok((StatusCode::CREATED, Json(user)))
}

/// 세션에 담긴 사용자 대신 DB의 최신 행을 돌려줍니다.
pub async fn get_user(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<User>, AppError> {
    let user = users::get_user(&state.pool, &auth.user.username).await?;
    Ok(Json(user))
}

pub async fn get_user_stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<UserStats>, AppError> {
    // 연속 학습일 계산이 실패해도 통계 자체는 실패하지 않습니다 (streak = 0)
    let stats = users::user_stats(&state.pool, &auth.user).await?;
    Ok(Json(stats))
}
