//! # 인증 라우트 핸들러
//!
//! ## 엔드포인트
//! - `POST /api/auth/login`  → 사용자 이름으로 로그인 (없으면 생성), 세션 쿠키 발급
//! - `POST /api/auth/logout` → 세션 삭제, 쿠키 만료 (세션이 없어도 성공)
//! - `GET  /api/auth/me`     → 현재 로그인한 사용자

use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap},
    response::{AppendHeaders, IntoResponse},
    Json,
};
use serde_json::{json, Value};

use crate::error::AppError;
use crate::middleware::auth::{clear_session_cookie, session_cookie, session_token, AuthUser};
use crate::models::LoginRequest;
use crate::routes::AppState;
use crate::services::users;

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    // 비밀번호가 없으므로 사용자 이름만 검증합니다. 처음 보는 이름이면 사용자를 만듭니다.
    let user = users::get_or_create_user(&state.pool, &req.username).await?;
    // 세션은 프로세스 메모리에만 저장됩니다 (서버 재시작 시 모두 로그아웃)
    let session = state.sessions.create_session(user)?;
    tracing::info!(username = %session.user.username, "User logged in");

    // 토큰은 본문이 아니라 HttpOnly 쿠키로만 전달합니다
    let cookie = session_cookie(&session.token, state.session_ttl_secs, state.cookie_secure);
    // (헤더, 본문) 튜플도 IntoResponse를 구현하므로 그대로 반환할 수 있습니다
    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(json!({
            "user": session.user,
            "expires_at": session.expires_at,
        })),
    ))
}

/// 인증 추출기를 쓰지 않습니다. 만료되었거나 모르는 토큰이어도 쿠키는 지워야 하기 때문입니다.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    // 세션이 이미 없어도 에러가 아닙니다 (여러 번 호출해도 결과가 같음)
    if let Some(token) = session_token(&headers) {
        state.sessions.delete_session(&token);
    }

    // Max-Age=0 쿠키로 브라우저의 쿠키를 지웁니다

    (
        AppendHeaders([(SET_COOKIE, clear_session_cookie(state.cookie_secure))]),
        Json(json!({ "message": "Logged out successfully" })),
    )
}

/// 추출기가 이미 세션을 확인했으므로 DB를 조회하지 않습니다.
pub async fn me(auth: AuthUser) -> Json<Value> {
    Json(json!({ "user": auth.user }))
}
