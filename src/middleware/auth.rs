//! # 세션 쿠키 인증
//!
//! 로그인하면 `words_session` 쿠키에 세션 토큰이 담깁니다.
//! 인증이 필요한 핸들러는 매개변수에 `AuthUser`를 선언하기만 하면 됩니다.
//!
//! ```text
//! Cookie: words_session=<token>
//!   ├─ 쿠키 없음        → 401 unauthorized
//!   ├─ 알 수 없는 토큰  → 401 unauthorized
//!   ├─ 만료된 토큰      → 401 session_expired
//!   └─ 유효             → AuthUser { user }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::COOKIE, request::Parts, HeaderMap},
};

use crate::error::AppError;
use crate::models::User;
use crate::routes::AppState;

/// 세션 토큰을 담는 쿠키 이름
pub const SESSION_COOKIE: &str = "words_session";

/// 인증된 요청의 사용자
///
/// 로그아웃은 만료된 세션의 쿠키도 지워야 하므로 이 추출기 대신 `session_token`을 씁니다.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = session_token(&parts.headers)
            .ok_or_else(|| AppError::Unauthorized("authentication required".to_string()))?;

        let session = state.sessions.get_session(&token).map_err(|e| match e {
            AppError::NotFound(_) => AppError::Unauthorized("invalid or expired session".to_string()),
            other => other,
        })?;

        Ok(AuthUser { user: session.user })
    }
}

/// 요청 헤더의 `Cookie`들에서 세션 토큰을 찾습니다.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// 로그인 응답의 `Set-Cookie` 값
pub fn session_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
        SESSION_COOKIE, token, max_age_secs
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// 쿠키를 즉시 만료시키는 `Set-Cookie` 값
pub fn clear_session_cookie(secure: bool) -> String {
    session_cookie("", 0, secure)
}
