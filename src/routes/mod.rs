//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 받아 서비스 계층을 호출하고 JSON으로 응답하는 핸들러들입니다.
//!
//! 각 하위 모듈:
//! - `auth`: 로그인, 로그아웃, 현재 사용자
//! - `users`: 사용자 생성, 내 정보, 학습 통계
//! - `words`: 사전 조회, 학습 목록 추가/조회
//! - `review`: 복습 예정 단어, 복습 제출, 복습 이력
//! - `health`: 서버 상태 확인

pub mod auth;
pub mod health;
pub mod review;
pub mod users;
pub mod words;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use sqlx::SqlitePool;

use crate::services::resolver::WordResolver;
use crate::services::session_store::SessionStore;

/// 애플리케이션 공유 상태
///
/// 모든 요청 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// 필드는 모두 `Arc` 또는 내부적으로 `Arc`인 타입이라 clone 비용이 작습니다.
#[derive(Clone)]
pub struct AppState {
    /// SQLite 연결 풀
    pub pool: SqlitePool,
    /// 로그인 세션 레지스트리 (프로세스 메모리)
    pub sessions: Arc<SessionStore>,
    /// 로컬 DB → 외부 사전 순서로 단어를 찾는 조회기
    pub resolver: Arc<WordResolver>,
    /// 세션 쿠키 `Max-Age` (초)
    pub session_ttl_secs: i64,
    /// 세션 쿠키 `Secure` 속성
    pub cookie_secure: bool,
}

/// `/api` 아래에 중첩될 라우터를 만듭니다.
pub fn api_router(state: AppState) -> Router {
    // 인증 없이 접근 가능한 라우트
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/users", post(users::create_user));

    // 핸들러가 `AuthUser`를 요구하는 라우트. GET /words/{word}만 예외로 공개입니다.
    let protected_routes = Router::new()
        .route("/auth/me", get(auth::me))
        .route("/user", get(users::get_user))
        .route("/user/stats", get(users::get_user_stats))
        .route("/words", get(words::list_words))
        .route("/words/{word}", get(words::get_word).post(words::add_word))
        .route("/review", get(review::due_words))
        .route("/review/{word}", post(review::submit_review))
        .route("/review/{word}/history", get(review::review_history));

    // .merge(): 두 라우터의 라우트를 합칩니다.
    // .with_state(): 모든 핸들러가 State<AppState>로 공유 상태에 접근하게 합니다.
    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{memory_pool, FakeDictionary};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn app() -> Router {
        let pool = memory_pool().await;
        let state = AppState {
            pool: pool.clone(),
            sessions: Arc::new(SessionStore::new(chrono::Duration::hours(24))),
            resolver: Arc::new(WordResolver::new(
                pool,
                Arc::new(FakeDictionary::with_words(&["lucid", "terse"])),
            )),
            session_ttl_secs: 86400,
            cookie_secure: false,
        };
        Router::new().nest("/api", api_router(state))
    }

    fn request(method: &str, uri: &str, cookie: Option<&str>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Option<String>, Value) {
        let response = app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, set_cookie, body)
    }

    /// 로그인하고 `Cookie` 헤더 값을 돌려줍니다.
    async fn login(app: &Router, username: &str) -> String {
        let (status, set_cookie, body) = send(
            app,
            request("POST", "/api/auth/login", None, Some(json!({ "username": username }))),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["username"], username);
        let set_cookie = set_cookie.unwrap();
        assert!(set_cookie.contains("HttpOnly"));
        set_cookie.split(';').next().unwrap().to_string()
    }

    #[tokio::test]
    async fn health_is_public() {
        let app = app().await;
        let (status, _, body) = send(&app, request("GET", "/api/health", None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn protected_routes_require_a_session() {
        let app = app().await;
        let (status, _, body) = send(&app, request("GET", "/api/review", None, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "unauthorized");

        let (status, _, _) = send(
            &app,
            request("GET", "/api/user", Some("words_session=forged"), None),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn public_word_lookup() {
        let app = app().await;
        let (status, _, body) = send(&app, request("GET", "/api/words/LUCID", None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["word"], "lucid");
        assert!(body["sourceUrls"].is_array());

        let (status, _, body) = send(&app, request("GET", "/api/words/zzyzx", None, None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "not_found");
    }

    #[tokio::test]
    async fn study_and_review_flow() {
        let app = app().await;
        let cookie = login(&app, "learner").await;

        let (status, _, body) = send(&app, request("POST", "/api/words/lucid", Some(&cookie), None)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["status"], "learning");

        let (_, _, body) = send(&app, request("GET", "/api/words?status=learning", Some(&cookie), None)).await;
        assert_eq!(body["count"], 1);

        let (status, _, _) = send(&app, request("GET", "/api/words?status=bogus", Some(&cookie), None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _, body) = send(
            &app,
            request("POST", "/api/review/lucid", Some(&cookie), Some(json!({ "quality": 9 }))),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "invalid_quality");

        let (status, _, body) = send(
            &app,
            request("POST", "/api/review/lucid", Some(&cookie), Some(json!({ "quality": 5 }))),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["interval_days"], 6);

        let (status, _, body) = send(
            &app,
            request("POST", "/api/review/terse", Some(&cookie), Some(json!({ "quality": 5 }))),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "not_in_study_list");

        let (_, _, body) = send(&app, request("GET", "/api/review/lucid/history", Some(&cookie), None)).await;
        assert_eq!(body["count"], 1);

        let (_, _, body) = send(&app, request("GET", "/api/user/stats", Some(&cookie), None)).await;
        assert_eq!(body["total_words"], 1);
        assert_eq!(body["reviewing"], 1);
        assert_eq!(body["current_streak"], 1);
    }

    #[tokio::test]
    async fn logout_ends_the_session() {
        let app = app().await;
        let cookie = login(&app, "leaver").await;

        let (status, _, body) = send(&app, request("GET", "/api/auth/me", Some(&cookie), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["username"], "leaver");

        let (status, set_cookie, _) = send(&app, request("POST", "/api/auth/logout", Some(&cookie), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(set_cookie.unwrap().contains("Max-Age=0"));

        let (status, _, _) = send(&app, request("GET", "/api/auth/me", Some(&cookie), None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        // 두 번째 로그아웃도 성공
        let (status, _, _) = send(&app, request("POST", "/api/auth/logout", Some(&cookie), None)).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn duplicate_user_is_a_conflict() {
        let app = app().await;
        let body = Some(json!({ "username": "twin" }));
        let (status, _, _) = send(&app, request("POST", "/api/users", None, body.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, _, body) = send(&app, request("POST", "/api/users", None, body)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "conflict");
    }
}
