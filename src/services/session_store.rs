//! # 로그인 세션 저장소
//!
//! 불투명한 토큰을 인증된 사용자에 대응시키는 프로세스 메모리 내 레지스트리입니다.
//! 세션은 DB에 저장되지 않으며, 서버가 재시작되면 모두 사라집니다.
//!
//! ## 동시성
//! - 내부 맵은 `RwLock`으로 감싸며 외부에 노출하지 않습니다.
//! - 조회는 읽기 잠금으로 동시에 수행되고, 생성/삭제/정리는 쓰기 잠금으로 상호 배제됩니다.
//! - 잠금을 쥔 채로 `.await` 하지 않으므로 표준 라이브러리 `RwLock`을 사용합니다.
//!
//! ## 만료
//! - 고정 만료: 생성 시각 + TTL. 조회해도 연장되지 않습니다.
//! - 만료된 세션은 조회 시 즉시 제거되고(lazy), 별도로 주기적인 정리 작업이 한 번에 제거합니다.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use rand_core::{OsRng, RngCore};
use serde::Serialize;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::error::AppError;
use crate::models::User;

/// 토큰 생성에 사용하는 난수 바이트 수
const TOKEN_BYTES: usize = 32;

/// 인증된 세션 하나
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    #[serde(skip_serializing)]
    pub token: String,
    pub user: User,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// 토큰 → 세션 레지스트리
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// 사용자에 대한 새 세션을 만들고 저장합니다.
    ///
    /// OS 난수원이 실패하는 경우에만 에러를 반환합니다.
    pub fn create_session(&self, user: User) -> Result<Session, AppError> {
        let token = generate_token()?;
        let now = Utc::now();
        let session = Session {
            token: token.clone(),
            user,
            created_at: now,
            expires_at: now + self.ttl,
        };

        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(token, session.clone());

        tracing::debug!(username = %session.user.username, "Session created");
        Ok(session)
    }

    /// 토큰으로 세션을 조회합니다.
    ///
    /// - 없으면 `NotFound("session")`
    /// - 만료되었으면 제거한 뒤 `SessionExpired`
    pub fn get_session(&self, token: &str) -> Result<Session, AppError> {
        let now = Utc::now();
        let session = self
            .sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(token)
            .cloned()
            .ok_or(AppError::NotFound("session"))?;

        if session.is_expired_at(now) {
            let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
            if sessions.get(token).is_some_and(|s| s.is_expired_at(now)) {
                sessions.remove(token);
            }
            return Err(AppError::SessionExpired);
        }

        Ok(session)
    }

    /// 세션을 제거합니다. 없어도 에러가 아닙니다.
    pub fn delete_session(&self, token: &str) {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(token);
    }

    /// 만료된 세션을 모두 제거하고 제거한 개수를 반환합니다.
    pub fn sweep_expired(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let before = sessions.len();
        sessions.retain(|_, session| session.expires_at >= now);
        before - sessions.len()
    }

    /// 현재 저장된 세션 수 (만료되었지만 아직 정리되지 않은 세션 포함)
    pub fn len(&self) -> usize {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// 주기적으로 만료 세션을 정리하는 백그라운드 작업을 시작합니다.
    ///
    /// 반환된 핸들의 `stop()`을 호출하면 작업이 종료됩니다.
    pub fn spawn_sweeper(self: &Arc<Self>, every: std::time::Duration) -> SweeperHandle {
        let store = Arc::clone(self);
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let start = tokio::time::Instant::now() + every;
            let mut ticker = tokio::time::interval_at(start, every);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let removed = store.sweep_expired();
                        if removed > 0 {
                            tracing::info!(removed, remaining = store.len(), "Expired sessions swept");
                        }
                    }
                    _ = &mut shutdown_rx => {
                        tracing::debug!("Session sweeper stopped");
                        break;
                    }
                }
            }
        });

        SweeperHandle {
            shutdown: Some(shutdown_tx),
            task,
        }
    }
}

/// 만료 세션 정리 작업의 수명 핸들
#[derive(Debug)]
pub struct SweeperHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// 정리 작업을 멈추고 종료될 때까지 기다립니다.
    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Err(e) = (&mut self.task).await {
            tracing::warn!("Session sweeper ended abnormally: {}", e);
        }
    }
}

impl Drop for SweeperHandle {
    fn drop(&mut self) {
        if self.shutdown.is_some() {
            self.task.abort();
        }
    }
}

/// 32바이트 OS 난수를 URL-safe base64 문자열로 인코딩합니다.
fn generate_token() -> Result<String, AppError> {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| AppError::Internal(format!("Secure random source failed: {}", e)))?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str) -> User {
        User {
            id: uuid::Uuid::now_v7().to_string(),
            username: name.to_string(),
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
        }
    }

    #[test]
    fn created_session_resolves_to_its_user() {
        let store = SessionStore::new(Duration::hours(24));
        let session = store.create_session(user("alice")).unwrap();

        let found = store.get_session(&session.token).unwrap();
        assert_eq!(found.user.username, "alice");
        assert_eq!(found.expires_at - found.created_at, Duration::hours(24));
    }

    #[test]
    fn tokens_are_url_safe_and_unique() {
        let store = SessionStore::new(Duration::hours(1));
        let a = store.create_session(user("alice")).unwrap().token;
        let b = store.create_session(user("alice")).unwrap().token;
        assert_ne!(a, b);
        // 32 bytes → 43 base64 chars without padding
        assert_eq!(a.len(), 43);
        assert!(a
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn unknown_token_is_not_found() {
        let store = SessionStore::new(Duration::hours(1));
        assert!(matches!(
            store.get_session("nope"),
            Err(AppError::NotFound("session"))
        ));
    }

    #[test]
    fn expired_session_is_rejected_and_evicted() {
        let store = SessionStore::new(Duration::seconds(-1));
        let session = store.create_session(user("bob")).unwrap();
        assert_eq!(store.len(), 1);

        assert!(matches!(
            store.get_session(&session.token),
            Err(AppError::SessionExpired)
        ));
        assert_eq!(store.len(), 0);
        assert!(matches!(
            store.get_session(&session.token),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn delete_is_idempotent() {
        let store = SessionStore::new(Duration::hours(1));
        let session = store.create_session(user("carol")).unwrap();
        store.delete_session(&session.token);
        store.delete_session(&session.token);
        assert!(store.get_session(&session.token).is_err());
    }

    #[test]
    fn sweep_removes_only_expired_sessions() {
        let live = SessionStore::new(Duration::hours(1));
        live.create_session(user("dave")).unwrap();
        assert_eq!(live.sweep_expired(), 0);
        assert_eq!(live.len(), 1);

        let stale = SessionStore::new(Duration::seconds(-5));
        stale.create_session(user("erin")).unwrap();
        stale.create_session(user("frank")).unwrap();
        assert_eq!(stale.sweep_expired(), 2);
        assert_eq!(stale.len(), 0);
    }

    #[tokio::test]
    async fn background_sweeper_reclaims_and_stops() {
        let store = Arc::new(SessionStore::new(Duration::seconds(-1)));
        store.create_session(user("gina")).unwrap();

        let sweeper = store.spawn_sweeper(std::time::Duration::from_millis(20));
        tokio::time::sleep(std::time::Duration::from_millis(120)).await;
        assert_eq!(store.len(), 0);

        sweeper.stop().await;
        assert_eq!(Arc::strong_count(&store), 1);
    }
}
