//! Per-session request serialization.
//!
//! The session layer loads a visitor's record when a request starts and
//! writes the whole record back when it ends. Two overlapping requests from
//! the same visitor would each write their own copy and the later write
//! wins. This middleware holds a per-session-id lock for the full request,
//! so it must sit outside the session layer.
//!
//! Requests without a session cookie are not serialized.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::COOKIE},
    middleware::Next,
    response::Response,
};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tower_sessions::cookie::Cookie;

use super::session::SESSION_COOKIE_NAME;

type LockMap = HashMap<String, Arc<AsyncMutex<()>>>;

/// Registry of per-session locks.
///
/// Entries are created on first use and removed once no request holds or
/// waits on them.
#[derive(Clone, Default)]
pub struct SessionLocks {
    inner: Arc<Mutex<LockMap>>,
}

impl SessionLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until no other request holds the lock for `session_id`.
    pub async fn acquire(&self, session_id: &str) -> SessionLockGuard {
        let lock = Arc::clone(self.map().entry(session_id.to_owned()).or_default());
        let guard = lock.lock_owned().await;

        SessionLockGuard {
            locks: self.clone(),
            session_id: session_id.to_owned(),
            guard: Some(guard),
        }
    }

    /// Number of sessions with a live lock.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn map(&self) -> MutexGuard<'_, LockMap> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Held for the duration of one request.
pub struct SessionLockGuard {
    locks: SessionLocks,
    session_id: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for SessionLockGuard {
    fn drop(&mut self) {
        // Clones are only taken under the map lock, so the count is exact here
        let mut map = self.locks.map();
        drop(self.guard.take());
        if map
            .get(&self.session_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            map.remove(&self.session_id);
        }
    }
}

/// Middleware that runs requests for the same session one at a time.
pub async fn serialize_session(
    State(locks): State<SessionLocks>,
    request: Request,
    next: Next,
) -> Response {
    let Some(session_id) = session_cookie(request.headers()) else {
        return next.run(request).await;
    };

    let _guard = locks.acquire(&session_id).await;
    next.run(request).await
}

/// Session id from the request's `Cookie` headers.
fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .map(|cookie| cookie.value().to_owned())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_session_cookie_found_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; shopfront_session=abc123; lang=en"),
        );

        assert_eq!(session_cookie(&headers).as_deref(), Some("abc123"));
    }

    #[test]
    fn test_session_cookie_across_headers() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("theme=dark"));
        headers.append(COOKIE, HeaderValue::from_static("shopfront_session=xyz"));

        assert_eq!(session_cookie(&headers).as_deref(), Some("xyz"));
    }

    #[test]
    fn test_no_session_cookie() {
        let mut headers = HeaderMap::new();
        assert_eq!(session_cookie(&headers), None);

        headers.insert(COOKIE, HeaderValue::from_static("theme=dark"));
        assert_eq!(session_cookie(&headers), None);
    }

    #[tokio::test]
    async fn test_same_session_waits_for_release() {
        let locks = SessionLocks::new();
        let first = locks.acquire("visitor").await;

        let blocked = tokio::time::timeout(Duration::from_millis(50), locks.acquire("visitor")).await;
        assert!(blocked.is_err());

        drop(first);
        let second = tokio::time::timeout(Duration::from_secs(1), locks.acquire("visitor")).await;
        assert!(second.is_ok());
    }

    #[tokio::test]
    async fn test_other_sessions_do_not_wait() {
        let locks = SessionLocks::new();
        let _first = locks.acquire("alice").await;

        let other = tokio::time::timeout(Duration::from_millis(50), locks.acquire("bob")).await;
        assert!(other.is_ok());
    }

    #[tokio::test]
    async fn test_released_locks_are_removed() {
        let locks = SessionLocks::new();

        let guard = locks.acquire("visitor").await;
        assert_eq!(locks.len(), 1);

        drop(guard);
        assert!(locks.is_empty());
    }
}
