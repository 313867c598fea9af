//! Session middleware configuration.
//!
//! The session is the visitor's durable storage. Production uses a `SQLite`
//! backed store so carts survive restarts; tests plug in `MemoryStore`.

use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};
use tower_sessions_sqlx_store::SqliteStore;

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "shopfront_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Open the session database and make sure the sessions table exists.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or migrated.
pub async fn create_session_store(database_url: &str) -> Result<(SqlitePool, SqliteStore), sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    let store = SqliteStore::new(pool.clone());
    store.migrate().await?;

    Ok((pool, store))
}

/// Create the session layer over any session store.
///
/// # Arguments
///
/// * `store` - Session store backend
/// * `config` - Storefront configuration (for cookie security)
#[must_use]
pub fn create_session_layer<S>(store: S, config: &StorefrontConfig) -> SessionManagerLayer<S>
where
    S: SessionStore + Clone,
{
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
