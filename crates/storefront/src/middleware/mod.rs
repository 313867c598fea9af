//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Session lock (one request at a time per session)
//! 5. Session layer (tower-sessions with `SQLite` store)
//!
//! The image proxy and static assets sit outside 4 and 5.
//!
//! [`SessionCart`] is an extractor rather than a layer: only handlers that
//! touch the cart open it.

pub mod cart;
pub mod request_id;
pub mod session;
pub mod session_lock;

pub use cart::SessionCart;
pub use request_id::request_id_middleware;
pub use session::{create_session_layer, create_session_store};
pub use session_lock::{SessionLocks, serialize_session};
