//! HTTP adapter - maps the `/contacts` resource onto a [`ContactStore`].
//!
//! Requires the `http` feature. Uses axum for routing.
//!
//! ## Routes
//!
//! - `GET /contacts` - all contacts, or `?title=` for the first exact title match.
//! - `POST /contacts` - create; `201` with `Location` and `ETag`, `409` on id conflict.
//! - `GET /contacts/:id` - read; honours `If-None-Match` (`304`) and `If-Match` (`412`).
//! - `PUT /contacts/:id` - full replace, conditional on `If-Match`.
//! - `PATCH /contacts/:id` - partial merge, conditional on `If-Match`.
//! - `DELETE /contacts/:id` - remove, conditional on `If-Match`.
//! - `GET /health` - `{ "ok": true, "contacts": n }`.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use contact_store::{http, InMemoryContactStore};
//!
//! let store = Arc::new(InMemoryContactStore::with_test_contact());
//!
//! // Get the router to compose with other axum routes
//! let app = http::router(store.clone());
//!
//! // Or serve directly
//! http::serve(store, "0.0.0.0:8080", std::future::pending()).await?;
//! ```

mod error;
mod handlers;

use std::future::Future;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tracing::info;

use crate::store::ContactStore;
use handlers::{
    create_contact, delete_contact, get_contact, health, list_contacts, patch_contact,
    replace_contact,
};

pub use error::ApiError;

/// Build an axum `Router` serving contacts from `store`.
pub fn router<S: ContactStore + 'static>(store: Arc<S>) -> Router {
    Router::new()
        .route("/health", get(health::<S>))
        .route(
            "/contacts",
            get(list_contacts::<S>).post(create_contact::<S>),
        )
        .route(
            "/contacts/:id",
            get(get_contact::<S>)
                .put(replace_contact::<S>)
                .patch(patch_contact::<S>)
                .delete(delete_contact::<S>),
        )
        .with_state(store)
}

/// Serve `store` over HTTP at `addr` (e.g. `"0.0.0.0:8080"`) until `shutdown`
/// resolves.
pub async fn serve<S, F>(store: Arc<S>, addr: &str, shutdown: F) -> Result<(), std::io::Error>
where
    S: ContactStore + 'static,
    F: Future<Output = ()> + Send + 'static,
{
    let app = router(store);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "contact service listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}
