//! HTTP surface over an object store.
//!
//! Serves one resource collection:
//!
//! | Route | Behavior |
//! |-------|----------|
//! | `GET /objects` | JSON list, or list+watch frames with `Accept: text/event-stream` |
//! | `GET /objects/{name}` | one object, 404 when absent |
//! | `PUT /objects/{name}` | create or replace |
//! | `DELETE /objects/{name}` | 204, also when absent |
//!
//! The namespace comes from the `X-Namespace` header.

mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::get,
    Router,
};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};

use crate::config::ServerConfig;
use crate::models::Resource;
use crate::traits::ObjectStore;

pub use handlers::{DEFAULT_NAMESPACE, NAMESPACE_HEADER};

/// Shared state for request handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ObjectStore<Resource>>,
    pub config: ServerConfig,
    /// Parent of every watch stream's token
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(store: Arc<dyn ObjectStore<Resource>>, config: ServerConfig, shutdown: CancellationToken) -> Self {
        Self {
            store,
            config,
            shutdown,
        }
    }
}

/// Build the router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/objects", get(handlers::list_objects))
        .route(
            "/objects/:name",
            get(handlers::get_object)
                .put(handlers::put_object)
                .delete(handlers::delete_object),
        )
        .layer(DefaultBodyLimit::max(state.config.body_limit))
        .layer(cors)
        .with_state(state)
}

/// Bind `state.config.addr` and serve until `state.shutdown` fires.
///
/// Returns the server task and the bound address, which differs from the
/// configured one when binding port 0.
pub async fn serve(state: AppState) -> color_eyre::Result<(JoinHandle<()>, SocketAddr)> {
    let listener = tokio::net::TcpListener::bind(state.config.addr).await?;
    let actual_addr = listener.local_addr()?;
    let shutdown = state.shutdown.clone();
    let app = router(state);

    tracing::info!("Listening on http://{}", actual_addr);

    let handle = tokio::spawn(async move {
        let result = axum::serve(listener, app)
            .with_graceful_shutdown(async move { shutdown.cancelled().await })
            .await;
        if let Err(e) = result {
            tracing::error!("Server error: {}", e);
        }
    });

    Ok((handle, actual_addr))
}
