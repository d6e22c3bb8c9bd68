//! Common test utilities for integration tests.
//!
//! # Example
//!
//! ```ignore
//! let server = TestServer::start().await;
//! let client = server.client();
//! client.put_json::<_, Resource>("/objects/a", &resource("a", json!({})), &[]).await?;
//! ```

#![allow(dead_code)]

pub mod mocks;

pub use mocks::*;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use listwatch::adapters::MemoryStore;
use listwatch::client::ApiClient;
use listwatch::config::{ClientConfig, ServerConfig};
use listwatch::envelope::Envelope;
use listwatch::handoff::TaskStream;
use listwatch::models::Resource;
use listwatch::server::{self, AppState};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// How long a test waits for one streamed item.
pub const STEP_TIMEOUT: Duration = Duration::from_secs(5);

pub fn resource(name: &str, data: serde_json::Value) -> Resource {
    Resource::new(name, data)
}

/// A running server over a fresh [`MemoryStore`] on an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub store: Arc<MemoryStore<Resource>>,
    pub shutdown: CancellationToken,
    pub handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with(ServerConfig::default()).await
    }

    pub async fn start_with(config: ServerConfig) -> Self {
        let config = config.with_addr("127.0.0.1:0".parse().unwrap());
        let store = Arc::new(MemoryStore::<Resource>::new(config.history_limit).with_kind("resource"));
        let shutdown = CancellationToken::new();
        let state = AppState::new(store.clone(), config, shutdown.clone());
        let (handle, addr) = server::serve(state).await.expect("Failed to start server");
        Self {
            addr,
            store,
            shutdown,
            handle,
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::new(ClientConfig::new(self.url()))
    }

    /// Wait until the store has exactly `count` live watchers.
    pub async fn wait_for_watchers(&self, count: usize) {
        let deadline = tokio::time::Instant::now() + STEP_TIMEOUT;
        while self.store.watcher_count() != count {
            assert!(
                tokio::time::Instant::now() < deadline,
                "expected {} watchers, have {}",
                count,
                self.store.watcher_count()
            );
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Receive the next item or panic after [`STEP_TIMEOUT`].
pub async fn next_item<T>(stream: &mut TaskStream<T>) -> Option<T> {
    tokio::time::timeout(STEP_TIMEOUT, stream.recv())
        .await
        .expect("timed out waiting for stream item")
}

/// Receive the next envelope and require it to be `Ok`.
pub async fn next_ok<T: std::fmt::Debug>(stream: &mut TaskStream<Envelope<T>>) -> T {
    match next_item(stream).await {
        Some(Envelope::Ok(value)) => value,
        other => panic!("expected decoded value, got {:?}", other),
    }
}
