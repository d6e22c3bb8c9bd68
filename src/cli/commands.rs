//! Command runners.

use std::net::SocketAddr;
use std::sync::Arc;

use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use tokio_util::sync::CancellationToken;

use crate::adapters::MemoryStore;
use crate::client::ApiClient;
use crate::config::{ClientConfig, ServerConfig};
use crate::envelope::Envelope;
use crate::models::Resource;
use crate::server::{self, AppState, NAMESPACE_HEADER};
use crate::watch::ChangeEvent;

fn object_path(name: &str) -> String {
    format!("/objects/{}", urlencoding::encode(name))
}

fn namespace_headers(namespace: &Option<String>) -> Vec<&str> {
    match namespace {
        Some(ns) => vec![NAMESPACE_HEADER, ns.as_str()],
        None => Vec::new(),
    }
}

/// Cancel `token` on Ctrl-C.
fn cancel_on_ctrl_c(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted, shutting down");
            token.cancel();
        }
    });
}

pub async fn serve(addr: Option<SocketAddr>) -> Result<()> {
    let mut config = ServerConfig::from_env();
    if let Some(addr) = addr {
        config = config.with_addr(addr);
    }

    let store = MemoryStore::<Resource>::new(config.history_limit).with_kind("resource");
    let shutdown = CancellationToken::new();
    cancel_on_ctrl_c(shutdown.clone());

    let (handle, _addr) = server::serve(AppState::new(Arc::new(store), config, shutdown)).await?;
    handle.await.wrap_err("server task failed")?;
    Ok(())
}

pub async fn get(name: &str, namespace: &Option<String>) -> Result<()> {
    let client = ApiClient::new(ClientConfig::from_env());
    let resource: Resource = client
        .get_json(&object_path(name), &namespace_headers(namespace))
        .await?;
    println!("{}", serde_json::to_string_pretty(&resource)?);
    Ok(())
}

pub async fn put(name: &str, data: &str, namespace: &Option<String>) -> Result<()> {
    let data: serde_json::Value =
        serde_json::from_str(data).wrap_err("object data must be valid JSON")?;
    let client = ApiClient::new(ClientConfig::from_env());
    let stored: Resource = client
        .put_json(
            &object_path(name),
            &Resource::new(name, data),
            &namespace_headers(namespace),
        )
        .await?;
    println!("{}", serde_json::to_string_pretty(&stored)?);
    Ok(())
}

pub async fn delete(name: &str, namespace: &Option<String>) -> Result<()> {
    let client = ApiClient::new(ClientConfig::from_env());
    client
        .delete(&object_path(name), &namespace_headers(namespace))
        .await?;
    Ok(())
}

pub async fn watch(namespace: &Option<String>) -> Result<()> {
    let client = ApiClient::new(ClientConfig::from_env());
    let cancel = CancellationToken::new();
    cancel_on_ctrl_c(cancel.clone());

    let mut events = client
        .watch::<ChangeEvent<Resource>>("/objects", &namespace_headers(namespace), &cancel)
        .await?;

    while let Some(envelope) = events.recv().await {
        match envelope {
            Envelope::Ok(event) => {
                let object = event.object();
                println!(
                    "{:<9} {}/{} {} {}",
                    event.kind(),
                    object.namespace,
                    object.name,
                    object.resource_version,
                    object.data
                );
            }
            Envelope::DecodeError(message) => {
                tracing::warn!(%message, "Skipping undecodable event");
            }
            Envelope::Interrupted(message) => {
                return Err(eyre!("watch interrupted: {}", message));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_path_encodes_name() {
        assert_eq!(object_path("a"), "/objects/a");
        assert_eq!(object_path("a b/c"), "/objects/a%20b%2Fc");
    }

    #[test]
    fn test_namespace_headers() {
        assert!(namespace_headers(&None).is_empty());
        assert_eq!(
            namespace_headers(&Some("team".to_string())),
            vec![NAMESPACE_HEADER, "team"]
        );
    }
}
