//! End-to-end: server, frame encoding, transport and decoding over a real socket.

mod common;

use common::{next_item, next_ok, resource, TestServer};
use listwatch::config::ServerConfig;
use listwatch::models::{Resource, ResourceList};
use listwatch::watch::ChangeEvent;
use serde_json::json;
use tokio_util::sync::CancellationToken;

const TEAM: [&str; 2] = ["X-Namespace", "team"];

fn summary(event: &ChangeEvent<Resource>) -> (&'static str, String) {
    (event.kind(), event.object().name.clone())
}

#[tokio::test]
async fn test_watch_streams_snapshot_then_changes() {
    let server = TestServer::start().await;
    let client = server.client();

    for name in ["a", "b"] {
        client
            .put_json::<_, Resource>(&format!("/objects/{}", name), &resource(name, json!({})), &TEAM)
            .await
            .unwrap();
    }

    let cancel = CancellationToken::new();
    let mut events = client
        .watch::<ChangeEvent<Resource>>("/objects", &TEAM, &cancel)
        .await
        .unwrap();

    assert_eq!(summary(&next_ok(&mut events).await), ("ADDED", "a".to_string()));
    assert_eq!(summary(&next_ok(&mut events).await), ("ADDED", "b".to_string()));

    client
        .put_json::<_, Resource>("/objects/a", &resource("a", json!({"v": 2})), &TEAM)
        .await
        .unwrap();
    client.delete("/objects/b", &TEAM).await.unwrap();

    let modified = next_ok(&mut events).await;
    assert_eq!(summary(&modified), ("MODIFIED", "a".to_string()));
    assert_eq!(modified.object().data, json!({"v": 2}));
    assert_eq!(modified.object().resource_version, "3");
    assert_eq!(summary(&next_ok(&mut events).await), ("DELETED", "b".to_string()));
}

#[tokio::test]
async fn test_watch_is_scoped_to_namespace() {
    let server = TestServer::start().await;
    let client = server.client();

    let cancel = CancellationToken::new();
    let mut events = client
        .watch::<ChangeEvent<Resource>>("/objects", &TEAM, &cancel)
        .await
        .unwrap();
    server.wait_for_watchers(1).await;

    // No header means the default namespace.
    client
        .put_json::<_, Resource>("/objects/elsewhere", &resource("elsewhere", json!({})), &[])
        .await
        .unwrap();
    client
        .put_json::<_, Resource>("/objects/here", &resource("here", json!({})), &TEAM)
        .await
        .unwrap();

    let event = next_ok(&mut events).await;
    assert_eq!(summary(&event), ("ADDED", "here".to_string()));
    assert_eq!(event.object().namespace, "team");
}

#[tokio::test]
async fn test_json_list_and_point_operations() {
    let server = TestServer::start().await;
    let client = server.client();

    let stored: Resource = client
        .put_json("/objects/a", &resource("a", json!([1, 2])), &[])
        .await
        .unwrap();
    assert_eq!(stored.namespace, "default");
    assert_eq!(stored.resource_version, "1");
    assert!(stored.created_at.is_some());

    let fetched: Resource = client.get_json("/objects/a", &[]).await.unwrap();
    assert_eq!(fetched, stored);

    let list: ResourceList = client.get_json("/objects", &[]).await.unwrap();
    assert_eq!(list.items, vec![stored]);
    assert_eq!(list.resource_version, "1");

    client.delete("/objects/a", &[]).await.unwrap();
    // Deleting again is not an error.
    client.delete("/objects/a", &[]).await.unwrap();

    let err = client
        .get_json::<Resource>("/objects/a", &[])
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "HTTP 404 error: resource a not found");
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let server = TestServer::start_with(ServerConfig::default().with_body_limit(64)).await;
    let client = server.client();

    let big = resource("big", json!("x".repeat(256)));
    let err = client
        .put_json::<_, Resource>("/objects/big", &big, &[])
        .await
        .unwrap_err();
    assert!(err.is_http_code(413));
}

#[tokio::test]
async fn test_dropping_client_stream_releases_server_watch() {
    let server = TestServer::start().await;
    let client = server.client();

    let cancel = CancellationToken::new();
    let events = client
        .watch::<ChangeEvent<Resource>>("/objects", &[], &cancel)
        .await
        .unwrap();
    server.wait_for_watchers(1).await;

    drop(events);

    // The server may only notice the closed connection when it next writes.
    let deadline = tokio::time::Instant::now() + common::STEP_TIMEOUT;
    let mut n = 0;
    while server.store.watcher_count() != 0 {
        assert!(tokio::time::Instant::now() < deadline, "server watch was not released");
        n += 1;
        client
            .put_json::<_, Resource>(&format!("/objects/n{}", n), &resource("n", json!(n)), &[])
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    assert!(!cancel.is_cancelled());
}

#[tokio::test]
async fn test_server_shutdown_ends_client_stream() {
    let server = TestServer::start().await;
    let client = server.client();

    let cancel = CancellationToken::new();
    let mut events = client
        .watch::<ChangeEvent<Resource>>("/objects", &[], &cancel)
        .await
        .unwrap();
    server.wait_for_watchers(1).await;

    server.shutdown.cancel();
    assert_eq!(next_item(&mut events).await, None);
}
