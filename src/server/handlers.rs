//! Route handlers for the object collection.

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use tokio_util::io::ReaderStream;

use super::AppState;
use crate::error::{HttpStatusError, StoreError};
use crate::models::{Resource, ResourceList};
use crate::sse::{write_frames, EVENT_STREAM_MIME};
use crate::watch::{list_watch, Selector, WatchStream};

/// Request header naming the target namespace.
pub const NAMESPACE_HEADER: &str = "x-namespace";

pub const DEFAULT_NAMESPACE: &str = "default";

/// Bytes buffered between the frame writer and the response body.
const STREAM_PIPE_BYTES: usize = 64 * 1024;

impl From<StoreError> for HttpStatusError {
    fn from(err: StoreError) -> Self {
        let code = match &err {
            StoreError::NotFound { .. } => 404,
            StoreError::InvalidCursor(_) => 400,
            StoreError::Expired { .. } => 410,
            StoreError::Backend(_) => 500,
        };
        HttpStatusError::new(code, err.to_string())
    }
}

impl IntoResponse for HttpStatusError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::warn!(code = self.code, message = %self.message, "Request failed");
        }
        (status, self.message).into_response()
    }
}

fn selector(headers: &HeaderMap) -> Selector {
    let namespace = headers
        .get(NAMESPACE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|ns| !ns.is_empty())
        .unwrap_or(DEFAULT_NAMESPACE);
    Selector::namespace(namespace)
}

fn wants_event_stream(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|accept| accept.contains(EVENT_STREAM_MIME))
        .unwrap_or(false)
}

/// `GET /objects`: a JSON list, or the merged list+watch as an event stream.
pub async fn list_objects(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, HttpStatusError> {
    let selector = selector(&headers);

    if !wants_event_stream(&headers) {
        let snapshot = state.store.list(&selector).await?;
        return Ok(Json(ResourceList {
            items: snapshot.items,
            resource_version: snapshot.cursor.0,
        })
        .into_response());
    }

    let events = list_watch(
        state.store.as_ref(),
        &selector,
        &state.shutdown,
        state.config.watch_buffer,
    )
    .await?;
    tracing::debug!(namespace = %selector.namespace, "Streaming watch");

    Ok((
        [
            (header::CONTENT_TYPE, EVENT_STREAM_MIME),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        event_body(events),
    )
        .into_response())
}

/// Response body fed by a task that writes one flushed frame per event.
///
/// The task ends with the watch, or on its first write after the client
/// disconnects, dropping the watch and its subscription.
fn event_body(events: WatchStream<Resource>) -> Body {
    let (writer, reader) = tokio::io::duplex(STREAM_PIPE_BYTES);
    tokio::spawn(async move {
        if let Err(e) = write_frames(events, writer).await {
            tracing::debug!(error = %e, "Watch client went away");
        }
    });
    Body::from_stream(ReaderStream::new(reader))
}

/// `GET /objects/{name}`
pub async fn get_object(
    State(state): State<AppState>,
    Path(name): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Resource>, HttpStatusError> {
    let resource = state.store.get(&selector(&headers), &name).await?;
    Ok(Json(resource))
}

/// `PUT /objects/{name}`: create or replace.
pub async fn put_object(
    State(state): State<AppState>,
    Path(name): Path<String>,
    headers: HeaderMap,
    Json(resource): Json<Resource>,
) -> Result<Json<Resource>, HttpStatusError> {
    let stored = state.store.put(&selector(&headers), &name, resource).await?;
    tracing::debug!(name = %stored.name, version = %stored.resource_version, "Stored object");
    Ok(Json(stored))
}

/// `DELETE /objects/{name}`: deleting a missing object succeeds.
pub async fn delete_object(
    State(state): State<AppState>,
    Path(name): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, HttpStatusError> {
    match state.store.delete(&selector(&headers), &name).await {
        Ok(_) => Ok(StatusCode::NO_CONTENT),
        Err(e) if e.is_not_found() => Ok(StatusCode::NO_CONTENT),
        Err(e) => Err(e.into()),
    }
}
