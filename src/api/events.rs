//! Server-sent event stream of snapshots and notifications

use std::{sync::Arc, time::Duration};
use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{self, Stream};
use tokio::sync::{broadcast::error::RecvError, watch};
use tracing::{debug, warn};

use crate::state::{AppState, Notification, Snapshot};

/// Handle GET /events - Stream `snapshot` and `notification` events
///
/// The current snapshot is sent immediately, then again after every change.
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    debug!("Event stream subscriber connected");

    let snapshots = snapshot_stream(state.subscribe_snapshots());
    let notifications = notification_stream(state.subscribe_notifications());

    Sse::new(stream::select(snapshots, notifications))
        .keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}

fn snapshot_event(snapshot: &Snapshot) -> Result<Event, axum::Error> {
    Event::default().event("snapshot").json_data(snapshot)
}

fn notification_event(notification: &Notification) -> Result<Event, axum::Error> {
    Event::default().event("notification").json_data(notification)
}

fn snapshot_stream(
    rx: watch::Receiver<Snapshot>,
) -> impl Stream<Item = Result<Event, axum::Error>> {
    stream::unfold((rx, true), |(mut rx, first)| async move {
        if !first && rx.changed().await.is_err() {
            return None;
        }
        let event = snapshot_event(&rx.borrow_and_update());
        Some((event, (rx, false)))
    })
}

fn notification_stream(
    rx: tokio::sync::broadcast::Receiver<Notification>,
) -> impl Stream<Item = Result<Event, axum::Error>> {
    stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(notification) => return Some((notification_event(&notification), rx)),
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Event subscriber lagged, skipped {} notifications", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    })
}
