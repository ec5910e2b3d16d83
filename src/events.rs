//! Side-channel notifications about completed sends, streamed to observers over SSE.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use log::debug;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

use crate::handlers::AppState;

pub const MESSAGE_SENT: &str = "message-sent";

#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub event: &'static str,
    pub payload: Value,
}

#[derive(Clone)]
pub struct Notifier {
    tx: broadcast::Sender<Notification>,
}

impl Notifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }

    pub fn emit(&self, event: &'static str, payload: Value) {
        if self.tx.send(Notification { event, payload }).is_err() {
            debug!("No listeners for {}", event);
        }
    }
}

pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = BroadcastStream::new(state.notifier.subscribe()).filter_map(|received| {
        match received {
            Ok(notification) => {
                let data = serde_json::to_string(&notification.payload).unwrap_or_default();
                Some(Ok(Event::default().event(notification.event).data(data)))
            }
            // Lagged receivers skip what they missed
            Err(_) => None,
        }
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}
