use std::{convert::Infallible, time::Duration};

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use tokio::sync::{
    broadcast::{self, error::RecvError},
    mpsc,
};
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info};

use crate::{
    dto::sse::{Handshake, ServerEvent},
    state::{SharedState, SseHub},
};

/// Subscribe to the shared public SSE stream.
pub fn subscribe_public(state: &SharedState) -> broadcast::Receiver<ServerEvent> {
    state.public_sse().subscribe()
}

/// Convert a broadcast receiver into an SSE response, forwarding events until the client
/// disconnects.
pub fn to_sse_stream(
    mut receiver: broadcast::Receiver<ServerEvent>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    // small bounded channel between forwarder and response
    let (tx, rx) = mpsc::channel::<Result<Event, Infallible>>(8);

    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = tx.closed() => break,
                recv_result = receiver.recv() => {
                    match recv_result {
                        Ok(payload) => {
                            let mut event = Event::default().data(payload.data);
                            if let Some(name) = payload.event {
                                event = event.event(name);
                            }

                            if tx.send(Ok(event)).await.is_err() {
                                break;
                            }
                        }
                        Err(RecvError::Closed) => break,
                        Err(RecvError::Lagged(skipped)) => {
                            // Keep the stream alive; clients refetch on their next event.
                            debug!(skipped, "public SSE subscriber lagged");
                            continue;
                        }
                    }
                }
            }
        }

        info!("Public SSE stream disconnected");
    });

    // response stream reads from mpsc; when client disconnects axum drops this stream
    let stream = ReceiverStream::new(rx);
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Greet every subscriber when a new public stream connects.
pub fn broadcast_handshake(hub: &SseHub) {
    let handshake = Handshake {
        stream: "public".into(),
        message: format!("public stream connected ({} subscribers)", hub.subscribers()),
    };
    if let Ok(event) = ServerEvent::json(Some("handshake".to_string()), &handshake) {
        hub.broadcast(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{services::sse_events, state::tests::seeded_state};

    #[tokio::test]
    async fn public_subscribers_receive_named_events() {
        let (state, _store) = seeded_state().await;
        let mut receiver = subscribe_public(&state);

        sse_events::broadcast_game_deleted(&state, "4");

        let event = receiver.recv().await.unwrap();
        assert_eq!(event.event.as_deref(), Some("game.deleted"));
        assert_eq!(event.data, r#"{"game_id":"4"}"#);
    }

    #[tokio::test]
    async fn handshake_counts_subscribers() {
        let (state, _store) = seeded_state().await;
        let mut receiver = subscribe_public(&state);
        broadcast_handshake(state.public_sse());

        let event = receiver.recv().await.unwrap();
        assert_eq!(event.event.as_deref(), Some("handshake"));
        assert!(event.data.contains("1 subscribers"));
    }
}
