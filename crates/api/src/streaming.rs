//! WebSocket streaming API.
//!
//! Fan-out of ballot state changes to every connected client. Delivery is
//! best-effort: a client that is not connected when an event fires never sees
//! it and is expected to fetch a fresh snapshot over the REST API instead.

#![allow(missing_docs)]

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{error, info};

use cinevote_db::entities::{
    candidate::{self, CandidateStatus},
    winner_record,
};

use crate::state::AppState;

/// Candidate data carried by ballot events and API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidatePayload {
    pub id: String,
    pub title: String,
    pub year: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    pub votes: i32,
    pub status: String,
    pub created_at: String,
}

impl From<&candidate::Model> for CandidatePayload {
    fn from(m: &candidate::Model) -> Self {
        Self {
            id: m.id.clone(),
            title: m.title.clone(),
            year: m.year.clone(),
            poster: m.poster.clone(),
            votes: m.votes,
            status: match m.status {
                CandidateStatus::Active => "active".to_string(),
                CandidateStatus::Winner => "winner".to_string(),
            },
            created_at: m.created_at.to_rfc3339(),
        }
    }
}

/// Winner ledger data carried by ledger events and API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WinnerPayload {
    pub sequence: i32,
    pub movie_id: String,
    pub title: String,
    pub year: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    pub final_votes: i32,
    pub promoted_at: String,
}

impl From<&winner_record::Model> for WinnerPayload {
    fn from(m: &winner_record::Model) -> Self {
        Self {
            sequence: m.id,
            movie_id: m.candidate_id.clone(),
            title: m.title.clone(),
            year: m.year.clone(),
            poster: m.poster.clone(),
            final_votes: m.final_votes,
            promoted_at: m.promoted_at.to_rfc3339(),
        }
    }
}

/// Ballot stream events.
///
/// Within one triggering operation a promotion emits `CandidatePromoted`
/// followed by `Winners`, and no `CandidateVoted` event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "body", rename_all = "camelCase")]
pub enum BallotEvent {
    /// Full active-ballot snapshot.
    Ballot { candidates: Vec<CandidatePayload> },
    /// A candidate entered the ballot.
    CandidateAdded(CandidatePayload),
    /// A candidate received a non-promoting vote.
    CandidateVoted(CandidatePayload),
    /// A candidate crossed the vote threshold.
    CandidatePromoted(CandidatePayload),
    /// Full winner-ledger snapshot.
    Winners { winners: Vec<WinnerPayload> },
}

/// Fan-out broadcaster.
///
/// One broadcast channel; every connected WebSocket client holds its own
/// receiver. Sending never blocks and never fails the triggering operation:
/// with no subscribers the event is simply dropped, and a lagging subscriber
/// misses the overflowed events rather than slowing anyone down.
#[derive(Clone)]
pub struct Broadcaster {
    tx: Arc<broadcast::Sender<BallotEvent>>,
}

impl Broadcaster {
    /// Create a new broadcaster.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1000);
        Self { tx: Arc::new(tx) }
    }

    /// Register a new subscriber.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<BallotEvent> {
        self.tx.subscribe()
    }

    /// Number of currently connected subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Publish a full active-ballot snapshot.
    pub fn publish_ballot_snapshot(&self, candidates: Vec<CandidatePayload>) {
        let _ = self.tx.send(BallotEvent::Ballot { candidates });
    }

    /// Publish a candidate-added event.
    pub fn publish_candidate_added(&self, candidate: CandidatePayload) {
        let _ = self.tx.send(BallotEvent::CandidateAdded(candidate));
    }

    /// Publish a non-promoting vote event.
    pub fn publish_candidate_voted(&self, candidate: CandidatePayload) {
        let _ = self.tx.send(BallotEvent::CandidateVoted(candidate));
    }

    /// Publish a promotion event.
    pub fn publish_candidate_promoted(&self, candidate: CandidatePayload) {
        let _ = self.tx.send(BallotEvent::CandidatePromoted(candidate));
    }

    /// Publish a full winner-ledger snapshot.
    pub fn publish_winners_snapshot(&self, winners: Vec<WinnerPayload>) {
        let _ = self.tx.send(BallotEvent::Winners { winners });
    }
}

impl Default for Broadcaster {
    fn default() -> Self {
        Self::new()
    }
}

/// WebSocket handler for streaming.
pub async fn streaming_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    info!("New streaming connection");

    ws.on_upgrade(move |socket| handle_socket(socket, state.broadcaster))
}

/// Handle a WebSocket connection.
async fn handle_socket(socket: WebSocket, broadcaster: Broadcaster) {
    let (mut sender, mut receiver) = socket.split();
    let mut rx = broadcaster.subscribe();

    loop {
        tokio::select! {
            // Handle incoming messages from client
            incoming = receiver.next() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | None => {
                        info!("Client closed connection");
                        break;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if sender.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        error!("WebSocket error: {}", e);
                        break;
                    }
                }
            }

            // Forward ballot events
            event = rx.recv() => {
                match event {
                    Ok(event) => {
                        let json = serde_json::to_string(&event).unwrap_or_default();
                        if sender.send(Message::Text(json.into())).await.is_err() {
                            break;
                        }
                    }
                    // A slow client misses the overflowed events; no replay
                    Err(broadcast::error::RecvError::Lagged(_)) => {}
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    info!("Streaming connection closed");
}
