//! Ballot endpoints.

use axum::{
    Json, Router,
    extract::State,
    response::IntoResponse,
    routing::{get, post},
};
use cinevote_common::{AppError, AppResult};
use cinevote_core::{AddOutcome, NewCandidate, VoteOutcome};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::Validate;

use crate::{
    response::{ApiResponse, ok},
    state::AppState,
    streaming::{CandidatePayload, WinnerPayload},
};

/// Add candidate request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddCandidateRequest {
    #[validate(length(min = 1))]
    pub id: String,
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub year: String,
    #[validate(length(min = 1))]
    pub poster: String,
}

/// Add candidate response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCandidateResponse {
    pub candidate: CandidatePayload,
    /// True when a new candidate entered the ballot with zero votes.
    pub created: bool,
    /// True when the submission counted as a vote on an existing candidate.
    pub voted: bool,
}

/// Vote request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub id: String,
}

/// Delete request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRequest {
    pub id: String,
}

/// List the active ballot.
async fn list_ballot(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<CandidatePayload>>> {
    let candidates = state.voting_service.list_active().await?;

    Ok(ApiResponse::ok(
        candidates.iter().map(CandidatePayload::from).collect(),
    ))
}

/// Add a movie to the ballot.
async fn add_candidate(
    State(state): State<AppState>,
    Json(req): Json<AddCandidateRequest>,
) -> AppResult<ApiResponse<AddCandidateResponse>> {
    req.validate()?;

    let outcome = state
        .voting_service
        .add_candidate(NewCandidate {
            id: req.id,
            title: req.title,
            year: req.year,
            poster: req.poster,
        })
        .await?;

    let response = match outcome {
        AddOutcome::Created(candidate) => {
            let payload = CandidatePayload::from(&candidate);
            info!(id = %payload.id, "Candidate added to ballot");
            state.broadcaster.publish_candidate_added(payload.clone());

            AddCandidateResponse {
                candidate: payload,
                created: true,
                voted: false,
            }
        }
        AddOutcome::Voted(outcome) => {
            let payload = publish_vote(&state, &outcome).await;

            AddCandidateResponse {
                candidate: payload,
                created: false,
                voted: true,
            }
        }
    };

    Ok(ApiResponse::ok(response))
}

/// Cast a vote on a candidate.
async fn cast_vote(
    State(state): State<AppState>,
    Json(req): Json<VoteRequest>,
) -> AppResult<ApiResponse<CandidatePayload>> {
    let outcome = state.voting_service.cast_vote(&req.id).await?;
    let payload = publish_vote(&state, &outcome).await;

    Ok(ApiResponse::ok(payload))
}

/// Remove an active candidate from the ballot.
async fn delete_candidate(
    State(state): State<AppState>,
    Json(req): Json<DeleteRequest>,
) -> AppResult<impl IntoResponse> {
    let deleted = state.voting_service.delete_candidate(&req.id).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("No active candidate: {}", req.id)));
    }

    info!(id = %req.id, "Candidate deleted");
    publish_ballot_snapshot(&state).await;

    Ok(ok())
}

/// Empty the active ballot.
async fn clear_ballot(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let removed = state.voting_service.clear_ballot().await?;
    info!(removed, "Active ballot cleared");

    state.broadcaster.publish_ballot_snapshot(Vec::new());

    Ok(ok())
}

/// Emit the events for an accepted vote.
///
/// A promoting vote emits the promotion first and the ledger snapshot second,
/// and no plain voted event. Event delivery never fails the vote itself: if
/// the ledger read for the snapshot fails, the snapshot is skipped.
async fn publish_vote(state: &AppState, outcome: &VoteOutcome) -> CandidatePayload {
    let payload = CandidatePayload::from(&outcome.candidate);

    if outcome.promoted() {
        info!(id = %payload.id, votes = payload.votes, "Candidate promoted to winner");
        state.broadcaster.publish_candidate_promoted(payload.clone());

        match state.voting_service.list_winners().await {
            Ok(winners) => {
                state
                    .broadcaster
                    .publish_winners_snapshot(winners.iter().map(WinnerPayload::from).collect());
            }
            Err(e) => {
                warn!(error = %e, "Skipping winner ledger snapshot broadcast");
            }
        }
    } else {
        state.broadcaster.publish_candidate_voted(payload.clone());
    }

    payload
}

/// Broadcast the current active ballot.
async fn publish_ballot_snapshot(state: &AppState) {
    match state.voting_service.list_active().await {
        Ok(candidates) => {
            state
                .broadcaster
                .publish_ballot_snapshot(candidates.iter().map(CandidatePayload::from).collect());
        }
        Err(e) => {
            warn!(error = %e, "Skipping ballot snapshot broadcast");
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_ballot))
        .route("/add", post(add_candidate))
        .route("/vote", post(cast_vote))
        .route("/delete", post(delete_candidate))
        .route("/clear", post(clear_ballot))
}
