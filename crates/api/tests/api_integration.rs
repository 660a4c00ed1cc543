//! API integration tests.
//!
//! These tests verify the API endpoints work correctly together.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use cinevote_api::{AppState, Broadcaster, router as api_router};
use cinevote_common::CatalogConfig;
use cinevote_core::{CatalogService, VotingService};
use cinevote_db::{
    entities::candidate::{self, CandidateStatus},
    repositories::{BallotRepository, WinnerRepository},
};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
use std::sync::Arc;
use tower::ServiceExt;

/// Create test app state over the given (mock) database.
fn test_state(db: DatabaseConnection) -> AppState {
    let db = Arc::new(db);
    let voting_service = VotingService::new(
        BallotRepository::new(Arc::clone(&db)),
        WinnerRepository::new(Arc::clone(&db)),
    );
    let catalog_service = CatalogService::new(&CatalogConfig {
        api_url: "https://catalog.example/".to_string(),
        api_key: "test-key".to_string(),
        timeout_secs: 1,
    })
    .unwrap();

    AppState {
        voting_service,
        catalog_service,
        broadcaster: Broadcaster::new(),
    }
}

fn test_app(db: DatabaseConnection) -> Router {
    Router::new()
        .nest("/api", api_router())
        .with_state(test_state(db))
}

fn json_request(uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_meta_reports_the_vote_threshold() {
    let app = test_app(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/meta")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["voteThreshold"], 10);
    assert_eq!(json["data"]["name"], "cinevote");
}

#[tokio::test]
async fn test_add_with_empty_title_is_rejected_before_the_store() {
    // The mock has no query results: any store access would fail the test
    let app = test_app(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

    let response = app
        .oneshot(json_request(
            "/api/ballot/add",
            &serde_json::json!({
                "id": "tt0113277",
                "title": "",
                "year": "1995",
                "poster": "https://posters.example/heat.jpg"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_vote_on_unknown_candidate_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<candidate::Model>::new()])
        .into_connection();
    let app = test_app(db);

    let response = app
        .oneshot(json_request(
            "/api/ballot/vote",
            &serde_json::json!({ "id": "tt0000000" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_empty_ballot_lists_as_empty_data() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<candidate::Model>::new()])
        .into_connection();
    let app = test_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/ballot")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"], serde_json::json!([]));
}

#[tokio::test]
async fn test_listing_includes_candidate_fields_in_camel_case() {
    let model = candidate::Model {
        id: "tt0113277".to_string(),
        title: "Heat".to_string(),
        year: "1995".to_string(),
        poster: None,
        votes: 7,
        status: CandidateStatus::Active,
        created_at: chrono::Utc::now().into(),
    };
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[model]])
        .into_connection();
    let app = test_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/ballot")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"][0]["id"], "tt0113277");
    assert_eq!(json["data"][0]["votes"], 7);
    assert_eq!(json["data"][0]["status"], "active");
    assert!(json["data"][0]["createdAt"].is_string());
}

#[tokio::test]
async fn test_delete_of_unknown_candidate_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();
    let app = test_app(db);

    let response = app
        .oneshot(json_request(
            "/api/ballot/delete",
            &serde_json::json!({ "id": "tt0000000" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_search_with_empty_query_is_rejected() {
    let app = test_app(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/search?query=")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = test_app(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/nope")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
