//! # HTTP API
//!
//! Axum router exposing the research team pipeline.

pub mod team;

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Response},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use research_team_core::swarm::{Team, TeamEvent};
use tokio::sync::{broadcast, mpsc};
use utoipa::OpenApi;

/// Application state
pub struct AppState {
    pub team: Team,
    pub event_tx: broadcast::Sender<TeamEvent>,
    pub model: String,
    pub api_key_configured: bool,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    /// Wire a team to a broadcast channel so any number of SSE clients can follow runs
    pub fn new(team: Team, model: impl Into<String>, api_key_configured: bool) -> SharedState {
        let (event_tx, _) = broadcast::channel::<TeamEvent>(100);
        let (event_mpsc_tx, mut event_mpsc_rx) = mpsc::channel::<TeamEvent>(100);

        // Bridge events to broadcast
        let broadcast_tx = event_tx.clone();
        tokio::spawn(async move {
            while let Some(event) = event_mpsc_rx.recv().await {
                let _ = broadcast_tx.send(event);
            }
        });

        Arc::new(Self {
            team: team.with_event_channel(event_mpsc_tx),
            event_tx,
            model: model.into(),
            api_key_configured,
        })
    }
}

// === OpenAPI Definition ===

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Research Team API",
        version = "1.0.0",
        description = "Run the Researcher, Analyst, Strategist and Coordinator pipeline on a topic"
    ),
    paths(team::run_team, team::get_graph, team::health),
    components(schemas(
        team::RunTeamRequest,
        team::RunTeamResponse,
        team::PipelineResultDoc,
        team::GraphResponse,
        team::HealthResponse
    )),
    tags((name = "team", description = "Research team pipeline"))
)]
pub struct ApiDoc;

async fn serve_openapi() -> impl IntoResponse {
    let doc = ApiDoc::openapi().to_json().unwrap_or_default();
    Response::builder()
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(doc))
        .unwrap_or_default()
}

/// Build the application router
pub fn router(state: SharedState) -> Router {
    let team_routes = Router::new()
        .route("/run", post(team::run_team))
        .route("/events", get(team::events))
        .route("/graph", get(team::get_graph));

    Router::new()
        .nest("/api/v1/team", team_routes)
        .route("/api/v1/health", get(team::health))
        .route("/api/v1/openapi.json", get(serve_openapi))
        // Unversioned alias for the run endpoint
        .route("/run", post(team::run_team))
        .with_state(state)
}
