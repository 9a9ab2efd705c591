//! # Team API
//!
//! Run endpoint, progress stream, agent graph and health.

use std::convert::Infallible;
use std::time::Duration;

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::stream::{self, Stream};
use research_team_core::swarm::{agent_graph, PipelineResult};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::error::RecvError;
use utoipa::ToSchema;

use super::SharedState;
use crate::error::{ApiError, ApiResult};

#[derive(Debug, Deserialize, ToSchema)]
pub struct RunTeamRequest {
    /// Topic for the team to work on
    pub topic: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct RunTeamResponse {
    pub success: bool,
    pub topic: String,
    #[schema(value_type = PipelineResultDoc)]
    pub result: PipelineResult,
    /// Stages whose model call failed; their slot holds the failure text
    pub failed_stages: Vec<String>,
}

/// Wire shape of a pipeline result (documentation only)
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct PipelineResultDoc {
    research: String,
    analysis: String,
    strategy: String,
    coordinator: String,
}

#[derive(Serialize, ToSchema)]
pub struct GraphResponse {
    pub nodes: Vec<String>,
    /// `[from, to]` pairs
    pub edges: Vec<Vec<String>>,
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub model: String,
    pub api_key_configured: bool,
}

/// Run the research team on a topic
#[utoipa::path(
    post,
    path = "/api/v1/team/run",
    tag = "team",
    request_body = RunTeamRequest,
    responses(
        (status = 200, description = "Pipeline finished", body = RunTeamResponse),
        (status = 400, description = "Missing or blank topic"),
        (status = 500, description = "Pipeline task failed")
    )
)]
pub async fn run_team(
    State(state): State<SharedState>,
    Json(req): Json<RunTeamRequest>,
) -> ApiResult<Json<RunTeamResponse>> {
    let topic = req.topic.unwrap_or_default();
    if topic.trim().is_empty() {
        return Err(ApiError::bad_request("topic is required"));
    }

    tracing::info!(topic = %topic, "Starting team run");

    // Own task, so a panic inside the pipeline becomes a 500 instead of a dropped connection
    let team = state.team.clone();
    let task_topic = topic.clone();
    let result = tokio::spawn(async move { team.run(&task_topic).await })
        .await
        .map_err(|e| {
            tracing::error!("Team run failed: {}", e);
            ApiError::internal(format!("failed to run team: {}", e))
        })?;

    let failed_stages = result
        .failed_stages()
        .iter()
        .map(|s| s.key().to_string())
        .collect();

    Ok(Json(RunTeamResponse {
        success: true,
        topic,
        result,
        failed_stages,
    }))
}

/// SSE endpoint for team events with heartbeat
pub async fn events(
    State(state): State<SharedState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.event_tx.subscribe();

    let stream = stream::unfold(rx, |mut rx| async move {
        let next = tokio::time::timeout(Duration::from_secs(15), rx.recv()).await;

        match next {
            Ok(Ok(event)) => {
                let json = serde_json::to_string(&event).unwrap_or_default();
                Some((Ok(Event::default().data(json)), rx))
            }
            Ok(Err(RecvError::Lagged(skipped))) => Some((
                Ok(Event::default().comment(format!("lagged {}", skipped))),
                rx,
            )),
            Ok(Err(RecvError::Closed)) => None,
            // Timeout - send heartbeat comment
            Err(_) => Some((Ok(Event::default().comment("heartbeat")), rx)),
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Agent dependency graph
#[utoipa::path(
    get,
    path = "/api/v1/team/graph",
    tag = "team",
    responses(
        (status = 200, description = "Agents and their edges", body = GraphResponse)
    )
)]
pub async fn get_graph() -> Json<GraphResponse> {
    let graph = agent_graph();
    Json(GraphResponse {
        nodes: graph.nodes.iter().map(|n| n.to_string()).collect(),
        edges: graph
            .edges
            .iter()
            .map(|(from, to)| vec![from.to_string(), to.to_string()])
            .collect(),
    })
}

/// Service health and model configuration
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "team",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        model: state.model.clone(),
        api_key_configured: state.api_key_configured,
    })
}

#[cfg(test)]
mod tests {
    use super::super::{router, AppState};
    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        Router,
    };
    use futures::StreamExt;
    use research_team_core::llm::{ModelCaller, StageOutput};
    use research_team_core::swarm::Team;
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    struct EchoCaller;

    #[async_trait]
    impl ModelCaller for EchoCaller {
        async fn complete(&self, prompt: &str) -> StageOutput {
            StageOutput::Completed(format!("ECHO:{}", prompt))
        }
    }

    struct PanicCaller;

    #[async_trait]
    impl ModelCaller for PanicCaller {
        async fn complete(&self, _prompt: &str) -> StageOutput {
            panic!("model backend exploded");
        }
    }

    fn app(caller: Arc<dyn ModelCaller>) -> Router {
        router(AppState::new(Team::new(caller), "test/model", true))
    }

    async fn post_json(app: Router, uri: &str, body: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_run_returns_four_stage_result() {
        let (status, json) = post_json(
            app(Arc::new(EchoCaller)),
            "/api/v1/team/run",
            r#"{"topic":"Remote work policy"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["topic"], "Remote work policy");
        let result = json["result"].as_object().unwrap();
        assert_eq!(result.len(), 4);
        assert!(result["coordinator"]
            .as_str()
            .unwrap()
            .contains("Remote work policy"));
        assert_eq!(json["failed_stages"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_run_alias_route() {
        let (status, _) =
            post_json(app(Arc::new(EchoCaller)), "/run", r#"{"topic":"Solar"}"#).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_blank_topic_is_rejected() {
        let (status, json) =
            post_json(app(Arc::new(EchoCaller)), "/api/v1/team/run", r#"{"topic":"   "}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "topic is required");
    }

    #[tokio::test]
    async fn test_missing_topic_is_rejected() {
        let (status, _) = post_json(app(Arc::new(EchoCaller)), "/api/v1/team/run", "{}").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_body_is_client_error() {
        let (status, _) =
            post_json(app(Arc::new(EchoCaller)), "/api/v1/team/run", "not json").await;
        assert!(status.is_client_error());
    }

    #[tokio::test]
    async fn test_pipeline_panic_is_server_error() {
        let (status, json) = post_json(
            app(Arc::new(PanicCaller)),
            "/api/v1/team/run",
            r#"{"topic":"Solar"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(json["error"]
            .as_str()
            .unwrap()
            .starts_with("failed to run team:"));
    }

    #[tokio::test]
    async fn test_graph_endpoint() {
        let response = app(Arc::new(EchoCaller))
            .oneshot(
                Request::builder()
                    .uri("/api/v1/team/graph")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["nodes"].as_array().unwrap().len(), 4);
        assert_eq!(json["edges"][3], serde_json::json!(["Strategist", "Coordinator"]));
    }

    #[tokio::test]
    async fn test_openapi_lists_run_path() {
        let response = app(Arc::new(EchoCaller))
            .oneshot(
                Request::builder()
                    .uri("/api/v1/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(json["paths"]["/api/v1/team/run"]["post"].is_object());
    }

    async fn get(app: Router, uri: &str) -> axum::response::Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_model_and_key() {
        let response = get(app(Arc::new(EchoCaller)), "/api/v1/health").await;
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"status": "ok", "model": "test/model", "api_key_configured": true})
        );
    }

    #[tokio::test]
    async fn test_events_stream_follows_a_run() {
        let app = app(Arc::new(EchoCaller));

        let response = get(app.clone(), "/api/v1/team/events").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/event-stream"));
        let mut body = response.into_body().into_data_stream();

        let (status, _) = post_json(app, "/api/v1/team/run", r#"{"topic":"Solar"}"#).await;
        assert_eq!(status, StatusCode::OK);

        let mut events: Vec<serde_json::Value> = Vec::new();
        let mut buffer = String::new();
        while !events.iter().any(|e| e["kind"] == "pipeline_completed") {
            let chunk = tokio::time::timeout(Duration::from_secs(5), body.next())
                .await
                .expect("event stream stalled")
                .expect("event stream ended")
                .unwrap();
            buffer.push_str(std::str::from_utf8(&chunk).unwrap());

            while let Some(end) = buffer.find("\n\n") {
                let frame: String = buffer.drain(..end + 2).collect();
                for line in frame.lines() {
                    if let Some(data) = line.strip_prefix("data: ").or_else(|| line.strip_prefix("data:")) {
                        events.push(serde_json::from_str(data).unwrap());
                    }
                }
            }
        }

        assert_eq!(events.len(), 10);
        assert_eq!(events[0]["kind"], "pipeline_started");
        assert_eq!(events[0]["data"]["topic"], "Solar");
        let run_id = events[0]["run_id"].as_str().unwrap();
        assert!(!run_id.is_empty());
        assert!(events.iter().all(|e| e["run_id"] == run_id));
        let completed = events
            .iter()
            .filter(|e| e["kind"] == "agent_completed")
            .count();
        assert_eq!(completed, 4);
    }
}
