//! # Team Orchestrator
//!
//! Runs the four roles in dependency order:
//!
//! ```text
//! Researcher ──┬── Analyst ────┬── Coordinator
//!              └── Strategist ─┘
//! ```
//!
//! Analyst and Strategist are joined in the same task, so only their network
//! I/O overlaps. A failed stage never stops the run; its failure text flows
//! downstream like any other output.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TrySendError};

use crate::llm::{ChatCompletionClient, ModelCaller, StageOutput};
use crate::models::ModelConfig;
use crate::skills::{AnalystSkill, CoordinatorSkill, ResearcherSkill, StrategistSkill};

use super::events::{TeamEvent, TeamEventKind};
use super::pipeline::{PipelineResult, PipelineStage};

/// Agent name used for pipeline-level events
const TEAM_AGENT: &str = "team";

/// The research team
#[derive(Clone)]
pub struct Team {
    caller: Arc<dyn ModelCaller>,
    event_tx: Option<mpsc::Sender<TeamEvent>>,
}

impl Team {
    pub fn new(caller: Arc<dyn ModelCaller>) -> Self {
        Self {
            caller,
            event_tx: None,
        }
    }

    /// Team backed by the chat-completion client
    pub fn from_config(config: ModelConfig) -> anyhow::Result<Self> {
        Ok(Self::new(Arc::new(ChatCompletionClient::new(config)?)))
    }

    /// Set event channel for streaming progress
    pub fn with_event_channel(mut self, tx: mpsc::Sender<TeamEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    /// Emit an event tagged with its run; never waits on the receiver
    fn emit(&self, run_id: &str, event: TeamEvent) {
        let Some(tx) = &self.event_tx else {
            return;
        };
        match tx.try_send(event.with_run_id(run_id)) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                tracing::debug!(kind = ?event.kind, "Event buffer full, dropping event");
            }
            Err(TrySendError::Closed(_)) => {}
        }
    }

    /// Run one stage, bracketing it with start/finish events
    async fn stage<F>(&self, run_id: &str, stage: PipelineStage, call: F) -> StageOutput
    where
        F: Future<Output = StageOutput>,
    {
        self.emit(
            run_id,
            TeamEvent::new(TeamEventKind::AgentStarted, stage.agent())
                .with_data(serde_json::json!({ "stage": stage.key() })),
        );

        let output = call.await;

        let event = match output.failure() {
            Some(err) => {
                tracing::warn!(stage = %stage, kind = err.kind(), "Stage failed, continuing");
                TeamEvent::new(TeamEventKind::AgentFailed, stage.agent()).with_data(
                    serde_json::json!({
                        "stage": stage.key(),
                        "kind": err.kind(),
                        "error": err.to_string(),
                    }),
                )
            }
            None => {
                tracing::info!(stage = %stage, "Stage completed");
                TeamEvent::new(TeamEventKind::AgentCompleted, stage.agent())
                    .with_data(serde_json::json!({ "stage": stage.key() }))
            }
        };
        self.emit(run_id, event);

        output
    }

    /// Run the team on a topic
    #[tracing::instrument(skip(self), fields(topic_preview = %topic.chars().take(50).collect::<String>()))]
    pub async fn run(&self, topic: &str) -> PipelineResult {
        let run_id = uuid::Uuid::new_v4().to_string();
        let run_id = run_id.as_str();
        self.emit(
            run_id,
            TeamEvent::new(TeamEventKind::PipelineStarted, TEAM_AGENT)
                .with_data(serde_json::json!({ "topic": topic })),
        );

        let caller = self.caller.as_ref();

        // Stage 1: Research
        let research = self
            .stage(
                run_id,
                PipelineStage::Research,
                ResearcherSkill::run(caller, topic),
            )
            .await;
        let research_text = research.text().into_owned();

        // Stage 2: Analysis and Strategy, both off the research only
        let (analysis, strategy) = tokio::join!(
            self.stage(
                run_id,
                PipelineStage::Analysis,
                AnalystSkill::run(caller, topic, &research_text),
            ),
            self.stage(
                run_id,
                PipelineStage::Strategy,
                StrategistSkill::run(caller, topic, &research_text, ""),
            ),
        );

        // Stage 3: Coordinator briefing
        let coordinator = self
            .stage(
                run_id,
                PipelineStage::Coordinator,
                CoordinatorSkill::run(
                    caller,
                    topic,
                    &research_text,
                    &analysis.text(),
                    &strategy.text(),
                ),
            )
            .await;

        let result = PipelineResult {
            research,
            analysis,
            strategy,
            coordinator,
        };

        let failed: Vec<&str> = result.failed_stages().iter().map(|s| s.key()).collect();
        self.emit(
            run_id,
            TeamEvent::new(TeamEventKind::PipelineCompleted, TEAM_AGENT)
                .with_data(serde_json::json!({ "failed_stages": failed })),
        );
        tracing::info!(run_id, failed = failed.len(), "Team run finished");

        result
    }
}
