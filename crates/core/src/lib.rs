//! # Research Team Core
//!
//! The "Brain" of the research team - the model caller, the four role
//! skills, the pipeline orchestrator and result rendering.
//!
//! ## Architecture
//!
//! - `models` - Model endpoint configuration (env / `.env`)
//! - `llm` - Model caller trait and the chat-completion client
//! - `skills/` - Researcher, Analyst, Strategist, Coordinator
//! - `swarm/` - Pipeline orchestration, events, blocking bridge
//! - `render` - Output sanitization, briefing text, run history
//!
//! ## Usage
//!
//! ```rust,ignore
//! use research_team_core::models::ModelConfig;
//! use research_team_core::swarm::Team;
//!
//! let team = Team::from_config(ModelConfig::from_env()?)?;
//! let result = team.run("Remote work policy").await;
//! println!("{}", result.coordinator.text());
//! ```

pub mod llm;
pub mod models;
pub mod render;
pub mod skills;
pub mod swarm;

pub use llm::{ChatCompletionClient, ModelCaller, ModelError, StageOutput};
pub use models::ModelConfig;
pub use swarm::{run_blocking, PipelineResult, PipelineStage, Team};
