//! # Swarm Orchestration
//!
//! Coordinates the research team pipeline.
//!
//! ## Pipeline Flow
//!
//! ```text
//! Topic → Researcher → (Analyst ∥ Strategist) → Coordinator → PipelineResult
//! ```

pub mod blocking;
pub mod events;
pub mod graph;
pub mod pipeline;
pub mod team;

pub use blocking::{run_blocking, BridgeError};
pub use events::{TeamEvent, TeamEventKind};
pub use graph::{agent_graph, AgentGraph};
pub use pipeline::{PipelineResult, PipelineStage};
pub use team::Team;
