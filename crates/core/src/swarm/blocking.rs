//! # Blocking Bridge
//!
//! Lets synchronous callers (CLI loops, plain threads) run the async team.
//! Each call builds a private current-thread runtime, drives one pipeline run
//! on it and tears it down before returning.
//!
//! Code already running on a tokio runtime must `.await` [`Team::run`]
//! instead; calling the bridge there returns [`BridgeError::NestedRuntime`].

use std::sync::Arc;

use thiserror::Error;
use tokio::runtime::{Builder, Handle};

use crate::llm::ModelCaller;

use super::pipeline::PipelineResult;
use super::team::Team;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("run_blocking called from inside a tokio runtime; await Team::run instead")]
    NestedRuntime,

    #[error("failed to start pipeline runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

impl Team {
    /// Run the team to completion on a fresh private runtime
    pub fn run_blocking(&self, topic: &str) -> Result<PipelineResult, BridgeError> {
        if Handle::try_current().is_ok() {
            return Err(BridgeError::NestedRuntime);
        }

        let runtime = Builder::new_current_thread().enable_all().build()?;
        let result = runtime.block_on(self.run(topic));
        runtime.shutdown_background();
        Ok(result)
    }
}

/// Convenience wrapper: build a team around `caller` and run it blocking
pub fn run_blocking(
    caller: Arc<dyn ModelCaller>,
    topic: &str,
) -> Result<PipelineResult, BridgeError> {
    Team::new(caller).run_blocking(topic)
}
