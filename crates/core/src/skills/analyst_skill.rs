//! # Analyst Skill
//!
//! Turns the research summary into patterns, risks, opportunities and
//! trade-offs.

use crate::llm::{ModelCaller, StageOutput};
use crate::skills::prompts::{self, compose};

/// Analyst skill
pub struct AnalystSkill;

impl AnalystSkill {
    pub fn prompt(topic: &str, research: &str) -> String {
        compose(prompts::ANALYST, topic, &[("Research Summary", research)])
    }

    pub async fn run(caller: &dyn ModelCaller, topic: &str, research: &str) -> StageOutput {
        caller.complete(&Self::prompt(topic, research)).await
    }
}
