//! # Strategist Skill
//!
//! Proposes short, mid and long term next steps with a metric each.
//!
//! Inside the team pipeline the Strategist runs alongside the Analyst, so
//! its analysis section is empty there.

use crate::llm::{ModelCaller, StageOutput};
use crate::skills::prompts::{self, compose};

/// Strategist skill
pub struct StrategistSkill;

impl StrategistSkill {
    pub fn prompt(topic: &str, research: &str, analysis: &str) -> String {
        compose(
            prompts::STRATEGIST,
            topic,
            &[("Research", research), ("Analysis", analysis)],
        )
    }

    pub async fn run(
        caller: &dyn ModelCaller,
        topic: &str,
        research: &str,
        analysis: &str,
    ) -> StageOutput {
        caller.complete(&Self::prompt(topic, research, analysis)).await
    }
}
