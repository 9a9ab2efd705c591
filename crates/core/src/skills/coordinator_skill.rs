//! # Coordinator Skill
//!
//! Final stage: folds the three upstream outputs into an executive briefing.

use crate::llm::{ModelCaller, StageOutput};
use crate::skills::prompts::{self, compose};

/// Coordinator skill for the executive briefing
pub struct CoordinatorSkill;

impl CoordinatorSkill {
    pub fn prompt(topic: &str, research: &str, analysis: &str, strategy: &str) -> String {
        compose(
            prompts::COORDINATOR,
            topic,
            &[
                ("Researcher Output", research),
                ("Analyst Output", analysis),
                ("Strategist Output", strategy),
            ],
        )
    }

    pub async fn run(
        caller: &dyn ModelCaller,
        topic: &str,
        research: &str,
        analysis: &str,
        strategy: &str,
    ) -> StageOutput {
        caller
            .complete(&Self::prompt(topic, research, analysis, strategy))
            .await
    }
}
