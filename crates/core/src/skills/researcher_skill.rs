//! # Researcher Skill
//!
//! First stage: background research on the topic alone.

use crate::llm::{ModelCaller, StageOutput};
use crate::skills::prompts::{self, compose};

/// Researcher skill for gathering background
pub struct ResearcherSkill;

impl ResearcherSkill {
    pub fn prompt(topic: &str) -> String {
        compose(prompts::RESEARCHER, topic, &[])
    }

    pub async fn run(caller: &dyn ModelCaller, topic: &str) -> StageOutput {
        caller.complete(&Self::prompt(topic)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::swarm::team::tests::EchoCaller;

    #[test]
    fn test_prompt_has_only_topic() {
        let prompt = ResearcherSkill::prompt("Remote work policy");
        assert!(prompt.starts_with("You are a Researcher."));
        assert!(prompt.ends_with("Topic: Remote work policy"));
        assert!(prompt.contains("max 500 words"));
    }

    #[test]
    fn test_run_sends_prompt_and_returns_output() {
        let caller = EchoCaller::default();
        let output = tokio_test::block_on(ResearcherSkill::run(&caller, "Solar"));
        assert_eq!(*caller.prompts.lock().unwrap(), vec![ResearcherSkill::prompt("Solar")]);
        assert!(output.text().ends_with("Topic: Solar"));
    }
}
