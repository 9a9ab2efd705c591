//! # Pipeline Stages
//!
//! The four fixed stages of the team pipeline and the result that carries
//! one output per stage.

use crate::llm::{ModelError, StageOutput};
use serde::{Deserialize, Serialize};

/// Stage of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// Background research on the topic
    Research,
    /// Patterns, risks and trade-offs
    Analysis,
    /// Prioritized next steps
    Strategy,
    /// Executive briefing
    Coordinator,
}

impl PipelineStage {
    /// All stages in execution order
    pub const ALL: [PipelineStage; 4] = [
        PipelineStage::Research,
        PipelineStage::Analysis,
        PipelineStage::Strategy,
        PipelineStage::Coordinator,
    ];

    /// Key of this stage in a serialized [`PipelineResult`]
    pub fn key(&self) -> &'static str {
        match self {
            PipelineStage::Research => "research",
            PipelineStage::Analysis => "analysis",
            PipelineStage::Strategy => "strategy",
            PipelineStage::Coordinator => "coordinator",
        }
    }

    /// Name of the agent that runs this stage
    pub fn agent(&self) -> &'static str {
        match self {
            PipelineStage::Research => "Researcher",
            PipelineStage::Analysis => "Analyst",
            PipelineStage::Strategy => "Strategist",
            PipelineStage::Coordinator => "Coordinator",
        }
    }

    /// Stages whose output this stage consumes
    pub fn upstream(&self) -> &'static [PipelineStage] {
        match self {
            PipelineStage::Research => &[],
            PipelineStage::Analysis | PipelineStage::Strategy => &[PipelineStage::Research],
            PipelineStage::Coordinator => &[
                PipelineStage::Research,
                PipelineStage::Analysis,
                PipelineStage::Strategy,
            ],
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.key() == key)
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// One output per stage. Always fully populated once a run finishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineResult {
    pub research: StageOutput,
    pub analysis: StageOutput,
    pub strategy: StageOutput,
    pub coordinator: StageOutput,
}

impl PipelineResult {
    pub fn get(&self, stage: PipelineStage) -> &StageOutput {
        match stage {
            PipelineStage::Research => &self.research,
            PipelineStage::Analysis => &self.analysis,
            PipelineStage::Strategy => &self.strategy,
            PipelineStage::Coordinator => &self.coordinator,
        }
    }

    /// Stage outputs in execution order
    pub fn iter(&self) -> impl Iterator<Item = (PipelineStage, &StageOutput)> {
        PipelineStage::ALL.into_iter().map(move |s| (s, self.get(s)))
    }

    /// Stages whose model call failed
    pub fn failed_stages(&self) -> Vec<PipelineStage> {
        self.iter()
            .filter(|(_, output)| output.is_failure())
            .map(|(stage, _)| stage)
            .collect()
    }

    pub fn failures(&self) -> Vec<(PipelineStage, &ModelError)> {
        self.iter()
            .filter_map(|(stage, output)| output.failure().map(|e| (stage, e)))
            .collect()
    }

    /// Check if every stage produced real content
    pub fn is_success(&self) -> bool {
        self.iter().all(|(_, output)| !output.is_failure())
    }
}
