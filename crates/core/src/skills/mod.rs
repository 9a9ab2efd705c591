//! # Research Team Skills
//!
//! One skill per team role. Each builds a prompt from its inputs and hands it
//! to a [`ModelCaller`](crate::llm::ModelCaller); none of them inspects what
//! comes back.
//!
//! ```text
//! Researcher(topic) ──┬── Analyst(topic, research) ───────────┬── Coordinator(topic, research, analysis, strategy)
//!                     └── Strategist(topic, research, "") ────┘
//! ```

pub mod prompts;

pub mod analyst_skill;
pub mod coordinator_skill;
pub mod researcher_skill;
pub mod strategist_skill;

pub use analyst_skill::AnalystSkill;
pub use coordinator_skill::CoordinatorSkill;
pub use researcher_skill::ResearcherSkill;
pub use strategist_skill::StrategistSkill;
