//! Role instruction templates.
//!
//! Each role's prompt is its instruction paragraph followed by the topic and
//! the labelled upstream sections built in the role's own module.

/// Researcher - factual background and source types
pub const RESEARCHER: &str = "You are a Researcher. Provide concise, factual background information about the following topic. \
List the types of sources you would consult. Be thorough but concise (max 500 words).";

/// Analyst - patterns, risks, opportunities, trade-offs
pub const ANALYST: &str = "You are an Analyst. Based on the research summary and the topic, identify key patterns, risks, \
opportunities, and trade-offs. Produce a clear bulleted list and a short (2-3 sentence) summary.";

/// Strategist - three prioritized next steps with metrics
pub const STRATEGIST: &str = "You are a Strategist. Using the research and analysis, propose 3 practical, prioritized next steps \
(short term, mid term, long term). For each step include one metric to track success.";

/// Coordinator - executive briefing
pub const COORDINATOR: &str = "You are the Project Coordinator. Combine the team outputs into a single concise briefing for executives. \
Include a 2-paragraph summary and a 3-line recommended action item list.";

/// All role templates with their slugs
pub fn all_defaults() -> Vec<(&'static str, &'static str)> {
    vec![
        ("researcher", RESEARCHER),
        ("analyst", ANALYST),
        ("strategist", STRATEGIST),
        ("coordinator", COORDINATOR),
    ]
}

/// Join an instruction with `Label:\nbody` sections, blank-line separated
pub(crate) fn compose(instruction: &str, topic: &str, sections: &[(&str, &str)]) -> String {
    let mut prompt = format!("{}\n\nTopic: {}", instruction, topic);
    for (label, body) in sections {
        prompt.push_str("\n\n");
        prompt.push_str(label);
        prompt.push_str(":\n");
        prompt.push_str(body);
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_prompts_non_empty() {
        for (slug, content) in all_defaults() {
            assert!(!content.is_empty(), "Prompt '{}' should not be empty", slug);
            assert!(content.len() > 50, "Prompt '{}' seems too short", slug);
        }
    }

    #[test]
    fn test_prompt_count() {
        assert_eq!(all_defaults().len(), 4, "Should have one prompt per role");
    }

    #[test]
    fn test_compose_layout() {
        let prompt = compose("Do it.", "Tea", &[("Notes", "a\nb"), ("Empty", "")]);
        assert_eq!(prompt, "Do it.\n\nTopic: Tea\n\nNotes:\na\nb\n\nEmpty:\n");
    }
}
