//! Line-oriented front end: one topic per line, briefing and recent runs after each.

use std::io::{BufRead, Write};

use research_team_core::render::{render_briefing, RunHistory};
use research_team_core::swarm::Team;

/// Topic used when the user just presses enter
pub const DEFAULT_TOPIC: &str = "Impact of Artificial Intelligence on Global Education";

/// Read topics from `input` until `:quit` or EOF
pub fn run_loop<R: BufRead, W: Write>(team: &Team, input: R, mut output: W) -> anyhow::Result<()> {
    let mut history = RunHistory::new();
    let mut lines = input.lines();

    writeln!(output, "Research team ready. Enter a topic, :history or :quit.")?;

    loop {
        write!(output, "topic [{}]> ", DEFAULT_TOPIC)?;
        output.flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;

        match line.trim() {
            ":quit" | ":q" => break,
            ":history" => {
                writeln!(output, "{}", history_block(&history))?;
            }
            entered => {
                let topic = if entered.is_empty() {
                    DEFAULT_TOPIC
                } else {
                    entered
                };

                writeln!(output, "Running research team on: {}", topic)?;
                let result = match team.run_blocking(topic) {
                    Ok(result) => result,
                    Err(e) => {
                        tracing::error!("Team run failed: {}", e);
                        writeln!(output, "Error running team: {}", e)?;
                        continue;
                    }
                };
                history.record(topic);

                writeln!(output, "\n{}\n", render_briefing(topic, &result))?;
                writeln!(output, "{}", history_block(&history))?;
            }
        }
    }

    writeln!(output)?;
    Ok(())
}

fn history_block(history: &RunHistory) -> String {
    if history.is_empty() {
        "No runs yet.".to_string()
    } else {
        format!("Recent runs:\n{}", history.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use research_team_core::llm::{ModelCaller, StageOutput};
    use std::io::Cursor;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct RecordingCaller {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ModelCaller for RecordingCaller {
        async fn complete(&self, prompt: &str) -> StageOutput {
            self.prompts.lock().unwrap().push(prompt.to_string());
            StageOutput::Completed("<p>finding</p>".to_string())
        }
    }

    fn session(input: &str) -> (String, Arc<RecordingCaller>) {
        let caller = Arc::new(RecordingCaller::default());
        let team = Team::new(caller.clone());
        let mut out = Vec::new();
        run_loop(&team, Cursor::new(input.to_string()), &mut out).unwrap();
        (String::from_utf8(out).unwrap(), caller)
    }

    #[test]
    fn test_empty_line_uses_default_topic() {
        let (out, caller) = session("\n:quit\n");
        assert!(out.contains(&format!("# Research Team Briefing: {}", DEFAULT_TOPIC)));
        let prompts = caller.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 4);
        assert!(prompts[0].contains(&format!("Topic: {}", DEFAULT_TOPIC)));
    }

    #[test]
    fn test_briefing_is_sanitized() {
        let (out, _) = session("Solar power\n");
        assert!(out.contains("finding"));
        assert!(!out.contains("<p>"));
    }

    #[test]
    fn test_history_lists_newest_first() {
        let (out, _) = session("First\nSecond\n:history\n");
        let tail = out.rsplit("Recent runs:").next().unwrap();
        let second = tail.find("**Second**").unwrap();
        let first = tail.find("**First**").unwrap();
        assert!(second < first);
    }

    #[test]
    fn test_history_before_any_run() {
        let (out, caller) = session(":history\n:quit\n");
        assert!(out.contains("No runs yet."));
        assert!(caller.prompts.lock().unwrap().is_empty());
    }

    #[test]
    fn test_eof_ends_session() {
        let (out, caller) = session("");
        assert!(out.contains("Research team ready."));
        assert!(caller.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_bridge_error_keeps_session_open() {
        // Inside a runtime the bridge refuses to start; the loop reports it and moves on
        let (out, caller) = session("Solar\n:history\n:quit\n");
        assert!(out.contains("Error running team: run_blocking called from inside a tokio runtime"));
        assert!(out.contains("No runs yet."));
        assert!(caller.prompts.lock().unwrap().is_empty());
    }
}
