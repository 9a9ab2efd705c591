//! # Agent Graph
//!
//! Static description of who feeds whom, for visualization and logging.

use serde::Serialize;

use super::pipeline::PipelineStage;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentGraph {
    pub nodes: Vec<&'static str>,
    /// `(from, to)` pairs
    pub edges: Vec<(&'static str, &'static str)>,
}

/// The team's dependency graph, derived from the pipeline stages
pub fn agent_graph() -> AgentGraph {
    let nodes = PipelineStage::ALL.iter().map(|s| s.agent()).collect();
    let edges = PipelineStage::ALL
        .iter()
        .flat_map(|to| to.upstream().iter().map(move |from| (from.agent(), to.agent())))
        .filter(|(from, to)| {
            // Coordinator's research input is an indirect edge, drawn via Analyst/Strategist
            !(*from == PipelineStage::Research.agent() && *to == PipelineStage::Coordinator.agent())
        })
        .collect();

    AgentGraph { nodes, edges }
}

impl AgentGraph {
    /// Agents with an edge into `agent`
    pub fn upstream_of(&self, agent: &str) -> Vec<&'static str> {
        self.edges
            .iter()
            .filter(|(_, to)| *to == agent)
            .map(|(from, _)| *from)
            .collect()
    }

    /// Agents `agent` has an edge into
    pub fn downstream_of(&self, agent: &str) -> Vec<&'static str> {
        self.edges
            .iter()
            .filter(|(from, _)| *from == agent)
            .map(|(_, to)| *to)
            .collect()
    }

    /// Graphviz rendering
    pub fn to_dot(&self) -> String {
        let mut dot = String::from("digraph team {\n    rankdir=LR;\n");
        for node in &self.nodes {
            dot.push_str(&format!("    \"{}\";\n", node));
        }
        for (from, to) in &self.edges {
            dot.push_str(&format!("    \"{}\" -> \"{}\";\n", from, to));
        }
        dot.push('}');
        dot
    }
}
