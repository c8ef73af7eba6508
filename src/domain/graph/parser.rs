//! Workflow definition parsing into an executable graph

use tracing::warn;

use super::scheduler::topological_order;
use super::{ComponentKind, NodeSettings, WorkflowDefinition};

/// A single node after type resolution and settings extraction
#[derive(Debug, Clone)]
pub struct GraphNode {
    pub id: String,
    pub kind: ComponentKind,
    /// Display name for logs, from `data.label`, falling back to the kind label
    pub label: String,
    pub settings: NodeSettings,
}

/// Parsed, validated, scheduled form of a workflow definition
#[derive(Debug, Clone)]
pub struct ExecutionGraph {
    nodes: Vec<GraphNode>,
    edges: Vec<(String, String)>,
    execution_order: Vec<String>,
}

impl ExecutionGraph {
    /// Resolve node types, drop unknown nodes (with a warning) and any
    /// edges touching them, then precompute the execution order.
    pub fn parse(definition: &WorkflowDefinition) -> Self {
        let mut nodes = Vec::with_capacity(definition.nodes.len());

        for node in &definition.nodes {
            let Some(kind) = ComponentKind::from_node_type(&node.node_type) else {
                warn!(
                    node_id = %node.id,
                    node_type = %node.node_type,
                    "Unknown node type, dropping node"
                );
                continue;
            };

            let label = node
                .data
                .get("label")
                .and_then(serde_json::Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| kind.label().to_string());

            nodes.push(GraphNode {
                id: node.id.clone(),
                kind,
                label,
                settings: NodeSettings::extract(kind, &node.data),
            });
        }

        let edges: Vec<(String, String)> = definition
            .edges
            .iter()
            .filter(|edge| {
                nodes.iter().any(|n| n.id == edge.source)
                    && nodes.iter().any(|n| n.id == edge.target)
            })
            .map(|edge| (edge.source.clone(), edge.target.clone()))
            .collect();

        let node_ids: Vec<String> = nodes.iter().map(|n| n.id.clone()).collect();
        let execution_order = topological_order(&node_ids, &edges);

        Self {
            nodes,
            edges,
            execution_order,
        }
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Surviving nodes in declaration order
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[(String, String)] {
        &self.edges
    }

    pub fn execution_order(&self) -> &[String] {
        &self.execution_order
    }

    pub fn has_kind(&self, kind: ComponentKind) -> bool {
        self.nodes.iter().any(|n| n.kind == kind)
    }

    /// Seed query from the first Input node, in execution order, that
    /// carries one
    pub fn first_input_query(&self) -> Option<&str> {
        self.execution_order
            .iter()
            .filter_map(|id| self.node(id))
            .find_map(|n| match &n.settings {
                NodeSettings::Input(settings) if !settings.query.is_empty() => {
                    Some(settings.query.as_str())
                }
                _ => None,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn definition(json: serde_json::Value) -> WorkflowDefinition {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_parse_full_pipeline() {
        let graph = ExecutionGraph::parse(&definition(json!({
            "nodes": [
                {"id": "n1", "type": "userQuery", "data": {"query": "what is rust"}},
                {"id": "n2", "type": "knowledgeBase", "data": {"topK": 2}},
                {"id": "n3", "type": "llmEngine", "data": {"label": "Answerer"}},
                {"id": "n4", "type": "output", "data": {}}
            ],
            "edges": [
                {"source": "n1", "target": "n2"},
                {"source": "n2", "target": "n3"},
                {"source": "n3", "target": "n4"}
            ]
        })));

        assert_eq!(graph.nodes().len(), 4);
        assert_eq!(graph.execution_order(), ["n1", "n2", "n3", "n4"]);
        assert!(graph.has_kind(ComponentKind::Retrieval));
        assert!(graph.has_kind(ComponentKind::Generation));
        assert_eq!(graph.first_input_query(), Some("what is rust"));
        assert_eq!(graph.node("n3").unwrap().label, "Answerer");
        assert_eq!(graph.node("n2").unwrap().label, "vector_search");
    }

    #[test]
    fn test_unknown_nodes_dropped_with_their_edges() {
        let graph = ExecutionGraph::parse(&definition(json!({
            "nodes": [
                {"id": "n1", "type": "input", "data": {}},
                {"id": "n2", "type": "webhook", "data": {}},
                {"id": "n3", "type": "output", "data": {}}
            ],
            "edges": [
                {"source": "n1", "target": "n2"},
                {"source": "n2", "target": "n3"},
                {"source": "n1", "target": "n3"}
            ]
        })));

        assert_eq!(graph.nodes().len(), 2);
        assert!(graph.node("n2").is_none());
        // only the n1 -> n3 edge survives
        assert_eq!(graph.edges().len(), 1);
        assert_eq!(graph.execution_order(), ["n1", "n3"]);
    }

    #[test]
    fn test_first_input_query_follows_execution_order() {
        // "a" is declared first but depends on "b", so "b" executes
        // first and its query wins
        let graph = ExecutionGraph::parse(&definition(json!({
            "nodes": [
                {"id": "a", "type": "input", "data": {"query": "from a"}},
                {"id": "b", "type": "input", "data": {"query": "from b"}}
            ],
            "edges": [{"source": "b", "target": "a"}]
        })));

        assert_eq!(graph.execution_order(), ["b", "a"]);
        assert_eq!(graph.first_input_query(), Some("from b"));
    }

    #[test]
    fn test_first_input_query_skips_empty_queries() {
        let graph = ExecutionGraph::parse(&definition(json!({
            "nodes": [
                {"id": "a", "type": "input", "data": {}},
                {"id": "b", "type": "input", "data": {"query": "configured"}}
            ],
            "edges": []
        })));

        assert_eq!(graph.first_input_query(), Some("configured"));
    }

    #[test]
    fn test_empty_definition() {
        let graph = ExecutionGraph::parse(&WorkflowDefinition::default());
        assert!(graph.nodes().is_empty());
        assert!(graph.execution_order().is_empty());
        assert!(graph.first_input_query().is_none());
    }

    #[test]
    fn test_cycle_partial_order() {
        let graph = ExecutionGraph::parse(&definition(json!({
            "nodes": [
                {"id": "a", "type": "input", "data": {}},
                {"id": "b", "type": "llm", "data": {}},
                {"id": "c", "type": "llm", "data": {}}
            ],
            "edges": [
                {"source": "b", "target": "c"},
                {"source": "c", "target": "b"}
            ]
        })));

        // b and c cycle; only a executes
        assert_eq!(graph.execution_order(), ["a"]);
        assert_eq!(graph.nodes().len(), 3);
    }

    #[test]
    fn test_edge_to_missing_node_ignored() {
        let graph = ExecutionGraph::parse(&definition(json!({
            "nodes": [{"id": "a", "type": "input", "data": {}}],
            "edges": [{"source": "a", "target": "ghost"}]
        })));

        assert!(graph.edges().is_empty());
        assert_eq!(graph.execution_order(), ["a"]);
    }
}
