//! Component kinds and node-type alias resolution

use serde::{Deserialize, Serialize};

/// The closed set of components the engine can execute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    Input,
    Retrieval,
    Generation,
    Output,
}

impl ComponentKind {
    /// Resolve the freeform `type` string the builder emits.
    ///
    /// The builder has gone through several naming conventions, so each
    /// kind accepts its historical aliases. Unknown types resolve to
    /// `None` and are dropped by the parser.
    pub fn from_node_type(node_type: &str) -> Option<Self> {
        match node_type {
            "input" | "userQuery" | "user_query" | "UserQuery" => Some(Self::Input),
            "knowledgeBase" | "knowledge_base" | "KnowledgeBase" => Some(Self::Retrieval),
            "llm" | "llmEngine" | "llm_engine" | "LLM" => Some(Self::Generation),
            "output" | "Output" => Some(Self::Output),
            _ => None,
        }
    }

    /// Short label used in execution logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Retrieval => "vector_search",
            Self::Generation => "llm",
            Self::Output => "output",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_aliases() {
        for alias in ["input", "userQuery", "user_query", "UserQuery"] {
            assert_eq!(
                ComponentKind::from_node_type(alias),
                Some(ComponentKind::Input),
                "alias {alias}"
            );
        }
    }

    #[test]
    fn test_retrieval_aliases() {
        for alias in ["knowledgeBase", "knowledge_base", "KnowledgeBase"] {
            assert_eq!(
                ComponentKind::from_node_type(alias),
                Some(ComponentKind::Retrieval)
            );
        }
    }

    #[test]
    fn test_generation_aliases() {
        for alias in ["llm", "llmEngine", "llm_engine", "LLM"] {
            assert_eq!(
                ComponentKind::from_node_type(alias),
                Some(ComponentKind::Generation)
            );
        }
    }

    #[test]
    fn test_output_aliases() {
        for alias in ["output", "Output"] {
            assert_eq!(
                ComponentKind::from_node_type(alias),
                Some(ComponentKind::Output)
            );
        }
    }

    #[test]
    fn test_unknown_type() {
        assert_eq!(ComponentKind::from_node_type("webhook"), None);
        assert_eq!(ComponentKind::from_node_type(""), None);
        // resolution is exact, not case-folded
        assert_eq!(ComponentKind::from_node_type("INPUT"), None);
    }

    #[test]
    fn test_labels() {
        assert_eq!(ComponentKind::Input.label(), "input");
        assert_eq!(ComponentKind::Retrieval.label(), "vector_search");
        assert_eq!(ComponentKind::Generation.label(), "llm");
        assert_eq!(ComponentKind::Output.label(), "output");
    }
}
