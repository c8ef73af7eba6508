//! Node outputs and their log summaries

/// What a node produced, as seen by the orchestrator
#[derive(Debug, Clone, PartialEq)]
pub enum NodeOutput {
    Query {
        query: String,
    },
    Retrieval {
        context_chars: usize,
        chunks: usize,
        /// Why the node skipped itself, when it did
        skipped: Option<String>,
        /// Absorbed capability failure, when one occurred
        error: Option<String>,
    },
    Generation {
        answer: String,
        /// Set when the answer is an error message rather than a completion
        failed: bool,
    },
    Answer {
        answer: String,
    },
}

const SUMMARY_MAX_CHARS: usize = 100;

impl NodeOutput {
    /// One-line summary recorded with the node-completed log entry
    pub fn summary(&self) -> String {
        match self {
            Self::Query { query } => format!("Query: {}", truncate(query, 50)),
            Self::Retrieval { context_chars, .. } => format!("Context: {context_chars} chars"),
            Self::Generation { answer, .. } | Self::Answer { answer } => {
                format!("Answer: {}", truncate(answer, SUMMARY_MAX_CHARS))
            }
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let head: String = text.chars().take(max_chars).collect();
        format!("{head}...")
    }
}
