//! Retrieval component: similarity search into the execution context

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::warn;

use super::NodeOutput;
use crate::domain::graph::RetrievalSettings;
use crate::domain::{keys, DomainError, Embedder, ExecutionContext, ScoredChunk, VectorStore};

#[derive(Debug)]
pub struct RetrievalComponent {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
}

impl RetrievalComponent {
    pub fn new(embedder: Arc<dyn Embedder>, store: Arc<dyn VectorStore>) -> Self {
        Self { embedder, store }
    }

    pub async fn run(
        &self,
        settings: &RetrievalSettings,
        _payload: &Value,
        context: &mut ExecutionContext,
    ) -> Result<NodeOutput, DomainError> {
        if !settings.enabled {
            return Ok(self.skip(context, "disabled"));
        }
        if self.store.count().await == 0 {
            return Ok(self.skip(context, "no documents uploaded"));
        }

        let query = context.get_str(keys::QUERY);
        if query.is_empty() {
            context.set_str(keys::CONTEXT, "");
            return Ok(NodeOutput::Retrieval {
                context_chars: 0,
                chunks: 0,
                skipped: None,
                error: None,
            });
        }

        // embedding/search failures degrade to an empty context instead
        // of failing the node
        let embedding = match self.embedder.embed_query(&query).await {
            Ok(embedding) => embedding,
            Err(error) => return Ok(self.absorb(context, error)),
        };

        let results = match self.store.similarity_search(&embedding, settings.top_k).await {
            Ok(results) => results,
            Err(error) => return Ok(self.absorb(context, error)),
        };

        let mut relevant: Vec<&ScoredChunk> = results
            .iter()
            .filter(|chunk| chunk.score >= settings.threshold)
            .collect();

        // everything scored below threshold: keep the best raw hits
        // rather than answering from nothing
        if relevant.is_empty() && !results.is_empty() {
            relevant = results.iter().take(settings.top_k).collect();
        }

        let formatted = relevant
            .iter()
            .enumerate()
            .map(|(index, chunk)| {
                format!(
                    "[Document {} (relevance: {:.0}%)]\n{}",
                    index + 1,
                    chunk.score * 100.0,
                    chunk.text
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n---\n\n");

        let sources: Vec<Value> = relevant
            .iter()
            .map(|chunk| Value::String(chunk.source()))
            .collect();
        let scores: Vec<Value> = relevant.iter().map(|chunk| json!(chunk.score)).collect();

        context.set_str(keys::CONTEXT, formatted.clone());
        context.set(keys::SOURCES, Value::Array(sources));
        context.set(keys::SCORES, Value::Array(scores));

        Ok(NodeOutput::Retrieval {
            context_chars: formatted.chars().count(),
            chunks: relevant.len(),
            skipped: None,
            error: None,
        })
    }

    fn skip(&self, context: &mut ExecutionContext, reason: &str) -> NodeOutput {
        context.set_str(keys::CONTEXT, "");
        NodeOutput::Retrieval {
            context_chars: 0,
            chunks: 0,
            skipped: Some(reason.to_string()),
            error: None,
        }
    }

    fn absorb(&self, context: &mut ExecutionContext, error: DomainError) -> NodeOutput {
        warn!(error = %error, "Retrieval failed, continuing with empty context");
        context.set_str(keys::CONTEXT, "");
        NodeOutput::Retrieval {
            context_chars: 0,
            chunks: 0,
            skipped: None,
            error: Some(error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::embedding::provider::mock::MockEmbedder;
    use crate::infrastructure::vector_store::InMemoryVectorStore;
    use serde_json::json;

    fn settings(top_k: usize, threshold: f32) -> RetrievalSettings {
        RetrievalSettings {
            enabled: true,
            top_k,
            threshold,
        }
    }

    async fn store_with_chunks(
        embedder: &MockEmbedder,
        texts: &[&str],
    ) -> Arc<InMemoryVectorStore> {
        let store = Arc::new(InMemoryVectorStore::new());
        let texts: Vec<String> = texts.iter().map(|t| t.to_string()).collect();
        let embeddings = embedder.embed_texts(&texts).await.unwrap();
        store.add(embeddings, texts, None).await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_disabled_skips() {
        let embedder = Arc::new(MockEmbedder::new(8));
        let store = Arc::new(InMemoryVectorStore::new());
        let component = RetrievalComponent::new(embedder.clone(), store);
        let mut context = ExecutionContext::new();
        context.set_str(keys::QUERY, "q");

        let output = component
            .run(
                &RetrievalSettings { enabled: false, top_k: 3, threshold: 0.7 },
                &json!({}),
                &mut context,
            )
            .await
            .unwrap();

        assert_eq!(
            output,
            NodeOutput::Retrieval {
                context_chars: 0,
                chunks: 0,
                skipped: Some("disabled".into()),
                error: None
            }
        );
        assert_eq!(context.get_str(keys::CONTEXT), "");
        assert_eq!(embedder.call_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_store_skips() {
        let embedder = Arc::new(MockEmbedder::new(8));
        let store = Arc::new(InMemoryVectorStore::new());
        let component = RetrievalComponent::new(embedder, store);
        let mut context = ExecutionContext::new();
        context.set_str(keys::QUERY, "q");

        let NodeOutput::Retrieval { skipped, .. } = component
            .run(&settings(3, 0.7), &json!({}), &mut context)
            .await
            .unwrap()
        else {
            panic!("wrong variant");
        };
        assert_eq!(skipped.as_deref(), Some("no documents uploaded"));
    }

    #[tokio::test]
    async fn test_retrieves_and_formats_matching_chunk() {
        let embedder = MockEmbedder::new(8);
        let store = store_with_chunks(&embedder, &["rust is fast", "cats are soft"]).await;
        let component = RetrievalComponent::new(Arc::new(MockEmbedder::new(8)), store);

        let mut context = ExecutionContext::new();
        // identical text embeds identically under the mock, so the match
        // scores 1.0 and passes any threshold
        context.set_str(keys::QUERY, "rust is fast");

        let NodeOutput::Retrieval { chunks, context_chars, skipped, error } = component
            .run(&settings(1, 0.9), &json!({}), &mut context)
            .await
            .unwrap()
        else {
            panic!("wrong variant");
        };

        assert_eq!(chunks, 1);
        assert!(context_chars > 0);
        assert!(skipped.is_none());
        assert!(error.is_none());

        let formatted = context.get_str(keys::CONTEXT);
        assert!(formatted.starts_with("[Document 1 (relevance: "));
        assert!(formatted.contains("rust is fast"));
        assert_eq!(context.get(keys::SOURCES).unwrap().as_array().unwrap().len(), 1);
        assert_eq!(context.get(keys::SCORES).unwrap().as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_below_threshold_falls_back_to_best_hits() {
        let embedder = MockEmbedder::new(8);
        let store = store_with_chunks(&embedder, &["alpha", "beta"]).await;
        let component = RetrievalComponent::new(Arc::new(MockEmbedder::new(8)), store);

        let mut context = ExecutionContext::new();
        context.set_str(keys::QUERY, "unrelated question");

        // impossible threshold: nothing passes, but hits exist
        let NodeOutput::Retrieval { chunks, .. } = component
            .run(&settings(2, 2.0), &json!({}), &mut context)
            .await
            .unwrap()
        else {
            panic!("wrong variant");
        };

        assert_eq!(chunks, 2);
        assert!(!context.get_str(keys::CONTEXT).is_empty());
    }

    #[tokio::test]
    async fn test_empty_query_yields_empty_context() {
        let embedder = MockEmbedder::new(8);
        let store = store_with_chunks(&embedder, &["doc"]).await;
        let component = RetrievalComponent::new(Arc::new(MockEmbedder::new(8)), store);
        let mut context = ExecutionContext::new();

        let NodeOutput::Retrieval { chunks, skipped, .. } = component
            .run(&settings(3, 0.7), &json!({}), &mut context)
            .await
            .unwrap()
        else {
            panic!("wrong variant");
        };

        assert_eq!(chunks, 0);
        assert!(skipped.is_none());
        assert_eq!(context.get_str(keys::CONTEXT), "");
    }

    #[tokio::test]
    async fn test_embedder_failure_absorbed() {
        let embedder = MockEmbedder::new(8);
        let store = store_with_chunks(&embedder, &["doc"]).await;
        let failing = Arc::new(MockEmbedder::new(8).with_error("provider down"));
        let component = RetrievalComponent::new(failing, store);

        let mut context = ExecutionContext::new();
        context.set_str(keys::QUERY, "q");

        let NodeOutput::Retrieval { error, chunks, .. } = component
            .run(&settings(3, 0.7), &json!({}), &mut context)
            .await
            .unwrap()
        else {
            panic!("wrong variant");
        };

        assert_eq!(chunks, 0);
        assert!(error.unwrap().contains("provider down"));
        assert_eq!(context.get_str(keys::CONTEXT), "");
    }
}
