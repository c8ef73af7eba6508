//! Dynamic workflow engine implementation
//!
//! Orchestrates one execution: parse, schedule, run each node through
//! its component, stream logs, and assemble the final answer. All
//! capabilities arrive by injection; the engine holds no global state
//! beyond the log service it shares with status/streaming callers.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{error, info};
use uuid::Uuid;

use crate::domain::{
    keys, round_duration_seconds, ComponentKind, DomainError, Embedder, ExecutionContext,
    ExecutionGraph, ExecutionMeta, ExecutionRequest, ExecutionResult, ExecutionStatus,
    ExecutionStatusReport, GraphNode, LogEntry, LogLevel, LogStream, NodeSettings, TextGenerator,
    VectorStore, WebSearch, WorkflowEngine,
};
use crate::infrastructure::components::{
    GenerationComponent, InputComponent, NodeOutput, OutputComponent, RetrievalComponent,
};
use crate::infrastructure::observability::metrics;
use crate::infrastructure::services::{ExecutionLogService, LogParams};

/// Executes node/edge workflow definitions against injected capabilities
#[derive(Debug)]
pub struct DynamicWorkflowEngine {
    input: InputComponent,
    retrieval: RetrievalComponent,
    generation: GenerationComponent,
    output: OutputComponent,
    log_service: Arc<ExecutionLogService>,
}

impl DynamicWorkflowEngine {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn VectorStore>,
        generator: Arc<dyn TextGenerator>,
        search: Option<Arc<dyn WebSearch>>,
        log_service: Arc<ExecutionLogService>,
    ) -> Self {
        Self {
            input: InputComponent::new(),
            retrieval: RetrievalComponent::new(embedder, store),
            generation: GenerationComponent::new(generator, search),
            output: OutputComponent::new(),
            log_service,
        }
    }

    pub fn log_service(&self) -> &Arc<ExecutionLogService> {
        &self.log_service
    }

    /// Run one node inside the per-node failure boundary. Errors here
    /// abort the execution; soft failures come back as data.
    async fn run_node(
        &self,
        execution_id: &str,
        node: &GraphNode,
        payload: &Value,
        context: &mut ExecutionContext,
    ) -> Result<(), DomainError> {
        let node_type = node.kind.label();

        self.log_service
            .log_node_start(execution_id, &node.id, node_type, &node.label)
            .await?;

        let started = Instant::now();
        let mut failed_softly = false;

        let outcome = match &node.settings {
            NodeSettings::Input(settings) => {
                let output = self.input.run(settings, payload, context).await?;
                if let NodeOutput::Query { query } = &output {
                    let preview: String = query.chars().take(100).collect();
                    let suffix = if query.chars().count() > 100 { "..." } else { "" };
                    self.log_service
                        .log(
                            execution_id,
                            LogParams::new(LogLevel::Info, format!("Query: {preview}{suffix}"))
                                .with_node(&node.id, node_type),
                        )
                        .await?;
                }
                output
            }
            NodeSettings::Retrieval(settings) => {
                let output = self.retrieval.run(settings, payload, context).await?;
                if let NodeOutput::Retrieval { chunks, skipped, error, .. } = &output {
                    let params = if let Some(reason) = skipped {
                        LogParams::new(
                            LogLevel::Warning,
                            format!("Knowledge base skipped: {reason}"),
                        )
                        .with_node(&node.id, node_type)
                    } else if let Some(error) = error {
                        LogParams::new(
                            LogLevel::Warning,
                            "Knowledge base search failed, continuing without context",
                        )
                        .with_node(&node.id, node_type)
                        .with_metadata(json!({"error": error}))
                    } else {
                        LogParams::new(
                            LogLevel::Info,
                            format!("Retrieved {chunks} relevant chunks"),
                        )
                        .with_node(&node.id, node_type)
                        .with_metadata(json!({"chunks": chunks}))
                    };
                    self.log_service.log(execution_id, params).await?;
                }
                output
            }
            NodeSettings::Generation(settings) => {
                let output = self.generation.run(settings, payload, context).await?;
                if let NodeOutput::Generation { answer, failed } = &output {
                    if *failed {
                        // soft failure: marked failed in the log, but the
                        // node still completes and the pipeline carries on
                        failed_softly = true;
                        self.log_service
                            .log_node_error(execution_id, &node.id, node_type, answer)
                            .await?;
                        info!(node_id = %node.id, "Generation node failed softly, continuing");
                    } else {
                        let preview: String = answer.chars().take(100).collect();
                        self.log_service
                            .log(
                                execution_id,
                                LogParams::new(LogLevel::Info, "LLM response generated")
                                    .with_node(&node.id, node_type)
                                    .with_metadata(json!({
                                        "provider": settings.provider,
                                        "has_context": !context.get_str(keys::CONTEXT).is_empty(),
                                        "answer_preview": preview,
                                    })),
                            )
                            .await?;
                    }
                }
                output
            }
            NodeSettings::Output => {
                let output = self.output.run(payload, context).await?;
                self.log_service
                    .log(
                        execution_id,
                        LogParams::new(LogLevel::Info, "Output formatted")
                            .with_node(&node.id, node_type),
                    )
                    .await?;
                output
            }
        };

        let elapsed = started.elapsed();
        self.log_service
            .log_node_complete(
                execution_id,
                &node.id,
                node_type,
                elapsed.as_secs_f64() * 1000.0,
                Some(outcome.summary()),
            )
            .await?;
        metrics::record_node_execution(node_type, !failed_softly, elapsed);

        Ok(())
    }

    fn assemble_answer(graph: &ExecutionGraph, context: &ExecutionContext, query: &str) -> String {
        if graph.has_kind(ComponentKind::Generation) {
            let answer = context.get_str(keys::ANSWER);
            if answer.is_empty() {
                context.get_str(keys::OUTPUT)
            } else {
                answer
            }
        } else if graph.has_kind(ComponentKind::Retrieval) {
            let retrieved = context.get_str(keys::CONTEXT);
            if retrieved.is_empty() {
                "No relevant documents found.".to_string()
            } else {
                format!("📚 Retrieved from documents:\n\n{retrieved}")
            }
        } else {
            format!(
                "Query received: {query}\n\n⚠️ No LLM node in workflow. \
                 Add an LLM node to generate AI responses."
            )
        }
    }

    fn components_used(graph: &ExecutionGraph) -> Vec<String> {
        let mut labels = Vec::new();
        for node in graph.nodes() {
            let label = node.kind.label().to_string();
            if !labels.contains(&label) {
                labels.push(label);
            }
        }
        labels
    }
}

#[async_trait]
impl WorkflowEngine for DynamicWorkflowEngine {
    async fn execute(&self, request: ExecutionRequest) -> ExecutionResult {
        let workflow_id = request
            .workflow_id
            .or_else(|| request.definition.id.clone())
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let graph = ExecutionGraph::parse(&request.definition);
        let order = graph.execution_order().to_vec();

        let query = request
            .payload
            .get("query")
            .and_then(Value::as_str)
            .filter(|q| !q.is_empty())
            .map(str::to_string)
            .or_else(|| graph.first_input_query().map(str::to_string))
            .unwrap_or_default();

        let execution_id = self
            .log_service
            .start_execution(&workflow_id, request.user_id.as_deref(), order.len())
            .await;

        info!(
            workflow_id,
            execution_id,
            total_nodes = order.len(),
            kb_used = graph.has_kind(ComponentKind::Retrieval),
            llm_used = graph.has_kind(ComponentKind::Generation),
            "Executing workflow"
        );

        // components read the query from the payload when the context
        // has none yet, so seed both
        let mut payload = request.payload.clone();
        if !query.is_empty() {
            if let Value::Object(map) = &mut payload {
                map.entry("query".to_string())
                    .or_insert_with(|| Value::String(query.clone()));
            }
        }

        let mut context = ExecutionContext::new();
        context.set_str(keys::QUERY, query.clone());

        let started = Instant::now();
        let mut failure: Option<DomainError> = None;

        for node_id in &order {
            // order only contains surviving node ids
            let Some(node) = graph.node(node_id) else {
                continue;
            };

            let node_started = Instant::now();
            if let Err(node_error) = self
                .run_node(&execution_id, node, &payload, &mut context)
                .await
            {
                let _ = self
                    .log_service
                    .log_node_error(&execution_id, &node.id, node.kind.label(), &node_error.to_string())
                    .await;
                metrics::record_node_execution(node.kind.label(), false, node_started.elapsed());
                failure = Some(node_error);
                break;
            }
        }

        let elapsed = started.elapsed();
        let duration_seconds = round_duration_seconds(elapsed.as_secs_f64());

        match failure {
            None => {
                let answer = Self::assemble_answer(&graph, &context, &query);

                self.log_service
                    .complete_execution(&execution_id, ExecutionStatus::Completed, None)
                    .await;
                metrics::record_workflow_execution("success", elapsed);

                info!(
                    workflow_id,
                    execution_id, duration_seconds, "Workflow execution completed"
                );

                ExecutionResult::success(
                    answer,
                    query,
                    ExecutionMeta {
                        execution_id,
                        workflow_id,
                        duration_seconds,
                        status: ExecutionStatus::Completed,
                        components_used: Self::components_used(&graph),
                        kb_used: graph.has_kind(ComponentKind::Retrieval),
                        llm_used: graph.has_kind(ComponentKind::Generation),
                        context_length: context.get_str(keys::CONTEXT).chars().count(),
                        error: None,
                    },
                )
            }
            Some(node_error) => {
                let message = node_error.to_string();

                let _ = self
                    .log_service
                    .log(
                        &execution_id,
                        LogParams::new(
                            LogLevel::Error,
                            format!("Workflow execution failed: {message}"),
                        )
                        .with_metadata(json!({"error": message})),
                    )
                    .await;
                self.log_service
                    .complete_execution(
                        &execution_id,
                        ExecutionStatus::Failed,
                        Some(message.clone()),
                    )
                    .await;
                metrics::record_workflow_execution("error", elapsed);

                error!(
                    workflow_id,
                    execution_id,
                    error = %message,
                    duration_seconds,
                    "Workflow execution failed"
                );

                let meta = ExecutionMeta {
                    execution_id,
                    workflow_id,
                    duration_seconds,
                    status: ExecutionStatus::Failed,
                    components_used: Vec::new(),
                    kb_used: graph.has_kind(ComponentKind::Retrieval),
                    llm_used: graph.has_kind(ComponentKind::Generation),
                    context_length: context.get_str(keys::CONTEXT).chars().count(),
                    error: Some(message.clone()),
                };

                ExecutionResult::failure(message, meta)
            }
        }
    }

    async fn execution_status(&self, execution_id: &str) -> Option<ExecutionStatusReport> {
        self.log_service.get_status_report(execution_id).await
    }

    async fn execution_logs(&self, execution_id: &str) -> Vec<LogEntry> {
        self.log_service.get_execution_logs(execution_id).await
    }

    async fn subscribe(&self, execution_id: &str) -> LogStream {
        self.log_service.subscribe(execution_id).await
    }
}
