use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::errors::{AssistantError, AssistantResult};
use super::executor::QueryExecutor;
use super::llm::LanguageModel;
use super::prompts::{library, PromptTemplate};
use super::sql_guard::{self, ReadOnlyQuery};
use super::types::AssistantAnswer;
use crate::db::census_schema_ddl;

/// Default cap on rows returned by a generated query
pub const DEFAULT_ROW_LIMIT: u32 = 200;

/// Answers census questions by generating, validating and running SQL
pub struct QueryAssistant {
    model: Arc<dyn LanguageModel>,
    executor: Arc<dyn QueryExecutor>,
    schema: String,
    sql_prompt: PromptTemplate,
    answer_prompt: PromptTemplate,
    row_limit: u32,
}

impl QueryAssistant {
    pub fn new(model: Arc<dyn LanguageModel>, executor: Arc<dyn QueryExecutor>) -> Self {
        Self {
            model,
            executor,
            schema: census_schema_ddl(),
            sql_prompt: library::sql_generation(),
            answer_prompt: library::answer_phrasing(),
            row_limit: DEFAULT_ROW_LIMIT,
        }
    }

    pub fn with_row_limit(mut self, row_limit: u32) -> Self {
        self.row_limit = row_limit.max(1);
        self
    }

    /// Answer a free-text question
    ///
    /// The model output is cleaned and validated before anything reaches
    /// the database; the generated SQL is returned with the answer.
    pub async fn ask(&self, question: &str) -> AssistantResult<AssistantAnswer> {
        let question = question.trim();
        if question.is_empty() {
            return Err(AssistantError::EmptyQuestion);
        }

        let request_id = Uuid::new_v4();
        tracing::info!(%request_id, question, "Assistant question received");

        let query = self.generate_sql(request_id, question).await?;
        tracing::debug!(%request_id, sql = query.as_str(), "Generated SQL accepted");

        let rows = self
            .executor
            .fetch_json(&query, self.row_limit)
            .await
            .map_err(|e| {
                tracing::warn!(%request_id, error = %e, "Generated SQL failed to execute");
                e
            })?;
        tracing::info!(%request_id, row_count = rows.len(), "Generated SQL executed");

        let rows_json = serde_json::to_string(&rows)?;
        let prompt = self.answer_prompt.render(&HashMap::from([
            ("question", question),
            ("rows", rows_json.as_str()),
        ]));
        let answer = self
            .model
            .generate(&self.answer_prompt.system, &prompt)
            .await?
            .trim()
            .to_string();

        tracing::info!(
            %request_id,
            template = %self.answer_prompt.name,
            version = %self.answer_prompt.version,
            "Assistant answer produced"
        );

        Ok(AssistantAnswer {
            request_id,
            question: question.to_string(),
            sql: query.as_str().to_string(),
            row_count: rows.len(),
            rows,
            answer,
        })
    }

    /// Ask the model for SQL and run it through the guard
    async fn generate_sql(&self, request_id: Uuid, question: &str) -> AssistantResult<ReadOnlyQuery> {
        let prompt = self.sql_prompt.render(&HashMap::from([
            ("schema", self.schema.as_str()),
            ("question", question),
        ]));

        let raw = self.model.generate(&self.sql_prompt.system, &prompt).await?;
        let cleaned = sql_guard::clean_model_output(&raw);

        if sql_guard::is_refusal(&cleaned) {
            tracing::info!(%request_id, "Model declined to answer");
            return Err(AssistantError::Unanswerable);
        }

        sql_guard::validate(&cleaned).map_err(|e| {
            tracing::warn!(%request_id, sql = %cleaned, error = %e, "Generated SQL rejected");
            e
        })
    }
}
