use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A question posed to the assistant
#[derive(Debug, Clone, Deserialize)]
pub struct AssistantQuestion {
    pub question: String,
}

/// Answer produced by the assistant, with the query that backs it
#[derive(Debug, Clone, Serialize)]
pub struct AssistantAnswer {
    /// Correlates the answer with the assistant's log lines
    pub request_id: Uuid,
    pub question: String,
    pub sql: String,
    pub row_count: usize,
    pub rows: Vec<serde_json::Value>,
    pub answer: String,
}
