use thiserror::Error;

/// Errors that can occur while answering a question
#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("Question cannot be empty")]
    EmptyQuestion,

    #[error("The assistant is not configured")]
    Disabled,

    #[error("Language model error: {0}")]
    Llm(String),

    #[error("The question cannot be answered from the census data")]
    Unanswerable,

    #[error("Generated query rejected: {0}")]
    UnsafeQuery(String),

    #[error("Query execution failed: {0}")]
    Execution(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type AssistantResult<T> = Result<T, AssistantError>;
