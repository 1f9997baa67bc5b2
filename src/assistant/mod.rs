// Natural-language query assistant
//
// Turns a free-text question into a validated read-only SQL query, runs it
// and phrases the result with a language model.

pub mod errors;
pub mod executor;
pub mod llm;
pub mod prompts;
pub mod service;
pub mod sql_guard;
pub mod types;

pub use errors::{AssistantError, AssistantResult};
pub use executor::{PostgresQueryExecutor, QueryExecutor};
pub use llm::{GeminiClient, LanguageModel};
pub use service::QueryAssistant;
pub use types::{AssistantAnswer, AssistantQuestion};
