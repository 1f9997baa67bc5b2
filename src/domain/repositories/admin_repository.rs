use async_trait::async_trait;
use serde::Serialize;

use crate::domain::errors::CensusResult;

/// Administrator account allowed to manage census data
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Administrator {
    pub id: i32,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

/// Repository trait for administrator accounts
#[async_trait]
pub trait AdminRepository: Send + Sync {
    /// Find an administrator by username
    async fn find_by_username(&self, username: &str) -> CensusResult<Option<Administrator>>;

    /// Create an administrator with an already hashed password
    async fn create(&self, username: &str, password_hash: &str) -> CensusResult<Administrator>;
}
