// Execution of validated assistant queries

use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::PgPool;

use super::errors::{AssistantError, AssistantResult};
use super::sql_guard::ReadOnlyQuery;

/// Runs a validated query and returns its rows as JSON objects
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn fetch_json(
        &self,
        query: &ReadOnlyQuery,
        row_limit: u32,
    ) -> AssistantResult<Vec<Value>>;
}

/// PostgreSQL executor
///
/// Each query runs inside a `READ ONLY` transaction with a statement
/// timeout, and the transaction is always rolled back.
pub struct PostgresQueryExecutor {
    pool: PgPool,
    statement_timeout_ms: u64,
}

impl PostgresQueryExecutor {
    pub fn new(pool: PgPool, statement_timeout_ms: u64) -> Self {
        Self {
            pool,
            statement_timeout_ms,
        }
    }
}

/// Wraps a query so the database aggregates at most `row_limit` rows into a JSON array
///
/// Each row becomes an ordered array of `[column, value]` pairs, so columns
/// sharing a name survive the trip. The generated SQL sits on its own lines
/// so a trailing line comment cannot swallow the wrapper.
fn wrap_query(sql: &str, row_limit: u32) -> String {
    format!(
        "SELECT COALESCE(json_agg(( \
            SELECT json_agg(json_build_array(e.key, e.value) ORDER BY e.n) \
            FROM json_each(row_to_json(q)) WITH ORDINALITY AS e(key, value, n) \
        )), '[]'::json) \
        FROM (SELECT * FROM (\n{}\n) AS generated LIMIT {}) AS q",
        sql, row_limit
    )
}

/// Turns a row of `[column, value]` pairs into a JSON object
///
/// Repeated column names get a numeric suffix: `nombre`, `nombre_2`, ...
fn row_to_object(row: Value) -> Value {
    let mut object = Map::new();
    let Value::Array(pairs) = row else {
        return Value::Object(object);
    };

    for pair in pairs {
        let Value::Array(mut pair) = pair else {
            continue;
        };
        if pair.len() != 2 {
            continue;
        }
        let value = pair.pop().unwrap_or(Value::Null);
        let column = match pair.pop() {
            Some(Value::String(column)) => column,
            _ => continue,
        };

        let mut key = column.clone();
        let mut suffix = 2;
        while object.contains_key(&key) {
            key = format!("{}_{}", column, suffix);
            suffix += 1;
        }
        object.insert(key, value);
    }
    Value::Object(object)
}

#[async_trait]
impl QueryExecutor for PostgresQueryExecutor {
    async fn fetch_json(
        &self,
        query: &ReadOnlyQuery,
        row_limit: u32,
    ) -> AssistantResult<Vec<Value>> {
        let execution = |e: sqlx::Error| AssistantError::Execution(e.to_string());

        let mut tx = self.pool.begin().await.map_err(execution)?;

        sqlx::query("SET TRANSACTION READ ONLY")
            .execute(&mut *tx)
            .await
            .map_err(execution)?;
        sqlx::query(&format!(
            "SET LOCAL statement_timeout = {}",
            self.statement_timeout_ms
        ))
        .execute(&mut *tx)
        .await
        .map_err(execution)?;

        let result: Result<(Value,), sqlx::Error> =
            sqlx::query_as(&wrap_query(query.as_str(), row_limit))
                .fetch_one(&mut *tx)
                .await;

        tx.rollback().await.map_err(execution)?;

        match result.map_err(execution)?.0 {
            Value::Array(rows) => Ok(rows.into_iter().map(row_to_object).collect()),
            Value::Null => Ok(Vec::new()),
            other => Ok(vec![row_to_object(other)]),
        }
    }
}
