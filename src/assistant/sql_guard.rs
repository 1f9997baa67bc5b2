// Validation of model-generated SQL
//
// The guard tokenizes the statement instead of prefix-matching it, so
// keywords hidden after a semicolon or inside a CTE are still seen. It is
// one layer only: statements also run in a read-only transaction on a
// connection meant for a SELECT-only role (see `executor`).

use super::errors::{AssistantError, AssistantResult};

/// Keywords that modify data, schema, privileges or session state
const FORBIDDEN_KEYWORDS: &[&str] = &[
    "INSERT", "UPDATE", "DELETE", "MERGE", "UPSERT", "DROP", "ALTER", "CREATE", "TRUNCATE",
    "GRANT", "REVOKE", "COPY", "CALL", "DO", "EXECUTE", "EXEC", "PREPARE", "DEALLOCATE",
    "LOCK", "VACUUM", "ANALYZE", "REINDEX", "CLUSTER", "REFRESH", "COMMENT", "SET", "RESET",
    "LISTEN", "NOTIFY", "UNLISTEN", "LOAD", "DISCARD", "INTO", "BEGIN", "COMMIT", "ROLLBACK",
    "SAVEPOINT", "IMPORT",
];

/// Functions with side effects or access outside the census tables
const FORBIDDEN_FUNCTIONS: &[&str] = &[
    "PG_SLEEP", "PG_SLEEP_FOR", "PG_SLEEP_UNTIL", "PG_READ_FILE", "PG_READ_BINARY_FILE",
    "PG_LS_DIR", "PG_STAT_FILE", "LO_IMPORT", "LO_EXPORT", "LO_GET", "LO_PUT", "DBLINK",
    "DBLINK_EXEC", "SET_CONFIG", "CURRENT_SETTING", "PG_TERMINATE_BACKEND",
    "PG_CANCEL_BACKEND", "PG_RELOAD_CONF", "PG_ADVISORY_LOCK", "PG_ADVISORY_XACT_LOCK",
    "QUERY_TO_XML", "QUERY_TO_XML_AND_XMLSCHEMA", "NEXTVAL", "SETVAL",
];

/// A statement that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOnlyQuery(String);

impl ReadOnlyQuery {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Strips markdown fences, whitespace and trailing semicolons from model output
///
/// # Example
/// ```
/// use censo_api::assistant::sql_guard::clean_model_output;
///
/// let raw = "```sql\nSELECT COUNT(*) FROM habitante;\n```";
/// assert_eq!(clean_model_output(raw), "SELECT COUNT(*) FROM habitante");
/// ```
pub fn clean_model_output(raw: &str) -> String {
    let mut text = raw.trim();

    if let Some(stripped) = text.strip_prefix("```") {
        let stripped = stripped
            .strip_prefix("sql")
            .or_else(|| stripped.strip_prefix("SQL"))
            .or_else(|| stripped.strip_prefix("postgresql"))
            .unwrap_or(stripped);
        text = stripped.trim();
    }
    if let Some(stripped) = text.strip_suffix("```") {
        text = stripped.trim();
    }

    let text = text.trim_start_matches("SQL:").trim();
    text.trim_end_matches(|c: char| c == ';' || c.is_whitespace())
        .to_string()
}

/// Whether the model declined to produce a query
pub fn is_refusal(cleaned: &str) -> bool {
    cleaned.trim_start().to_ascii_uppercase().starts_with("ERROR")
}

/// Validates that a cleaned statement is a single read-only query
///
/// # Rules
/// - Exactly one statement: no `;` outside literals and comments
/// - Starts with `SELECT` or `WITH`
/// - No data-modifying or session-altering keyword anywhere
/// - No side-effecting function
/// - No dollar-quoting and no backslashes in string literals
/// - Balanced parentheses
pub fn validate(sql: &str) -> AssistantResult<ReadOnlyQuery> {
    let sql = sql
        .trim()
        .trim_end_matches(|c: char| c == ';' || c.is_whitespace());
    if sql.is_empty() {
        return Err(reject("the model returned an empty statement"));
    }

    let words = scan_words(sql).map_err(reject)?;

    match words.first().map(String::as_str) {
        Some("SELECT") | Some("WITH") => {}
        Some(other) => {
            return Err(reject(format!(
                "only SELECT queries are allowed, found {}",
                other
            )))
        }
        None => return Err(reject("no SQL keywords found")),
    }

    if let Some(word) = words
        .iter()
        .find(|w| FORBIDDEN_KEYWORDS.contains(&w.as_str()))
    {
        return Err(reject(format!("keyword {} is not allowed", word)));
    }
    if let Some(word) = words
        .iter()
        .find(|w| FORBIDDEN_FUNCTIONS.contains(&w.as_str()))
    {
        return Err(reject(format!("function {} is not allowed", word)));
    }

    Ok(ReadOnlyQuery(sql.to_string()))
}

fn reject(reason: impl Into<String>) -> AssistantError {
    AssistantError::UnsafeQuery(reason.into())
}

/// Collects the uppercased bare words of a statement
///
/// String literals, quoted identifiers and comments are skipped; structural
/// violations (statement separators, dollar quotes, unbalanced parentheses,
/// unterminated literals) are reported as errors.
fn scan_words(sql: &str) -> Result<Vec<String>, String> {
    let chars: Vec<char> = sql.chars().collect();
    let mut words = Vec::new();
    let mut depth: i32 = 0;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '\'' => {
                i += 1;
                loop {
                    match chars.get(i) {
                        None => return Err("unterminated string literal".to_string()),
                        Some('\\') => {
                            return Err("backslashes are not allowed in string literals".to_string())
                        }
                        Some('\'') if chars.get(i + 1) == Some(&'\'') => i += 2,
                        Some('\'') => {
                            i += 1;
                            break;
                        }
                        Some(_) => i += 1,
                    }
                }
            }
            '"' => {
                i += 1;
                loop {
                    match chars.get(i) {
                        None => return Err("unterminated quoted identifier".to_string()),
                        Some('"') if chars.get(i + 1) == Some(&'"') => i += 2,
                        Some('"') => {
                            i += 1;
                            break;
                        }
                        Some(_) => i += 1,
                    }
                }
            }
            '-' if chars.get(i + 1) == Some(&'-') => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            '/' if chars.get(i + 1) == Some(&'*') => {
                // Block comments nest in PostgreSQL
                let mut nesting = 1;
                i += 2;
                while nesting > 0 {
                    match (chars.get(i), chars.get(i + 1)) {
                        (None, _) => return Err("unterminated block comment".to_string()),
                        (Some('/'), Some('*')) => {
                            nesting += 1;
                            i += 2;
                        }
                        (Some('*'), Some('/')) => {
                            nesting -= 1;
                            i += 2;
                        }
                        _ => i += 1,
                    }
                }
            }
            ';' => return Err("multiple statements are not allowed".to_string()),
            '$' => return Err("dollar-quoted strings and parameters are not allowed".to_string()),
            '(' => {
                depth += 1;
                i += 1;
            }
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return Err("unbalanced parentheses".to_string());
                }
                i += 1;
            }
            c if c.is_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                words.push(word.to_uppercase());
            }
            _ => i += 1,
        }
    }

    if depth != 0 {
        return Err("unbalanced parentheses".to_string());
    }
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejected(sql: &str) -> bool {
        matches!(validate(sql), Err(AssistantError::UnsafeQuery(_)))
    }

    #[test]
    fn clean_strips_fences_and_semicolons() {
        assert_eq!(
            clean_model_output("```sql\nSELECT 1;\n```"),
            "SELECT 1"
        );
        assert_eq!(clean_model_output("  SELECT 1 ;; "), "SELECT 1");
        assert_eq!(clean_model_output("```\nSELECT 1\n```"), "SELECT 1");
        assert_eq!(clean_model_output("SQL: SELECT 1"), "SELECT 1");
    }

    #[test]
    fn refusal_detected() {
        assert!(is_refusal("ERROR: Imposible de responder"));
        assert!(is_refusal("  error: no"));
        assert!(!is_refusal("SELECT 'ERROR'"));
    }

    #[test]
    fn accepts_plain_select() {
        let query = validate("SELECT COUNT(*) FROM habitante WHERE sexo = 'F'").unwrap();
        assert_eq!(query.as_str(), "SELECT COUNT(*) FROM habitante WHERE sexo = 'F'");
    }

    #[test]
    fn accepts_lowercase_and_trailing_semicolon() {
        assert!(validate("select nombre from municipio;").is_ok());
    }

    #[test]
    fn accepts_read_only_cte() {
        let sql = "WITH conteo AS (SELECT vivienda_id, COUNT(*) AS n FROM habitante GROUP BY vivienda_id) \
                   SELECT AVG(n) FROM conteo";
        assert!(validate(sql).is_ok());
    }

    #[test]
    fn keywords_inside_literals_are_ignored() {
        assert!(validate("SELECT * FROM habitante WHERE nombre_completo = 'Delete; Drop'").is_ok());
        assert!(validate("SELECT nombre AS \"update\" FROM municipio").is_ok());
        assert!(validate("SELECT 'it''s' AS x").is_ok());
    }

    #[test]
    fn rejects_non_select_statements() {
        assert!(rejected("DELETE FROM habitante"));
        assert!(rejected("UPDATE vivienda SET direccion = 'x'"));
        assert!(rejected("DROP TABLE habitante"));
        assert!(rejected("EXPLAIN ANALYZE SELECT 1"));
    }

    #[test]
    fn rejects_stacked_statements() {
        assert!(rejected("SELECT 1; DROP TABLE habitante"));
        assert!(rejected("SELECT 1; SELECT 2"));
    }

    #[test]
    fn rejects_data_modifying_cte() {
        assert!(rejected(
            "WITH gone AS (DELETE FROM habitante RETURNING id) SELECT COUNT(*) FROM gone"
        ));
    }

    #[test]
    fn rejects_select_into() {
        assert!(rejected("SELECT * INTO copia FROM habitante"));
    }

    #[test]
    fn rejects_locking_reads() {
        assert!(rejected("SELECT * FROM vivienda FOR UPDATE"));
    }

    #[test]
    fn rejects_side_effect_functions() {
        assert!(rejected("SELECT pg_sleep(10)"));
        assert!(rejected("SELECT set_config('role', 'postgres', false)"));
        assert!(rejected("SELECT query_to_xml('delete from habitante', true, true, '')"));
    }

    #[test]
    fn comments_cannot_hide_statements() {
        assert!(rejected("SELECT 1 /* harmless */; DELETE FROM habitante"));
        assert!(validate("SELECT 1 -- DROP TABLE habitante").is_ok());
        assert!(validate("SELECT 1 /* outer /* DELETE */ still comment */").is_ok());
    }

    #[test]
    fn rejects_quoting_tricks() {
        assert!(rejected("SELECT $$; DROP TABLE habitante; $$"));
        assert!(rejected("SELECT E'\\'; DROP TABLE habitante; --'"));
        assert!(rejected("SELECT 'unterminated"));
        assert!(rejected("SELECT (1"));
        assert!(rejected("SELECT 1) UNION (SELECT 2"));
    }

    #[test]
    fn rejects_empty_statement() {
        assert!(rejected(""));
        assert!(rejected(" ; "));
    }
}
