//! Statement declarations and their parsed executable form.
//!
//! A mapper interface declares its statements as [`StatementSpec`] values:
//! an id, a kind, and raw SQL text with `#{name}` parameter placeholders.
//! Registration parses each declaration into a [`Statement`] - the form the
//! dispatch table holds - extracting the ordered parameter names along the
//! way. Parsing is where registration can fail: malformed declarations
//! never reach the registry.

use serde::{Deserialize, Serialize};

use crate::errors::StatementError;

/// What kind of SQL operation a statement performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
}

/// A declared (unparsed) statement, as written on a mapper interface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementSpec {
    /// Statement id, unique within its mapper.
    pub id: String,
    /// Operation kind.
    pub kind: StatementKind,
    /// Raw SQL text with `#{name}` placeholders.
    pub sql: String,
}

impl StatementSpec {
    /// Convenience constructor.
    pub fn new(id: impl Into<String>, kind: StatementKind, sql: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            sql: sql.into(),
        }
    }
}

/// A parsed, executable statement.
///
/// Produced from a [`StatementSpec`] at registration time and shared via
/// `Arc` by the dispatch table for the rest of the process lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Statement {
    id: String,
    kind: StatementKind,
    sql: String,
    params: Vec<String>,
}

impl Statement {
    /// Parse a declaration into its executable form.
    ///
    /// Fails on an empty id, empty SQL, or a malformed placeholder.
    pub fn parse(spec: &StatementSpec) -> Result<Self, StatementError> {
        let id = spec.id.trim();
        if id.is_empty() {
            return Err(StatementError::EmptyId);
        }

        let sql = spec.sql.trim();
        if sql.is_empty() {
            return Err(StatementError::EmptySql {
                statement: id.to_string(),
            });
        }

        let params = extract_params(id, sql)?;

        Ok(Self {
            id: id.to_string(),
            kind: spec.kind,
            sql: sql.to_string(),
            params,
        })
    }

    /// Statement id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Operation kind.
    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    /// The SQL text (placeholders intact - substitution is the executor's job).
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Parameter names in the order their placeholders appear.
    ///
    /// A name appears once per placeholder occurrence.
    pub fn params(&self) -> &[String] {
        &self.params
    }
}

/// Extract `#{name}` parameter names from SQL text, in order of appearance.
fn extract_params(id: &str, sql: &str) -> Result<Vec<String>, StatementError> {
    let mut params = Vec::new();
    let mut rest = sql;

    while let Some(start) = rest.find("#{") {
        let after = &rest[start + 2..];
        let end = match after.find('}') {
            Some(end) => end,
            None => {
                return Err(StatementError::UnterminatedPlaceholder {
                    statement: id.to_string(),
                })
            }
        };
        let name = after[..end].trim();
        if name.is_empty() {
            return Err(StatementError::EmptyPlaceholder {
                statement: id.to_string(),
            });
        }
        params.push(name.to_string());
        rest = &after[end + 1..];
    }

    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_statement_with_ordered_params() {
        let spec = StatementSpec::new(
            "findByNameAndAge",
            StatementKind::Select,
            "SELECT * FROM users WHERE name = #{name} AND age > #{age}",
        );
        let stmt = Statement::parse(&spec).expect("parse");
        assert_eq!(stmt.id(), "findByNameAndAge");
        assert_eq!(stmt.kind(), StatementKind::Select);
        assert_eq!(stmt.params(), ["name", "age"]);
    }

    #[test]
    fn parses_statement_without_params() {
        let spec =
            StatementSpec::new("countAll", StatementKind::Select, "SELECT COUNT(*) FROM users");
        let stmt = Statement::parse(&spec).expect("parse");
        assert!(stmt.params().is_empty());
    }

    #[test]
    fn repeated_placeholder_is_listed_per_occurrence() {
        let spec = StatementSpec::new(
            "findByEither",
            StatementKind::Select,
            "SELECT * FROM users WHERE name = #{term} OR email = #{term}",
        );
        let stmt = Statement::parse(&spec).expect("parse");
        assert_eq!(stmt.params(), ["term", "term"]);
    }

    #[test]
    fn rejects_empty_id() {
        let spec = StatementSpec::new("   ", StatementKind::Select, "SELECT 1");
        assert!(matches!(
            Statement::parse(&spec),
            Err(StatementError::EmptyId)
        ));
    }

    #[test]
    fn rejects_empty_sql() {
        let spec = StatementSpec::new("nothing", StatementKind::Update, "  ");
        assert!(matches!(
            Statement::parse(&spec),
            Err(StatementError::EmptySql { statement }) if statement == "nothing"
        ));
    }

    #[test]
    fn rejects_unterminated_placeholder() {
        let spec = StatementSpec::new(
            "broken",
            StatementKind::Select,
            "SELECT * FROM users WHERE id = #{id",
        );
        assert!(matches!(
            Statement::parse(&spec),
            Err(StatementError::UnterminatedPlaceholder { statement }) if statement == "broken"
        ));
    }

    #[test]
    fn rejects_empty_placeholder() {
        let spec = StatementSpec::new(
            "blank",
            StatementKind::Delete,
            "DELETE FROM users WHERE id = #{ }",
        );
        assert!(matches!(
            Statement::parse(&spec),
            Err(StatementError::EmptyPlaceholder { statement }) if statement == "blank"
        ));
    }
}
