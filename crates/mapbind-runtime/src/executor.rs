//! The statement-executor seam.
//!
//! Everything below statement dispatch - connections, transactions, the
//! actual database driver - lives behind [`StatementExecutor`]. The
//! runtime model never talks to a backend directly; sessions hand parsed
//! statements and their arguments to whatever executor they were built
//! with. Tests substitute recording executors; [`NullExecutor`] is the
//! do-nothing reference implementation.

use anyhow::Result;
use serde_json::Value;

use crate::statement::Statement;

/// Executes parsed statements against some backend.
pub trait StatementExecutor: Send + Sync {
    /// Run a statement with its arguments, returning the backend's result.
    fn execute(&self, statement: &Statement, args: &Value) -> Result<Value>;

    /// A short name for the backend, used in logs.
    fn backend_name(&self) -> &str {
        "unnamed"
    }
}

/// An executor with no backend: accepts every statement, returns null.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullExecutor;

impl StatementExecutor for NullExecutor {
    fn execute(&self, _statement: &Statement, _args: &Value) -> Result<Value> {
        Ok(Value::Null)
    }

    fn backend_name(&self) -> &str {
        "null"
    }
}
