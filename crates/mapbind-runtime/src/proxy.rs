//! The resolved mapper proxy.
//!
//! A [`MapperProxy`] is the callable handle a binding hands to its host:
//! it pairs one mapper's dispatch table with the session it was resolved
//! against. Invoking a statement id looks the statement up in the table
//! and runs it through the session - no reflection, just an explicit map
//! built once at registration.
//!
//! Proxies are cheap to clone and behaviorally stable: the table and the
//! session binding never change after construction.

use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::error_context;
use crate::errors::SessionError;
use crate::mapper::MapperMetadata;
use crate::session::Session;

/// A callable handle bound to one mapper and one session.
#[derive(Clone)]
pub struct MapperProxy {
    metadata: Arc<MapperMetadata>,
    session: Session,
}

impl std::fmt::Debug for MapperProxy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapperProxy")
            .field("mapper", &self.metadata.name())
            .finish_non_exhaustive()
    }
}

impl MapperProxy {
    pub(crate) fn new(metadata: Arc<MapperMetadata>, session: Session) -> Self {
        Self { metadata, session }
    }

    /// The mapper this proxy dispatches for.
    pub fn mapper_name(&self) -> &'static str {
        self.metadata.name()
    }

    /// Ids of the statements this proxy can dispatch (unordered).
    pub fn statement_ids(&self) -> Vec<&str> {
        self.metadata.statement_ids()
    }

    /// Invoke a statement by id.
    ///
    /// Records the call in the thread's diagnostic context; on success the
    /// context is cleared, on failure it is left in place for the caller
    /// to inspect. Fails with [`SessionError::UnknownStatement`] when the
    /// id misses the dispatch table.
    pub fn invoke(&self, statement_id: &str, args: &Value) -> Result<Value, SessionError> {
        error_context::record(|ctx| {
            ctx.set_resource(self.metadata.name());
            ctx.set_activity("executing statement");
            ctx.set_object(statement_id);
        });

        let statement =
            self.metadata
                .statement(statement_id)
                .ok_or_else(|| SessionError::UnknownStatement {
                    mapper: self.metadata.name().to_string(),
                    statement: statement_id.to_string(),
                })?;

        debug!(
            mapper = self.metadata.name(),
            statement = statement_id,
            "dispatching statement"
        );
        let result = self.session.execute(statement, args)?;
        error_context::reset();
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::StatementExecutor;
    use crate::mapper::{MapperDescriptor, MapperInterface};
    use crate::session::{SessionAccessor, SessionFactory};
    use crate::statement::{Statement, StatementKind, StatementSpec};
    use anyhow::anyhow;
    use parking_lot::Mutex;
    use serde_json::json;

    struct UserMapper;

    impl MapperInterface for UserMapper {
        const NAME: &'static str = "UserMapper";

        fn statements() -> Vec<StatementSpec> {
            vec![StatementSpec::new(
                "findById",
                StatementKind::Select,
                "SELECT * FROM users WHERE id = #{id}",
            )]
        }
    }

    /// Records every dispatched statement id and echoes the statement SQL.
    #[derive(Default)]
    struct RecordingExecutor {
        calls: Mutex<Vec<String>>,
    }

    impl StatementExecutor for RecordingExecutor {
        fn execute(&self, statement: &Statement, _args: &Value) -> anyhow::Result<Value> {
            self.calls.lock().push(statement.id().to_string());
            Ok(json!({ "sql": statement.sql() }))
        }

        fn backend_name(&self) -> &str {
            "recording"
        }
    }

    struct FailingExecutor;

    impl StatementExecutor for FailingExecutor {
        fn execute(&self, _statement: &Statement, _args: &Value) -> anyhow::Result<Value> {
            Err(anyhow!("backend down"))
        }
    }

    fn proxy_with(executor: Arc<dyn StatementExecutor>) -> MapperProxy {
        let factory = SessionFactory::new(executor);
        let descriptor = MapperDescriptor::of::<UserMapper>();
        factory.registry().add_mapper(&descriptor).expect("register");
        error_context::reset();
        factory
            .session()
            .expect("session")
            .mapper(&descriptor)
            .expect("proxy")
    }

    #[test]
    fn invoke_dispatches_through_the_table() {
        let executor = Arc::new(RecordingExecutor::default());
        let proxy = proxy_with(executor.clone());

        let result = proxy.invoke("findById", &json!({ "id": 7 })).expect("invoke");
        assert_eq!(result["sql"], "SELECT * FROM users WHERE id = #{id}");
        assert_eq!(executor.calls.lock().as_slice(), ["findById"]);
        // Success path clears the diagnostic context.
        assert!(error_context::is_clean());
    }

    #[test]
    fn invoke_unknown_statement_fails() {
        let proxy = proxy_with(Arc::new(RecordingExecutor::default()));
        let err = proxy
            .invoke("missing", &Value::Null)
            .expect_err("unknown statement");
        assert!(matches!(
            err,
            SessionError::UnknownStatement { mapper, statement }
                if mapper == "UserMapper" && statement == "missing"
        ));
        error_context::reset();
    }

    #[test]
    fn execution_failure_keeps_diagnostic_context() {
        let proxy = proxy_with(Arc::new(FailingExecutor));
        let err = proxy
            .invoke("findById", &Value::Null)
            .expect_err("backend failure");
        assert!(matches!(err, SessionError::Execution { statement, .. } if statement == "findById"));

        let ctx = error_context::snapshot();
        assert_eq!(ctx.resource(), Some("UserMapper"));
        assert_eq!(ctx.object(), Some("findById"));
        error_context::reset();
    }

    #[test]
    fn clones_share_dispatch_behavior() {
        let executor = Arc::new(RecordingExecutor::default());
        let proxy = proxy_with(executor.clone());
        let clone = proxy.clone();

        proxy.invoke("findById", &Value::Null).expect("invoke");
        clone.invoke("findById", &Value::Null).expect("invoke");
        assert_eq!(executor.calls.lock().len(), 2);
    }
}
