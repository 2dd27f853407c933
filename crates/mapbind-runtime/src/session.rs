//! Sessions and session access.
//!
//! A [`Session`] pairs the shared mapper registry with a statement
//! executor: it is the unit of work callers dispatch statements through.
//! Sessions are cheap handles (two `Arc`s) - cloning one does not open
//! anything.
//!
//! [`SessionAccessor`] is the seam the binding layer consumes: "give me a
//! session for the current caller". Whether that session is fresh or
//! reused per thread/transaction is the accessor's policy, not the
//! caller's. [`SessionFactory`] is the reference accessor: it owns one
//! registry and one executor and hands out sessions unconditionally.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::errors::SessionError;
use crate::executor::{NullExecutor, StatementExecutor};
use crate::mapper::MapperDescriptor;
use crate::proxy::MapperProxy;
use crate::registry::MapperRegistry;
use crate::statement::Statement;

/// Supplies sessions on demand.
///
/// Implementations decide session freshness and reuse; callers must not
/// assume two calls return the same session.
pub trait SessionAccessor: Send + Sync {
    /// Get a session for the current caller.
    fn session(&self) -> Result<Session, SessionError>;
}

/// A unit of work: the shared configuration plus an executor.
#[derive(Clone)]
pub struct Session {
    registry: Arc<MapperRegistry>,
    executor: Arc<dyn StatementExecutor>,
}

impl Session {
    /// Create a session over a registry and executor.
    pub fn new(registry: Arc<MapperRegistry>, executor: Arc<dyn StatementExecutor>) -> Self {
        Self { registry, executor }
    }

    /// The shared configuration registry.
    pub fn configuration(&self) -> &Arc<MapperRegistry> {
        &self.registry
    }

    /// Get a proxy for a registered mapper.
    ///
    /// Fails with [`SessionError::UnknownMapper`] if the type was never
    /// registered with the configuration.
    pub fn mapper(&self, descriptor: &MapperDescriptor) -> Result<MapperProxy, SessionError> {
        let metadata =
            self.registry
                .metadata(descriptor.type_id())
                .ok_or_else(|| SessionError::UnknownMapper {
                    mapper: descriptor.name().to_string(),
                })?;
        debug!(mapper = metadata.name(), "constructed mapper proxy");
        Ok(MapperProxy::new(metadata, self.clone()))
    }

    /// Run a parsed statement through this session's executor.
    pub fn execute(&self, statement: &Statement, args: &Value) -> Result<Value, SessionError> {
        self.executor
            .execute(statement, args)
            .map_err(|source| SessionError::Execution {
                statement: statement.id().to_string(),
                source,
            })
    }
}

/// The reference [`SessionAccessor`]: one registry, one executor, always
/// available.
///
/// Every binding sharing a factory shares its registry, which is what
/// makes register-once across bindings meaningful.
pub struct SessionFactory {
    registry: Arc<MapperRegistry>,
    executor: Arc<dyn StatementExecutor>,
}

impl SessionFactory {
    /// Create a factory with an empty registry and the given executor.
    pub fn new(executor: Arc<dyn StatementExecutor>) -> Self {
        Self {
            registry: Arc::new(MapperRegistry::new()),
            executor,
        }
    }

    /// Create a factory over an existing (possibly pre-populated) registry.
    pub fn with_registry(
        registry: Arc<MapperRegistry>,
        executor: Arc<dyn StatementExecutor>,
    ) -> Self {
        Self { registry, executor }
    }

    /// The factory's shared registry.
    pub fn registry(&self) -> &Arc<MapperRegistry> {
        &self.registry
    }
}

impl Default for SessionFactory {
    fn default() -> Self {
        Self::new(Arc::new(NullExecutor))
    }
}

impl SessionAccessor for SessionFactory {
    fn session(&self) -> Result<Session, SessionError> {
        Ok(Session::new(
            Arc::clone(&self.registry),
            Arc::clone(&self.executor),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_context;
    use crate::mapper::MapperInterface;
    use crate::statement::{StatementKind, StatementSpec};

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

    #[test]
    fn factory_sessions_share_one_registry() {
        let factory = SessionFactory::default();
        let a = factory.session().expect("session");
        let b = factory.session().expect("session");
        assert!(Arc::ptr_eq(a.configuration(), b.configuration()));
        assert!(Arc::ptr_eq(a.configuration(), factory.registry()));
    }

    #[test]
    fn mapper_fails_for_unregistered_type() {
        let factory = SessionFactory::default();
        let session = factory.session().expect("session");
        let err = session
            .mapper(&MapperDescriptor::of::<UserMapper>())
            .expect_err("unregistered");
        assert!(matches!(
            err,
            SessionError::UnknownMapper { mapper } if mapper == "UserMapper"
        ));
    }

    #[test]
    fn mapper_resolves_after_registration() {
        let factory = SessionFactory::default();
        let descriptor = MapperDescriptor::of::<UserMapper>();
        factory.registry().add_mapper(&descriptor).expect("register");
        error_context::reset();

        let session = factory.session().expect("session");
        let proxy = session.mapper(&descriptor).expect("proxy");
        assert_eq!(proxy.mapper_name(), "UserMapper");
    }
}
