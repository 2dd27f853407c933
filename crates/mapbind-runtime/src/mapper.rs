//! Mapper interfaces and their parsed dispatch tables.
//!
//! A mapper is a user-declared interface: a set of named statements that
//! callers invoke by id. Three representations:
//!
//! - [`MapperInterface`]: the trait user code implements on a marker type
//!   to declare the mapper's name and statements.
//! - [`MapperDescriptor`]: the opaque, cloneable identity of one mapper
//!   (its `TypeId`, name, and statement source). This is what bindings and
//!   the registry pass around - never the marker type itself.
//! - [`MapperMetadata`]: the parsed form held by the registry - a dispatch
//!   table from statement id to [`Statement`], built exactly once at
//!   registration and shared from then on.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error_context;
use crate::errors::StatementError;
use crate::statement::{Statement, StatementSpec};

/// A user-declared mapper interface.
///
/// Implemented on a marker type, typically a unit struct:
///
/// ```
/// use mapbind_runtime::{MapperInterface, StatementKind, StatementSpec};
///
/// struct UserMapper;
///
/// impl MapperInterface for UserMapper {
///     const NAME: &'static str = "UserMapper";
///
///     fn statements() -> Vec<StatementSpec> {
///         vec![StatementSpec::new(
///             "findById",
///             StatementKind::Select,
///             "SELECT * FROM users WHERE id = #{id}",
///         )]
///     }
/// }
/// ```
pub trait MapperInterface: 'static {
    /// Stable mapper name, used in logs and diagnostics.
    const NAME: &'static str;

    /// The mapper's statement declarations. Parsed at registration time.
    fn statements() -> Vec<StatementSpec>;
}

/// The identity of one mapper interface.
///
/// Cheap to clone; two descriptors refer to the same mapper iff their
/// `TypeId`s are equal.
#[derive(Debug, Clone)]
pub struct MapperDescriptor {
    type_id: TypeId,
    name: &'static str,
    statements: fn() -> Vec<StatementSpec>,
}

impl MapperDescriptor {
    /// Build the descriptor for a mapper interface type.
    pub fn of<M: MapperInterface>() -> Self {
        Self {
            type_id: TypeId::of::<M>(),
            name: M::NAME,
            statements: M::statements,
        }
    }

    /// The mapper's type identity.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// The mapper's declared name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Produce the mapper's statement declarations.
    pub fn statement_specs(&self) -> Vec<StatementSpec> {
        (self.statements)()
    }
}

impl PartialEq for MapperDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for MapperDescriptor {}

/// The parsed dispatch table for one registered mapper.
#[derive(Debug)]
pub struct MapperMetadata {
    name: &'static str,
    statements: HashMap<String, Arc<Statement>>,
}

impl MapperMetadata {
    /// Parse a mapper's declarations into its dispatch table.
    ///
    /// Records what is being parsed in the thread's diagnostic context as
    /// it goes, so a failure can be traced to the exact statement. Fails
    /// on any malformed declaration or a duplicated statement id; on
    /// failure no table is produced.
    pub fn build(descriptor: &MapperDescriptor) -> Result<Self, StatementError> {
        error_context::record(|ctx| {
            ctx.set_resource(descriptor.name());
            ctx.set_activity("parsing mapper statements");
        });

        let mut statements = HashMap::new();
        for spec in descriptor.statement_specs() {
            error_context::record(|ctx| ctx.set_object(spec.id.clone()));
            let stmt = Statement::parse(&spec)?;
            let id = stmt.id().to_string();
            if statements.insert(id.clone(), Arc::new(stmt)).is_some() {
                return Err(StatementError::DuplicateStatement {
                    mapper: descriptor.name().to_string(),
                    statement: id,
                });
            }
        }

        Ok(Self {
            name: descriptor.name(),
            statements,
        })
    }

    /// The mapper's name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Look up a statement by id.
    pub fn statement(&self, id: &str) -> Option<&Arc<Statement>> {
        self.statements.get(id)
    }

    /// Ids of every statement in the table (unordered).
    pub fn statement_ids(&self) -> Vec<&str> {
        self.statements.keys().map(String::as_str).collect()
    }

    /// Number of statements in the table.
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    /// Whether the mapper declares no statements.
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}
