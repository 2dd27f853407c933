//! Error taxonomy for the runtime model.
//!
//! Two families:
//! - [`StatementError`]: statement parsing / dispatch-table build failures.
//!   These are what make mapper registration fallible.
//! - [`SessionError`]: failures raised while obtaining a session or
//!   dispatching through one. These carry full context at the point of
//!   origin and are meant to be propagated, not re-wrapped.

use thiserror::Error;

/// A statement declaration could not be parsed into an executable form,
/// or a mapper's dispatch table could not be built.
#[derive(Debug, Error)]
pub enum StatementError {
    /// A statement was declared with an empty id.
    #[error("statement declared with an empty id")]
    EmptyId,

    /// A statement was declared without SQL text.
    #[error("statement '{statement}' has no SQL text")]
    EmptySql {
        /// Id of the offending statement.
        statement: String,
    },

    /// A `#{` placeholder was opened but never closed.
    #[error("statement '{statement}' has an unterminated #{{..}} placeholder")]
    UnterminatedPlaceholder {
        /// Id of the offending statement.
        statement: String,
    },

    /// A `#{}` placeholder has no parameter name inside it.
    #[error("statement '{statement}' has an empty #{{}} placeholder")]
    EmptyPlaceholder {
        /// Id of the offending statement.
        statement: String,
    },

    /// Two statements in one mapper share an id.
    #[error("mapper '{mapper}' declares statement '{statement}' more than once")]
    DuplicateStatement {
        /// Name of the mapper being registered.
        mapper: String,
        /// The duplicated statement id.
        statement: String,
    },
}

/// A session could not be obtained, or dispatch through a session failed.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No session could be obtained from the accessor.
    #[error("no session available: {reason}")]
    Unavailable {
        /// Accessor-supplied reason (backend down, factory closed, ...).
        reason: String,
    },

    /// The requested mapper was never registered with the configuration.
    #[error("mapper '{mapper}' is not registered with the configuration")]
    UnknownMapper {
        /// Name of the unregistered mapper.
        mapper: String,
    },

    /// The mapper is registered but declares no statement with this id.
    #[error("mapper '{mapper}' has no statement '{statement}'")]
    UnknownStatement {
        /// Name of the mapper that was invoked.
        mapper: String,
        /// The statement id that missed the dispatch table.
        statement: String,
    },

    /// The executor backend failed while running a statement.
    #[error("statement '{statement}' failed during execution")]
    Execution {
        /// Id of the statement that was executing.
        statement: String,
        /// Backend failure.
        #[source]
        source: anyhow::Error,
    },
}
