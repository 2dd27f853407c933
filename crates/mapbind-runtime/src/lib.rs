//! Mapbind Runtime
//!
//! The mapping-runtime model the mapbind bridge binds against.
//!
//! This crate provides:
//! - [`statement`]: statement declarations and their parsed executable form
//! - [`mapper`]: mapper interfaces, descriptors, and dispatch tables
//! - [`registry`]: the shared configuration registry with register-once semantics
//! - [`session`]: sessions, session access, and the reference session factory
//! - [`executor`]: the statement-executor seam hiding transport and transactions
//! - [`proxy`]: the resolved mapper proxy handle
//! - [`error_context`]: thread-scoped diagnostic context
//!
//! # Shape
//!
//! A mapper is declared once as a [`MapperInterface`] and identified
//! everywhere else by its [`MapperDescriptor`]. Registering a descriptor
//! parses its statements into a [`MapperMetadata`] dispatch table held by
//! the shared [`MapperRegistry`]; a [`Session`] then hands out
//! [`MapperProxy`] values that dispatch statement ids through that table
//! against the session's [`StatementExecutor`].

pub mod error_context;
pub mod errors;
pub mod executor;
pub mod mapper;
pub mod proxy;
pub mod registry;
pub mod session;
pub mod statement;

pub use errors::{SessionError, StatementError};
pub use executor::{NullExecutor, StatementExecutor};
pub use mapper::{MapperDescriptor, MapperInterface, MapperMetadata};
pub use proxy::MapperProxy;
pub use registry::MapperRegistry;
pub use session::{Session, SessionAccessor, SessionFactory};
pub use statement::{Statement, StatementKind, StatementSpec};
