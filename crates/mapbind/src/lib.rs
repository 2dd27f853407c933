//! Mapbind
//!
//! A bridge between a host container's managed-object lifecycle and a
//! SQL-mapping runtime: given a mapper interface and access to runtime
//! sessions, a [`MapperBinding`] makes sure the runtime knows the
//! interface's statements exactly once, then serves a long-lived proxy
//! that routes statement invocations to runtime-resolved execution.
//!
//! This crate provides:
//! - [`MapperBinding`]: the per-interface binding with its two-phase
//!   lifecycle (`validate()` then `resolve()`)
//! - [`BindingError`]: the binding's error taxonomy
//!
//! The runtime model (registry, sessions, executors, proxies) lives in
//! [`mapbind_runtime`].

pub mod binding;
pub mod errors;

pub use binding::MapperBinding;
pub use errors::BindingError;
