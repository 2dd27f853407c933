//! Binding error taxonomy.
//!
//! Phase-1 (`validate`) failures are wrapped with the offending mapper's
//! identity; phase-2 (`resolve`) failures already originate with full
//! context inside the runtime and pass through transparently.

use thiserror::Error;

use mapbind_runtime::{SessionError, StatementError};

/// Failures surfaced by a [`MapperBinding`](crate::MapperBinding).
#[derive(Debug, Error)]
pub enum BindingError {
    /// A required property is missing, or the lifecycle was driven out of
    /// order. Non-recoverable for this binding.
    #[error("binding is not configured: {0}")]
    Configuration(String),

    /// Registering the mapper with the shared configuration failed.
    /// Non-recoverable for this binding; the registry holds no partial
    /// entry for the mapper.
    #[error("failed to register mapper '{mapper}'")]
    Registration {
        /// Name of the mapper that failed to register.
        mapper: &'static str,
        /// The parse failure raised inside the runtime.
        #[source]
        source: StatementError,
    },

    /// A runtime failure during resolution, propagated unchanged.
    #[error(transparent)]
    Session(#[from] SessionError),
}
