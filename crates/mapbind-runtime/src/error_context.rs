//! Thread-scoped diagnostic context.
//!
//! Long-running operations (statement parsing, dispatch) record what they
//! are working on here so that a failure deep inside the runtime can be
//! traced without threading a context value through every call. The
//! context is per thread and call-scoped by discipline: whoever drives an
//! operation is responsible for calling [`reset`] when the operation
//! finishes, on both the success and the failure path, so stale state
//! never leaks into an unrelated operation on the same thread.
//!
//! Facts only - the context describes what was happening, not what to do
//! about it.

use std::cell::RefCell;
use std::fmt;

thread_local! {
    static CONTEXT: RefCell<DiagnosticContext> = RefCell::new(DiagnosticContext::default());
}

/// What the current thread was doing when something went wrong.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticContext {
    /// The resource being processed (e.g. a mapper name).
    resource: Option<String>,
    /// The activity in progress (e.g. "parsing mapper statements").
    activity: Option<String>,
    /// The specific object in hand (e.g. a statement id).
    object: Option<String>,
}

impl DiagnosticContext {
    /// Set the resource being processed.
    pub fn set_resource(&mut self, resource: impl Into<String>) {
        self.resource = Some(resource.into());
    }

    /// Set the activity in progress.
    pub fn set_activity(&mut self, activity: impl Into<String>) {
        self.activity = Some(activity.into());
    }

    /// Set the specific object in hand.
    pub fn set_object(&mut self, object: impl Into<String>) {
        self.object = Some(object.into());
    }

    /// The resource being processed, if recorded.
    pub fn resource(&self) -> Option<&str> {
        self.resource.as_deref()
    }

    /// The activity in progress, if recorded.
    pub fn activity(&self) -> Option<&str> {
        self.activity.as_deref()
    }

    /// The specific object in hand, if recorded.
    pub fn object(&self) -> Option<&str> {
        self.object.as_deref()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.resource.is_none() && self.activity.is_none() && self.object.is_none()
    }
}

impl fmt::Display for DiagnosticContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }
        write!(f, "diagnostic context:")?;
        if let Some(ref resource) = self.resource {
            write!(f, " resource={}", resource)?;
        }
        if let Some(ref activity) = self.activity {
            write!(f, " activity={}", activity)?;
        }
        if let Some(ref object) = self.object {
            write!(f, " object={}", object)?;
        }
        Ok(())
    }
}

/// Record into the current thread's diagnostic context.
pub fn record(f: impl FnOnce(&mut DiagnosticContext)) {
    CONTEXT.with(|ctx| f(&mut ctx.borrow_mut()));
}

/// Snapshot the current thread's diagnostic context.
pub fn snapshot() -> DiagnosticContext {
    CONTEXT.with(|ctx| ctx.borrow().clone())
}

/// Clear the current thread's diagnostic context.
///
/// Cheap and idempotent; safe to call unconditionally.
pub fn reset() {
    CONTEXT.with(|ctx| *ctx.borrow_mut() = DiagnosticContext::default());
}

/// Whether the current thread's diagnostic context is empty.
pub fn is_clean() -> bool {
    CONTEXT.with(|ctx| ctx.borrow().is_empty())
}
