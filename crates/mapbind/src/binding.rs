//! The mapper binding: a two-phase bridge between a host container's
//! object lifecycle and the mapping runtime.
//!
//! One binding per mapper interface. The host drives it in two phases:
//!
//! 1. Configuration, then [`MapperBinding::validate`] exactly once -
//!    checks required properties and, by default, self-registers the
//!    mapper with the runtime's shared configuration if it is not
//!    already known.
//! 2. [`MapperBinding::resolve`] any number of times - returns the
//!    mapper's proxy handle, constructed once and cached for the life of
//!    the binding.
//!
//! The phases are encoded in the borrow system (`&mut self` to validate,
//! `&self` to resolve): the host configures and validates before sharing
//! the binding, then resolves concurrently through `Arc`. A `validated`
//! flag still guards mis-ordered calls at runtime.

use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, error};

use mapbind_runtime::{error_context, MapperDescriptor, MapperInterface, MapperProxy, SessionAccessor};

use crate::errors::BindingError;

/// Binds one mapper interface to the mapping runtime on behalf of a host
/// container.
///
/// ```
/// use std::sync::Arc;
/// use mapbind::MapperBinding;
/// use mapbind_runtime::{MapperInterface, SessionFactory, StatementKind, StatementSpec};
///
/// struct UserMapper;
///
/// impl MapperInterface for UserMapper {
///     const NAME: &'static str = "UserMapper";
///     fn statements() -> Vec<StatementSpec> {
///         vec![StatementSpec::new(
///             "findById",
///             StatementKind::Select,
///             "SELECT * FROM users WHERE id = #{id}",
///         )]
///     }
/// }
///
/// let factory = Arc::new(SessionFactory::default());
/// let mut binding = MapperBinding::for_mapper::<UserMapper>(factory);
/// binding.validate()?;
/// let proxy = binding.resolve()?;
/// assert_eq!(proxy.mapper_name(), "UserMapper");
/// # Ok::<(), mapbind::BindingError>(())
/// ```
pub struct MapperBinding {
    accessor: Option<Arc<dyn SessionAccessor>>,
    mapper: Option<MapperDescriptor>,
    add_to_registry: bool,
    validated: bool,
    proxy: Mutex<Option<MapperProxy>>,
}

impl MapperBinding {
    /// Create an unconfigured binding. The host must set a session
    /// accessor and a mapper interface before `validate()`.
    pub fn new() -> Self {
        Self {
            accessor: None,
            mapper: None,
            add_to_registry: true,
            validated: false,
            proxy: Mutex::new(None),
        }
    }

    /// Create a binding already configured for a mapper interface.
    pub fn for_mapper<M: MapperInterface>(accessor: Arc<dyn SessionAccessor>) -> Self {
        let mut binding = Self::new();
        binding.set_session_accessor(accessor);
        binding.set_mapper::<M>();
        binding
    }

    // ------------------------------------------------------------------
    // Configuration phase
    // ------------------------------------------------------------------

    /// Set the session accessor. Required before `validate()`.
    pub fn set_session_accessor(&mut self, accessor: Arc<dyn SessionAccessor>) {
        self.accessor = Some(accessor);
    }

    /// Set the mapper interface this binding is for. Required before
    /// `validate()`.
    pub fn set_mapper<M: MapperInterface>(&mut self) {
        self.mapper = Some(MapperDescriptor::of::<M>());
    }

    /// Set the mapper interface by descriptor.
    pub fn set_mapper_descriptor(&mut self, descriptor: MapperDescriptor) {
        self.mapper = Some(descriptor);
    }

    /// Control self-registration. When `false` the mapper must have been
    /// registered with the runtime's configuration through some other
    /// path; `validate()` will not fail on its absence, but `resolve()`
    /// will. Defaults to `true`.
    pub fn set_add_to_registry(&mut self, add_to_registry: bool) {
        self.add_to_registry = add_to_registry;
    }

    /// The configured mapper interface, if set.
    pub fn mapper_descriptor(&self) -> Option<&MapperDescriptor> {
        self.mapper.as_ref()
    }

    /// The configured mapper's name, if set.
    pub fn mapper_name(&self) -> Option<&'static str> {
        self.mapper.as_ref().map(|m| m.name())
    }

    /// Whether this binding self-registers its mapper.
    pub fn is_add_to_registry(&self) -> bool {
        self.add_to_registry
    }

    /// The resolved proxy is a singleton per binding: however many times
    /// `resolve()` runs, the host holds one logical proxy instance.
    pub fn is_singleton(&self) -> bool {
        true
    }

    // ------------------------------------------------------------------
    // Lifecycle phase 1
    // ------------------------------------------------------------------

    /// Validate configuration and register the mapper if needed.
    ///
    /// Called once by the host after the configuration phase. Checks the
    /// session accessor and mapper interface are set, then - when
    /// self-registration is enabled and the mapper is not yet known -
    /// registers it with the shared configuration. The thread's
    /// diagnostic context is reset after a registration attempt whether
    /// it succeeded or failed, so parse-time state never leaks into
    /// later operations.
    ///
    /// A registration failure is terminal for this binding: it is
    /// wrapped as [`BindingError::Registration`] carrying the offending
    /// mapper's name and the runtime's cause, and is not retried.
    pub fn validate(&mut self) -> Result<(), BindingError> {
        let accessor = self.accessor.as_ref().ok_or_else(|| {
            BindingError::Configuration("property 'session accessor' is required".to_string())
        })?;
        let mapper = self.mapper.as_ref().ok_or_else(|| {
            BindingError::Configuration("property 'mapper interface' is required".to_string())
        })?;

        let session = accessor.session()?;
        let registry = session.configuration();

        if self.add_to_registry && !registry.has_mapper(mapper.type_id()) {
            // add_mapper re-checks membership under its own lock, so a
            // concurrent binding for the same type cannot double-register.
            let outcome = registry.add_mapper(mapper);
            error_context::reset();
            match outcome {
                Ok(registered) => {
                    debug!(
                        mapper = mapper.name(),
                        registered, "validated mapper binding"
                    );
                }
                Err(source) => {
                    error!(
                        mapper = mapper.name(),
                        error = %source,
                        "failed to register mapper with the configuration"
                    );
                    return Err(BindingError::Registration {
                        mapper: mapper.name(),
                        source,
                    });
                }
            }
        }

        self.validated = true;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Lifecycle phase 2
    // ------------------------------------------------------------------

    /// Resolve the mapper's proxy handle.
    ///
    /// Callable any number of times, concurrently, after `validate()`
    /// has succeeded. The proxy is constructed on first call and cached;
    /// later calls return handles sharing the same dispatch table and
    /// session binding. Runtime failures (no session, mapper never
    /// registered) propagate unchanged and are never cached.
    pub fn resolve(&self) -> Result<MapperProxy, BindingError> {
        if !self.validated {
            return Err(BindingError::Configuration(
                "resolve() called before validate() completed".to_string(),
            ));
        }
        // validated implies both properties are set
        let accessor = self.accessor.as_ref().ok_or_else(|| {
            BindingError::Configuration("property 'session accessor' is required".to_string())
        })?;
        let mapper = self.mapper.as_ref().ok_or_else(|| {
            BindingError::Configuration("property 'mapper interface' is required".to_string())
        })?;

        let mut cached = self.proxy.lock();
        if let Some(proxy) = cached.as_ref() {
            return Ok(proxy.clone());
        }

        let proxy = accessor.session()?.mapper(mapper)?;
        *cached = Some(proxy.clone());
        Ok(proxy)
    }
}

impl Default for MapperBinding {
    fn default() -> Self {
        Self::new()
    }
}
