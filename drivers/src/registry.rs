use crate::{dummy, zte8810ft, BaseModem, Error, ModemConfig};
use std::collections::BTreeMap;
use tracing::debug;

/// Builds a driver instance from transport configuration. Log output goes
/// through the ambient `tracing` subscriber; verbosity policy stays with
/// whoever composed the process.
pub type Constructor = fn(ModemConfig) -> Result<Box<dyn BaseModem>, Error>;

/// Maps model names to driver constructors.
///
/// There is no global registry: the composition root builds one (usually
/// via [`DriverRegistry::with_builtin`]) and passes it to whatever resolves
/// model names. Registering the same name twice is a programming error and
/// panics; it cannot be hit by user input.
pub struct DriverRegistry {
    drivers: BTreeMap<&'static str, Constructor>,
}

impl DriverRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            drivers: BTreeMap::new(),
        }
    }

    /// A registry with the two shipped drivers: the ZTE 8810FT protocol
    /// driver and the capability-less `dummy` used for offline setups.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(zte8810ft::NAME, zte8810ft::new);
        registry.register(dummy::NAME, dummy::new);
        registry
    }

    /// Registers a constructor under `name`.
    ///
    /// # Panics
    ///
    /// Panics if `name` is already registered.
    pub fn register(&mut self, name: &'static str, constructor: Constructor) {
        if self.drivers.insert(name, constructor).is_some() {
            panic!("attempted to register {name} twice");
        }
        debug!(name, "driver registered");
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.drivers.contains_key(name)
    }

    /// Resolves `model` and invokes its constructor with `config`.
    /// Constructor failures (e.g. a bad interface name) propagate unchanged.
    pub fn resolve(
        &self,
        model: &str,
        config: ModemConfig,
    ) -> Result<Box<dyn BaseModem>, Error> {
        let constructor = self
            .drivers
            .get(model)
            .ok_or_else(|| Error::UnknownModel(model.to_owned()))?;
        debug!(driver = model, "building driver instance");
        constructor(config)
    }

    /// Registered model names, sorted.
    pub fn available(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.drivers.keys().copied()
    }
}

impl Default for DriverRegistry {
    fn default() -> Self {
        Self::new()
    }
}
