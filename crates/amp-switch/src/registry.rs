//! Driver registry.
//!
//! Maps a configuration-schema identifier (compatible string) to an attach
//! factory. The host environment owns the lookup: when it discovers
//! configuration matching a registered identifier, it resolves the factory
//! and calls it with the host's lines and the configuration.
//!
//! The registry is constructed at startup and populated via
//! [`register`](SwitchRegistry::register): constructor-injection rather
//! than global state, testable in isolation.

use heapless::Vec;
use platform::lines::LineHost;

use crate::config::SwitchConfig;
use crate::error::AttachError;
use crate::switch::{AmpSwitch, InputErrorOf};

/// Maximum number of registered switch variants.
pub const MAX_REGISTERED_SWITCHES: usize = 4;

/// Factory signature: build one attached device from host + configuration.
pub type AttachFn<H> =
    fn(&mut H, &SwitchConfig) -> Result<AmpSwitch<H>, AttachError<InputErrorOf<H>>>;

/// Registry operation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegistryError {
    /// A factory is already registered under this identifier.
    Duplicate,
    /// The registry table is full.
    Full,
    /// No factory is registered under the requested identifier.
    NoMatch,
}

impl core::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Duplicate => write!(f, "identifier already registered"),
            Self::Full => write!(f, "registry table full"),
            Self::NoMatch => write!(f, "no factory registered for identifier"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for RegistryError {}

/// Registry of attach factories keyed by compatible string.
pub struct SwitchRegistry<H: LineHost> {
    entries: Vec<(&'static str, AttachFn<H>), MAX_REGISTERED_SWITCHES>,
}

impl<H: LineHost> SwitchRegistry<H> {
    /// Create an empty registry.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register a factory under a compatible string.
    pub fn register(
        &mut self,
        compatible: &'static str,
        factory: AttachFn<H>,
    ) -> Result<(), RegistryError> {
        if self.lookup(compatible).is_some() {
            return Err(RegistryError::Duplicate);
        }
        self.entries
            .push((compatible, factory))
            .map_err(|_| RegistryError::Full)
    }

    /// Look up the factory registered under `compatible`.
    pub fn lookup(&self, compatible: &str) -> Option<AttachFn<H>> {
        self.entries
            .iter()
            .find(|(name, _)| *name == compatible)
            .map(|(_, factory)| *factory)
    }

    /// Resolve the factory matching a configuration's identifier.
    pub fn resolve(&self, config: &SwitchConfig) -> Result<AttachFn<H>, RegistryError> {
        self.lookup(config.compatible())
            .ok_or(RegistryError::NoMatch)
    }

    /// Iterate over the registered identifiers.
    pub fn compatibles(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }
}

impl<H: LineHost> Default for SwitchRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::mocks::MockLineHost;

    #[test]
    fn register_and_lookup() {
        let mut registry = SwitchRegistry::<MockLineHost>::new();
        registry
            .register("amp-switch", AmpSwitch::attach)
            .unwrap();

        assert!(registry.lookup("amp-switch").is_some());
        assert!(registry.lookup("speaker-mute").is_none());
        assert!(registry.compatibles().eq(["amp-switch"]));
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = SwitchRegistry::<MockLineHost>::new();
        registry
            .register("amp-switch", AmpSwitch::attach)
            .unwrap();
        assert_eq!(
            registry.register("amp-switch", AmpSwitch::attach),
            Err(RegistryError::Duplicate)
        );
    }

    #[test]
    fn full_table_is_rejected() {
        let mut registry = SwitchRegistry::<MockLineHost>::new();
        for name in ["a", "b", "c", "d"] {
            registry.register(name, AmpSwitch::attach).unwrap();
        }
        assert_eq!(
            registry.register("e", AmpSwitch::attach),
            Err(RegistryError::Full)
        );
    }

    #[test]
    fn resolve_follows_the_config_identifier() {
        let mut registry = SwitchRegistry::<MockLineHost>::new();
        registry
            .register("amp-switch", AmpSwitch::attach)
            .unwrap();

        let config = crate::SwitchConfig::new("jack-detect", "amp-enable").unwrap();
        assert!(registry.resolve(&config).is_ok());

        let other = config.with_compatible("speaker-mute");
        assert_eq!(registry.resolve(&other), Err(RegistryError::NoMatch));
    }
}
