//! Attach-time configuration.
//!
//! The host platform supplies one [`SwitchConfig`] per switch instance,
//! read once at attach. It names the jack-detect input and the
//! amplifier-enable output bank (the [`LineHost`](platform::LineHost)
//! resolves the names to actual lines, polarity already normalized) and
//! optionally carries a debounce interval for the input.
//!
//! # Example
//!
//! ```
//! use amp_switch::SwitchConfig;
//!
//! let config = SwitchConfig::new("jack-detect", "amp-enable")
//!     .map(|c| c.with_debounce_us(5_000));
//! ```

use crate::error::ConfigError;

/// Configuration-schema identifier this driver registers under.
pub const AMP_SWITCH_COMPATIBLE: &str = "amp-switch";

/// Capacity of a configured line name.
pub const LINE_NAME_LEN: usize = 32;

/// A bounded line name as carried in configuration and errors.
pub type LineName = heapless::String<LINE_NAME_LEN>;

/// Platform-supplied configuration for one switch instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchConfig {
    compatible: &'static str,
    input_line: LineName,
    output_bank: LineName,
    debounce_us: Option<u32>,
}

impl SwitchConfig {
    /// Create a configuration naming the jack-detect input and the
    /// amplifier-enable output bank.
    pub fn new(input_line: &str, output_bank: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            compatible: AMP_SWITCH_COMPATIBLE,
            input_line: LineName::try_from(input_line).map_err(|_| ConfigError::NameTooLong)?,
            output_bank: LineName::try_from(output_bank).map_err(|_| ConfigError::NameTooLong)?,
            debounce_us: None,
        })
    }

    /// Set the debounce interval in microseconds.
    ///
    /// Advisory: a backend without debounce support keeps its default and
    /// attachment proceeds.
    #[must_use]
    pub fn with_debounce_us(mut self, interval_us: u32) -> Self {
        self.debounce_us = Some(interval_us);
        self
    }

    /// Override the configuration-schema identifier.
    #[must_use]
    pub fn with_compatible(mut self, compatible: &'static str) -> Self {
        self.compatible = compatible;
        self
    }

    /// The configuration-schema identifier used for registry matching.
    pub fn compatible(&self) -> &'static str {
        self.compatible
    }

    /// Name of the jack-detect input line.
    pub fn input_line(&self) -> &LineName {
        &self.input_line
    }

    /// Name of the amplifier-enable output bank.
    pub fn output_bank(&self) -> &LineName {
        &self.output_bank
    }

    /// Configured debounce interval in microseconds, if any.
    pub fn debounce_us(&self) -> Option<u32> {
        self.debounce_us
    }
}
