//! Error types.
//!
//! Only attachment can fail fatally. Everything after a successful attach is
//! either degraded-but-continuing (debounce) or a logged no-op (fan-out
//! resource pressure), so those paths carry no error type at all.

use platform::lines::ClaimError;

use crate::config::LineName;

/// Error from [`SwitchConfig`](crate::SwitchConfig) construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A line name exceeds the bounded name capacity.
    NameTooLong,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NameTooLong => write!(f, "line name too long"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Fatal attachment failure.
///
/// Every variant is reported with the resource it concerns so the failure
/// surfaces a human-readable cause. By the time the error is returned, every
/// line claimed earlier in the attach sequence has been released; a
/// corrected re-attach starts clean.
///
/// `E` is the input-line backend's error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachError<E: core::fmt::Debug> {
    /// The jack-detect input line could not be claimed.
    InputClaim {
        /// Configured name of the input line.
        name: LineName,
        /// Why the host refused the claim.
        cause: ClaimError,
    },
    /// The amplifier-enable output bank could not be claimed.
    OutputClaim {
        /// Configured name of the output bank.
        name: LineName,
        /// Why the host refused the claim.
        cause: ClaimError,
    },
    /// The claimed output bank holds no lines.
    EmptyOutputBank {
        /// Configured name of the output bank.
        name: LineName,
    },
    /// The initial input sample failed, so no deterministic output state
    /// could be established.
    InitialSample(E),
    /// Edge-event delivery could not be resolved or bound on the input.
    EdgeEvents(E),
    /// A device is already attached to this service.
    AlreadyAttached,
}

impl<E: core::fmt::Debug> core::fmt::Display for AttachError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InputClaim { name, cause } => {
                write!(f, "failed to claim input line '{name}': {cause}")
            }
            Self::OutputClaim { name, cause } => {
                write!(f, "failed to claim output bank '{name}': {cause}")
            }
            Self::EmptyOutputBank { name } => {
                write!(f, "output bank '{name}' holds no lines")
            }
            Self::InitialSample(e) => {
                write!(f, "failed to sample initial input state: {e:?}")
            }
            Self::EdgeEvents(e) => {
                write!(f, "failed to bind edge events on input line: {e:?}")
            }
            Self::AlreadyAttached => write!(f, "a device is already attached"),
        }
    }
}

#[cfg(feature = "std")]
impl<E: core::fmt::Debug> std::error::Error for AttachError<E> {}
