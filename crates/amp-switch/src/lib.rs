//! Jack-detect amplifier switch
//!
//! Drives one or more "amplifier enable" output lines from the state of a
//! single "jack detect" input line. The outputs always mirror the sampled
//! logical input value, so with typical wiring:
//!
//! - jack detect: active-low (logical `true` = no plug inserted)
//! - amplifier enable: active-high (logical `true` = speakers on)
//!
//! ```text
//! plug OUT -> detect=1 -> outputs=1 -> speakers ON
//! plug IN  -> detect=0 -> outputs=0 -> speakers OFF
//! ```
//!
//! # Architecture
//!
//! Edge handling is split into two phases, the async rendering of a
//! threaded interrupt handler:
//!
//! - **fast phase**: the edge event wakes the pending
//!   [`wait_for_edge`](platform::DetectInput::wait_for_edge); nothing is
//!   sampled or driven from the wake context.
//! - **slow phase**: the reactor task re-samples the live level (reads may
//!   sit behind a bus round-trip) and fans the value out across the whole
//!   output bank in one array write.
//!
//! The reactor does not re-arm the edge wait until the drive completes, so
//! edges are processed strictly one at a time and bursts coalesce: the
//! outputs settle on the last stable input state.
//!
//! # Modules
//!
//! - [`config`] - attach-time configuration (line names, debounce)
//! - [`switch`] - device state and lifecycle (attach / detach / resume)
//! - [`service`] - host-facing lifecycle hooks over an optional device
//! - [`registry`] - compatible-string to attach-factory registry
//! - [`hardware`] - Embassy-STM32 line backends (`hardware` feature)
//!
//! # Features
//!
//! - `hardware` - Build for STM32H7 targets (embassy-stm32 backends + bin)
//! - `std` - Standard library support (host testing)
//! - `defmt` - defmt logging

#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Critical correctness: deny these
#![deny(clippy::await_holding_lock)] // holding a blocking Mutex across .await is a bug
#![deny(unsafe_op_in_unsafe_fn)]
// Intentional allows for this codebase:
#![allow(clippy::module_name_repetitions)] // common in Rust crates; not a real issue
#![allow(clippy::missing_errors_doc)] // most errors are self-explanatory
#![allow(clippy::must_use_candidate)]

pub mod config;
pub mod error;
mod fanout;
mod reactor;
pub mod registry;
pub mod service;
pub mod switch;

#[cfg(feature = "hardware")]
pub mod hardware;

// Re-export key types
pub use config::{SwitchConfig, AMP_SWITCH_COMPATIBLE};
pub use error::{AttachError, ConfigError};
pub use registry::{AttachFn, RegistryError, SwitchRegistry};
pub use service::SwitchService;
pub use switch::AmpSwitch;
