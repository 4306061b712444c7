//! Line abstraction layer for the jack-detect amplifier switch.
//!
//! This crate provides trait-based abstractions for the digital lines the
//! switch driver operates on, enabling development and testing without
//! physical hardware.
//!
//! # Architecture Layers
//!
//! ```text
//! Driver Layer (amp-switch crate)
//!         ↓
//! Platform HAL (this crate - trait abstractions)
//!         ↓
//! Hardware Layer (Embassy HAL + PAC)
//! ```
//!
//! # Abstractions
//!
//! - [`DetectInput`] - the jack-detect input line (level read, advisory
//!   debounce, both-edge event delivery)
//! - [`OutputBank`] - the amplifier-enable output array (single fan-out write)
//! - [`LineHost`] - the collaborator that owns the board's lines and hands
//!   them out by configured name
//!
//! # Features
//!
//! - `std`: Enable standard library support (for testing)
//! - `hardware`: Physical hardware target marker
//! - `defmt`: Enable defmt logging derives

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)] // unsafe fn body is not implicitly unsafe block
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(async_fn_in_trait)] // Embassy no_std: single-threaded, Send bounds not needed

pub mod lines;
pub mod mocks;

pub use lines::{
    ClaimError, DebounceError, DetectInput, LineHost, OutputBank, Polarity, MAX_OUTPUT_LINES,
};
