//! Mock line implementations for host-side testing
//!
//! This module provides mock implementations of the line traits for use in
//! unit and integration tests. The mock lines share state with the
//! [`MockLineHost`] that issued them, so tests keep full observability
//! (current levels, write history, claim state) while the driver owns the
//! lines.

#![cfg(any(test, feature = "std"))]

use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::vec::Vec;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use crate::lines::{ClaimError, DebounceError, DetectInput, LineHost, OutputBank};

/// Default name of the mock jack-detect input.
pub const MOCK_INPUT_NAME: &str = "jack-detect";
/// Default name of the mock amplifier-enable bank.
pub const MOCK_OUTPUTS_NAME: &str = "amp-enable";

/// Error type shared by the mock lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockLineError {
    /// Injected level-read failure.
    ReadFailure,
    /// Injected edge-event failure.
    EdgeFailure,
    /// `write_all` was called with the wrong number of levels.
    LengthMismatch,
    /// Injected fan-out write failure.
    WriteFailure,
}

/// Poison-tolerant lock: a test that panicked elsewhere must not cascade.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

struct JackShared {
    level: AtomicBool,
    claimed: AtomicBool,
    edge: Signal<CriticalSectionRawMutex, ()>,
    fail_read: AtomicBool,
    fail_edge_enable: AtomicBool,
    fail_edge_wait: AtomicBool,
    reject_debounce: AtomicBool,
    debounce_us: Mutex<Option<u32>>,
    edge_events_enabled: AtomicBool,
    read_count: AtomicUsize,
}

struct OutputsShared {
    levels: Mutex<Vec<bool>>,
    writes: Mutex<Vec<Vec<bool>>>,
    claimed: AtomicBool,
    fail_writes: AtomicBool,
}

// ---------------------------------------------------------------------------
// MockJack
// ---------------------------------------------------------------------------

/// Mock jack-detect line handed out by [`MockLineHost::claim_input`].
///
/// Dropping it returns the line to the host.
pub struct MockJack {
    shared: Arc<JackShared>,
}

impl core::fmt::Debug for MockJack {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MockJack").finish_non_exhaustive()
    }
}

impl Drop for MockJack {
    fn drop(&mut self) {
        self.shared.claimed.store(false, Ordering::SeqCst);
    }
}

impl DetectInput for MockJack {
    type Error = MockLineError;

    fn read_level(&mut self) -> Result<bool, Self::Error> {
        self.shared.read_count.fetch_add(1, Ordering::SeqCst);
        if self.shared.fail_read.swap(false, Ordering::SeqCst) {
            return Err(MockLineError::ReadFailure);
        }
        Ok(self.shared.level.load(Ordering::SeqCst))
    }

    fn set_debounce(&mut self, interval_us: u32) -> Result<(), DebounceError> {
        if self.shared.reject_debounce.load(Ordering::SeqCst) {
            return Err(DebounceError::Unsupported);
        }
        *lock(&self.shared.debounce_us) = Some(interval_us);
        Ok(())
    }

    fn enable_edge_events(&mut self) -> Result<(), Self::Error> {
        if self.shared.fail_edge_enable.swap(false, Ordering::SeqCst) {
            return Err(MockLineError::EdgeFailure);
        }
        self.shared.edge_events_enabled.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn wait_for_edge(&mut self) -> Result<(), Self::Error> {
        if self.shared.fail_edge_wait.swap(false, Ordering::SeqCst) {
            return Err(MockLineError::EdgeFailure);
        }
        self.shared.edge.wait().await;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MockOutputBank
// ---------------------------------------------------------------------------

/// Mock amplifier-enable bank handed out by [`MockLineHost::claim_outputs`].
///
/// Records every `write_all` as a snapshot so tests can assert fan-out
/// atomicity over the full history, not just the final state.
pub struct MockOutputBank {
    shared: Arc<OutputsShared>,
    line_count: usize,
}

impl core::fmt::Debug for MockOutputBank {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MockOutputBank")
            .field("line_count", &self.line_count)
            .finish_non_exhaustive()
    }
}

impl Drop for MockOutputBank {
    fn drop(&mut self) {
        self.shared.claimed.store(false, Ordering::SeqCst);
    }
}

impl OutputBank for MockOutputBank {
    type Error = MockLineError;

    fn len(&self) -> usize {
        self.line_count
    }

    fn write_all(&mut self, levels: &[bool]) -> Result<(), Self::Error> {
        if levels.len() != self.line_count {
            return Err(MockLineError::LengthMismatch);
        }
        if self.shared.fail_writes.swap(false, Ordering::SeqCst) {
            return Err(MockLineError::WriteFailure);
        }
        lock(&self.shared.writes).push(levels.to_vec());
        *lock(&self.shared.levels) = levels.to_vec();
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MockLineHost
// ---------------------------------------------------------------------------

/// A [`LineHost`] with one named jack-detect input and one named output bank.
///
/// The host keeps shared handles to both lines, so tests can steer the jack
/// level, deliver edges, and inspect outputs while the driver owns the
/// claimed ends.
pub struct MockLineHost {
    input_name: &'static str,
    outputs_name: &'static str,
    jack: Arc<JackShared>,
    outputs: Arc<OutputsShared>,
    output_count: usize,
    fail_input_claim: bool,
    fail_outputs_claim: bool,
}

impl MockLineHost {
    /// Create a host with the default line names and `output_count` outputs.
    pub fn new(output_count: usize) -> Self {
        Self::with_names(MOCK_INPUT_NAME, MOCK_OUTPUTS_NAME, output_count)
    }

    /// Create a host with explicit line names.
    pub fn with_names(
        input_name: &'static str,
        outputs_name: &'static str,
        output_count: usize,
    ) -> Self {
        Self {
            input_name,
            outputs_name,
            jack: Arc::new(JackShared {
                level: AtomicBool::new(false),
                claimed: AtomicBool::new(false),
                edge: Signal::new(),
                fail_read: AtomicBool::new(false),
                fail_edge_enable: AtomicBool::new(false),
                fail_edge_wait: AtomicBool::new(false),
                reject_debounce: AtomicBool::new(false),
                debounce_us: Mutex::new(None),
                edge_events_enabled: AtomicBool::new(false),
                read_count: AtomicUsize::new(0),
            }),
            outputs: Arc::new(OutputsShared {
                levels: Mutex::new(vec![false; output_count]),
                writes: Mutex::new(Vec::new()),
                claimed: AtomicBool::new(false),
                fail_writes: AtomicBool::new(false),
            }),
            output_count,
            fail_input_claim: false,
            fail_outputs_claim: false,
        }
    }

    // -- test-side jack controls -------------------------------------------

    /// Set the logical jack level (no edge is delivered).
    pub fn set_jack_level(&self, level: bool) {
        self.jack.level.store(level, Ordering::SeqCst);
    }

    /// Deliver an edge notification. Multiple pulses before the driver's
    /// next wait coalesce into one.
    pub fn pulse_edge(&self) {
        self.jack.edge.signal(());
    }

    /// Whether the jack-detect line is currently claimed.
    pub fn jack_claimed(&self) -> bool {
        self.jack.claimed.load(Ordering::SeqCst)
    }

    /// Whether edge events have been bound on the jack line.
    pub fn edge_events_enabled(&self) -> bool {
        self.jack.edge_events_enabled.load(Ordering::SeqCst)
    }

    /// Last debounce interval the driver programmed, if any.
    pub fn debounce_us(&self) -> Option<u32> {
        *lock(&self.jack.debounce_us)
    }

    /// Number of level reads the driver has issued.
    pub fn read_count(&self) -> usize {
        self.jack.read_count.load(Ordering::SeqCst)
    }

    // -- test-side output observation --------------------------------------

    /// Current logical level of every output line.
    pub fn output_levels(&self) -> Vec<bool> {
        lock(&self.outputs.levels).clone()
    }

    /// Whether the output bank is currently claimed.
    pub fn outputs_claimed(&self) -> bool {
        self.outputs.claimed.load(Ordering::SeqCst)
    }

    /// Every `write_all` snapshot issued so far, oldest first.
    pub fn write_history(&self) -> Vec<Vec<bool>> {
        lock(&self.outputs.writes).clone()
    }

    // -- failure injection (each trips exactly once) ------------------------

    /// Fail the next input claim with `AccessDenied`.
    pub fn fail_next_input_claim(&mut self) {
        self.fail_input_claim = true;
    }

    /// Fail the next output-bank claim with `AccessDenied`.
    pub fn fail_next_outputs_claim(&mut self) {
        self.fail_outputs_claim = true;
    }

    /// Fail the next level read.
    pub fn fail_next_read(&self) {
        self.jack.fail_read.store(true, Ordering::SeqCst);
    }

    /// Fail the next edge-event binding.
    pub fn fail_next_edge_enable(&self) {
        self.jack.fail_edge_enable.store(true, Ordering::SeqCst);
    }

    /// Fail the next edge wait.
    pub fn fail_next_edge_wait(&self) {
        self.jack.fail_edge_wait.store(true, Ordering::SeqCst);
    }

    /// Fail the next fan-out write.
    pub fn fail_next_write(&self) {
        self.outputs.fail_writes.store(true, Ordering::SeqCst);
    }

    /// Reject every debounce request (sticky, models a backend without
    /// hardware debounce).
    pub fn reject_debounce(&self) {
        self.jack.reject_debounce.store(true, Ordering::SeqCst);
    }
}

impl LineHost for MockLineHost {
    type Input = MockJack;
    type Outputs = MockOutputBank;

    fn claim_input(&mut self, name: &str) -> Result<Self::Input, ClaimError> {
        if name != self.input_name {
            return Err(ClaimError::NotFound);
        }
        if self.fail_input_claim {
            self.fail_input_claim = false;
            return Err(ClaimError::AccessDenied);
        }
        if self.jack.claimed.swap(true, Ordering::SeqCst) {
            return Err(ClaimError::Busy);
        }
        Ok(MockJack {
            shared: Arc::clone(&self.jack),
        })
    }

    fn claim_outputs(&mut self, name: &str) -> Result<Self::Outputs, ClaimError> {
        if name != self.outputs_name {
            return Err(ClaimError::NotFound);
        }
        if self.fail_outputs_claim {
            self.fail_outputs_claim = false;
            return Err(ClaimError::AccessDenied);
        }
        if self.outputs.claimed.swap(true, Ordering::SeqCst) {
            return Err(ClaimError::Busy);
        }
        // Each line is driven to logical-off at acquisition time.
        *lock(&self.outputs.levels) = vec![false; self.output_count];
        Ok(MockOutputBank {
            shared: Arc::clone(&self.outputs),
            line_count: self.output_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claim_and_release_by_drop() {
        let mut host = MockLineHost::new(2);
        let jack = host.claim_input(MOCK_INPUT_NAME).unwrap();
        assert!(host.jack_claimed());
        assert_eq!(
            host.claim_input(MOCK_INPUT_NAME).unwrap_err(),
            ClaimError::Busy
        );
        drop(jack);
        assert!(!host.jack_claimed());
        assert!(host.claim_input(MOCK_INPUT_NAME).is_ok());
    }

    #[test]
    fn unknown_name_is_not_found() {
        let mut host = MockLineHost::new(1);
        assert_eq!(
            host.claim_input("speaker-sense").unwrap_err(),
            ClaimError::NotFound
        );
        assert_eq!(
            host.claim_outputs("speaker-sense").unwrap_err(),
            ClaimError::NotFound
        );
    }

    #[test]
    fn outputs_start_off_and_record_writes() {
        let mut host = MockLineHost::new(3);
        let mut bank = host.claim_outputs(MOCK_OUTPUTS_NAME).unwrap();
        assert_eq!(host.output_levels(), vec![false; 3]);

        bank.write_all(&[true, true, true]).unwrap();
        assert_eq!(host.output_levels(), vec![true; 3]);
        assert_eq!(host.write_history(), vec![vec![true; 3]]);
    }

    #[test]
    fn write_all_rejects_wrong_length() {
        let mut host = MockLineHost::new(2);
        let mut bank = host.claim_outputs(MOCK_OUTPUTS_NAME).unwrap();
        assert_eq!(
            bank.write_all(&[true]).unwrap_err(),
            MockLineError::LengthMismatch
        );
        // The bank keeps its previous state on a rejected write.
        assert_eq!(host.output_levels(), vec![false, false]);
    }

    #[tokio::test]
    async fn edges_coalesce_into_one_wait() {
        let mut host = MockLineHost::new(1);
        let mut jack = host.claim_input(MOCK_INPUT_NAME).unwrap();
        jack.enable_edge_events().unwrap();

        host.pulse_edge();
        host.pulse_edge();
        host.pulse_edge();
        jack.wait_for_edge().await.unwrap();

        // A second wait would block: the burst collapsed to one notification.
        let second = jack.wait_for_edge();
        let raced = tokio::time::timeout(std::time::Duration::from_millis(20), second).await;
        assert!(raced.is_err(), "burst must coalesce to a single wake");
    }

    #[test]
    fn injected_failures_trip_once() {
        let mut host = MockLineHost::new(1);
        let mut jack = host.claim_input(MOCK_INPUT_NAME).unwrap();

        host.set_jack_level(true);
        host.fail_next_read();
        assert_eq!(jack.read_level().unwrap_err(), MockLineError::ReadFailure);
        assert!(jack.read_level().unwrap());
        assert_eq!(host.read_count(), 2);
    }

    #[test]
    fn debounce_is_recorded_or_rejected() {
        let mut host = MockLineHost::new(1);
        let mut jack = host.claim_input(MOCK_INPUT_NAME).unwrap();
        jack.set_debounce(5_000).unwrap();
        assert_eq!(host.debounce_us(), Some(5_000));

        host.reject_debounce();
        assert_eq!(
            jack.set_debounce(1_000).unwrap_err(),
            DebounceError::Unsupported
        );
        assert_eq!(host.debounce_us(), Some(5_000));
    }
}
