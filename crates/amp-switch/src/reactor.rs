//! Two-phase edge handling.
//!
//! The fast phase is the edge wake itself: the pending
//! [`wait_for_edge`](platform::DetectInput::wait_for_edge) completes from
//! the event context without touching the line value. The slow phase runs
//! in the reactor task, where blocking is allowed: re-sample the live
//! level, then fan it out across the bank.
//!
//! The next edge wait is not issued until the drive completes, so edges are
//! processed strictly one at a time. Edges arriving in between coalesce
//! into a single pending notification: only the fact that *an* edge
//! occurred is preserved, which is safe because the slow phase always reads
//! the live value rather than replaying a historical one.

use embassy_time::Timer;
use platform::lines::{DetectInput, LineHost};

use crate::switch::AmpSwitch;

/// Backoff before re-arming after a failed edge wait, so a wedged input
/// line cannot spin the executor.
const EDGE_ERROR_BACKOFF_MS: u64 = 10;

impl<H: LineHost> AmpSwitch<H> {
    /// Process one (coalesced) edge: wait for it, then re-sample and
    /// re-drive the outputs.
    ///
    /// Independent of how many physical edges fired while waiting was not
    /// in progress, the outputs end up reflecting the last settled input
    /// level.
    pub async fn process_edge(&mut self) {
        if let Err(_e) = self.input_mut().wait_for_edge().await {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "edge wait failed ({}); retrying",
                defmt::Debug2Format(&_e)
            );
            Timer::after_millis(EDGE_ERROR_BACKOFF_MS).await;
            return;
        }
        self.resync();
    }

    /// Reactor service loop: process edges forever.
    ///
    /// Run this in a dedicated task after a successful attach.
    pub async fn run(&mut self) -> ! {
        loop {
            self.process_edge().await;
        }
    }
}
