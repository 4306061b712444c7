//! Fan-out write across the amplifier-enable bank.
//!
//! One drive operation builds a level vector with the same value in every
//! slot (one slot per output line, never mixed) and issues a single array
//! write. No other path writes individual output lines, so hardware only
//! ever observes the whole bank switching together.

use heapless::Vec;
use platform::lines::{OutputBank, MAX_OUTPUT_LINES};

/// Drive every line in `bank` to `value` as one array write.
///
/// May block; callers are the attach/resume/detach paths and the slow edge
/// phase. A bank wider than the level buffer, or a failed write, is a
/// logged no-op: the outputs keep their previous (valid) state and the next
/// edge or resume re-applies the correct value.
pub(crate) fn drive<B: OutputBank>(bank: &mut B, value: bool) {
    let mut levels: Vec<bool, MAX_OUTPUT_LINES> = Vec::new();
    for _ in 0..bank.len() {
        if levels.push(value).is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "output bank ({=usize} lines) exceeds level buffer; keeping previous state",
                bank.len()
            );
            return;
        }
    }

    if let Err(_e) = bank.write_all(&levels) {
        #[cfg(feature = "defmt")]
        defmt::warn!(
            "fan-out write failed ({}); keeping previous state",
            defmt::Debug2Format(&_e)
        );
    }
}
