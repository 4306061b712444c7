//! Device state and lifecycle.
//!
//! One [`AmpSwitch`] per attached hardware unit. It owns the claimed lines
//! for the lifetime of the attachment; no line is ever re-acquired, and
//! dropping the device releases everything back to the host.

use platform::lines::{DetectInput, LineHost, OutputBank};

use crate::config::SwitchConfig;
use crate::error::AttachError;
use crate::fanout;

/// Input-line backend error type of a [`LineHost`].
pub type InputErrorOf<H> = <<H as LineHost>::Input as DetectInput>::Error;

/// Jack-detect amplifier switch device.
///
/// Created by [`attach`](AmpSwitch::attach); destroyed by dropping it.
/// The outputs are forced to logical-off on drop, so the amplifiers end up
/// off no matter how the device goes away.
pub struct AmpSwitch<H: LineHost> {
    input: H::Input,
    outputs: H::Outputs,
    debounce_us: Option<u32>,
}

impl<H: LineHost> AmpSwitch<H> {
    /// Attach to the platform: claim the configured lines, establish the
    /// initial output state, and bind edge events.
    ///
    /// The sequence either fully succeeds or leaves no residue: on any
    /// fatal step, every line claimed so far is released (dropped) before
    /// the error is returned, and the outputs it may have driven are forced
    /// back off.
    pub fn attach(
        host: &mut H,
        config: &SwitchConfig,
    ) -> Result<Self, AttachError<InputErrorOf<H>>> {
        // Jack-detect input first; nothing to roll back on failure.
        let mut input =
            host.claim_input(config.input_line())
                .map_err(|cause| AttachError::InputClaim {
                    name: config.input_line().clone(),
                    cause,
                })?;

        // Output bank, each line off at acquisition time.
        let mut outputs = match host.claim_outputs(config.output_bank()) {
            Ok(outputs) => outputs,
            Err(cause) => {
                drop(input);
                return Err(AttachError::OutputClaim {
                    name: config.output_bank().clone(),
                    cause,
                });
            }
        };
        if outputs.is_empty() {
            drop(outputs);
            drop(input);
            return Err(AttachError::EmptyOutputBank {
                name: config.output_bank().clone(),
            });
        }

        // Debounce is advisory: the platform default applies if the backend
        // has no support, and attachment proceeds.
        if let Some(interval_us) = config.debounce_us() {
            if let Err(_e) = input.set_debounce(interval_us) {
                #[cfg(feature = "defmt")]
                defmt::debug!(
                    "debounce {=u32}us not applied ({}), continuing",
                    interval_us,
                    _e
                );
            }
        }

        // Establish a deterministic amplifier state before any edge fires.
        let initial = match input.read_level() {
            Ok(level) => level,
            Err(e) => {
                drop(outputs);
                drop(input);
                return Err(AttachError::InitialSample(e));
            }
        };
        fanout::drive(&mut outputs, initial);

        // Both-edge event delivery, armed last so the reactor never races
        // the initial drive.
        if let Err(e) = input.enable_edge_events() {
            fanout::drive(&mut outputs, false);
            drop(outputs);
            drop(input);
            return Err(AttachError::EdgeEvents(e));
        }

        #[cfg(feature = "defmt")]
        defmt::info!("amp switch ready (initial={=bool})", initial);

        Ok(Self {
            input,
            outputs,
            debounce_us: config.debounce_us(),
        })
    }

    /// Force every output to logical-off.
    ///
    /// Idempotent; safe to call any number of times. Line release itself
    /// happens when the device is dropped.
    pub fn detach(&mut self) {
        fanout::drive(&mut self.outputs, false);
        #[cfg(feature = "defmt")]
        defmt::info!("amp switch outputs forced off");
    }

    /// Re-sample the input and re-drive the outputs to match.
    ///
    /// The jack may have moved while edges were not serviced (system
    /// suspend); the pre-suspend output state is stale, so resynchronize
    /// rather than trust it.
    pub fn resume(&mut self) {
        self.resync();
    }

    /// Configured debounce interval in microseconds, if any.
    pub fn debounce_us(&self) -> Option<u32> {
        self.debounce_us
    }

    /// Number of output lines this device drives.
    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }

    /// Sample the live input level and fan it out across the bank.
    ///
    /// A failed sample keeps the previous (valid) output state; the next
    /// edge or resume heals it.
    pub(crate) fn resync(&mut self) {
        match self.input.read_level() {
            Ok(level) => fanout::drive(&mut self.outputs, level),
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!(
                    "input sample failed ({}); keeping previous output state",
                    defmt::Debug2Format(&_e)
                );
            }
        }
    }

    pub(crate) fn input_mut(&mut self) -> &mut H::Input {
        &mut self.input
    }
}

impl<H: LineHost> core::fmt::Debug for AmpSwitch<H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AmpSwitch")
            .field("outputs", &self.outputs.len())
            .field("debounce_us", &self.debounce_us)
            .finish_non_exhaustive()
    }
}

impl<H: LineHost> Drop for AmpSwitch<H> {
    fn drop(&mut self) {
        // The amplifiers must end off regardless of how teardown happened.
        fanout::drive(&mut self.outputs, false);
    }
}
