//! Embassy-STM32 line backends.
//!
//! Concrete implementations of the platform line traits for STM32 targets:
//!
//! - [`ExtiJack`] - jack-detect input on an EXTI-capable pin
//! - [`GpioOutputBank`] - amplifier-enable outputs over any
//!   `embedded_hal::digital::OutputPin`
//! - [`BoardLines`] - a [`LineHost`] handing both out by configured name
//!
//! The board code constructs the pins (polarity resolved there, outputs
//! built `Level::Low` so the amplifiers start off), wraps them in a
//! [`BoardLines`], and attaches through the registry. Lines are handed out
//! once per boot: a dropped line is not re-claimable, which is fine for a
//! device that attaches once and lives until reset.

use core::convert::Infallible;

use embassy_executor::Spawner;
use embassy_stm32::exti::ExtiInput;
use embassy_stm32::gpio::{AnyPin, Output};
use embedded_hal::digital::OutputPin;
use heapless::Vec;
use platform::lines::{
    ClaimError, DebounceError, DetectInput, LineHost, OutputBank, Polarity, MAX_OUTPUT_LINES,
};

use crate::switch::AmpSwitch;

// ---------------------------------------------------------------------------
// ExtiJack - jack-detect input
// ---------------------------------------------------------------------------

/// Jack-detect input on an EXTI-capable pin.
///
/// The EXTI channel is bound at construction, so
/// [`enable_edge_events`](DetectInput::enable_edge_events) cannot fail here;
/// backends where event binding is a separate fallible step report their
/// error through the same hook.
pub struct ExtiJack {
    line: ExtiInput<'static, AnyPin>,
    polarity: Polarity,
}

impl ExtiJack {
    /// Wrap an EXTI input with its configured polarity.
    pub fn new(line: ExtiInput<'static, AnyPin>, polarity: Polarity) -> Self {
        Self { line, polarity }
    }
}

impl DetectInput for ExtiJack {
    type Error = Infallible;

    fn read_level(&mut self) -> Result<bool, Self::Error> {
        Ok(self.polarity.to_logical(self.line.is_high()))
    }

    fn set_debounce(&mut self, _interval_us: u32) -> Result<(), DebounceError> {
        // EXTI has no hardware debounce; the caller logs and continues.
        Err(DebounceError::Unsupported)
    }

    fn enable_edge_events(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn wait_for_edge(&mut self) -> Result<(), Self::Error> {
        self.line.wait_for_any_edge().await;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// GpioOutputBank - amplifier-enable outputs
// ---------------------------------------------------------------------------

/// Bank of amplifier-enable output pins driven as one unit.
pub struct GpioOutputBank<P: OutputPin> {
    pins: Vec<P, MAX_OUTPUT_LINES>,
    polarity: Polarity,
}

impl<P: OutputPin> GpioOutputBank<P> {
    /// Wrap a bank of output pins with their configured polarity.
    ///
    /// The pins must be constructed in their logical-off state (for
    /// active-high wiring: `Level::Low`).
    pub fn new(pins: Vec<P, MAX_OUTPUT_LINES>, polarity: Polarity) -> Self {
        Self { pins, polarity }
    }
}

impl<P: OutputPin> OutputBank for GpioOutputBank<P> {
    type Error = P::Error;

    fn len(&self) -> usize {
        self.pins.len()
    }

    fn write_all(&mut self, levels: &[bool]) -> Result<(), Self::Error> {
        for (pin, level) in self.pins.iter_mut().zip(levels) {
            if self.polarity.to_electrical(*level) {
                pin.set_high()?;
            } else {
                pin.set_low()?;
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// BoardLines - LineHost over the board's pins
// ---------------------------------------------------------------------------

/// The board's output type: an STM32 push-pull output.
pub type BoardOutput = Output<'static, AnyPin>;
/// The board's amplifier-enable bank type.
pub type BoardOutputBank = GpioOutputBank<BoardOutput>;

/// [`LineHost`] over one named jack input and one named output bank.
pub struct BoardLines {
    input_name: &'static str,
    outputs_name: &'static str,
    jack: Option<ExtiJack>,
    amps: Option<BoardOutputBank>,
}

impl BoardLines {
    /// Create a host handing out `jack` under `input_name` and `amps`
    /// under `outputs_name`.
    pub fn new(
        input_name: &'static str,
        outputs_name: &'static str,
        jack: ExtiJack,
        amps: BoardOutputBank,
    ) -> Self {
        Self {
            input_name,
            outputs_name,
            jack: Some(jack),
            amps: Some(amps),
        }
    }
}

impl LineHost for BoardLines {
    type Input = ExtiJack;
    type Outputs = BoardOutputBank;

    fn claim_input(&mut self, name: &str) -> Result<Self::Input, ClaimError> {
        if name != self.input_name {
            return Err(ClaimError::NotFound);
        }
        self.jack.take().ok_or(ClaimError::Busy)
    }

    fn claim_outputs(&mut self, name: &str) -> Result<Self::Outputs, ClaimError> {
        if name != self.outputs_name {
            return Err(ClaimError::NotFound);
        }
        self.amps.take().ok_or(ClaimError::Busy)
    }
}

// ---------------------------------------------------------------------------
// Reactor task
// ---------------------------------------------------------------------------

/// Embassy task running the switch reactor loop.
#[embassy_executor::task]
pub async fn switch_task(mut switch: AmpSwitch<BoardLines>) -> ! {
    switch.run().await
}

/// Spawn the reactor task for an attached switch.
///
/// Call this once from the Embassy `main` after a successful attach; the
/// task owns the device for the lifetime of the program.
pub fn spawn_switch(spawner: &Spawner, switch: AmpSwitch<BoardLines>) {
    if spawner.spawn(switch_task(switch)).is_err() {
        defmt::error!("failed to spawn switch task");
    }
}
