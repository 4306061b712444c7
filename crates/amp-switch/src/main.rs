//! Amplifier switch firmware - main entry point.
//!
//! Hardware-only entry point for STM32 targets.
//!
//! # Pin assignments
//!
//! These constants document the target PCB assignment; change them to match
//! your board before flashing.
//!
//! | Signal        | MCU pin | Notes                                  |
//! |---------------|---------|----------------------------------------|
//! | Jack detect   | PC13    | EXTI13, active-low, internal pull-up   |
//! | Amp enable 0  | PB0     | Active-high, low at boot (amp off)     |
//! | Amp enable 1  | PB1     | Active-high, low at boot (amp off)     |

#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_stm32::exti::ExtiInput;
use embassy_stm32::gpio::{AnyPin, Input, Level, Output, Pull, Speed};
use heapless::Vec;
use platform::lines::{Polarity, MAX_OUTPUT_LINES};

use amp_switch::hardware::{spawn_switch, BoardLines, BoardOutput, ExtiJack, GpioOutputBank};
use amp_switch::{AmpSwitch, SwitchConfig, SwitchRegistry, AMP_SWITCH_COMPATIBLE};

use defmt_rtt as _;
// Panic handler
use panic_probe as _;

/// Debounce requested for the jack-detect line, in microseconds.
///
/// EXTI has no hardware debounce, so this is logged and skipped on this
/// board; boards with a debouncing input backend pick it up.
const JACK_DEBOUNCE_US: u32 = 5_000;

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    defmt::info!("amp-switch v{=str}", "0.1.0");

    let p = embassy_stm32::init(Default::default());

    // Jack detect: switch to ground, closed when a plug is inserted.
    let jack = ExtiJack::new(
        ExtiInput::new(Input::new(p.PC13, Pull::Up).degrade(), p.EXTI13.degrade()),
        Polarity::ActiveLow,
    );

    // Amplifier enables: low at boot so the speakers stay off until the
    // first sample decides.
    let mut amps: Vec<BoardOutput, MAX_OUTPUT_LINES> = Vec::new();
    let _ = amps.push(Output::new(p.PB0, Level::Low, Speed::Low).degrade());
    let _ = amps.push(Output::new(p.PB1, Level::Low, Speed::Low).degrade());
    let amps = GpioOutputBank::new(amps, Polarity::ActiveHigh);

    let mut host = BoardLines::new("jack-detect", "amp-enable", jack, amps);

    let mut registry = SwitchRegistry::new();
    if registry
        .register(AMP_SWITCH_COMPATIBLE, AmpSwitch::attach)
        .is_err()
    {
        defmt::error!("switch registration failed");
        return;
    }

    let Ok(config) = SwitchConfig::new("jack-detect", "amp-enable") else {
        defmt::error!("invalid switch configuration");
        return;
    };
    let config = config.with_debounce_us(JACK_DEBOUNCE_US);

    let Ok(attach) = registry.resolve(&config) else {
        defmt::error!("no switch registered for '{=str}'", config.compatible());
        return;
    };

    match attach(&mut host, &config) {
        Ok(switch) => {
            defmt::info!(
                "amp switch attached ({=usize} outputs)",
                switch.output_count()
            );
            spawn_switch(&spawner, switch);
        }
        Err(e) => {
            defmt::error!("attach failed: {}", defmt::Debug2Format(&e));
        }
    }
}
