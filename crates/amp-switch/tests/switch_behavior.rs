//! Behavior tests for the jack-detect amplifier switch.
//!
//! Exercised end-to-end over the platform mocks: the host keeps shared
//! handles to the lines, so every test can steer the jack level, deliver
//! edges, and observe the output bank while the driver owns the lines.

use std::time::Duration;

use amp_switch::{AmpSwitch, AttachError, SwitchConfig, SwitchRegistry, SwitchService};
use platform::lines::ClaimError;
use platform::mocks::MockLineHost;

fn config() -> SwitchConfig {
    SwitchConfig::new("jack-detect", "amp-enable").unwrap()
}

// ---------------------------------------------------------------------------
// Initial consistency
// ---------------------------------------------------------------------------

/// After attach, every output equals the input level sampled during attach.
#[test]
fn attach_mirrors_initial_input_true() {
    let mut host = MockLineHost::new(2);
    host.set_jack_level(true);

    let _switch = AmpSwitch::attach(&mut host, &config()).unwrap();
    assert_eq!(host.output_levels(), vec![true, true]);
}

#[test]
fn attach_mirrors_initial_input_false() {
    let mut host = MockLineHost::new(2);
    host.set_jack_level(false);

    let _switch = AmpSwitch::attach(&mut host, &config()).unwrap();
    assert_eq!(host.output_levels(), vec![false, false]);
}

/// Edge events are bound only after the initial state is established.
#[test]
fn attach_binds_edge_events() {
    let mut host = MockLineHost::new(1);
    let _switch = AmpSwitch::attach(&mut host, &config()).unwrap();
    assert!(host.edge_events_enabled());
}

// ---------------------------------------------------------------------------
// Fan-out atomicity
// ---------------------------------------------------------------------------

/// Every array write ever issued holds identical values across all lines.
#[tokio::test]
async fn all_writes_are_uniform() {
    let mut host = MockLineHost::new(3);
    host.set_jack_level(true);
    let mut switch = AmpSwitch::attach(&mut host, &config()).unwrap();

    for level in [false, true, false, true] {
        host.set_jack_level(level);
        host.pulse_edge();
        switch.process_edge().await;
    }
    switch.detach();

    let history = host.write_history();
    assert!(history.len() >= 6);
    for write in &history {
        assert_eq!(write.len(), 3);
        assert!(
            write.iter().all(|&l| l == write[0]),
            "split write observed: {write:?}"
        );
    }
}

// ---------------------------------------------------------------------------
// Edge reactivity and coalescing
// ---------------------------------------------------------------------------

/// A burst of edges collapses to one slow phase that drives the final
/// settled level.
#[tokio::test]
async fn edge_burst_settles_on_final_level() {
    let mut host = MockLineHost::new(2);
    host.set_jack_level(true);
    let mut switch = AmpSwitch::attach(&mut host, &config()).unwrap();

    // Plug bounces: several edges land before the reactor runs, the line
    // finally settles low.
    for level in [false, true, false] {
        host.set_jack_level(level);
        host.pulse_edge();
    }
    switch.process_edge().await;
    assert_eq!(host.output_levels(), vec![false, false]);

    // The burst left no queued edges behind: the next wait stays pending.
    let next = tokio::time::timeout(Duration::from_millis(20), switch.process_edge()).await;
    assert!(next.is_err(), "coalesced burst must wake the reactor once");
}

/// Consecutive settled edges track the input one at a time.
#[tokio::test]
async fn edges_track_input_changes() {
    let mut host = MockLineHost::new(2);
    host.set_jack_level(false);
    let mut switch = AmpSwitch::attach(&mut host, &config()).unwrap();

    host.set_jack_level(true);
    host.pulse_edge();
    switch.process_edge().await;
    assert_eq!(host.output_levels(), vec![true, true]);

    host.set_jack_level(false);
    host.pulse_edge();
    switch.process_edge().await;
    assert_eq!(host.output_levels(), vec![false, false]);
}

/// A failed edge wait drives nothing; the next edge heals.
#[tokio::test]
async fn failed_edge_wait_keeps_state() {
    let mut host = MockLineHost::new(1);
    host.set_jack_level(true);
    let mut switch = AmpSwitch::attach(&mut host, &config()).unwrap();
    let writes_after_attach = host.write_history().len();

    host.set_jack_level(false);
    host.fail_next_edge_wait();
    host.pulse_edge();
    switch.process_edge().await;
    assert_eq!(host.write_history().len(), writes_after_attach);
    assert_eq!(host.output_levels(), vec![true]);

    switch.process_edge().await;
    assert_eq!(host.output_levels(), vec![false]);
}

// ---------------------------------------------------------------------------
// Shutdown
// ---------------------------------------------------------------------------

/// Detach forces the outputs off no matter how often it is called.
#[test]
fn detach_is_idempotent() {
    let mut host = MockLineHost::new(2);
    host.set_jack_level(true);

    let mut service = SwitchService::new();
    service.attach(&mut host, &config()).unwrap();
    assert_eq!(host.output_levels(), vec![true, true]);

    service.detach();
    assert_eq!(host.output_levels(), vec![false, false]);
    assert!(!service.is_attached());
    assert!(!host.jack_claimed());
    assert!(!host.outputs_claimed());

    service.detach();
    service.detach();
    assert_eq!(host.output_levels(), vec![false, false]);
}

/// Detach after a failed attach never faults and leaves nothing on.
#[test]
fn detach_after_failed_attach_is_a_no_op() {
    let mut host = MockLineHost::new(2);
    host.set_jack_level(true);
    host.fail_next_outputs_claim();

    let mut service = SwitchService::new();
    assert!(service.attach(&mut host, &config()).is_err());
    service.detach();
    service.detach();
    assert_eq!(host.output_levels(), vec![false, false]);
}

/// Dropping the device also forces the outputs off.
#[test]
fn drop_forces_outputs_off() {
    let mut host = MockLineHost::new(2);
    host.set_jack_level(true);

    let switch = AmpSwitch::attach(&mut host, &config()).unwrap();
    assert_eq!(host.output_levels(), vec![true, true]);

    drop(switch);
    assert_eq!(host.output_levels(), vec![false, false]);
    assert!(!host.jack_claimed());
}

// ---------------------------------------------------------------------------
// Resume
// ---------------------------------------------------------------------------

/// Resume re-samples: the jack moved while edges were not serviced.
#[test]
fn resume_resynchronizes_outputs() {
    let mut host = MockLineHost::new(2);
    host.set_jack_level(true);
    let mut switch = AmpSwitch::attach(&mut host, &config()).unwrap();
    assert_eq!(host.output_levels(), vec![true, true]);

    // Plug inserted during suspend: no edge was delivered.
    host.set_jack_level(false);
    switch.resume();
    assert_eq!(host.output_levels(), vec![false, false]);
}

/// Resume on a never-attached service is a successful no-op.
#[test]
fn resume_without_attach_is_a_no_op() {
    let mut service: SwitchService<MockLineHost> = SwitchService::new();
    service.resume();
    assert!(!service.is_attached());
}

/// A failed resume sample keeps the previous output state.
#[test]
fn failed_resume_sample_keeps_state() {
    let mut host = MockLineHost::new(2);
    host.set_jack_level(true);
    let mut switch = AmpSwitch::attach(&mut host, &config()).unwrap();

    host.set_jack_level(false);
    host.fail_next_read();
    switch.resume();
    assert_eq!(host.output_levels(), vec![true, true]);

    switch.resume();
    assert_eq!(host.output_levels(), vec![false, false]);
}

// ---------------------------------------------------------------------------
// Rollback on partial failure
// ---------------------------------------------------------------------------

/// A failed output claim releases the already-claimed input; a corrected
/// attach then succeeds cleanly.
#[test]
fn failed_output_claim_releases_the_input() {
    let mut host = MockLineHost::new(2);
    host.fail_next_outputs_claim();

    let err = AmpSwitch::attach(&mut host, &config()).unwrap_err();
    assert!(matches!(
        err,
        AttachError::OutputClaim {
            cause: ClaimError::AccessDenied,
            ..
        }
    ));
    assert!(!host.jack_claimed());
    assert!(!host.outputs_claimed());

    let switch = AmpSwitch::attach(&mut host, &config()).unwrap();
    assert!(host.jack_claimed());
    drop(switch);
}

/// A failed edge-event binding rolls back both lines and forces the
/// already-driven outputs back off.
#[test]
fn failed_edge_binding_rolls_back_everything() {
    let mut host = MockLineHost::new(2);
    host.set_jack_level(true);
    host.fail_next_edge_enable();

    let err = AmpSwitch::attach(&mut host, &config()).unwrap_err();
    assert!(matches!(err, AttachError::EdgeEvents(_)));
    assert!(!host.jack_claimed());
    assert!(!host.outputs_claimed());
    assert_eq!(host.output_levels(), vec![false, false]);

    assert!(AmpSwitch::attach(&mut host, &config()).is_ok());
}

/// A failed initial sample is fatal and rolls back both claims.
#[test]
fn failed_initial_sample_is_fatal() {
    let mut host = MockLineHost::new(2);
    host.fail_next_read();

    let err = AmpSwitch::attach(&mut host, &config()).unwrap_err();
    assert!(matches!(err, AttachError::InitialSample(_)));
    assert!(!host.jack_claimed());
    assert!(!host.outputs_claimed());
}

/// An empty output bank cannot attach.
#[test]
fn empty_output_bank_is_rejected() {
    let mut host = MockLineHost::new(0);

    let err = AmpSwitch::attach(&mut host, &config()).unwrap_err();
    assert!(matches!(err, AttachError::EmptyOutputBank { .. }));
    assert!(!host.jack_claimed());
}

/// Attaching twice against the same lines reports the input as busy.
#[test]
fn second_attach_sees_busy_input() {
    let mut host = MockLineHost::new(1);
    let _switch = AmpSwitch::attach(&mut host, &config()).unwrap();

    let err = AmpSwitch::attach(&mut host, &config()).unwrap_err();
    assert!(matches!(
        err,
        AttachError::InputClaim {
            cause: ClaimError::Busy,
            ..
        }
    ));
}

// ---------------------------------------------------------------------------
// Debounce
// ---------------------------------------------------------------------------

/// A configured debounce interval is programmed into the input line.
#[test]
fn debounce_interval_is_applied() {
    let mut host = MockLineHost::new(1);
    let _switch =
        AmpSwitch::attach(&mut host, &config().with_debounce_us(5_000)).unwrap();
    assert_eq!(host.debounce_us(), Some(5_000));
}

/// A backend without debounce support does not fail the attach.
#[test]
fn unsupported_debounce_is_non_fatal() {
    let mut host = MockLineHost::new(1);
    host.reject_debounce();

    let switch =
        AmpSwitch::attach(&mut host, &config().with_debounce_us(5_000)).unwrap();
    assert_eq!(host.debounce_us(), None);
    assert_eq!(switch.debounce_us(), Some(5_000));
}

// ---------------------------------------------------------------------------
// Service lifecycle
// ---------------------------------------------------------------------------

/// Attaching an already-attached service is an error.
#[test]
fn double_attach_is_rejected() {
    let mut host = MockLineHost::new(1);
    let mut service = SwitchService::new();

    service.attach(&mut host, &config()).unwrap();
    assert!(matches!(
        service.attach(&mut host, &config()),
        Err(AttachError::AlreadyAttached)
    ));
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// The host environment resolves the factory by compatible string and
/// attaches through it.
#[test]
fn registry_attach_end_to_end() {
    let mut host = MockLineHost::new(2);
    host.set_jack_level(true);

    let mut registry = SwitchRegistry::<MockLineHost>::new();
    registry
        .register(amp_switch::AMP_SWITCH_COMPATIBLE, AmpSwitch::attach)
        .unwrap();

    let config = config();
    let attach = registry.resolve(&config).unwrap();
    let _switch = attach(&mut host, &config).unwrap();
    assert_eq!(host.output_levels(), vec![true, true]);
}

// ---------------------------------------------------------------------------
// Full scenario
// ---------------------------------------------------------------------------

/// The reference scenario: 1 input + 2 outputs, input initially true.
#[tokio::test]
async fn insert_remove_shutdown_scenario() {
    let mut host = MockLineHost::new(2);
    host.set_jack_level(true);

    let mut service = SwitchService::new();
    service.attach(&mut host, &config()).unwrap();
    assert_eq!(host.output_levels(), vec![true, true]);

    host.set_jack_level(false);
    host.pulse_edge();
    service.process_edge().await;
    assert_eq!(host.output_levels(), vec![false, false]);

    service.detach();
    assert_eq!(host.output_levels(), vec![false, false]);
}
