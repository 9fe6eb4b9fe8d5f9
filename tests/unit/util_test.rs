//! Tests for clocks and telemetry helpers

use doorwarden::util::{init_tracing, now_ms, Clock, ManualClock, SystemClock};

#[test]
fn test_system_clock_is_after_epoch() {
    assert!(SystemClock.now_ms() > 0);
    assert!(now_ms() > 0);
}

#[test]
fn test_manual_clock_advances() {
    let clock = ManualClock::new(1_000);
    clock.advance_ms(250);
    assert_eq!(clock.now_ms(), 1_250);
}

#[test]
fn test_init_tracing_is_idempotent() {
    init_tracing();
    init_tracing();
}
