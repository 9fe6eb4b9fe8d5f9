//! End-to-end controller behaviour driven through `Controller::main`.

use std::sync::Arc;
use std::time::Duration;

use doorwarden::builders::ControllerBuilder;
use doorwarden::config::ControllerConfig;
use doorwarden::infra::{
    DoorControl, DoorStatus, InMemoryConfigSource, InMemoryInventory, SimDevice, SimDoor,
};
use doorwarden::runtime::{Controller, UpdateDirective, INVALID_ARGUMENT};
use doorwarden::util::ManualClock;

struct Harness {
    controller: Controller,
    inventory: InMemoryInventory,
    config: InMemoryConfigSource,
    clock: ManualClock,
}

fn harness(steps_per_tick: u32, text: &str) -> Harness {
    let inventory = InMemoryInventory::new();
    let config = InMemoryConfigSource::new(text);
    let clock = ManualClock::new(0);
    let controller = ControllerBuilder::new(ControllerConfig {
        steps_per_tick,
        ..ControllerConfig::default()
    })
    .inventory(inventory.clone())
    .config_source(config.clone())
    .clock(clock.clone())
    .build()
    .unwrap();
    Harness {
        controller,
        inventory,
        config,
        clock,
    }
}

#[test]
fn test_discovery_claims_only_doors() {
    let mut h = harness(200, "");
    for name in ["A", "B", "C"] {
        h.inventory.add(Arc::new(SimDoor::new(name)));
    }
    h.inventory.add(Arc::new(SimDevice::new("Light")));
    h.inventory.add(Arc::new(SimDevice::new("Pump")));

    assert_eq!(h.controller.main(""), UpdateDirective::EveryTick);
    assert_eq!(h.controller.doors().len(), 3);
    assert!(h.controller.log().is_empty());
}

#[test]
fn test_discovery_resumes_across_ticks() {
    let mut h = harness(2, "");
    for name in ["A", "B", "C", "D", "E"] {
        h.inventory.add(Arc::new(SimDoor::new(name)));
    }

    h.controller.main("");
    assert_eq!(h.controller.doors().len(), 1);
    h.controller.main("");
    assert_eq!(h.controller.doors().len(), 3);
    h.controller.main("");
    assert_eq!(h.controller.doors().len(), 5);

    let names: Vec<_> = h.controller.doors().doors().iter().map(|d| d.name().to_string()).collect();
    assert_eq!(names, vec!["A", "B", "C", "D", "E"]);
}

#[test]
fn test_reload_replaces_recurring_registrations() {
    let mut h = harness(200, "doorwarden:manage-interval:500");
    h.inventory.add(Arc::new(SimDoor::new("A")));
    h.controller.main("");
    let recurring = h.controller.scheduler().recurring();
    assert_eq!(recurring.len(), 2);
    assert_eq!(recurring[0].name(), "manage-doors");
    assert_eq!(recurring[0].interval(), Duration::from_millis(500));

    h.config.set_text("doorwarden:manage-interval:250\ndoorwarden:maintenance-interval:2000");
    h.inventory.add(Arc::new(SimDoor::new("B")));
    h.controller.main("reload");

    let recurring = h.controller.scheduler().recurring();
    assert_eq!(recurring.len(), 2);
    assert_eq!(recurring[0].interval(), Duration::from_millis(250));
    assert_eq!(recurring[1].name(), "maintenance");
    assert_eq!(recurring[1].interval(), Duration::from_millis(2_000));
    assert_eq!(h.controller.doors().len(), 2);
}

#[test]
fn test_invalid_command_is_logged_and_ignored() {
    let mut h = harness(200, "");
    assert_eq!(h.controller.main("self-destruct"), UpdateDirective::EveryTick);
    assert_eq!(h.controller.log().count(INVALID_ARGUMENT), 1);
    assert!(!h.controller.lockdown().is_engaged());
}

#[test]
fn test_stats_reports_doors_and_queues() {
    let mut h = harness(200, "");
    h.inventory.add(Arc::new(SimDoor::new("A")));
    h.inventory.add(Arc::new(SimDoor::new("B")));
    h.controller.main("");
    h.controller.main("STATS");

    assert_eq!(h.controller.log().count("Managing 2 doors"), 1);
    assert_eq!(h.controller.log().count("Pending 0, recurring 2, lockdown off"), 1);
}

#[test]
fn test_stop_skips_tick() {
    let mut h = harness(200, "");
    h.inventory.add(Arc::new(SimDoor::new("A")));
    assert_eq!(h.controller.main(" stop "), UpdateDirective::Stop);
    assert_eq!(h.controller.scheduler().pending_len(), 1);
    assert!(h.controller.doors().is_empty());
}

#[test]
fn test_lockdown_and_release() {
    let mut h = harness(200, "");
    let door = Arc::new(SimDoor::new("Airlock"));
    door.set_status(DoorStatus::Open);
    h.inventory.add(door.clone());

    h.controller.main("lockdown");
    assert!(h.controller.lockdown().is_engaged());
    assert_eq!(h.controller.log().count("Engaging Lockdown"), 1);
    assert_eq!(door.status(), DoorStatus::Closing);
    assert!(door.is_enabled());

    door.settle();
    h.clock.advance_ms(100);
    h.controller.main("lockdown");
    assert!(!door.is_enabled());
    assert!(!door.request_open());
    assert_eq!(h.controller.log().count("Engaging Lockdown"), 1);

    h.clock.advance_ms(100);
    h.controller.main("release");
    assert_eq!(h.controller.log().count("Releasing Lockdown"), 1);
    assert!(door.is_enabled());
}

#[test]
fn test_fleet_default_auto_close() {
    let mut h = harness(200, "doorwarden:auto-close-interval:3000");
    let door = Arc::new(SimDoor::new("A"));
    h.inventory.add(door.clone());
    h.controller.main("");

    assert!(door.request_open());
    door.settle();
    h.clock.set_ms(100);
    h.controller.main("");
    h.clock.set_ms(3_100);
    h.controller.main("");
    assert_eq!(door.status(), DoorStatus::Open);

    h.clock.set_ms(3_200);
    h.controller.main("");
    assert_eq!(door.status(), DoorStatus::Closing);
    assert_eq!(h.controller.log().count("Closing A"), 1);
}

#[test]
fn test_per_device_override_and_ignore() {
    let mut h = harness(200, "doorwarden:auto-close-interval:8000");
    h.inventory
        .add(Arc::new(SimDoor::new("Hangar").with_custom_data("Hangar:auto-close-interval:1000")));
    h.inventory
        .add(Arc::new(SimDoor::new("Vault").with_custom_data("# locked by hand\ndoorwarden:ignore")));
    h.inventory.add(Arc::new(SimDoor::new("Bay")));
    h.controller.main("");

    let doors = h.controller.doors();
    assert_eq!(doors.len(), 2);
    assert!(doors.find("Vault").is_none());
    assert_eq!(
        doors.find("Hangar").map(|d| d.settings().auto_close),
        Some(Duration::from_millis(1_000))
    );
    assert_eq!(
        doors.find("Bay").map(|d| d.settings().auto_close),
        Some(Duration::from_millis(8_000))
    );
}

#[test]
fn test_bad_device_option_keeps_default_and_logs_usage() {
    let mut h = harness(200, "");
    h.inventory
        .add(Arc::new(SimDoor::new("Hangar").with_custom_data("Hangar:auto-close-interval:soon")));
    h.controller.main("");

    assert_eq!(
        h.controller.doors().find("Hangar").map(|d| d.settings().auto_close),
        Some(Duration::from_millis(5_000))
    );
    assert_eq!(
        h.controller.log().count(
            "Invalid 'Hangar:auto-close-interval:soon': usage auto-close-interval:<milliseconds > 0>"
        ),
        1
    );
}

#[test]
fn test_pools_stay_bounded_under_steady_ticks() {
    let mut h = harness(200, "doorwarden:maintenance-interval:100");
    for i in 0..10 {
        h.inventory.add(Arc::new(SimDoor::new(format!("D{i}"))));
    }
    for _ in 0..50 {
        h.clock.advance_ms(100);
        h.controller.main("");
    }
    assert_eq!(h.controller.doors().len(), 10);
    for pool in h.controller.pools() {
        assert!(pool.stats().slots <= 1, "{} grew to {:?}", pool.label(), pool.stats());
        assert_eq!(pool.stats().leased, 0);
    }
}

#[test]
fn test_foreign_free_text_in_custom_data_is_not_reported() {
    let mut h = harness(200, "");
    h.inventory.add(Arc::new(
        SimDoor::new("Hangar").with_custom_data("[Other Script]\nInstalled by Bob\nother:speed:5"),
    ));
    h.controller.main("");
    h.controller.main("reload");
    h.controller.main("");

    assert!(h.controller.log().is_empty(), "{:?}", h.controller.log().lines());
    assert!(h.controller.doors().find("Hangar").is_some());
}

#[test]
fn test_scoped_line_without_option_is_still_malformed() {
    let mut h = harness(200, "doorwarden:\nInstalled by Bob");
    h.inventory
        .add(Arc::new(SimDoor::new("Hangar").with_custom_data("Hangar\nnotes about the hangar")));
    h.controller.main("");

    let texts: Vec<_> = h.controller.log().texts().collect();
    assert_eq!(texts, vec!["Malformed line 'doorwarden:'", "Malformed line 'Hangar'"]);
}

#[test]
fn test_backlog_is_reported_when_budget_cannot_keep_up() {
    let mut h = harness(3, "");
    for i in 0..10 {
        h.inventory.add(Arc::new(SimDoor::new(format!("D{i}"))));
    }
    for _ in 0..20 {
        h.clock.advance_ms(100);
        h.controller.main("");
    }
    assert!(h.controller.scheduler().pending_len() > 10);
    assert!(h.controller.backlog_ticks() > 0);

    h.controller.main("stats");
    let log = h.controller.log();
    assert!(log.texts().any(|t| t.starts_with("Backlog growing for ")));
    assert!(log.texts().any(|t| t.starts_with("Pool manage-doors has ")));
}

#[test]
fn test_backlog_resets_once_queue_drains() {
    let mut h = harness(200, "");
    h.inventory.add(Arc::new(SimDoor::new("A")));
    h.controller.main("");
    h.controller.main("stats");
    assert_eq!(h.controller.backlog_ticks(), 0);
    assert!(!h.controller.log().texts().any(|t| t.starts_with("Backlog")));
}
