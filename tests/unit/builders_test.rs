//! Tests for controller construction

use std::sync::Arc;

use doorwarden::builders::ControllerBuilder;
use doorwarden::config::ControllerConfig;
use doorwarden::core::ControllerError;
use doorwarden::discovery::{ClaimEnv, CollectionHandler};
use doorwarden::infra::{DeviceHandle, InMemoryConfigSource, InMemoryInventory, SimDoor};
use doorwarden::util::ManualClock;

struct ClaimEverything;

impl CollectionHandler for ClaimEverything {
    fn name(&self) -> &'static str {
        "everything"
    }

    fn try_claim(&mut self, _device: &DeviceHandle, _env: &mut ClaimEnv<'_>) -> bool {
        true
    }
}

#[test]
fn test_build_requires_inventory() {
    let err = ControllerBuilder::new(ControllerConfig::default()).build().unwrap_err();
    assert!(matches!(err, ControllerError::InvalidConfig(_)));
}

#[test]
fn test_build_applies_controller_text() {
    let controller = ControllerBuilder::new(ControllerConfig::default())
        .inventory(InMemoryInventory::new())
        .config_source(InMemoryConfigSource::new("doorwarden:bogus"))
        .clock(ManualClock::new(0))
        .build()
        .unwrap();
    assert_eq!(controller.log().count("Unrecognized option 'doorwarden:bogus'"), 1);
}

#[test]
fn test_custom_collector_replaces_default() {
    let inventory = InMemoryInventory::new();
    inventory.add(Arc::new(SimDoor::new("A")));
    let mut controller = ControllerBuilder::new(ControllerConfig::default())
        .inventory(inventory)
        .collector(ClaimEverything)
        .clock(ManualClock::new(0))
        .build()
        .unwrap();
    controller.main("run");
    assert!(controller.doors().is_empty());
}
