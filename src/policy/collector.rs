//! Collection handler that claims door devices for the policy engine.

use std::sync::Arc;

use crate::config::ConfigPipeline;
use crate::discovery::{ClaimEnv, CollectionHandler};
use crate::infra::DeviceHandle;
use crate::policy::DoorSettingsHandler;

/// Claims every door that does not opt out through its custom data.
///
/// A device's custom data is parsed with the controller tag and the device's
/// own name as accepted scopes, starting from the fleet defaults.
#[derive(Debug, Default)]
pub struct DoorCollector {
    handler: DoorSettingsHandler,
}

impl DoorCollector {
    /// Collector with stock defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CollectionHandler for DoorCollector {
    fn name(&self) -> &'static str {
        "doors"
    }

    fn try_claim(&mut self, device: &DeviceHandle, env: &mut ClaimEnv<'_>) -> bool {
        if device.door().is_none() {
            return false;
        }
        self.handler.inherit(env.door_defaults);
        let scopes = [env.tag, device.name()];
        let report = ConfigPipeline::new(&scopes).run(
            &device.custom_data(),
            &mut [&mut self.handler],
            &mut *env.log,
            env.now_ms,
        );
        if !report.is_clean() {
            tracing::warn!(
                door = device.name(),
                errors = report.errors,
                unrecognized = report.unrecognized,
                "door configuration has problems"
            );
        }
        if self.handler.is_ignored() {
            tracing::debug!(door = device.name(), "door ignored by configuration");
            return false;
        }
        env.doors
            .register(Arc::clone(device), self.handler.settings(), env.now_ms)
    }
}
