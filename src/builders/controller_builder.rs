//! Builder assembling a [`Controller`] from bootstrap configuration and
//! host collaborators.

use crate::config::ControllerConfig;
use crate::core::ControllerError;
use crate::discovery::CollectionHandler;
use crate::infra::{ConfigSource, DeviceInventory, InMemoryConfigSource};
use crate::policy::DoorCollector;
use crate::runtime::{Controller, ControllerContext};
use crate::util::{Clock, SystemClock};

/// Collects collaborators, validates, and builds a controller.
///
/// Defaults: the wall clock, empty controller-wide configuration text, and a
/// single [`DoorCollector`]. An inventory is required.
pub struct ControllerBuilder {
    config: ControllerConfig,
    inventory: Option<Box<dyn DeviceInventory>>,
    config_source: Option<Box<dyn ConfigSource>>,
    clock: Option<Box<dyn Clock>>,
    collectors: Vec<Box<dyn CollectionHandler>>,
}

impl ControllerBuilder {
    /// Start from `config`.
    #[must_use]
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            config,
            inventory: None,
            config_source: None,
            clock: None,
            collectors: Vec::new(),
        }
    }

    /// Device inventory to discover from.
    #[must_use]
    pub fn inventory(mut self, inventory: impl DeviceInventory + 'static) -> Self {
        self.inventory = Some(Box::new(inventory));
        self
    }

    /// Source of the controller-wide configuration text.
    #[must_use]
    pub fn config_source(mut self, source: impl ConfigSource + 'static) -> Self {
        self.config_source = Some(Box::new(source));
        self
    }

    /// Time source.
    #[must_use]
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    /// Add a collection handler. Handlers are offered devices in the order
    /// they were added; once any handler is added the default door
    /// collector is no longer installed implicitly.
    #[must_use]
    pub fn collector(mut self, handler: impl CollectionHandler + 'static) -> Self {
        self.collectors.push(Box::new(handler));
        self
    }

    /// Validate and build. The controller runs its initial reload before
    /// this returns.
    ///
    /// # Errors
    ///
    /// [`ControllerError::InvalidConfig`] when the bootstrap configuration
    /// is invalid or no inventory was supplied.
    pub fn build(self) -> Result<Controller, ControllerError> {
        self.config.validate()?;
        let inventory = self
            .inventory
            .ok_or_else(|| ControllerError::InvalidConfig("a device inventory is required".into()))?;
        let mut collectors = self.collectors;
        if collectors.is_empty() {
            collectors.push(Box::new(DoorCollector::new()));
        }
        let config_source = self
            .config_source
            .unwrap_or_else(|| Box::new(InMemoryConfigSource::default()));
        let clock = self.clock.unwrap_or_else(|| Box::new(SystemClock));

        tracing::info!(
            tag = %self.config.tag,
            steps_per_tick = self.config.steps_per_tick,
            collectors = collectors.len(),
            "building controller"
        );
        let cx = ControllerContext::new(self.config.tag, self.config.log_capacity, collectors, inventory);
        Ok(Controller::new(cx, config_source, clock, self.config.steps_per_tick))
    }
}

impl std::fmt::Debug for ControllerBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControllerBuilder")
            .field("config", &self.config)
            .field("inventory", &self.inventory.is_some())
            .field("collectors", &self.collectors.len())
            .finish_non_exhaustive()
    }
}
