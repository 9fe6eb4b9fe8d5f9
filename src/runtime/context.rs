//! Shared state lent to every operation the controller schedules.

use std::fmt;

use crate::config::ScheduleHandler;
use crate::core::LogBuffer;
use crate::discovery::{offer_to, ClaimEnv, CollectionHandler, DiscoveryContext};
use crate::infra::{DeviceHandle, DeviceInventory};
use crate::policy::{DoorDefaultsHandler, DoorPolicyEngine, LockdownFlag, PolicyContext, PolicyEnv};

/// Controller state threaded through the scheduler instead of globals, so
/// independent controllers can coexist in one process.
pub struct ControllerContext {
    pub(crate) tag: String,
    pub(crate) now_ms: u128,
    pub(crate) log: LogBuffer,
    pub(crate) lockdown: LockdownFlag,
    pub(crate) doors: DoorPolicyEngine,
    pub(crate) door_defaults: DoorDefaultsHandler,
    pub(crate) schedule: ScheduleHandler,
    pub(crate) collectors: Vec<Box<dyn CollectionHandler>>,
    pub(crate) inventory: Box<dyn DeviceInventory>,
}

impl ControllerContext {
    pub(crate) fn new(
        tag: String,
        log_capacity: usize,
        collectors: Vec<Box<dyn CollectionHandler>>,
        inventory: Box<dyn DeviceInventory>,
    ) -> Self {
        Self {
            tag,
            now_ms: 0,
            log: LogBuffer::new(log_capacity),
            lockdown: LockdownFlag::default(),
            doors: DoorPolicyEngine::new(),
            door_defaults: DoorDefaultsHandler::default(),
            schedule: ScheduleHandler::default(),
            collectors,
            inventory,
        }
    }

    /// Controller scope tag.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Host time of the current invocation.
    #[must_use]
    pub const fn now_ms(&self) -> u128 {
        self.now_ms
    }

    /// Controller log.
    #[must_use]
    pub const fn log(&self) -> &LogBuffer {
        &self.log
    }

    /// Lockdown state.
    #[must_use]
    pub const fn lockdown(&self) -> LockdownFlag {
        self.lockdown
    }

    /// Managed doors.
    #[must_use]
    pub const fn doors(&self) -> &DoorPolicyEngine {
        &self.doors
    }
}

impl fmt::Debug for ControllerContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerContext")
            .field("tag", &self.tag)
            .field("now_ms", &self.now_ms)
            .field("lockdown", &self.lockdown)
            .field("doors", &self.doors.len())
            .field("collectors", &self.collectors.len())
            .finish_non_exhaustive()
    }
}

impl PolicyContext for ControllerContext {
    fn policy_env(&mut self) -> PolicyEnv<'_> {
        PolicyEnv {
            doors: &mut self.doors,
            log: &mut self.log,
            now_ms: self.now_ms,
            lockdown: self.lockdown.is_engaged(),
        }
    }
}

impl DiscoveryContext for ControllerContext {
    fn collect_devices(&mut self, out: &mut Vec<DeviceHandle>) {
        self.inventory.collect_devices(out);
    }

    fn offer(&mut self, device: &DeviceHandle) -> Option<&'static str> {
        let mut env = ClaimEnv {
            tag: &self.tag,
            now_ms: self.now_ms,
            door_defaults: self.door_defaults.settings(),
            doors: &mut self.doors,
            log: &mut self.log,
        };
        offer_to(&mut self.collectors, device, &mut env)
    }
}
