//! Device discovery as a resumable operation.
//!
//! A discovery pass enumerates the host inventory once into a reusable
//! buffer and then offers one device per step to the collection handlers.
//! The cursor survives across ticks, so large inventories are walked over as
//! many ticks as the budget requires.

use crate::core::{LogSink, Operation, Poolable, Spawner, StepStatus};
use crate::infra::DeviceHandle;
use crate::policy::{DoorPolicyEngine, DoorSettings};

/// Collaborators a collection handler may use while claiming a device.
pub struct ClaimEnv<'a> {
    /// Controller scope tag.
    pub tag: &'a str,
    /// Host time for this tick.
    pub now_ms: u128,
    /// Fleet-wide door defaults from the controller-wide pass.
    pub door_defaults: DoorSettings,
    /// Engine receiving claimed doors.
    pub doors: &'a mut DoorPolicyEngine,
    /// Controller log.
    pub log: &'a mut dyn LogSink,
}

/// A subsystem that may take ownership of discovered devices.
pub trait CollectionHandler {
    /// Handler name used in logs.
    fn name(&self) -> &'static str;

    /// Claim `device` if this handler manages it. A claimed device is not
    /// offered to later handlers.
    fn try_claim(&mut self, device: &DeviceHandle, env: &mut ClaimEnv<'_>) -> bool;
}

/// Contexts able to drive a [`DiscoveryOp`].
pub trait DiscoveryContext {
    /// Append the host inventory to `out`.
    fn collect_devices(&mut self, out: &mut Vec<DeviceHandle>);

    /// Offer `device` to the collection handlers in order. Returns the name
    /// of the handler that claimed it.
    fn offer(&mut self, device: &DeviceHandle) -> Option<&'static str>;
}

/// Offer `device` to each handler in turn until one claims it.
pub fn offer_to(
    handlers: &mut [Box<dyn CollectionHandler>],
    device: &DeviceHandle,
    env: &mut ClaimEnv<'_>,
) -> Option<&'static str> {
    handlers
        .iter_mut()
        .find_map(|handler| handler.try_claim(device, env).then(|| handler.name()))
}

/// One pass over the host inventory.
#[derive(Debug, Default)]
pub struct DiscoveryOp {
    devices: Vec<DeviceHandle>,
    cursor: usize,
    enumerated: bool,
    claimed: usize,
    done: bool,
}

impl DiscoveryOp {
    /// Devices offered so far in this pass.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Devices claimed so far in this pass.
    #[must_use]
    pub const fn claimed(&self) -> usize {
        self.claimed
    }
}

impl Poolable for DiscoveryOp {
    fn reset(&mut self) {
        self.devices.clear();
        self.cursor = 0;
        self.enumerated = false;
        self.claimed = 0;
        self.done = false;
    }
}

impl<C: DiscoveryContext> Operation<C> for DiscoveryOp {
    fn step(&mut self, cx: &mut C, _spawn: &mut Spawner<C>) -> StepStatus {
        if self.done {
            return StepStatus::Complete;
        }
        if !self.enumerated {
            cx.collect_devices(&mut self.devices);
            self.enumerated = true;
            tracing::debug!(devices = self.devices.len(), "inventory enumerated");
        } else if let Some(device) = self.devices.get(self.cursor) {
            match cx.offer(device) {
                Some(handler) => {
                    self.claimed += 1;
                    tracing::trace!(device = device.name(), handler, "device claimed");
                }
                None => tracing::trace!(device = device.name(), "device not claimed"),
            }
            self.cursor += 1;
        }
        if self.cursor < self.devices.len() {
            return StepStatus::Pending;
        }
        tracing::info!(scanned = self.devices.len(), claimed = self.claimed, "discovery complete");
        self.devices.clear();
        self.done = true;
        StepStatus::Complete
    }

    fn name(&self) -> &'static str {
        "discovery"
    }
}
