//! Host collaborator interfaces: devices, inventory, configuration text.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Physical state reported by a door.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoorStatus {
    /// Fully closed.
    Closed,
    /// Moving towards closed.
    Closing,
    /// Fully open.
    Open,
    /// Moving towards open.
    Opening,
}

impl DoorStatus {
    /// True for `Open` and `Opening`.
    #[must_use]
    pub const fn is_opening_or_open(self) -> bool {
        matches!(self, Self::Open | Self::Opening)
    }
}

impl fmt::Display for DoorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Closed => "closed",
            Self::Closing => "closing",
            Self::Open => "open",
            Self::Opening => "opening",
        };
        f.write_str(s)
    }
}

/// Door capability of a device.
///
/// Methods take `&self`: the host owns device state and mutation goes
/// through its API.
pub trait DoorControl: Send + Sync {
    /// Current physical state.
    fn status(&self) -> DoorStatus;
    /// Whether the device accepts manual operation.
    fn is_enabled(&self) -> bool;
    /// Enable or disable manual operation.
    fn set_enabled(&self, enabled: bool);
    /// Ask the door to close.
    fn close(&self);
}

/// A device in the host inventory.
pub trait Device: Send + Sync {
    /// Display name, also usable as a per-device scope tag.
    fn name(&self) -> &str;
    /// Free-form text attached to the device.
    fn custom_data(&self) -> String;
    /// The door capability, if this device is a door.
    fn door(&self) -> Option<&dyn DoorControl> {
        None
    }
}

impl fmt::Debug for dyn Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Device")
            .field("name", &self.name())
            .field("door", &self.door().is_some())
            .finish()
    }
}

/// Shared handle to a host device.
pub type DeviceHandle = Arc<dyn Device>;

/// True when both handles refer to the same device.
#[must_use]
pub fn same_device(a: &DeviceHandle, b: &DeviceHandle) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

/// Enumerates the host's device inventory.
pub trait DeviceInventory {
    /// Append every device to `out`, in a stable order.
    fn collect_devices(&self, out: &mut Vec<DeviceHandle>);
}

/// Source of controller-wide configuration text.
pub trait ConfigSource {
    /// Current controller-wide configuration text.
    fn controller_text(&self) -> String;
}
