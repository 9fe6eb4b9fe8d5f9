//! In-memory host adapters for development and testing.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::infra::{ConfigSource, Device, DeviceHandle, DeviceInventory, DoorControl, DoorStatus};

/// Snapshot of a simulated door.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimDoorState {
    /// Physical state.
    pub status: DoorStatus,
    /// Manual operation allowed.
    pub enabled: bool,
    /// Close requests received so far.
    pub close_requests: u32,
}

/// A door whose state is driven by the test or demo harness.
#[derive(Debug)]
pub struct SimDoor {
    name: String,
    custom_data: Mutex<String>,
    state: Mutex<SimDoorState>,
}

impl SimDoor {
    /// A closed, enabled door.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            custom_data: Mutex::new(String::new()),
            state: Mutex::new(SimDoorState {
                status: DoorStatus::Closed,
                enabled: true,
                close_requests: 0,
            }),
        }
    }

    /// Attach custom data text.
    #[must_use]
    pub fn with_custom_data(self, text: impl Into<String>) -> Self {
        *self.custom_data.lock() = text.into();
        self
    }

    /// Replace the custom data text.
    pub fn set_custom_data(&self, text: impl Into<String>) {
        *self.custom_data.lock() = text.into();
    }

    /// Force the physical state.
    pub fn set_status(&self, status: DoorStatus) {
        self.state.lock().status = status;
    }

    /// Current snapshot.
    #[must_use]
    pub fn state(&self) -> SimDoorState {
        *self.state.lock()
    }

    /// Manual open attempt; refused while disabled.
    pub fn request_open(&self) -> bool {
        let mut state = self.state.lock();
        if !state.enabled {
            return false;
        }
        if matches!(state.status, DoorStatus::Closed | DoorStatus::Closing) {
            state.status = DoorStatus::Opening;
        }
        true
    }

    /// Finish any movement in progress.
    pub fn settle(&self) {
        let mut state = self.state.lock();
        state.status = match state.status {
            DoorStatus::Opening => DoorStatus::Open,
            DoorStatus::Closing => DoorStatus::Closed,
            other => other,
        };
    }
}

impl DoorControl for SimDoor {
    fn status(&self) -> DoorStatus {
        self.state.lock().status
    }

    fn is_enabled(&self) -> bool {
        self.state.lock().enabled
    }

    fn set_enabled(&self, enabled: bool) {
        self.state.lock().enabled = enabled;
    }

    fn close(&self) {
        let mut state = self.state.lock();
        state.close_requests += 1;
        if state.status.is_opening_or_open() {
            state.status = DoorStatus::Closing;
        }
    }
}

impl Device for SimDoor {
    fn name(&self) -> &str {
        &self.name
    }

    fn custom_data(&self) -> String {
        self.custom_data.lock().clone()
    }

    fn door(&self) -> Option<&dyn DoorControl> {
        Some(self)
    }
}

/// A device without door capability.
#[derive(Debug, Clone)]
pub struct SimDevice {
    name: String,
}

impl SimDevice {
    /// Named non-door device.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Device for SimDevice {
    fn name(&self) -> &str {
        &self.name
    }

    fn custom_data(&self) -> String {
        String::new()
    }
}

/// Shared, mutable device list.
///
/// Clones observe the same list, so a harness can keep one handle and hand
/// another to the controller.
#[derive(Debug, Clone, Default)]
pub struct InMemoryInventory {
    devices: Arc<Mutex<Vec<DeviceHandle>>>,
}

impl InMemoryInventory {
    /// Empty inventory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a device at the end of the list.
    pub fn add(&self, device: DeviceHandle) {
        self.devices.lock().push(device);
    }

    /// Remove every device called `name`.
    pub fn remove(&self, name: &str) {
        self.devices.lock().retain(|d| d.name() != name);
    }

    /// Number of devices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.devices.lock().len()
    }

    /// True when the inventory holds no devices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.devices.lock().is_empty()
    }
}

impl DeviceInventory for InMemoryInventory {
    fn collect_devices(&self, out: &mut Vec<DeviceHandle>) {
        out.extend(self.devices.lock().iter().cloned());
    }
}

/// Shared, replaceable controller configuration text.
#[derive(Debug, Clone, Default)]
pub struct InMemoryConfigSource {
    text: Arc<Mutex<String>>,
}

impl InMemoryConfigSource {
    /// Source holding `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Arc::new(Mutex::new(text.into())),
        }
    }

    /// Replace the text; takes effect on the next reload.
    pub fn set_text(&self, text: impl Into<String>) {
        *self.text.lock() = text.into();
    }
}

impl ConfigSource for InMemoryConfigSource {
    fn controller_text(&self) -> String {
        self.text.lock().clone()
    }
}
