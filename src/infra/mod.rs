//! Host collaborator interfaces and in-memory adapters.

pub mod device;
pub mod memory;

pub use device::{
    same_device, ConfigSource, Device, DeviceHandle, DeviceInventory, DoorControl, DoorStatus,
};
pub use memory::{InMemoryConfigSource, InMemoryInventory, SimDevice, SimDoor, SimDoorState};
