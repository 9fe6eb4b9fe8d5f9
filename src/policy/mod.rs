//! Door management policy: settings, lockdown, and the per-door state machine.

pub mod collector;
pub mod engine;
pub mod lockdown;
pub mod settings;

pub use collector::DoorCollector;
pub use engine::{DoorPolicyEngine, ManageDoorsOp, ManagedDoor, PolicyContext, PolicyEnv};
pub use lockdown::{LockdownFlag, ENGAGING_LOCKDOWN, RELEASING_LOCKDOWN};
pub use settings::{
    DoorDefaultsHandler, DoorSettings, DoorSettingsHandler, AUTO_CLOSE_INTERVAL, IGNORE,
};

pub use crate::infra::DoorStatus;
