//! Controller runtime: commands, shared context, and the host entry point.

pub mod command;
pub mod context;
pub mod controller;
pub mod maintenance;

pub use command::{Command, UpdateDirective};
pub use context::ControllerContext;
pub use controller::{Controller, INVALID_ARGUMENT};
pub use maintenance::{
    MaintenanceOp, MaintenanceTargets, NamedPool, PoolMaintenance, PRUNE_BATCH,
};
