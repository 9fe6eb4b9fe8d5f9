//! Core scheduling abstractions, object pooling, and the controller log.

pub mod budget;
pub mod error;
pub mod log;
pub mod operation;
pub mod resource_pool;
pub mod scheduler;

pub use budget::{Budget, StepBudget, Unlimited};
pub use error::{AppResult, ConfigError, ControllerError};
pub use log::{LogBuffer, LogLine, LogSink};
pub use operation::{BoxedOperation, FnOperation, Operation, Spawner, StepStatus};
pub use resource_pool::{Lease, LeaseHandle, PoolStats, Poolable, PruneStep, ResourcePool};
pub use scheduler::{RecurringRegistration, RunOutcome, Scheduler};
