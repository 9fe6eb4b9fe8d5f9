//! # Doorwarden
//!
//! A door automation controller for simulation hosts that invoke it once per
//! tick under a hard per-tick compute budget.
//!
//! The controller discovers door devices in a host inventory, applies
//! configuration written as `scope:option[:param]*` lines, and keeps every
//! managed door under an auto-close and lockdown policy. All work is split
//! into resumable operations that a cooperative [`core::Scheduler`] steps
//! until the tick's [`core::Budget`] runs out; the next tick resumes where the
//! previous one stopped.
//!
//! ## Pieces
//!
//! - **Scheduler**: FIFO of pending operations plus recurring registrations
//!   re-instantiated by factories on an interval.
//! - **Resource pool**: leases recycled discovery and door-management
//!   operation state instead of rebuilding it on every trigger.
//! - **Configuration pipeline**: handlers claim their own options out of a
//!   shared text blob; bad lines are logged and skipped.
//! - **Discovery**: walks the inventory one device per step, offering each to
//!   the collection handlers.
//! - **Door policy**: one managed door per step, closing doors left open past
//!   their interval and forcing everything shut under lockdown.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use doorwarden::builders::ControllerBuilder;
//! use doorwarden::config::ControllerConfig;
//! use doorwarden::infra::{InMemoryInventory, SimDoor};
//! use doorwarden::runtime::UpdateDirective;
//! use doorwarden::util::ManualClock;
//!
//! let inventory = InMemoryInventory::new();
//! inventory.add(Arc::new(SimDoor::new("Airlock")));
//!
//! let mut controller = ControllerBuilder::new(ControllerConfig::default())
//!     .inventory(inventory)
//!     .clock(ManualClock::new(0))
//!     .build()?;
//!
//! assert_eq!(controller.main(""), UpdateDirective::EveryTick);
//! assert_eq!(controller.doors().len(), 1);
//! # Ok::<(), doorwarden::core::ControllerError>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Scheduling abstractions, object pooling, errors, and the controller log.
pub mod core;
/// Bootstrap settings and the configuration-line pipeline.
pub mod config;
/// Builders constructing controllers from configuration.
pub mod builders;
/// Device discovery and collection handlers.
pub mod discovery;
/// Host collaborator interfaces and in-memory adapters.
pub mod infra;
/// Door settings, lockdown, and the policy engine.
pub mod policy;
/// Commands, shared context, and the controller entry point.
pub mod runtime;
/// Clocks and tracing setup.
pub mod util;
