//! Builders constructing controllers from bootstrap configuration.

pub mod controller_builder;

pub use controller_builder::ControllerBuilder;
