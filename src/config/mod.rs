//! Configuration: bootstrap settings and the line-oriented option pipeline.

pub mod controller;
pub mod line;
pub mod pipeline;
pub mod schedule;

pub use controller::ControllerConfig;
pub use line::{ConfigLine, COMMENT_PREFIX, FIELD_SEPARATOR};
pub use pipeline::{ConfigHandler, ConfigPipeline, LineClaim, ParseReport};
pub use schedule::{ScheduleHandler, ScheduleSettings};
