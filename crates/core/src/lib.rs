pub mod config;
pub mod error;

pub use config::{Config, PriorityPolicy, SchedulerConfig};
pub use error::*;
