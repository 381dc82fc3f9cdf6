pub mod core;
pub mod error;
pub mod report;
pub mod scheduler;
pub mod sim;

pub use crate::core::SimEvent;
pub use error::{Error, Result};
pub use report::Report;
pub use scheduler::{Policy, PolicyConfig, Scheduler};
pub use sim::{Job, JobInstance, Sim};
