pub mod driver;
pub mod job;
pub mod workload;

pub use driver::Sim;
pub use job::{Job, JobId, JobInstance};
pub use workload::BernoulliWorkload;
