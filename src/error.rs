use std::path::PathBuf;

use crate::{core::Ticks, sim::JobId};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("job {id} has burst time {burst}; burst time must be positive")]
    InvalidBurst { id: JobId, burst: Ticks },

    #[error("job {id} name {name:?} contains a comma or line break")]
    InvalidName { id: JobId, name: String },

    #[error("job id {0} appears more than once in the job list")]
    DuplicateJobId(JobId),

    #[error("round robin quantum must be positive, got {0}")]
    InvalidQuantum(Ticks),

    #[error("failed to access workload file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("workload line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}
