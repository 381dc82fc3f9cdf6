pub mod fcfs;
pub mod priority;
pub mod round_robin;
pub mod sjf;

use serde::Serialize;

use crate::{
    core::Ticks,
    error::{Error, Result},
    sim::JobInstance,
};
pub use fcfs::Fcfs;
pub use priority::PriorityAging;
pub use round_robin::RoundRobin;
pub use sjf::Sjf;

pub const DEFAULT_QUANTUM: Ticks = 2;
pub const DEFAULT_AGING_THRESHOLD: Ticks = 5;
pub const DEFAULT_AGING_INCREMENT: u32 = 1;

/// A scheduling policy. The simulation hands it jobs by value, asks it for
/// one job per tick and hands the job back if it is still unfinished.
pub trait Scheduler {
    fn name(&self) -> &'static str;

    /// Add a newly arrived (or just-executed, unfinished) job to the pool.
    fn admit(&mut self, job: JobInstance);

    /// Remove and return the job that runs for the next tick.
    fn select_next(&mut self) -> Option<JobInstance>;

    fn has_runnable(&self) -> bool;

    /// Recompute time-dependent ordering state before selection.
    fn reorder(&mut self, _now: Ticks) {}

    /// Discard all queued state and start over from `jobs`.
    fn replace_all(&mut self, jobs: Vec<JobInstance>);
}

/// Which policy to run, with its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum PolicyConfig {
    Fcfs,
    Sjf,
    RoundRobin {
        quantum: Ticks,
    },
    Priority {
        aging_threshold: Ticks,
        aging_increment: u32,
    },
}

impl PolicyConfig {
    pub fn round_robin() -> Self {
        Self::RoundRobin {
            quantum: DEFAULT_QUANTUM,
        }
    }

    pub fn priority() -> Self {
        Self::Priority {
            aging_threshold: DEFAULT_AGING_THRESHOLD,
            aging_increment: DEFAULT_AGING_INCREMENT,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::RoundRobin { quantum: 0 } => Err(Error::InvalidQuantum(0)),
            _ => Ok(()),
        }
    }
}

/// Runtime-selected policy.
#[derive(Debug)]
pub enum Policy {
    Fcfs(Fcfs),
    Sjf(Sjf),
    RoundRobin(RoundRobin),
    Priority(PriorityAging),
}

impl Policy {
    pub fn from_config(config: PolicyConfig) -> Result<Self> {
        config.validate()?;
        let policy = match config {
            PolicyConfig::Fcfs => Self::Fcfs(Fcfs::new()),
            PolicyConfig::Sjf => Self::Sjf(Sjf::new()),
            PolicyConfig::RoundRobin { quantum } => Self::RoundRobin(RoundRobin::new(quantum)?),
            PolicyConfig::Priority {
                aging_threshold,
                aging_increment,
            } => Self::Priority(PriorityAging::new(aging_threshold, aging_increment)),
        };
        Ok(policy)
    }

    fn inner(&self) -> &dyn Scheduler {
        match self {
            Self::Fcfs(s) => s,
            Self::Sjf(s) => s,
            Self::RoundRobin(s) => s,
            Self::Priority(s) => s,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Scheduler {
        match self {
            Self::Fcfs(s) => s,
            Self::Sjf(s) => s,
            Self::RoundRobin(s) => s,
            Self::Priority(s) => s,
        }
    }
}

impl Scheduler for Policy {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn admit(&mut self, job: JobInstance) {
        self.inner_mut().admit(job);
    }

    fn select_next(&mut self) -> Option<JobInstance> {
        self.inner_mut().select_next()
    }

    fn has_runnable(&self) -> bool {
        self.inner().has_runnable()
    }

    fn reorder(&mut self, now: Ticks) {
        self.inner_mut().reorder(now);
    }

    fn replace_all(&mut self, jobs: Vec<JobInstance>) {
        self.inner_mut().replace_all(jobs);
    }
}
