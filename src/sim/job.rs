use serde::Serialize;

use crate::{
    core::state::Ticks,
    error::{Error, Result},
};

pub type JobId = u64;

/// Immutable description of one schedulable unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Job {
    pub id: JobId,
    pub name: String,
    pub arrival_time: Ticks,
    pub burst_time: Ticks,
    /// Lower value means higher priority.
    pub priority: u32,
}

impl Job {
    pub fn new(id: JobId, arrival_time: Ticks, burst_time: Ticks, priority: u32) -> Result<Self> {
        Self::named(id, format!("Job{id}"), arrival_time, burst_time, priority)
    }

    pub fn named(
        id: JobId,
        name: impl Into<String>,
        arrival_time: Ticks,
        burst_time: Ticks,
        priority: u32,
    ) -> Result<Self> {
        let job = Self {
            id,
            name: name.into(),
            arrival_time,
            burst_time,
            priority,
        };
        job.validate()?;
        Ok(job)
    }

    pub fn validate(&self) -> Result<()> {
        if self.burst_time == 0 {
            return Err(Error::InvalidBurst {
                id: self.id,
                burst: self.burst_time,
            });
        }
        // Names are stored unquoted in the flat job list
        if self.name.contains([',', '\n', '\r']) {
            return Err(Error::InvalidName {
                id: self.id,
                name: self.name.clone(),
            });
        }
        Ok(())
    }
}

/// Per-run mutable state of a job. Moves by value between the simulation
/// and the active scheduler; never shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobInstance {
    pub job: Job,
    // Position in the input list, the last-resort tie-break
    pub order: usize,
    /// Effective priority, lowered by aging.
    pub priority: u32,
    pub remaining_time: Ticks,
    /// Consecutive ticks run since the job last got the CPU.
    pub consumed_timeslice: Ticks,
    pub start_time: Option<Ticks>,
    pub completion_time: Option<Ticks>,
    pub turnaround_time: Option<Ticks>,
    pub waiting_time: Option<Ticks>,
}

impl JobInstance {
    pub fn new(job: Job, order: usize) -> Self {
        Self {
            priority: job.priority,
            remaining_time: job.burst_time,
            consumed_timeslice: 0,
            start_time: None,
            completion_time: None,
            turnaround_time: None,
            waiting_time: None,
            order,
            job,
        }
    }

    pub fn id(&self) -> JobId {
        self.job.id
    }

    pub fn is_finished(&self) -> bool {
        self.remaining_time == 0
    }

    pub fn has_started(&self) -> bool {
        self.start_time.is_some()
    }

    /// Derives turnaround and waiting time from the completion time.
    /// Does nothing until the job has completed.
    pub fn calculate_metrics(&mut self) {
        let Some(completion) = self.completion_time else {
            return;
        };
        let turnaround = completion - self.job.arrival_time;
        debug_assert!(
            turnaround >= self.job.burst_time,
            "Job {} finished faster than its burst time",
            self.job.id
        );
        self.turnaround_time = Some(turnaround);
        self.waiting_time = Some(turnaround.saturating_sub(self.job.burst_time));
    }

    pub fn response_time(&self) -> Option<Ticks> {
        self.start_time.map(|start| start - self.job.arrival_time)
    }
}
