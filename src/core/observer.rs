use super::state::{Slot, Ticks, TimelineEntry};
use crate::sim::JobInstance;

/// Checks simulation invariants after every tick in debug builds.
#[derive(Debug, Default)]
pub struct Observer {
    step: u64,
    busy_ticks: Ticks,
}

impl Observer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, now: Ticks, timeline: &[TimelineEntry], completed: Option<&JobInstance>) {
        self.step += 1;

        debug_assert_eq!(
            timeline.len() as Ticks,
            now,
            "timeline must hold exactly one entry per elapsed tick"
        );
        if let Some(last) = timeline.last() {
            debug_assert_eq!(last.time + 1, now, "timeline entry recorded for the wrong tick");
            if let Slot::Job(_) = last.slot {
                self.busy_ticks += 1;
            }
        }

        if let Some(job) = completed {
            let id = job.id();
            debug_assert!(job.is_finished(), "Completed job {id} has remaining work");
            debug_assert_eq!(job.completion_time, Some(now), "Job {id} completion time mismatch");
            debug_assert_eq!(
                job.turnaround_time,
                Some(now - job.job.arrival_time),
                "Job {id} turnaround mismatch"
            );
            debug_assert_eq!(
                job.turnaround_time.zip(job.waiting_time).map(|(t, w)| t - w),
                Some(job.job.burst_time),
                "Job {id} waiting time mismatch"
            );
            debug_assert!(
                job.start_time.is_some_and(|start| start >= job.job.arrival_time),
                "Job {id} started before it arrived"
            );
        }
    }

    /// Once every job has finished, busy ticks must add up to the bursts.
    pub fn observe_finished(&self, finished: &[JobInstance]) {
        let bursts: Ticks = finished.iter().map(|job| job.job.burst_time).sum();
        debug_assert_eq!(
            self.busy_ticks, bursts,
            "busy ticks do not match the finished jobs' burst times"
        );
    }

    pub fn steps(&self) -> u64 {
        self.step
    }

    pub fn busy_ticks(&self) -> Ticks {
        self.busy_ticks
    }
}
