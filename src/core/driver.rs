use log::{debug, trace};

use super::{
    event::SimEvent,
    observer::Observer,
    state::{Slot, Ticks, TimelineEntry},
};
use crate::{
    scheduler::Scheduler,
    sim::{JobId, JobInstance},
};

/// Single-CPU tick driver: owns the clock, the active policy and the
/// timeline.
pub struct SchedCore<S: Scheduler> {
    pub scheduler: S,
    now: Ticks,
    // Job that ran during the previous tick
    current: Option<JobId>,
    timeline: Vec<TimelineEntry>,
    context_switches: u64,
    observer: Observer,
}

impl<S: Scheduler> SchedCore<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            now: 0,
            current: None,
            timeline: Vec::new(),
            context_switches: 0,
            observer: Observer::new(),
        }
    }

    pub fn admit(&mut self, job: JobInstance) -> SimEvent {
        debug!("t={} admit job {} ({})", self.now, job.id(), job.job.name);
        let event = SimEvent::JobAdmitted { job: job.id() };
        self.scheduler.admit(job);
        event
    }

    /// Runs one tick. Returns the job if it completed during this tick.
    pub fn tick(&mut self, events: &mut Vec<SimEvent>) -> Option<JobInstance> {
        self.scheduler.reorder(self.now);

        let selected = if self.scheduler.has_runnable() {
            self.scheduler.select_next()
        } else {
            None
        };

        let Some(mut job) = selected else {
            self.set_current(None, events);
            events.push(SimEvent::CpuIdle);
            self.timeline.push(TimelineEntry {
                slot: Slot::Idle,
                time: self.now,
            });
            self.advance_time(1);
            self.observer.observe(self.now, &self.timeline, None);
            return None;
        };

        if self.current != Some(job.id()) {
            job.consumed_timeslice = 0;
            self.set_current(Some(job.id()), events);
        }

        if job.start_time.is_none() {
            job.start_time = Some(self.now);
        }

        // Execute for exactly one tick
        debug_assert!(job.remaining_time > 0, "Job {} selected with no work left", job.id());
        job.remaining_time -= 1;
        job.consumed_timeslice = job.consumed_timeslice.saturating_add(1);
        self.timeline.push(TimelineEntry {
            slot: Slot::Job(job.id()),
            time: self.now,
        });
        trace!(
            "t={} run job {} (remaining {})",
            self.now,
            job.id(),
            job.remaining_time
        );
        self.advance_time(1);

        if job.is_finished() {
            job.completion_time = Some(self.now);
            job.calculate_metrics();
            debug!("t={} job {} completed", self.now, job.id());
            events.push(SimEvent::JobCompleted {
                job: job.id(),
                completion_time: self.now,
            });
            self.observer.observe(self.now, &self.timeline, Some(&job));
            return Some(job);
        }

        self.scheduler.admit(job);
        self.observer.observe(self.now, &self.timeline, None);
        None
    }

    fn set_current(&mut self, to: Option<JobId>, events: &mut Vec<SimEvent>) {
        let from = self.current;
        if from == to {
            return;
        }
        if from.is_some() && to.is_some() {
            self.context_switches += 1;
            debug!("t={} context switch {from:?} -> {to:?}", self.now);
        }
        self.current = to;
        events.push(SimEvent::CpuCurrentChange { from, to });
    }

    fn advance_time(&mut self, delta: Ticks) {
        self.now = self.now.saturating_add(delta);
    }

    /// Clears the clock, timeline and policy state for a fresh run.
    pub fn reset(&mut self) {
        self.now = 0;
        self.current = None;
        self.timeline.clear();
        self.context_switches = 0;
        self.observer = Observer::new();
        self.scheduler.replace_all(Vec::new());
    }

    pub fn now(&self) -> Ticks {
        self.now
    }

    pub fn timeline(&self) -> &[TimelineEntry] {
        &self.timeline
    }

    pub fn context_switches(&self) -> u64 {
        self.context_switches
    }

    pub fn observer(&self) -> &Observer {
        &self.observer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        scheduler::{Fcfs, RoundRobin},
        sim::Job,
    };

    fn instance(id: u64, burst: u64) -> JobInstance {
        JobInstance::new(Job::new(id, 0, burst, 0).unwrap(), id as usize)
    }

    #[test]
    fn test_idle_tick() {
        let mut core = SchedCore::new(Fcfs::new());
        let mut events = Vec::new();
        assert!(core.tick(&mut events).is_none());
        assert_eq!(events, vec![SimEvent::CpuIdle]);
        assert_eq!(core.now(), 1);
        assert_eq!(
            core.timeline(),
            &[TimelineEntry {
                slot: Slot::Idle,
                time: 0
            }]
        );
    }

    #[test]
    fn test_job_runs_to_completion() {
        let mut core = SchedCore::new(Fcfs::new());
        let mut events = Vec::new();
        core.admit(instance(4, 2));

        assert!(core.tick(&mut events).is_none());
        let done = core.tick(&mut events).unwrap();
        assert_eq!(done.start_time, Some(0));
        assert_eq!(done.completion_time, Some(2));
        assert_eq!(done.turnaround_time, Some(2));
        assert_eq!(done.waiting_time, Some(0));
        assert_eq!(
            events,
            vec![
                SimEvent::CpuCurrentChange {
                    from: None,
                    to: Some(4)
                },
                SimEvent::JobCompleted {
                    job: 4,
                    completion_time: 2
                },
            ]
        );
        assert!(!core.scheduler.has_runnable());
        assert_eq!(core.observer().steps(), 2);
    }

    #[test]
    fn test_context_switches_counted() {
        let mut core = SchedCore::new(RoundRobin::new(1).unwrap());
        let mut events = Vec::new();
        core.admit(instance(0, 2));
        core.admit(instance(1, 2));
        while core.scheduler.has_runnable() {
            core.tick(&mut events);
        }
        assert_eq!(core.now(), 4);
        assert_eq!(core.context_switches(), 3);

        core.reset();
        assert_eq!(core.now(), 0);
        assert!(core.timeline().is_empty());
        assert_eq!(core.context_switches(), 0);
    }
}
