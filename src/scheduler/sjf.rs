use super::{JobInstance, Scheduler};
use crate::core::{RankBy, RunQueue};

/// Preemptive shortest-remaining-time-first. Reselects every tick, ties go
/// to the earlier arrival.
#[derive(Debug)]
pub struct Sjf {
    queue: RunQueue,
}

impl Sjf {
    pub fn new() -> Self {
        Self {
            queue: RunQueue::new_ranked(RankBy::RemainingTime),
        }
    }
}

impl Default for Sjf {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for Sjf {
    fn name(&self) -> &'static str {
        "Shortest Job First (SJF)"
    }

    fn admit(&mut self, job: JobInstance) {
        self.queue.push_back(job);
    }

    fn select_next(&mut self) -> Option<JobInstance> {
        self.queue.pop()
    }

    fn has_runnable(&self) -> bool {
        !self.queue.is_empty()
    }

    fn replace_all(&mut self, jobs: Vec<JobInstance>) {
        self.queue.clear();
        jobs.into_iter().for_each(|job| self.queue.push_back(job));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Job;

    fn instance(id: u64, arrival: u64, burst: u64) -> JobInstance {
        JobInstance::new(Job::new(id, arrival, burst, 0).unwrap(), id as usize)
    }

    #[test]
    fn test_sjf() {
        let mut scheduler = Sjf::new();
        scheduler.admit(instance(0, 0, 5));
        scheduler.admit(instance(1, 0, 2));

        let mut running = scheduler.select_next().unwrap();
        assert_eq!(running.id(), 1);
        running.remaining_time -= 1;
        scheduler.admit(running);

        // shorter newcomer preempts at the next tick boundary
        scheduler.admit(instance(2, 1, 1));
        assert_eq!(scheduler.select_next().map(|j| j.id()), Some(1));
        assert_eq!(scheduler.select_next().map(|j| j.id()), Some(2));
        assert_eq!(scheduler.select_next().map(|j| j.id()), Some(0));
        assert!(!scheduler.has_runnable());
    }

    #[test]
    fn test_sjf_tie_goes_to_earlier_arrival() {
        let mut scheduler = Sjf::new();
        scheduler.admit(instance(0, 4, 1));
        let mut older = instance(1, 0, 5);
        older.remaining_time = 1;
        scheduler.admit(older);
        assert_eq!(scheduler.select_next().map(|j| j.id()), Some(1));
    }
}
