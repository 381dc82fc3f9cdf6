use log::trace;

use super::{JobInstance, Scheduler};
use crate::{
    core::{RankBy, RunQueue, Ticks},
    sim::JobId,
};

/// Preemptive priority scheduling (lower value wins) with aging: every
/// `reorder` call lowers the priority of each job that has been in the
/// system longer than the threshold, floored at 0.
#[derive(Debug)]
pub struct PriorityAging {
    queue: RunQueue,
    aging_threshold: Ticks,
    aging_increment: u32,
}

impl PriorityAging {
    pub fn new(aging_threshold: Ticks, aging_increment: u32) -> Self {
        Self {
            queue: RunQueue::new_ranked(RankBy::Priority),
            aging_threshold,
            aging_increment,
        }
    }

    /// Current priority of a queued job, after any aging so far.
    pub fn effective_priority(&self, id: JobId) -> Option<u32> {
        self.queue.get(id).map(|job| job.priority)
    }

    fn apply_aging(&mut self, now: Ticks) {
        let threshold = self.aging_threshold;
        let increment = self.aging_increment;
        self.queue.update_each(|job| {
            if now.saturating_sub(job.job.arrival_time) > threshold {
                let aged = job.priority.saturating_sub(increment);
                if aged != job.priority {
                    trace!("t={now} job {} aged {} -> {aged}", job.id(), job.priority);
                }
                job.priority = aged;
            }
        });
    }
}

impl Scheduler for PriorityAging {
    fn name(&self) -> &'static str {
        "Priority Scheduling with Aging"
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

    fn reorder(&mut self, now: Ticks) {
        self.apply_aging(now);
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

    fn instance(id: u64, arrival: u64, priority: u32) -> JobInstance {
        JobInstance::new(Job::new(id, arrival, 4, priority).unwrap(), id as usize)
    }

    #[test]
    fn test_lowest_value_first() {
        let mut scheduler = PriorityAging::new(5, 1);
        scheduler.admit(instance(0, 0, 3));
        scheduler.admit(instance(1, 0, 1));
        scheduler.admit(instance(2, 0, 1));
        scheduler.reorder(0);
        assert_eq!(scheduler.select_next().map(|j| j.id()), Some(1));
        assert_eq!(scheduler.select_next().map(|j| j.id()), Some(2));
        assert_eq!(scheduler.select_next().map(|j| j.id()), Some(0));
    }

    #[test]
    fn test_aging_is_cumulative_and_floored() {
        let mut scheduler = PriorityAging::new(2, 2);
        scheduler.admit(instance(0, 0, 5));
        scheduler.admit(instance(1, 2, 3));

        // 2 - 0 is not beyond the threshold yet
        scheduler.reorder(2);
        assert_eq!(scheduler.queue.get(0).map(|j| j.priority), Some(5));

        scheduler.reorder(3);
        assert_eq!(scheduler.queue.get(0).map(|j| j.priority), Some(3));
        assert_eq!(scheduler.queue.get(1).map(|j| j.priority), Some(3));

        scheduler.reorder(4);
        assert_eq!(scheduler.queue.get(0).map(|j| j.priority), Some(1));
        for now in 5..10 {
            scheduler.reorder(now);
        }
        assert_eq!(scheduler.queue.get(0).map(|j| j.priority), Some(0));
        assert_eq!(scheduler.queue.get(1).map(|j| j.priority), Some(0));
        // equal priority: earlier arrival wins
        assert_eq!(scheduler.select_next().map(|j| j.id()), Some(0));
    }

    #[test]
    fn test_aging_lets_starved_job_through() {
        let mut scheduler = PriorityAging::new(1, 1);
        scheduler.admit(instance(0, 0, 4));
        scheduler.admit(instance(1, 0, 2));
        scheduler.reorder(2);
        scheduler.reorder(3);
        // job 0: 4 -> 2, job 1: 2 -> 0
        assert_eq!(scheduler.select_next().map(|j| j.id()), Some(1));
        scheduler.reorder(4);
        scheduler.reorder(5);
        assert_eq!(scheduler.queue.get(0).map(|j| j.priority), Some(0));
    }
}
