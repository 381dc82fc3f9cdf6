use super::{JobInstance, Scheduler};
use crate::core::RunQueue;

/// Strict arrival-order queue. A started job goes back to the head, so it
/// keeps the CPU until it finishes.
#[derive(Debug)]
pub struct Fcfs {
    queue: RunQueue,
}

impl Fcfs {
    pub fn new() -> Self {
        Self {
            queue: RunQueue::new_fifo(),
        }
    }
}

impl Default for Fcfs {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for Fcfs {
    fn name(&self) -> &'static str {
        "First Come First Serve (FCFS)"
    }

    fn admit(&mut self, job: JobInstance) {
        if job.has_started() {
            self.queue.push_front(job);
        } else {
            self.queue.push_back(job);
        }
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
    fn test_fcfs() {
        let mut scheduler = Fcfs::new();
        assert!(!scheduler.has_runnable());
        scheduler.admit(instance(0, 0, 3));
        scheduler.admit(instance(1, 1, 3));

        let mut running = scheduler.select_next().unwrap();
        assert_eq!(running.id(), 0);
        running.start_time = Some(0);
        running.remaining_time -= 1;

        // a later arrival queued while job 0 ran does not overtake it
        scheduler.admit(instance(2, 1, 1));
        scheduler.admit(running);
        assert_eq!(scheduler.select_next().map(|j| j.id()), Some(0));
        assert_eq!(scheduler.select_next().map(|j| j.id()), Some(1));
        assert_eq!(scheduler.select_next().map(|j| j.id()), Some(2));
        assert_eq!(scheduler.select_next(), None);
    }

    #[test]
    fn test_replace_all_discards_queue() {
        let mut scheduler = Fcfs::new();
        scheduler.admit(instance(0, 0, 3));
        scheduler.replace_all(vec![instance(5, 0, 1), instance(6, 0, 1)]);
        assert_eq!(scheduler.select_next().map(|j| j.id()), Some(5));
        assert_eq!(scheduler.select_next().map(|j| j.id()), Some(6));
        assert!(!scheduler.has_runnable());
        scheduler.replace_all(Vec::new());
        assert!(!scheduler.has_runnable());
    }

    #[test]
    fn test_replace_all_keeps_given_order_for_started_jobs() {
        let mut scheduler = Fcfs::new();
        let mut first = instance(1, 0, 3);
        first.start_time = Some(0);
        let mut second = instance(2, 1, 3);
        second.start_time = Some(1);

        scheduler.replace_all(vec![first, second]);
        assert_eq!(scheduler.select_next().map(|j| j.id()), Some(1));
        assert_eq!(scheduler.select_next().map(|j| j.id()), Some(2));
    }
}
