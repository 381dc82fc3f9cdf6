use super::{JobInstance, Scheduler};
use crate::{
    core::{RunQueue, Ticks},
    error::{Error, Result},
};

/// FIFO queue with a time quantum. A job keeps the head of the queue while
/// its consecutive run count is below the quantum, then goes to the tail.
#[derive(Debug)]
pub struct RoundRobin {
    queue: RunQueue,
    quantum: Ticks,
}

impl RoundRobin {
    pub fn new(quantum: Ticks) -> Result<Self> {
        if quantum == 0 {
            return Err(Error::InvalidQuantum(quantum));
        }
        Ok(Self {
            queue: RunQueue::new_fifo(),
            quantum,
        })
    }
}

impl Scheduler for RoundRobin {
    fn name(&self) -> &'static str {
        "Round Robin (RR)"
    }

    fn admit(&mut self, mut job: JobInstance) {
        if job.consumed_timeslice > 0 && job.consumed_timeslice < self.quantum {
            self.queue.push_front(job);
        } else {
            job.consumed_timeslice = 0;
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
        for mut job in jobs {
            job.consumed_timeslice = 0;
            self.queue.push_back(job);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Job;

    fn instance(id: u64, burst: u64) -> JobInstance {
        JobInstance::new(Job::new(id, 0, burst, 0).unwrap(), id as usize)
    }

    // Mimics one executed tick as the core driver does it
    fn run_one(scheduler: &mut RoundRobin) -> u64 {
        let mut job = scheduler.select_next().unwrap();
        job.remaining_time -= 1;
        job.consumed_timeslice += 1;
        let id = job.id();
        if !job.is_finished() {
            scheduler.admit(job);
        }
        id
    }

    #[test]
    fn test_round_robin_quantum() {
        let mut scheduler = RoundRobin::new(2).unwrap();
        scheduler.admit(instance(0, 3));
        scheduler.admit(instance(1, 3));

        let order: Vec<u64> = (0..6).map(|_| run_one(&mut scheduler)).collect();
        assert_eq!(order, vec![0, 0, 1, 1, 0, 1]);
        assert!(!scheduler.has_runnable());
    }

    #[test]
    fn test_quantum_one_alternates() {
        let mut scheduler = RoundRobin::new(1).unwrap();
        scheduler.admit(instance(0, 2));
        scheduler.admit(instance(1, 2));
        scheduler.admit(instance(2, 1));

        let order: Vec<u64> = (0..5).map(|_| run_one(&mut scheduler)).collect();
        assert_eq!(order, vec![0, 1, 2, 0, 1]);
    }

    #[test]
    fn test_zero_quantum_rejected() {
        assert!(matches!(
            RoundRobin::new(0),
            Err(Error::InvalidQuantum(0))
        ));
    }
}
