use keyed_priority_queue::KeyedPriorityQueue;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::collections::VecDeque;

use crate::sim::{JobId, JobInstance};

pub type Ticks = u64;

/// What occupied the CPU during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Idle,
    Job(JobId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimelineEntry {
    pub slot: Slot,
    pub time: Ticks,
}

/// Ordering key for ranked run queues. Smallest key wins, then earliest
/// arrival, then input position.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub struct Rank {
    pub key: u64,
    pub arrival: Ticks,
    pub order: usize,
}

// KeyedPriorityQueue is a max-heap, so the comparison is flipped
impl PartialOrd for Rank {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rank {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other
            .key
            .cmp(&self.key)
            .then_with(|| other.arrival.cmp(&self.arrival))
            .then_with(|| other.order.cmp(&self.order))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankBy {
    RemainingTime,
    Priority,
}

impl RankBy {
    pub fn rank(self, job: &JobInstance) -> Rank {
        let key = match self {
            Self::RemainingTime => job.remaining_time,
            Self::Priority => u64::from(job.priority),
        };
        Rank {
            key,
            arrival: job.job.arrival_time,
            order: job.order,
        }
    }
}

#[derive(Debug)]
pub enum RunQueue {
    Fifo {
        jobs: VecDeque<JobInstance>,
    },
    Ranked {
        by: RankBy,
        ranks: KeyedPriorityQueue<JobId, Rank>,
        jobs: FxHashMap<JobId, JobInstance>,
    },
}

impl RunQueue {
    pub fn new_fifo() -> Self {
        Self::Fifo {
            jobs: VecDeque::new(),
        }
    }

    pub fn new_ranked(by: RankBy) -> Self {
        Self::Ranked {
            by,
            ranks: KeyedPriorityQueue::new(),
            jobs: FxHashMap::default(),
        }
    }

    pub fn push_back(&mut self, job: JobInstance) {
        debug_assert!(
            !job.is_finished(),
            "Finished job {} must not re-enter a run queue",
            job.id()
        );
        debug_assert!(
            !self.contains(job.id()),
            "Job {} already present in run queue",
            job.id()
        );

        match self {
            Self::Fifo { jobs } => jobs.push_back(job),
            Self::Ranked { by, ranks, jobs } => {
                ranks.push(job.id(), by.rank(&job));
                jobs.insert(job.id(), job);
            }
        }
    }

    /// Ranked queues order by rank alone, so this only differs from
    /// `push_back` for FIFO queues.
    pub fn push_front(&mut self, job: JobInstance) {
        match self {
            Self::Fifo { jobs } => {
                debug_assert!(!job.is_finished());
                jobs.push_front(job);
            }
            Self::Ranked { .. } => self.push_back(job),
        }
    }

    pub fn pop(&mut self) -> Option<JobInstance> {
        match self {
            Self::Fifo { jobs } => jobs.pop_front(),
            Self::Ranked { ranks, jobs, .. } => {
                let (id, _) = ranks.pop()?;
                let job = jobs.remove(&id);
                debug_assert!(job.is_some(), "Ranked job {id} missing from job table");
                job
            }
        }
    }

    /// Applies `f` to every queued job, then recomputes ranks.
    pub fn update_each(&mut self, mut f: impl FnMut(&mut JobInstance)) {
        match self {
            Self::Fifo { jobs } => jobs.iter_mut().for_each(f),
            Self::Ranked { by, ranks, jobs } => {
                for (id, job) in jobs.iter_mut() {
                    f(job);
                    let updated = ranks.set_priority(id, by.rank(job));
                    debug_assert!(updated.is_ok(), "Job {id} missing from rank heap");
                }
            }
        }
    }

    pub fn get(&self, id: JobId) -> Option<&JobInstance> {
        match self {
            Self::Fifo { jobs } => jobs.iter().find(|job| job.id() == id),
            Self::Ranked { jobs, .. } => jobs.get(&id),
        }
    }

    pub fn contains(&self, id: JobId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Fifo { jobs } => jobs.len(),
            Self::Ranked { jobs, .. } => jobs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        match self {
            Self::Fifo { jobs } => jobs.clear(),
            Self::Ranked { ranks, jobs, .. } => {
                ranks.clear();
                jobs.clear();
            }
        }
    }
}
