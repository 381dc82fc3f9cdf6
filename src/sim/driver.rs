use log::info;
use rustc_hash::FxHashSet;

use super::job::{Job, JobInstance};
use crate::{
    core::{SchedCore, SimEvent, TimelineEntry},
    error::{Error, Result},
    report::Report,
    scheduler::Scheduler,
};

pub struct Sim<S: Scheduler> {
    pub core: SchedCore<S>,
    // Sorted by arrival time, ties in input order
    jobs: Vec<JobInstance>,
    job_cursor: usize,
    finished: Vec<JobInstance>,
}

impl<S: Scheduler> Sim<S> {
    pub fn new(jobs: Vec<Job>, scheduler: S) -> Result<Self> {
        let mut seen = FxHashSet::default();
        for job in &jobs {
            job.validate()?;
            if !seen.insert(job.id) {
                return Err(Error::DuplicateJobId(job.id));
            }
        }

        let mut jobs: Vec<JobInstance> = jobs
            .into_iter()
            .enumerate()
            .map(|(order, job)| JobInstance::new(job, order))
            .collect();
        jobs.sort_by_key(|job| (job.job.arrival_time, job.order));

        let mut core = SchedCore::new(scheduler);
        core.scheduler.replace_all(Vec::new());

        Ok(Self {
            core,
            jobs,
            job_cursor: 0,
            finished: Vec::new(),
        })
    }

    /// Advances the simulation by one tick.
    pub fn step(&mut self) -> Vec<SimEvent> {
        let mut events = Vec::new();
        self.handle_arrivals(&mut events);
        if let Some(job) = self.core.tick(&mut events) {
            self.finished.push(job);
        }
        events
    }

    fn handle_arrivals(&mut self, events: &mut Vec<SimEvent>) {
        let now = self.core.now();
        // Contiguous, since jobs are sorted
        while let Some(job) = self
            .jobs
            .get(self.job_cursor)
            .filter(|job| job.job.arrival_time <= now)
        {
            let job = job.clone();
            events.push(self.core.admit(job));
            self.job_cursor += 1;
        }
    }

    pub fn all_jobs_completed(&self) -> bool {
        self.job_cursor == self.jobs.len() && !self.core.scheduler.has_runnable()
    }

    /// Runs until every job has finished.
    pub fn run(&mut self) -> &mut Self {
        while !self.all_jobs_completed() {
            self.step();
        }
        self.core.observer().observe_finished(&self.finished);
        info!(
            "{}: {} jobs finished at t={}",
            self.core.scheduler.name(),
            self.finished.len(),
            self.core.now()
        );
        self
    }

    /// Restores the initial state so the same job set can run again.
    pub fn reset(&mut self) {
        self.core.reset();
        self.job_cursor = 0;
        self.finished.clear();
    }

    /// Finished jobs in completion order.
    pub fn finished(&self) -> &[JobInstance] {
        &self.finished
    }

    pub fn timeline(&self) -> &[TimelineEntry] {
        self.core.timeline()
    }

    pub fn report(&self) -> Report {
        Report::new(
            self.core.scheduler.name(),
            &self.finished,
            self.core.timeline(),
            self.core.context_switches(),
        )
    }
}
