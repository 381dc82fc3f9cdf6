use clap::{Parser, ValueEnum};
use log::{debug, error, info};
use std::{path::PathBuf, process::ExitCode};

use jobsched_model::{
    Job, Policy, PolicyConfig, Report, Scheduler, Sim,
    core::Slot,
    scheduler::{DEFAULT_AGING_INCREMENT, DEFAULT_AGING_THRESHOLD, DEFAULT_QUANTUM},
    sim::{BernoulliWorkload, workload},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Algorithm {
    Fcfs,
    Sjf,
    Rr,
    Priority,
    /// Run every policy on the same workload
    All,
}

/// Simulate CPU job scheduling and report per-job timing metrics
#[derive(Parser, Debug)]
#[command(name = "jobsched")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Job list (id,arrival,burst,priority); a synthetic workload is generated when omitted
    #[arg(short = 'j', long = "jobs")]
    jobs: Option<PathBuf>,

    /// Scheduling policy
    #[arg(short = 'p', long = "policy", value_enum, default_value = "fcfs")]
    policy: Algorithm,

    /// Round robin time quantum
    #[arg(short = 'q', long = "quantum", default_value_t = DEFAULT_QUANTUM)]
    quantum: u64,

    /// Ticks a job may wait before its priority starts aging
    #[arg(long = "aging-threshold", default_value_t = DEFAULT_AGING_THRESHOLD)]
    aging_threshold: u64,

    /// Priority improvement applied per aging step
    #[arg(long = "aging-increment", default_value_t = DEFAULT_AGING_INCREMENT)]
    aging_increment: u32,

    /// Seed for the synthetic workload
    #[arg(long = "seed", default_value_t = 0)]
    seed: u64,

    /// Ticks over which synthetic jobs arrive
    #[arg(long = "ticks", default_value_t = 50)]
    ticks: u64,

    /// Per-tick arrival probability for synthetic jobs
    #[arg(long = "arrival-prob", default_value_t = 0.3)]
    arrival_prob: f64,

    /// Probability that a synthetic job is short
    #[arg(long = "short-prob", default_value_t = 0.3)]
    short_prob: f64,

    /// Burst time of short synthetic jobs
    #[arg(long = "short-burst", default_value_t = 2)]
    short_burst: u64,

    /// Burst time of long synthetic jobs
    #[arg(long = "long-burst", default_value_t = 6)]
    long_burst: u64,

    /// Largest priority value given to synthetic jobs
    #[arg(long = "max-priority", default_value_t = 5)]
    max_priority: u32,

    /// Write the job list to this file before simulating
    #[arg(long = "save")]
    save: Option<PathBuf>,

    /// Print the per-tick execution trace
    #[arg(long = "timeline")]
    timeline: bool,

    /// Print reports as JSON
    #[arg(long = "json")]
    json: bool,
}

impl Cli {
    fn policy_configs(&self) -> Vec<PolicyConfig> {
        let rr = PolicyConfig::RoundRobin {
            quantum: self.quantum,
        };
        let priority = PolicyConfig::Priority {
            aging_threshold: self.aging_threshold,
            aging_increment: self.aging_increment,
        };
        match self.policy {
            Algorithm::Fcfs => vec![PolicyConfig::Fcfs],
            Algorithm::Sjf => vec![PolicyConfig::Sjf],
            Algorithm::Rr => vec![rr],
            Algorithm::Priority => vec![priority],
            Algorithm::All => vec![PolicyConfig::Fcfs, PolicyConfig::Sjf, rr, priority],
        }
    }

    fn load_jobs(&self) -> jobsched_model::Result<Vec<Job>> {
        match &self.jobs {
            Some(path) => {
                let jobs = workload::load_csv(path)?;
                info!("Loaded {} jobs from {}", jobs.len(), path.display());
                Ok(jobs)
            }
            None => {
                let workload = BernoulliWorkload {
                    ticks: self.ticks,
                    p_arrival: self.arrival_prob,
                    p_short: self.short_prob,
                    short_ticks: self.short_burst,
                    long_ticks: self.long_burst,
                    max_priority: self.max_priority,
                };
                let jobs = workload.generate(self.seed)?;
                info!("Generated {} jobs (seed {})", jobs.len(), self.seed);
                Ok(jobs)
            }
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> jobsched_model::Result<()> {
    let jobs = cli.load_jobs()?;
    if let Some(path) = &cli.save {
        workload::write_csv(path, &jobs)?;
        info!("Saved {} jobs to {}", jobs.len(), path.display());
    }

    let mut reports = Vec::new();
    for config in cli.policy_configs() {
        let policy = Policy::from_config(config)?;
        info!("Running {}...", policy.name());
        let mut sim = Sim::new(jobs.clone(), policy)?;

        while !sim.all_jobs_completed() {
            let now = sim.core.now();
            for event in sim.step() {
                debug!("t={now} {event:?}");
            }
        }

        if cli.timeline && !cli.json {
            print_timeline(&sim);
        }
        reports.push(sim.report());
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        reports.iter().for_each(|report: &Report| println!("{report}"));
    }
    Ok(())
}

fn print_timeline<S: Scheduler>(sim: &Sim<S>) {
    println!("Execution trace:");
    for entry in sim.timeline() {
        match entry.slot {
            Slot::Job(id) => println!("JobID: {id} at Time: {}", entry.time),
            Slot::Idle => println!("Idle at Time: {}", entry.time),
        }
    }
    println!();
}
