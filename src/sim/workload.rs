//! Flat tabular job lists and synthetic workloads.
//!
//! Accepted row layouts (the first line is a header and is skipped):
//!
//! - `id,arrival,burst,priority`
//! - `name,arrival,burst,priority`, named rows get sequential ids from 1
//! - `id,name,arrival,burst,priority`, the layout [`write_csv`] produces

use rand::prelude::*;
use std::{fmt::Write as _, fs, path::Path};

use super::job::{Job, JobId};
use crate::{
    core::Ticks,
    error::{Error, Result},
};

pub const CSV_HEADER: &str = "id,name,arrival,burst,priority";

pub fn load_csv(path: impl AsRef<Path>) -> Result<Vec<Job>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_csv(&text)
}

pub fn parse_csv(text: &str) -> Result<Vec<Job>> {
    let mut jobs = Vec::new();
    let mut next_named_id: JobId = 1;

    for (index, raw) in text.lines().enumerate().skip(1) {
        let line = index + 1;
        let row = raw.trim();
        if row.is_empty() {
            continue;
        }
        let fields: Vec<&str> = row.split(',').map(str::trim).collect();

        let job = match fields.as_slice() {
            [id, name, arrival, burst, priority] => Job::named(
                parse_field(line, "id", id)?,
                *name,
                parse_field(line, "arrival", arrival)?,
                parse_field(line, "burst", burst)?,
                parse_field(line, "priority", priority)?,
            ),
            [first, arrival, burst, priority] => {
                let arrival = parse_field(line, "arrival", arrival)?;
                let burst = parse_field(line, "burst", burst)?;
                let priority = parse_field(line, "priority", priority)?;
                match first.parse::<JobId>() {
                    Ok(id) => Job::new(id, arrival, burst, priority),
                    Err(_) => {
                        let id = next_named_id;
                        next_named_id += 1;
                        Job::named(id, *first, arrival, burst, priority)
                    }
                }
            }
            _ => {
                return Err(Error::Parse {
                    line,
                    message: format!("expected 4 or 5 columns, found {}", fields.len()),
                });
            }
        };

        jobs.push(job.map_err(|err| Error::Parse {
            line,
            message: err.to_string(),
        })?);
    }

    Ok(jobs)
}

fn parse_field<T: TryFrom<i64>>(line: usize, column: &str, raw: &str) -> Result<T> {
    let value: i64 = raw.parse().map_err(|_| Error::Parse {
        line,
        message: format!("{column} `{raw}` is not an integer"),
    })?;
    if value < 0 {
        return Err(Error::Parse {
            line,
            message: format!("{column} must not be negative, got {value}"),
        });
    }
    T::try_from(value).map_err(|_| Error::Parse {
        line,
        message: format!("{column} {value} is out of range"),
    })
}

pub fn to_csv(jobs: &[Job]) -> Result<String> {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for job in jobs {
        job.validate()?;
        let _ = writeln!(
            out,
            "{},{},{},{},{}",
            job.id, job.name, job.arrival_time, job.burst_time, job.priority
        );
    }
    Ok(out)
}

pub fn write_csv(path: impl AsRef<Path>, jobs: &[Job]) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, to_csv(jobs)?).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Shape of a synthetic workload: each tick a job arrives with
/// probability `p_arrival`, and is short with probability `p_short`.
#[derive(Debug, Clone, Copy)]
pub struct BernoulliWorkload {
    pub ticks: Ticks,
    pub p_arrival: f64,
    pub p_short: f64,
    pub short_ticks: Ticks,
    pub long_ticks: Ticks,
    pub max_priority: u32,
}

impl Default for BernoulliWorkload {
    fn default() -> Self {
        Self {
            ticks: 50,
            p_arrival: 0.3,
            p_short: 0.3,
            short_ticks: 2,
            long_ticks: 6,
            max_priority: 5,
        }
    }
}

impl BernoulliWorkload {
    pub fn generate(&self, seed: u64) -> Result<Vec<Job>> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut jobs = Vec::new();

        for t in 0..self.ticks {
            if rng.random::<f64>() < self.p_arrival {
                let burst = if rng.random::<f64>() < self.p_short {
                    self.short_ticks
                } else {
                    self.long_ticks
                };
                let priority = rng.random_range(0..=self.max_priority);
                let id = jobs.len() as JobId + 1;
                jobs.push(Job::new(id, t, burst, priority)?);
            }
        }

        Ok(jobs)
    }
}
