//! Turns a finished run into averages, a per-job table and a Gantt chart.

use average::{Estimate, Mean};
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::fmt;

use crate::{
    core::{Slot, Ticks, TimelineEntry},
    sim::{JobId, JobInstance},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobRow {
    pub id: JobId,
    pub name: String,
    pub arrival: Ticks,
    pub burst: Ticks,
    pub priority: u32,
    /// Priority after aging, equal to `priority` for policies without aging.
    pub final_priority: u32,
    pub start: Ticks,
    pub completion: Ticks,
    pub waiting: Ticks,
    pub turnaround: Ticks,
    pub response: Ticks,
}

/// A run of consecutive ticks spent on the same slot, `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GanttSegment {
    pub slot: Slot,
    pub start: Ticks,
    pub end: Ticks,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub policy: String,
    pub jobs: Vec<JobRow>,
    pub average_waiting: f64,
    pub average_turnaround: f64,
    pub average_response: f64,
    pub makespan: Ticks,
    pub busy_ticks: Ticks,
    pub utilization: f64,
    pub context_switches: u64,
    pub gantt: Vec<GanttSegment>,
}

impl Report {
    pub fn new(
        policy: &str,
        finished: &[JobInstance],
        timeline: &[TimelineEntry],
        context_switches: u64,
    ) -> Self {
        let jobs: Vec<JobRow> = finished.iter().filter_map(job_row).collect();

        let makespan = timeline.len() as Ticks;
        let busy_ticks = timeline
            .iter()
            .filter(|entry| matches!(entry.slot, Slot::Job(_)))
            .count() as Ticks;
        let utilization = if makespan == 0 {
            0.0
        } else {
            busy_ticks as f64 * 100.0 / makespan as f64
        };

        Self {
            policy: policy.to_string(),
            average_waiting: avg(jobs.iter().map(|j| j.waiting as f64)),
            average_turnaround: avg(jobs.iter().map(|j| j.turnaround as f64)),
            average_response: avg(jobs.iter().map(|j| j.response as f64)),
            jobs,
            makespan,
            busy_ticks,
            utilization,
            context_switches,
            gantt: gantt(timeline),
        }
    }
}

fn job_row(job: &JobInstance) -> Option<JobRow> {
    Some(JobRow {
        id: job.id(),
        name: job.job.name.clone(),
        arrival: job.job.arrival_time,
        burst: job.job.burst_time,
        priority: job.job.priority,
        final_priority: job.priority,
        start: job.start_time?,
        completion: job.completion_time?,
        waiting: job.waiting_time?,
        turnaround: job.turnaround_time?,
        response: job.response_time()?,
    })
}

// Arithmetic mean, 0 when there is nothing to average
fn avg(iter: impl Iterator<Item = f64>) -> f64 {
    let mut count = 0usize;
    let mean: Mean = iter.inspect(|_| count += 1).collect();
    if count == 0 { 0.0 } else { mean.estimate() }
}

/// Collapses consecutive timeline entries for the same slot into one segment.
pub fn gantt(timeline: &[TimelineEntry]) -> Vec<GanttSegment> {
    let mut segments: Vec<GanttSegment> = Vec::new();
    for entry in timeline {
        match segments.last_mut() {
            Some(last) if last.slot == entry.slot && last.end == entry.time => last.end += 1,
            _ => segments.push(GanttSegment {
                slot: entry.slot,
                start: entry.time,
                end: entry.time + 1,
            }),
        }
    }
    segments
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== {} ===", self.policy)?;
        writeln!(
            f,
            "{:<10} {:>4} {:>8} {:>6} {:>9} {:>6} {:>11} {:>8} {:>11}",
            "Name", "ID", "Arrival", "Burst", "Priority", "Start", "Completion", "Waiting", "Turnaround"
        )?;
        for job in &self.jobs {
            writeln!(
                f,
                "{:<10} {:>4} {:>8} {:>6} {:>9} {:>6} {:>11} {:>8} {:>11}",
                job.name,
                job.id,
                job.arrival,
                job.burst,
                job.priority,
                job.start,
                job.completion,
                job.waiting,
                job.turnaround
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Average Turnaround Time: {:.2}", self.average_turnaround)?;
        writeln!(f, "Average Waiting Time: {:.2}", self.average_waiting)?;
        writeln!(f, "Average Response Time: {:.2}", self.average_response)?;
        writeln!(
            f,
            "Makespan: {} | CPU utilization: {:.2}% | Context switches: {}",
            self.makespan, self.utilization, self.context_switches
        )?;

        if self.gantt.is_empty() {
            return Ok(());
        }

        let names: FxHashMap<JobId, &str> =
            self.jobs.iter().map(|j| (j.id, j.name.as_str())).collect();
        let labels: Vec<String> = self
            .gantt
            .iter()
            .map(|segment| match segment.slot {
                Slot::Idle => "idle".to_string(),
                Slot::Job(id) => names
                    .get(&id)
                    .map_or_else(|| id.to_string(), |name| name.to_string()),
            })
            .collect();

        writeln!(f, "\nGantt Chart:")?;
        write!(f, "Time: ")?;
        for (segment, label) in self.gantt.iter().zip(&labels) {
            write!(f, "{:>width$} ", segment.start, width = label.len().max(4))?;
        }
        let end = self.gantt.last().map_or(0, |segment| segment.end);
        writeln!(f, "{end:>4}")?;
        write!(f, "Jobs: ")?;
        for label in &labels {
            write!(f, "{:>width$} ", label, width = label.len().max(4))?;
        }
        writeln!(f)
    }
}
