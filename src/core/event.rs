use crate::{core::Ticks, sim::JobId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimEvent {
    JobAdmitted {
        job: JobId,
    },
    CpuCurrentChange {
        from: Option<JobId>,
        to: Option<JobId>,
    },
    JobCompleted {
        job: JobId,
        completion_time: Ticks,
    },
    // No runnable job this tick
    CpuIdle,
}
