//! Bounded task scheduler: run independent units of work with a fixed
//! concurrency ceiling, letting every unit settle regardless of how its
//! siblings fare.

use std::sync::atomic::{AtomicU64, Ordering};

use rayon::prelude::*;
use tracing::info;

use crate::foundation::error::{PackshotError, PackshotResult};

/// How a single unit of work settled. Every branch counts as processed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskOutcome {
    /// All outputs already existed; nothing was touched.
    Skipped,
    /// At least one output was produced.
    Derived,
    /// The item's source does not exist (e.g. remote 404); outputs absent.
    Missing,
    /// The item errored; outputs for it may be absent.
    Failed,
}

/// Aggregate accounting for one batch. `processed()` always equals `total`
/// once the batch has settled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub total: u64,
    pub derived: u64,
    pub skipped: u64,
    pub missing: u64,
    pub failed: u64,
}

impl BatchStats {
    pub fn processed(&self) -> u64 {
        self.derived + self.skipped + self.missing + self.failed
    }

    fn record(&mut self, outcome: TaskOutcome) {
        match outcome {
            TaskOutcome::Skipped => self.skipped += 1,
            TaskOutcome::Derived => self.derived += 1,
            TaskOutcome::Missing => self.missing += 1,
            TaskOutcome::Failed => self.failed += 1,
        }
    }
}

/// Run all jobs with at most `limit` in flight, on a dedicated thread pool
/// sized to the limit. Returns only after every job has settled. Progress is
/// a shared atomic counter incremented exactly once per job, whichever
/// branch it took.
pub fn run_bounded<F>(jobs: Vec<F>, limit: usize) -> PackshotResult<BatchStats>
where
    F: FnOnce() -> TaskOutcome + Send,
{
    if limit == 0 {
        return Err(PackshotError::config("concurrency limit must be >= 1"));
    }

    let total = jobs.len() as u64;
    let done = AtomicU64::new(0);
    let pool = build_thread_pool(limit)?;

    let outcomes: Vec<TaskOutcome> = pool.install(|| {
        jobs.into_par_iter()
            // One job per rayon task, so the pool size is the ceiling.
            .with_max_len(1)
            .map(|job| {
                let outcome = job();
                let n = done.fetch_add(1, Ordering::Relaxed) + 1;
                info!("processed {n}/{total}");
                outcome
            })
            .collect()
    });

    let mut stats = BatchStats {
        total,
        ..BatchStats::default()
    };
    for outcome in outcomes {
        stats.record(outcome);
    }
    Ok(stats)
}

fn build_thread_pool(threads: usize) -> PackshotResult<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| PackshotError::config(format!("failed to build thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/scheduler.rs"]
mod tests;
