use super::*;
use std::sync::atomic::AtomicUsize;
use std::time::Duration;

#[test]
fn zero_limit_is_rejected() {
    let jobs: Vec<fn() -> TaskOutcome> = vec![|| TaskOutcome::Derived];
    assert!(run_bounded(jobs, 0).is_err());
}

#[test]
fn empty_batch_settles_immediately() {
    let jobs: Vec<fn() -> TaskOutcome> = Vec::new();
    let stats = run_bounded(jobs, 4).unwrap();
    assert_eq!(stats, BatchStats::default());
}

#[test]
fn every_branch_counts_as_processed() {
    let jobs: Vec<Box<dyn FnOnce() -> TaskOutcome + Send>> = vec![
        Box::new(|| TaskOutcome::Derived),
        Box::new(|| TaskOutcome::Skipped),
        Box::new(|| TaskOutcome::Skipped),
        Box::new(|| TaskOutcome::Missing),
        Box::new(|| TaskOutcome::Failed),
    ];
    let stats = run_bounded(jobs, 2).unwrap();
    assert_eq!(stats.total, 5);
    assert_eq!(stats.derived, 1);
    assert_eq!(stats.skipped, 2);
    assert_eq!(stats.missing, 1);
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.processed(), stats.total);
}

#[test]
fn one_failure_never_blocks_the_rest() {
    let jobs: Vec<Box<dyn FnOnce() -> TaskOutcome + Send>> = (0..32)
        .map(|i| {
            Box::new(move || {
                if i == 3 {
                    TaskOutcome::Failed
                } else {
                    TaskOutcome::Derived
                }
            }) as Box<dyn FnOnce() -> TaskOutcome + Send>
        })
        .collect();
    let stats = run_bounded(jobs, 4).unwrap();
    assert_eq!(stats.processed(), 32);
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.derived, 31);
}

#[test]
fn in_flight_jobs_never_exceed_the_limit() {
    const LIMIT: usize = 3;
    let current = AtomicUsize::new(0);
    let peak = AtomicUsize::new(0);

    let jobs: Vec<_> = (0..16)
        .map(|_| {
            let current = &current;
            let peak = &peak;
            move || {
                let now = current.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                std::thread::sleep(Duration::from_millis(10));
                current.fetch_sub(1, Ordering::SeqCst);
                TaskOutcome::Derived
            }
        })
        .collect();

    let stats = run_bounded(jobs, LIMIT).unwrap();
    assert_eq!(stats.processed(), 16);
    assert!(peak.load(Ordering::SeqCst) <= LIMIT);
}
