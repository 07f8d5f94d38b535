//! Bounded parallel execution of one phase.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use crate::checks::{run_check, Check, CheckContext, CheckOutcome};

/// Run every check with at most `max_workers` threads and return once all
/// have finished.
///
/// Outcomes come back in the order of `checks`. Each check goes through
/// [`run_check`], so a failing or panicking check still yields an outcome.
pub fn execute_batch(
    checks: &[Arc<dyn Check>],
    ctx: CheckContext<'_>,
    max_workers: usize,
) -> Vec<CheckOutcome> {
    if checks.is_empty() {
        return Vec::new();
    }
    let workers = checks.len().min(max_workers.max(1));
    let next = AtomicUsize::new(0);

    let mut indexed: Vec<(usize, CheckOutcome)> = thread::scope(|s| {
        let handles: Vec<_> = (0..workers)
            .map(|_| {
                let next = &next;
                s.spawn(move || {
                    let mut done = Vec::new();
                    loop {
                        let i = next.fetch_add(1, Ordering::SeqCst);
                        let Some(check) = checks.get(i) else { break };
                        done.push((i, run_check(check.as_ref(), &ctx)));
                    }
                    done
                })
            })
            .collect();

        handles
            .into_iter()
            .flat_map(|h| match h.join() {
                Ok(done) => done,
                Err(_) => {
                    tracing::error!(run = %ctx.run.run_id, "check worker thread died");
                    Vec::new()
                }
            })
            .collect()
    });

    indexed.sort_by_key(|(i, _)| *i);
    indexed.into_iter().map(|(_, outcome)| outcome).collect()
}
