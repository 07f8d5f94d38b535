//! The execution wrapper around every check invocation.
//!
//! [`run_check`] is the only place outcome duration is measured. It turns
//! both `Err` returns and panics into `error` outcomes so one broken check
//! never takes down its batch.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use super::check::{Check, CheckContext};
use super::outcome::{CheckOutcome, Verdict};

/// Execute a check, containing any failure.
pub fn run_check(check: &dyn Check, ctx: &CheckContext<'_>) -> CheckOutcome {
    let definition = check.definition();
    let start = Instant::now();

    let verdict = match panic::catch_unwind(AssertUnwindSafe(|| check.execute(ctx))) {
        Ok(Ok(verdict)) => verdict,
        Ok(Err(e)) => {
            tracing::warn!(check = %definition.check_id, run = %ctx.run.run_id, "check failed: {:#}", e);
            Verdict::error(format!("Check error: {:#}", e))
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            tracing::warn!(check = %definition.check_id, run = %ctx.run.run_id, "check panicked: {}", message);
            Verdict::error(format!("Check error: {}", message))
        }
    };

    let outcome = CheckOutcome::new(&definition, verdict, start.elapsed());
    tracing::debug!(
        check = %outcome.check_id,
        status = %outcome.status,
        duration_us = outcome.duration.as_micros() as u64,
        "check finished"
    );
    outcome
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}
