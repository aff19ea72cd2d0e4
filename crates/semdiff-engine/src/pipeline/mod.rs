//! Timeout-bounded verification of a function pair: the translator turns both
//! functions into a formula that is unsatisfiable iff they are equivalent, and
//! the solver decides it.

mod process_pair;

pub use process_pair::{classify_line, ProcessPair};

use crate::{
    collaborators::{EquivalenceCheck, VerificationTask},
    coupling::Coupling,
    options::Options,
    result::ResultKind,
};
use async_trait::async_trait;
use itertools::Itertools;
use log::{debug, info, warn};
use std::time::Duration;
use tokio::time::Instant;

/// Deadline used when the configured timeout does not fit into an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

fn deadline_after(timeout: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(timeout).unwrap_or(now + FAR_FUTURE)
}

/// Runs the translator piped into the solver for every verification attempt.
pub struct SolverPipeline {
    options: Options,
}

impl SolverPipeline {
    pub fn new(options: Options) -> Self {
        Self { options }
    }

    /// Runs one attempt. Errors are returned only when a process cannot be
    /// started or supervised; everything the solver reports is a verdict.
    ///
    /// The deadline decides ties: it is polled before the solver output, and an
    /// attempt that completes once the deadline has been reached still counts
    /// as a timeout.
    pub async fn run(
        &self,
        task: &VerificationTask<'_>,
        assumptions: &[Coupling],
    ) -> anyhow::Result<ResultKind> {
        let translator_args = self.options.get_translator_command(
            task.first_module,
            task.second_module,
            task.first_fun,
            task.second_fun,
            assumptions,
        );
        let solver_args = self.options.get_solver_command();
        let command_line = format!(
            "{} | {}",
            translator_args.iter().join(" "),
            solver_args.iter().join(" ")
        );
        if self.options.verbose {
            info!("command line: {}", command_line);
        } else {
            debug!("command line: {}", command_line);
        }

        let deadline = deadline_after(task.timeout);
        let mut pair = ProcessPair::spawn(&translator_args, &solver_args, self.options.verbose)?;
        let outcome = tokio::select! {
            biased;
            _ = tokio::time::sleep_until(deadline) => None,
            verdict = pair.verdict() => Some(verdict),
        };
        let in_time = Instant::now() < deadline;
        pair.terminate().await;

        match outcome {
            Some(verdict) if in_time => verdict,
            _ => {
                debug!(
                    "verification of {} exceeded timeout of {}s",
                    task.first_fun,
                    task.timeout.as_secs_f64()
                );
                Ok(ResultKind::Timeout)
            }
        }
    }
}

#[async_trait]
impl EquivalenceCheck for SolverPipeline {
    async fn check(&self, task: &VerificationTask<'_>, assumptions: &[Coupling]) -> ResultKind {
        match self.run(task, assumptions).await {
            Ok(kind) => kind,
            Err(err) => {
                warn!(
                    "verification of {} and {} failed: {:#}",
                    task.first_fun, task.second_fun, err
                );
                ResultKind::Error
            }
        }
    }
}
