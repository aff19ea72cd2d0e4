//! Comparison of one function pair under increasingly strong assumptions.
//!
//! Each coupling of the called functions carries an assumption level; level 0
//! means no assumption. The pair is verified with all couplings up to a level,
//! trying the levels in increasing order until the functions are proven equal
//! or no level remains.

use crate::{
    collaborators::{EquivalenceCheck, VerificationTask},
    coupling::CouplingSet,
    result::{DiffResult, ResultKind},
};
use log::{debug, info};

/// Runs the verification of `task` for every assumption level of `couplings`.
///
/// Stops at the first level that proves equality and at the first timeout;
/// any other verdict moves on to the next level. The returned leaf carries the
/// simplified modules and, for an `EqualUnderAssumptions` verdict, the
/// couplings that had to be assumed.
pub async fn escalate(
    checker: &dyn EquivalenceCheck,
    task: &VerificationTask<'_>,
    couplings: &CouplingSet,
) -> DiffResult {
    let mut result = DiffResult::new(ResultKind::None, task.first_fun, task.second_fun)
        .with_files(task.first_module, task.second_module);
    info!("semantic diff of {}", result.display_name());
    for level in couplings.levels() {
        let assumptions = couplings.up_to(level);
        debug!(
            "trying assumption level {} with {} coupling(s)",
            level,
            assumptions.len()
        );
        result.kind = checker.check(task, &assumptions).await;
        match result.kind {
            ResultKind::Timeout => break,
            ResultKind::Equal => {
                if level > 0 {
                    result.kind = ResultKind::EqualUnderAssumptions;
                    result.used_assumptions = couplings.assumed_at(level);
                }
                break;
            }
            _ => {}
        }
    }

    info!("{}: {}", result.display_name(), result.kind);
    for assumption in &result.used_assumptions {
        info!(
            "  functions {} and {} are same",
            assumption.first, assumption.second
        );
    }
    result
}
