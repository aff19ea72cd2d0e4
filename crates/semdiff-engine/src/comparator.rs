//! Top level comparison of a function in two modules.
//!
//! The modules are simplified first. If the simplifier proves the functions
//! syntactically equal, nothing else is run. Otherwise it lists the function
//! pairs the equality depends on, and each of them is compared semantically
//! (or only diffed, in syntax-only mode). The compared functions are equal if
//! all those pairs are.

use crate::{
    collaborators::{
        CouplingInference, EquivalenceCheck, Normalizer, ResidualPair, SimplifiedModules,
        SimplifyRequest, SyntaxDiff, VerificationTask,
    },
    escalation::escalate,
    options::Options,
    pipeline::SolverPipeline,
    result::{DiffResult, ResultKind},
    tools::{CommandSyntaxDiff, ExternalCouplingInference, SimpllNormalizer},
};
use log::{info, warn};
use std::{path::Path, time::Duration};

/// Output tag of the second simplified module when no global variable is set.
const DEFAULT_OUTPUT_TAG: &str = "simpl";

/// Options of one comparison.
#[derive(Debug, Clone)]
pub struct CompareOptions {
    /// Timeout of a single verification attempt.
    pub timeout: Duration,
    /// Only collect syntax diffs of the differing functions.
    pub syntax_only: bool,
    /// Compare only the control flow of the functions.
    pub control_flow_only: bool,
    /// Global variable the comparison is restricted to.
    pub variable: Option<String>,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(40),
            syntax_only: false,
            control_flow_only: false,
            variable: None,
        }
    }
}

impl From<&Options> for CompareOptions {
    fn from(options: &Options) -> Self {
        Self {
            timeout: Duration::from_secs(options.timeout_secs),
            ..Self::default()
        }
    }
}

pub struct Comparator {
    normalizer: Box<dyn Normalizer>,
    couplings: Box<dyn CouplingInference>,
    syntax_diff: Box<dyn SyntaxDiff>,
    checker: Box<dyn EquivalenceCheck>,
}

impl Comparator {
    pub fn new(
        normalizer: Box<dyn Normalizer>,
        couplings: Box<dyn CouplingInference>,
        syntax_diff: Box<dyn SyntaxDiff>,
        checker: Box<dyn EquivalenceCheck>,
    ) -> Self {
        Self {
            normalizer,
            couplings,
            syntax_diff,
            checker,
        }
    }

    /// Comparator running the external tools configured in `options`.
    pub fn from_options(options: &Options) -> Self {
        Self::new(
            Box::new(SimpllNormalizer::new(options.simpll.clone(), options.verbose)),
            Box::new(ExternalCouplingInference::new(
                options.couplings.clone(),
                options.verbose,
            )),
            Box::new(CommandSyntaxDiff::new(
                options.syntax_diff.clone(),
                options.verbose,
            )),
            Box::new(SolverPipeline::new(options.clone())),
        )
    }

    /// Compares `first_fun` of `first_module` with `second_fun` of
    /// `second_module`. Never fails: a failure of the simplifier yields a
    /// single `Error` node, failures of one residual pair only affect that
    /// pair's child.
    pub async fn compare(
        &self,
        first_module: &Path,
        second_module: &Path,
        first_fun: &str,
        second_fun: &str,
        options: &CompareOptions,
    ) -> DiffResult {
        let mut result = DiffResult::new(ResultKind::None, first_fun, second_fun)
            .with_files(first_module, second_module);
        if !options.syntax_only {
            info!(
                "syntactic diff of {} (in {})",
                result.display_name(),
                first_module.display()
            );
        }

        let variable = options.variable.as_deref();
        let request = SimplifyRequest {
            first_module,
            second_module,
            first_fun,
            second_fun,
            first_tag: variable,
            second_tag: variable.unwrap_or(DEFAULT_OUTPUT_TAG),
            control_flow_only: options.control_flow_only,
        };
        let simplified = match self.normalizer.simplify(&request).await {
            Ok(simplified) => simplified,
            Err(err) => {
                warn!("simplifying has failed: {:#}", err);
                result.kind = ResultKind::Error;
                return result;
            }
        };

        if simplified.residual.is_empty() {
            result.kind = ResultKind::EqualSyntax;
        } else if options.syntax_only {
            for pair in &simplified.residual {
                result.attach(self.syntax_diff_of(pair).await);
            }
        } else {
            for pair in &simplified.residual {
                result.add_inner(self.semantic_diff_of(&simplified, pair, options.timeout).await);
            }
        }

        if !options.syntax_only {
            info!("{}: {}", result.display_name(), result.kind);
        }
        result
    }

    async fn syntax_diff_of(&self, pair: &ResidualPair) -> DiffResult {
        let mut result = DiffResult::new(ResultKind::NotEqual, &pair.first.name, &pair.second.name)
            .with_files(&pair.first.file, &pair.second.file);
        match self
            .syntax_diff
            .diff(&pair.first.file, &pair.second.file, &pair.first.name)
            .await
        {
            Ok(text) => {
                info!("{} differs:\n{{{{{{\n{}\n}}}}}}", pair.first.name, text);
                result.diff_text = Some(text);
            }
            Err(err) => {
                warn!("cannot diff {}: {:#}", pair.first.name, err);
                result.kind = ResultKind::Error;
            }
        }
        result
    }

    async fn semantic_diff_of(
        &self,
        simplified: &SimplifiedModules,
        pair: &ResidualPair,
        timeout: Duration,
    ) -> DiffResult {
        let mut couplings = match self
            .couplings
            .infer_called_by(
                &simplified.first,
                &simplified.second,
                &pair.first.name,
                &pair.second.name,
            )
            .await
        {
            Ok(couplings) => couplings,
            Err(err) => {
                warn!(
                    "cannot couple functions called by {}: {:#}",
                    pair.first.name, err
                );
                return DiffResult::new(ResultKind::Error, &pair.first.name, &pair.second.name)
                    .with_files(&simplified.first, &simplified.second);
            }
        };
        couplings.clean();

        let task = VerificationTask {
            first_module: &simplified.first,
            second_module: &simplified.second,
            first_fun: &pair.first.name,
            second_fun: &pair.second.name,
            timeout,
        };
        escalate(self.checker.as_ref(), &task, &couplings).await
    }
}
