//! Interfaces of the external tools the comparison is built on.

use crate::{
    coupling::{Coupling, CouplingSet},
    result::ResultKind,
};
use async_trait::async_trait;
use serde::Deserialize;
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

/// A function of one of the simplified modules.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FunctionRef {
    #[serde(rename = "fun")]
    pub name: String,
    pub file: PathBuf,
}

/// A pair of functions the simplifier could not prove syntactically equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResidualPair {
    pub first: FunctionRef,
    pub second: FunctionRef,
}

/// Output of the simplifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimplifiedModules {
    pub first: PathBuf,
    pub second: PathBuf,
    /// Pairs still to be compared, in the order they were discovered.
    pub residual: Vec<ResidualPair>,
}

#[derive(Debug, Clone)]
pub struct SimplifyRequest<'a> {
    pub first_module: &'a Path,
    pub second_module: &'a Path,
    pub first_fun: &'a str,
    pub second_fun: &'a str,
    /// Suffix of the first simplified module, if it gets a distinct one.
    pub first_tag: Option<&'a str>,
    pub second_tag: &'a str,
    pub control_flow_only: bool,
}

/// Reduces two modules to the function pairs that need a semantic comparison.
#[async_trait]
pub trait Normalizer: Send + Sync {
    /// Fails when the modules cannot be simplified.
    async fn simplify(&self, request: &SimplifyRequest<'_>) -> anyhow::Result<SimplifiedModules>;
}

/// Proposes correspondences between the functions called by a compared pair.
#[async_trait]
pub trait CouplingInference: Send + Sync {
    async fn infer_called_by(
        &self,
        first_module: &Path,
        second_module: &Path,
        first_fun: &str,
        second_fun: &str,
    ) -> anyhow::Result<CouplingSet>;
}

/// Produces a human readable diff of one function.
#[async_trait]
pub trait SyntaxDiff: Send + Sync {
    async fn diff(&self, first_file: &Path, second_file: &Path, function: &str) -> anyhow::Result<String>;
}

/// One verification attempt: a function pair of two modules, bounded in time.
#[derive(Debug, Clone)]
pub struct VerificationTask<'a> {
    pub first_module: &'a Path,
    pub second_module: &'a Path,
    pub first_fun: &'a str,
    pub second_fun: &'a str,
    pub timeout: Duration,
}

/// Decides equivalence of a function pair under a fixed set of assumptions.
/// Every failure is reported as a [`ResultKind`], never as an error.
#[async_trait]
pub trait EquivalenceCheck: Send + Sync {
    async fn check(&self, task: &VerificationTask<'_>, assumptions: &[Coupling]) -> ResultKind;
}
