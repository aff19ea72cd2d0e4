use super::{run_tool, stderr_of};
use crate::{
    collaborators::CouplingInference,
    coupling::{Coupling, CouplingSet},
    options::ToolOptions,
};
use anyhow::{bail, Context};
use async_trait::async_trait;
use std::path::Path;

/// Infers couplings of called functions with an external tool printing a JSON
/// array of `{"first", "second", "diff"}` records.
pub struct ExternalCouplingInference {
    options: ToolOptions,
    verbose: bool,
}

impl ExternalCouplingInference {
    pub fn new(options: ToolOptions, verbose: bool) -> Self {
        Self { options, verbose }
    }

    pub fn get_command(
        &self,
        first_module: &Path,
        second_module: &Path,
        first_fun: &str,
        second_fun: &str,
    ) -> Vec<String> {
        let mut result = self.options.command();
        result.push(first_module.to_string_lossy().to_string());
        result.push(second_module.to_string_lossy().to_string());
        result.push(format!("--called-by={},{}", first_fun, second_fun));
        result
    }
}

#[async_trait]
impl CouplingInference for ExternalCouplingInference {
    async fn infer_called_by(
        &self,
        first_module: &Path,
        second_module: &Path,
        first_fun: &str,
        second_fun: &str,
    ) -> anyhow::Result<CouplingSet> {
        let args = self.get_command(first_module, second_module, first_fun, second_fun);
        let output = run_tool(&args, "coupling inference", self.verbose).await?;
        if !output.status.success() {
            bail!(
                "coupling inference exited with {}: {}",
                output.status,
                stderr_of(&output)
            );
        }
        let couplings: Vec<Coupling> = serde_json::from_slice(&output.stdout)
            .context("cannot parse coupling inference output")?;
        let mut set = CouplingSet::called_by(first_fun, second_fun);
        set.extend(couplings);
        Ok(set)
    }
}
