//! Collaborators implemented by running external executables.

mod couplings;
mod simpll;
mod syntax_diff;

pub use couplings::ExternalCouplingInference;
pub use simpll::SimpllNormalizer;
pub use syntax_diff::CommandSyntaxDiff;

use anyhow::{anyhow, Context};
use itertools::Itertools;
use log::{debug, info};
use std::process::{Output, Stdio};
use tokio::process::Command;

/// Runs a tool to completion and collects its output. Stderr is passed through
/// in verbose mode and captured otherwise.
async fn run_tool(args: &[String], description: &str, verbose: bool) -> anyhow::Result<Output> {
    let (exe, rest) = args
        .split_first()
        .ok_or_else(|| anyhow!("empty {} command line", description))?;
    if verbose {
        info!("running {}: {}", description, args.iter().join(" "));
    } else {
        debug!("running {}: {}", description, args.iter().join(" "));
    }
    let stderr = if verbose {
        Stdio::inherit()
    } else {
        Stdio::piped()
    };
    Command::new(exe)
        .args(rest)
        .stdin(Stdio::null())
        .stderr(stderr)
        .kill_on_drop(true)
        .output()
        .await
        .with_context(|| format!("failed to execute {} `{}`", description, exe))
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).trim().to_string()
}
