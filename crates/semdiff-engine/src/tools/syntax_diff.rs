use super::{run_tool, stderr_of};
use crate::{collaborators::SyntaxDiff, options::SyntaxDiffOptions};
use anyhow::bail;
use async_trait::async_trait;
use std::path::Path;

/// Diffs two files with a command template.
pub struct CommandSyntaxDiff {
    options: SyntaxDiffOptions,
    verbose: bool,
}

impl CommandSyntaxDiff {
    pub fn new(options: SyntaxDiffOptions, verbose: bool) -> Self {
        Self { options, verbose }
    }

    pub fn get_command(&self, first_file: &Path, second_file: &Path, function: &str) -> Vec<String> {
        let first = first_file.to_string_lossy();
        let second = second_file.to_string_lossy();
        self.options
            .command
            .iter()
            .map(|arg| {
                arg.replace("{first}", &first)
                    .replace("{second}", &second)
                    .replace("{function}", function)
            })
            .collect()
    }
}

#[async_trait]
impl SyntaxDiff for CommandSyntaxDiff {
    async fn diff(&self, first_file: &Path, second_file: &Path, function: &str) -> anyhow::Result<String> {
        let args = self.get_command(first_file, second_file, function);
        let output = run_tool(&args, "syntax diff", self.verbose).await?;
        // diff(1) exits with 1 when the files differ.
        match output.status.code() {
            Some(0) | Some(1) => Ok(String::from_utf8_lossy(&output.stdout)
                .trim_end()
                .to_string()),
            _ => bail!(
                "syntax diff exited with {}: {}",
                output.status,
                stderr_of(&output)
            ),
        }
    }
}
