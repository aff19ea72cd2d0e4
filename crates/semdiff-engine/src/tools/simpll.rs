use super::{run_tool, stderr_of};
use crate::{
    collaborators::{FunctionRef, Normalizer, ResidualPair, SimplifiedModules, SimplifyRequest},
    options::ToolOptions,
};
use anyhow::{bail, Context};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::PathBuf;

/// Document printed by the simplifier on stdout.
#[derive(Debug, Deserialize)]
struct SimpllOutput {
    first: PathBuf,
    second: PathBuf,
    #[serde(default)]
    functions: Vec<(FunctionRef, FunctionRef)>,
}

/// Simplifies both modules with an external simplifier. The simplifier writes
/// the simplified modules itself and reports their paths together with the
/// function pairs that remain to be compared.
pub struct SimpllNormalizer {
    options: ToolOptions,
    verbose: bool,
}

impl SimpllNormalizer {
    pub fn new(options: ToolOptions, verbose: bool) -> Self {
        Self { options, verbose }
    }

    /// Returns command line to call the simplifier.
    pub fn get_command(&self, request: &SimplifyRequest<'_>) -> Vec<String> {
        let mut result = self.options.command();
        result.push(request.first_module.to_string_lossy().to_string());
        result.push(request.second_module.to_string_lossy().to_string());
        result.push(format!("--fun={},{}", request.first_fun, request.second_fun));
        if let Some(tag) = request.first_tag {
            result.push(format!("--first-suffix={}", tag));
        }
        result.push(format!("--second-suffix={}", request.second_tag));
        if request.control_flow_only {
            result.push("--control-flow-only".to_string());
        }
        result
    }
}

#[async_trait]
impl Normalizer for SimpllNormalizer {
    async fn simplify(&self, request: &SimplifyRequest<'_>) -> anyhow::Result<SimplifiedModules> {
        let output = run_tool(&self.get_command(request), "simplifier", self.verbose).await?;
        if !output.status.success() {
            bail!(
                "simplifier exited with {}: {}",
                output.status,
                stderr_of(&output)
            );
        }
        let parsed: SimpllOutput =
            serde_json::from_slice(&output.stdout).context("cannot parse simplifier output")?;
        Ok(SimplifiedModules {
            first: parsed.first,
            second: parsed.second,
            residual: parsed
                .functions
                .into_iter()
                .map(|(first, second)| ResidualPair { first, second })
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn request(control_flow_only: bool, first_tag: Option<&str>) -> SimplifyRequest<'_> {
        SimplifyRequest {
            first_module: Path::new("old.ll"),
            second_module: Path::new("new.ll"),
            first_fun: "main",
            second_fun: "main",
            first_tag,
            second_tag: first_tag.unwrap_or("simpl"),
            control_flow_only,
        }
    }

    fn shell(script: &str) -> SimpllNormalizer {
        SimpllNormalizer::new(
            ToolOptions {
                exe: "sh".to_string(),
                flags: vec!["-c".to_string(), script.to_string(), "simpll".to_string()],
            },
            false,
        )
    }

    #[test]
    fn test_command() {
        let normalizer = SimpllNormalizer::new(
            ToolOptions {
                exe: "simpll".to_string(),
                flags: vec!["--verbose".to_string()],
            },
            false,
        );
        assert_eq!(
            normalizer.get_command(&request(false, None)),
            vec![
                "simpll",
                "--verbose",
                "old.ll",
                "new.ll",
                "--fun=main,main",
                "--second-suffix=simpl",
            ]
        );
        assert_eq!(
            normalizer.get_command(&request(true, Some("jiffies"))),
            vec![
                "simpll",
                "--verbose",
                "old.ll",
                "new.ll",
                "--fun=main,main",
                "--first-suffix=jiffies",
                "--second-suffix=jiffies",
                "--control-flow-only",
            ]
        );
    }

    #[tokio::test]
    async fn test_parse_residual_pairs() {
        let normalizer = shell(
            r#"echo '{"first": "old-simpl.ll", "second": "new-simpl.ll", "functions": [[{"fun": "f", "file": "old/f.c"}, {"fun": "f", "file": "new/f.c"}], [{"fun": "g", "file": "old/g.c"}, {"fun": "g2", "file": "new/g.c"}]]}'"#,
        );
        let simplified = normalizer.simplify(&request(false, None)).await.unwrap();
        assert_eq!(simplified.first, PathBuf::from("old-simpl.ll"));
        assert_eq!(simplified.second, PathBuf::from("new-simpl.ll"));
        let names: Vec<(&str, &str)> = simplified
            .residual
            .iter()
            .map(|p| (p.first.name.as_str(), p.second.name.as_str()))
            .collect();
        assert_eq!(names, vec![("f", "f"), ("g", "g2")]);
        assert_eq!(simplified.residual[1].second.file, PathBuf::from("new/g.c"));
    }

    #[tokio::test]
    async fn test_no_residual_pairs() {
        let normalizer = shell(r#"echo '{"first": "a.ll", "second": "b.ll"}'"#);
        let simplified = normalizer.simplify(&request(false, None)).await.unwrap();
        assert!(simplified.residual.is_empty());
    }

    #[tokio::test]
    async fn test_failure() {
        let normalizer = shell("echo 'cannot link' >&2; exit 1");
        let err = normalizer.simplify(&request(false, None)).await.unwrap_err();
        assert!(format!("{:#}", err).contains("cannot link"));
    }

    #[tokio::test]
    async fn test_garbage_output() {
        let normalizer = shell("echo 'not json'");
        assert!(normalizer.simplify(&request(false, None)).await.is_err());
    }
}
