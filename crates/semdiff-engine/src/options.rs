use crate::coupling::Coupling;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default flags passed to the translator. Module paths, the compared functions
/// and coupling hints are appended after them.
const DEFAULT_TRANSLATOR_FLAGS: &[&str] = &[
    "-muz",
    "--ir-input",
    "--bitvect",
    "--infer-marks",
    "--disable-auto-coupling",
];

/// Default flags passed to the solver, which reads the formula from stdin.
const DEFAULT_SOLVER_FLAGS: &[&str] = &["fixedpoint.engine=duality", "-in"];

const DEFAULT_SYNTAX_DIFF_COMMAND: &[&str] = &["diff", "-u", "{first}", "{second}"];

fn read_env_var(name: &str) -> String {
    std::env::var(name).unwrap_or_default()
}

fn exe_or(exe: String, fallback: &str) -> String {
    if exe.is_empty() {
        fallback.to_string()
    } else {
        exe
    }
}

fn to_strings(flags: &[&str]) -> Vec<String> {
    flags.iter().map(|s| s.to_string()).collect()
}

/// An external executable together with the flags it is always called with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolOptions {
    /// Path to the executable.
    pub exe: String,
    /// Flags placed right after the executable.
    #[serde(default)]
    pub flags: Vec<String>,
}

impl ToolOptions {
    fn new(exe: String, flags: &[&str]) -> Self {
        Self {
            exe,
            flags: to_strings(flags),
        }
    }

    /// Executable followed by the configured flags.
    pub fn command(&self) -> Vec<String> {
        let mut result = vec![self.exe.clone()];
        result.extend(self.flags.iter().cloned());
        result
    }
}

/// Command template of the textual diff tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SyntaxDiffOptions {
    /// Program and arguments. `{first}`, `{second}` and `{function}` are
    /// replaced by the compared files and the anchor function.
    pub command: Vec<String>,
}

impl Default for SyntaxDiffOptions {
    fn default() -> Self {
        Self {
            command: to_strings(DEFAULT_SYNTAX_DIFF_COMMAND),
        }
    }
}

/// Options of the tool. Usually read from a toml file; the command line can
/// override single values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    /// Timeout of one verification attempt, in seconds.
    pub timeout_secs: u64,
    /// Whether to pass the stderr of external tools through and log their
    /// command lines.
    pub verbose: bool,
    /// Formula generator fed with both modules.
    pub translator: ToolOptions,
    /// SMT solver reading the translator output.
    pub solver: ToolOptions,
    /// Module simplifier producing the residual function pairs.
    pub simpll: ToolOptions,
    /// Call-graph coupling inference.
    pub couplings: ToolOptions,
    pub syntax_diff: SyntaxDiffOptions,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            timeout_secs: 40,
            verbose: false,
            translator: ToolOptions::new(
                exe_or(read_env_var("LLREVE_EXE"), "llreve"),
                DEFAULT_TRANSLATOR_FLAGS,
            ),
            solver: ToolOptions::new(exe_or(read_env_var("Z3_EXE"), "z3"), DEFAULT_SOLVER_FLAGS),
            simpll: ToolOptions::new(exe_or(read_env_var("SIMPLL_EXE"), "simpll"), &[]),
            couplings: ToolOptions::new(
                exe_or(read_env_var("COUPLINGS_EXE"), "function-couplings"),
                &[],
            ),
            syntax_diff: SyntaxDiffOptions::default(),
        }
    }
}

impl Options {
    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        toml::from_str(text).context("invalid semdiff configuration")
    }

    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read configuration {}", path.display()))?;
        Self::from_toml_str(&text)
            .with_context(|| format!("in configuration file {}", path.display()))
    }

    /// Returns command line to call the translator on one function pair.
    pub fn get_translator_command(
        &self,
        first_module: &Path,
        second_module: &Path,
        first_fun: &str,
        second_fun: &str,
        assumptions: &[Coupling],
    ) -> Vec<String> {
        let mut result = self.translator.command();
        result.push(first_module.to_string_lossy().to_string());
        result.push(second_module.to_string_lossy().to_string());
        result.push(format!("--fun={},{}", first_fun, second_fun));
        for c in assumptions {
            result.push(format!("--couple-functions={},{}", c.first, c.second));
        }
        result
    }

    /// Returns command line to call the solver.
    pub fn get_solver_command(&self) -> Vec<String> {
        self.solver.command()
    }
}
