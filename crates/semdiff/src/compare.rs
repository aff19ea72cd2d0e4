use anyhow::{bail, Context};
use clap::Args;
use log::debug;
use semdiff_engine::{Comparator, CompareOptions, DiffResult, Options};
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

/// General comparison options
#[derive(Args)]
#[clap(next_help_heading = "General Options")]
pub struct GeneralConfig {
    /// Name of the function in the second module (default: same as FUNCTION)
    #[clap(name = "second-function", long)]
    pub second_function: Option<String>,

    /// Set timeout of one verification attempt in seconds (default: 40)
    #[clap(name = "timeout", long, short = 't')]
    pub timeout: Option<u64>,

    /// Only collect syntax diffs of the functions that differ
    #[clap(name = "syntax-only", long)]
    pub syntax_only: bool,

    /// Compare only the control flow of the functions
    #[clap(name = "control-flow-only", long)]
    pub control_flow_only: bool,

    /// Restrict the comparison to the uses of a global variable
    #[clap(name = "var", long)]
    pub variable: Option<String>,

    /// Configuration file in toml format
    #[clap(name = "config", long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Show command lines and output of the external tools
    #[clap(name = "verbose", long, short = 'v')]
    pub verbose: bool,

    /// Print the result tree as JSON
    #[clap(name = "json", long)]
    pub json: bool,
}

/// Executables overriding the configuration
#[derive(Args, Default)]
#[clap(next_help_heading = "Tool Options")]
pub struct ToolConfig {
    /// Translator producing the equivalence formula
    #[clap(long = "translator-exe")]
    pub translator_exe: Option<String>,

    /// SMT solver deciding the formula
    #[clap(long = "solver-exe")]
    pub solver_exe: Option<String>,

    /// Module simplifier
    #[clap(long = "simpll-exe")]
    pub simpll_exe: Option<String>,

    /// Coupling inference of called functions
    #[clap(long = "couplings-exe")]
    pub couplings_exe: Option<String>,
}

impl ToolConfig {
    fn apply(self, options: &mut Options) {
        if let Some(exe) = self.translator_exe {
            options.translator.exe = exe;
        }
        if let Some(exe) = self.solver_exe {
            options.solver.exe = exe;
        }
        if let Some(exe) = self.simpll_exe {
            options.simpll.exe = exe;
        }
        if let Some(exe) = self.couplings_exe {
            options.couplings.exe = exe;
        }
    }
}

fn load_options(general_config: &GeneralConfig, tool_config: ToolConfig) -> anyhow::Result<Options> {
    let mut options = match &general_config.config {
        Some(path) => Options::from_toml_file(path)?,
        None => Options::default(),
    };
    if let Some(timeout) = general_config.timeout {
        options.timeout_secs = timeout;
    }
    options.verbose |= general_config.verbose;
    tool_config.apply(&mut options);
    Ok(options)
}

fn check_module(path: &Path) -> anyhow::Result<()> {
    let metadata = std::fs::metadata(path)
        .with_context(|| format!("cannot read module {}", path.display()))?;
    if !metadata.is_file() {
        bail!("module {} is not a file", path.display());
    }
    Ok(())
}

/// Compares `function` of both modules and prints the result tree.
pub async fn execute(
    first: &Path,
    second: &Path,
    function: &str,
    general_config: GeneralConfig,
    tool_config: ToolConfig,
) -> anyhow::Result<DiffResult> {
    check_module(first)?;
    check_module(second)?;

    let options = load_options(&general_config, tool_config)?;
    debug!("options: {:?}", options);

    let compare_options = CompareOptions {
        timeout: Duration::from_secs(options.timeout_secs),
        syntax_only: general_config.syntax_only,
        control_flow_only: general_config.control_flow_only,
        variable: general_config.variable.clone(),
    };
    let second_function = general_config.second_function.as_deref().unwrap_or(function);

    let result = Comparator::from_options(&options)
        .compare(first, second, function, second_function, &compare_options)
        .await;

    if general_config.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&result).context("cannot serialize result")?
        );
    } else {
        println!("{}", result.render());
    }
    Ok(result)
}
