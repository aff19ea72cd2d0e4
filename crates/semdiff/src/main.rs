use std::path::PathBuf;

use clap::*;
use colored::Colorize;
use compare::{execute, GeneralConfig, ToolConfig};
use log::{debug, LevelFilter};
use simplelog::{Config, TermLogger, TerminalMode};

mod compare;

#[derive(Parser)]
#[clap(
    name = env!("CARGO_BIN_NAME"),
    about = "Checks whether a function has the same semantics in two versions of an IR module. Functions the simplifier cannot prove syntactically equal are compared with an SMT solver.",
    rename_all = "kebab-case",
    author,
    version = env!("CARGO_PKG_VERSION"),
)]
pub struct Args {
    /// Module with the old version of the function
    pub first: PathBuf,

    /// Module with the new version of the function
    pub second: PathBuf,

    /// Name of the compared function
    pub function: String,

    /// General options
    #[clap(flatten)]
    pub general_config: GeneralConfig,

    /// Tool options
    #[clap(flatten)]
    pub tool_config: ToolConfig,
}

#[tokio::main]
async fn main() {
    #[cfg(windows)]
    let _ = colored::control::set_virtual_terminal(true);

    let args = Args::parse();

    let level = if args.general_config.verbose {
        LevelFilter::Trace
    } else {
        LevelFilter::Info
    };
    if let Err(err) = TermLogger::init(level, Config::default(), TerminalMode::Stderr) {
        eprintln!("cannot initialize logging: {}", err);
    }

    debug!("semdiff version: {}", env!("CARGO_PKG_VERSION"));

    let result = execute(
        &args.first,
        &args.second,
        &args.function,
        args.general_config,
        args.tool_config,
    )
    .await;

    match result {
        Ok(result) if result.kind.is_equal() => (),
        Ok(_) => std::process::exit(1),
        Err(err) => {
            let err = format!("{:?}", err);
            eprintln!("{}", err.bold().red());
            std::process::exit(2);
        }
    }
}
