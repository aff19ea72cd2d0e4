//! Translator and solver processes of one verification attempt.

use crate::result::ResultKind;
use anyhow::{anyhow, Context};
use log::{debug, trace, warn};
use std::process::Stdio;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    process::{Child, Command},
};

/// Maps a line of solver output to the verdict it stands for.
pub fn classify_line(line: &str) -> Option<ResultKind> {
    match line.trim() {
        "sat" => Some(ResultKind::NotEqual),
        "unsat" => Some(ResultKind::Equal),
        "unknown" => Some(ResultKind::Unknown),
        _ => None,
    }
}

fn spawn_command(args: &[String], stdin: Stdio, verbose: bool) -> anyhow::Result<Child> {
    let (exe, rest) = args
        .split_first()
        .ok_or_else(|| anyhow!("empty command line"))?;
    let stderr = if verbose {
        Stdio::inherit()
    } else {
        Stdio::null()
    };
    Command::new(exe)
        .args(rest)
        .stdin(stdin)
        .stdout(Stdio::piped())
        .stderr(stderr)
        .kill_on_drop(true)
        .spawn()
        .with_context(|| format!("cannot execute `{}`", exe))
}

/// The translator with its output piped into the solver.
///
/// Both children are killed when the pair is dropped, so an attempt that is
/// abandoned half way (an error, a panic or a cancelled future) does not leave
/// processes behind. [`ProcessPair::terminate`] additionally reaps them.
pub struct ProcessPair {
    translator: Child,
    solver: Child,
}

impl ProcessPair {
    pub fn spawn(
        translator_args: &[String],
        solver_args: &[String],
        verbose: bool,
    ) -> anyhow::Result<Self> {
        let mut translator = spawn_command(translator_args, Stdio::null(), verbose)
            .context("failed to start translator")?;
        let link: Stdio = translator
            .stdout
            .take()
            .ok_or_else(|| anyhow!("translator output is not captured"))?
            .try_into()
            .context("cannot pipe translator output into the solver")?;
        let solver =
            spawn_command(solver_args, link, verbose).context("failed to start solver")?;
        Ok(Self { translator, solver })
    }

    /// Reads the solver output until it is closed and classifies it. The last
    /// recognised line wins; a failing solver makes the attempt an error.
    pub async fn verdict(&mut self) -> anyhow::Result<ResultKind> {
        let stdout = self
            .solver
            .stdout
            .take()
            .ok_or_else(|| anyhow!("solver output is not captured"))?;
        let mut lines = BufReader::new(stdout).split(b'\n');
        let mut kind = ResultKind::Error;
        while let Some(line) = lines
            .next_segment()
            .await
            .context("cannot read solver output")?
        {
            if let Some(line_kind) = classify_line(&String::from_utf8_lossy(&line)) {
                kind = line_kind;
            }
        }
        let status = self
            .solver
            .wait()
            .await
            .context("cannot wait for solver")?;
        if !status.success() {
            debug!("solver exited with {}", status);
            return Ok(ResultKind::Error);
        }
        Ok(kind)
    }

    /// Kills whichever process is still running and reaps both.
    pub async fn terminate(mut self) {
        for (name, child) in [
            ("translator", &mut self.translator),
            ("solver", &mut self.solver),
        ] {
            if let Err(err) = child.start_kill() {
                trace!("{} already exited: {}", name, err);
            }
            match child.wait().await {
                Ok(status) => trace!("{} finished with {}", name, status),
                Err(err) => warn!("cannot reap {}: {}", name, err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_line() {
        assert_eq!(classify_line("sat"), Some(ResultKind::NotEqual));
        assert_eq!(classify_line("unsat\r"), Some(ResultKind::Equal));
        assert_eq!(classify_line("  unknown "), Some(ResultKind::Unknown));
        assert_eq!(classify_line("(error \"line 3\")"), None);
        assert_eq!(classify_line("satisfiable"), None);
        assert_eq!(classify_line(""), None);
    }

    #[tokio::test]
    async fn test_spawn_failure_is_reported() {
        let result = ProcessPair::spawn(
            &["/nonexistent/translator".to_string()],
            &["cat".to_string()],
            false,
        );
        assert!(result.is_err());
    }
}
