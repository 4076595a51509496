//! Build step run before any test
//!
//! A failed build is final: the run stops before the engine is spawned.

use std::process::Stdio;

use tokio::process::Command as TokioCommand;

use crate::common::config::BuildConfig;
use crate::common::{Error, Result};

/// Build the engine with the configured tool
///
/// The tool's stdout is discarded unless `verbose`; stderr always reaches
/// the terminal so compiler errors stay visible.
pub async fn build_engine(build: &BuildConfig, verbose: bool) -> Result<()> {
    let program = which::which(&build.program).map_err(|_| Error::BuildToolNotFound {
        name: build.program.clone(),
    })?;

    let command_line = render_command(build);
    tracing::info!("Building: {}", command_line);

    let status = TokioCommand::new(&program)
        .arg(&build.target)
        .args(&build.flags)
        .stdin(Stdio::null())
        .stdout(if verbose {
            Stdio::inherit()
        } else {
            Stdio::null()
        })
        .stderr(Stdio::inherit())
        .status()
        .await
        .map_err(|e| Error::BuildFailed {
            command: command_line.clone(),
            status: format!("launch error ({e})"),
        })?;

    if !status.success() {
        return Err(Error::build_failed(&command_line, status));
    }

    tracing::debug!("Build finished");
    Ok(())
}

fn render_command(build: &BuildConfig) -> String {
    std::iter::once(build.program.as_str())
        .chain(std::iter::once(build.target.as_str()))
        .chain(build.flags.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}
