//! Fixture replay
//!
//! Streams the fixture into the engine one line at a time. Commands and
//! reset directives are written and flushed immediately; each expectation
//! blocks until the engine prints its result line.

use std::path::Path;
use std::time::Duration;

use colored::Colorize;
use tokio::io::{AsyncBufRead, AsyncWrite, BufReader};

use crate::common::config::Config;
use crate::common::{Error, Result};
use crate::engine::{read_text_line, EngineProcess, Session};

use super::builder::build_engine;
use super::fixture::{ExpectedRecord, FixtureLine};
use super::verifier::{check, Verdict};

/// Counters accumulated over one fixture
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub tests_seen: usize,
    pub tests_failed: usize,
}

impl RunSummary {
    fn record(&mut self, verdict: Verdict) {
        if verdict == Verdict::Fail {
            self.tests_failed += 1;
        }
    }

    pub fn all_passed(&self) -> bool {
        self.tests_failed == 0
    }

    /// Print the final banner to stderr
    pub fn report(&self) {
        if self.all_passed() {
            eprintln!("{}", "SUCCESS".green());
        } else {
            eprintln!(
                "{}",
                format!("{}/{} FAILURES", self.tests_failed, self.tests_seen).red()
            );
        }
    }
}

/// Build the engine, spawn it and replay the configured fixture
pub async fn run(config: &Config, verbose: bool) -> Result<RunSummary> {
    if config.build.skip {
        tracing::info!("Skipping build");
    } else {
        build_engine(&config.build, verbose).await?;
    }

    let fixture = tokio::fs::File::open(&config.fixture)
        .await
        .map_err(|e| Error::file_read(&config.fixture, &e))?;

    let mut engine = EngineProcess::spawn(
        &config.engine.binary,
        &config.engine.args,
        &config.engine.reset_command,
    )?;

    // On error the engine is dropped here, which kills it.
    let summary = replay(
        BufReader::new(fixture),
        engine.session(),
        config.timeouts.probe(),
    )
    .await?;

    engine.shutdown(config.timeouts.shutdown()).await?;
    log_summary(&config.fixture, &summary);
    Ok(summary)
}

/// Replay fixture lines against a session
///
/// Single pass: every line is dispatched as soon as it is read.
pub async fn replay<F, W, R>(
    mut fixture: F,
    session: &mut Session<W, R>,
    probe_limit: Option<Duration>,
) -> Result<RunSummary>
where
    F: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    R: AsyncBufRead + Unpin,
{
    let mut summary = RunSummary::default();
    let mut line_no = 0;

    while let Some(raw) = read_text_line(&mut fixture).await? {
        line_no += 1;

        match FixtureLine::classify(&raw) {
            FixtureLine::Reset => session.send_reset().await?,
            FixtureLine::Command(command) => session.send_command(command).await?,
            FixtureLine::Expectation(payload) => {
                let expected = ExpectedRecord::parse(payload, line_no)?;
                summary.tests_seen += 1;
                let verdict = check(session, summary.tests_seen, &expected, probe_limit).await?;
                summary.record(verdict);
            }
        }
    }

    Ok(summary)
}

fn log_summary(fixture: &Path, summary: &RunSummary) {
    tracing::info!(
        "{}: {} tests, {} failed",
        fixture.display(),
        summary.tests_seen,
        summary.tests_failed
    );
}
