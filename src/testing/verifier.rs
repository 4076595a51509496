//! Result scraping and comparison
//!
//! The engine reports a solved position as
//! `= <calls> calls, length <length>:<moves>`. Anything else it prints is
//! treated as noise and skipped.

use std::collections::BTreeSet;
use std::sync::LazyLock;
use std::time::Duration;

use colored::Colorize;
use regex::Regex;
use tokio::io::{AsyncBufRead, AsyncWrite};

use crate::common::{Error, Result};
use crate::engine::Session;

use super::fixture::ExpectedRecord;

static RESULT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"= (\d+) calls, length (-?\d+):(\S*)").expect("result pattern is valid")
});

/// Result scraped from one engine output line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRecord {
    /// Informational only, never compared; kept as text so any digit run parses
    pub call_count: String,
    /// Length as literal text
    pub length: String,
    pub moves: String,
}

impl ResultRecord {
    /// Parse an engine line, `None` when it is not a result line
    pub fn parse(line: &str) -> Option<Self> {
        let caps = RESULT_LINE.captures(line)?;
        Some(Self {
            call_count: caps[1].to_string(),
            length: caps[2].to_string(),
            moves: caps[3].to_string(),
        })
    }

    /// Whether this result satisfies `expected`
    ///
    /// Lengths must be the same text (`5` and `-5` or `05` differ). Moves
    /// compare as character sets: order and repetition are ignored.
    pub fn satisfies(&self, expected: &ExpectedRecord) -> bool {
        self.length == expected.length && move_set(&self.moves) == move_set(&expected.moves)
    }
}

impl std::fmt::Display for ResultRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.length, self.moves)
    }
}

fn move_set(moves: &str) -> BTreeSet<char> {
    moves.chars().collect()
}

/// Outcome of one expectation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail,
}

/// Read engine output until a result line arrives
///
/// Consumes every line up to and including the result, so the next probe
/// starts right after it. `limit` bounds the wait; `None` waits forever.
pub async fn probe<W, R>(
    session: &mut Session<W, R>,
    test: usize,
    limit: Option<Duration>,
) -> Result<ResultRecord>
where
    W: AsyncWrite + Unpin,
    R: AsyncBufRead + Unpin,
{
    match limit {
        Some(limit) => tokio::time::timeout(limit, scan(session, test))
            .await
            .map_err(|_| Error::ProbeTimeout {
                test,
                secs: limit.as_secs(),
            })?,
        None => scan(session, test).await,
    }
}

async fn scan<W, R>(session: &mut Session<W, R>, test: usize) -> Result<ResultRecord>
where
    W: AsyncWrite + Unpin,
    R: AsyncBufRead + Unpin,
{
    loop {
        let line = session
            .next_line()
            .await?
            .ok_or(Error::EngineTerminated { test })?;

        match ResultRecord::parse(&line) {
            Some(record) => {
                tracing::debug!("engine >>> {}", line);
                return Ok(record);
            }
            None => tracing::trace!("skipping engine output: {}", line),
        }
    }
}

/// Run one expectation: probe, report the call count, compare
pub async fn check<W, R>(
    session: &mut Session<W, R>,
    test: usize,
    expected: &ExpectedRecord,
    limit: Option<Duration>,
) -> Result<Verdict>
where
    W: AsyncWrite + Unpin,
    R: AsyncBufRead + Unpin,
{
    let actual = probe(session, test, limit).await?;
    println!("{}", actual.call_count);

    if actual.satisfies(expected) {
        Ok(Verdict::Pass)
    } else {
        println!(
            "{} got {}; expected {}",
            format!("test {test}:").red(),
            actual,
            expected
        );
        Ok(Verdict::Fail)
    }
}
