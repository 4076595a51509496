//! Fixture line types
//!
//! A fixture is a plain text file with one directive per line:
//!
//! ```text
//! play a1          <- forwarded to the engine verbatim
//!                  <- blank: reset the board
//! > 5:abcab        <- expectation: <length>:<moves>
//! ```

use crate::common::{Error, Result};

/// Marker that starts an expectation line
pub const EXPECTATION_MARKER: char = '>';

/// One classified fixture line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixtureLine<'a> {
    /// Text forwarded to the engine as-is
    Command(&'a str),
    /// Blank line, sends the reset directive
    Reset,
    /// Expected result payload with the marker stripped
    Expectation(&'a str),
}

impl<'a> FixtureLine<'a> {
    /// Classify a raw fixture line (terminator included or not)
    pub fn classify(raw: &'a str) -> Self {
        let line = raw.trim_end_matches(['\n', '\r']);
        if line.trim().is_empty() {
            Self::Reset
        } else if let Some(payload) = line.strip_prefix(EXPECTATION_MARKER) {
            Self::Expectation(payload.trim())
        } else {
            Self::Command(line)
        }
    }
}

/// Expected result of one test, parsed from an expectation payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedRecord {
    /// Length as literal text; compared textually, never numerically
    pub length: String,
    pub moves: String,
}

impl ExpectedRecord {
    /// Parse `<length>:<moves>`
    ///
    /// `line` is the 1-based fixture line number, used for the error.
    pub fn parse(payload: &str, line: usize) -> Result<Self> {
        let malformed = || Error::MalformedExpectation {
            line,
            text: payload.to_string(),
        };

        let (length, moves) = payload.split_once(':').ok_or_else(malformed)?;
        if moves.contains(':') {
            return Err(malformed());
        }

        Ok(Self {
            length: length.to_string(),
            moves: moves.to_string(),
        })
    }
}

impl std::fmt::Display for ExpectedRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.length, self.moves)
    }
}
