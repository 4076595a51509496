//! Configuration file handling
//!
//! Every field has a default, so a run with no `regress.toml` and no flags
//! builds `antares-3` with `make ... DEBUG=1` and replays
//! `regression_tests.txt` from the working directory.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::{Error, Result};

/// Config file picked up from the working directory when present
pub const DEFAULT_CONFIG_FILE: &str = "regress.toml";

/// Main configuration structure
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Fixture file replayed against the engine
    #[serde(default = "default_fixture")]
    pub fixture: PathBuf,

    /// Build step settings
    #[serde(default)]
    pub build: BuildConfig,

    /// Engine process settings
    #[serde(default)]
    pub engine: EngineConfig,

    /// Timeout settings
    #[serde(default)]
    pub timeouts: Timeouts,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fixture: default_fixture(),
            build: BuildConfig::default(),
            engine: EngineConfig::default(),
            timeouts: Timeouts::default(),
        }
    }
}

fn default_fixture() -> PathBuf {
    PathBuf::from("regression_tests.txt")
}

/// Build step settings
#[derive(Debug, Deserialize)]
pub struct BuildConfig {
    /// Build tool, resolved on PATH
    #[serde(default = "default_build_program")]
    pub program: String,

    /// Target passed as the first argument
    #[serde(default = "default_build_target")]
    pub target: String,

    /// Extra arguments after the target
    #[serde(default = "default_build_flags")]
    pub flags: Vec<String>,

    /// Skip the build and use whatever binary is already there
    #[serde(default)]
    pub skip: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            program: default_build_program(),
            target: default_build_target(),
            flags: default_build_flags(),
            skip: false,
        }
    }
}

fn default_build_program() -> String {
    "make".to_string()
}
fn default_build_target() -> String {
    "antares-3".to_string()
}
fn default_build_flags() -> Vec<String> {
    vec!["DEBUG=1".to_string()]
}

/// Engine process settings
#[derive(Debug, Deserialize)]
pub struct EngineConfig {
    /// Path to the engine executable
    #[serde(default = "default_engine_binary")]
    pub binary: PathBuf,

    /// Arguments passed to the engine
    #[serde(default)]
    pub args: Vec<String>,

    /// Directive written for every blank fixture line
    #[serde(default = "default_reset_command")]
    pub reset_command: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            binary: default_engine_binary(),
            args: Vec::new(),
            reset_command: default_reset_command(),
        }
    }
}

fn default_engine_binary() -> PathBuf {
    PathBuf::from("./antares-3")
}
fn default_reset_command() -> String {
    "clearboard".to_string()
}

/// Timeout settings in seconds
#[derive(Debug, Deserialize)]
pub struct Timeouts {
    /// How long one expectation waits for a result line (0 waits forever)
    #[serde(default = "default_probe")]
    pub probe_secs: u64,

    /// Grace period for the engine to exit once its input is closed
    #[serde(default = "default_shutdown")]
    pub shutdown_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            probe_secs: default_probe(),
            shutdown_secs: default_shutdown(),
        }
    }
}

fn default_probe() -> u64 {
    60
}
fn default_shutdown() -> u64 {
    5
}

impl Timeouts {
    /// Probe timeout, `None` when disabled
    pub fn probe(&self) -> Option<Duration> {
        (self.probe_secs > 0).then(|| Duration::from_secs(self.probe_secs))
    }

    pub fn shutdown(&self) -> Duration {
        Duration::from_secs(self.shutdown_secs)
    }
}

/// Command-line values that take precedence over the config file
#[derive(Debug, Default)]
pub struct Overrides {
    pub fixture: Option<PathBuf>,
    pub engine: Option<PathBuf>,
    pub no_build: bool,
    pub probe_secs: Option<u64>,
}

impl Config {
    /// Load configuration
    ///
    /// An explicit path must exist. Without one, `regress.toml` in the
    /// working directory is used if present, otherwise the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::from_file(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Parse a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::file_read(path, &e))?;
        tracing::debug!("Loaded config from {}", path.display());
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::ConfigParse(e.to_string()))
    }

    /// Apply command-line overrides on top of the loaded values
    pub fn apply(&mut self, overrides: Overrides) -> Result<()> {
        if let Some(fixture) = overrides.fixture {
            self.fixture = fixture;
        }
        if let Some(engine) = overrides.engine {
            self.engine.binary = engine;
        }
        if overrides.no_build {
            self.build.skip = true;
        }
        if let Some(secs) = overrides.probe_secs {
            self.timeouts.probe_secs = secs;
        }
        self.validate()
    }

    fn validate(&self) -> Result<()> {
        if self.engine.reset_command.trim().is_empty() {
            return Err(Error::Config("engine.reset_command must not be empty".to_string()));
        }
        if !self.build.skip && self.build.program.trim().is_empty() {
            return Err(Error::Config("build.program must not be empty".to_string()));
        }
        Ok(())
    }
}
