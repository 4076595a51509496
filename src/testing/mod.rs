//! Regression test driver
//!
//! Builds the engine, replays a fixture file against it and checks every
//! expectation line against the result the engine prints.

mod builder;
mod fixture;
mod runner;
mod verifier;

pub use builder::build_engine;
pub use fixture::{ExpectedRecord, FixtureLine, EXPECTATION_MARKER};
pub use runner::{replay, run, RunSummary};
pub use verifier::{check, probe, ResultRecord, Verdict};
