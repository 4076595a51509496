//! Engine regression driver
//!
//! Builds a line-protocol move engine, replays a fixture of commands and
//! board resets against it, and compares the results the engine reports
//! with the expectations recorded in the fixture.

pub mod common;
pub mod engine;
pub mod testing;

// Re-export commonly used types for tests
pub use common::{Error, Result};
pub use testing::RunSummary;
