//! Common utilities shared by the driver and the binaries

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
