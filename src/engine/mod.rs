//! Engine process management
//!
//! Owns the one engine child of a run and the ordered stream pair used to
//! talk to it.

mod session;

pub(crate) use session::read_text_line;
pub use session::{EngineProcess, EngineSession, Session};
