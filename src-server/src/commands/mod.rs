//! Commands Layer
//!
//! Transport-independent handlers that bridge the HTTP routes to the
//! repositories.

mod station_cmd;
mod queue_cmd;

pub use station_cmd::*;
pub use queue_cmd::*;
