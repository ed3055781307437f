//! Frontend Models
//!
//! Data structures matching backend entities. Queue rows use
//! `reorder::OrderedItem` directly.

use serde::{Deserialize, Serialize};

/// Station data structure (matches backend)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: u32,
    pub name: String,
}

/// Error body returned by the server on non-2xx responses
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}
