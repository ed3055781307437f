//! Optimistic Reordering
//!
//! A per-list controller that applies drag-and-drop moves locally, hands the
//! changed ranks to the caller for submission, and rolls back to a snapshot
//! when the server says no.
//!
//! Layers:
//! - types: wire and session types
//! - ranks: dense rank arithmetic
//! - controller: the drag state machine
//! - service: remote endpoints trait

mod controller;
mod error;
pub mod ranks;
mod service;
mod types;

pub use controller::{ReorderController, FLASH_DURATION_MS};
pub use error::{ReorderError, SubmitError};
pub use service::{with_deadline, RankService, SUBMIT_TIMEOUT_MS};
pub use types::{
    DragSession, DropOutcome, Flash, FlashTicket, InsertionPoint, ListSnapshot, OrderedItem,
    Phase, Placement, RankAssignment, RowBounds, RowFlags, RowView, Settlement, Submission,
};
