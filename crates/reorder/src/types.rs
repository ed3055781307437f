//! Reorder Types
//!
//! Wire and session types shared by the controller, the server and the UI.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A ranked entry of a queue (matches the server wire format)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderedItem {
    pub id: u32,
    /// 1-based, contiguous within one list
    pub rank: u32,
    pub label: String,
    /// Free-form display payload (dimensions, species, ...)
    #[serde(default)]
    pub details: BTreeMap<String, String>,
}

impl OrderedItem {
    pub fn new(id: u32, rank: u32, label: impl Into<String>) -> Self {
        Self {
            id,
            rank,
            label: label.into(),
            details: BTreeMap::new(),
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

/// One (id, rank) pair of a rank submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankAssignment {
    pub id: u32,
    pub rank: u32,
}

/// Ordered items captured right before a drag starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSnapshot {
    pub items: Vec<OrderedItem>,
}

/// Where the dragged row goes relative to the row under the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Before,
    After,
}

/// Candidate drop location: a row plus a side of it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertionPoint {
    pub row_id: u32,
    pub placement: Placement,
}

/// Vertical geometry of one rendered row, in client coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowBounds {
    pub id: u32,
    pub top: f64,
    pub height: f64,
}

impl RowBounds {
    pub fn contains(&self, y: f64) -> bool {
        y >= self.top && y < self.top + self.height
    }

    pub fn midpoint(&self) -> f64 {
        self.top + self.height / 2.0
    }
}

/// State of one in-progress drag gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragSession {
    pub item_id: u32,
    pub origin_index: usize,
    pub candidate: Option<InsertionPoint>,
}

/// Controller phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Dragging,
    /// A rank submission is in flight
    Pending,
}

/// Short highlight shown on a row after a submission settles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flash {
    Success,
    Error,
}

impl Flash {
    pub fn class_name(&self) -> &'static str {
        match self {
            Flash::Success => "success-flash",
            Flash::Error => "error-flash",
        }
    }
}

/// Handle used to clear a flash once its timer fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashTicket {
    pub row_id: u32,
    pub generation: u64,
}

/// Per-row visual state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RowFlags {
    pub dragging: bool,
    pub pending: bool,
    pub flash: Option<Flash>,
}

impl RowFlags {
    /// Space separated CSS classes for the row
    pub fn class_list(&self) -> String {
        let mut classes = Vec::new();
        if self.dragging {
            classes.push("dragging");
        }
        if self.pending {
            classes.push("pending");
        }
        if let Some(flash) = self.flash {
            classes.push(flash.class_name());
        }
        classes.join(" ")
    }
}

/// A row as the rendering layer should draw it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub item: OrderedItem,
    pub flags: RowFlags,
}

/// A rank update waiting for the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub list_id: u32,
    pub ticket: u64,
    pub moved_id: u32,
    pub ranks: Vec<RankAssignment>,
}

/// Result of `complete_drag`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// Dropped at its own position; nothing to send
    Unchanged,
    /// Released outside any row
    Cancelled,
    Submitted(Submission),
}

/// What the UI has to do after a submission settled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    pub flash: FlashTicket,
    /// Rejection detail to show to the user
    pub error: Option<String>,
}
