//! Reorder Errors

/// Rejected controller operations. None of them change state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReorderError {
    /// No row with this id in the list
    UnknownItem(u32),
    /// A drag gesture is already open
    DragInProgress,
    /// A rank submission is still waiting for the server
    SubmissionPending,
    /// Operation needs an open drag session
    NoActiveDrag,
    /// Settlement for a submission that is not the pending one
    StaleTicket(u64),
    /// List replacement while dragging or pending
    NotIdle,
}

impl std::fmt::Display for ReorderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReorderError::UnknownItem(id) => write!(f, "Unknown item: {}", id),
            ReorderError::DragInProgress => write!(f, "A drag is already in progress"),
            ReorderError::SubmissionPending => write!(f, "A reorder is still being saved"),
            ReorderError::NoActiveDrag => write!(f, "No drag in progress"),
            ReorderError::StaleTicket(ticket) => write!(f, "Stale submission ticket: {}", ticket),
            ReorderError::NotIdle => write!(f, "List is busy"),
        }
    }
}

impl std::error::Error for ReorderError {}

/// Failure of a remote call. Timeouts, transport errors and non-success
/// responses all end up here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    Network(String),
    Rejected { status: u16, detail: Option<String> },
    Decode(String),
}

impl SubmitError {
    /// Text shown to the user
    pub fn detail(&self) -> String {
        match self {
            SubmitError::Network(msg) => format!("Network error: {}", msg),
            SubmitError::Rejected { status, detail: Some(detail) } => format!("{} ({})", detail, status),
            SubmitError::Rejected { status, detail: None } => format!("Server rejected the change ({})", status),
            SubmitError::Decode(msg) => format!("Unexpected response: {}", msg),
        }
    }
}

impl std::fmt::Display for SubmitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.detail())
    }
}

impl std::error::Error for SubmitError {}
