//! UI Components
//!
//! Reusable Leptos components.

mod queue_row;
mod queue_board;
mod new_job_form;
mod station_tab_bar;
mod drag_ghost;
mod toast;
mod delete_confirm_button;

pub use queue_row::QueueRow;
pub use queue_board::QueueBoard;
pub use new_job_form::NewJobForm;
pub use station_tab_bar::StationTabBar;
pub use drag_ghost::DragGhost;
pub use toast::Toast;
pub use delete_confirm_button::DeleteConfirmButton;
