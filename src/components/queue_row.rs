//! Queue Row Component
//!
//! One job in a station queue: rank badge, label, details, delete button.

use leptos::prelude::*;
use leptos::task::spawn_local;

use reorder::OrderedItem;
use crate::commands;
use crate::context::AppContext;
use crate::components::DeleteConfirmButton;

/// A single job row
#[component]
pub fn QueueRow(
    item: OrderedItem,
    /// Submission in flight for this row; hides destructive actions
    pending: bool,
) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");

    let id = item.id;
    let details = item
        .details
        .iter()
        .map(|(key, value)| view! {
            <span class="job-detail">
                <span class="job-detail-key">{key.clone()}</span>
                {value.clone()}
            </span>
        })
        .collect_view();

    let on_delete = move |_: ()| {
        spawn_local(async move {
            match commands::delete_queue_item(id).await {
                Ok(()) => ctx.reload(),
                Err(e) => ctx.show_toast(e.detail()),
            }
        });
    };

    view! {
        <div class="queue-row">
            <span class="rank-badge">{item.rank}</span>
            <span class="job-label">{item.label.clone()}</span>
            <span class="job-details">{details}</span>
            {(!pending).then(|| view! {
                <DeleteConfirmButton button_class="delete-btn" on_confirm=on_delete />
            })}
        </div>
    }
}
