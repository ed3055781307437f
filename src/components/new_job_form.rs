//! New Job Form Component
//!
//! Appends a job to the end of the current station's queue.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::commands::{self, CreateQueueItemArgs};
use crate::context::AppContext;

/// Treat blank optional fields as absent
fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

#[component]
pub fn NewJobForm() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");

    let (label, set_label) = signal(String::new());
    let (dimensions, set_dimensions) = signal(String::new());
    let (species, set_species) = signal(String::new());

    let create_job = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let text = label.get();
        if text.trim().is_empty() { return; }
        let station = ctx.current_station.get();
        if station == 0 { return; }
        let dims = dimensions.get();
        let wood = species.get();

        spawn_local(async move {
            let args = CreateQueueItemArgs {
                label: text.trim(),
                dimensions: non_empty(&dims),
                species: non_empty(&wood),
            };
            match commands::create_queue_item(station, &args).await {
                Ok(_) => {
                    set_label.set(String::new());
                    set_dimensions.set(String::new());
                    set_species.set(String::new());
                    ctx.reload();
                }
                Err(e) => ctx.show_toast(e.detail()),
            }
        });
    };

    view! {
        <form class="new-job-form" on:submit=create_job>
            <input
                type="text"
                placeholder="Job label..."
                prop:value=move || label.get()
                on:input=move |ev| set_label.set(event_target_value(&ev))
            />
            <input
                type="text"
                class="small"
                placeholder="Dimensions"
                prop:value=move || dimensions.get()
                on:input=move |ev| set_dimensions.set(event_target_value(&ev))
            />
            <input
                type="text"
                class="small"
                placeholder="Species"
                prop:value=move || species.get()
                on:input=move |ev| set_species.set(event_target_value(&ev))
            />
            <button type="submit">"Add"</button>
        </form>
    }
}
