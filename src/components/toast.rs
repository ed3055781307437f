//! Toast Component
//!
//! Transient message line at the bottom of the page (rejection details, load errors).

use leptos::prelude::*;

use crate::context::AppContext;

#[component]
pub fn Toast() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");

    move || {
        ctx.toast.get().map(|message| view! {
            <div class="toast" role="alert" on:click=move |_| ctx.dismiss_toast()>
                {message}
            </div>
        })
    }
}
