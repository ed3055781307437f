//! Application Context
//!
//! Shared state provided via Leptos Context API.

use leptos::prelude::*;

/// App-wide signals provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Trigger to reload the queue from the server - read
    pub reload_trigger: ReadSignal<u32>,
    /// Trigger to reload the queue from the server - write
    set_reload_trigger: WriteSignal<u32>,
    /// Station whose queue is shown
    pub current_station: ReadSignal<u32>,
    /// Transient message shown in the toast
    pub toast: ReadSignal<Option<String>>,
    set_toast: WriteSignal<Option<String>>,
}

/// How long a toast stays up
const TOAST_DURATION_MS: u32 = 4000;

impl AppContext {
    pub fn new(
        reload_trigger: (ReadSignal<u32>, WriteSignal<u32>),
        current_station: ReadSignal<u32>,
        toast: (ReadSignal<Option<String>>, WriteSignal<Option<String>>),
    ) -> Self {
        Self {
            reload_trigger: reload_trigger.0,
            set_reload_trigger: reload_trigger.1,
            current_station,
            toast: toast.0,
            set_toast: toast.1,
        }
    }

    /// Trigger a reload of the queue
    pub fn reload(&self) {
        self.set_reload_trigger.update(|v| *v += 1);
    }

    /// Show a message, cleared automatically unless replaced
    pub fn show_toast(&self, message: String) {
        let set_toast = self.set_toast;
        let toast = self.toast;
        set_toast.set(Some(message.clone()));
        leptos::task::spawn_local(async move {
            gloo_timers::future::TimeoutFuture::new(TOAST_DURATION_MS).await;
            if toast.get_untracked().as_deref() == Some(message.as_str()) {
                set_toast.set(None);
            }
        });
    }

    pub fn dismiss_toast(&self) {
        self.set_toast.set(None);
    }
}
