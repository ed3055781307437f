//! Queue Board Frontend App
//!
//! Station tabs on top, the selected station's queue below.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::models::Station;
use crate::commands;
use crate::context::AppContext;
use crate::components::{NewJobForm, QueueBoard, StationTabBar, Toast};

#[component]
pub fn App() -> impl IntoView {
    // State
    let (stations, set_stations) = signal(Vec::<Station>::new());
    let (current_station, set_current_station) = signal(0u32); // 0 = none loaded yet
    let (reload_trigger, set_reload_trigger) = signal(0u32);
    let (toast, set_toast) = signal::<Option<String>>(None);

    let ctx = AppContext::new((reload_trigger, set_reload_trigger), current_station, (toast, set_toast));
    provide_context(ctx);

    // Load stations on mount; select the first one
    Effect::new(move |_| {
        spawn_local(async move {
            match commands::list_stations().await {
                Ok(loaded) => {
                    web_sys::console::log_1(&format!("[APP] Loaded {} stations", loaded.len()).into());
                    if current_station.get_untracked() == 0 {
                        if let Some(first) = loaded.first() {
                            set_current_station.set(first.id);
                        }
                    }
                    set_stations.set(loaded);
                }
                Err(e) => ctx.show_toast(e.detail()),
            }
        });
    });

    let station_name = move || {
        let id = current_station.get();
        stations.with(|list| list.iter().find(|s| s.id == id).map(|s| s.name.clone()))
    };

    view! {
        <main class="app-layout">
            <StationTabBar
                stations=stations
                set_stations=set_stations
                set_current_station=set_current_station
            />

            <h1>{move || station_name().unwrap_or_else(|| "Queue".to_string())}</h1>

            <NewJobForm />

            <QueueBoard />

            <Toast />
        </main>
    }
}
