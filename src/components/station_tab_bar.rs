//! Station Tab Bar Component
//!
//! Tab bar for switching between station queues.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::models::Station;
use crate::commands;
use crate::context::AppContext;

#[component]
pub fn StationTabBar(
    stations: ReadSignal<Vec<Station>>,
    set_stations: WriteSignal<Vec<Station>>,
    set_current_station: WriteSignal<u32>,
) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let (adding, set_adding) = signal(false);
    let (new_name, set_new_name) = signal(String::new());

    let on_add = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let name = new_name.get();
        if name.trim().is_empty() { return; }

        spawn_local(async move {
            match commands::create_station(name.trim()).await {
                Ok(station) => {
                    let id = station.id;
                    set_stations.update(|list| list.push(station));
                    set_current_station.set(id);
                }
                Err(e) => ctx.show_toast(e.detail()),
            }
        });

        set_new_name.set(String::new());
        set_adding.set(false);
    };

    view! {
        <div class="station-tab-bar">
            <For
                each=move || stations.get()
                key=|station| station.id
                children=move |station| {
                    let id = station.id;
                    let tab_class = move || {
                        if ctx.current_station.get() == id { "station-tab active" } else { "station-tab" }
                    };

                    view! {
                        <button class=tab_class on:click=move |_| set_current_station.set(id)>
                            {station.name.clone()}
                        </button>
                    }
                }
            />

            {move || if adding.get() {
                view! {
                    <form class="station-add-form" on:submit=on_add>
                        <input
                            type="text"
                            placeholder="Station name"
                            prop:value=move || new_name.get()
                            on:input=move |ev| set_new_name.set(event_target_value(&ev))
                        />
                        <button type="submit">"+"</button>
                        <button type="button" on:click=move |_| set_adding.set(false)>"×"</button>
                    </form>
                }.into_any()
            } else {
                view! {
                    <button class="station-add-btn" on:click=move |_| set_adding.set(true)>"+"</button>
                }.into_any()
            }}
        </div>
    }
}
