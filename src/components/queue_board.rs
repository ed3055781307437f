//! Queue Board Component
//!
//! Renders one station queue and drives the reorder controller from mouse
//! gestures: press + move past the threshold starts a drag, every move
//! re-evaluates the drop candidate, release submits, Escape cancels.

use leptos::prelude::*;
use leptos::task::spawn_local;
use gloo_timers::future::TimeoutFuture;

use reorder::{
    with_deadline, DropOutcome, Placement, RankService, ReorderController, RowBounds, Submission,
    FLASH_DURATION_MS, SUBMIT_TIMEOUT_MS,
};
use crate::commands::HttpRankService;
use crate::context::AppContext;
use crate::components::{DragGhost, QueueRow};

use leptos_dragdrop::*;

/// Queue view with drag-to-reorder
#[component]
pub fn QueueBoard() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");

    // One controller per shown station; replaced when the station changes
    let queue = RwSignal::new(ReorderController::new(0, Vec::new()));
    let dnd = create_dnd_signals();

    // Load the queue when the station or trigger changes
    Effect::new(move |_| {
        let trigger = ctx.reload_trigger.get();
        let station = ctx.current_station.get();
        if station == 0 {
            return;
        }
        web_sys::console::log_1(&format!("[QUEUE] Loading station {}, trigger={}", station, trigger).into());
        spawn_local(async move {
            match HttpRankService.fetch_list(station).await {
                Ok(items) => {
                    if ctx.current_station.get_untracked() != station {
                        return;
                    }
                    web_sys::console::log_1(&format!("[QUEUE] Loaded {} jobs", items.len()).into());
                    queue.update(|ctrl| {
                        if ctrl.list_id() != station {
                            *ctrl = ReorderController::new(station, items);
                        } else if let Err(e) = ctrl.load(items) {
                            // Mid-gesture; the next reload picks it up
                            web_sys::console::log_1(&format!("[QUEUE] Reload skipped: {}", e).into());
                        }
                    });
                }
                Err(e) => ctx.show_toast(e.detail()),
            }
        });
    });

    bind_drag_handlers(
        dnd,
        move |id| {
            let begun = queue.try_update(|ctrl| ctrl.begin_drag(id));
            match begun {
                Some(Ok(())) => {
                    web_sys::console::log_1(&format!("[DND] Drag start: {}", id).into());
                    true
                }
                Some(Err(e)) => {
                    web_sys::console::log_1(&format!("[DND] Drag refused: {}", e).into());
                    false
                }
                None => false,
            }
        },
        move |pointer_y, rects| {
            let rows: Vec<RowBounds> = rects
                .into_iter()
                .map(|r| RowBounds { id: r.id, top: r.top, height: r.height })
                .collect();
            let moved = queue.try_update_untracked(|ctrl| {
                let before = ctrl.session().and_then(|s| s.candidate);
                before != ctrl.update_drag_position(pointer_y, &rows)
            });
            // Only notify the view when the candidate actually changed
            if moved == Some(true) {
                queue.notify();
            }
        },
        move || {
            let outcome = queue.try_update(|ctrl| ctrl.complete_drag());
            match outcome {
                Some(Ok(DropOutcome::Submitted(submission))) => {
                    web_sys::console::log_1(&format!(
                        "[DND] Drop: moved={}, submitting {} ranks",
                        submission.moved_id,
                        submission.ranks.len()
                    ).into());
                    spawn_local(submit_and_settle(queue, ctx, submission));
                }
                Some(Ok(DropOutcome::Unchanged)) => {
                    web_sys::console::log_1(&"[DND] Drop on own position".into());
                }
                Some(Ok(DropOutcome::Cancelled)) => {
                    web_sys::console::log_1(&"[DND] Released outside the list".into());
                }
                Some(Err(e)) => {
                    web_sys::console::log_1(&format!("[DND] Drop ignored: {}", e).into());
                }
                None => {}
            }
        },
        move || {
            if let Some(Err(e)) = queue.try_update(|ctrl| ctrl.cancel_drag()) {
                web_sys::console::log_1(&format!("[DND] Cancel ignored: {}", e).into());
            }
        },
    );

    view! {
        <div class="queue-board">
            <Show
                when=move || queue.with(|ctrl| !ctrl.items().is_empty())
                fallback=|| view! { <p class="queue-empty">"No jobs in this queue"</p> }
            >
                <For
                    each=move || queue.with(|ctrl| ctrl.rows())
                    key=|row| (row.item.id, row.item.rank, row.item.label.clone(), row.flags.class_list())
                    children=move |row| {
                        let id = row.item.id;
                        let pending = row.flags.pending;
                        let flag_classes = row.flags.class_list();

                        let drop_class = move || {
                            let candidate = queue.with(|ctrl| ctrl.session().and_then(|s| s.candidate));
                            match candidate {
                                Some(point) if point.row_id == id => match point.placement {
                                    Placement::Before => " drop-before",
                                    Placement::After => " drop-after",
                                },
                                _ => "",
                            }
                        };
                        let row_class = move || {
                            let mut c = String::from("queue-row-wrapper");
                            if !flag_classes.is_empty() {
                                c.push(' ');
                                c.push_str(&flag_classes);
                            }
                            c.push_str(drop_class());
                            c
                        };

                        view! {
                            <div
                                class=row_class
                                data-row-id=id.to_string()
                                on:mousedown=make_on_mousedown(dnd, id)
                            >
                                <QueueRow item=row.item.clone() pending=pending />
                            </div>
                        }
                    }
                />
            </Show>
            <DragGhost dnd=dnd queue=queue />
        </div>
    }
}

/// Send the submission and feed the result back to the controller
async fn submit_and_settle(queue: RwSignal<ReorderController>, ctx: AppContext, submission: Submission) {
    let list_id = submission.list_id;
    let result = with_deadline(
        HttpRankService.submit_ranks(list_id, &submission.ranks),
        TimeoutFuture::new(SUBMIT_TIMEOUT_MS),
    )
    .await;
    if let Err(e) = &result {
        web_sys::console::log_1(&format!("[QUEUE] Submission {} rejected: {}", submission.ticket, e).into());
    }

    let settled = queue
        .try_update(|ctrl| {
            // Station switched while the request was in flight
            if ctrl.list_id() != list_id {
                return None;
            }
            let settlement = ctrl.settle(submission.ticket, result).ok()?;
            let error = ctrl.take_last_error();
            Some((settlement.flash, error))
        })
        .flatten();

    let Some((flash, error)) = settled else {
        web_sys::console::log_1(&format!("[QUEUE] Dropped stale result for ticket {}", submission.ticket).into());
        return;
    };
    if let Some(detail) = error {
        ctx.show_toast(detail);
        // The snapshot may itself be stale (row deleted elsewhere, conflict)
        ctx.reload();
    }

    TimeoutFuture::new(FLASH_DURATION_MS).await;
    queue.update(|ctrl| {
        if ctrl.list_id() == list_id {
            ctrl.clear_flash(flash);
        }
    });
}
