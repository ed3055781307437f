//! Drag Ghost Component
//!
//! Floating copy of the dragged row's label that follows the pointer.

use leptos::prelude::*;
use leptos_dragdrop::DndSignals;
use reorder::ReorderController;

/// Offset from the pointer so the ghost never covers the row under it
const GHOST_OFFSET_PX: i32 = 12;

#[component]
pub fn DragGhost(dnd: DndSignals, queue: RwSignal<ReorderController>) -> impl IntoView {
    let label = move || {
        let id = dnd.dragging_id_read.get()?;
        queue.with(|ctrl| ctrl.items().iter().find(|item| item.id == id).map(|item| item.label.clone()))
    };

    move || {
        label().map(|text| {
            let style = move || {
                let (x, y) = dnd.pointer_read.get();
                format!("left: {}px; top: {}px;", x + GHOST_OFFSET_PX, y + GHOST_OFFSET_PX)
            };
            view! { <div class="drag-ghost" style=style>{text}</div> }
        })
    }
}
