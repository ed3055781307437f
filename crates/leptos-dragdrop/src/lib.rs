//! Leptos DragDrop Utilities
//!
//! Mouse-driven row dragging for Leptos lists.
//! Uses a movement threshold to distinguish click from drag, and reports
//! row geometry on every move so the caller can decide where a drop lands.

use leptos::prelude::*;
use wasm_bindgen::JsCast;

/// Attribute carrying the row id on draggable row elements
pub const ROW_ID_ATTR: &str = "data-row-id";

/// Movement threshold in pixels to start dragging
pub const DRAG_THRESHOLD_PX: i32 = 5;

/// Vertical extent of one rendered row
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RowRect {
    pub id: u32,
    pub top: f64,
    pub height: f64,
}

/// DnD state signals
#[derive(Clone, Copy)]
pub struct DndSignals {
    pub dragging_id_read: ReadSignal<Option<u32>>,
    pub dragging_id_write: WriteSignal<Option<u32>>,
    pub drag_just_ended_read: ReadSignal<bool>,
    pub drag_just_ended_write: WriteSignal<bool>,
    /// Pending item id (mousedown but not yet dragging)
    pub pending_id_read: ReadSignal<Option<u32>>,
    pub pending_id_write: WriteSignal<Option<u32>>,
    /// Start position for movement detection
    pub start_x_read: ReadSignal<i32>,
    pub start_x_write: WriteSignal<i32>,
    pub start_y_read: ReadSignal<i32>,
    pub start_y_write: WriteSignal<i32>,
    /// Last pointer position while dragging (for the floating ghost)
    pub pointer_read: ReadSignal<(i32, i32)>,
    pub pointer_write: WriteSignal<(i32, i32)>,
}

pub fn create_dnd_signals() -> DndSignals {
    let (dragging_id_read, dragging_id_write) = signal(None::<u32>);
    let (drag_just_ended_read, drag_just_ended_write) = signal(false);
    let (pending_id_read, pending_id_write) = signal(None::<u32>);
    let (start_x_read, start_x_write) = signal(0i32);
    let (start_y_read, start_y_write) = signal(0i32);
    let (pointer_read, pointer_write) = signal((0i32, 0i32));
    DndSignals {
        dragging_id_read,
        dragging_id_write,
        drag_just_ended_read,
        drag_just_ended_write,
        pending_id_read,
        pending_id_write,
        start_x_read,
        start_x_write,
        start_y_read,
        start_y_write,
        pointer_read,
        pointer_write,
    }
}

/// End drag operation
pub fn end_drag(dnd: &DndSignals) {
    dnd.dragging_id_write.set(None);
    dnd.pending_id_write.set(None);
    dnd.drag_just_ended_write.set(true);

    // Swallow the click that follows a drag
    if let Some(win) = web_sys::window() {
        let clear = dnd.drag_just_ended_write;
        let cb = wasm_bindgen::closure::Closure::<dyn FnMut()>::new(move || {
            clear.set(false);
        });
        let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(cb.as_ref().unchecked_ref(), 100);
        cb.forget();
    }
}

/// Create mousedown handler for draggable rows
/// Records pending drag with start position
pub fn make_on_mousedown(dnd: DndSignals, item_id: u32) -> impl Fn(web_sys::MouseEvent) + Copy + 'static {
    move |ev: web_sys::MouseEvent| {
        if ev.button() != 0 {
            return;
        }
        // Form controls inside a row keep their own behavior
        if let Some(target) = ev.target() {
            if target.dyn_ref::<web_sys::HtmlInputElement>().is_some() { return; }
            if target.dyn_ref::<web_sys::HtmlButtonElement>().is_some() { return; }
            if target.dyn_ref::<web_sys::HtmlTextAreaElement>().is_some() { return; }
        }
        ev.prevent_default();
        dnd.pending_id_write.set(Some(item_id));
        dnd.start_x_write.set(ev.client_x());
        dnd.start_y_write.set(ev.client_y());
    }
}

/// Bounding boxes of all rendered rows carrying `ROW_ID_ATTR`
pub fn collect_row_rects() -> Vec<RowRect> {
    let Some(doc) = web_sys::window().and_then(|win| win.document()) else {
        return Vec::new();
    };
    let Ok(nodes) = doc.query_selector_all(&format!("[{}]", ROW_ID_ATTR)) else {
        return Vec::new();
    };

    let mut rects = Vec::with_capacity(nodes.length() as usize);
    for idx in 0..nodes.length() {
        let Some(element) = nodes.item(idx).and_then(|node| node.dyn_into::<web_sys::Element>().ok()) else {
            continue;
        };
        let Some(id) = element.get_attribute(ROW_ID_ATTR).and_then(|raw| raw.parse::<u32>().ok()) else {
            continue;
        };
        let rect = element.get_bounding_client_rect();
        rects.push(RowRect { id, top: rect.top(), height: rect.height() });
    }
    rects
}

/// Bind document-level handlers driving a drag.
///
/// - `on_begin(id)`: threshold crossed; return false to refuse the drag
/// - `on_move(pointer_y, rows)`: every move while dragging
/// - `on_drop()`: mouse released while dragging
/// - `on_cancel()`: Escape pressed while dragging
pub fn bind_drag_handlers<B, M, D, C>(dnd: DndSignals, on_begin: B, on_move: M, on_drop: D, on_cancel: C)
where
    B: Fn(u32) -> bool + 'static,
    M: Fn(f64, Vec<RowRect>) + 'static,
    D: Fn() + 'static,
    C: Fn() + 'static,
{
    use wasm_bindgen::closure::Closure;

    let on_mousemove = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |ev: web_sys::MouseEvent| {
        let pending = dnd.pending_id_read.get_untracked();
        let dragging = dnd.dragging_id_read.get_untracked();

        if let (Some(id), None) = (pending, dragging) {
            let dx = (ev.client_x() - dnd.start_x_read.get_untracked()).abs();
            let dy = (ev.client_y() - dnd.start_y_read.get_untracked()).abs();
            if dx <= DRAG_THRESHOLD_PX && dy <= DRAG_THRESHOLD_PX {
                return;
            }
            if !on_begin(id) {
                dnd.pending_id_write.set(None);
                return;
            }
            dnd.dragging_id_write.set(Some(id));
        }

        if dnd.dragging_id_read.get_untracked().is_some() {
            dnd.pointer_write.set((ev.client_x(), ev.client_y()));
            on_move(ev.client_y() as f64, collect_row_rects());
        }
    });

    let on_mouseup = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |_ev: web_sys::MouseEvent| {
        let was_dragging = dnd.dragging_id_read.get_untracked().is_some();
        // Clear pending state first
        dnd.pending_id_write.set(None);
        if was_dragging {
            end_drag(&dnd);
            on_drop();
        }
        // Not dragging: the click event fires naturally on the element
    });

    let on_keydown = Closure::<dyn FnMut(web_sys::KeyboardEvent)>::new(move |ev: web_sys::KeyboardEvent| {
        if ev.key() == "Escape" && dnd.dragging_id_read.get_untracked().is_some() {
            end_drag(&dnd);
            on_cancel();
        }
    });

    if let Some(doc) = web_sys::window().and_then(|win| win.document()) {
        let _ = doc.add_event_listener_with_callback("mousemove", on_mousemove.as_ref().unchecked_ref());
        let _ = doc.add_event_listener_with_callback("mouseup", on_mouseup.as_ref().unchecked_ref());
        let _ = doc.add_event_listener_with_callback("keydown", on_keydown.as_ref().unchecked_ref());
    }
    on_mousemove.forget();
    on_mouseup.forget();
    on_keydown.forget();
}
