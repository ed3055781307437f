//! Reorder Controller
//!
//! Owns the local copy of one ranked list and drives a drag gesture through
//! `Idle -> Dragging -> (Pending) -> Idle`. Moves are applied optimistically;
//! a rejected submission restores the pre-drag snapshot verbatim.

use std::collections::{HashMap, HashSet};

use log::{debug, warn};

use crate::error::{ReorderError, SubmitError};
use crate::ranks;
use crate::types::{
    DragSession, DropOutcome, Flash, FlashTicket, InsertionPoint, ListSnapshot, OrderedItem,
    Phase, Placement, RowBounds, RowFlags, RowView, Settlement, Submission,
};

/// How long a success/error highlight stays on a row
pub const FLASH_DURATION_MS: u32 = 1200;

#[derive(Debug, Clone)]
struct OpenDrag {
    session: DragSession,
    snapshot: ListSnapshot,
}

#[derive(Debug, Clone)]
struct PendingSubmission {
    ticket: u64,
    moved_id: u32,
    rows: HashSet<u32>,
    snapshot: ListSnapshot,
}

/// Controller for a single list. One instance per rendered list.
#[derive(Debug, Clone)]
pub struct ReorderController {
    list_id: u32,
    items: Vec<OrderedItem>,
    drag: Option<OpenDrag>,
    pending: Option<PendingSubmission>,
    flashes: HashMap<u32, (Flash, u64)>,
    next_ticket: u64,
    flash_generation: u64,
    last_error: Option<String>,
}

impl ReorderController {
    pub fn new(list_id: u32, mut items: Vec<OrderedItem>) -> Self {
        ranks::sort_by_rank(&mut items);
        Self {
            list_id,
            items,
            drag: None,
            pending: None,
            flashes: HashMap::new(),
            next_ticket: 0,
            flash_generation: 0,
            last_error: None,
        }
    }

    pub fn list_id(&self) -> u32 {
        self.list_id
    }

    pub fn items(&self) -> &[OrderedItem] {
        &self.items
    }

    pub fn phase(&self) -> Phase {
        if self.pending.is_some() {
            Phase::Pending
        } else if self.drag.is_some() {
            Phase::Dragging
        } else {
            Phase::Idle
        }
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.drag.as_ref().map(|drag| &drag.session)
    }

    /// Snapshot kept for rollback, if any
    pub fn snapshot(&self) -> Option<&ListSnapshot> {
        match (&self.drag, &self.pending) {
            (Some(drag), _) => Some(&drag.snapshot),
            (None, Some(pending)) => Some(&pending.snapshot),
            (None, None) => None,
        }
    }

    pub fn is_pending(&self, id: u32) -> bool {
        self.pending.as_ref().is_some_and(|p| p.rows.contains(&id))
    }

    /// Rejection detail not yet shown to the user
    pub fn take_last_error(&mut self) -> Option<String> {
        self.last_error.take()
    }

    /// Replace the list with a fresh server copy
    pub fn load(&mut self, mut items: Vec<OrderedItem>) -> Result<(), ReorderError> {
        if self.phase() != Phase::Idle {
            return Err(ReorderError::NotIdle);
        }
        ranks::sort_by_rank(&mut items);
        self.flashes.retain(|id, _| items.iter().any(|item| item.id == *id));
        self.items = items;
        debug!("[reorder] list {} loaded with {} items", self.list_id, self.items.len());
        Ok(())
    }

    pub fn begin_drag(&mut self, item_id: u32) -> Result<(), ReorderError> {
        if self.pending.is_some() {
            return Err(ReorderError::SubmissionPending);
        }
        if self.drag.is_some() {
            return Err(ReorderError::DragInProgress);
        }
        let origin_index = self.index_of(item_id).ok_or(ReorderError::UnknownItem(item_id))?;

        self.drag = Some(OpenDrag {
            session: DragSession { item_id, origin_index, candidate: None },
            snapshot: ListSnapshot { items: self.items.clone() },
        });
        debug!("[reorder] list {}: drag start item={} index={}", self.list_id, item_id, origin_index);
        Ok(())
    }

    /// Recompute the candidate drop point from the pointer's vertical position.
    ///
    /// Upper half of a row means "before", lower half (midpoint included)
    /// means "after". Outside every row there is no candidate.
    pub fn update_drag_position(&mut self, pointer_y: f64, rows: &[RowBounds]) -> Option<InsertionPoint> {
        let candidate = rows
            .iter()
            .filter(|row| self.index_of(row.id).is_some())
            .find(|row| row.contains(pointer_y))
            .map(|row| InsertionPoint {
                row_id: row.id,
                placement: if pointer_y < row.midpoint() { Placement::Before } else { Placement::After },
            });

        let drag = self.drag.as_mut()?;
        drag.session.candidate = candidate;
        candidate
    }

    /// Finish the gesture. A real move is applied locally and returned as a
    /// submission the caller must send and later `settle`.
    pub fn complete_drag(&mut self) -> Result<DropOutcome, ReorderError> {
        let drag = self.drag.take().ok_or(ReorderError::NoActiveDrag)?;
        let session = drag.session;

        let Some(candidate) = session.candidate else {
            debug!("[reorder] list {}: released outside rows, cancelled", self.list_id);
            return Ok(DropOutcome::Cancelled);
        };
        let Some(row_index) = self.index_of(candidate.row_id) else {
            return Ok(DropOutcome::Cancelled);
        };
        let insert_at = match candidate.placement {
            Placement::Before => row_index,
            Placement::After => row_index + 1,
        };
        let Some(target) = ranks::move_index(session.origin_index, insert_at) else {
            debug!("[reorder] list {}: item {} dropped in place", self.list_id, session.item_id);
            return Ok(DropOutcome::Unchanged);
        };

        ranks::move_element(&mut self.items, session.origin_index, target);
        ranks::renumber(&mut self.items);
        let changed = ranks::changed_ranks(&drag.snapshot.items, &self.items);

        self.next_ticket += 1;
        let ticket = self.next_ticket;
        self.pending = Some(PendingSubmission {
            ticket,
            moved_id: session.item_id,
            rows: changed.iter().map(|assignment| assignment.id).collect(),
            snapshot: drag.snapshot,
        });
        debug!(
            "[reorder] list {}: item {} moved {} -> {}, submitting {} ranks (ticket {})",
            self.list_id,
            session.item_id,
            session.origin_index,
            target,
            changed.len(),
            ticket
        );

        Ok(DropOutcome::Submitted(Submission {
            list_id: self.list_id,
            ticket,
            moved_id: session.item_id,
            ranks: changed,
        }))
    }

    /// Abandon the gesture. The list was not touched yet.
    pub fn cancel_drag(&mut self) -> Result<(), ReorderError> {
        let drag = self.drag.take().ok_or(ReorderError::NoActiveDrag)?;
        debug!("[reorder] list {}: drag of {} cancelled", self.list_id, drag.session.item_id);
        Ok(())
    }

    pub fn on_server_confirmed(&mut self, ticket: u64) -> Result<Settlement, ReorderError> {
        let pending = self.take_pending(ticket)?;
        debug!("[reorder] list {}: ticket {} confirmed", self.list_id, ticket);
        Ok(Settlement {
            flash: self.flash(pending.moved_id, Flash::Success),
            error: None,
        })
    }

    /// Full rollback to the pre-drag list
    pub fn on_server_rejected(&mut self, ticket: u64, detail: impl Into<String>) -> Result<Settlement, ReorderError> {
        let pending = self.take_pending(ticket)?;
        let detail = detail.into();
        warn!("[reorder] list {}: ticket {} rejected, rolling back: {}", self.list_id, ticket, detail);

        self.items = pending.snapshot.items;
        self.last_error = Some(detail.clone());
        Ok(Settlement {
            flash: self.flash(pending.moved_id, Flash::Error),
            error: Some(detail),
        })
    }

    pub fn settle(&mut self, ticket: u64, result: Result<(), SubmitError>) -> Result<Settlement, ReorderError> {
        match result {
            Ok(()) => self.on_server_confirmed(ticket),
            Err(err) => self.on_server_rejected(ticket, err.detail()),
        }
    }

    /// Drop a flash once its timer fires; a newer flash on the row wins
    pub fn clear_flash(&mut self, ticket: FlashTicket) -> bool {
        match self.flashes.get(&ticket.row_id) {
            Some((_, generation)) if *generation == ticket.generation => {
                self.flashes.remove(&ticket.row_id);
                true
            }
            _ => false,
        }
    }

    /// Rows in display order with their visual flags
    pub fn rows(&self) -> Vec<RowView> {
        let dragging = self.session().map(|s| s.item_id);
        self.items
            .iter()
            .map(|item| RowView {
                item: item.clone(),
                flags: RowFlags {
                    dragging: dragging == Some(item.id),
                    pending: self.is_pending(item.id),
                    flash: self.flashes.get(&item.id).map(|(flash, _)| *flash),
                },
            })
            .collect()
    }

    fn index_of(&self, id: u32) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    fn take_pending(&mut self, ticket: u64) -> Result<PendingSubmission, ReorderError> {
        match self.pending.take() {
            Some(pending) if pending.ticket == ticket => Ok(pending),
            other => {
                self.pending = other;
                Err(ReorderError::StaleTicket(ticket))
            }
        }
    }

    fn flash(&mut self, row_id: u32, flash: Flash) -> FlashTicket {
        self.flash_generation += 1;
        self.flashes.insert(row_id, (flash, self.flash_generation));
        FlashTicket { row_id, generation: self.flash_generation }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RankAssignment;

    const A: u32 = 1;
    const B: u32 = 2;
    const C: u32 = 3;

    fn abc() -> ReorderController {
        ReorderController::new(
            7,
            vec![
                OrderedItem::new(A, 1, "A"),
                OrderedItem::new(B, 2, "B"),
                OrderedItem::new(C, 3, "C"),
            ],
        )
    }

    /// Rows stacked 10px apart in list order
    fn layout(ctrl: &ReorderController) -> Vec<RowBounds> {
        ctrl.items()
            .iter()
            .enumerate()
            .map(|(idx, item)| RowBounds { id: item.id, top: idx as f64 * 10.0, height: 10.0 })
            .collect()
    }

    fn order(ctrl: &ReorderController) -> Vec<(u32, u32)> {
        ctrl.items().iter().map(|i| (i.id, i.rank)).collect()
    }

    fn submitted(outcome: DropOutcome) -> Submission {
        match outcome {
            DropOutcome::Submitted(submission) => submission,
            other => panic!("expected a submission, got {:?}", other),
        }
    }

    #[test]
    fn test_drag_last_before_first() {
        let mut ctrl = abc();
        ctrl.begin_drag(C).unwrap();
        let rows = layout(&ctrl);
        let point = ctrl.update_drag_position(2.0, &rows).unwrap();
        assert_eq!(point, InsertionPoint { row_id: A, placement: Placement::Before });

        let submission = submitted(ctrl.complete_drag().unwrap());
        assert_eq!(order(&ctrl), vec![(C, 1), (A, 2), (B, 3)]);
        assert_eq!(
            submission.ranks,
            vec![
                RankAssignment { id: C, rank: 1 },
                RankAssignment { id: A, rank: 2 },
                RankAssignment { id: B, rank: 3 },
            ]
        );
        assert_eq!(submission.list_id, 7);
        assert_eq!(submission.moved_id, C);
        assert_eq!(ctrl.phase(), Phase::Pending);
    }

    #[test]
    fn test_drop_in_place_is_noop() {
        let mut ctrl = abc();
        let before = ctrl.items().to_vec();

        ctrl.begin_drag(B).unwrap();
        let rows = layout(&ctrl);
        // lower half of B itself
        ctrl.update_drag_position(17.0, &rows);
        assert_eq!(ctrl.complete_drag().unwrap(), DropOutcome::Unchanged);
        assert_eq!(ctrl.items(), before.as_slice());
        assert_eq!(ctrl.phase(), Phase::Idle);

        // lower half of A is the same gap
        ctrl.begin_drag(B).unwrap();
        ctrl.update_drag_position(6.0, &rows);
        assert_eq!(ctrl.complete_drag().unwrap(), DropOutcome::Unchanged);
        assert_eq!(ctrl.items(), before.as_slice());
        assert!(ctrl.snapshot().is_none());
    }

    #[test]
    fn test_rejection_restores_snapshot() {
        let mut ctrl = abc();
        ctrl.begin_drag(A).unwrap();
        let rows = layout(&ctrl);
        ctrl.update_drag_position(28.0, &rows);
        let submission = submitted(ctrl.complete_drag().unwrap());
        assert_eq!(order(&ctrl), vec![(B, 1), (C, 2), (A, 3)]);

        let settlement = ctrl.on_server_rejected(submission.ticket, "conflict").unwrap();
        assert_eq!(order(&ctrl), vec![(A, 1), (B, 2), (C, 3)]);
        assert_eq!(settlement.flash.row_id, A);
        assert_eq!(settlement.error.as_deref(), Some("conflict"));

        let row_a = ctrl.rows().into_iter().find(|r| r.item.id == A).unwrap();
        assert_eq!(row_a.flags.flash, Some(Flash::Error));
        assert!(!row_a.flags.pending);
        assert_eq!(ctrl.phase(), Phase::Idle);
        assert_eq!(ctrl.take_last_error().as_deref(), Some("conflict"));
        assert_eq!(ctrl.take_last_error(), None);
    }

    #[test]
    fn test_confirmation_keeps_new_order() {
        let mut ctrl = abc();
        ctrl.begin_drag(A).unwrap();
        let rows = layout(&ctrl);
        ctrl.update_drag_position(17.0, &rows);
        let submission = submitted(ctrl.complete_drag().unwrap());
        assert!(ctrl.is_pending(A));
        assert!(ctrl.is_pending(B));
        assert!(!ctrl.is_pending(C));

        let settlement = ctrl.on_server_confirmed(submission.ticket).unwrap();
        assert_eq!(settlement.error, None);
        assert_eq!(order(&ctrl), vec![(B, 1), (A, 2), (C, 3)]);
        assert!(ctrl.snapshot().is_none());
        assert_eq!(ctrl.phase(), Phase::Idle);
        assert!(!ctrl.is_pending(A));
    }

    #[test]
    fn test_ranks_dense_after_every_move() {
        let ids: Vec<u32> = (1..=6).collect();
        for from in 0..ids.len() {
            for y in 0..60 {
                let mut ctrl = ReorderController::new(
                    1,
                    ids.iter().map(|id| OrderedItem::new(*id, *id, "x")).collect(),
                );
                ctrl.begin_drag(ids[from]).unwrap();
                let rows = layout(&ctrl);
                ctrl.update_drag_position(y as f64 + 0.5, &rows);
                let outcome = ctrl.complete_drag().unwrap();
                assert!(ranks::is_dense(ctrl.items().iter().map(|i| i.rank)));
                if let DropOutcome::Submitted(submission) = outcome {
                    ctrl.on_server_confirmed(submission.ticket).unwrap();
                }
            }
        }
    }

    #[test]
    fn test_rejection_restores_every_move() {
        let original: Vec<OrderedItem> = (1..=6u32)
            .map(|id| {
                OrderedItem::new(id, id, format!("Job {}", id))
                    .with_detail("dimensions", format!("{}x{}", id * 100, id * 10))
                    .with_detail("species", if id % 2 == 0 { "Oak" } else { "Pine" })
            })
            .collect();

        let mut submissions = 0;
        for from in 1..=6u32 {
            // every integer and half pixel over the rows plus a margin outside them
            for step in -10..140 {
                let y = step as f64 * 0.5;
                let mut ctrl = ReorderController::new(1, original.clone());
                ctrl.begin_drag(from).unwrap();
                let rows = layout(&ctrl);
                ctrl.update_drag_position(y, &rows);
                if let DropOutcome::Submitted(submission) = ctrl.complete_drag().unwrap() {
                    submissions += 1;
                    ctrl.on_server_rejected(submission.ticket, "conflict").unwrap();
                }
                assert_eq!(ctrl.items(), original.as_slice(), "item {} dropped at y={}", from, y);
                assert_eq!(ctrl.phase(), Phase::Idle);
                assert!(ctrl.rows().iter().all(|row| !row.flags.pending && !row.flags.dragging));
            }
        }
        assert!(submissions > 0);
    }

    #[test]
    fn test_single_session_while_pending() {
        let mut ctrl = abc();
        ctrl.begin_drag(C).unwrap();
        let rows = layout(&ctrl);
        ctrl.update_drag_position(1.0, &rows);
        submitted(ctrl.complete_drag().unwrap());

        let items = ctrl.items().to_vec();
        assert_eq!(ctrl.begin_drag(B), Err(ReorderError::SubmissionPending));
        assert_eq!(ctrl.items(), items.as_slice());
        assert!(ctrl.session().is_none());
        assert_eq!(ctrl.phase(), Phase::Pending);
    }

    #[test]
    fn test_second_drag_and_unknown_item_rejected() {
        let mut ctrl = abc();
        assert_eq!(ctrl.begin_drag(42), Err(ReorderError::UnknownItem(42)));
        assert_eq!(ctrl.phase(), Phase::Idle);

        ctrl.begin_drag(A).unwrap();
        assert_eq!(ctrl.begin_drag(B), Err(ReorderError::DragInProgress));
        assert_eq!(ctrl.session().unwrap().item_id, A);
    }

    #[test]
    fn test_cancel_leaves_list_untouched() {
        let mut ctrl = abc();
        let before = ctrl.items().to_vec();
        ctrl.begin_drag(B).unwrap();
        assert!(ctrl.rows()[1].flags.dragging);

        ctrl.cancel_drag().unwrap();
        assert_eq!(ctrl.items(), before.as_slice());
        assert!(ctrl.rows().iter().all(|r| !r.flags.dragging));
        assert_eq!(ctrl.cancel_drag(), Err(ReorderError::NoActiveDrag));
    }

    #[test]
    fn test_release_outside_rows_cancels() {
        let mut ctrl = abc();
        ctrl.begin_drag(A).unwrap();
        let rows = layout(&ctrl);
        ctrl.update_drag_position(12.0, &rows);
        // pointer leaves the list
        assert_eq!(ctrl.update_drag_position(400.0, &rows), None);
        assert_eq!(ctrl.complete_drag().unwrap(), DropOutcome::Cancelled);
        assert_eq!(order(&ctrl), vec![(A, 1), (B, 2), (C, 3)]);
    }

    #[test]
    fn test_midpoint_goes_after() {
        let mut ctrl = abc();
        ctrl.begin_drag(A).unwrap();
        let rows = layout(&ctrl);
        let point = ctrl.update_drag_position(25.0, &rows).unwrap();
        assert_eq!(point, InsertionPoint { row_id: C, placement: Placement::After });
        let point = ctrl.update_drag_position(24.9, &rows).unwrap();
        assert_eq!(point, InsertionPoint { row_id: C, placement: Placement::Before });
    }

    #[test]
    fn test_update_without_session_changes_nothing() {
        let mut ctrl = abc();
        let rows = layout(&ctrl);
        assert_eq!(ctrl.update_drag_position(2.0, &rows), None);
        assert_eq!(ctrl.complete_drag(), Err(ReorderError::NoActiveDrag));
    }

    #[test]
    fn test_stale_ticket_is_rejected() {
        let mut ctrl = abc();
        ctrl.begin_drag(C).unwrap();
        let rows = layout(&ctrl);
        ctrl.update_drag_position(1.0, &rows);
        let submission = submitted(ctrl.complete_drag().unwrap());

        assert_eq!(
            ctrl.on_server_confirmed(submission.ticket + 1),
            Err(ReorderError::StaleTicket(submission.ticket + 1))
        );
        assert_eq!(ctrl.phase(), Phase::Pending);
        ctrl.settle(submission.ticket, Ok(())).unwrap();
        assert_eq!(ctrl.phase(), Phase::Idle);
    }

    #[test]
    fn test_settle_error_rolls_back() {
        let mut ctrl = abc();
        ctrl.begin_drag(C).unwrap();
        let rows = layout(&ctrl);
        ctrl.update_drag_position(1.0, &rows);
        let submission = submitted(ctrl.complete_drag().unwrap());

        let settlement = ctrl
            .settle(submission.ticket, Err(SubmitError::Network("timeout".to_string())))
            .unwrap();
        assert_eq!(settlement.error.as_deref(), Some("Network error: timeout"));
        assert_eq!(order(&ctrl), vec![(A, 1), (B, 2), (C, 3)]);
    }

    #[test]
    fn test_flash_clears_only_for_latest_generation() {
        let mut ctrl = abc();
        ctrl.begin_drag(A).unwrap();
        let rows = layout(&ctrl);
        ctrl.update_drag_position(28.0, &rows);
        let first = submitted(ctrl.complete_drag().unwrap());
        let old = ctrl.on_server_confirmed(first.ticket).unwrap().flash;

        ctrl.begin_drag(A).unwrap();
        let rows = layout(&ctrl);
        ctrl.update_drag_position(1.0, &rows);
        let second = submitted(ctrl.complete_drag().unwrap());
        let new = ctrl.on_server_rejected(second.ticket, "nope").unwrap().flash;

        assert!(!ctrl.clear_flash(old));
        let row_a = ctrl.rows().into_iter().find(|r| r.item.id == A).unwrap();
        assert_eq!(row_a.flags.flash, Some(Flash::Error));
        assert!(ctrl.clear_flash(new));
        assert!(ctrl.rows().iter().all(|r| r.flags.flash.is_none()));
    }

    #[test]
    fn test_load_requires_idle() {
        let mut ctrl = abc();
        ctrl.begin_drag(A).unwrap();
        assert_eq!(ctrl.load(Vec::new()), Err(ReorderError::NotIdle));
        ctrl.cancel_drag().unwrap();

        ctrl.load(vec![OrderedItem::new(9, 2, "Z"), OrderedItem::new(8, 1, "Y")]).unwrap();
        assert_eq!(order(&ctrl), vec![(8, 1), (9, 2)]);
    }
}
