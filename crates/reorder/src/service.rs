//! Remote Rank Service
//!
//! The two endpoints a reorder needs. Implementations live next to the
//! transport (the UI uses browser fetch). Not `Send`: the browser runs
//! everything on one thread.

use std::future::Future;

use async_trait::async_trait;
use futures::future::{select, Either};

use crate::error::SubmitError;
use crate::types::{OrderedItem, RankAssignment};

#[async_trait(?Send)]
pub trait RankService {
    /// Current list in server order
    async fn fetch_list(&self, list_id: u32) -> Result<Vec<OrderedItem>, SubmitError>;

    /// Apply new ranks for the changed entries of a list
    async fn submit_ranks(&self, list_id: u32, ranks: &[RankAssignment]) -> Result<(), SubmitError>;
}

/// How long a rank submission may stay unanswered
pub const SUBMIT_TIMEOUT_MS: u32 = 10_000;

/// Run `request` until `deadline` completes. An expired deadline is a
/// `SubmitError::Network("timeout")`, so it settles like any other failure.
pub async fn with_deadline<T, R, D>(request: R, deadline: D) -> Result<T, SubmitError>
where
    R: Future<Output = Result<T, SubmitError>>,
    D: Future<Output = ()>,
{
    futures::pin_mut!(request, deadline);
    match select(request, deadline).await {
        Either::Left((result, _)) => result,
        Either::Right(((), _)) => Err(SubmitError::Network("timeout".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::time::Duration;

    use super::*;
    use crate::controller::ReorderController;
    use crate::ranks;
    use crate::types::{DropOutcome, Phase, RowBounds};

    /// In-memory server keeping ranks dense, like the real one
    struct FakeServer {
        items: RefCell<Vec<OrderedItem>>,
        reject: Cell<bool>,
        submissions: Cell<usize>,
    }

    impl FakeServer {
        fn new(labels: &[&str]) -> Self {
            let items = labels
                .iter()
                .enumerate()
                .map(|(idx, label)| OrderedItem::new(idx as u32 + 1, idx as u32 + 1, *label))
                .collect();
            Self { items: RefCell::new(items), reject: Cell::new(false), submissions: Cell::new(0) }
        }

        /// Another client removes a row; the rest closes up
        fn remove(&self, id: u32) {
            let mut items = self.items.borrow_mut();
            items.retain(|item| item.id != id);
            ranks::sort_by_rank(&mut items);
            ranks::renumber(&mut items);
        }
    }

    #[async_trait(?Send)]
    impl RankService for FakeServer {
        async fn fetch_list(&self, _list_id: u32) -> Result<Vec<OrderedItem>, SubmitError> {
            let mut items = self.items.borrow().clone();
            ranks::sort_by_rank(&mut items);
            Ok(items)
        }

        async fn submit_ranks(&self, _list_id: u32, assignments: &[RankAssignment]) -> Result<(), SubmitError> {
            self.submissions.set(self.submissions.get() + 1);
            if self.reject.get() {
                return Err(SubmitError::Rejected { status: 409, detail: Some("queue changed".to_string()) });
            }
            let mut updated = self.items.borrow().clone();
            for assignment in assignments {
                let Some(item) = updated.iter_mut().find(|item| item.id == assignment.id) else {
                    return Err(SubmitError::Rejected {
                        status: 404,
                        detail: Some(format!("Not found: Queue item {}", assignment.id)),
                    });
                };
                item.rank = assignment.rank;
            }
            if !ranks::is_dense(updated.iter().map(|item| item.rank)) {
                return Err(SubmitError::Rejected { status: 409, detail: Some("ranks changed".to_string()) });
            }
            *self.items.borrow_mut() = updated;
            Ok(())
        }
    }

    fn layout(ctrl: &ReorderController) -> Vec<RowBounds> {
        ctrl.items()
            .iter()
            .enumerate()
            .map(|(idx, item)| RowBounds { id: item.id, top: idx as f64 * 30.0, height: 30.0 })
            .collect()
    }

    async fn drag_and_send(
        ctrl: &mut ReorderController,
        server: &FakeServer,
        item_id: u32,
        pointer_y: f64,
    ) -> Option<String> {
        ctrl.begin_drag(item_id).unwrap();
        let rows = layout(ctrl);
        ctrl.update_drag_position(pointer_y, &rows);
        match ctrl.complete_drag().unwrap() {
            DropOutcome::Submitted(submission) => {
                let result = server.submit_ranks(submission.list_id, &submission.ranks).await;
                ctrl.settle(submission.ticket, result).unwrap().error
            }
            _ => None,
        }
    }

    #[tokio::test]
    async fn test_confirmed_reorder_matches_server() {
        let server = FakeServer::new(&["Oak", "Pine", "Ash", "Elm"]);
        let mut ctrl = ReorderController::new(1, server.fetch_list(1).await.unwrap());

        // Elm into the upper half of Pine
        let error = drag_and_send(&mut ctrl, &server, 4, 35.0).await;
        assert_eq!(error, None);
        assert_eq!(ctrl.items(), server.fetch_list(1).await.unwrap().as_slice());
        let labels: Vec<&str> = ctrl.items().iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, vec!["Oak", "Elm", "Pine", "Ash"]);
    }

    #[tokio::test]
    async fn test_rejected_reorder_matches_server() {
        let server = FakeServer::new(&["Oak", "Pine", "Ash"]);
        let mut ctrl = ReorderController::new(1, server.fetch_list(1).await.unwrap());
        server.reject.set(true);

        let error = drag_and_send(&mut ctrl, &server, 1, 85.0).await;
        assert_eq!(error.as_deref(), Some("queue changed (409)"));
        assert_eq!(ctrl.items(), server.fetch_list(1).await.unwrap().as_slice());
    }

    #[tokio::test]
    async fn test_no_op_sends_nothing() {
        let server = FakeServer::new(&["Oak", "Pine", "Ash"]);
        let mut ctrl = ReorderController::new(1, server.fetch_list(1).await.unwrap());
        let before = ctrl.items().to_vec();

        drag_and_send(&mut ctrl, &server, 2, 50.0).await;
        assert_eq!(server.submissions.get(), 0);
        assert_eq!(ctrl.items(), before.as_slice());
    }

    #[tokio::test]
    async fn test_refetch_after_rejection_recovers_from_drift() {
        let server = FakeServer::new(&["Oak", "Pine", "Ash"]);
        let mut ctrl = ReorderController::new(1, server.fetch_list(1).await.unwrap());
        server.remove(3);

        // Oak to the end of the now stale local list
        let error = drag_and_send(&mut ctrl, &server, 1, 85.0).await;
        assert_eq!(error.as_deref(), Some("Not found: Queue item 3 (404)"));
        assert_eq!(ctrl.items().len(), 3);
        assert_eq!(ctrl.phase(), Phase::Idle);

        ctrl.load(server.fetch_list(1).await.unwrap()).unwrap();
        assert_eq!(ctrl.items(), server.fetch_list(1).await.unwrap().as_slice());

        // Oak below Pine now goes through
        let error = drag_and_send(&mut ctrl, &server, 1, 55.0).await;
        assert_eq!(error, None);
        assert_eq!(ctrl.items(), server.fetch_list(1).await.unwrap().as_slice());
        let labels: Vec<&str> = ctrl.items().iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, vec!["Pine", "Oak"]);
    }

    #[tokio::test]
    async fn test_deadline_expiry_is_network_timeout() {
        let result = with_deadline(
            futures::future::pending::<Result<(), SubmitError>>(),
            tokio::time::sleep(Duration::from_millis(5)),
        )
        .await;
        assert_eq!(result, Err(SubmitError::Network("timeout".to_string())));
    }

    #[tokio::test]
    async fn test_answer_before_deadline_wins() {
        let server = FakeServer::new(&["Oak", "Pine"]);
        let items = with_deadline(server.fetch_list(1), tokio::time::sleep(Duration::from_secs(30)))
            .await
            .unwrap();
        assert_eq!(items.len(), 2);
    }

    #[tokio::test]
    async fn test_unanswered_submission_rolls_back_and_unlocks() {
        let server = FakeServer::new(&["Oak", "Pine", "Ash"]);
        let mut ctrl = ReorderController::new(1, server.fetch_list(1).await.unwrap());
        let before = ctrl.items().to_vec();

        ctrl.begin_drag(1).unwrap();
        let rows = layout(&ctrl);
        ctrl.update_drag_position(85.0, &rows);
        let DropOutcome::Submitted(submission) = ctrl.complete_drag().unwrap() else {
            panic!("expected a submission");
        };
        assert_eq!(ctrl.begin_drag(2), Err(crate::error::ReorderError::SubmissionPending));

        let result = with_deadline(
            futures::future::pending::<Result<(), SubmitError>>(),
            tokio::time::sleep(Duration::from_millis(5)),
        )
        .await;
        let settlement = ctrl.settle(submission.ticket, result).unwrap();
        assert_eq!(settlement.error.as_deref(), Some("Network error: timeout"));
        assert_eq!(ctrl.items(), before.as_slice());
        assert_eq!(ctrl.phase(), Phase::Idle);
        assert!(ctrl.begin_drag(2).is_ok());
    }
}
