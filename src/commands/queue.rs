//! Queue Commands
//!
//! Fetching a station queue, adding/removing jobs and submitting ranks.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use reorder::{OrderedItem, RankAssignment, RankService, SubmitError};
use super::{get_json, post_json, send};

// ========================
// Argument Structs
// ========================

#[derive(Serialize)]
pub struct CreateQueueItemArgs<'a> {
    pub label: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub species: Option<&'a str>,
}

#[derive(Serialize)]
struct SubmitRanksArgs<'a> {
    ranks: &'a [RankAssignment],
}

#[derive(Deserialize)]
struct SubmitRanksReply {
    ok: bool,
}

// ========================
// Commands
// ========================

pub async fn list_queue(station_id: u32) -> Result<Vec<OrderedItem>, SubmitError> {
    get_json(&format!("/stations/{}/queue", station_id)).await
}

pub async fn create_queue_item(station_id: u32, args: &CreateQueueItemArgs<'_>) -> Result<OrderedItem, SubmitError> {
    post_json(&format!("/stations/{}/queue", station_id), args).await
}

pub async fn delete_queue_item(id: u32) -> Result<(), SubmitError> {
    send("DELETE", &format!("/queue/{}", id), None).await?;
    Ok(())
}

pub async fn submit_ranks(station_id: u32, ranks: &[RankAssignment]) -> Result<(), SubmitError> {
    let reply: SubmitRanksReply = post_json(&format!("/stations/{}/ranks", station_id), &SubmitRanksArgs { ranks }).await?;
    if reply.ok {
        Ok(())
    } else {
        Err(SubmitError::Rejected { status: 200, detail: None })
    }
}

/// `RankService` over the HTTP endpoints
#[derive(Clone, Copy, Default)]
pub struct HttpRankService;

#[async_trait(?Send)]
impl RankService for HttpRankService {
    async fn fetch_list(&self, list_id: u32) -> Result<Vec<OrderedItem>, SubmitError> {
        list_queue(list_id).await
    }

    async fn submit_ranks(&self, list_id: u32, ranks: &[RankAssignment]) -> Result<(), SubmitError> {
        submit_ranks(list_id, ranks).await
    }
}
