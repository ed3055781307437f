//! Queue Item Entity
//!
//! One job waiting at a station, ordered by `rank` (1 = next up).

use serde::{Deserialize, Serialize};
use reorder::OrderedItem;
use super::entity::Entity;

/// A queued job with its display payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueItem {
    /// Unique identifier
    pub id: u32,
    /// Owning station (the list this item is ranked in)
    pub station_id: u32,
    /// 1-based position, contiguous within the station
    pub rank: u32,
    pub label: String,
    /// e.g. "2400x200x40"
    pub dimensions: Option<String>,
    /// Wood species or material
    pub species: Option<String>,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}

impl QueueItem {
    /// New item; id and rank are assigned on insert
    pub fn new(station_id: u32, label: String) -> Self {
        Self {
            id: 0,
            station_id,
            rank: 0,
            label,
            dimensions: None,
            species: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Wire representation used by the reorder UI
    pub fn to_ordered(&self) -> OrderedItem {
        let mut item = OrderedItem::new(self.id, self.rank, self.label.clone());
        if let Some(dimensions) = &self.dimensions {
            item = item.with_detail("dimensions", dimensions.clone());
        }
        if let Some(species) = &self.species {
            item = item.with_detail("species", species.clone());
        }
        item
    }
}

impl Entity for QueueItem {
    type Id = u32;
    const KIND: &'static str = "Queue item";

    fn id(&self) -> Self::Id {
        self.id
    }
}
