//! Domain Layer
//!
//! Contains all domain entities and core abstractions.

mod entity;
mod station;
mod queue_item;

pub use entity::{Entity, DomainError, DomainResult};
pub use station::Station;
pub use queue_item::QueueItem;
