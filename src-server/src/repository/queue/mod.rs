//! Queue Repository Module
//!
//! - queue_repo: Core CRUD operations
//! - queue_ranking: Ordered reads and rank updates

mod queue_repo;
mod queue_ranking;

pub use queue_repo::QueueRepository;
pub use queue_ranking::QueueRankingOperations;
