//! Repository Layer
//!
//! Data access abstractions and implementations.

mod traits;
mod db;
mod station_repo;
mod queue;


pub use traits::Repository;
pub use db::{init_db, DbState, SharedConnection};
pub use station_repo::StationRepository;
pub use queue::{QueueRepository, QueueRankingOperations};
