//! Station Entity
//!
//! A production station owns exactly one priority queue.

use serde::{Deserialize, Serialize};
use super::entity::Entity;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    pub id: u32,
    pub name: String,
}

impl Station {
    pub fn new(id: u32, name: String) -> Self {
        Self { id, name }
    }
}

impl Entity for Station {
    type Id = u32;
    const KIND: &'static str = "Station";

    fn id(&self) -> Self::Id {
        self.id
    }
}
