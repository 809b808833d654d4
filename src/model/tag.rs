use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Status, UserId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: u64,
    pub name: String,
    pub status: Status,
    pub owner: UserId,
    pub created_time: DateTime<Utc>,
}

impl Tag {
    pub fn new(name: &str) -> Self {
        Tag {
            id: 0,
            name: name.to_string(),
            status: Status::Normal,
            owner: UserId::default(),
            created_time: Utc::now(),
        }
    }
}
