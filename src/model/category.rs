use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Status, UserId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: u64,
    pub name: String,
    pub status: Status,
    /// Shown in the navigation bar instead of the plain category list
    pub is_nav: bool,
    pub owner: UserId,
    pub created_time: DateTime<Utc>,
}

impl Category {
    pub fn new(name: &str, is_nav: bool) -> Self {
        Category {
            id: 0,
            name: name.to_string(),
            status: Status::Normal,
            is_nav,
            owner: UserId::default(),
            created_time: Utc::now(),
        }
    }
}
