use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::UserId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    /// Opaque reference to the commented resource, usually the page path
    pub target: String,
    pub nickname: String,
    pub content: String,
    pub website: String,
    pub owner: UserId,
    pub created_time: DateTime<Utc>,
}

impl Comment {
    pub fn new(target: &str, nickname: &str, content: &str) -> Self {
        Comment {
            id: 0,
            target: target.to_string(),
            nickname: nickname.to_string(),
            content: content.to_string(),
            website: String::new(),
            owner: UserId::default(),
            created_time: Utc::now(),
        }
    }
}
