use std::io;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::UserId;
use crate::render::render_content_html;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Normal,
    Deleted,
    Draft,
}

impl PostStatus {
    pub fn label(&self) -> &'static str {
        match self {
            PostStatus::Normal => "normal",
            PostStatus::Deleted => "deleted",
            PostStatus::Draft => "draft",
        }
    }
}

impl FromStr for PostStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(PostStatus::Normal),
            "deleted" => Ok(PostStatus::Deleted),
            "draft" => Ok(PostStatus::Draft),
            _ => Err(format!("Unknown post status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    pub title: String,
    /// Short description shown in lists
    pub desc: String,
    pub content: String,
    /// Derived from `content` and `is_md` on every save
    pub content_html: String,
    pub status: PostStatus,
    pub is_md: bool,
    /// Pinned to the top
    pub is_top: bool,
    pub pv: u64,
    pub uv: u64,
    pub owner: UserId,
    pub category: u64,
    pub tags: Vec<u64>,
    pub created_time: DateTime<Utc>,
}

impl Post {
    pub fn new(title: &str, category: u64, content: &str) -> Self {
        Post {
            id: 0,
            title: title.to_string(),
            desc: String::new(),
            content: content.to_string(),
            content_html: String::new(),
            status: PostStatus::Normal,
            is_md: false,
            is_top: false,
            pv: 1,
            uv: 1,
            owner: UserId::default(),
            category,
            tags: vec![],
            created_time: Utc::now(),
        }
    }

    pub fn is_normal(&self) -> bool {
        self.status == PostStatus::Normal
    }

    pub fn has_tag(&self, tag_id: u64) -> bool {
        self.tags.contains(&tag_id)
    }

    pub fn render_content(&mut self) -> io::Result<()> {
        self.content_html = render_content_html(&self.content, self.is_md)?;
        Ok(())
    }
}
