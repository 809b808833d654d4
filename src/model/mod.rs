use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod category;
pub mod comment;
pub mod post;
pub mod sidebar;
pub mod tag;

pub use category::Category;
pub use comment::Comment;
pub use post::{Post, PostStatus};
pub use sidebar::{DisplayType, SideBar, SideBarStatus};
pub use tag::Tag;

/// User name of the editor owning a row
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        UserId(value.to_string())
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Visibility of categories and tags. Rows are never removed, only marked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Normal,
    Deleted,
}

impl Status {
    pub fn label(&self) -> &'static str {
        match self {
            Status::Normal => "normal",
            Status::Deleted => "deleted",
        }
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(Status::Normal),
            "deleted" => Ok(Status::Deleted),
            _ => Err(format!("Unknown status: {}", s)),
        }
    }
}

/// Rows stored in a table of the content store.
///
/// Id `0` means the row was never saved; the store assigns the real id on insert.
pub trait Record {
    fn id(&self) -> u64;
    fn set_id(&mut self, id: u64);
    fn created_time(&self) -> DateTime<Utc>;
    fn set_created_time(&mut self, created_time: DateTime<Utc>);
}

macro_rules! impl_record {
    ($($t:ty),+) => {
        $(
        impl Record for $t {
            fn id(&self) -> u64 {
                self.id
            }

            fn set_id(&mut self, id: u64) {
                self.id = id;
            }

            fn created_time(&self) -> DateTime<Utc> {
                self.created_time
            }

            fn set_created_time(&mut self, created_time: DateTime<Utc>) {
                self.created_time = created_time;
            }
        }

        impl crate::ownership::Owned for $t {
            fn owner(&self) -> &UserId {
                &self.owner
            }

            fn set_owner(&mut self, owner: UserId) {
                self.owner = owner;
            }
        }
        )+
    };
}

impl_record!(Category, Tag, Post, Comment, SideBar);
