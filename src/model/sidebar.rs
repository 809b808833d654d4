use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SideBarStatus {
    #[default]
    Show,
    Hide,
}

impl SideBarStatus {
    pub fn label(&self) -> &'static str {
        match self {
            SideBarStatus::Show => "show",
            SideBarStatus::Hide => "hide",
        }
    }
}

impl FromStr for SideBarStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "show" => Ok(SideBarStatus::Show),
            "hide" => Ok(SideBarStatus::Hide),
            _ => Err(format!("Unknown sidebar status: {}", s)),
        }
    }
}

/// What a sidebar block renders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayType {
    /// The `content` field, as HTML
    #[default]
    Html,
    Latest,
    Hot,
    Comment,
}

impl DisplayType {
    pub fn label(&self) -> &'static str {
        match self {
            DisplayType::Html => "html",
            DisplayType::Latest => "latest",
            DisplayType::Hot => "hot",
            DisplayType::Comment => "comment",
        }
    }
}

impl FromStr for DisplayType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "html" => Ok(DisplayType::Html),
            "latest" => Ok(DisplayType::Latest),
            "hot" => Ok(DisplayType::Hot),
            "comment" => Ok(DisplayType::Comment),
            _ => Err(format!("Unknown sidebar display type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideBar {
    pub id: u64,
    pub title: String,
    pub display_type: DisplayType,
    pub content: String,
    pub status: SideBarStatus,
    pub owner: UserId,
    pub created_time: DateTime<Utc>,
}

impl SideBar {
    pub fn new(title: &str, display_type: DisplayType, content: &str) -> Self {
        SideBar {
            id: 0,
            title: title.to_string(),
            display_type,
            content: content.to_string(),
            status: SideBarStatus::Show,
            owner: UserId::default(),
            created_time: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_type_from_str() {
        assert_eq!("hot".parse::<DisplayType>(), Ok(DisplayType::Hot));
        assert_eq!("comment".parse::<DisplayType>(), Ok(DisplayType::Comment));
        assert!("banner".parse::<DisplayType>().is_err());
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!("hide".parse::<SideBarStatus>(), Ok(SideBarStatus::Hide));
        assert_eq!(SideBarStatus::Show.label(), "show");
        assert!("deleted".parse::<SideBarStatus>().is_err());
    }
}
