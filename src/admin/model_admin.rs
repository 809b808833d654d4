//! Admin configuration for each model: which columns the change list shows and how
//! every column is rendered.

use crate::model::{Category, Comment, Post, Record, SideBar, Tag};
use crate::ownership::Owned;
use crate::store::ContentStore;
use crate::text_utils::{format_timestamp, truncate_chars};

/// Longest text shown in a change list cell
const CELL_CHARS: usize = 40;

pub trait ModelAdmin {
    type Model: Owned + Record;

    fn model_name(&self) -> &'static str;

    /// Columns of the change list, in display order
    fn list_display(&self) -> &'static [&'static str];

    /// Every row of the model, in ascending id order
    fn rows<'s>(&self, store: &'s ContentStore) -> Vec<&'s Self::Model>;

    fn display(&self, store: &ContentStore, row: &Self::Model, field: &str) -> String;

    /// Column header for `field`
    fn label(&self, field: &str) -> &'static str {
        match field {
            "name" => "Name",
            "status" => "Status",
            "is_nav" => "Navigation",
            "created_time" => "Created",
            "post_count" => "Posts",
            "title" => "Title",
            "category" => "Category",
            "operator" => "Actions",
            "target" => "Target",
            "nickname" => "Nickname",
            "content" => "Content",
            "website" => "Website",
            "display_type" => "Display type",
            _ => "",
        }
    }
}

fn yes_no(value: bool) -> String {
    let label = if value { "yes" } else { "no" };
    label.to_string()
}

pub struct CategoryAdmin;

impl ModelAdmin for CategoryAdmin {
    type Model = Category;

    fn model_name(&self) -> &'static str {
        "category"
    }

    fn list_display(&self) -> &'static [&'static str] {
        &["name", "status", "is_nav", "created_time", "post_count"]
    }

    fn rows<'s>(&self, store: &'s ContentStore) -> Vec<&'s Category> {
        store.categories().collect()
    }

    fn display(&self, store: &ContentStore, row: &Category, field: &str) -> String {
        match field {
            "name" => row.name.clone(),
            "status" => row.status.label().to_string(),
            "is_nav" => yes_no(row.is_nav),
            "created_time" => format_timestamp(&row.created_time),
            "post_count" => store.post_count(row.id).to_string(),
            _ => String::new(),
        }
    }
}

pub struct TagAdmin;

impl ModelAdmin for TagAdmin {
    type Model = Tag;

    fn model_name(&self) -> &'static str {
        "tag"
    }

    fn list_display(&self) -> &'static [&'static str] {
        &["name", "status", "created_time"]
    }

    fn rows<'s>(&self, store: &'s ContentStore) -> Vec<&'s Tag> {
        store.tags().collect()
    }

    fn display(&self, _store: &ContentStore, row: &Tag, field: &str) -> String {
        match field {
            "name" => row.name.clone(),
            "status" => row.status.label().to_string(),
            "created_time" => format_timestamp(&row.created_time),
            _ => String::new(),
        }
    }
}

pub struct PostAdmin;

impl PostAdmin {
    /// Admin command that edits the post
    pub fn change_command(post_id: u64) -> String {
        format!("myblog-admin post edit {}", post_id)
    }
}

impl ModelAdmin for PostAdmin {
    type Model = Post;

    fn model_name(&self) -> &'static str {
        "post"
    }

    fn list_display(&self) -> &'static [&'static str] {
        &["title", "category", "status", "created_time", "operator"]
    }

    fn rows<'s>(&self, store: &'s ContentStore) -> Vec<&'s Post> {
        store.posts().collect()
    }

    fn display(&self, store: &ContentStore, row: &Post, field: &str) -> String {
        match field {
            "title" => row.title.clone(),
            "category" => store.category(row.category)
                .map(|c| c.name.clone())
                .unwrap_or_default(),
            "status" => row.status.label().to_string(),
            "created_time" => format_timestamp(&row.created_time),
            "operator" => Self::change_command(row.id),
            _ => String::new(),
        }
    }
}

pub struct CommentAdmin;

impl ModelAdmin for CommentAdmin {
    type Model = Comment;

    fn model_name(&self) -> &'static str {
        "comment"
    }

    fn list_display(&self) -> &'static [&'static str] {
        &["target", "nickname", "content", "website", "created_time"]
    }

    fn rows<'s>(&self, store: &'s ContentStore) -> Vec<&'s Comment> {
        store.comments().collect()
    }

    fn display(&self, _store: &ContentStore, row: &Comment, field: &str) -> String {
        match field {
            "target" => row.target.clone(),
            "nickname" => row.nickname.clone(),
            "content" => truncate_chars(&row.content, CELL_CHARS),
            "website" => row.website.clone(),
            "created_time" => format_timestamp(&row.created_time),
            _ => String::new(),
        }
    }
}

pub struct SideBarAdmin;

impl ModelAdmin for SideBarAdmin {
    type Model = SideBar;

    fn model_name(&self) -> &'static str {
        "sidebar"
    }

    fn list_display(&self) -> &'static [&'static str] {
        &["title", "display_type", "content", "created_time"]
    }

    fn rows<'s>(&self, store: &'s ContentStore) -> Vec<&'s SideBar> {
        store.sidebars().collect()
    }

    fn display(&self, _store: &ContentStore, row: &SideBar, field: &str) -> String {
        match field {
            "title" => row.title.clone(),
            "display_type" => row.display_type.label().to_string(),
            "content" => truncate_chars(&row.content, CELL_CHARS),
            "created_time" => format_timestamp(&row.created_time),
            _ => String::new(),
        }
    }
}
