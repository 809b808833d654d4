//! Owner-scoped administration.
//!
//! Editors only see and change their own rows. Whatever owner a submitted row claims,
//! it is saved under the acting editor.

use std::io;
use std::io::ErrorKind;

use spdlog::info;

use crate::model::{Category, Comment, Post, Record, SideBar, Tag, UserId};
use crate::ownership::{filter_owned, is_owned_by, stamp_owner, Owned};
use crate::store::ContentStore;

pub mod model_admin;
pub mod post_filter;

use model_admin::{ModelAdmin, PostAdmin};
use post_filter::PostFilter;

/// Rendered change list of one model, ready for display
#[derive(Debug)]
pub struct ChangeList {
    pub model_name: &'static str,
    pub headers: Vec<&'static str>,
    pub ids: Vec<u64>,
    pub rows: Vec<Vec<String>>,
}

impl ChangeList {
    /// Rows of the model owned by `user`, newest first
    pub fn build<A: ModelAdmin>(admin: &A, store: &ContentStore, user: &UserId) -> Self {
        Self::from_rows(admin, store, filter_owned(user, admin.rows(store)))
    }

    pub fn from_rows<A: ModelAdmin>(admin: &A, store: &ContentStore, mut rows: Vec<&A::Model>) -> Self {
        rows.sort_by(|a, b| b.id().cmp(&a.id()));

        let fields = admin.list_display();
        let headers = fields.iter().map(|f| admin.label(f)).collect();
        let ids = rows.iter().map(|r| r.id()).collect();
        let rows = rows.iter()
            .map(|row| fields.iter().map(|f| admin.display(store, row, f)).collect())
            .collect();

        ChangeList {
            model_name: admin.model_name(),
            headers,
            ids,
            rows,
        }
    }

    /// Plain-text table, one row per line, columns padded to the widest cell
    pub fn to_text(&self) -> String {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        widths.insert(0, 2);
        for (id, row) in self.ids.iter().zip(self.rows.iter()) {
            widths[0] = widths[0].max(id.to_string().len());
            for (i, cell) in row.iter().enumerate() {
                widths[i + 1] = widths[i + 1].max(cell.chars().count());
            }
        }

        let format_line = |cells: Vec<String>| -> String {
            let padded: Vec<String> = cells.iter()
                .zip(widths.iter())
                .map(|(cell, width)| format!("{:<width$}", cell, width = width))
                .collect();
            padded.join("  ").trim_end().to_string()
        };

        let mut lines = vec![];
        let mut header = vec!["ID".to_string()];
        header.extend(self.headers.iter().map(|h| h.to_string()));
        lines.push(format_line(header));
        for (id, row) in self.ids.iter().zip(self.rows.iter()) {
            let mut cells = vec![id.to_string()];
            cells.extend(row.iter().map(|c| c.replace('\n', " ")));
            lines.push(format_line(cells));
        }
        lines.join("\n")
    }
}

/// Admin operations performed on behalf of one editor
pub struct OwnerAdmin<'a> {
    user: &'a UserId,
}

impl<'a> OwnerAdmin<'a> {
    pub fn new(user: &'a UserId) -> Self {
        OwnerAdmin { user }
    }

    pub fn user(&self) -> &UserId {
        self.user
    }

    pub fn changelist<A: ModelAdmin>(&self, admin: &A, store: &ContentStore) -> ChangeList {
        ChangeList::build(admin, store, self.user)
    }

    pub fn post_changelist(&self, store: &ContentStore, filter: &PostFilter) -> ChangeList {
        let rows = filter.apply(store, filter_owned(self.user, store.posts()));
        ChangeList::from_rows(&PostAdmin, store, rows)
    }

    /// Rows outside the editor's queryset cannot be changed. Saving a new row is always allowed.
    fn check_change<T: Owned + Record>(&self, model: &str, id: u64, stored: Option<&T>) -> io::Result<()> {
        if id == 0 {
            return Ok(());
        }
        match stored {
            Some(row) if is_owned_by(self.user, row) => Ok(()),
            _ => Err(io::Error::new(ErrorKind::NotFound, format!("No {} with id {} for {}", model, id, self.user))),
        }
    }

    pub fn save_category(&self, store: &mut ContentStore, mut category: Category) -> io::Result<u64> {
        self.check_change("category", category.id, store.category(category.id))?;
        stamp_owner(self.user, &mut category);
        let id = store.save_category(category)?;
        info!("Category {} saved by {}", id, self.user);
        Ok(id)
    }

    pub fn save_tag(&self, store: &mut ContentStore, mut tag: Tag) -> io::Result<u64> {
        self.check_change("tag", tag.id, store.tag(tag.id))?;
        stamp_owner(self.user, &mut tag);
        let id = store.save_tag(tag)?;
        info!("Tag {} saved by {}", id, self.user);
        Ok(id)
    }

    pub fn save_post(&self, store: &mut ContentStore, mut post: Post) -> io::Result<u64> {
        self.check_change("post", post.id, store.post(post.id))?;
        stamp_owner(self.user, &mut post);
        let id = store.save_post(post)?;
        info!("Post {} saved by {}", id, self.user);
        Ok(id)
    }

    pub fn save_comment(&self, store: &mut ContentStore, mut comment: Comment) -> io::Result<u64> {
        self.check_change("comment", comment.id, store.comment(comment.id))?;
        stamp_owner(self.user, &mut comment);
        let id = store.save_comment(comment)?;
        info!("Comment {} saved by {}", id, self.user);
        Ok(id)
    }

    pub fn save_sidebar(&self, store: &mut ContentStore, mut sidebar: SideBar) -> io::Result<u64> {
        self.check_change("sidebar", sidebar.id, store.sidebar(sidebar.id))?;
        stamp_owner(self.user, &mut sidebar);
        let id = store.save_sidebar(sidebar)?;
        info!("Sidebar {} saved by {}", id, self.user);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use crate::admin::model_admin::{CategoryAdmin, CommentAdmin, SideBarAdmin, TagAdmin};
    use crate::model::DisplayType;
    use crate::test_data::{alice, bob, sample_store};

    use super::*;

    #[test]
    fn test_changelist_only_shows_own_rows() {
        let store = sample_store();
        let user = alice();
        let admin = OwnerAdmin::new(&user);

        let categories = admin.changelist(&CategoryAdmin, &store);
        assert_eq!(categories.ids, [4, 2, 1]);
        assert_eq!(categories.headers, ["Name", "Status", "Navigation", "Created", "Posts"]);
        assert_eq!(categories.rows[2][0], "Rust");
        assert_eq!(categories.rows[2][4], "3");

        let tags = admin.changelist(&TagAdmin, &store);
        assert_eq!(tags.ids, [3, 1]);

        let comments = OwnerAdmin::new(&bob()).changelist(&CommentAdmin, &store);
        assert_eq!(comments.ids, [3]);

        let nobody = UserId::from("nobody");
        let sidebars = OwnerAdmin::new(&nobody).changelist(&SideBarAdmin, &store);
        assert!(sidebars.ids.is_empty());
        assert!(sidebars.rows.is_empty());
    }

    #[test]
    fn test_post_changelist_with_filter() {
        let store = sample_store();
        let user = alice();
        let admin = OwnerAdmin::new(&user);

        let all = admin.post_changelist(&store, &PostFilter::default());
        assert_eq!(all.ids, [6, 5, 2, 1]);

        let filter = PostFilter { category: Some(1), search: None };
        assert_eq!(admin.post_changelist(&store, &filter).ids, [2, 1]);

        // Bob's posts never show up for alice, even when they match
        let filter = PostFilter { category: None, search: Some("tokio".to_string()) };
        assert!(admin.post_changelist(&store, &filter).ids.is_empty());
    }

    #[test]
    fn test_save_stamps_acting_user() {
        let mut store = sample_store();
        let user = alice();
        let admin = OwnerAdmin::new(&user);

        let mut tag = Tag::new("spoofed");
        tag.owner = bob();
        let id = admin.save_tag(&mut store, tag).unwrap();
        assert_eq!(store.tag(id).unwrap().owner, alice());

        let mut sidebar = SideBar::new("Hot", DisplayType::Hot, "");
        sidebar.owner = UserId::from("mallory");
        let id = admin.save_sidebar(&mut store, sidebar).unwrap();
        assert_eq!(store.sidebar(id).unwrap().owner, alice());

        let mut post = store.post(1).unwrap().clone();
        post.owner = bob();
        post.title = "Still mine".to_string();
        admin.save_post(&mut store, post).unwrap();
        let saved = store.post(1).unwrap();
        assert_eq!(saved.owner, alice());
        assert_eq!(saved.title, "Still mine");
    }

    #[test]
    fn test_cannot_change_foreign_rows() {
        let mut store = sample_store();
        let user = alice();
        let admin = OwnerAdmin::new(&user);

        let mut travel = store.category(3).unwrap().clone();
        travel.name = "Hijacked".to_string();
        let err = admin.save_category(&mut store, travel).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(store.category(3).unwrap().name, "Travel");
        assert_eq!(store.category(3).unwrap().owner, bob());

        let mut comment = store.comment(3).unwrap().clone();
        comment.content = "edited".to_string();
        assert!(admin.save_comment(&mut store, comment).is_err());

        let mut ghost = Category::new("Ghost", false);
        ghost.id = 77;
        assert_eq!(admin.save_category(&mut store, ghost).unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_changelist_text() {
        let store = sample_store();
        let text = OwnerAdmin::new(&bob()).changelist(&TagAdmin, &store).to_text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("ID  Name  Status"));
        assert!(lines[1].starts_with("2   web   normal"));
    }
}
