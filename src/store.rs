use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::{fs, io};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use spdlog::{debug, info};

use crate::model::{Category, Comment, Post, Record, SideBar, Tag};

#[derive(Serialize, Deserialize)]
struct Table<T> {
    next_id: u64,
    rows: BTreeMap<u64, T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Table {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }
}

impl<T: Record> Table<T> {
    fn get(&self, id: u64) -> Option<&T> {
        self.rows.get(&id)
    }

    fn iter(&self) -> impl DoubleEndedIterator<Item = &T> {
        self.rows.values()
    }

    /// Inserts rows with id 0 and replaces existing ones.
    /// `keep` copies the fields an update must not touch from the stored row.
    fn save<F>(&mut self, mut row: T, keep: F) -> io::Result<u64>
    where
        F: FnOnce(&T, &mut T),
    {
        if row.id() == 0 {
            let id = self.next_id;
            self.next_id += 1;
            row.set_id(id);
            row.set_created_time(Utc::now());
            self.rows.insert(id, row);
            return Ok(id);
        }

        let id = row.id();
        let stored = match self.rows.get(&id) {
            None => return Err(io::Error::new(ErrorKind::NotFound, format!("Row {} does not exist", id))),
            Some(stored) => stored,
        };
        row.set_created_time(stored.created_time());
        keep(stored, &mut row);
        self.rows.insert(id, row);
        Ok(id)
    }
}

/// All blog content, kept in memory and persisted as one JSON document.
#[derive(Default, Serialize, Deserialize)]
pub struct ContentStore {
    categories: Table<Category>,
    tags: Table<Tag>,
    posts: Table<Post>,
    comments: Table<Comment>,
    sidebars: Table<SideBar>,

    #[serde(skip)]
    path: Option<PathBuf>,
    #[serde(skip)]
    dirty: bool,
}

impl ContentStore {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Loads the store from `path`. A missing file gives an empty store bound to that path.
    pub fn open(path: &Path) -> io::Result<Self> {
        let mut store = if path.exists() {
            Self::load(path)?
        } else {
            info!("Data file {} not found. Starting with an empty blog", path.display());
            Self::default()
        };
        store.path = Some(path.to_path_buf());
        Ok(store)
    }

    fn load(path: &Path) -> io::Result<Self> {
        let buf = match fs::read_to_string(path) {
            Ok(buf) => buf,
            Err(e) => return Err(io::Error::new(e.kind(), format!("Error opening data file {}: {}", path.display(), e))),
        };

        match serde_json::from_str::<ContentStore>(&buf) {
            Ok(store) => Ok(store),
            Err(e) => Err(io::Error::new(
                ErrorKind::InvalidData, format!("Error parsing data file {}: {}", path.display(), e))),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Writes the whole document next to the data file, then renames it over the old one.
    pub fn persist(&mut self) -> io::Result<()> {
        let Some(ref path) = self.path else {
            debug!("In-memory store, nothing to persist");
            self.dirty = false;
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let buf = serde_json::to_string_pretty(self)
            .map_err(|e| io::Error::new(ErrorKind::InvalidData, format!("Error serializing blog data: {}", e)))?;
        let tmp_path = PathBuf::from(format!("{}.tmp", path.display()));
        fs::write(&tmp_path, buf)?;
        fs::rename(&tmp_path, path)?;

        debug!("Blog data written to {}", path.display());
        self.dirty = false;
        Ok(())
    }

    /// Reloads the data file and keeps the view counters collected in memory.
    ///
    /// Rows added or edited on disk since the last load are picked up. Counters are
    /// written back when they changed here.
    pub fn sync_from_disk(&mut self) -> io::Result<()> {
        let Some(path) = self.path.clone() else {
            return Ok(());
        };

        let mut fresh = if path.exists() {
            Self::load(&path)?
        } else {
            Self::default()
        };

        for post in fresh.posts.rows.values_mut() {
            if let Some(mine) = self.posts.get(post.id) {
                post.pv = post.pv.max(mine.pv);
                post.uv = post.uv.max(mine.uv);
            }
        }

        fresh.path = Some(path);
        fresh.dirty = self.dirty;
        *self = fresh;

        if self.dirty {
            self.persist()?;
        }
        Ok(())
    }

    pub fn category(&self, id: u64) -> Option<&Category> {
        self.categories.get(id)
    }

    pub fn tag(&self, id: u64) -> Option<&Tag> {
        self.tags.get(id)
    }

    pub fn post(&self, id: u64) -> Option<&Post> {
        self.posts.get(id)
    }

    pub fn comment(&self, id: u64) -> Option<&Comment> {
        self.comments.get(id)
    }

    pub fn sidebar(&self, id: u64) -> Option<&SideBar> {
        self.sidebars.get(id)
    }

    pub fn categories(&self) -> impl DoubleEndedIterator<Item = &Category> {
        self.categories.iter()
    }

    pub fn tags(&self) -> impl DoubleEndedIterator<Item = &Tag> {
        self.tags.iter()
    }

    pub fn posts(&self) -> impl DoubleEndedIterator<Item = &Post> {
        self.posts.iter()
    }

    pub fn comments(&self) -> impl DoubleEndedIterator<Item = &Comment> {
        self.comments.iter()
    }

    pub fn sidebars(&self) -> impl DoubleEndedIterator<Item = &SideBar> {
        self.sidebars.iter()
    }

    /// Posts filed under the category, whatever their status
    pub fn post_count(&self, category_id: u64) -> usize {
        self.posts.iter().filter(|p| p.category == category_id).count()
    }

    pub fn save_category(&mut self, category: Category) -> io::Result<u64> {
        let id = self.categories.save(category, |_, _| {})?;
        self.dirty = true;
        Ok(id)
    }

    pub fn save_tag(&mut self, tag: Tag) -> io::Result<u64> {
        let id = self.tags.save(tag, |_, _| {})?;
        self.dirty = true;
        Ok(id)
    }

    pub fn save_comment(&mut self, comment: Comment) -> io::Result<u64> {
        let id = self.comments.save(comment, |_, _| {})?;
        self.dirty = true;
        Ok(id)
    }

    pub fn save_sidebar(&mut self, sidebar: SideBar) -> io::Result<u64> {
        let id = self.sidebars.save(sidebar, |_, _| {})?;
        self.dirty = true;
        Ok(id)
    }

    /// Validates the relations and re-renders `content_html` on every save.
    pub fn save_post(&mut self, mut post: Post) -> io::Result<u64> {
        if self.categories.get(post.category).is_none() {
            return Err(io::Error::new(
                ErrorKind::InvalidInput, format!("Category {} does not exist", post.category)));
        }
        if let Some(tag_id) = post.tags.iter().find(|id| self.tags.get(**id).is_none()) {
            return Err(io::Error::new(ErrorKind::InvalidInput, format!("Tag {} does not exist", tag_id)));
        }

        post.tags.sort_unstable();
        post.tags.dedup();
        post.render_content()?;

        let id = self.posts.save(post, |stored, post| {
            post.pv = stored.pv;
            post.uv = stored.uv;
        })?;
        self.dirty = true;
        Ok(id)
    }

    /// Counts one page view, and one unique view when `unique` is set.
    pub fn record_visit(&mut self, post_id: u64, unique: bool) -> bool {
        let Some(post) = self.posts.rows.get_mut(&post_id) else {
            return false;
        };

        post.pv += 1;
        if unique {
            post.uv += 1;
        }
        self.dirty = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{PostStatus, UserId};
    use crate::test_data::{alice, sample_store};

    use super::*;

    #[test]
    fn test_ids_are_assigned_in_order() {
        let mut store = ContentStore::in_memory();
        let first = store.save_tag(Tag::new("a")).unwrap();
        let second = store.save_tag(Tag::new("b")).unwrap();
        assert_eq!((first, second), (1, 2));
        assert_eq!(store.tag(2).unwrap().name, "b");
        assert!(store.is_dirty());
    }

    #[test]
    fn test_update_keeps_created_time_and_counters() {
        let mut store = sample_store();
        let original = store.post(1).unwrap().clone();

        let mut edited = original.clone();
        edited.title = "Hello again".to_string();
        edited.pv = 9999;
        edited.uv = 9999;
        edited.created_time = Utc::now() + chrono::Duration::days(3);
        store.save_post(edited).unwrap();

        let saved = store.post(1).unwrap();
        assert_eq!(saved.title, "Hello again");
        assert_eq!(saved.pv, original.pv);
        assert_eq!(saved.uv, original.uv);
        assert_eq!(saved.created_time, original.created_time);
    }

    #[test]
    fn test_update_missing_row() {
        let mut store = ContentStore::in_memory();
        let mut tag = Tag::new("ghost");
        tag.id = 42;
        let err = store.save_tag(tag).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_save_post_checks_relations() {
        let mut store = sample_store();
        let err = store.save_post(Post::new("Orphan", 99, "")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        let mut post = Post::new("Bad tags", 1, "");
        post.tags = vec![1, 77];
        let err = store.save_post(post).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_content_html_rendered_on_every_save() {
        let mut store = sample_store();
        let mut post = Post::new("Markdown", 1, "# H");
        post.is_md = true;
        let id = store.save_post(post).unwrap();
        assert!(store.post(id).unwrap().content_html.contains("<h1>H</h1>"));

        let mut post = store.post(id).unwrap().clone();
        post.is_md = false;
        store.save_post(post).unwrap();
        assert_eq!(store.post(id).unwrap().content_html, "# H");
    }

    #[test]
    fn test_post_count() {
        let store = sample_store();
        assert_eq!(store.post_count(1), 3);
        assert_eq!(store.post_count(2), 2);
        assert_eq!(store.post_count(4), 0);
    }

    #[test]
    fn test_record_visit() {
        let mut store = sample_store();
        assert!(store.record_visit(1, true));
        assert!(store.record_visit(1, false));
        let post = store.post(1).unwrap();
        assert_eq!(post.pv, 7);
        assert_eq!(post.uv, 2);
        assert!(!store.record_visit(404, true));
    }

    #[test]
    fn test_persist_and_open() -> io::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("data").join("blog.json");

        let mut store = ContentStore::open(&path)?;
        assert_eq!(store.posts().count(), 0);
        let category_id = store.save_category(Category::new("Rust", true))?;
        let mut post = Post::new("Persisted", category_id, "**bold**");
        post.is_md = true;
        post.status = PostStatus::Draft;
        post.owner = alice();
        store.save_post(post)?;
        store.persist()?;
        assert!(!store.is_dirty());

        let reopened = ContentStore::open(&path)?;
        let post = reopened.post(1).unwrap();
        assert_eq!(post.title, "Persisted");
        assert_eq!(post.status, PostStatus::Draft);
        assert_eq!(post.owner, UserId::from("alice"));
        assert!(post.content_html.contains("<strong>bold</strong>"));

        let mut reopened = reopened;
        assert_eq!(reopened.save_category(Category::new("Next", false))?, 2);
        Ok(())
    }

    #[test]
    fn test_open_malformed_file() -> io::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("blog.json");
        fs::write(&path, "{ not json")?;
        let err = ContentStore::open(&path).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
        Ok(())
    }

    #[test]
    fn test_sync_from_disk_keeps_counters() -> io::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("blog.json");

        let mut server = ContentStore::open(&path)?;
        let category_id = server.save_category(Category::new("Rust", true))?;
        server.save_post(Post::new("Counted", category_id, "body"))?;
        server.persist()?;

        // An admin edit lands on disk while the server keeps counting views
        let mut admin = ContentStore::open(&path)?;
        let mut post = admin.post(1).unwrap().clone();
        post.title = "Renamed".to_string();
        admin.save_post(post)?;
        admin.save_post(Post::new("Fresh", category_id, "new"))?;
        admin.persist()?;

        server.record_visit(1, true);
        server.record_visit(1, false);
        server.sync_from_disk()?;

        let post = server.post(1).unwrap();
        assert_eq!(post.title, "Renamed");
        assert_eq!((post.pv, post.uv), (3, 2));
        assert_eq!(server.post(2).unwrap().title, "Fresh");
        assert!(!server.is_dirty());

        let on_disk = ContentStore::open(&path)?;
        assert_eq!(on_disk.post(1).unwrap().pv, 3);
        Ok(())
    }
}
