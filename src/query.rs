//! Read side of the blog.
//!
//! Every lookup is a plain function of the store. Unknown ids never fail: they give
//! an empty list and no entity, and the pages render that as "nothing here".

use std::sync::Arc;

use chrono::Duration;

use crate::content_cache::{ContentCache, Expire};
use crate::model::{Category, Comment, Post, SideBar, SideBarStatus, Status, Tag, UserId};
use crate::store::ContentStore;

pub const HOT_POSTS_KEY: &str = "hot_posts";

pub struct Navs<'a> {
    /// Categories flagged for the navigation bar
    pub navs: Vec<&'a Category>,
    pub categories: Vec<&'a Category>,
}

pub struct PostQuery<'a> {
    store: &'a ContentStore,
    hot_cache: &'a ContentCache<Vec<Post>>,
    hot_ttl: Duration,
}

impl<'a> PostQuery<'a> {
    pub fn new(store: &'a ContentStore, hot_cache: &'a ContentCache<Vec<Post>>, hot_ttl: Duration) -> Self {
        PostQuery {
            store,
            hot_cache,
            hot_ttl,
        }
    }

    /// Normal posts, newest id first
    fn normal_posts(&self) -> impl Iterator<Item = &'a Post> {
        let store = self.store;
        store.posts().rev().filter(|p| p.is_normal())
    }

    pub fn latest_posts(&self) -> Vec<&'a Post> {
        self.normal_posts().collect()
    }

    /// Normal posts by page views. The result is a snapshot shared until the TTL runs out,
    /// so view counts written meanwhile are not reflected. An empty result is never cached.
    pub fn hot_posts(&self) -> Arc<Vec<Post>> {
        if let Some(posts) = self.hot_cache.get(HOT_POSTS_KEY) {
            return posts;
        }

        let mut posts: Vec<Post> = self.normal_posts().cloned().collect();
        // Stable sort: equal view counts keep the newest first
        posts.sort_by(|a, b| b.pv.cmp(&a.pv));
        if posts.is_empty() {
            return Arc::new(posts);
        }
        self.hot_cache.set(HOT_POSTS_KEY, posts, Expire::After(self.hot_ttl))
    }

    pub fn posts_by_tag(&self, tag_id: u64) -> (Vec<&'a Post>, Option<&'a Tag>) {
        let Some(tag) = self.store.tag(tag_id) else {
            return (vec![], None);
        };

        let posts = self.normal_posts().filter(|p| p.has_tag(tag.id)).collect();
        (posts, Some(tag))
    }

    pub fn posts_by_category(&self, category_id: u64) -> (Vec<&'a Post>, Option<&'a Category>) {
        let Some(category) = self.store.category(category_id) else {
            return (vec![], None);
        };

        let posts = self.normal_posts().filter(|p| p.category == category.id).collect();
        (posts, Some(category))
    }

    /// Exact match on the title or the description. An empty keyword lists everything.
    pub fn search(&self, keyword: &str) -> Vec<&'a Post> {
        if keyword.is_empty() {
            return self.latest_posts();
        }

        self.normal_posts()
            .filter(|p| p.title == keyword || p.desc == keyword)
            .collect()
    }

    pub fn posts_by_author(&self, owner: &UserId) -> Vec<&'a Post> {
        self.normal_posts().filter(|p| &p.owner == owner).collect()
    }

    pub fn post_detail(&self, post_id: u64) -> Option<&'a Post> {
        self.store.post(post_id).filter(|p| p.is_normal())
    }

    pub fn navs(&self) -> Navs<'a> {
        let store = self.store;
        let (navs, categories) = store.categories()
            .rev()
            .filter(|c| c.status == Status::Normal)
            .partition(|c| c.is_nav);

        Navs {
            navs,
            categories,
        }
    }

    pub fn sidebars(&self) -> Vec<&'a SideBar> {
        let store = self.store;
        store.sidebars()
            .rev()
            .filter(|s| s.status == SideBarStatus::Show)
            .collect()
    }

    pub fn comments_by_target(&self, target: &str) -> Vec<&'a Comment> {
        let store = self.store;
        store.comments()
            .rev()
            .filter(|c| c.target == target)
            .collect()
    }

    pub fn recent_comments(&self) -> Vec<&'a Comment> {
        let store = self.store;
        store.comments().rev().collect()
    }
}
