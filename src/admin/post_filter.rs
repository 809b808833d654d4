use crate::model::{Post, UserId};
use crate::ownership::filter_owned;
use crate::store::ContentStore;

/// Narrowing of the post change list
#[derive(Debug, Default, Clone)]
pub struct PostFilter {
    pub category: Option<u64>,
    pub search: Option<String>,
}

impl PostFilter {
    /// Categories offered by the category filter: only the editor's own.
    pub fn category_choices(store: &ContentStore, user: &UserId) -> Vec<(u64, String)> {
        filter_owned(user, store.categories())
            .into_iter()
            .map(|c| (c.id, c.name.clone()))
            .collect()
    }

    pub fn apply<'s>(&self, store: &ContentStore, posts: Vec<&'s Post>) -> Vec<&'s Post> {
        let terms: Vec<String> = match self.search {
            Some(ref search) => search.split_whitespace().map(|t| t.to_lowercase()).collect(),
            None => vec![],
        };

        posts.into_iter()
            .filter(|p| self.category.map_or(true, |id| p.category == id))
            .filter(|p| terms.iter().all(|term| Self::matches(store, p, term)))
            .collect()
    }

    /// Case-insensitive substring match on the title or the category name
    fn matches(store: &ContentStore, post: &Post, term: &str) -> bool {
        if post.title.to_lowercase().contains(term) {
            return true;
        }
        store.category(post.category)
            .map_or(false, |c| c.name.to_lowercase().contains(term))
    }
}
