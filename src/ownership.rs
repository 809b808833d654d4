//! Per-editor scoping of admin data.
//!
//! Every editable row belongs to the editor who last saved it. Admin listings only
//! ever see the acting editor's rows, and the owner field is always taken from the
//! acting editor, never from the submitted row.

use crate::model::UserId;

pub trait Owned {
    fn owner(&self) -> &UserId;
    fn set_owner(&mut self, owner: UserId);
}

/// Keeps the rows owned by `user`, in their original order.
pub fn filter_owned<'a, T, I>(user: &UserId, rows: I) -> Vec<&'a T>
where
    T: Owned + 'a,
    I: IntoIterator<Item = &'a T>,
{
    rows.into_iter()
        .filter(|row| row.owner() == user)
        .collect()
}

pub fn is_owned_by<T: Owned>(user: &UserId, row: &T) -> bool {
    row.owner() == user
}

/// Overwrites whatever owner came with the row.
pub fn stamp_owner<T: Owned>(user: &UserId, row: &mut T) {
    row.set_owner(user.clone());
}

#[cfg(test)]
mod tests {
    use crate::model::{Category, Tag};

    use super::*;

    fn tag_of(name: &str, owner: &str) -> Tag {
        let mut tag = Tag::new(name);
        tag.owner = UserId::from(owner);
        tag
    }

    #[test]
    fn test_filter_owned() {
        let tags = vec![
            tag_of("rust", "alice"),
            tag_of("go", "bob"),
            tag_of("zig", "alice"),
        ];

        let alice = UserId::from("alice");
        let owned = filter_owned(&alice, &tags);
        let names: Vec<_> = owned.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["rust", "zig"]);

        let carol = UserId::from("carol");
        assert!(filter_owned(&carol, &tags).is_empty());
    }

    #[test]
    fn test_stamp_owner_overrides_claim() {
        let mut category = Category::new("Life", false);
        category.owner = UserId::from("mallory");

        let alice = UserId::from("alice");
        stamp_owner(&alice, &mut category);
        assert_eq!(category.owner, alice);
        assert!(is_owned_by(&alice, &category));
    }
}
