use crate::model::{Category, Comment, DisplayType, Post, PostStatus, SideBar, SideBarStatus, Status, Tag, UserId};
use crate::store::ContentStore;

pub const POST_DATA_MD: &str = r##"How to be a great software engineer?

Someone asked me this question today and I didn’t have an answer. After thinking for a while, I came up with a list of what I try to do myself.

## Non technical

### Have a honest image of yourself

Some day in your life, you will find that you are not the smartest person in the planet. __The earlier you find that, the better.__

## Technical

- Read the code before the review
- Write tests you trust
"##;

pub fn alice() -> UserId {
    UserId::from("alice")
}

pub fn bob() -> UserId {
    UserId::from("bob")
}

fn category(name: &str, is_nav: bool, status: Status, owner: UserId) -> Category {
    let mut category = Category::new(name, is_nav);
    category.status = status;
    category.owner = owner;
    category
}

fn tag(name: &str, owner: UserId) -> Tag {
    let mut tag = Tag::new(name);
    tag.owner = owner;
    tag
}

struct PostSeed<'a> {
    title: &'a str,
    desc: &'a str,
    category: u64,
    tags: &'a [u64],
    status: PostStatus,
    pv: u64,
    owner: UserId,
}

fn post(seed: PostSeed) -> Post {
    let mut post = Post::new(seed.title, seed.category, "Some *content*");
    post.desc = seed.desc.to_string();
    post.tags = seed.tags.to_vec();
    post.status = seed.status;
    post.pv = seed.pv;
    post.owner = seed.owner;
    post.is_md = true;
    post
}

/// Categories:
/// 1 Rust (alice, nav), 2 Life (alice), 3 Travel (bob), 4 Old (alice, deleted)
///
/// Tags: 1 async (alice), 2 web (bob), 3 unused (alice)
///
/// Posts (id title / desc / category / tags / status / pv / owner):
/// 1 Hello World / first post / 1 / [1] / normal / 5 / alice
/// 2 Draft / - / 1 / [] / draft / 100 / alice
/// 3 Tokio tips / Hello / 1 / [1, 2] / normal / 42 / bob
/// 4 Hello / travel notes / 3 / [2] / normal / 7 / bob
/// 5 Gone / - / 2 / [1] / deleted / 500 / alice
/// 6 Life update / Hello World / 2 / [] / normal / 42 / alice
pub fn sample_store() -> ContentStore {
    let mut store = ContentStore::in_memory();

    store.save_category(category("Rust", true, Status::Normal, alice())).unwrap();
    store.save_category(category("Life", false, Status::Normal, alice())).unwrap();
    store.save_category(category("Travel", false, Status::Normal, bob())).unwrap();
    store.save_category(category("Old", false, Status::Deleted, alice())).unwrap();

    store.save_tag(tag("async", alice())).unwrap();
    store.save_tag(tag("web", bob())).unwrap();
    store.save_tag(tag("unused", alice())).unwrap();

    let seeds = [
        PostSeed { title: "Hello World", desc: "first post", category: 1, tags: &[1], status: PostStatus::Normal, pv: 5, owner: alice() },
        PostSeed { title: "Draft", desc: "", category: 1, tags: &[], status: PostStatus::Draft, pv: 100, owner: alice() },
        PostSeed { title: "Tokio tips", desc: "Hello", category: 1, tags: &[1, 2], status: PostStatus::Normal, pv: 42, owner: bob() },
        PostSeed { title: "Hello", desc: "travel notes", category: 3, tags: &[2], status: PostStatus::Normal, pv: 7, owner: bob() },
        PostSeed { title: "Gone", desc: "", category: 2, tags: &[1], status: PostStatus::Deleted, pv: 500, owner: alice() },
        PostSeed { title: "Life update", desc: "Hello World", category: 2, tags: &[], status: PostStatus::Normal, pv: 42, owner: alice() },
    ];
    for seed in seeds {
        store.save_post(post(seed)).unwrap();
    }

    let mut first = Comment::new("/post/1/", "reader", "Nice one");
    first.owner = alice();
    store.save_comment(first).unwrap();
    let mut second = Comment::new("/post/1/", "<script>", "Second!");
    second.owner = alice();
    store.save_comment(second).unwrap();
    let mut other = Comment::new("/post/3/", "dev", "Thanks");
    other.owner = bob();
    store.save_comment(other).unwrap();

    let mut about = SideBar::new("About", DisplayType::Html, "<p>Hi, I write here.</p>");
    about.owner = alice();
    store.save_sidebar(about).unwrap();
    let mut latest = SideBar::new("Latest", DisplayType::Latest, "");
    latest.owner = alice();
    store.save_sidebar(latest).unwrap();
    let mut hidden = SideBar::new("Hidden", DisplayType::Hot, "");
    hidden.status = SideBarStatus::Hide;
    hidden.owner = bob();
    store.save_sidebar(hidden).unwrap();

    store
}
