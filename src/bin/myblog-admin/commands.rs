use std::io::ErrorKind;
use std::path::PathBuf;
use std::str::FromStr;
use std::{fs, io};

use clap::{Args, Subcommand};

use myblog::admin::model_admin::{CategoryAdmin, CommentAdmin, SideBarAdmin, TagAdmin};
use myblog::admin::post_filter::PostFilter;
use myblog::admin::OwnerAdmin;
use myblog::model::{Category, Comment, DisplayType, Post, PostStatus, SideBar, SideBarStatus, Status, Tag};
use myblog::store::ContentStore;

#[derive(Subcommand, Debug)]
pub enum ContentCmd {
    /// Manage categories
    #[command(subcommand)]
    Category(CategoryCmd),
    /// Manage tags
    #[command(subcommand)]
    Tag(TagCmd),
    /// Manage posts
    #[command(subcommand)]
    Post(PostCmd),
    /// Manage comments
    #[command(subcommand)]
    Comment(CommentCmd),
    /// Manage sidebar blocks
    #[command(subcommand)]
    Sidebar(SideBarCmd),
}

#[derive(Subcommand, Debug)]
pub enum CategoryCmd {
    /// Create a category
    Add {
        name: String,
        /// Show the category in the navigation bar
        #[arg(long)]
        nav: bool,
    },
    /// List your categories
    List,
    /// Change one of your categories
    Edit {
        id: u64,
        #[arg(long)]
        name: Option<String>,
        /// true or false
        #[arg(long)]
        nav: Option<bool>,
    },
    /// Delete or restore one of your categories
    Status {
        id: u64,
        /// normal or deleted
        status: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum TagCmd {
    /// Create a tag
    Add { name: String },
    /// List your tags
    List,
    /// Rename one of your tags
    Edit {
        id: u64,
        #[arg(long)]
        name: String,
    },
    /// Delete or restore one of your tags
    Status {
        id: u64,
        /// normal or deleted
        status: String,
    },
}

#[derive(Args, Debug)]
pub struct PostAddArgs {
    /// Title of the post
    #[arg(short, long)]
    title: String,

    /// Category id
    #[arg(short, long)]
    category: u64,

    /// Tag ids, comma separated
    #[arg(long, value_delimiter = ',')]
    tags: Vec<u64>,

    /// Short description shown in lists
    #[arg(short, long, default_value = "")]
    desc: String,

    /// Post body
    #[arg(long, conflicts_with = "file")]
    content: Option<String>,

    /// Read the post body from a file
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// The body is HTML and is published verbatim
    #[arg(long)]
    html: bool,

    /// Pin the post
    #[arg(long)]
    top: bool,

    /// normal, draft or deleted
    #[arg(short, long, default_value = "normal")]
    status: String,
}

#[derive(Args, Debug)]
pub struct PostEditArgs {
    id: u64,

    #[arg(short, long)]
    title: Option<String>,

    /// Category id
    #[arg(short, long)]
    category: Option<u64>,

    /// Tag ids, comma separated. Replaces the current tags
    #[arg(long, value_delimiter = ',')]
    tags: Option<Vec<u64>>,

    #[arg(short, long)]
    desc: Option<String>,

    #[arg(long, conflicts_with = "file")]
    content: Option<String>,

    #[arg(short, long)]
    file: Option<PathBuf>,

    /// The body is HTML and is published verbatim
    #[arg(long, conflicts_with = "markdown")]
    html: bool,

    /// The body is markdown
    #[arg(long)]
    markdown: bool,

    /// Pin or unpin the post: true or false
    #[arg(long)]
    top: Option<bool>,
}

#[derive(Subcommand, Debug)]
pub enum PostCmd {
    /// Create a post
    Add(PostAddArgs),
    /// List your posts
    List {
        /// Only posts in this category
        #[arg(long)]
        category: Option<u64>,
        /// Words matched against the title and the category name
        #[arg(long)]
        search: Option<String>,
    },
    /// Change one of your posts. Only the given fields are updated
    Edit(PostEditArgs),
    /// Change the status of one of your posts
    Status {
        id: u64,
        /// normal, draft or deleted
        status: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum CommentCmd {
    /// Add a comment to a page, e.g. /post/1/
    Add {
        target: String,
        nickname: String,
        content: String,
        #[arg(long, default_value = "")]
        website: String,
    },
    /// List your comments
    List,
    /// Change one of your comments
    Edit {
        id: u64,
        #[arg(long)]
        nickname: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        website: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum SideBarCmd {
    /// Create a sidebar block
    Add {
        title: String,
        /// html, latest, hot or comment
        #[arg(short, long, default_value = "html")]
        display_type: String,
        /// HTML shown by html blocks
        #[arg(long, default_value = "")]
        content: String,
    },
    /// List your sidebar blocks
    List,
    /// Change one of your sidebar blocks
    Edit {
        id: u64,
        #[arg(long)]
        title: Option<String>,
        /// html, latest, hot or comment
        #[arg(short, long)]
        display_type: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },
    /// Show or hide one of your sidebar blocks
    Status {
        id: u64,
        /// show or hide
        status: String,
    },
}

fn parse_arg<T: FromStr<Err = String>>(value: &str) -> io::Result<T> {
    T::from_str(value).map_err(|e| io::Error::new(ErrorKind::InvalidInput, e))
}

/// Copy of a stored row to edit, `NotFound` when there is none
fn stored<T: Clone>(model: &str, id: u64, row: Option<&T>) -> io::Result<T> {
    match row {
        Some(row) => Ok(row.clone()),
        None => Err(io::Error::new(ErrorKind::NotFound, format!("No {} with id {}", model, id))),
    }
}

fn read_body(content: &Option<String>, file: &Option<PathBuf>) -> io::Result<Option<String>> {
    match (content, file) {
        (Some(content), _) => Ok(Some(content.clone())),
        (None, Some(file)) => fs::read_to_string(file)
            .map(Some)
            .map_err(|e| io::Error::new(e.kind(), format!("Error reading post body {}: {}", file.display(), e))),
        (None, None) => Ok(None),
    }
}

fn add_post(admin: &OwnerAdmin, store: &mut ContentStore, args: PostAddArgs) -> io::Result<String> {
    let Some(body) = read_body(&args.content, &args.file)? else {
        return Err(io::Error::new(ErrorKind::InvalidInput, "Either --content or --file is required"));
    };
    let mut post = Post::new(&args.title, args.category, &body);
    post.desc = args.desc;
    post.tags = args.tags;
    post.is_md = !args.html;
    post.is_top = args.top;
    post.status = parse_arg(&args.status)?;

    let id = admin.save_post(store, post)?;
    Ok(format!("Post {} created", id))
}

fn edit_post(admin: &OwnerAdmin, store: &mut ContentStore, args: PostEditArgs) -> io::Result<String> {
    let mut post = stored("post", args.id, store.post(args.id))?;
    if let Some(title) = args.title.clone() {
        post.title = title;
    }
    if let Some(category) = args.category {
        post.category = category;
    }
    if let Some(tags) = args.tags.clone() {
        post.tags = tags;
    }
    if let Some(desc) = args.desc.clone() {
        post.desc = desc;
    }
    if let Some(body) = read_body(&args.content, &args.file)? {
        post.content = body;
    }
    if args.html {
        post.is_md = false;
    } else if args.markdown {
        post.is_md = true;
    }
    if let Some(top) = args.top {
        post.is_top = top;
    }

    admin.save_post(store, post)?;
    Ok(format!("Post {} updated", args.id))
}

fn set_post_status(admin: &OwnerAdmin, store: &mut ContentStore, id: u64, status: &str) -> io::Result<String> {
    let status: PostStatus = parse_arg(status)?;
    let mut post = stored("post", id, store.post(id))?;
    post.status = status;
    admin.save_post(store, post)?;
    Ok(format!("Post {} is now {}", id, status.label()))
}

fn run_category_cmd(admin: &OwnerAdmin, store: &mut ContentStore, cmd: CategoryCmd) -> io::Result<String> {
    match cmd {
        CategoryCmd::Add { name, nav } => {
            let id = admin.save_category(store, Category::new(&name, nav))?;
            Ok(format!("Category {} created", id))
        }
        CategoryCmd::List => Ok(admin.changelist(&CategoryAdmin, store).to_text()),
        CategoryCmd::Edit { id, name, nav } => {
            let mut category = stored("category", id, store.category(id))?;
            if let Some(name) = name {
                category.name = name;
            }
            if let Some(nav) = nav {
                category.is_nav = nav;
            }
            admin.save_category(store, category)?;
            Ok(format!("Category {} updated", id))
        }
        CategoryCmd::Status { id, status } => {
            let status: Status = parse_arg(&status)?;
            let mut category = stored("category", id, store.category(id))?;
            category.status = status;
            admin.save_category(store, category)?;
            Ok(format!("Category {} is now {}", id, status.label()))
        }
    }
}

fn run_tag_cmd(admin: &OwnerAdmin, store: &mut ContentStore, cmd: TagCmd) -> io::Result<String> {
    match cmd {
        TagCmd::Add { name } => {
            let id = admin.save_tag(store, Tag::new(&name))?;
            Ok(format!("Tag {} created", id))
        }
        TagCmd::List => Ok(admin.changelist(&TagAdmin, store).to_text()),
        TagCmd::Edit { id, name } => {
            let mut tag = stored("tag", id, store.tag(id))?;
            tag.name = name;
            admin.save_tag(store, tag)?;
            Ok(format!("Tag {} updated", id))
        }
        TagCmd::Status { id, status } => {
            let status: Status = parse_arg(&status)?;
            let mut tag = stored("tag", id, store.tag(id))?;
            tag.status = status;
            admin.save_tag(store, tag)?;
            Ok(format!("Tag {} is now {}", id, status.label()))
        }
    }
}

fn run_post_cmd(admin: &OwnerAdmin, store: &mut ContentStore, cmd: PostCmd) -> io::Result<String> {
    match cmd {
        PostCmd::Add(args) => add_post(admin, store, args),
        PostCmd::List { category, search } => {
            if let Some(id) = category {
                let owned = PostFilter::category_choices(store, admin.user());
                if !owned.iter().any(|(choice, _)| *choice == id) {
                    return Err(io::Error::new(ErrorKind::InvalidInput, format!("Category {} is not one of yours", id)));
                }
            }
            let filter = PostFilter { category, search };
            Ok(admin.post_changelist(store, &filter).to_text())
        }
        PostCmd::Edit(args) => edit_post(admin, store, args),
        PostCmd::Status { id, status } => set_post_status(admin, store, id, &status),
    }
}

fn run_comment_cmd(admin: &OwnerAdmin, store: &mut ContentStore, cmd: CommentCmd) -> io::Result<String> {
    match cmd {
        CommentCmd::Add { target, nickname, content, website } => {
            let mut comment = Comment::new(&target, &nickname, &content);
            comment.website = website;
            let id = admin.save_comment(store, comment)?;
            Ok(format!("Comment {} created", id))
        }
        CommentCmd::List => Ok(admin.changelist(&CommentAdmin, store).to_text()),
        CommentCmd::Edit { id, nickname, content, website } => {
            let mut comment = stored("comment", id, store.comment(id))?;
            if let Some(nickname) = nickname {
                comment.nickname = nickname;
            }
            if let Some(content) = content {
                comment.content = content;
            }
            if let Some(website) = website {
                comment.website = website;
            }
            admin.save_comment(store, comment)?;
            Ok(format!("Comment {} updated", id))
        }
    }
}

fn run_sidebar_cmd(admin: &OwnerAdmin, store: &mut ContentStore, cmd: SideBarCmd) -> io::Result<String> {
    match cmd {
        SideBarCmd::Add { title, display_type, content } => {
            let display_type: DisplayType = parse_arg(&display_type)?;
            let id = admin.save_sidebar(store, SideBar::new(&title, display_type, &content))?;
            Ok(format!("Sidebar {} created", id))
        }
        SideBarCmd::List => Ok(admin.changelist(&SideBarAdmin, store).to_text()),
        SideBarCmd::Edit { id, title, display_type, content } => {
            let mut sidebar = stored("sidebar", id, store.sidebar(id))?;
            if let Some(title) = title {
                sidebar.title = title;
            }
            if let Some(display_type) = display_type {
                sidebar.display_type = parse_arg(&display_type)?;
            }
            if let Some(content) = content {
                sidebar.content = content;
            }
            admin.save_sidebar(store, sidebar)?;
            Ok(format!("Sidebar {} updated", id))
        }
        SideBarCmd::Status { id, status } => {
            let status: SideBarStatus = parse_arg(&status)?;
            let mut sidebar = stored("sidebar", id, store.sidebar(id))?;
            sidebar.status = status;
            admin.save_sidebar(store, sidebar)?;
            Ok(format!("Sidebar {} is now {}", id, status.label()))
        }
    }
}

pub fn run_content_cmd(admin: &OwnerAdmin, store: &mut ContentStore, cmd: ContentCmd) -> io::Result<String> {
    match cmd {
        ContentCmd::Category(cmd) => run_category_cmd(admin, store, cmd),
        ContentCmd::Tag(cmd) => run_tag_cmd(admin, store, cmd),
        ContentCmd::Post(cmd) => run_post_cmd(admin, store, cmd),
        ContentCmd::Comment(cmd) => run_comment_cmd(admin, store, cmd),
        ContentCmd::Sidebar(cmd) => run_sidebar_cmd(admin, store, cmd),
    }
}
