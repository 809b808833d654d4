//! Context shared by every page: navigation, categories and the sidebar blocks.

use std::io;
use std::io::ErrorKind;

use ramhorns::Template;

use crate::model::{Category, DisplayType, SideBar};
use crate::query::PostQuery;

/// Number of entries listed by the latest, hot and comment sidebar blocks
const SIDEBAR_ITEMS: usize = 5;

const POSTS_BLOCK: &str = r#"<ul>{{#posts}}<li><a href="/post/{{id}}/">{{title}}</a></li>{{/posts}}</ul>"#;

const COMMENTS_BLOCK: &str = r#"<ul>{{#comments}}<li><a href="{{target}}">{{nickname}}</a>: {{content}}</li>{{/comments}}</ul>"#;

#[derive(ramhorns::Content)]
pub struct ViewCategory {
    pub id: u64,
    pub name: String,
}

impl From<&Category> for ViewCategory {
    fn from(category: &Category) -> Self {
        ViewCategory {
            id: category.id,
            name: category.name.clone(),
        }
    }
}

#[derive(ramhorns::Content)]
pub struct ViewSideBar {
    pub title: String,
    /// Already rendered block, inserted unescaped
    pub html: String,
}

#[derive(ramhorns::Content)]
struct BlockPost<'a> {
    id: u64,
    title: &'a str,
}

#[derive(ramhorns::Content)]
struct PostsBlock<'a> {
    posts: Vec<BlockPost<'a>>,
}

#[derive(ramhorns::Content)]
struct BlockComment<'a> {
    target: &'a str,
    nickname: &'a str,
    content: &'a str,
}

#[derive(ramhorns::Content)]
struct CommentsBlock<'a> {
    comments: Vec<BlockComment<'a>>,
}

fn parse_block(src: &str) -> io::Result<Template> {
    Template::new(src)
        .map_err(|e| io::Error::new(ErrorKind::InvalidInput, format!("Error parsing sidebar template: {}", e)))
}

fn render_sidebar(query: &PostQuery, sidebar: &SideBar) -> io::Result<String> {
    let html = match sidebar.display_type {
        DisplayType::Html => sidebar.content.clone(),
        DisplayType::Latest => {
            let latest = query.latest_posts();
            let posts = latest.iter()
                .take(SIDEBAR_ITEMS)
                .map(|p| BlockPost { id: p.id, title: &p.title })
                .collect();
            parse_block(POSTS_BLOCK)?.render(&PostsBlock { posts })
        }
        DisplayType::Hot => {
            let hot = query.hot_posts();
            let posts = hot.iter()
                .take(SIDEBAR_ITEMS)
                .map(|p| BlockPost { id: p.id, title: &p.title })
                .collect();
            parse_block(POSTS_BLOCK)?.render(&PostsBlock { posts })
        }
        DisplayType::Comment => {
            let recent = query.recent_comments();
            let comments = recent.iter()
                .take(SIDEBAR_ITEMS)
                .map(|c| BlockComment { target: &c.target, nickname: &c.nickname, content: &c.content })
                .collect();
            parse_block(COMMENTS_BLOCK)?.render(&CommentsBlock { comments })
        }
    };
    Ok(html)
}

pub struct CommonContext {
    pub navs: Vec<ViewCategory>,
    pub categories: Vec<ViewCategory>,
    pub sidebars: Vec<ViewSideBar>,
}

impl CommonContext {
    pub fn build(query: &PostQuery) -> io::Result<Self> {
        let navs = query.navs();

        let mut sidebars = vec![];
        for sidebar in query.sidebars() {
            sidebars.push(ViewSideBar {
                title: sidebar.title.clone(),
                html: render_sidebar(query, sidebar)?,
            });
        }

        Ok(CommonContext {
            navs: navs.navs.into_iter().map(ViewCategory::from).collect(),
            categories: navs.categories.into_iter().map(ViewCategory::from).collect(),
            sidebars,
        })
    }
}
