use std::io;
use std::io::ErrorKind;

use ramhorns::Template;

use crate::model::{Comment, Post};
use crate::store::ContentStore;
use crate::text_utils::{format_date_time, format_timestamp};
use crate::view::context::{CommonContext, ViewCategory, ViewSideBar};

#[derive(ramhorns::Content)]
struct ViewTag<'a> {
    id: u64,
    name: &'a str,
}

#[derive(ramhorns::Content)]
struct ViewComment<'a> {
    nickname: &'a str,
    website: &'a str,
    content: &'a str,
    created: String,
}

#[derive(ramhorns::Content)]
struct ViewItem<'a> {
    id: u64,
    author: &'a str,
    author_link: String,
    category: &'a str,
    category_link: String,
    tags: Vec<ViewTag<'a>>,
    date: &'a str,
    time: &'a str,
    pv: u64,
    uv: u64,
    post_title: &'a str,
    post_content: &'a str,
    comment_list: Vec<ViewComment<'a>>,
    navs: &'a Vec<ViewCategory>,
    categories: &'a Vec<ViewCategory>,
    sidebars: &'a Vec<ViewSideBar>,
}

pub struct PostRenderer<'a> {
    pub template: Template<'a>,
}

impl PostRenderer<'_> {
    pub fn new(view_tpl_src: &str) -> io::Result<PostRenderer> {
        let template = match Template::new(view_tpl_src) {
            Ok(x) => x,
            Err(e) => {
                return Err(io::Error::new(ErrorKind::InvalidInput, format!("Error parsing post view template: {}", e)));
            }
        };

        Ok(PostRenderer {
            template,
        })
    }

    /// `post_content` is the stored `content_html` and is inserted as is.
    pub fn render(&self, common: &CommonContext, store: &ContentStore, post: &Post, comments: &[&Comment]) -> String {
        let tags = post.tags.iter()
            .filter_map(|id| store.tag(*id))
            .map(|t| ViewTag { id: t.id, name: t.name.as_str() })
            .collect();
        let comment_list = comments.iter()
            .map(|c| ViewComment {
                nickname: c.nickname.as_str(),
                website: c.website.as_str(),
                content: c.content.as_str(),
                created: format_timestamp(&c.created_time),
            })
            .collect();
        let category = store.category(post.category)
            .map(|c| c.name.as_str())
            .unwrap_or("");
        let author = post.owner.0.as_str();
        let (date, time) = format_date_time(&post.created_time);

        self.template.render(&ViewItem {
            id: post.id,
            author,
            author_link: format!("/author/{}/", author),
            category,
            category_link: format!("/category/{}/", post.category),
            tags,
            date: date.as_str(),
            time: time.as_str(),
            pv: post.pv,
            uv: post.uv,
            post_title: post.title.as_str(),
            post_content: post.content_html.as_str(),
            comment_list,
            navs: &common.navs,
            categories: &common.categories,
            sidebars: &common.sidebars,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use crate::test_data::sample_store;

    use super::*;

    #[test]
    fn render_view() {
        let template_src = r##"
TITLE=[{{post_title}}]
AUTHOR=[{{author}}|{{author_link}}]
CATEGORY=[{{category}}]
DATE=[{{date}}]
TIME=[{{time}}]
TAGS=[{{#tags}}({{name}}){{/tags}}]
VIEWS=[{{pv}}/{{uv}}]
COMMENTS=[{{#comment_list}}({{nickname}}: {{content}}){{/comment_list}}]
SIDEBARS=[{{#sidebars}}{{title}}={{{html}}}{{/sidebars}}]
POST_CONTENT=[{{{post_content}}}"##;
        let mut store = sample_store();
        let mut post = store.post(3).unwrap().clone();
        post.title = "<Tokio> tips".to_string();
        store.save_post(post).unwrap();

        let mut post = store.post(3).unwrap().clone();
        post.created_time = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();

        let common = CommonContext {
            navs: vec![],
            categories: vec![],
            sidebars: vec![ViewSideBar { title: "About".to_string(), html: "<p>me</p>".to_string() }],
        };
        let comments: Vec<&Comment> = store.comments().rev().filter(|c| c.target == "/post/1/").collect();

        let post_renderer = PostRenderer::new(template_src).unwrap();
        let res = post_renderer.render(&common, &store, &post, &comments);
        // Post content is raw HTML
        assert!(res.starts_with(r##"
TITLE=[&lt;Tokio&gt; tips]
AUTHOR=[bob|/author/bob/]
CATEGORY=[Rust]
DATE=[2024-01-02]
TIME=[03:04:05]
TAGS=[(async)(web)]
VIEWS=[42/1]
COMMENTS=[(&lt;script&gt;: Second!)(reader: Nice one)]
SIDEBARS=[About=<p>me</p>]
POST_CONTENT=[<p>Some <em>content</em></p>"##));
    }
}
