use std::io;
use std::io::ErrorKind;

use ramhorns::Template;

use crate::model::Post;
use crate::store::ContentStore;
use crate::text_utils::format_date_time;
use crate::view::context::{CommonContext, ViewCategory, ViewSideBar};

#[derive(ramhorns::Content)]
struct ListPage<'a> {
    heading: &'a str,
    keyword: &'a str,
    post_list: Vec<PostItem>,
    empty: bool,
    page_list: Vec<ViewPagination>,
    show_pagination: bool,
    navs: &'a Vec<ViewCategory>,
    categories: &'a Vec<ViewCategory>,
    sidebars: &'a Vec<ViewSideBar>,
}

#[derive(ramhorns::Content)]
pub struct PostItem {
    date: String,
    time: String,
    link: String,
    title: String,
    desc: String,
    is_top: bool,
    category: String,
    category_link: String,
    author: String,
    author_link: String,
}

impl PostItem {
    pub fn from_post(store: &ContentStore, post: &Post) -> Self {
        let (date, time) = format_date_time(&post.created_time);
        let category = store.category(post.category)
            .map(|c| c.name.clone())
            .unwrap_or_default();

        PostItem {
            date,
            time,
            link: format!("/post/{}/", post.id),
            title: post.title.clone(),
            desc: post.desc.clone(),
            is_top: post.is_top,
            category,
            category_link: format!("/category/{}/", post.category),
            author: post.owner.to_string(),
            author_link: format!("/author/{}/", post.owner),
        }
    }
}

#[derive(ramhorns::Content)]
struct ViewPagination {
    current: bool,
    number: u32,
    link: String,
}

/// What a list page shows on top of the common context
pub struct ListContent<'a> {
    /// Empty on the home page, otherwise names the filter ("Tag: rust")
    pub heading: &'a str,
    pub keyword: &'a str,
    pub posts: Vec<PostItem>,
    pub cur_page: u32,
    pub page_count: u32,
    /// Path the pagination links point at
    pub base_link: &'a str,
}

pub struct ListRenderer<'a> {
    pub template: Template<'a>,
}

impl ListRenderer<'_> {
    pub fn new(list_tpl_src: &str) -> io::Result<ListRenderer> {
        let template = match Template::new(list_tpl_src) {
            Ok(x) => x,
            Err(e) => {
                return Err(io::Error::new(ErrorKind::InvalidInput, format!("Error parsing list template: {}", e)));
            }
        };

        Ok(ListRenderer {
            template,
        })
    }

    pub fn render(&self, common: &CommonContext, content: ListContent) -> String {
        let separator = if content.base_link.contains('?') { '&' } else { '?' };
        let page_list: Vec<ViewPagination> = (1..=content.page_count)
            .map(|number| ViewPagination {
                current: number == content.cur_page,
                number,
                link: format!("{}{}page={}", content.base_link, separator, number),
            })
            .collect();

        self.template.render(&ListPage {
            heading: content.heading,
            keyword: content.keyword,
            empty: content.posts.is_empty(),
            post_list: content.posts,
            show_pagination: page_list.len() > 1,
            page_list,
            navs: &common.navs,
            categories: &common.categories,
            sidebars: &common.sidebars,
        })
    }
}
