use std::io::ErrorKind;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::{fs, io};

use ntex::web;
use ntex::web::HttpRequest;
use ntex_files::NamedFile;
use spdlog::{debug, error, info, warn};
use tokio::task::JoinHandle;

use crate::config::Config;
use crate::content_cache::ContentCache;
use crate::model::{Post, UserId};
use crate::paginator::Paginator;
use crate::query::PostQuery;
use crate::query_string::QueryString;
use crate::store::ContentStore;
use crate::view::context::CommonContext;
use crate::view::list_renderer::{ListContent, ListRenderer, PostItem};
use crate::view::post_renderer::PostRenderer;
use crate::visits::VisitTracker;

pub struct AppState {
    store: ContentStore,
    hot_cache: ContentCache<Vec<Post>>,
    visits: VisitTracker,
    config: Config,
}

impl AppState {
    pub fn new(store: ContentStore, config: Config) -> Self {
        let hot_cache = if config.defaults.cache_enabled {
            ContentCache::new()
        } else {
            ContentCache::non_caching()
        };

        AppState {
            store,
            hot_cache,
            visits: VisitTracker::new(),
            config,
        }
    }

    fn query(&self) -> PostQuery<'_> {
        let ttl = chrono::Duration::seconds(self.config.defaults.hot_posts_ttl_secs);
        PostQuery::new(&self.store, &self.hot_cache, ttl)
    }
}

type SharedState = Arc<Mutex<AppState>>;

fn lock_state(state: &SharedState) -> MutexGuard<'_, AppState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Which posts a list page shows
enum ListKind {
    Latest,
    Category(u64),
    Tag(u64),
    Search(String),
    Author(UserId),
}

struct RenderedPage {
    found: bool,
    body: String,
}

fn read_template(template_dir: &Path, name: &str) -> io::Result<String> {
    let template_path = template_dir.join(name);
    match fs::read_to_string(&template_path) {
        Ok(src) => Ok(src),
        Err(e) => Err(io::Error::new(e.kind(), format!("Error reading template {}: {}", template_path.display(), e))),
    }
}

fn get_query_string(req: &HttpRequest) -> QueryString {
    QueryString::from(req.uri().query().unwrap_or(""))
}

fn render_list(state: &AppState, kind: ListKind, cur_page: u32) -> io::Result<RenderedPage> {
    let query = state.query();

    let mut keyword = "";
    let (heading, posts, found, base_link) = match kind {
        ListKind::Latest => (String::new(), query.latest_posts(), true, "/".to_string()),
        ListKind::Category(id) => {
            let (posts, category) = query.posts_by_category(id);
            let heading = category.map(|c| format!("Category: {}", c.name)).unwrap_or_default();
            (heading, posts, category.is_some(), format!("/category/{}/", id))
        }
        ListKind::Tag(id) => {
            let (posts, tag) = query.posts_by_tag(id);
            let heading = tag.map(|t| format!("Tag: {}", t.name)).unwrap_or_default();
            (heading, posts, tag.is_some(), format!("/tag/{}/", id))
        }
        ListKind::Search(ref word) => {
            keyword = word.as_str();
            let link = serde_urlencoded::to_string([("keyword", word.as_str())])
                .map(|qs| format!("/search/?{}", qs))
                .unwrap_or_else(|_| "/search/".to_string());
            (format!("Search: {}", word), query.search(word), true, link)
        }
        ListKind::Author(ref owner) => {
            (format!("Author: {}", owner), query.posts_by_author(owner), true, format!("/author/{}/", owner))
        }
    };

    let paginator = Paginator::from(&posts, state.config.defaults.page_size);
    let (cur_page, page) = paginator.page_or_first(cur_page);

    let common = CommonContext::build(&query)?;
    let template_src = read_template(&state.config.paths.template_dir, "list.tpl")?;
    let renderer = ListRenderer::new(&template_src)?;

    let body = renderer.render(&common, ListContent {
        heading: &heading,
        keyword,
        posts: page.iter().map(|p| PostItem::from_post(&state.store, p)).collect(),
        cur_page,
        page_count: paginator.page_count(),
        base_link: &base_link,
    });

    Ok(RenderedPage { found, body })
}

fn list_response(state: &SharedState, kind: ListKind, cur_page: u32) -> web::HttpResponse {
    let state = lock_state(state);
    match render_list(&state, kind, cur_page) {
        Ok(page) if page.found => web::HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(page.body),
        Ok(page) => web::HttpResponse::NotFound()
            .content_type("text/html; charset=utf-8")
            .body(page.body),
        Err(e) => {
            error!("Error listing posts: {}", e);
            web::HttpResponse::InternalServerError()
                .body(format!("Error listing posts: {}", e))
        }
    }
}

#[web::get("/")]
async fn index(req: HttpRequest, state: web::types::State<SharedState>) -> web::HttpResponse {
    let cur_page = get_query_string(&req).get_page();
    list_response(&state, ListKind::Latest, cur_page)
}

#[web::get("/category/{category_id}/")]
async fn category_list(req: HttpRequest, path: web::types::Path<u64>, state: web::types::State<SharedState>) -> web::HttpResponse {
    let cur_page = get_query_string(&req).get_page();
    list_response(&state, ListKind::Category(path.into_inner()), cur_page)
}

#[web::get("/tag/{tag_id}/")]
async fn tag_list(req: HttpRequest, path: web::types::Path<u64>, state: web::types::State<SharedState>) -> web::HttpResponse {
    let cur_page = get_query_string(&req).get_page();
    list_response(&state, ListKind::Tag(path.into_inner()), cur_page)
}

#[web::get("/search/")]
async fn search(req: HttpRequest, state: web::types::State<SharedState>) -> web::HttpResponse {
    let qs = get_query_string(&req);
    let keyword = qs.get_keyword().to_string();
    list_response(&state, ListKind::Search(keyword), qs.get_page())
}

#[web::get("/author/{owner}/")]
async fn author(req: HttpRequest, path: web::types::Path<String>, state: web::types::State<SharedState>) -> web::HttpResponse {
    let cur_page = get_query_string(&req).get_page();
    list_response(&state, ListKind::Author(UserId(path.into_inner())), cur_page)
}

fn render_detail(state: &AppState, post: &Post, target: &str) -> io::Result<String> {
    let query = state.query();
    let comments = query.comments_by_target(target);
    let common = CommonContext::build(&query)?;

    let template_src = read_template(&state.config.paths.template_dir, "detail.tpl")?;
    let renderer = PostRenderer::new(&template_src)?;
    Ok(renderer.render(&common, &state.store, post, &comments))
}

#[web::get("/post/{post_id}/")]
async fn post_detail(req: HttpRequest, path: web::types::Path<u64>, state: web::types::State<SharedState>) -> web::HttpResponse {
    let post_id = path.into_inner();
    let mut guard = lock_state(&state);
    let state = &mut *guard;

    if state.query().post_detail(post_id).is_none() {
        debug!("Post {} not found", post_id);
        return web::HttpResponse::NotFound()
            .body(format!("Post {} not found", post_id));
    }

    let origin = req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_default();
    let unique = state.visits.record(post_id, &origin);
    state.store.record_visit(post_id, unique);

    let Some(post) = state.query().post_detail(post_id) else {
        return web::HttpResponse::NotFound()
            .body(format!("Post {} not found", post_id));
    };

    match render_detail(state, post, req.path()) {
        Ok(rendered) => web::HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(rendered),
        Err(e) => {
            error!("Error rendering post {}: {}", post_id, e);
            web::HttpResponse::InternalServerError()
                .body(format!("Error loading post {}: {}", post_id, e))
        }
    }
}

fn is_safe_file_name(file_name: &str) -> bool {
    !file_name.contains("../") && !file_name.contains("..\\")
}

#[web::get("/public/{file_name}")]
async fn public_files(path: web::types::Path<String>, state: web::types::State<SharedState>) -> Result<NamedFile, web::Error> {
    if !is_safe_file_name(path.as_str()) {
        warn!("Rejected public file request: {}", path.as_str());
        return Err(web::error::ErrorUnauthorized("Access forbidden").into());
    }

    let file_path = lock_state(&state).config.paths.public_dir.join(path.into_inner());

    Ok(NamedFile::open(file_path)?)
}

/// Merges admin edits from the data file and writes the collected view counters back.
fn sync_store(state: &SharedState) {
    let mut state = lock_state(state);
    if let Err(e) = state.store.sync_from_disk() {
        error!("Error syncing blog data: {}", e);
    }
}

/// Background task keeping the in-memory store and the data file in step
pub struct StoreSyncer {
    _sync_task: JoinHandle<()>,
}

impl StoreSyncer {
    pub fn start(state: SharedState, interval_secs: u64) -> Self {
        let period = std::time::Duration::from_secs(interval_secs.max(1));
        let sync_task = tokio::spawn(async move {
            info!("Syncing blog data every {}s", period.as_secs());
            let mut interval = tokio::time::interval(period);
            // The first tick completes immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                sync_store(&state);
            }
        });

        StoreSyncer {
            _sync_task: sync_task,
        }
    }
}

pub async fn server_run(config: Config) -> io::Result<()> {
    let store = ContentStore::open(&config.paths.data_file)?;
    info!("Loaded {} posts from {}", store.posts().count(), config.paths.data_file.display());

    if !config.paths.template_dir.is_dir() {
        return Err(io::Error::new(ErrorKind::NotFound,
                                  format!("Template directory not found: {}", config.paths.template_dir.display())));
    }

    let bind_addr = config.server.address.clone();
    let bind_port = config.server.port;
    let sync_interval = config.defaults.sync_interval_secs;
    let app_state = Arc::new(Mutex::new(AppState::new(store, config)));

    let _syncer = StoreSyncer::start(app_state.clone(), sync_interval);

    let server_state = app_state.clone();
    let result = web::HttpServer::new(move || {
        web::App::new()
            .state(server_state.clone())
            .service(index)
            .service(category_list)
            .service(tag_list)
            .service(search)
            .service(author)
            .service(post_detail)
            .service(public_files)
    })
        .bind((bind_addr, bind_port))?
        .run()
        .await;

    info!("Server stopped. Flushing view counters");
    sync_store(&app_state);
    result
}
