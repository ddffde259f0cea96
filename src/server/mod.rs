//! HTTP server rendering every page on request

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::SiteConfig;
use crate::content::loader::ContentLoader;
use crate::content::{AuditStore, ContentFetcher, MarkdownRenderer, PostStore};
use crate::pages::{
    AuditsController, AuditsQuery, DetailController, HomeController, LinkMode, Links,
    ListController, ListQuery, PageRenderer,
};
use crate::Site;

/// Shared, read-only state behind every handler
pub struct AppState {
    pages: PageRenderer,
    home: HomeController,
    list: ListController,
    detail: DetailController,
    audits: AuditsController,
    static_dir: PathBuf,
}

impl AppState {
    /// Load stores and build controllers for a site
    pub fn new(site: &Site) -> Result<Self> {
        let loader = ContentLoader::new(site);
        Ok(Self::from_parts(
            &site.config,
            loader.load_posts(),
            loader.load_audits(),
            Arc::new(loader.fetcher()?),
            loader.renderer(),
            site.static_dir.clone(),
        )?)
    }

    /// Assemble state from already-loaded parts
    pub fn from_parts(
        config: &SiteConfig,
        posts: PostStore,
        audits: AuditStore,
        fetcher: Arc<dyn ContentFetcher>,
        renderer: MarkdownRenderer,
        static_dir: PathBuf,
    ) -> crate::error::Result<Self> {
        let links = Links::from_config(config, LinkMode::Dynamic);
        let posts = Arc::new(posts);
        let audits = Arc::new(audits);

        Ok(Self {
            pages: PageRenderer::new(config, links.clone())?,
            home: HomeController::new(posts.clone(), audits.clone(), links.clone()),
            list: ListController::new(posts.clone(), links.clone(), config.page_size()),
            detail: DetailController::new(
                posts,
                fetcher,
                Arc::new(renderer),
                links,
                config.fetch_timeout(),
            ),
            audits: AuditsController::new(audits),
            static_dir,
        })
    }
}

/// Build the router with all site routes
pub fn router(state: Arc<AppState>) -> Router {
    let static_files = ServeDir::new(&state.static_dir);

    Router::new()
        .route("/", get(home_handler))
        .route("/blog", get(blog_handler))
        .route("/blog/", get(blog_handler))
        .route("/blog/:id", get(post_handler))
        .route("/audits", get(audits_handler))
        .nest_service("/static", static_files)
        .fallback(not_found_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server
pub async fn start(site: &Site, ip: &str, port: u16) -> Result<()> {
    let state = Arc::new(AppState::new(site)?);
    let app = router(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn home_handler(State(state): State<Arc<AppState>>) -> Response {
    let view = state.home.view();
    html_response(StatusCode::OK, state.pages.home(&view))
}

async fn blog_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Response {
    let view = state.list.view(&query.filter_state(), query.page());
    html_response(StatusCode::OK, state.pages.blog(&view))
}

async fn post_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    uri: Uri,
) -> Response {
    match state.detail.load(&id).await {
        Some(view) => html_response(StatusCode::OK, state.pages.post(&view)),
        None => html_response(StatusCode::NOT_FOUND, state.pages.not_found(uri.path())),
    }
}

async fn audits_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AuditsQuery>,
) -> Response {
    let view = state.audits.view(query.q.as_deref().unwrap_or(""));
    html_response(StatusCode::OK, state.pages.audits(&view))
}

async fn not_found_handler(State(state): State<Arc<AppState>>, uri: Uri) -> Response {
    tracing::warn!("404: no route for {}", uri.path());
    html_response(StatusCode::NOT_FOUND, state.pages.not_found(uri.path()))
}

fn html_response(status: StatusCode, page: crate::error::Result<String>) -> Response {
    match page {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Rendering failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}
