//! Page controllers
//!
//! Controllers combine the stores, the filter engine and the renderer into
//! view models. [`PageRenderer`] turns those view models into HTML with the
//! embedded templates; the server and the static export share it.

mod audits;
mod detail;
mod home;
mod list;

pub use audits::{AuditsController, AuditsQuery, AuditsView};
pub use detail::{
    ContentState, DetailController, DetailOutcome, DetailSession, DetailView, Ticket,
    FETCH_FAILED_MESSAGE, NO_CONTENT_MESSAGE,
};
pub use home::{HomeController, HomeView};
pub use list::{ListController, ListQuery, ListState, ListView};

use tera::Context;

use crate::config::SiteConfig;
use crate::content::Post;
use crate::error::Result;
use crate::filter::ALL_TAG;
use crate::helpers::{self, blog_list_url, post_url, url_for};
use crate::templates::{
    ConfigData, MenuItem, NavPost, PostCard, TagLink, TemplateRenderer,
};

/// How generated pages link to each other
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkMode {
    /// Served pages: filters and pages travel in the query string
    Dynamic,
    /// Exported pages: one directory per tag and per page, no search
    Static,
}

/// URL builder for a site root and link mode
#[derive(Debug, Clone)]
pub struct Links {
    root: String,
    mode: LinkMode,
    pagination_dir: String,
}

impl Links {
    pub fn new(root: &str, mode: LinkMode, pagination_dir: &str) -> Self {
        Self {
            root: root.to_string(),
            mode,
            pagination_dir: pagination_dir.trim_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &SiteConfig, mode: LinkMode) -> Self {
        Self::new(&config.root, mode, &config.pagination_dir)
    }

    pub fn mode(&self) -> LinkMode {
        self.mode
    }

    pub fn home(&self) -> String {
        url_for(&self.root, "")
    }

    pub fn blog(&self) -> String {
        match self.mode {
            LinkMode::Dynamic => url_for(&self.root, "blog"),
            LinkMode::Static => url_for(&self.root, "blog/"),
        }
    }

    pub fn audits(&self) -> String {
        match self.mode {
            LinkMode::Dynamic => url_for(&self.root, "audits"),
            LinkMode::Static => url_for(&self.root, "audits/"),
        }
    }

    pub fn post(&self, id: &str) -> String {
        match self.mode {
            LinkMode::Dynamic => post_url(&self.root, id),
            LinkMode::Static => format!("{}/", post_url(&self.root, id)),
        }
    }

    /// Blog list filtered by a tag; [`ALL_TAG`] links to the unfiltered list
    pub fn tag(&self, tag: &str) -> String {
        match self.mode {
            LinkMode::Dynamic => blog_list_url(&self.root, "", tag, 1),
            LinkMode::Static if tag == ALL_TAG => self.blog(),
            LinkMode::Static => url_for(
                &self.root,
                &format!("blog/tags/{}/", slug::slugify(tag)),
            ),
        }
    }

    /// One page of the unfiltered blog list
    pub fn page(&self, page: usize) -> String {
        match self.mode {
            LinkMode::Dynamic => blog_list_url(&self.root, "", ALL_TAG, page),
            LinkMode::Static if page <= 1 => self.blog(),
            LinkMode::Static => url_for(
                &self.root,
                &format!("blog/{}/{}/", self.pagination_dir, page),
            ),
        }
    }

    /// Card view model for a post
    pub fn card(&self, post: &Post) -> PostCard {
        let (cover_image, cover_class) = match post.cover_image.as_deref() {
            Some(cover) if helpers::is_css_cover(cover) => (None, Some(cover.to_string())),
            Some(cover) => (Some(cover.to_string()), None),
            None => (None, None),
        };

        let id = post.id.to_string();
        PostCard {
            url: self.post(&id),
            id,
            title: post.title.clone(),
            excerpt: post.excerpt.clone(),
            date: helpers::display_date(&post.date),
            datetime: post.timestamp().map(|d| helpers::date_xml(&d)),
            read_time: post.read_time.clone(),
            author: post.author.clone(),
            author_image: post.author_image.clone(),
            cover_image,
            cover_class,
            tags: post
                .tags
                .iter()
                .map(|t| TagLink {
                    name: t.clone(),
                    url: self.tag(t),
                })
                .collect(),
            featured: post.is_featured(),
        }
    }

    pub fn nav(&self, post: &Post) -> NavPost {
        NavPost {
            title: post.title.clone(),
            path: self.post(&post.id.to_string()),
        }
    }
}

/// Renders view models into full HTML pages
pub struct PageRenderer {
    templates: TemplateRenderer,
    config: ConfigData,
    links: Links,
}

impl PageRenderer {
    pub fn new(config: &SiteConfig, links: Links) -> Result<Self> {
        Ok(Self {
            templates: TemplateRenderer::new()?,
            config: ConfigData {
                title: config.title.clone(),
                description: config.description.clone(),
                author: config.author.clone(),
                url: config.url.clone(),
                root: url_for(&config.root, ""),
                language: config.language.clone(),
            },
            links,
        })
    }

    pub fn links(&self) -> &Links {
        &self.links
    }

    /// Create a base context with common variables
    fn base_context(&self, page_title: &str, current_path: &str) -> Context {
        let menu = vec![
            MenuItem {
                name: "Home".to_string(),
                path: self.links.home(),
            },
            MenuItem {
                name: "Audits".to_string(),
                path: self.links.audits(),
            },
            MenuItem {
                name: "Blog".to_string(),
                path: self.links.blog(),
            },
        ];

        let mut context = Context::new();
        context.insert("config", &self.config);
        context.insert("menu", &menu);
        context.insert("page_title", page_title);
        context.insert("current_path", current_path);
        context.insert("current_year", &chrono::Utc::now().format("%Y").to_string());
        context.insert("blog_url", &self.links.blog());
        context.insert("audits_url", &self.links.audits());
        context.insert("show_search", &(self.links.mode() == LinkMode::Dynamic));
        context
    }

    pub fn home(&self, view: &HomeView) -> Result<String> {
        let mut context = self.base_context("", &self.links.home());
        context.insert("featured", &view.featured);
        context.insert("latest_posts", &view.latest_posts);
        context.insert("latest_audits", &view.latest_audits);
        self.templates.render("home.html", &context)
    }

    pub fn blog(&self, view: &ListView) -> Result<String> {
        let mut context = self.base_context("Blog", &self.links.blog());
        context.insert("view", view);
        self.templates.render("blog.html", &context)
    }

    pub fn post(&self, view: &DetailView) -> Result<String> {
        let mut context = self.base_context(&view.post.title, &view.post.url);
        context.insert("view", view);
        self.templates.render("post.html", &context)
    }

    pub fn audits(&self, view: &AuditsView) -> Result<String> {
        let mut context = self.base_context("Audits", &self.links.audits());
        context.insert("view", view);
        self.templates.render("audits.html", &context)
    }

    pub fn not_found(&self, path: &str) -> Result<String> {
        let context = self.base_context("Page not found", path);
        self.templates.render("not_found.html", &context)
    }
}
