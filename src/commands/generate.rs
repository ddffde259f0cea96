//! Export the site as static HTML
//!
//! The exported tree mirrors the served routes: `index.html`, `audits/`,
//! `blog/` with one directory per page, per tag and per post, and `404.html`.
//! Static pages have no query strings, so search is left out and tag filters
//! become `blog/tags/<slug>/`.

use anyhow::Result;
use indexmap::IndexMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

use crate::content::loader::ContentLoader;
use crate::content::{ContentFetcher, Post};
use crate::filter::{self, FilterState, ALL_TAG};
use crate::pages::{
    AuditsController, DetailController, HomeController, LinkMode, Links, ListController,
    PageRenderer,
};
use crate::Site;

/// Generate the static site
pub async fn run(site: &Site) -> Result<()> {
    let start = std::time::Instant::now();

    let loader = ContentLoader::new(site);
    let posts = Arc::new(loader.load_posts());
    let audits = Arc::new(loader.load_audits());
    let fetcher: Arc<dyn ContentFetcher> = Arc::new(loader.fetcher()?);

    let links = Links::from_config(&site.config, LinkMode::Static);
    let pages = PageRenderer::new(&site.config, links.clone())?;
    let home = HomeController::new(posts.clone(), audits.clone(), links.clone());
    let list = ListController::new(posts.clone(), links.clone(), site.config.page_size());
    let audit_list = AuditsController::new(audits);
    let detail = DetailController::new(
        posts.clone(),
        fetcher,
        Arc::new(loader.renderer()),
        links,
        site.config.fetch_timeout(),
    );

    let public = &site.public_dir;
    fs::create_dir_all(public)?;
    let mut written = copy_static_assets(site)?;

    write_page(&public.join("index.html"), &pages.home(&home.view())?)?;
    write_page(
        &public.join("audits/index.html"),
        &pages.audits(&audit_list.view(""))?,
    )?;
    written += 2;

    // Blog index pages
    let idle = FilterState::default();
    for page in 1..=list.page_count() {
        let path = if page == 1 {
            public.join("blog/index.html")
        } else {
            public
                .join("blog")
                .join(&site.config.pagination_dir)
                .join(page.to_string())
                .join("index.html")
        };
        write_page(&path, &pages.blog(&list.view(&idle, page))?)?;
        written += 1;
    }

    // Tag pages
    for (slug, tag) in tag_dirs(posts.posts()) {
        let path = public.join("blog/tags").join(&slug).join("index.html");
        write_page(&path, &pages.blog(&list.view(&FilterState::tag(&tag), 1))?)?;
        written += 1;
    }

    // Post pages
    for post in posts.posts() {
        let id = post.id.to_string();
        let Some(dir) = post_dir(public, &id, &site.config.pagination_dir) else {
            tracing::warn!("Skipping post with unusable id {:?}", id);
            continue;
        };
        match detail.load(&id).await {
            Some(view) => {
                write_page(&dir.join("index.html"), &pages.post(&view)?)?;
                written += 1;
            }
            None => tracing::warn!("Post {:?} disappeared during export", id),
        }
    }

    write_page(&public.join("404.html"), &pages.not_found("/404.html")?)?;
    written += 1;

    tracing::info!(
        "Generated {} files in {:.2}s",
        written,
        start.elapsed().as_secs_f64()
    );
    Ok(())
}

/// Directory slug and tag for every tag page, first tag wins a shared slug
fn tag_dirs(posts: &[Post]) -> IndexMap<String, String> {
    let mut dirs: IndexMap<String, String> = IndexMap::new();
    for tag in filter::tag_universe(posts) {
        if tag == ALL_TAG {
            continue;
        }
        let slug = slug::slugify(&tag);
        match dirs.get(&slug) {
            Some(first) => tracing::warn!(
                "Tags {:?} and {:?} share blog/tags/{}/, only {:?} gets a page",
                first,
                tag,
                slug,
                first
            ),
            None => {
                dirs.insert(slug, tag);
            }
        }
    }
    dirs
}

/// Output directory for a post, `None` when the id cannot be a path segment
/// or collides with the tag or pagination directories
fn post_dir(public: &Path, id: &str, pagination_dir: &str) -> Option<PathBuf> {
    let usable = !id.is_empty()
        && id != "."
        && id != ".."
        && !id.contains(['/', '\\'])
        && id != "tags"
        && id != pagination_dir;
    usable.then(|| public.join("blog").join(id))
}

fn write_page(path: &Path, html: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| anyhow::anyhow!("Failed to create dir {:?}: {}", parent, e))?;
    }
    fs::write(path, html).map_err(|e| anyhow::anyhow!("Failed to write {:?}: {}", path, e))?;
    tracing::debug!("Generated: {:?}", path);
    Ok(())
}

/// Copy the static directory to `public/static`
fn copy_static_assets(site: &Site) -> Result<usize> {
    let source_dir = &site.static_dir;
    if !source_dir.exists() {
        return Ok(0);
    }

    let target_dir = site.public_dir.join("static");
    let mut copied = 0;
    for entry in WalkDir::new(source_dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let relative = path.strip_prefix(source_dir)?;
        let dest = target_dir.join(relative);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(path, &dest)?;
        copied += 1;
    }

    tracing::debug!("Copied {} static assets", copied);
    Ok(copied)
}
