//! Content loader - builds the stores, renderer and fetcher for a site

use super::{AuditStore, MarkdownRenderer, PostStore, SiteFetcher};
use crate::error::Result;
use crate::Site;

/// Loads content according to the site configuration
pub struct ContentLoader<'a> {
    site: &'a Site,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(site: &'a Site) -> Self {
        Self { site }
    }

    /// Load every post from the data directory
    ///
    /// A missing or malformed file yields an empty store.
    pub fn load_posts(&self) -> PostStore {
        PostStore::load_or_empty(self.site.posts_path())
    }

    /// Load the audit portfolio from the data directory
    pub fn load_audits(&self) -> AuditStore {
        AuditStore::load_or_empty(self.site.audits_path())
    }

    /// Markdown renderer configured from the highlight settings
    pub fn renderer(&self) -> MarkdownRenderer {
        let highlight = &self.site.config.highlight;
        MarkdownRenderer::with_options(&highlight.theme, highlight.line_number)
    }

    /// Fetcher for `contentPath` references
    pub fn fetcher(&self) -> Result<SiteFetcher> {
        SiteFetcher::new(
            &self.site.static_dir,
            self.site.config.content_base_url.clone(),
            self.site.config.fetch_timeout(),
        )
    }
}
