//! Blog post detail view
//!
//! A detail page shows the post header at once and fills in the body when
//! the content has been fetched and rendered. [`DetailSession`] holds the
//! current view and a generation counter: every navigation bumps the
//! generation, and a fetch that finishes for an older generation is dropped.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use super::Links;
use crate::content::{ContentFetcher, ContentFormat, ContentRef, MarkdownRenderer, Post, PostStore};
use crate::templates::{NavPost, PostCard};

/// Shown in place of the body when the content cannot be loaded
pub const FETCH_FAILED_MESSAGE: &str = "Failed to load article content. Please try again later.";

/// Shown when a post has neither inline content nor a content path
pub const NO_CONTENT_MESSAGE: &str = "This article has no content yet.";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ContentState {
    Loading,
    Loaded { html: String },
    Failed { message: String },
}

impl ContentState {
    pub fn failed(message: &str) -> Self {
        ContentState::Failed {
            message: message.to_string(),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ContentState::Loading)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailView {
    pub post: PostCard,
    pub content: ContentState,
    /// Newer neighbour in date order
    pub prev: Option<NavPost>,
    /// Older neighbour in date order
    pub next: Option<NavPost>,
}

/// Generation a fetch was started for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// The state of one detail view across navigations
#[derive(Debug, Default)]
pub struct DetailSession {
    generation: AtomicU64,
    view: Mutex<Option<DetailView>>,
}

impl DetailSession {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> MutexGuard<'_, Option<DetailView>> {
        self.view.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Show a new view and start a new generation
    pub fn navigate(&self, view: DetailView) -> Ticket {
        let mut slot = self.slot();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *slot = Some(view);
        Ticket(generation)
    }

    /// Discard the view; results still in flight are ignored
    pub fn leave(&self) {
        let mut slot = self.slot();
        self.generation.fetch_add(1, Ordering::SeqCst);
        *slot = None;
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    /// Apply a content result if its ticket is still current
    ///
    /// Returns the updated view, taken under the same lock as the update, or
    /// `None` when the result was stale.
    pub fn resolve(&self, ticket: Ticket, content: ContentState) -> Option<DetailView> {
        let mut slot = self.slot();
        if !self.is_current(ticket) {
            tracing::debug!(
                "Discarding stale content for generation {} (current {})",
                ticket.0,
                self.generation.load(Ordering::SeqCst)
            );
            return None;
        }
        let view = slot.as_mut()?;
        view.content = content;
        Some(view.clone())
    }

    /// Snapshot of the current view
    pub fn view(&self) -> Option<DetailView> {
        self.slot().clone()
    }
}

/// Result of showing a post in a session
#[derive(Debug, Clone, PartialEq)]
pub enum DetailOutcome {
    /// No post has the requested id; nothing was fetched
    NotFound,
    Rendered(DetailView),
    /// Another navigation replaced the view before the content arrived
    Superseded,
}

/// Loads posts for the detail page
pub struct DetailController {
    posts: Arc<PostStore>,
    fetcher: Arc<dyn ContentFetcher>,
    renderer: Arc<MarkdownRenderer>,
    links: Links,
    timeout: Duration,
}

impl DetailController {
    pub fn new(
        posts: Arc<PostStore>,
        fetcher: Arc<dyn ContentFetcher>,
        renderer: Arc<MarkdownRenderer>,
        links: Links,
        timeout: Duration,
    ) -> Self {
        Self {
            posts,
            fetcher,
            renderer,
            links,
            timeout,
        }
    }

    /// Load a post into a fresh session; `None` when the id is unknown
    pub async fn load(&self, id: &str) -> Option<DetailView> {
        let session = DetailSession::new();
        match self.show(&session, id).await {
            DetailOutcome::Rendered(view) => Some(view),
            DetailOutcome::NotFound | DetailOutcome::Superseded => None,
        }
    }

    /// Navigate a session to a post and load its content
    pub async fn show(&self, session: &DetailSession, id: &str) -> DetailOutcome {
        let post = match self.posts.get(id) {
            Ok(post) => post,
            Err(e) => {
                tracing::debug!("{}", e);
                session.leave();
                return DetailOutcome::NotFound;
            }
        };

        let ticket = session.navigate(self.header(post));
        let content = self.load_content(post).await;

        match session.resolve(ticket, content) {
            Some(view) => DetailOutcome::Rendered(view),
            None => DetailOutcome::Superseded,
        }
    }

    /// Header view with the body still loading
    pub fn header(&self, post: &Post) -> DetailView {
        let ordered = self.posts.sorted_by_date();
        DetailView {
            post: self.links.card(post),
            content: ContentState::Loading,
            prev: post.prev(&ordered).map(|p| self.links.nav(p)),
            next: post.next(&ordered).map(|p| self.links.nav(p)),
        }
    }

    /// Fetch and render a post body
    ///
    /// Errors never escape: a failed or timed-out fetch becomes
    /// [`ContentState::Failed`].
    pub async fn load_content(&self, post: &Post) -> ContentState {
        match post.content_ref() {
            None => {
                tracing::warn!("Post {} has no content or contentPath", post.id);
                ContentState::failed(NO_CONTENT_MESSAGE)
            }
            Some(ContentRef::Inline(body)) => ContentState::Loaded {
                html: self
                    .renderer
                    .render_content(body, ContentFormat::of_inline(body)),
            },
            Some(ContentRef::Remote(path)) => {
                match tokio::time::timeout(self.timeout, self.fetcher.fetch(path)).await {
                    Ok(Ok(body)) => ContentState::Loaded {
                        html: self
                            .renderer
                            .render_content(&body, ContentFormat::of_path(path)),
                    },
                    Ok(Err(e)) => {
                        tracing::warn!("Loading content for post {} failed: {}", post.id, e);
                        ContentState::failed(FETCH_FAILED_MESSAGE)
                    }
                    Err(_) => {
                        tracing::warn!(
                            "Loading content for post {} timed out after {:?}",
                            post.id,
                            self.timeout
                        );
                        ContentState::failed(FETCH_FAILED_MESSAGE)
                    }
                }
            }
        }
    }
}
