//! Blog list view

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::Links;
use crate::content::PostStore;
use crate::filter::{self, FilterState, Visible};
use crate::templates::{PaginationData, PostCard, TagButton};

/// Query string of the blog list: `?q=<term>&tag=<tag>&page=<n>`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub q: Option<String>,
    pub tag: Option<String>,
    /// Kept as text so a malformed value falls back to the first page
    pub page: Option<String>,
}

impl ListQuery {
    pub fn filter_state(&self) -> FilterState {
        FilterState::new(
            self.q.as_deref().unwrap_or(""),
            self.tag.as_deref().unwrap_or(""),
        )
    }

    /// Requested page, 1 when absent or unparseable
    pub fn page(&self) -> usize {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse::<usize>().ok())
            .unwrap_or(1)
            .max(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListState {
    /// No filter active
    Idle,
    /// A filter is active and matched at least one post
    Filtering,
    /// A filter is active and matched nothing
    NoResults,
}

/// Everything the blog list template needs
#[derive(Debug, Clone, Serialize)]
pub struct ListView {
    pub state: ListState,
    pub heading: String,
    pub search_term: String,
    pub selected_tag: String,
    pub featured: Option<PostCard>,
    pub posts: Vec<PostCard>,
    pub tags: Vec<TagButton>,
    /// Tag buttons are hidden while a search term is present
    pub show_tags: bool,
    pub message: Option<String>,
    pub pagination: Option<PaginationData>,
}

/// Builds [`ListView`]s from the post store
pub struct ListController {
    posts: Arc<PostStore>,
    links: Links,
    per_page: usize,
}

impl ListController {
    pub fn new(posts: Arc<PostStore>, links: Links, per_page: usize) -> Self {
        Self {
            posts,
            links,
            per_page: per_page.max(1),
        }
    }

    /// Number of pages in the unfiltered list
    pub fn page_count(&self) -> usize {
        filter::latest_posts(self.posts.posts())
            .len()
            .div_ceil(self.per_page)
            .max(1)
    }

    /// Build the list view for a filter state and requested page
    ///
    /// Pages only apply to the unfiltered view; out-of-range pages are
    /// clamped.
    pub fn view(&self, state: &FilterState, page: usize) -> ListView {
        let posts = self.posts.posts();
        let tags = filter::tag_universe(posts)
            .into_iter()
            .map(|name| TagButton {
                url: self.links.tag(&name),
                active: name == state.selected_tag,
                name,
            })
            .collect();

        let mut view = ListView {
            state: ListState::Idle,
            heading: heading(state),
            search_term: state.search_term.clone(),
            selected_tag: state.selected_tag.clone(),
            featured: None,
            posts: Vec::new(),
            tags,
            show_tags: !state.is_searching(),
            message: None,
            pagination: None,
        };

        match filter::visible_posts(posts, state) {
            Visible::Default { featured, latest } => {
                let total = latest.len().div_ceil(self.per_page).max(1);
                let current = page.clamp(1, total);
                let start = (current - 1) * self.per_page;

                if current == 1 {
                    view.featured = featured.map(|p| self.links.card(p));
                }
                view.posts = latest
                    .iter()
                    .skip(start)
                    .take(self.per_page)
                    .map(|p| self.links.card(p))
                    .collect();
                view.pagination = Some(self.pagination(current, total));
            }
            Visible::Filtered(found) if found.is_empty() => {
                view.state = ListState::NoResults;
                view.message = Some(no_results_message(state));
            }
            Visible::Filtered(found) => {
                view.state = ListState::Filtering;
                view.posts = found.iter().map(|p| self.links.card(p)).collect();
            }
        }

        tracing::debug!(
            "Blog list q={:?} tag={:?}: {:?} with {} posts",
            state.search_term,
            state.selected_tag,
            view.state,
            view.posts.len()
        );
        view
    }

    fn pagination(&self, current: usize, total: usize) -> PaginationData {
        PaginationData {
            per_page: self.per_page,
            total,
            current,
            current_url: self.links.page(current),
            prev: current.saturating_sub(1),
            prev_link: if current > 1 {
                self.links.page(current - 1)
            } else {
                String::new()
            },
            next: if current < total { current + 1 } else { 0 },
            next_link: if current < total {
                self.links.page(current + 1)
            } else {
                String::new()
            },
        }
    }
}

fn heading(state: &FilterState) -> String {
    if state.is_searching() {
        "Search Results".to_string()
    } else if state.has_tag_filter() {
        format!("Tag: {}", state.selected_tag)
    } else {
        "Latest Articles".to_string()
    }
}

fn no_results_message(state: &FilterState) -> String {
    if state.is_searching() {
        "No articles found matching your search.".to_string()
    } else {
        format!("No articles found with the tag \"{}\".", state.selected_tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Post;
    use crate::pages::LinkMode;

    fn controller(per_page: usize) -> ListController {
        let posts = vec![
            Post::new("a", "Reentrancy Bugs", "2024-01-01")
                .with_tags(&["Security"])
                .with_featured(true),
            Post::new("b", "Rust Patterns", "2024-02-01")
                .with_tags(&["Rust"])
                .with_featured(false),
        ];
        ListController::new(
            Arc::new(PostStore::new(posts)),
            Links::new("/", LinkMode::Dynamic, "page"),
            per_page,
        )
    }

    fn ids(view: &ListView) -> Vec<&str> {
        view.posts.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_idle_view() {
        let view = controller(9).view(&FilterState::default(), 1);
        assert_eq!(view.state, ListState::Idle);
        assert_eq!(view.heading, "Latest Articles");
        assert_eq!(view.featured.as_ref().unwrap().id, "a");
        assert_eq!(ids(&view), vec!["b"]);
        assert!(view.show_tags);
        assert!(view.message.is_none());

        let names: Vec<_> = view.tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["All", "Security", "Rust"]);
        assert!(view.tags[0].active);
    }

    #[test]
    fn test_search_view_hides_tags_and_featured() {
        let view = controller(9).view(&FilterState::search("rust"), 1);
        assert_eq!(view.state, ListState::Filtering);
        assert_eq!(view.heading, "Search Results");
        assert!(view.featured.is_none());
        assert!(!view.show_tags);
        assert_eq!(ids(&view), vec!["b"]);
        assert!(view.pagination.is_none());
    }

    #[test]
    fn test_tag_view() {
        let view = controller(9).view(&FilterState::tag("Security"), 1);
        assert_eq!(view.state, ListState::Filtering);
        assert_eq!(view.heading, "Tag: Security");
        assert_eq!(ids(&view), vec!["a"]);
        let active: Vec<_> = view.tags.iter().filter(|t| t.active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "Security");
    }

    #[test]
    fn test_no_results_messages() {
        let view = controller(9).view(&FilterState::tag("DeFi"), 1);
        assert_eq!(view.state, ListState::NoResults);
        assert_eq!(
            view.message.as_deref(),
            Some("No articles found with the tag \"DeFi\".")
        );

        let view = controller(9).view(&FilterState::search("zzz"), 1);
        assert_eq!(view.state, ListState::NoResults);
        assert_eq!(
            view.message.as_deref(),
            Some("No articles found matching your search.")
        );
    }

    #[test]
    fn test_idle_pagination_is_clamped() {
        let posts: Vec<Post> = (1..=5)
            .map(|i| Post::new(i, &format!("Post {}", i), &format!("2024-01-0{}", i)))
            .collect();
        let controller = ListController::new(
            Arc::new(PostStore::new(posts)),
            Links::new("/", LinkMode::Dynamic, "page"),
            2,
        );
        assert_eq!(controller.page_count(), 3);

        let view = controller.view(&FilterState::default(), 2);
        assert_eq!(ids(&view), vec!["3", "2"]);
        let pagination = view.pagination.unwrap();
        assert_eq!(pagination.prev_link, "/blog");
        assert_eq!(pagination.next_link, "/blog?page=3");

        let view = controller.view(&FilterState::default(), 42);
        assert_eq!(ids(&view), vec!["1"]);
        assert_eq!(view.pagination.unwrap().current, 3);
    }

    #[test]
    fn test_query_parsing() {
        let query = ListQuery {
            q: Some("rust".to_string()),
            tag: None,
            page: Some("two".to_string()),
        };
        assert_eq!(query.filter_state(), FilterState::search("rust"));
        assert_eq!(query.page(), 1);
        assert_eq!(ListQuery::default().filter_state(), FilterState::default());
    }

    #[test]
    fn test_empty_store() {
        let controller = ListController::new(
            Arc::new(PostStore::default()),
            Links::new("/", LinkMode::Dynamic, "page"),
            9,
        );
        let view = controller.view(&FilterState::default(), 1);
        assert_eq!(view.state, ListState::Idle);
        assert!(view.posts.is_empty());
        assert!(view.featured.is_none());
        assert_eq!(view.tags.len(), 1);
    }
}
