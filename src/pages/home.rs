//! Home page

use serde::Serialize;
use std::sync::Arc;

use super::audits::row;
use super::Links;
use crate::content::{AuditStore, PostStore};
use crate::filter;
use crate::templates::{AuditRow, PostCard};

/// Posts and audits teased on the home page
const HOME_ITEMS: usize = 3;

#[derive(Debug, Clone, Serialize)]
pub struct HomeView {
    pub featured: Option<PostCard>,
    pub latest_posts: Vec<PostCard>,
    pub latest_audits: Vec<AuditRow>,
}

pub struct HomeController {
    posts: Arc<PostStore>,
    audits: Arc<AuditStore>,
    links: Links,
}

impl HomeController {
    pub fn new(posts: Arc<PostStore>, audits: Arc<AuditStore>, links: Links) -> Self {
        Self {
            posts,
            audits,
            links,
        }
    }

    pub fn view(&self) -> HomeView {
        let posts = self.posts.posts();
        HomeView {
            featured: filter::featured_post(posts).map(|p| self.links.card(p)),
            latest_posts: filter::latest_posts(posts)
                .into_iter()
                .take(HOME_ITEMS)
                .map(|p| self.links.card(p))
                .collect(),
            latest_audits: self
                .audits
                .search("")
                .into_iter()
                .take(HOME_ITEMS)
                .map(row)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Post;
    use crate::pages::LinkMode;

    #[test]
    fn test_home_view() {
        let posts = vec![
            Post::new(1, "Featured", "2024-05-01").with_featured(true),
            Post::new(2, "Two", "2024-01-02"),
            Post::new(3, "Three", "2024-01-03"),
            Post::new(4, "Four", "2024-01-04"),
            Post::new(5, "Five", "2024-01-05"),
        ];
        let controller = HomeController::new(
            Arc::new(PostStore::new(posts)),
            Arc::new(AuditStore::default()),
            Links::new("/", LinkMode::Dynamic, "page"),
        );
        let view = controller.view();
        assert_eq!(view.featured.unwrap().title, "Featured");
        let titles: Vec<_> = view.latest_posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Five", "Four", "Three"]);
        assert!(view.latest_audits.is_empty());
    }
}
