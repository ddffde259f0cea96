//! Blog filtering: search, tag facets and the featured post
//!
//! Everything here is a pure function of the post slice and a [`FilterState`],
//! so the visible list can be recomputed for every request without caching.

use indexmap::{IndexMap, IndexSet};

use crate::content::{Post, Tag};

/// Tag value meaning "no tag filter"
pub const ALL_TAG: &str = "All";

/// Search term and selected tag for one list view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    /// Empty means no text filter
    pub search_term: String,
    /// [`ALL_TAG`] means no tag filter
    pub selected_tag: String,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            selected_tag: ALL_TAG.to_string(),
        }
    }
}

impl FilterState {
    pub fn new(search_term: &str, selected_tag: &str) -> Self {
        let selected_tag = if selected_tag.is_empty() {
            ALL_TAG
        } else {
            selected_tag
        };
        Self {
            search_term: search_term.to_string(),
            selected_tag: selected_tag.to_string(),
        }
    }

    pub fn search(term: &str) -> Self {
        Self::new(term, ALL_TAG)
    }

    pub fn tag(tag: &str) -> Self {
        Self::new("", tag)
    }

    pub fn is_searching(&self) -> bool {
        !self.search_term.is_empty()
    }

    pub fn has_tag_filter(&self) -> bool {
        self.selected_tag != ALL_TAG
    }

    /// Whether either filter is active
    pub fn is_filtering(&self) -> bool {
        self.is_searching() || self.has_tag_filter()
    }
}

/// Posts visible in a list view
#[derive(Debug, Clone, PartialEq)]
pub enum Visible<'a> {
    /// No filter: featured post shown apart, the rest newest first
    Default {
        featured: Option<&'a Post>,
        latest: Vec<&'a Post>,
    },
    /// A filter is active; the list may be empty
    Filtered(Vec<&'a Post>),
}

/// Case-insensitive substring match on the title; empty terms match
pub fn matches_search(post: &Post, term: &str) -> bool {
    term.is_empty() || post.title.to_lowercase().contains(&term.to_lowercase())
}

/// Exact tag match; [`ALL_TAG`] matches every post
pub fn matches_tag(post: &Post, tag: &str) -> bool {
    tag == ALL_TAG || post.has_tag(tag)
}

/// The featured post: the first record flagged `featured`
pub fn featured_post(posts: &[Post]) -> Option<&Post> {
    posts.iter().find(|p| p.is_featured())
}

/// Sort newest first
///
/// The sort is stable, so posts sharing a date keep their input order. Posts
/// whose date cannot be parsed go last.
pub fn sort_by_date_desc(mut posts: Vec<&Post>) -> Vec<&Post> {
    posts.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));
    posts
}

/// Apply the search and tag filters
///
/// When no filter is active every flagged-featured post is left out, since
/// the featured block shows it instead. An active search keeps the featured
/// post like any other match.
pub fn filter_posts<'a>(posts: &'a [Post], state: &FilterState) -> Vec<&'a Post> {
    let featured = featured_post(posts);

    let mut result: Vec<&Post> = posts
        .iter()
        .filter(|p| matches_search(p, &state.search_term))
        .filter(|p| matches_tag(p, &state.selected_tag))
        .collect();

    let featured_in_result =
        |result: &[&Post], f: &Post| result.iter().any(|p| p.id == f.id);

    if !state.is_filtering() {
        result.retain(|p| !p.is_featured());
    } else if state.is_searching()
        && featured.is_some_and(|f| featured_in_result(&result, f))
    {
        // search hit on the featured post keeps it in the results
    } else if let Some(f) = featured {
        if state.has_tag_filter()
            && featured_in_result(&result, f)
            && !f.has_tag(&state.selected_tag)
        {
            result.retain(|p| p.id != f.id);
        }
    }

    sort_by_date_desc(result)
}

/// Latest posts for the default view: everything not flagged featured
pub fn latest_posts(posts: &[Post]) -> Vec<&Post> {
    sort_by_date_desc(posts.iter().filter(|p| !p.is_featured()).collect())
}

/// Compute what a list view shows for the given filter state
pub fn visible_posts<'a>(posts: &'a [Post], state: &FilterState) -> Visible<'a> {
    if state.is_filtering() {
        Visible::Filtered(filter_posts(posts, state))
    } else {
        Visible::Default {
            featured: featured_post(posts),
            latest: latest_posts(posts),
        }
    }
}

/// Selectable tags: [`ALL_TAG`] then every tag in first-seen order
pub fn tag_universe(posts: &[Post]) -> Vec<String> {
    let mut tags: IndexSet<&str> = IndexSet::new();
    tags.insert(ALL_TAG);
    for post in posts {
        for tag in &post.tags {
            tags.insert(tag.as_str());
        }
    }
    tags.into_iter().map(str::to_string).collect()
}

/// Tags with post counts, in first-seen order
pub fn tag_counts(posts: &[Post]) -> Vec<Tag> {
    let mut tags: IndexMap<&str, Tag> = IndexMap::new();
    for post in posts {
        for name in &post.tags {
            tags.entry(name.as_str())
                .or_insert_with(|| Tag::new(name))
                .count += 1;
        }
    }
    tags.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_posts() -> Vec<Post> {
        vec![
            Post::new("a", "Reentrancy Bugs", "2024-01-01")
                .with_tags(&["Security"])
                .with_featured(true),
            Post::new("b", "Rust Patterns", "2024-02-01")
                .with_tags(&["Rust"])
                .with_featured(false),
        ]
    }

    fn ids(posts: &[&Post]) -> Vec<String> {
        posts.iter().map(|p| p.id.to_string()).collect()
    }

    #[test]
    fn test_default_view_separates_featured() {
        let posts = scenario_posts();
        match visible_posts(&posts, &FilterState::default()) {
            Visible::Default { featured, latest } => {
                assert_eq!(featured.unwrap().id.to_string(), "a");
                assert_eq!(ids(&latest), vec!["b"]);
            }
            other => panic!("expected default view, got {:?}", other),
        }
        assert_eq!(ids(&filter_posts(&posts, &FilterState::default())), vec!["b"]);
    }

    #[test]
    fn test_search_matches_title_case_insensitively() {
        let posts = scenario_posts();
        let state = FilterState::search("rust");
        assert!(state.is_filtering());
        assert_eq!(ids(&filter_posts(&posts, &state)), vec!["b"]);
        assert_eq!(
            visible_posts(&posts, &state),
            Visible::Filtered(vec![&posts[1]])
        );
    }

    #[test]
    fn test_search_keeps_matching_featured_post() {
        let posts = scenario_posts();
        let state = FilterState::search("REENTRANCY");
        assert_eq!(ids(&filter_posts(&posts, &state)), vec!["a"]);
    }

    #[test]
    fn test_search_ignores_excerpt() {
        let mut posts = scenario_posts();
        posts[1].excerpt = "all about reentrancy".to_string();
        let state = FilterState::search("reentrancy");
        assert_eq!(ids(&filter_posts(&posts, &state)), vec!["a"]);
    }

    #[test]
    fn test_tag_filter_reincludes_featured() {
        let posts = scenario_posts();
        let state = FilterState::tag("Security");
        assert!(state.is_filtering());
        assert_eq!(ids(&filter_posts(&posts, &state)), vec!["a"]);
    }

    #[test]
    fn test_unknown_tag_yields_empty_filtered_list() {
        let posts = scenario_posts();
        let state = FilterState::tag("DeFi");
        assert_eq!(visible_posts(&posts, &state), Visible::Filtered(vec![]));
    }

    #[test]
    fn test_tag_filter_is_case_sensitive() {
        let posts = scenario_posts();
        assert!(filter_posts(&posts, &FilterState::tag("security")).is_empty());
    }

    #[test]
    fn test_combined_filters_are_conjunctive() {
        let posts = vec![
            Post::new(1, "Rust Security", "2024-01-01").with_tags(&["Security"]),
            Post::new(2, "Rust Patterns", "2024-01-02").with_tags(&["Rust"]),
            Post::new(3, "Solana Security", "2024-01-03").with_tags(&["Security"]),
        ];
        let state = FilterState::new("rust", "Security");
        assert_eq!(ids(&filter_posts(&posts, &state)), vec!["1"]);
    }

    #[test]
    fn test_sort_is_stable_and_puts_unknown_dates_last() {
        let posts = vec![
            Post::new(1, "undated", "someday"),
            Post::new(2, "old", "2023-01-01"),
            Post::new(3, "tie-first", "March 10, 2023"),
            Post::new(4, "tie-second", "2023-03-10"),
            Post::new(5, "new", "2024-05-01"),
        ];
        let sorted = sort_by_date_desc(posts.iter().collect());
        assert_eq!(ids(&sorted), vec!["5", "3", "4", "2", "1"]);
    }

    #[test]
    fn test_first_featured_wins() {
        let posts = vec![
            Post::new(1, "one", "2024-01-01").with_featured(true),
            Post::new(2, "two", "2024-02-01").with_featured(true),
            Post::new(3, "three", "2024-03-01"),
        ];
        assert_eq!(featured_post(&posts).unwrap().id.to_string(), "1");
        // every flagged post stays out of the default list
        assert_eq!(ids(&latest_posts(&posts)), vec!["3"]);
    }

    #[test]
    fn test_tag_universe_first_seen_order() {
        let posts = vec![
            Post::new(1, "a", "2024-01-01").with_tags(&["Security", "Solana"]),
            Post::new(2, "b", "2024-01-01").with_tags(&["Rust", "Security"]),
            Post::new(3, "c", "2024-01-01").with_tags(&["DeFi", "Solana"]),
        ];
        assert_eq!(
            tag_universe(&posts),
            vec!["All", "Security", "Solana", "Rust", "DeFi"]
        );
        assert_eq!(tag_universe(&[]), vec!["All"]);
    }

    #[test]
    fn test_tag_counts() {
        let posts = vec![
            Post::new(1, "a", "2024-01-01").with_tags(&["Security", "Solana"]),
            Post::new(2, "b", "2024-01-01").with_tags(&["Security"]),
        ];
        let counts: Vec<_> = tag_counts(&posts)
            .into_iter()
            .map(|t| (t.name, t.count))
            .collect();
        assert_eq!(
            counts,
            vec![("Security".to_string(), 2), ("Solana".to_string(), 1)]
        );
    }

    #[test]
    fn test_empty_tag_means_all() {
        assert_eq!(FilterState::new("", ""), FilterState::default());
    }

    mod properties {
        use super::*;
        use crate::content::PostId;
        use proptest::prelude::*;

        const TAGS: &[&str] = &["Security", "Rust", "Solana", "DeFi"];
        const WORDS: &[&str] = &["Rust", "audit", "Solana", "bridge", "Vault"];

        fn arb_post() -> impl Strategy<Value = Post> {
            (
                0usize..WORDS.len(),
                0usize..WORDS.len(),
                2020i32..2025,
                1u32..13,
                1u32..29,
                proptest::sample::subsequence(TAGS, 0..=TAGS.len()),
                proptest::bool::weighted(0.2),
            )
                .prop_map(|(w1, w2, y, m, d, tags, featured)| {
                    let title = format!("{} {}", WORDS[w1], WORDS[w2]);
                    let date = format!("{:04}-{:02}-{:02}", y, m, d);
                    Post::new(0, &title, &date)
                        .with_tags(&tags)
                        .with_featured(featured)
                })
        }

        fn arb_posts() -> impl Strategy<Value = Vec<Post>> {
            proptest::collection::vec(arb_post(), 0..12).prop_map(|posts| {
                posts
                    .into_iter()
                    .enumerate()
                    .map(|(i, mut post)| {
                        post.id = PostId::Int(i as i64);
                        post
                    })
                    .collect()
            })
        }

        fn arb_term() -> impl Strategy<Value = String> {
            prop_oneof![
                Just(String::new()),
                Just("rust".to_string()),
                Just("AUDIT".to_string()),
                Just("sol".to_string()),
                Just("zzz".to_string()),
            ]
        }

        fn arb_tag() -> impl Strategy<Value = String> {
            prop_oneof![
                Just(ALL_TAG.to_string()),
                Just("Security".to_string()),
                Just("Rust".to_string()),
                Just("Unused".to_string()),
            ]
        }

        fn is_sorted_desc(posts: &[&Post]) -> bool {
            posts
                .windows(2)
                .all(|w| w[0].timestamp() >= w[1].timestamp())
        }

        proptest! {
            #[test]
            fn search_returns_only_title_matches(posts in arb_posts(), term in arb_term()) {
                prop_assume!(!term.is_empty());
                let result = filter_posts(&posts, &FilterState::search(&term));
                for post in &result {
                    prop_assert!(post.title.to_lowercase().contains(&term.to_lowercase()));
                }
                let expected = posts.iter().filter(|p| matches_search(p, &term)).count();
                prop_assert_eq!(result.len(), expected);
            }

            #[test]
            fn tag_filter_returns_only_tagged_posts(posts in arb_posts(), tag in arb_tag()) {
                prop_assume!(tag != ALL_TAG);
                let result = filter_posts(&posts, &FilterState::tag(&tag));
                for post in &result {
                    prop_assert!(post.has_tag(&tag));
                }
                prop_assert_eq!(result.len(), posts.iter().filter(|p| p.has_tag(&tag)).count());
            }

            #[test]
            fn combined_filter_is_intersection(posts in arb_posts(), term in arb_term(), tag in arb_tag()) {
                prop_assume!(!term.is_empty() && tag != ALL_TAG);
                let by_search = filter_posts(&posts, &FilterState::search(&term));
                let by_tag = filter_posts(&posts, &FilterState::tag(&tag));
                let combined = filter_posts(&posts, &FilterState::new(&term, &tag));
                let expected: Vec<&Post> = by_search
                    .iter()
                    .copied()
                    .filter(|p| by_tag.iter().any(|q| std::ptr::eq(*p, *q)))
                    .collect();
                prop_assert_eq!(combined, expected);
            }

            #[test]
            fn output_is_sorted_and_idempotent(posts in arb_posts(), term in arb_term(), tag in arb_tag()) {
                let state = FilterState::new(&term, &tag);
                let first = filter_posts(&posts, &state);
                let second = filter_posts(&posts, &state);
                prop_assert!(is_sorted_desc(&first));
                prop_assert_eq!(first, second);
            }

            #[test]
            fn tag_universe_is_deduplicated_with_all_first(posts in arb_posts()) {
                let tags = tag_universe(&posts);
                prop_assert_eq!(tags[0].as_str(), ALL_TAG);
                let unique: IndexSet<&String> = tags.iter().collect();
                prop_assert_eq!(unique.len(), tags.len());
                for post in &posts {
                    for tag in &post.tags {
                        prop_assert!(tags.contains(tag));
                    }
                }
            }
        }
    }
}
