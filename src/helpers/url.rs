//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left untouched in query values
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

/// Generate a URL with the root path
///
/// # Examples
/// ```ignore
/// url_for("/site/", "/blog/3") // -> "/site/blog/3"
/// ```
pub fn url_for(root: &str, path: &str) -> String {
    let root = root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Percent-encode a single query-string value
pub fn encode_query_value(value: &str) -> String {
    utf8_percent_encode(value, QUERY_VALUE).to_string()
}

/// Blog list URL carrying the given filter parameters
///
/// Empty search terms, the "All" tag and the first page are left out so the
/// default view keeps a clean URL.
pub fn blog_list_url(root: &str, search: &str, tag: &str, page: usize) -> String {
    let mut params = Vec::new();
    if !search.is_empty() {
        params.push(format!("q={}", encode_query_value(search)));
    }
    if !tag.is_empty() && tag != crate::filter::ALL_TAG {
        params.push(format!("tag={}", encode_query_value(tag)));
    }
    if page > 1 {
        params.push(format!("page={}", page));
    }

    let base = url_for(root, "blog");
    if params.is_empty() {
        base
    } else {
        format!("{}?{}", base, params.join("&"))
    }
}

/// Detail page URL for a post id
pub fn post_url(root: &str, id: &str) -> String {
    url_for(root, &format!("blog/{}", utf8_percent_encode(id, QUERY_VALUE)))
}
