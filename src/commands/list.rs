//! List site content

use anyhow::Result;

use crate::content::loader::ContentLoader;
use crate::filter;
use crate::Site;

/// List site content by type
pub fn run(site: &Site, content_type: &str) -> Result<()> {
    let loader = ContentLoader::new(site);

    match content_type {
        "post" | "posts" => {
            let posts = loader.load_posts();
            println!("Posts ({}):", posts.len());
            for post in posts.sorted_by_date() {
                println!(
                    "  {} - {} [{}]{}",
                    post.timestamp()
                        .map(|d| d.format("%Y-%m-%d").to_string())
                        .unwrap_or_else(|| post.date.clone()),
                    post.title,
                    post.id,
                    if post.is_featured() { " *featured*" } else { "" }
                );
            }
        }
        "tag" | "tags" => {
            let posts = loader.load_posts();
            let mut tags = filter::tag_counts(posts.posts());
            println!("Tags ({}):", tags.len());
            // stable: ties keep first-seen order
            tags.sort_by(|a, b| b.count.cmp(&a.count));
            for tag in tags {
                println!("  {} ({})", tag.name, tag.count);
            }
        }
        "audit" | "audits" => {
            let audits = loader.load_audits();
            println!("Audits ({}):", audits.audits().len());
            for audit in audits.search("") {
                println!(
                    "  {} - {} [{} / {}] {} ({} findings)",
                    audit.date,
                    audit.project_name,
                    audit.category,
                    audit.platform,
                    audit.severity.label(),
                    audit.findings
                );
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, tag, audit",
                content_type
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_known_types_on_empty_site() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::new(dir.path()).unwrap();
        assert!(run(&site, "post").is_ok());
        assert!(run(&site, "tags").is_ok());
        assert!(run(&site, "audit").is_ok());
    }

    #[test]
    fn test_list_unknown_type() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::new(dir.path()).unwrap();
        let err = run(&site, "category").unwrap_err();
        assert!(err.to_string().contains("Unknown type: category"));
    }
}
