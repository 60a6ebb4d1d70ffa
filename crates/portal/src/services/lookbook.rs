//! Lookbook feed view.

use serde::Serialize;

use customer_ops_core::LookbookPostType;

use crate::models::LookbookPost;

const FEATURED_SLOTS: usize = 2;

/// The lookbook screen: a featured strip and the filtered feed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LookbookFeed {
    /// Up to two featured posts. Only shown on the unfiltered feed.
    pub featured: Vec<LookbookPost>,
    pub posts: Vec<LookbookPost>,
}

impl LookbookFeed {
    /// Build the feed from posts sorted newest first.
    #[must_use]
    pub fn build(posts: Vec<LookbookPost>, kind: Option<LookbookPostType>) -> Self {
        match kind {
            Some(kind) => Self {
                featured: Vec::new(),
                posts: posts.into_iter().filter(|p| p.kind == kind).collect(),
            },
            None => Self {
                featured: posts
                    .iter()
                    .filter(|p| p.featured)
                    .take(FEATURED_SLOTS)
                    .cloned()
                    .collect(),
                posts,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use customer_ops_core::LookbookPostId;

    use super::*;

    fn post(id: &str, kind: LookbookPostType, featured: bool) -> LookbookPost {
        LookbookPost {
            id: LookbookPostId::new(id),
            kind,
            title: id.to_owned(),
            subtitle: None,
            content: String::new(),
            image_url: None,
            images: Vec::new(),
            date: None,
            featured,
            created_at: None,
            updated_at: None,
        }
    }

    fn posts() -> Vec<LookbookPost> {
        vec![
            post("a", LookbookPostType::Campaign, true),
            post("b", LookbookPostType::News, false),
            post("c", LookbookPostType::Photoshoot, true),
            post("d", LookbookPostType::Catalogue, true),
        ]
    }

    #[test]
    fn test_unfiltered_feed_has_two_featured() {
        let feed = LookbookFeed::build(posts(), None);
        let featured: Vec<_> = feed.featured.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(featured, vec!["a", "c"]);
        assert_eq!(feed.posts.len(), 4);
    }

    #[test]
    fn test_type_filter_hides_featured() {
        let feed = LookbookFeed::build(posts(), Some(LookbookPostType::News));
        assert!(feed.featured.is_empty());
        assert_eq!(feed.posts.len(), 1);
        assert_eq!(feed.posts[0].id.as_str(), "b");
    }
}
