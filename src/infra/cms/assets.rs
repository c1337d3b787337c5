//! Public URLs for CMS-hosted media.

use url::Url;

use crate::domain::entities::{Author, Post};

const COVER_PLACEHOLDER: &str = "https://placehold.co/600x400/FFE4E6/000000/png";
const AVATAR_PLACEHOLDER: &str = "https://ui-avatars.com/api/";

/// Resolve a media path against the CMS origin. Absolute URLs are kept;
/// blank paths resolve to nothing.
pub fn resolve_asset_url(origin: &Url, path: &str) -> Option<Url> {
    let path = path.trim();
    if path.is_empty() {
        return None;
    }
    match Url::parse(path) {
        Ok(absolute) => Some(absolute),
        Err(url::ParseError::RelativeUrlWithoutBase) => origin.join(path).ok(),
        Err(_) => None,
    }
}

/// Cover image of `post`, or a generated placeholder carrying its title.
pub fn cover_url(origin: &Url, post: &Post) -> Option<Url> {
    post.cover_image
        .as_ref()
        .and_then(|image| resolve_asset_url(origin, &image.url))
        .or_else(|| {
            Url::parse_with_params(COVER_PLACEHOLDER, [("text", post.display_title())]).ok()
        })
}

/// Avatar of `author`, or a generated placeholder from their name.
pub fn avatar_url(origin: &Url, author: &Author) -> Option<Url> {
    author
        .avatar
        .as_ref()
        .and_then(|image| resolve_asset_url(origin, &image.url))
        .or_else(|| {
            Url::parse_with_params(
                AVATAR_PLACEHOLDER,
                [
                    ("name", author.name.as_str()),
                    ("background", "FFE4E6"),
                    ("color", "000"),
                ],
            )
            .ok()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{ImageRef, SocialProfiles};

    fn origin() -> Url {
        Url::parse("http://cms.local:1337/").expect("origin")
    }

    fn post(cover: Option<&str>) -> Post {
        Post {
            id: None,
            document_id: None,
            title: "# Hello World".into(),
            slug: "hello-world".into(),
            created_at: None,
            published_at: None,
            updated_at: None,
            content: String::new(),
            author: None,
            categories: Vec::new(),
            cover_image: cover.map(|url| ImageRef {
                url: url.into(),
                alt: None,
            }),
        }
    }

    #[test]
    fn relative_paths_resolve_against_origin() {
        let url = resolve_asset_url(&origin(), "/uploads/a.png").expect("url");
        assert_eq!(url.as_str(), "http://cms.local:1337/uploads/a.png");
    }

    #[test]
    fn absolute_urls_are_kept() {
        let url = resolve_asset_url(&origin(), "https://cdn.example.com/a.png").expect("url");
        assert_eq!(url.as_str(), "https://cdn.example.com/a.png");
        assert_eq!(resolve_asset_url(&origin(), "  "), None);
    }

    #[test]
    fn missing_cover_uses_titled_placeholder() {
        let url = cover_url(&origin(), &post(None)).expect("placeholder");
        assert_eq!(url.host_str(), Some("placehold.co"));
        assert_eq!(url.query(), Some("text=Hello+World"));

        let url = cover_url(&origin(), &post(Some("/uploads/c.png"))).expect("cover");
        assert_eq!(url.path(), "/uploads/c.png");
    }

    #[test]
    fn missing_avatar_uses_name_placeholder() {
        let author = Author {
            id: None,
            document_id: None,
            name: "Ada Lovelace".into(),
            slug: "ada-lovelace".into(),
            avatar: None,
            profiles: SocialProfiles::default(),
            bio: None,
        };
        let url = avatar_url(&origin(), &author).expect("placeholder");
        assert_eq!(url.host_str(), Some("ui-avatars.com"));
        assert!(url.query().is_some_and(|q| q.starts_with("name=Ada+Lovelace")));
    }
}
