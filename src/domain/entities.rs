//! Canonical read-only projections of CMS content.

use quire_api_types::CmsId;
use serde::Serialize;
use time::{OffsetDateTime, macros::format_description};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    pub id: Option<CmsId>,
    pub document_id: Option<String>,
    pub title: String,
    pub slug: String,
    #[serde(with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub published_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
    pub content: String,
    pub author: Option<Author>,
    pub categories: Vec<Category>,
    pub cover_image: Option<ImageRef>,
}

impl Post {
    /// Title with any leading markdown heading marker removed.
    pub fn display_title(&self) -> &str {
        strip_heading_marker(&self.title)
    }

    /// "Month D, YYYY" of the last update, falling back to the publish date.
    pub fn display_date(&self) -> Option<String> {
        let format = format_description!("[month repr:long] [day padding:none], [year]");
        self.updated_at
            .or(self.published_at)
            .and_then(|at| at.format(&format).ok())
    }

    pub fn category_titles(&self) -> Vec<&str> {
        self.categories
            .iter()
            .map(|category| category.title.as_str())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Author {
    pub id: Option<CmsId>,
    pub document_id: Option<String>,
    pub name: String,
    /// Never empty once normalized.
    pub slug: String,
    pub avatar: Option<ImageRef>,
    pub profiles: SocialProfiles,
    pub bio: Option<String>,
}

impl Author {
    /// Upper-cased first letter of the name, used for avatar placeholders.
    pub fn initial(&self) -> Option<char> {
        self.name
            .trim()
            .chars()
            .next()
            .and_then(|ch| ch.to_uppercase().next())
    }

    pub fn social_links(&self) -> Vec<SocialLink<'_>> {
        [
            (SocialNetwork::LinkedIn, self.profiles.linkedin.as_deref()),
            (SocialNetwork::Medium, self.profiles.medium.as_deref()),
            (SocialNetwork::DevTo, self.profiles.dev_to.as_deref()),
        ]
        .into_iter()
        .filter_map(|(network, url)| url.map(|url| SocialLink { network, url }))
        .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SocialProfiles {
    pub linkedin: Option<String>,
    pub medium: Option<String>,
    pub dev_to: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SocialNetwork {
    LinkedIn,
    Medium,
    DevTo,
}

impl SocialNetwork {
    pub fn label(self) -> &'static str {
        match self {
            Self::LinkedIn => "LinkedIn",
            Self::Medium => "Medium",
            Self::DevTo => "DEV.to",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SocialLink<'a> {
    pub network: SocialNetwork,
    pub url: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: Option<CmsId>,
    pub document_id: Option<String>,
    pub title: String,
    pub order: i64,
}

/// Image as referenced by the CMS; `url` is usually relative to the CMS origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageRef {
    pub url: String,
    pub alt: Option<String>,
}

/// Remove a leading ATX heading marker (one to six `#` followed by
/// whitespace) and trim what remains. Titles without one are returned as-is.
pub fn strip_heading_marker(title: &str) -> &str {
    let trimmed = title.trim_start();
    let rest = trimmed.trim_start_matches('#');
    let level = trimmed.len() - rest.len();
    if (1..=6).contains(&level) && rest.starts_with(char::is_whitespace) {
        rest.trim()
    } else {
        title
    }
}
