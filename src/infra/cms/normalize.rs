//! Raw CMS records → domain entities.
//!
//! Missing or malformed fields never fail a record: each gets a best-effort
//! fallback (empty title, derived slug, absent timestamps).

use quire_api_types::{
    Payload, RawAuthor, RawCategory, RawMedia, RawPost, parse_item, relation_many, relation_one,
};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tracing::warn;

use crate::application::error::FetchError;
use crate::domain::entities::{Author, Category, ImageRef, Post, SocialProfiles};
use crate::domain::slug::{author_slug, derive_slug};

const ANONYMOUS_AUTHOR: &str = "Anonymous";

/// Categories without an explicit order sort after ordered ones.
const UNORDERED: i64 = i64::MAX;

/// Every decodable post of a list payload, in server order.
pub fn posts(payload: Payload) -> Vec<Post> {
    payload
        .into_items()
        .into_iter()
        .filter_map(|item| match parse_item::<RawPost>(item) {
            Ok(raw) => Some(post(raw)),
            Err(err) => {
                warn!(error = %err, "skipping undecodable post");
                None
            }
        })
        .collect()
}

/// The post of a keyed lookup; `None` for an empty payload.
pub fn single_post(payload: Payload) -> Result<Option<Post>, FetchError> {
    payload
        .into_single()
        .map(|item| parse_item::<RawPost>(item).map(post).map_err(FetchError::malformed))
        .transpose()
}

pub fn categories(payload: Payload) -> Vec<Category> {
    payload
        .into_items()
        .into_iter()
        .filter_map(|item| match parse_item::<RawCategory>(item) {
            Ok(raw) => Some(category(raw)),
            Err(err) => {
                warn!(error = %err, "skipping undecodable category");
                None
            }
        })
        .collect()
}

pub fn post(raw: RawPost) -> Post {
    let title = raw.title.unwrap_or_default();
    let slug = non_blank(raw.slug)
        .or_else(|| derive_slug(&title).ok())
        .or_else(|| raw.id.map(|id| format!("post-{id}")))
        .unwrap_or_default();

    Post {
        id: raw.id,
        document_id: raw.document_id,
        slug,
        created_at: timestamp(raw.created_at.as_deref()),
        published_at: timestamp(raw.published_at.as_deref()),
        updated_at: timestamp(raw.updated_at.as_deref()),
        content: raw.content.unwrap_or_default(),
        author: relation_one::<RawAuthor>(raw.blog_author).map(author),
        categories: relation_many::<RawCategory>(raw.categories)
            .into_iter()
            .map(category)
            .collect(),
        cover_image: relation_one::<RawMedia>(raw.cover_image).and_then(image),
        title,
    }
}

pub fn author(raw: RawAuthor) -> Author {
    let slug = author_slug(raw.slug.as_deref(), raw.name.as_deref(), raw.id);
    let name = non_blank(raw.name).unwrap_or_else(|| ANONYMOUS_AUTHOR.to_string());

    Author {
        id: raw.id,
        document_id: raw.document_id,
        name,
        slug,
        avatar: relation_one::<RawMedia>(raw.avatar).and_then(image),
        profiles: SocialProfiles {
            linkedin: non_blank(raw.linkedin_url),
            medium: non_blank(raw.medium_url),
            dev_to: non_blank(raw.dev_to_url),
        },
        bio: non_blank(raw.author_intro),
    }
}

pub fn category(raw: RawCategory) -> Category {
    Category {
        id: raw.id,
        document_id: raw.document_id,
        title: raw.title.unwrap_or_default(),
        order: raw.order.unwrap_or(UNORDERED),
    }
}

fn image(raw: RawMedia) -> Option<ImageRef> {
    Some(ImageRef {
        url: non_blank(raw.url)?,
        alt: non_blank(raw.alternative_text),
    })
}

fn timestamp(value: Option<&str>) -> Option<OffsetDateTime> {
    OffsetDateTime::parse(value?.trim(), &Rfc3339).ok()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
