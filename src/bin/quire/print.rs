#![deny(clippy::all, clippy::pedantic)]

use quire::domain::entities::{Author, Category, Post};
use quire::domain::outline::OutlineHeading;
use quire::infra::cms::assets::{avatar_url, cover_url};
use serde::Serialize;
use url::Url;

use crate::CliError;

pub fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let out = serde_json::to_string_pretty(value)?;
    println!("{out}");
    Ok(())
}

/// Card-sized view of a post, as shown in listings.
#[derive(Debug, Serialize)]
pub struct PostCard {
    pub slug: String,
    pub title: String,
    pub date: Option<String>,
    pub author: Option<String>,
    pub author_slug: Option<String>,
    pub categories: Vec<String>,
    pub cover_url: Option<String>,
}

impl PostCard {
    pub fn new(origin: &Url, post: &Post) -> Self {
        Self {
            slug: post.slug.clone(),
            title: post.display_title().to_string(),
            date: post.display_date(),
            author: post.author.as_ref().map(|author| author.name.clone()),
            author_slug: post.author.as_ref().map(|author| author.slug.clone()),
            categories: post
                .category_titles()
                .into_iter()
                .map(str::to_string)
                .collect(),
            cover_url: cover_url(origin, post).map(String::from),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Listing {
    pub posts: Vec<PostCard>,
    pub has_more: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct PostPage {
    #[serde(flatten)]
    pub card: PostCard,
    pub content: String,
    pub byline: Option<AuthorCard>,
}

impl PostPage {
    pub fn new(origin: &Url, post: &Post) -> Self {
        Self {
            card: PostCard::new(origin, post),
            content: post.content.clone(),
            byline: post
                .author
                .as_ref()
                .map(|author| AuthorCard::new(origin, author)),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OutlineEntry {
    pub level: u8,
    pub title: String,
    pub anchor: String,
}

impl From<OutlineHeading> for OutlineEntry {
    fn from(heading: OutlineHeading) -> Self {
        Self {
            level: heading.level,
            title: heading.title,
            anchor: heading.anchor,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LinkEntry {
    pub label: &'static str,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct AuthorCard {
    pub name: String,
    pub slug: String,
    pub initial: Option<char>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub links: Vec<LinkEntry>,
}

impl AuthorCard {
    pub fn new(origin: &Url, author: &Author) -> Self {
        Self {
            name: author.name.clone(),
            slug: author.slug.clone(),
            initial: author.initial(),
            avatar_url: avatar_url(origin, author).map(String::from),
            bio: author.bio.clone(),
            links: author
                .social_links()
                .into_iter()
                .map(|link| LinkEntry {
                    label: link.network.label(),
                    url: link.url.to_string(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthorProfile {
    pub author: Option<AuthorCard>,
    pub posts: Vec<PostCard>,
}

#[derive(Debug, Serialize)]
pub struct CategoryEntry {
    pub id: Option<i64>,
    pub title: String,
    pub order: i64,
}

impl From<Category> for CategoryEntry {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            title: category.title,
            order: category.order,
        }
    }
}
