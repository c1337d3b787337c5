//! Port to the remote content service.

use async_trait::async_trait;
use quire_api_types::CmsId;

use crate::application::error::FetchError;
use crate::domain::entities::{Category, Post};

/// Server-side shape of a post list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostQuery {
    All,
    Category(CmsId),
    AuthorId(CmsId),
    /// Author slug filter, optionally narrowed by tags.
    AuthorSlug { slug: String, tags: Vec<String> },
    Tags(Vec<String>),
    Title(String),
}

/// The two lookup paths for a single post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlugRoute {
    /// `/api/blogs/slug/{slug}`
    Primary,
    /// `/api/blogs/{slug}`
    Direct,
}

/// Adapter fetching normalized content. Implementations never retry.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn posts(&self, query: &PostQuery) -> Result<Vec<Post>, FetchError>;

    /// Categories in server order.
    async fn categories(&self) -> Result<Vec<Category>, FetchError>;

    /// `Ok(None)` when the service answered successfully without a post.
    async fn post(&self, slug: &str, route: SlugRoute) -> Result<Option<Post>, FetchError>;
}
