//! Fetch orchestration: one method per query shape, each driving the
//! pending → fulfilled/rejected lifecycle of its store slot.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use metrics::{counter, histogram};
use quire_api_types::CmsId;
use tracing::{debug, warn};

use crate::application::error::{FetchError, Missing, Operation};
use crate::application::source::{ContentSource, PostQuery, SlugRoute};
use crate::application::store::{Action, Loaded, SlotKind, Store};
use crate::domain::entities::{Author, Category, Post};

pub(crate) const METRIC_FETCH_TOTAL: &str = "quire_fetch_total";
pub(crate) const METRIC_FETCH_MS: &str = "quire_fetch_ms";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorRef {
    Id(CmsId),
    Slug(String),
}

#[derive(Clone)]
pub struct BlogService {
    source: Arc<dyn ContentSource>,
    store: Arc<Store>,
}

impl BlogService {
    pub fn new(source: Arc<dyn ContentSource>, store: Arc<Store>) -> Self {
        Self { source, store }
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    pub async fn list_all_posts(&self) -> Result<Vec<Post>, FetchError> {
        self.run(
            Operation::ListPosts,
            SlotKind::Posts,
            Loaded::Posts,
            self.source.posts(&PostQuery::All),
        )
        .await
    }

    /// Categories sorted by their server-provided `order`.
    pub async fn list_categories(&self) -> Result<Vec<Category>, FetchError> {
        let source = Arc::clone(&self.source);
        self.run(
            Operation::ListCategories,
            SlotKind::Categories,
            Loaded::Categories,
            async move {
                let mut categories = source.categories().await?;
                categories.sort_by_key(|category| category.order);
                Ok(categories)
            },
        )
        .await
    }

    /// Look a post up on the primary route, falling back to the direct
    /// route on any failure before giving up with [`Missing::Post`].
    pub async fn get_post_by_slug(&self, slug: &str) -> Result<Post, FetchError> {
        let source = Arc::clone(&self.source);
        let slug = slug.trim().to_string();
        self.run(
            Operation::PostBySlug,
            SlotKind::CurrentPost,
            Loaded::Post,
            async move {
                if slug.is_empty() {
                    return Err(FetchError::InvalidInput(
                        "A post slug is required".to_string(),
                    ));
                }
                lookup_post(source.as_ref(), &slug).await
            },
        )
        .await
    }

    /// Posts by one author. An empty answer is [`Missing::AuthorPosts`].
    pub async fn list_posts_by_author(&self, author: AuthorRef) -> Result<Vec<Post>, FetchError> {
        let query = match author {
            AuthorRef::Id(id) => PostQuery::AuthorId(id),
            AuthorRef::Slug(slug) => PostQuery::AuthorSlug {
                slug: slug.trim().to_string(),
                tags: Vec::new(),
            },
        };
        let source = Arc::clone(&self.source);
        self.run(
            Operation::PostsByAuthor,
            SlotKind::AuthorPosts,
            Loaded::AuthorPosts,
            async move {
                let posts = source.posts(&query).await?;
                if posts.is_empty() {
                    return Err(FetchError::NotFound(Missing::AuthorPosts));
                }
                Ok(posts)
            },
        )
        .await
    }

    /// Posts carrying any of `tags`. An empty tag set is the all-posts fetch.
    pub async fn list_posts_by_category_tags(
        &self,
        tags: &[String],
    ) -> Result<Vec<Post>, FetchError> {
        let tags = normalize_tags(tags);
        if tags.is_empty() {
            return self.list_all_posts().await;
        }
        self.run(
            Operation::PostsByTags,
            SlotKind::Posts,
            Loaded::Posts,
            self.source.posts(&PostQuery::Tags(tags)),
        )
        .await
    }

    /// Title search. A blank query clears the search: all posts are fetched.
    pub async fn search_posts_by_title(&self, query: &str) -> Result<Vec<Post>, FetchError> {
        let query = query.trim();
        if query.is_empty() {
            return self.list_all_posts().await;
        }
        self.run(
            Operation::SearchPosts,
            SlotKind::Posts,
            Loaded::Posts,
            self.source.posts(&PostQuery::Title(query.to_string())),
        )
        .await
    }

    /// Author slug filter combined with a tag filter. Without tags this is
    /// [`Self::list_posts_by_author`]; with tags an empty answer is valid.
    pub async fn list_posts_by_author_and_tags(
        &self,
        author_slug: &str,
        tags: &[String],
    ) -> Result<Vec<Post>, FetchError> {
        let tags = normalize_tags(tags);
        if tags.is_empty() {
            return self
                .list_posts_by_author(AuthorRef::Slug(author_slug.to_string()))
                .await;
        }
        let query = PostQuery::AuthorSlug {
            slug: author_slug.trim().to_string(),
            tags,
        };
        self.run(
            Operation::PostsByAuthor,
            SlotKind::AuthorPosts,
            Loaded::AuthorPosts,
            self.source.posts(&query),
        )
        .await
    }

    /// Author of `slug`'s untagged posts. Reads the source directly and
    /// leaves the store alone, so a filtered listing already in the author
    /// slot stays put.
    pub async fn find_author(&self, slug: &str) -> Result<Option<Author>, FetchError> {
        let query = PostQuery::AuthorSlug {
            slug: slug.trim().to_string(),
            tags: Vec::new(),
        };
        let posts = self.source.posts(&query).await?;
        Ok(posts.into_iter().find_map(|post| post.author))
    }

    pub async fn list_posts_by_category(&self, category: CmsId) -> Result<Vec<Post>, FetchError> {
        self.run(
            Operation::PostsByCategory,
            SlotKind::Posts,
            Loaded::Posts,
            self.source.posts(&PostQuery::Category(category)),
        )
        .await
    }

    async fn run<T, F>(
        &self,
        operation: Operation,
        slot: SlotKind,
        wrap: fn(T) -> Loaded,
        work: F,
    ) -> Result<T, FetchError>
    where
        T: Clone,
        F: Future<Output = Result<T, FetchError>>,
    {
        let request = self.store.begin(slot);
        debug!(
            operation = operation.as_str(),
            request = request.seq,
            "fetch started"
        );

        let started = Instant::now();
        let result = work.await;
        histogram!(METRIC_FETCH_MS, "operation" => operation.as_str())
            .record(started.elapsed().as_secs_f64() * 1000.0);

        match &result {
            Ok(value) => {
                counter!(METRIC_FETCH_TOTAL, "operation" => operation.as_str(), "outcome" => "succeeded")
                    .increment(1);
                self.store
                    .dispatch(Action::Fulfilled(request, wrap(value.clone())));
            }
            Err(err) => {
                counter!(METRIC_FETCH_TOTAL, "operation" => operation.as_str(), "outcome" => "failed")
                    .increment(1);
                warn!(
                    operation = operation.as_str(),
                    request = request.seq,
                    error = %err,
                    "fetch failed"
                );
                self.store
                    .dispatch(Action::Rejected(request, err.user_message(operation)));
            }
        }

        result
    }
}

async fn lookup_post(source: &dyn ContentSource, slug: &str) -> Result<Post, FetchError> {
    match source.post(slug, SlugRoute::Primary).await {
        Ok(Some(post)) => return Ok(post),
        Ok(None) => debug!(slug, "primary slug route returned nothing; trying direct route"),
        Err(err) => warn!(slug, error = %err, "primary slug route failed; trying direct route"),
    }

    match source.post(slug, SlugRoute::Direct).await {
        Ok(Some(post)) => Ok(post),
        Ok(None) => Err(FetchError::NotFound(Missing::Post)),
        Err(err) if err.is_not_found() => Err(FetchError::NotFound(Missing::Post)),
        Err(err) => Err(err),
    }
}

/// Trim, drop blanks and de-duplicate while keeping first-seen order.
fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags.iter().map(|tag| tag.trim()).filter(|tag| !tag.is_empty()) {
        if !out.iter().any(|seen| seen == tag) {
            out.push(tag.to_string());
        }
    }
    out
}
