use crate::application::blog::BlogService;
use crate::application::error::FetchError;
use crate::application::store::{Action, ResetScope, Slot};
use crate::domain::entities::Post;
use crate::domain::outline::{OutlineHeading, extract_outline};

/// Single post view. The detail slot is cleared when the view opens and
/// again when it closes, so a previous post never flashes on screen.
pub struct DetailPage {
    service: BlogService,
    slug: String,
}

impl DetailPage {
    pub fn new(service: BlogService, slug: impl Into<String>) -> Self {
        Self {
            service,
            slug: slug.into(),
        }
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub async fn open(&self) -> Result<Post, FetchError> {
        self.reset();
        self.service.get_post_by_slug(&self.slug).await
    }

    pub fn close(&self) {
        self.reset();
    }

    pub fn current(&self) -> Slot<Option<Post>> {
        self.service.store().snapshot().current_post
    }

    /// Heading outline of the loaded post; empty while nothing is loaded.
    pub fn outline(&self) -> Vec<OutlineHeading> {
        self.current()
            .data
            .map(|post| extract_outline(&post.content))
            .unwrap_or_default()
    }

    fn reset(&self) {
        self.service
            .store()
            .dispatch(Action::Reset(ResetScope::Detail));
    }
}

impl Drop for DetailPage {
    fn drop(&mut self) {
        self.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::blog::tests::{FakeSource, post};
    use crate::application::source::SlugRoute;
    use crate::application::store::{RequestStatus, Store};
    use std::sync::Arc;

    fn page(source: FakeSource, slug: &str) -> (DetailPage, Arc<Store>) {
        let store = Arc::new(Store::new());
        let service = BlogService::new(Arc::new(source), store.clone());
        (DetailPage::new(service, slug), store)
    }

    #[tokio::test]
    async fn open_loads_post_and_outline() {
        let mut found = post("intro");
        found.content = "# Intro\n\nText\n\n## Setup\n".to_string();
        let (page, _) = page(
            FakeSource::default().with_route("intro", SlugRoute::Primary, Ok(Some(found))),
            "intro",
        );

        page.open().await.expect("post");
        assert_eq!(page.current().status, RequestStatus::Succeeded);

        let anchors: Vec<_> = page.outline().into_iter().map(|h| h.anchor).collect();
        assert_eq!(anchors, ["intro", "setup"]);
    }

    #[tokio::test]
    async fn missing_post_leaves_failed_slot() {
        let (page, _) = page(FakeSource::default(), "nope");
        page.open().await.expect_err("missing");

        let current = page.current();
        assert!(current.is_failed());
        assert_eq!(current.data, None);
        assert!(page.outline().is_empty());
    }

    #[tokio::test]
    async fn close_and_drop_clear_the_detail_slot() {
        let (page, store) = page(
            FakeSource::default().with_route("a", SlugRoute::Primary, Ok(Some(post("a")))),
            "a",
        );
        page.open().await.expect("post");
        page.close();
        assert_eq!(store.snapshot().current_post, Slot::default());

        page.open().await.expect("post");
        drop(page);
        assert_eq!(store.snapshot().current_post, Slot::default());
    }
}
