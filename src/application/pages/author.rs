use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

use crate::application::blog::BlogService;
use crate::application::error::FetchError;
use crate::application::pages::Navigation;
use crate::application::redirect::ScheduledRedirect;
use crate::domain::entities::{Author, Post};

/// Author profile with their posts. When the author cannot be resolved the
/// page sends the reader back to the root after a delay.
pub struct AuthorPage {
    service: BlogService,
    slug: String,
    tags: Vec<String>,
    author: Option<Author>,
    redirect_delay: Duration,
    navigator: Option<UnboundedSender<Navigation>>,
    redirect: Option<ScheduledRedirect>,
}

impl AuthorPage {
    pub fn new(service: BlogService, slug: impl Into<String>, redirect_delay: Duration) -> Self {
        Self {
            service,
            slug: slug.into(),
            tags: Vec::new(),
            author: None,
            redirect_delay,
            navigator: None,
            redirect: None,
        }
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Channel receiving navigation requests. Without one no redirect is
    /// ever scheduled.
    pub fn with_navigator(mut self, navigator: UnboundedSender<Navigation>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    pub async fn open(&mut self) -> Result<Vec<Post>, FetchError> {
        self.cancel_redirect();
        let result = self
            .service
            .list_posts_by_author_and_tags(&self.slug, &self.tags)
            .await;

        self.author = result
            .as_ref()
            .ok()
            .and_then(|posts| posts.first())
            .and_then(|post| post.author.clone());

        // A tag filter can leave a known author with nothing to show.
        if self.author.is_none()
            && !self.tags.is_empty()
            && result.as_ref().is_ok_and(Vec::is_empty)
        {
            self.author = match self.service.find_author(&self.slug).await {
                Ok(author) => author,
                Err(err) => {
                    warn!(author = %self.slug, error = %err, "author lookup failed");
                    None
                }
            };
        }

        if self.author.is_none() {
            self.schedule_redirect();
        }
        result
    }

    pub fn author(&self) -> Option<&Author> {
        self.author.as_ref()
    }

    pub fn posts(&self) -> Vec<Post> {
        self.service.store().snapshot().author_posts.data
    }

    pub fn redirect_pending(&self) -> bool {
        self.redirect
            .as_ref()
            .is_some_and(ScheduledRedirect::is_pending)
    }

    pub fn close(&mut self) {
        self.cancel_redirect();
    }

    fn schedule_redirect(&mut self) {
        let Some(navigator) = self.navigator.clone() else {
            return;
        };
        info!(
            author = %self.slug,
            delay = ?self.redirect_delay,
            "author not found; scheduling redirect"
        );
        self.redirect = Some(ScheduledRedirect::schedule(
            self.redirect_delay,
            Navigation::Root,
            navigator,
        ));
    }

    fn cancel_redirect(&mut self) {
        if let Some(mut redirect) = self.redirect.take() {
            redirect.cancel();
        }
    }
}
