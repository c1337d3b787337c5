use std::num::NonZeroUsize;

use crate::application::blog::BlogService;
use crate::application::error::FetchError;
use crate::application::store::{Action, BlogState, ResetScope};
use crate::domain::entities::Post;

/// Post listing with category filters, title search and a "load more"
/// window.
pub struct ListingPage {
    service: BlogService,
    page_size: NonZeroUsize,
    selected: Vec<String>,
    query: String,
    visible: usize,
}

impl ListingPage {
    pub fn new(service: BlogService, page_size: NonZeroUsize) -> Self {
        Self {
            service,
            page_size,
            selected: Vec::new(),
            query: String::new(),
            visible: page_size.get(),
        }
    }

    /// Start from a clean state and load categories and posts side by side.
    /// Both outcomes land in state; the first failure is returned.
    pub async fn open(&mut self) -> Result<(), FetchError> {
        self.service
            .store()
            .dispatch(Action::Reset(ResetScope::All));
        self.selected.clear();
        self.query.clear();
        self.visible = self.page_size.get();

        let (categories, posts) = futures::join!(
            self.service.list_categories(),
            self.service.list_all_posts()
        );
        categories?;
        posts?;
        Ok(())
    }

    /// Add `tag` to the selection, or remove it when already selected, then
    /// re-fetch. A blank tag clears the selection.
    pub async fn toggle_category(&mut self, tag: &str) -> Result<Vec<Post>, FetchError> {
        let tag = tag.trim();
        if tag.is_empty() {
            return self.clear_categories().await;
        }
        match self.selected.iter().position(|selected| selected == tag) {
            Some(index) => {
                self.selected.remove(index);
            }
            None => self.selected.push(tag.to_string()),
        }
        self.service.list_posts_by_category_tags(&self.selected).await
    }

    /// Replace the whole selection at once.
    pub async fn set_categories(&mut self, tags: &[String]) -> Result<Vec<Post>, FetchError> {
        self.selected.clear();
        for tag in tags.iter().map(|tag| tag.trim()) {
            if !tag.is_empty() && !self.selected.iter().any(|selected| selected == tag) {
                self.selected.push(tag.to_string());
            }
        }
        self.service.list_posts_by_category_tags(&self.selected).await
    }

    pub async fn clear_categories(&mut self) -> Result<Vec<Post>, FetchError> {
        self.selected.clear();
        self.service.list_all_posts().await
    }

    pub fn selected_categories(&self) -> &[String] {
        &self.selected
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Run the current query; a blank query lists everything.
    pub async fn search(&mut self) -> Result<Vec<Post>, FetchError> {
        self.service.search_posts_by_title(&self.query).await
    }

    pub async fn clear_search(&mut self) -> Result<Vec<Post>, FetchError> {
        self.query.clear();
        self.service.list_all_posts().await
    }

    pub fn load_more(&mut self) {
        self.visible = self.visible.saturating_add(self.page_size.get());
    }

    pub fn visible_posts(&self) -> Vec<Post> {
        let mut posts = self.state().posts.data;
        posts.truncate(self.visible);
        posts
    }

    pub fn has_more(&self) -> bool {
        self.state().posts.data.len() > self.visible
    }

    /// Message for an empty listing.
    pub fn empty_message(&self) -> &'static str {
        if self.query.trim().is_empty() {
            "No posts available"
        } else {
            "No match found"
        }
    }

    pub fn state(&self) -> BlogState {
        self.service.store().snapshot()
    }
}

impl Drop for ListingPage {
    fn drop(&mut self) {
        self.service
            .store()
            .dispatch(Action::Reset(ResetScope::All));
    }
}
