//! Reader state and its reducer.
//!
//! Each query family owns a [`Slot`] with its own status. Every request is
//! tagged with a monotonically increasing [`RequestId`]; a slot only accepts
//! the completion of the request it most recently started, so a superseded
//! query settling late can never overwrite a newer one.

use std::sync::atomic::{AtomicU64, Ordering};

use metrics::counter;
use serde::Serialize;
use tokio::sync::watch;
use tracing::debug;

use crate::domain::entities::{Category, Post};

pub(crate) const METRIC_FETCH_STALE_TOTAL: &str = "quire_fetch_stale_total";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotKind {
    Posts,
    CurrentPost,
    AuthorPosts,
    Categories,
}

impl SlotKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Posts => "posts",
            Self::CurrentPost => "current_post",
            Self::AuthorPosts => "author_posts",
            Self::Categories => "categories",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RequestId {
    pub slot: SlotKind,
    pub seq: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slot<T> {
    pub status: RequestStatus,
    pub data: T,
    pub error: Option<String>,
    #[serde(skip)]
    latest: Option<u64>,
}

impl<T: Default> Default for Slot<T> {
    fn default() -> Self {
        Self {
            status: RequestStatus::Idle,
            data: T::default(),
            error: None,
            latest: None,
        }
    }
}

impl<T: Default> Slot<T> {
    fn accepts(&self, request: RequestId) -> bool {
        self.latest == Some(request.seq)
    }

    fn start(&mut self, request: RequestId) {
        self.status = RequestStatus::Loading;
        self.error = None;
        self.latest = Some(request.seq);
    }

    fn fulfil(&mut self, data: T) {
        self.status = RequestStatus::Succeeded;
        self.data = data;
        self.error = None;
    }

    fn reject(&mut self, message: String) {
        self.status = RequestStatus::Failed;
        self.data = T::default();
        self.error = Some(message);
    }

    pub fn is_loading(&self) -> bool {
        self.status == RequestStatus::Loading
    }

    pub fn is_failed(&self) -> bool {
        self.status == RequestStatus::Failed
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BlogState {
    pub posts: Slot<Vec<Post>>,
    pub current_post: Slot<Option<Post>>,
    pub author_posts: Slot<Vec<Post>>,
    pub categories: Slot<Vec<Category>>,
}

impl BlogState {
    /// Whether a completion for `request` would still be applied.
    pub fn accepts(&self, request: RequestId) -> bool {
        match request.slot {
            SlotKind::Posts => self.posts.accepts(request),
            SlotKind::CurrentPost => self.current_post.accepts(request),
            SlotKind::AuthorPosts => self.author_posts.accepts(request),
            SlotKind::Categories => self.categories.accepts(request),
        }
    }
}

/// Successful result of a request, keyed by the slot it fills.
#[derive(Debug, Clone, PartialEq)]
pub enum Loaded {
    Posts(Vec<Post>),
    Post(Post),
    AuthorPosts(Vec<Post>),
    Categories(Vec<Category>),
}

impl Loaded {
    fn slot(&self) -> SlotKind {
        match self {
            Self::Posts(_) => SlotKind::Posts,
            Self::Post(_) => SlotKind::CurrentPost,
            Self::AuthorPosts(_) => SlotKind::AuthorPosts,
            Self::Categories(_) => SlotKind::Categories,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetScope {
    /// Single-entity state used by the post detail view.
    Detail,
    All,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Pending(RequestId),
    Fulfilled(RequestId, Loaded),
    Rejected(RequestId, String),
    Reset(ResetScope),
}

/// Pure transition function. Stale or mismatched completions leave the
/// state untouched.
pub fn reduce(mut state: BlogState, action: Action) -> BlogState {
    match action {
        Action::Pending(request) => match request.slot {
            SlotKind::Posts => state.posts.start(request),
            SlotKind::CurrentPost => state.current_post.start(request),
            SlotKind::AuthorPosts => state.author_posts.start(request),
            SlotKind::Categories => state.categories.start(request),
        },
        Action::Fulfilled(request, loaded) => {
            if loaded.slot() != request.slot || !state.accepts(request) {
                return state;
            }
            match loaded {
                Loaded::Posts(posts) => state.posts.fulfil(posts),
                Loaded::Post(post) => state.current_post.fulfil(Some(post)),
                Loaded::AuthorPosts(posts) => state.author_posts.fulfil(posts),
                Loaded::Categories(categories) => state.categories.fulfil(categories),
            }
        }
        Action::Rejected(request, message) => {
            if !state.accepts(request) {
                return state;
            }
            match request.slot {
                SlotKind::Posts => state.posts.reject(message),
                SlotKind::CurrentPost => state.current_post.reject(message),
                SlotKind::AuthorPosts => state.author_posts.reject(message),
                SlotKind::Categories => state.categories.reject(message),
            }
        }
        Action::Reset(ResetScope::Detail) => state.current_post = Slot::default(),
        Action::Reset(ResetScope::All) => state = BlogState::default(),
    }
    state
}

/// Shared state container. Views hold a [`watch::Receiver`] and re-read
/// state whenever a transition lands.
#[derive(Debug)]
pub struct Store {
    state: watch::Sender<BlogState>,
    sequence: AtomicU64,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    pub fn new() -> Self {
        let (state, _) = watch::channel(BlogState::default());
        Self {
            state,
            sequence: AtomicU64::new(0),
        }
    }

    /// Allocate a request id for `slot` and mark the slot as loading.
    pub fn begin(&self, slot: SlotKind) -> RequestId {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let request = RequestId { slot, seq };
        self.dispatch(Action::Pending(request));
        request
    }

    /// Apply one action atomically. Returns `false` when the action was a
    /// stale completion and got dropped.
    pub fn dispatch(&self, action: Action) -> bool {
        let settled = match &action {
            Action::Fulfilled(request, _) | Action::Rejected(request, _) => Some(*request),
            Action::Pending(_) | Action::Reset(_) => None,
        };

        let mut applied = true;
        self.state.send_modify(|state| {
            if let Some(request) = settled
                && !state.accepts(request)
            {
                applied = false;
                return;
            }
            *state = reduce(std::mem::take(state), action);
        });

        if let Some(request) = settled.filter(|_| !applied) {
            debug!(
                slot = request.slot.as_str(),
                request = request.seq,
                "dropping stale completion"
            );
            counter!(METRIC_FETCH_STALE_TOTAL, "slot" => request.slot.as_str()).increment(1);
        }

        applied
    }

    pub fn snapshot(&self) -> BlogState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<BlogState> {
        self.state.subscribe()
    }
}
