use thiserror::Error;

/// Which keyed lookup came back empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Missing {
    Post,
    AuthorPosts,
}

impl std::fmt::Display for Missing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Post => "post",
            Self::AuthorPosts => "author posts",
        })
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),
    #[error("server responded with status {status}{}", server_detail(.message))]
    Server { status: u16, message: Option<String> },
    #[error("{0} not found")]
    NotFound(Missing),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("invalid request: {0}")]
    InvalidInput(String),
}

impl FetchError {
    pub fn network(err: impl std::fmt::Display) -> Self {
        Self::Network(err.to_string())
    }

    pub fn malformed(err: impl std::fmt::Display) -> Self {
        Self::Malformed(err.to_string())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::Server { status: 404, .. }
        )
    }

    /// Message stored in state for views. A message supplied by the server
    /// wins over the operation's generic fallback.
    pub fn user_message(&self, operation: Operation) -> String {
        match self {
            Self::Server {
                message: Some(message),
                ..
            } => message.clone(),
            Self::NotFound(Missing::Post) => "Blog post not found".to_string(),
            Self::NotFound(Missing::AuthorPosts) => "No posts found for this author".to_string(),
            Self::InvalidInput(message) => message.clone(),
            _ => operation.fallback_message().to_string(),
        }
    }
}

fn server_detail(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|message| format!(": {message}"))
        .unwrap_or_default()
}

/// Named fetch operations, used for messages, logs and metric labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListPosts,
    ListCategories,
    PostBySlug,
    PostsByCategory,
    PostsByAuthor,
    PostsByTags,
    SearchPosts,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ListPosts => "list_posts",
            Self::ListCategories => "list_categories",
            Self::PostBySlug => "post_by_slug",
            Self::PostsByCategory => "posts_by_category",
            Self::PostsByAuthor => "posts_by_author",
            Self::PostsByTags => "posts_by_tags",
            Self::SearchPosts => "search_posts",
        }
    }

    fn fallback_message(self) -> &'static str {
        match self {
            Self::ListPosts => "Failed to fetch blogs",
            Self::ListCategories => "Failed to fetch categories. Please try again.",
            Self::PostBySlug => "Failed to fetch blog post",
            Self::PostsByCategory => "Failed to fetch blogs for this category",
            Self::PostsByAuthor => "Failed to fetch author posts. Please try again.",
            Self::PostsByTags => "Failed to fetch blogs by tags",
            Self::SearchPosts => "Failed to search blogs",
        }
    }
}
