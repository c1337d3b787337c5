//! View models driving the three reader screens.

pub mod author;
pub mod detail;
pub mod listing;

pub use author::AuthorPage;
pub use detail::DetailPage;
pub use listing::ListingPage;

/// Where a view asks the host to go next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Root,
    Post(String),
    Author(String),
}
