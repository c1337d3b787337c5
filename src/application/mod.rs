//! Fetch orchestration, reader state and the view models built on them.

pub mod blog;
pub mod error;
pub mod pages;
pub mod redirect;
pub mod source;
pub mod store;
