//! quire: a reader for blogs served by a headless CMS.
//!
//! Content is fetched through [`infra::cms::CmsClient`], normalized into
//! [`domain::entities`], and tracked in an [`application::store::Store`]
//! that view models in [`application::pages`] observe.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
