//! Domain layer types and invariants.

pub mod entities;
pub mod outline;
pub mod slug;
