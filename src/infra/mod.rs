//! Infrastructure adapters and runtime bootstrap.

pub mod cms;
pub mod error;
pub mod telemetry;
