// lil-common/src/lib.rs
pub mod cache;
pub mod config;
pub mod dependency;
pub mod error;
pub mod model;

// Re-export key types
pub use cache::IssueCache;
pub use config::Config;
pub use error::{LilError, Result};
pub use model::{Formula, Issue};
