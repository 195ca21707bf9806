pub mod definition;
pub mod requirement;

pub use definition::{Dependency, DependencyExt, DependencyTag};
pub use requirement::{HostOs, OsCondition};
