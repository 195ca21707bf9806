// lil-common/src/model/mod.rs
pub mod formula;
pub mod issue;

pub use formula::Formula;
pub use issue::{Issue, Project, User, WorkflowState};
