// lil-core/src/lib.rs
pub mod dates;
pub mod formula;
pub mod menu;
pub mod refresh;

pub use menu::{build_menu, IssueItem, Menu, MenuEntry};
pub use refresh::{IssueSource, Refresher, Snapshot};
