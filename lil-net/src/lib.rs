// lil-net/src/lib.rs
pub mod linear;
pub mod validation;

pub use linear::{parse_assigned_issues, LinearClient};
pub use validation::{sha256_file, validate_url, verify_checksum};
