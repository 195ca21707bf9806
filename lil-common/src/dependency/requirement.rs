// lil-common/src/dependency/requirement.rs
use std::fmt;

use serde::{Deserialize, Serialize};

/// The operating system a build runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostOs {
    MacOs,
    Linux,
    Other,
}

impl HostOs {
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Self::MacOs
        } else if cfg!(target_os = "linux") {
            Self::Linux
        } else {
            Self::Other
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "mac" | "macos" | "darwin" | "osx" => Some(Self::MacOs),
            "linux" => Some(Self::Linux),
            _ => None,
        }
    }
}

impl fmt::Display for HostOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MacOs => write!(f, "macOS"),
            Self::Linux => write!(f, "Linux"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Host condition attached to a dependency declaration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OsCondition {
    #[default]
    Always,
    MacOs,
    Linux,
}

impl OsCondition {
    pub fn applies_to(self, os: HostOs) -> bool {
        match self {
            Self::Always => true,
            Self::MacOs => os == HostOs::MacOs,
            Self::Linux => os == HostOs::Linux,
        }
    }
}

impl fmt::Display for OsCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Always => write!(f, "any OS"),
            Self::MacOs => write!(f, "macOS only"),
            Self::Linux => write!(f, "Linux only"),
        }
    }
}
