// lil-common/src/model/formula.rs
//! Packaging recipe for a source-built binary: provenance, dependencies,
//! one install step and one post-install smoke test.
use semver::Version;
use serde::{Deserialize, Serialize};

use crate::dependency::{Dependency, DependencyExt, HostOs, OsCondition};
use crate::error::{LilError, Result};

pub const VERSION_PLACEHOLDER: &str = "version";
pub const BUILD_TIME_PLACEHOLDER: &str = "build_time";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadSpec {
    pub url: String,
    pub branch: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Formula {
    pub name: String,
    pub desc: String,
    pub homepage: String,
    pub url: String,
    pub sha256: String,
    pub license: String,
    #[serde(default)]
    pub head: Option<HeadSpec>,
    pub version: Version,
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
    pub install: InstallStep,
    #[serde(default)]
    pub caveats: Option<String>,
    pub test: SmokeTest,
}

/// A string with `#{name}` placeholders filled in at build time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Template(pub String);

#[derive(Debug, Clone, Copy)]
pub struct TemplateVars<'a> {
    pub version: &'a str,
    pub build_time: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplatePart<'a> {
    Text(&'a str),
    Var(&'a str),
}

impl Template {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn parts(&self) -> Result<Vec<TemplatePart<'_>>> {
        let mut parts = Vec::new();
        let mut rest = self.0.as_str();
        while let Some(start) = rest.find("#{") {
            if start > 0 {
                parts.push(TemplatePart::Text(&rest[..start]));
            }
            let after = &rest[start + 2..];
            let end = after.find('}').ok_or_else(|| {
                LilError::ParseError("template", format!("unterminated placeholder in '{}'", self.0))
            })?;
            let name = after[..end].trim();
            match name {
                VERSION_PLACEHOLDER | BUILD_TIME_PLACEHOLDER => parts.push(TemplatePart::Var(name)),
                other => {
                    return Err(LilError::ParseError(
                        "template",
                        format!("unknown placeholder '{other}' in '{}'", self.0),
                    ))
                }
            }
            rest = &after[end + 1..];
        }
        if !rest.is_empty() {
            parts.push(TemplatePart::Text(rest));
        }
        Ok(parts)
    }

    pub fn expand(&self, vars: TemplateVars<'_>) -> Result<String> {
        let mut out = String::with_capacity(self.0.len());
        for part in self.parts()? {
            match part {
                TemplatePart::Text(t) => out.push_str(t),
                TemplatePart::Var(VERSION_PLACEHOLDER) => out.push_str(vars.version),
                TemplatePart::Var(_) => out.push_str(vars.build_time),
            }
        }
        Ok(out)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandArg {
    /// Passed through as a quoted literal.
    Literal(String),
    /// Package-manager helper expanded by the runtime, e.g. `*std_cargo_args`.
    Helper(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallStep {
    pub command: Vec<CommandArg>,
    #[serde(default)]
    pub env: Vec<(String, Template)>,
}

impl InstallStep {
    /// Expands the build environment for a concrete version and timestamp.
    pub fn expand_env(&self, vars: TemplateVars<'_>) -> Result<Vec<(String, String)>> {
        self.env
            .iter()
            .map(|(key, template)| Ok((key.clone(), template.expand(vars)?)))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmokeTest {
    #[serde(default)]
    pub args: Vec<String>,
    pub expect: String,
    #[serde(default)]
    pub status: Option<i32>,
    #[serde(default)]
    pub merge_stderr: bool,
}

impl SmokeTest {
    pub fn expected_status(&self) -> i32 {
        self.status.unwrap_or(0)
    }
}

impl Formula {
    /// Recipe for lil itself.
    pub fn lil(version: &str, sha256: &str) -> Result<Self> {
        let version = Version::parse(version.trim_start_matches('v'))?;
        let formula = Self {
            name: "lil".to_string(),
            desc: "Lightweight systray app that displays your Linear issues".to_string(),
            homepage: "https://github.com/pzurek/lil".to_string(),
            url: format!("https://github.com/pzurek/lil/archive/refs/tags/v{version}.tar.gz"),
            sha256: sha256.to_ascii_lowercase(),
            license: "MIT".to_string(),
            head: Some(HeadSpec {
                url: "https://github.com/pzurek/lil.git".to_string(),
                branch: "main".to_string(),
            }),
            version,
            dependencies: vec![
                Dependency::new_build("rust"),
                Dependency::new_build("xcode-build-tools").on(OsCondition::MacOs),
                Dependency::new_build("pkg-config").on(OsCondition::Linux),
                Dependency::new_runtime("gtk+3").on(OsCondition::Linux),
                Dependency::new_runtime("libayatana-appindicator").on(OsCondition::Linux),
            ],
            install: InstallStep {
                command: vec![
                    CommandArg::Literal("cargo".to_string()),
                    CommandArg::Literal("install".to_string()),
                    CommandArg::Helper("*std_cargo_args(path: \"lil\")".to_string()),
                ],
                env: vec![
                    ("LIL_VERSION".to_string(), Template::new("#{version}")),
                    ("LIL_BUILD_TIME".to_string(), Template::new("#{build_time}")),
                ],
            },
            caveats: Some(
                "Lil requires a Linear API key to function.\n\
                 You can set this with:\n  export LINEAR_API_KEY=your_api_key\n\n\
                 For persistent setup, add this to your shell profile (~/.bashrc, ~/.zshrc, etc.)."
                    .to_string(),
            ),
            test: SmokeTest {
                args: Vec::new(),
                expect: "Error: LINEAR_API_KEY environment variable not set".to_string(),
                status: Some(1),
                merge_stderr: true,
            },
        };
        formula.validate()?;
        Ok(formula)
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(LilError::ValidationError("formula name is empty".to_string()));
        }
        if !self.sha256.is_empty()
            && (self.sha256.len() != 64 || !self.sha256.chars().all(|c| c.is_ascii_hexdigit()))
        {
            return Err(LilError::ValidationError(format!(
                "sha256 for '{}' must be 64 hex characters, got '{}'",
                self.name, self.sha256
            )));
        }
        for (_, template) in &self.install.env {
            template.parts()?;
        }
        Ok(())
    }

    pub fn dependencies_for(&self, os: HostOs) -> Vec<&Dependency> {
        self.dependencies.for_os(os)
    }

    /// Name of the formula's Ruby class, e.g. `lil-tray` -> `LilTray`.
    pub fn class_name(&self) -> String {
        self.name
            .split(|c: char| c == '-' || c == '_' || c == '.')
            .filter(|s| !s.is_empty())
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect()
    }
}
