use std::path::PathBuf;

use clap::Args;
use colored::Colorize;
use lil_common::dependency::HostOs;
use lil_common::error::{LilError, Result};
use lil_common::model::Formula;
use lil_core::formula::{dependency_plan, render_ruby};
use lil_net::{sha256_file, verify_checksum};
use tracing::warn;

#[derive(Args, Debug)]
pub struct FormulaArgs {
    /// Release version the formula points at
    #[arg(long, default_value = env!("CARGO_PKG_VERSION"))]
    pub version: String,

    /// SHA-256 of the release archive
    #[arg(long)]
    pub sha256: Option<String>,

    /// Release archive to checksum (verified against --sha256 when both are given)
    #[arg(long)]
    pub archive: Option<PathBuf>,

    /// Print the dependencies that apply on this OS instead of the formula
    #[arg(long, value_parser = parse_os)]
    pub os: Option<HostOs>,

    /// Use the `-version` smoke test instead of the missing-key test
    #[arg(long)]
    pub version_test: bool,
}

fn parse_os(s: &str) -> std::result::Result<HostOs, String> {
    HostOs::parse(s).ok_or_else(|| format!("unknown OS '{s}' (expected mac or linux)"))
}

impl FormulaArgs {
    pub fn run(&self) -> Result<()> {
        let sha256 = match (&self.sha256, &self.archive) {
            (Some(expected), Some(archive)) => {
                verify_checksum(archive, expected)?;
                expected.clone()
            }
            (None, Some(archive)) => sha256_file(archive)?,
            (Some(expected), None) => expected.clone(),
            (None, None) => {
                warn!("No checksum given; the formula's sha256 will be empty");
                String::new()
            }
        };

        let mut formula = Formula::lil(&self.version, &sha256)?;
        if self.version_test {
            formula.test.args = vec!["-version".to_string()];
            formula.test.expect = "Lil version".to_string();
            formula.test.status = None;
            formula.test.merge_stderr = false;
        }

        match self.os {
            Some(os) => print_plan(&formula, os),
            None => {
                print!("{}", render_ruby(&formula)?);
                Ok(())
            }
        }
    }
}

fn print_plan(formula: &Formula, os: HostOs) -> Result<()> {
    if os == HostOs::Other {
        return Err(LilError::ValidationError(format!(
            "{} has no packaging recipe for this OS",
            formula.name
        )));
    }
    let plan = dependency_plan(formula, os);
    println!("{}", format!("{} {} on {}", formula.name, formula.version, plan.os).bold());
    println!("  build:");
    for dep in &plan.build {
        println!("    {} ({})", dep.name, dep.condition);
    }
    println!("  runtime:");
    if plan.runtime.is_empty() {
        println!("    {}", "none".dimmed());
    }
    for dep in &plan.runtime {
        println!("    {} ({})", dep.name, dep.condition);
    }
    Ok(())
}
