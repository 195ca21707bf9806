// lil-core/src/formula.rs
//! Renders a [`Formula`] as a Homebrew formula and works out which of its
//! dependencies a given host needs.
use std::fmt::{self, Write};

use lil_common::dependency::{Dependency, DependencyTag, HostOs, OsCondition};
use lil_common::error::{LilError, Result};
use lil_common::model::formula::{
    CommandArg, Formula, Template, TemplatePart, BUILD_TIME_PLACEHOLDER,
};

/// Dependencies selected for one host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyPlan<'a> {
    pub os: HostOs,
    pub build: Vec<&'a Dependency>,
    pub runtime: Vec<&'a Dependency>,
}

pub fn dependency_plan(formula: &Formula, os: HostOs) -> DependencyPlan<'_> {
    let (build, runtime) = formula
        .dependencies_for(os)
        .into_iter()
        .partition(|dep| dep.is_build_only());
    DependencyPlan { os, build, runtime }
}

pub fn render_ruby(formula: &Formula) -> Result<String> {
    formula.validate()?;
    let mut out = String::new();
    write_formula(&mut out, formula)
        .map_err(|e| LilError::Generic(format!("Failed to render formula {}: {e}", formula.name)))?;
    Ok(out)
}

fn write_formula<W: Write>(out: &mut W, f: &Formula) -> fmt::Result {
    writeln!(out, "class {} < Formula", f.class_name())?;
    writeln!(out, "  desc {}", quote(&f.desc))?;
    writeln!(out, "  homepage {}", quote(&f.homepage))?;
    writeln!(out, "  url {}", quote(&f.url))?;
    writeln!(out, "  sha256 {}", quote(&f.sha256))?;
    writeln!(out, "  license {}", quote(&f.license))?;
    if let Some(head) = &f.head {
        writeln!(
            out,
            "  head {}, branch: {}",
            quote(&head.url),
            quote(&head.branch)
        )?;
    }

    let always: Vec<_> = with_condition(f, OsCondition::Always);
    let mac: Vec<_> = with_condition(f, OsCondition::MacOs);
    let linux: Vec<_> = with_condition(f, OsCondition::Linux);

    if !always.is_empty() {
        writeln!(out)?;
        for dep in &always {
            writeln!(out, "  {}", depends_on(dep))?;
        }
    }
    if !mac.is_empty() || !linux.is_empty() {
        writeln!(out)?;
        let mut first = true;
        for (guard, deps) in [("OS.mac?", &mac), ("OS.linux?", &linux)] {
            if deps.is_empty() {
                continue;
            }
            writeln!(out, "  {} {}", if first { "if" } else { "elsif" }, guard)?;
            first = false;
            for dep in deps.iter() {
                writeln!(out, "    {}", depends_on(dep))?;
            }
        }
        writeln!(out, "  end")?;
    }

    writeln!(out)?;
    writeln!(out, "  def install")?;
    for (key, template) in &f.install.env {
        writeln!(out, "    ENV[{}] = {}", quote(key), ruby_template(template))?;
    }
    let args: Vec<String> = f
        .install
        .command
        .iter()
        .map(|arg| match arg {
            CommandArg::Literal(s) => quote(s),
            CommandArg::Helper(s) => s.clone(),
        })
        .collect();
    writeln!(out, "    system {}", args.join(", "))?;
    writeln!(out, "  end")?;

    if let Some(caveats) = &f.caveats {
        writeln!(out)?;
        writeln!(out, "  def caveats")?;
        writeln!(out, "    <<~EOS")?;
        for line in caveats.lines() {
            if line.is_empty() {
                writeln!(out)?;
            } else {
                writeln!(out, "      {line}")?;
            }
        }
        writeln!(out, "    EOS")?;
        writeln!(out, "  end")?;
    }

    writeln!(out)?;
    writeln!(out, "  test do")?;
    let mut command = format!("#{{bin}}/{}", f.name);
    for arg in &f.test.args {
        command.push(' ');
        command.push_str(arg);
    }
    if f.test.merge_stderr {
        command.push_str(" 2>&1");
    }
    let shell = match f.test.status {
        Some(status) if status != 0 => format!("shell_output({}, {status})", quote_raw(&command)),
        _ => format!("shell_output({})", quote_raw(&command)),
    };
    writeln!(out, "    assert_match {}, {}", quote(&f.test.expect), shell)?;
    writeln!(out, "  end")?;
    writeln!(out, "end")?;
    Ok(())
}

fn with_condition(f: &Formula, condition: OsCondition) -> Vec<&Dependency> {
    f.dependencies
        .iter()
        .filter(|dep| dep.condition == condition)
        .collect()
}

fn depends_on(dep: &Dependency) -> String {
    let mut kinds = Vec::new();
    if dep.is_build_only() {
        kinds.push(":build");
    }
    if dep.tags.contains(DependencyTag::TEST) {
        kinds.push(":test");
    }
    if dep.tags.contains(DependencyTag::OPTIONAL) {
        kinds.push(":optional");
    }
    if dep.tags.contains(DependencyTag::RECOMMENDED) {
        kinds.push(":recommended");
    }
    match kinds.len() {
        0 => format!("depends_on {}", quote(&dep.name)),
        1 => format!("depends_on {} => {}", quote(&dep.name), kinds[0]),
        _ => format!("depends_on {} => [{}]", quote(&dep.name), kinds.join(", ")),
    }
}

/// Ruby double-quoted literal with interpolation markers escaped.
fn quote(s: &str) -> String {
    let escaped = s
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace("#{", "\\#{");
    format!("\"{escaped}\"")
}

/// Ruby double-quoted literal that keeps `#{...}` interpolation intact.
fn quote_raw(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

fn ruby_template(template: &Template) -> String {
    let parts = match template.parts() {
        Ok(parts) => parts,
        Err(_) => return quote(&template.0),
    };
    let mut body = String::new();
    for part in parts {
        match part {
            TemplatePart::Text(t) => {
                let quoted = quote(t);
                body.push_str(&quoted[1..quoted.len() - 1]);
            }
            TemplatePart::Var(BUILD_TIME_PLACEHOLDER) => body.push_str("#{Time.now.utc.iso8601}"),
            TemplatePart::Var(name) => {
                body.push_str("#{");
                body.push_str(name);
                body.push('}');
            }
        }
    }
    format!("\"{body}\"")
}
