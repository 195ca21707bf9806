// lil/src/main.rs
use std::ffi::OsString;
use std::fs;
use std::io::{self, IsTerminal};
use std::path::Path;
use std::process;

use clap::Parser;
use colored::Colorize;
use lil_common::config::Config;
use lil_common::error::{LilError, Result as LilResult};
use tracing::debug;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

mod build_info;
mod cli;
mod render;

use cli::{CliArgs, Command};

/// Rewrites Go-style single-dash long flags (`-version`) into their clap spelling.
fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| match arg.to_str() {
            Some("-version") => OsString::from("--version"),
            Some("-help") => OsString::from("--help"),
            _ => arg,
        })
        .collect()
}

fn init_logging(log_dir: Option<&Path>, verbose: u8) {
    let level_filter = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let max_log_level = level_filter.into_level().unwrap_or(tracing::Level::WARN);

    let env_filter = EnvFilter::builder()
        .with_default_directive(level_filter.into())
        .with_env_var("LIL_LOG")
        .from_env_lossy();

    let Some(log_dir) = log_dir.filter(|_| verbose > 0) else {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(io::stderr)
            .with_ansi(io::stderr().is_terminal())
            .without_time()
            .try_init();
        return;
    };

    if let Err(e) = fs::create_dir_all(log_dir) {
        eprintln!(
            "{} Failed to create log directory {}: {}",
            "Warning:".yellow().bold(),
            log_dir.display(),
            e
        );
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(io::stderr)
            .with_ansi(io::stderr().is_terminal())
            .without_time()
            .try_init();
    } else {
        let file_appender = tracing_appender::rolling::daily(log_dir, "lil.log");
        let (non_blocking_appender, guard) = tracing_appender::non_blocking(file_appender);

        let stderr_writer = io::stderr.with_max_level(max_log_level);
        let file_writer = non_blocking_appender.with_max_level(max_log_level);

        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(stderr_writer.and(file_writer))
            .with_ansi(io::stderr().is_terminal())
            .without_time()
            .try_init();

        // The guard flushes the file writer on drop; keep it for the whole process.
        Box::leak(Box::new(guard));

        debug!(
            "Verbose logging enabled. Writing logs to: {}/lil.log",
            log_dir.display()
        );
    }
}

fn report(err: &LilError) {
    let label = if io::stderr().is_terminal() {
        "Error".red().bold().to_string()
    } else {
        "Error".to_string()
    };
    eprintln!("{label}: {err}");
}

async fn run(cli_args: CliArgs) -> LilResult<()> {
    if cli_args.version {
        println!("{}", build_info::version_line());
        return Ok(());
    }

    let command = cli_args.command.unwrap_or_default();

    // Packaging commands work without any runtime configuration.
    if let Command::Formula(args) = &command {
        init_logging(None, cli_args.verbose);
        return args.run();
    }

    let config = Config::load()?;
    init_logging(Some(config.logs_dir()), cli_args.verbose);
    debug!("Lil version {} starting", build_info::version());

    command.run(&config).await
}

#[tokio::main]
async fn main() {
    let cli_args = CliArgs::parse_from(normalize_args(std::env::args_os()));
    if !io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    if let Err(e) = run(cli_args).await {
        debug!("Command failed: {:#}", e);
        report(&e);
        process::exit(1);
    }
}
