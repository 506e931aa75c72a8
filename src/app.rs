//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - optionally downloads the OWID dataset
//! - runs the load/filter/clean/enrich pipeline
//! - writes the processed and latest-by-country exports
//! - prints the run summary

use clap::Parser;

use crate::cli::{Command, FetchArgs, RunArgs};
use crate::domain::{DEFAULT_COUNTRIES, EXCLUDED_AGGREGATES, RunConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `covid` binary.
pub fn run() -> Result<(), AppError> {
    // We want bare `covid` and `covid -i data.csv` to behave like
    // `covid run ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing. This preserves a clean clap structure
    // while keeping the common case short.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Fetch(args) => handle_fetch(args),
        Command::Run(args) => handle_run(args, OutputMode::Full),
        Command::Summary(args) => handle_run(args, OutputMode::SummaryOnly),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Full,
    SummaryOnly,
}

fn handle_fetch(args: FetchArgs) -> Result<(), AppError> {
    let url = crate::data::resolve_url(args.url.as_deref());
    let fetched = crate::data::fetch_dataset(&args.data_dir, &url)?;
    println!(
        "Downloaded {} bytes to {} (and {})",
        fetched.bytes,
        fetched.standard_path.display(),
        fetched.dated_path.display(),
    );
    Ok(())
}

fn handle_run(args: RunArgs, mode: OutputMode) -> Result<(), AppError> {
    let config = run_config_from_args(&args);
    let run = pipeline::run_pipeline(&config)?;

    if mode == OutputMode::Full {
        std::fs::create_dir_all(&config.out_dir).map_err(|e| {
            AppError::export(format!(
                "Failed to create output directory '{}': {e}",
                config.out_dir.display()
            ))
        })?;

        crate::io::write_processed_csv(&config.processed_path(), &run.processed)?;
        crate::io::write_latest_csv(&config.latest_path(), &run.latest)?;

        if let Some(path) = &config.export_snapshot {
            crate::io::write_snapshot_json(path, &run.latest, config.window)?;
        }
    }

    if config.summary {
        println!("{}", crate::report::format_run_summary(&run, &config));
    }

    Ok(())
}

pub fn run_config_from_args(args: &RunArgs) -> RunConfig {
    let countries = if args.countries.is_empty() {
        DEFAULT_COUNTRIES.iter().map(|s| s.to_string()).collect()
    } else {
        args.countries.clone()
    };

    RunConfig {
        input: args.input.clone(),
        out_dir: args.out_dir.clone(),
        countries,
        excluded: EXCLUDED_AGGREGATES.iter().map(|s| s.to_string()).collect(),
        window: args.window,
        export_processed: args.export.clone(),
        export_latest: args.export_latest.clone(),
        export_snapshot: args.export_snapshot.clone(),
        top_n: args.top,
        summary: !args.no_summary,
    }
}

/// Rewrite argv so `covid` defaults to `covid run`.
///
/// Rules:
/// - `covid`                     -> `covid run`
/// - `covid -i data.csv ...`     -> `covid run -i data.csv ...`
/// - `covid --help/--version/-h` -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("run".to_string());
        return argv;
    };

    let is_top_level_help_or_version =
        matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "fetch" | "run" | "summary");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "run flags".
    if arg1.starts_with('-') {
        argv.insert(1, "run".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_run() {
        assert_eq!(rewrite_args(args(&["covid"])), args(&["covid", "run"]));
    }

    #[test]
    fn leading_flag_defaults_to_run() {
        assert_eq!(
            rewrite_args(args(&["covid", "-i", "x.csv"])),
            args(&["covid", "run", "-i", "x.csv"])
        );
    }

    #[test]
    fn subcommands_and_help_pass_through() {
        assert_eq!(
            rewrite_args(args(&["covid", "fetch"])),
            args(&["covid", "fetch"])
        );
        assert_eq!(
            rewrite_args(args(&["covid", "--help"])),
            args(&["covid", "--help"])
        );
    }

    #[test]
    fn default_config_uses_focus_countries() {
        let run_args = crate::cli::RunArgs {
            input: "data/owid-covid-data.csv".into(),
            out_dir: "output".into(),
            countries: vec![],
            window: 7,
            export: None,
            export_latest: None,
            export_snapshot: None,
            top: 10,
            no_summary: false,
        };
        let config = run_config_from_args(&run_args);
        assert_eq!(config.countries.len(), DEFAULT_COUNTRIES.len());
        assert_eq!(config.excluded.len(), EXCLUDED_AGGREGATES.len());
        assert!(config.summary);
    }
}
