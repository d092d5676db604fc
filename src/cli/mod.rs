//! The casebook command-line interface.
//!
//! This module is the entry point for all CLI commands. Case files are discovered
//! and loaded through [`crate::discovery`]; load errors are rendered as miette
//! diagnostics on stderr.

use std::io::{self, Write};
use std::path::Path;
use std::process;

use clap::Parser;
use miette::{miette, Report};
use serde_json::json;
use termcolor::{Color, ColorSpec, StandardStream, WriteColor};
use tracing_subscriber::EnvFilter;

use crate::case::Case;
use crate::cli::args::{CasebookArgs, Command};
use crate::discovery::{load_all, CaseFile, LoadError};
use crate::report::ReportConfig;

pub mod args;

/// Environment variable holding the tracing filter directives.
pub const LOG_ENV: &str = "CASEBOOK_LOG";

/// The main entry point for the CLI.
pub fn run() {
    let args = CasebookArgs::parse();
    init_tracing();

    let mut config = ReportConfig::default();
    config.use_colors &= !args.no_color;

    let result = match args.command {
        Command::List { path, json } => handle_list(&path, json, &config),
        Command::Check { path } => handle_check(&path, &config),
    };

    match result {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("{:?}", e);
            process::exit(1);
        }
    }
}

/// Installs a stderr fmt subscriber filtered by [`LOG_ENV`], `warn` when unset.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Handles the `list` subcommand. Returns whether every file loaded.
fn handle_list(path: &Path, as_json: bool, config: &ReportConfig) -> miette::Result<bool> {
    let (files, errors) = load_existing(path)?;

    if as_json {
        let doc = json!({
            "files": files.iter().map(file_json).collect::<Vec<_>>(),
            "errors": errors
                .iter()
                .map(|e| json!({ "message": e.to_string() }))
                .collect::<Vec<_>>(),
        });
        let text = serde_json::to_string_pretty(&doc)
            .map_err(|e| miette!("failed to render JSON: {}", e))?;
        println!("{}", text);
        return Ok(errors.is_empty());
    }

    let mut stdout = StandardStream::stdout(config.color_choice());
    for file in &files {
        print_file_listing(&mut stdout, file).map_err(io_error)?;
    }
    Ok(report_load_errors(errors) == 0)
}

/// Handles the `check` subcommand. Returns whether every file loaded.
fn handle_check(path: &Path, config: &ReportConfig) -> miette::Result<bool> {
    let (files, errors) = load_existing(path)?;

    let mut stdout = StandardStream::stdout(config.color_choice());
    for file in &files {
        print_ok(&mut stdout, file).map_err(io_error)?;
    }
    let failed = report_load_errors(errors);

    let cases: usize = files.iter().map(CaseFile::len).sum();
    println!("{} files, {} cases", files.len() + failed, cases);
    if failed > 0 {
        println!("{} files failed to load", failed);
    }
    Ok(failed == 0)
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

fn load_existing(path: &Path) -> miette::Result<(Vec<CaseFile>, Vec<LoadError>)> {
    if !path.exists() {
        return Err(miette!(
            code = "casebook::cli::missing_path",
            "{} does not exist",
            path.display()
        ));
    }
    let mut files = Vec::new();
    let mut errors = Vec::new();
    for (_, loaded) in load_all(path) {
        match loaded {
            Ok(file) => files.push(file),
            Err(e) => errors.push(e),
        }
    }
    Ok((files, errors))
}

fn report_load_errors(errors: Vec<LoadError>) -> usize {
    let count = errors.len();
    for e in errors {
        eprintln!("{:?}", Report::new(e));
    }
    count
}

fn expectation(case: &Case) -> String {
    if case.expects_error() {
        format!("error {:?}", case.error)
    } else {
        format!("want {}", case.want)
    }
}

fn file_json(file: &CaseFile) -> serde_json::Value {
    let cases: Vec<serde_json::Value> = file
        .iter()
        .map(|(name, case)| {
            let (expects, expected) = if case.expects_error() {
                ("error", case.error.clone())
            } else {
                ("want", case.want.to_string())
            };
            json!({
                "name": name,
                "input": case.input.to_string(),
                "expects": expects,
                "expected": expected,
            })
        })
        .collect();
    json!({
        "path": file.path.display().to_string(),
        "cases": cases,
    })
}

fn print_file_listing(out: &mut StandardStream, file: &CaseFile) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_bold(true))?;
    writeln!(out, "{}", file.path.display())?;
    out.reset()?;
    for (name, case) in file.iter() {
        writeln!(out, "  {}  {}", name, expectation(case))?;
    }
    Ok(())
}

fn print_ok(out: &mut StandardStream, file: &CaseFile) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
    write!(out, "ok")?;
    out.reset()?;
    writeln!(out, "  {} ({} cases)", file.path.display(), file.len())
}

fn io_error(e: io::Error) -> Report {
    miette!("failed to write output: {}", e)
}
