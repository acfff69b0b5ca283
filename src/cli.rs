//! Command-line interface module for dirsort.
//!
//! This module handles:
//! - Argument definitions
//! - The root pass over the target directory
//! - The follow-up passes over named subfolders

use crate::config::RulesConfig;
use crate::organizer::{Organizer, Summary};
use crate::output::OutputFormatter;
use clap::Parser;
use std::path::{Path, PathBuf};

/// Sort files into folders by filename pattern.
#[derive(Debug, Parser)]
#[command(name = "dirsort", version, about)]
pub struct Cli {
    /// Directory to organize
    pub directory: PathBuf,

    /// Also sort files found in nested folders
    #[arg(short, long)]
    pub recursive: bool,
}

/// Runs the built-in rule tables against `dir_path`.
///
/// # Examples
///
/// ```no_run
/// use dirsort::cli::run_cli;
/// use std::path::Path;
///
/// match run_cli(Path::new("/path/to/directory"), false) {
///     Ok(summary) => println!("{} files moved", summary.moved),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_cli(dir_path: &Path, recursive: bool) -> Result<Summary, String> {
    run_cli_with_rules(dir_path, recursive, &RulesConfig::default())
}

/// Runs `config` against `dir_path`: one root pass, then one pass per
/// configured subfolder, in order.
///
/// `recursive` applies to the root pass only; subfolder passes use their own
/// flag. A subfolder that does not exist is reported and skipped.
///
/// # Errors
///
/// Returns an error message if `dir_path` is not a directory. Nothing is
/// moved in that case.
pub fn run_cli_with_rules(
    dir_path: &Path,
    recursive: bool,
    config: &RulesConfig,
) -> Result<Summary, String> {
    let plan = config.compile();
    OutputFormatter::info(&format!("Organizing contents of: {}", dir_path.display()));

    let mut total =
        Organizer::organize(dir_path, &plan.root_rules, recursive).map_err(|e| e.to_string())?;
    let mut passes = 1;

    for pass in &plan.subfolders {
        if let Some(summary) =
            Organizer::organize_subfolder(dir_path, &pass.name, &pass.rules, pass.recursive)
        {
            total.absorb(summary);
            passes += 1;
        }
    }

    OutputFormatter::run_totals(&total, passes);
    Ok(total)
}
