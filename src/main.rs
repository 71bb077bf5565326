//! swiftflight CLI - An opinionated formatter for Swift-style sources

use clap::Parser;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use swiftflight::cli::{self, Cli, Commands};
use swiftflight::FormatConfig;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = cli.config();

    match &cli.command {
        Commands::Fmt { write, files } => run_fmt(files, *write, &config),
        Commands::Check { files } => run_check(files, &config),
        Commands::Lint { files } => run_lint(files),
    }
}

/// Run the fmt command
fn run_fmt(files: &[PathBuf], write_mode: bool, config: &FormatConfig) -> ExitCode {
    let mut had_errors = false;

    for file_path in files {
        if file_path == Path::new("-") {
            match format_stdin(config) {
                Ok(formatted) => print!("{}", formatted),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    had_errors = true;
                }
            }
            continue;
        }

        for entry in cli::discover_files(file_path) {
            if let Err(e) = format_file(&entry, write_mode, config) {
                eprintln!("{}: {}", entry.display(), e);
                had_errors = true;
            }
        }
    }

    if had_errors {
        ExitCode::from(2)
    } else {
        ExitCode::SUCCESS
    }
}

/// Run the check command
fn run_check(files: &[PathBuf], config: &FormatConfig) -> ExitCode {
    let mut needs_formatting = false;
    let mut had_errors = false;

    for file_path in files {
        if file_path == Path::new("-") {
            match check_stdin(config) {
                Ok(formatted) => {
                    if !formatted {
                        eprintln!("<stdin>: needs formatting");
                        needs_formatting = true;
                    }
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    had_errors = true;
                }
            }
            continue;
        }

        for entry in cli::discover_files(file_path) {
            match check_file(&entry, config) {
                Ok(formatted) => {
                    if !formatted {
                        eprintln!("{}: needs formatting", entry.display());
                        needs_formatting = true;
                    }
                }
                Err(e) => {
                    eprintln!("{}: {}", entry.display(), e);
                    had_errors = true;
                }
            }
        }
    }

    if had_errors {
        ExitCode::from(2)
    } else if needs_formatting {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

/// Run the lint command; any finding makes the exit status non-zero.
fn run_lint(files: &[PathBuf]) -> ExitCode {
    let mut found = false;
    let mut had_errors = false;

    for file_path in files {
        for entry in cli::discover_files(file_path) {
            match lint_file(&entry) {
                Ok(diagnostics) => {
                    for diagnostic in &diagnostics {
                        eprintln!("{}:{}", entry.display(), diagnostic);
                    }
                    found |= !diagnostics.is_empty();
                }
                Err(e) => {
                    eprintln!("{}: {}", entry.display(), e);
                    had_errors = true;
                }
            }
        }
    }

    if had_errors {
        ExitCode::from(2)
    } else if found {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

/// Format a single file
fn format_file(path: &Path, write_mode: bool, config: &FormatConfig) -> Result<(), swiftflight::Error> {
    let contents = fs::read_to_string(path)?;
    let formatted = swiftflight::format_with_config(&contents, config)?;

    if write_mode {
        if formatted != contents {
            fs::write(path, &formatted)?;
        }
    } else {
        print!("{}", formatted);
    }

    Ok(())
}

/// Check a single file
fn check_file(path: &Path, config: &FormatConfig) -> Result<bool, swiftflight::Error> {
    let contents = fs::read_to_string(path)?;
    swiftflight::check_with_config(&contents, config)
}

/// Lint a single file
fn lint_file(path: &Path) -> Result<Vec<swiftflight::Diagnostic>, swiftflight::Error> {
    let contents = fs::read_to_string(path)?;
    swiftflight::lint(&contents)
}

/// Format from stdin
fn format_stdin(config: &FormatConfig) -> Result<String, swiftflight::Error> {
    let mut contents = String::new();
    io::stdin().read_to_string(&mut contents)?;
    swiftflight::format_with_config(&contents, config)
}

/// Check stdin
fn check_stdin(config: &FormatConfig) -> Result<bool, swiftflight::Error> {
    let mut contents = String::new();
    io::stdin().read_to_string(&mut contents)?;
    swiftflight::check_with_config(&contents, config)
}
