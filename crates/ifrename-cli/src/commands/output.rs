//! Shared output formatting for diagnostics and bindings.

use anyhow::Result;
use ifrename_core::{Diagnostic, Level, MacPci};
use serde::Serialize;
use std::path::Path;

use crate::OutputFormat;

#[derive(Serialize)]
struct CheckReport<'a> {
    file: &'a Path,
    formulae: usize,
    diagnostics: &'a [Diagnostic],
}

#[derive(Serialize)]
struct ResolveReport<'a> {
    file: &'a Path,
    bindings: &'a [MacPci],
    diagnostics: &'a [Diagnostic],
}

/// Prints the result of parsing a rules file.
pub fn print_check(
    file: &Path,
    formulae: usize,
    diagnostics: &[Diagnostic],
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Text => {
            print_diagnostics_text(file, diagnostics);
            print_summary(file, formulae, diagnostics);
        }
        OutputFormat::Json => {
            let report = CheckReport {
                file,
                formulae,
                diagnostics,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Compact => print_diagnostics_compact(file, diagnostics),
    }
    Ok(())
}

/// Prints resolved bindings with the diagnostics gathered on the way.
pub fn print_bindings(
    file: &Path,
    bindings: &[MacPci],
    diagnostics: &[Diagnostic],
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Text => {
            print_diagnostics_text(file, diagnostics);
            for rule in bindings {
                println!("{:<8} {}  {}", rule.target(), rule.mac(), rule.pci());
            }
            println!("\n{} binding(s)", bindings.len());
        }
        OutputFormat::Json => {
            let report = ResolveReport {
                file,
                bindings,
                diagnostics,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Compact => {
            for rule in bindings {
                println!("{rule}");
            }
        }
    }
    Ok(())
}

fn print_diagnostics_text(file: &Path, diagnostics: &[Diagnostic]) {
    for d in diagnostics.iter().filter(|d| d.level >= Level::Info) {
        let indicator = match d.level {
            Level::Critical | Level::Error => "\x1b[31merror\x1b[0m",
            Level::Warning => "\x1b[33mwarning\x1b[0m",
            Level::Info | Level::Debug => "\x1b[34minfo\x1b[0m",
        };
        match d.line {
            Some(line) => println!("{} at {}:{line}", d.kind.code(), file.display()),
            None => println!("{} in {}", d.kind.code(), file.display()),
        }
        println!("  {indicator}: {}", d.message);
        println!();
    }
}

fn print_summary(file: &Path, formulae: usize, diagnostics: &[Diagnostic]) {
    let warnings = diagnostics
        .iter()
        .filter(|d| d.level == Level::Warning)
        .count();
    let color = if warnings > 0 { "\x1b[33m" } else { "\x1b[32m" };
    println!(
        "{color}{} rule(s) loaded from {}, {} warning(s)\x1b[0m",
        formulae,
        file.display(),
        warnings
    );
}

fn print_diagnostics_compact(file: &Path, diagnostics: &[Diagnostic]) {
    for d in diagnostics.iter().filter(|d| d.level >= Level::Info) {
        println!("{}", compact_line(file, d));
    }
}

fn compact_line(file: &Path, d: &Diagnostic) -> String {
    format!(
        "{}:{}: {} [{}] {}",
        file.display(),
        d.line.unwrap_or(0),
        d.level,
        d.kind.code(),
        d.message
    )
}
