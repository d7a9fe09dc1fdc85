//! Check command implementation.

use anyhow::Result;
use ifrename_core::Collector;
use std::path::Path;

use crate::OutputFormat;

/// Runs the check command.
pub fn run(path: &Path, format: OutputFormat) -> Result<()> {
    let mut sink = Collector::new();
    let rules = super::load(path, &mut sink)?;

    tracing::debug!("Loaded {} rule(s) from {}", rules.formulae().len(), path.display());

    super::output::print_check(path, rules.formulae().len(), sink.diagnostics(), format)
}
