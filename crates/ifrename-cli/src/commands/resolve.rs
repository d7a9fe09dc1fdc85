//! Resolve command implementation.

use anyhow::{Context, Result};
use ifrename_core::{Collector, NicDescriptor};
use std::path::Path;

use crate::OutputFormat;

/// Runs the resolve command.
pub fn run(path: &Path, nics_path: &Path, format: OutputFormat) -> Result<()> {
    let nics = load_nics(nics_path)?;

    let mut sink = Collector::new();
    let mut rules = super::load(path, &mut sink)?;

    tracing::info!(
        "Resolving {} rule(s) against {} NIC(s)",
        rules.formulae().len(),
        nics.len()
    );
    rules.generate(&nics, &mut sink);

    super::output::print_bindings(path, rules.rules(), sink.diagnostics(), format)
}

fn load_nics(path: &Path) -> Result<Vec<NicDescriptor>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read NIC snapshot: {}", path.display()))?;
    parse_nics(&content).with_context(|| format!("Invalid NIC snapshot: {}", path.display()))
}

fn parse_nics(content: &str) -> serde_json::Result<Vec<NicDescriptor>> {
    serde_json::from_str(content)
}
