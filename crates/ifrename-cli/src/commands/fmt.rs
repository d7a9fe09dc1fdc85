//! Fmt command implementation.

use anyhow::Result;
use ifrename_core::TracingSink;
use std::path::Path;

/// Runs the fmt command.
///
/// Parse and serialize diagnostics go to the tracing subscriber, keeping
/// stdout for the rules text.
pub fn run(path: &Path, write: bool, header: bool) -> Result<()> {
    let mut sink = TracingSink;
    let rules = super::load(path, &mut sink)?;

    if write {
        rules.save(header, &mut sink).map_err(super::render)?;
        tracing::info!("Rewrote {}", path.display());
    } else {
        print!("{}", rules.write(header, &mut sink));
    }

    Ok(())
}
