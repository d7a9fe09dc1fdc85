//! Subcommand implementations.

pub mod check;
pub mod fmt;
pub mod init;
pub mod output;
pub mod resolve;

use ifrename_core::{DiagnosticSink, SourceError, StaticRules};
use std::path::Path;

/// Loads a rules file, rendering source errors with miette before failing.
fn load(path: &Path, sink: &mut dyn DiagnosticSink) -> anyhow::Result<StaticRules> {
    let mut rules = StaticRules::with_path(path);
    rules.load_and_parse(sink).map_err(render)?;
    Ok(rules)
}

fn render(err: SourceError) -> anyhow::Error {
    eprintln!("{:?}", miette::Report::new(err));
    anyhow::anyhow!("could not read static rules")
}
