//! Init command implementation.

use anyhow::{bail, Context, Result};
use ifrename_core::{StaticRules, TracingSink};
use std::path::Path;

/// Runs the init command.
pub fn run(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "Static rules file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    StaticRules::with_path(path)
        .save(true, &mut TracingSink)
        .map_err(super::render)?;

    println!("Created {}", path.display());
    println!("\nNext steps:");
    println!("  1. Add rules such as: eth0:mac=\"DE:AD:C0:DE:00:00\"");
    println!("  2. Run: ifrename-static check {}", path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ifrename_core::SAVE_HEADER;

    #[test]
    fn creates_header_only_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("static-rules.conf");

        run(&path, false).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), SAVE_HEADER);
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("static-rules.conf");
        std::fs::write(&path, "eth0=p1p1\n").unwrap();

        assert!(run(&path, false).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "eth0=p1p1\n");

        run(&path, true).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), SAVE_HEADER);
    }
}
