//! Config command handlers

use crate::cli::ConfigInitArgs;
use anyhow::{bail, Context, Result};
use std::fs;

const EXAMPLE_CONFIG: &str = include_str!("../../listsync.example.toml");

/// Handle `listsync config init` command
pub fn handle_config_init(args: &ConfigInitArgs) -> Result<()> {
    if args.output.exists() && !args.force {
        bail!(
            "File already exists: {}. Use --force to overwrite.",
            args.output.display()
        );
    }

    fs::write(&args.output, EXAMPLE_CONFIG)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    println!("✓ Configuration file created: {}", args.output.display());
    println!("  Edit the [mappings] table to match your CSV export.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_init_creates_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let output_path = temp_dir.path().join("listsync.toml");

        let args = ConfigInitArgs {
            output: output_path.clone(),
            force: false,
        };

        handle_config_init(&args).unwrap();

        assert!(output_path.exists());
        let content = std::fs::read_to_string(&output_path).unwrap();
        assert!(content.contains("[mappings]"));
        assert!(content.contains("[identity]"));
    }

    #[test]
    fn test_config_init_no_overwrite() {
        let temp_dir = tempfile::tempdir().unwrap();
        let output_path = temp_dir.path().join("listsync.toml");

        std::fs::write(&output_path, "existing").unwrap();

        let args = ConfigInitArgs {
            output: output_path.clone(),
            force: false,
        };

        assert!(handle_config_init(&args).is_err());
        assert_eq!(std::fs::read_to_string(&output_path).unwrap(), "existing");
    }

    #[test]
    fn test_config_init_force_overwrites() {
        let temp_dir = tempfile::tempdir().unwrap();
        let output_path = temp_dir.path().join("listsync.toml");

        std::fs::write(&output_path, "old content").unwrap();

        let args = ConfigInitArgs {
            output: output_path.clone(),
            force: true,
        };

        handle_config_init(&args).unwrap();
        assert!(std::fs::read_to_string(&output_path)
            .unwrap()
            .contains("[remote]"));
    }

    #[test]
    fn test_example_config_parses_and_validates() {
        let config: crate::config::SyncConfig = toml::from_str(EXAMPLE_CONFIG).unwrap();
        config.validate().unwrap();
    }
}
