//! Tracing setup for reconciliation runs
//!
//! Builds the level filter from `LoggingConfig` and installs a console
//! layer (pretty or JSON) plus an optional persisted file layer. The log
//! file is truncated at the start of each run so the trace always covers
//! exactly the last run.

use crate::config::{LogFormat, LoggingConfig};
use std::fs::File;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Build filter directives string from LoggingConfig
///
/// Constructs a tracing filter string that includes the base log level
/// and any component-specific log levels configured in the LoggingConfig.
///
/// # Examples
///
/// ```
/// use listsync::config::LoggingConfig;
/// use listsync::logging::build_filter_directives;
/// use std::collections::HashMap;
///
/// let mut component_levels = HashMap::new();
/// component_levels.insert("engine".to_string(), "debug".to_string());
///
/// let config = LoggingConfig {
///     level: "info".to_string(),
///     component_levels: Some(component_levels),
///     ..LoggingConfig::default()
/// };
///
/// assert_eq!(build_filter_directives(&config), "info,listsync::engine=debug");
/// ```
pub fn build_filter_directives(config: &LoggingConfig) -> String {
    let mut filter_str = config.level.clone();

    if let Some(component_levels) = &config.component_levels {
        let mut components: Vec<_> = component_levels.iter().collect();
        components.sort();
        for (component, level) in components {
            filter_str.push_str(&format!(",listsync::{}={}", component, level));
        }
    }

    filter_str
}

/// Initialize tracing based on configuration
///
/// Installs the subscriber for the whole process; subsequent calls fail.
/// The logger is constructed once per run here and reached through the
/// tracing context everywhere else, never through mutable global state of
/// our own.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let filter_str = build_filter_directives(config);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    // File::create truncates: the persisted surface is cleared per run.
    let file = match &config.file {
        Some(path) => Some(Arc::new(File::create(path)?)),
        None => None,
    };

    match config.format {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .with(file.map(|f| {
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(f)
                }))
                .try_init()?;
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .with(file.map(|f| {
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(f)
                }))
                .try_init()?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_filter_directives_base_level_only() {
        let config = LoggingConfig {
            level: "warn".to_string(),
            ..LoggingConfig::default()
        };
        assert_eq!(build_filter_directives(&config), "warn");
    }

    #[test]
    fn test_filter_directives_with_components() {
        let mut component_levels = HashMap::new();
        component_levels.insert("engine".to_string(), "debug".to_string());
        component_levels.insert("client".to_string(), "trace".to_string());

        let config = LoggingConfig {
            level: "info".to_string(),
            component_levels: Some(component_levels),
            ..LoggingConfig::default()
        };

        assert_eq!(
            build_filter_directives(&config),
            "info,listsync::client=trace,listsync::engine=debug"
        );
    }

    #[test]
    fn test_log_file_cleared_on_init() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.log");
        std::fs::write(&path, "trace of the previous run\n").unwrap();

        let config = LoggingConfig {
            file: Some(path.clone()),
            ..LoggingConfig::default()
        };
        init_tracing(&config).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(!contents.contains("previous run"));
    }
}
