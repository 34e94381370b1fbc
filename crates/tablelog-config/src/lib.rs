//! # tablelog-config
//!
//! TOML configuration for the tablelog workspace.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::path::Path;
//! use tablelog_config::{env_app_id, AppConfig};
//!
//! let config = AppConfig::from_file(Path::new("tablelog.toml"))?;
//! let settings = config.emitter_settings(env_app_id().as_deref());
//! ```
//!
//! ## Example document
//!
//! ```toml
//! app_id = "sales-explorer"
//! surface_notices = true
//! log_filter = "debug"
//!
//! [[sinks]]
//! kind = "stdout"
//!
//! [[sinks]]
//! kind = "file"
//! path = "logs/table_access.log"
//! ```

pub mod app;
pub mod sinks;

pub use app::{env_app_id, resolve_app_id, AppConfig, APP_ID_ENV};
pub use sinks::SinkSpec;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use tablelog_contracts::error::TablelogError;

    use crate::{resolve_app_id, AppConfig, SinkSpec};

    // ── 1. defaults ───────────────────────────────────────────────────────────

    /// An empty document is the default configuration.
    #[test]
    fn test_empty_document_is_default() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.sinks, vec![SinkSpec::Tracing]);
        assert_eq!(config.log_filter, "info");
        assert!(!config.surface_notices);
    }

    // ── 2. full document ──────────────────────────────────────────────────────

    #[test]
    fn test_full_document() {
        let toml = r#"
            app_id = "sales-explorer"
            surface_notices = true
            log_filter = "debug"

            [[sinks]]
            kind = "stdout"

            [[sinks]]
            kind = "file"
            path = "logs/table_access.log"

            [[sinks]]
            kind = "memory"
        "#;

        let config = AppConfig::from_toml_str(toml).unwrap();

        assert_eq!(config.app_id.as_deref(), Some("sales-explorer"));
        assert!(config.surface_notices);
        assert_eq!(config.log_filter, "debug");
        assert_eq!(
            config.sinks,
            vec![
                SinkSpec::Stdout,
                SinkSpec::File { path: PathBuf::from("logs/table_access.log") },
                SinkSpec::Memory,
            ]
        );
    }

    // ── 3. app id precedence ──────────────────────────────────────────────────

    #[test]
    fn test_app_id_precedence() {
        assert_eq!(resolve_app_id(Some("env-app"), Some("file-app")), "env-app");
        assert_eq!(resolve_app_id(None, Some("file-app")), "file-app");
        assert_eq!(resolve_app_id(Some("   "), Some("file-app")), "file-app");
        assert_eq!(resolve_app_id(Some(""), None), "local-dev");
        assert_eq!(resolve_app_id(None, None), "local-dev");
    }

    #[test]
    fn test_emitter_settings_carry_notices_flag() {
        let config = AppConfig::from_toml_str("surface_notices = true").unwrap();
        let settings = config.emitter_settings(Some("abc"));
        assert_eq!(settings.app_id, "abc");
        assert!(settings.surface_notices);
    }

    // ── 4. rejected documents ─────────────────────────────────────────────────

    #[test]
    fn test_unknown_sink_kind_is_rejected() {
        let toml = r#"
            [[sinks]]
            kind = "carrier-pigeon"
        "#;
        assert!(matches!(
            AppConfig::from_toml_str(toml),
            Err(TablelogError::ConfigError { .. })
        ));
    }

    #[test]
    fn test_empty_sink_list_is_rejected() {
        match AppConfig::from_toml_str("sinks = []") {
            Err(TablelogError::ConfigError { reason }) => {
                assert!(reason.contains("at least one sink"), "got: {reason}");
            }
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn test_toml_parse_error() {
        match AppConfig::from_toml_str("this is not valid toml ][[[") {
            Err(TablelogError::ConfigError { reason }) => {
                assert!(reason.contains("failed to parse config TOML"), "got: {reason}");
            }
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = AppConfig::from_file(std::path::Path::new("/nonexistent/tablelog.toml"));
        assert!(matches!(result, Err(TablelogError::ConfigError { .. })));
    }
}
