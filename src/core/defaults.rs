use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::utils::io;

/// File fixed when neither the command line nor the config names a target.
pub const DEFAULT_TARGET: &str = "app/components/BusBookingSystem.tsx";

/// Config file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "stylefix.json";

/// Root configuration structure for stylefix.json
#[derive(Debug, Clone, Deserialize, Default)]
pub struct StylefixConfig {
    #[serde(default)]
    pub defaults: Defaults,
}

/// All configurable defaults that can be overridden via stylefix.json
#[derive(Debug, Clone, Deserialize)]
pub struct Defaults {
    #[serde(default = "default_target")]
    pub target: String,

    /// Only indented lines count as key declarations.
    #[serde(default)]
    pub require_indent: bool,

    /// Write through a temp file and rename instead of overwriting in place.
    #[serde(default)]
    pub atomic_write: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            target: default_target(),
            require_indent: false,
            atomic_write: false,
        }
    }
}

fn default_target() -> String {
    DEFAULT_TARGET.to_string()
}

// =============================================================================
// Loading
// =============================================================================

/// Load stylefix.json.
///
/// An explicit path must exist. Without one, `stylefix.json` in the working
/// directory is used when present, otherwise built-in defaults apply.
pub fn load_config(explicit: Option<&Path>) -> Result<StylefixConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let implicit = PathBuf::from(CONFIG_FILE_NAME);
            if !implicit.exists() {
                return Ok(StylefixConfig::default());
            }
            implicit
        }
    };

    let content = io::read_file(&path, &format!("read {}", path.display()))
        .map_err(|e| e.with_hint("Check the --config path, or omit it to use built-in defaults"))?;

    parse_config(&content, &path.display().to_string())
}

/// Parse and validate stylefix.json content.
pub fn parse_config(content: &str, source: &str) -> Result<StylefixConfig> {
    let config: StylefixConfig =
        serde_json::from_str(content).map_err(|e| Error::config_invalid_json(source, e))?;

    if config.defaults.target.trim().is_empty() {
        return Err(Error::config_invalid_value(
            "defaults.target",
            Some(config.defaults.target.clone()),
            "target path must not be empty",
        ));
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use tempfile::tempdir;

    #[test]
    fn empty_object_uses_builtin_defaults() {
        let config = parse_config("{}", "stylefix.json").unwrap();

        assert_eq!(config.defaults.target, DEFAULT_TARGET);
        assert!(!config.defaults.require_indent);
        assert!(!config.defaults.atomic_write);
    }

    #[test]
    fn partial_defaults_keep_other_fields() {
        let config =
            parse_config(r#"{"defaults": {"require_indent": true}}"#, "stylefix.json").unwrap();

        assert!(config.defaults.require_indent);
        assert_eq!(config.defaults.target, DEFAULT_TARGET);
    }

    #[test]
    fn malformed_json_is_config_error() {
        let err = parse_config(r#"{"defaults": "#, "stylefix.json").unwrap_err();

        assert_eq!(err.code, ErrorCode::ConfigInvalidJson);
        assert_eq!(err.details["path"], "stylefix.json");
    }

    #[test]
    fn empty_target_is_rejected() {
        let err = parse_config(r#"{"defaults": {"target": "  "}}"#, "stylefix.json").unwrap_err();

        assert_eq!(err.code, ErrorCode::ConfigInvalidValue);
        assert_eq!(err.details["key"], "defaults.target");
    }

    #[test]
    fn explicit_config_is_read_from_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.json");
        std::fs::write(
            &path,
            r#"{"defaults": {"target": "src/styles.ts", "atomic_write": true}}"#,
        )
        .unwrap();

        let config = load_config(Some(path.as_path())).unwrap();

        assert_eq!(config.defaults.target, "src/styles.ts");
        assert!(config.defaults.atomic_write);
    }

    #[test]
    fn missing_explicit_config_is_io_error() {
        let dir = tempdir().unwrap();
        let err = load_config(Some(dir.path().join("absent.json").as_path())).unwrap_err();

        assert_eq!(err.code, ErrorCode::InternalIoError);
        assert_eq!(err.hints.len(), 1);
    }
}
