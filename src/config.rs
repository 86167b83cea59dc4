//! User configuration (`config.toml`).

use crate::builder::{DEFAULT_TIMESTAMP_FORMAT, ReadOptions};
use directories::ProjectDirs;
use serde::Deserialize;
use spanrow_core::{SpanrowError, WriterFormat};
use std::path::{Path, PathBuf};

const MAX_CONFIG_FILE_BYTES: u64 = 1_048_576; // 1 MiB

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub output: OutputConfig,
    pub read: ReadConfig,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Writer format name used when the output path does not decide it
    pub format: String,
    /// Output file stem
    pub filename: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            format: WriterFormat::Csv.name().to_string(),
            filename: "excel".to_string(),
        }
    }
}

impl OutputConfig {
    pub fn writer_format(&self) -> Result<WriterFormat, SpanrowError> {
        self.format.parse()
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReadConfig {
    pub to_string: bool,
    pub timestamp: bool,
    /// Empty string keeps raw Unix seconds
    pub timestamp_format: String,
}

impl Default for ReadConfig {
    fn default() -> Self {
        ReadConfig {
            to_string: true,
            timestamp: true,
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
        }
    }
}

impl ReadConfig {
    pub fn options(&self) -> ReadOptions {
        ReadOptions {
            timestamp: self.timestamp,
            timestamp_format: Some(self.timestamp_format.clone()).filter(|f| !f.is_empty()),
            ..ReadOptions::default()
        }
    }
}

/// Default config location, e.g. `~/.config/spanrow/config.toml`.
pub fn user_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "spanrow")?;
    Some(proj.config_dir().join("config.toml"))
}

/// Load configuration from `path` (or the user config path).
///
/// Never fails: problems are returned as warnings alongside the defaults.
pub fn load_config(path: Option<&Path>) -> (Config, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();
    let explicit = path.is_some();
    let Some(path) = path.map(Path::to_path_buf).or_else(user_config_path) else {
        return (Config::default(), warnings);
    };

    if !path.exists() {
        if explicit {
            warnings.push(format!("Config file {} not found", path.display()));
        }
        return (Config::default(), warnings);
    }

    let config = match std::fs::metadata(&path) {
        Ok(meta) if meta.len() > MAX_CONFIG_FILE_BYTES => {
            warnings.push(format!(
                "Refusing to read {}: file too large ({} bytes, max {})",
                path.display(),
                meta.len(),
                MAX_CONFIG_FILE_BYTES
            ));
            None
        }
        Ok(_) => match std::fs::read_to_string(&path) {
            Ok(content) => parse_config(&content)
                .map_err(|err| warnings.push(format!("Failed to parse {}: {}", path.display(), err)))
                .ok(),
            Err(err) => {
                warnings.push(format!("Failed to read {}: {}", path.display(), err));
                None
            }
        },
        Err(err) => {
            warnings.push(format!("Failed to read {}: {}", path.display(), err));
            None
        }
    };

    let config = config.unwrap_or_default();
    if let Err(err) = config.output.writer_format() {
        warnings.push(format!("{}; using {}", err, WriterFormat::Csv));
        let fallback = Config {
            output: OutputConfig {
                format: WriterFormat::Csv.name().to_string(),
                ..config.output
            },
            ..config
        };
        return (fallback, warnings);
    }
    (config, warnings)
}

pub fn parse_config(content: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.output.writer_format().unwrap(), WriterFormat::Csv);
        assert_eq!(config.read.options(), ReadOptions::default());
    }

    #[test]
    fn test_partial_config() {
        let config = parse_config(
            r#"
            [output]
            format = "Html"

            [read]
            timestamp_format = ""
            "#,
        )
        .unwrap();
        assert_eq!(config.output.writer_format().unwrap(), WriterFormat::Html);
        assert_eq!(config.output.filename, "excel");
        assert!(config.read.to_string);
        assert_eq!(config.read.options().timestamp_format, None);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(parse_config("[output]\ncolour = \"red\"\n").is_err());
    }

    #[test]
    fn test_load_config_warnings() {
        let dir = tempfile::tempdir().unwrap();

        let missing = dir.path().join("missing.toml");
        let (config, warnings) = load_config(Some(&missing));
        assert_eq!(config, Config::default());
        assert_eq!(warnings.len(), 1);

        let broken = dir.path().join("broken.toml");
        std::fs::write(&broken, "[output\n").unwrap();
        let (config, warnings) = load_config(Some(&broken));
        assert_eq!(config, Config::default());
        assert!(warnings[0].starts_with("Failed to parse"));

        let bad_format = dir.path().join("format.toml");
        std::fs::write(&bad_format, "[output]\nformat = \"Pdf\"\nfilename = \"out\"\n").unwrap();
        let (config, warnings) = load_config(Some(&bad_format));
        assert_eq!(config.output.format, "Csv");
        assert_eq!(config.output.filename, "out");
        assert_eq!(warnings.len(), 1);
    }
}
