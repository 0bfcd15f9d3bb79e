//! Engine and bake configuration.

use crate::gesture::DEFAULT_HIT_TOLERANCE;
use crate::shapes::ItemStyle;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default JPEG quality for baked output.
pub const DEFAULT_QUALITY: u8 = 90;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Encoding of the baked image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Jpeg,
    Png,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
        }
    }
}

/// Where and how baked images are written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BakeConfig {
    pub format: OutputFormat,
    /// JPEG quality, clamped to 1..=100 when used.
    pub quality: u8,
    /// Output directory; the source image's directory when unset.
    pub output_dir: Option<PathBuf>,
    pub file_prefix: String,
}

impl Default for BakeConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            quality: DEFAULT_QUALITY,
            output_dir: None,
            file_prefix: "annotated".to_string(),
        }
    }
}

impl BakeConfig {
    pub fn quality(&self) -> u8 {
        self.quality.clamp(1, 100)
    }

    /// Directory a bake of `source` writes into.
    pub fn output_dir_for(&self, source: &Path) -> PathBuf {
        match &self.output_dir {
            Some(dir) => dir.clone(),
            None => source
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty())
                .map_or_else(|| PathBuf::from("."), Path::to_path_buf),
        }
    }
}

/// Engine-wide settings. Every field has a default, so partial JSON works.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Slack around item bounds when hit-testing, in canvas units.
    pub hit_tolerance: f64,
    /// Style new items start with.
    pub default_style: ItemStyle,
    pub bake: BakeConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hit_tolerance: DEFAULT_HIT_TOLERANCE,
            default_style: ItemStyle::default(),
            bake: BakeConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::SerializableColor;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert!((config.hit_tolerance - 10.0).abs() < f64::EPSILON);
        assert_eq!(config.default_style, ItemStyle::default());
        assert_eq!(config.bake.format, OutputFormat::Jpeg);
        assert_eq!(config.bake.quality(), 90);
        assert_eq!(config.bake.file_prefix, "annotated");
    }

    #[test]
    fn test_partial_json() {
        let config = EngineConfig::from_json(
            r#"{"hit_tolerance": 4.0, "bake": {"format": "png", "quality": 0}}"#,
        )
        .unwrap();
        assert!((config.hit_tolerance - 4.0).abs() < f64::EPSILON);
        assert_eq!(config.bake.format, OutputFormat::Png);
        assert_eq!(config.bake.quality(), 1);
        assert_eq!(config.bake.file_prefix, "annotated");
        assert_eq!(config.default_style.stroke_color, SerializableColor::black());
    }

    #[test]
    fn test_from_json_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("photomark.json");
        fs::write(
            &path,
            r#"{"default_style": {"stroke_color": {"r": 255, "g": 0, "b": 0, "a": 255}, "stroke_width": 6.0}}"#,
        )
        .unwrap();

        let config = EngineConfig::from_json_file(&path).unwrap();
        assert_eq!(config.default_style.stroke_color, SerializableColor::red());
        assert!((config.default_style.stroke_width - 6.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_missing_and_malformed_files() {
        let dir = TempDir::new().unwrap();
        let missing = EngineConfig::from_json_file(dir.path().join("nope.json"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));

        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            EngineConfig::from_json_file(&path),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_output_dir_defaults_to_source_parent() {
        let bake = BakeConfig::default();
        assert_eq!(
            bake.output_dir_for(Path::new("/photos/cat.jpg")),
            PathBuf::from("/photos")
        );
        assert_eq!(bake.output_dir_for(Path::new("cat.jpg")), PathBuf::from("."));

        let bake = BakeConfig {
            output_dir: Some(PathBuf::from("/out")),
            ..BakeConfig::default()
        };
        assert_eq!(bake.output_dir_for(Path::new("/photos/cat.jpg")), PathBuf::from("/out"));
    }
}
