//! Layer manifests: the decoded layer list written by the PSD reader

use crate::error::{ConvertError, Result};
use crate::layer::LayerRecord;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f32,
    pub height: f32,
}

impl From<CanvasSize> for Vec2 {
    fn from(size: CanvasSize) -> Self {
        Vec2::new(size.width, size.height)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayerManifest {
    /// Overrides the configured canvas when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canvas: Option<CanvasSize>,
    #[serde(default)]
    pub layers: Vec<LayerRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Json,
    Toml,
}

impl ManifestFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

impl LayerManifest {
    pub fn parse(content: &str, format: ManifestFormat) -> Result<Self> {
        match format {
            ManifestFormat::Json => serde_json::from_str(content)
                .map_err(|e| ConvertError::invalid_format(format!("Invalid JSON manifest: {}", e))),
            ManifestFormat::Toml => toml::from_str(content)
                .map_err(|e| ConvertError::invalid_format(format!("Invalid TOML manifest: {}", e))),
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = ManifestFormat::from_path(path).ok_or_else(|| {
            ConvertError::invalid_format(format!(
                "Manifest {} must be .json or .toml format",
                path.display()
            ))
        })?;

        let content = fs::read_to_string(path).map_err(|e| ConvertError::FileNotFound {
            path: format!("{}: {}", path.display(), e),
        })?;

        let manifest = Self::parse(&content, format)?;
        log::info!("Loaded {} layers from {}", manifest.layers.len(), path.display());
        Ok(manifest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LayerId, Rect};
    use tempfile::TempDir;

    #[test]
    fn test_load_json_manifest() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("menu.json");
        fs::write(
            &path,
            r#"{
                "canvas": { "width": 1920, "height": 1080 },
                "layers": [
                    { "id": 0, "name": "Main@Panel", "left": 0, "top": 0, "right": 1920, "bottom": 1080 },
                    { "id": 1, "parent": 0, "name": "CI", "unicode_name": [67, 111, 110, 116, 114, 111, 108, 73, 110, 102, 111],
                      "left": 5, "top": 6, "right": 7, "bottom": 8 }
                ]
            }"#,
        )
        .unwrap();

        let manifest = LayerManifest::load(&path).unwrap();
        assert_eq!(manifest.canvas.map(Vec2::from), Some(Vec2::new(1920.0, 1080.0)));
        assert_eq!(manifest.layers.len(), 2);
        assert_eq!(manifest.layers[1].parent, Some(LayerId(0)));
        assert_eq!(manifest.layers[1].display_name(), "ControlInfo");
        assert_eq!(manifest.layers[1].rect, Rect::new(5, 6, 7, 8));
    }

    #[test]
    fn test_parse_toml_manifest() {
        let content = r#"
[[layers]]
id = 0
name = "Main@Panel"
left = 0
top = 0
right = 100
bottom = 100

[[layers]]
id = 1
parent = 0
name = 'Title@Text:{"size":[80,20]}'
left = 10
top = 10
right = 90
bottom = 30
"#;
        let manifest = LayerManifest::parse(content, ManifestFormat::Toml).unwrap();
        assert!(manifest.canvas.is_none());
        assert_eq!(manifest.layers.len(), 2);
        assert_eq!(manifest.layers[1].name, r#"Title@Text:{"size":[80,20]}"#);
        assert_eq!(manifest.layers[1].rect, Rect::new(10, 10, 90, 30));
    }

    #[test]
    fn test_load_rejects_unknown_extension_and_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("layers.yaml");
        fs::write(&path, "layers: []").unwrap();
        assert!(matches!(
            LayerManifest::load(&path),
            Err(ConvertError::InvalidFormat { .. })
        ));

        assert!(matches!(
            LayerManifest::load(dir.path().join("absent.json")),
            Err(ConvertError::FileNotFound { .. })
        ));
    }

    #[test]
    fn test_parse_reports_bad_json() {
        let err = LayerManifest::parse("{ \"layers\": [ {", ManifestFormat::Json).unwrap_err();
        assert!(err.to_string().starts_with("Invalid format: Invalid JSON manifest"));
    }
}
