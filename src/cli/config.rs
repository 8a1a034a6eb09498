// FILE: src/cli/config.rs

use crate::error::{ConvertError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub canvas_width: Option<f32>,
    pub canvas_height: Option<f32>,
    pub root_index: Option<usize>,
    pub texture_suffix: Option<String>,
    pub widget_classes: Option<HashMap<String, String>>,
    pub output_directory: Option<String>,
}

pub fn load(config_path: &str) -> Result<ConfigFile> {
    log::info!("Loaded configuration from {}", config_path);
    let config_content = fs::read_to_string(config_path).map_err(|e| {
        ConvertError::FileNotFound {
            path: format!("Config file {}: {}", config_path, e),
        }
    })?;

    if config_path.ends_with(".json") {
        serde_json::from_str(&config_content).map_err(|e| ConvertError::InvalidFormat {
            message: format!("Invalid JSON config: {}", e),
        })
    } else if config_path.ends_with(".toml") {
        toml::from_str(&config_content).map_err(|e| ConvertError::InvalidFormat {
            message: format!("Invalid TOML config: {}", e),
        })
    } else {
        Err(ConvertError::InvalidFormat {
            message: "Config file must be .json or .toml format".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_toml_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("psdui.toml");
        fs::write(
            &path,
            r#"
canvas_width = 1920
canvas_height = 1080
texture_suffix = "_Tex"

[widget_classes]
PSDTestAtlas = "Image"
"#,
        )
        .unwrap();

        let config = load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.canvas_width, Some(1920.0));
        assert_eq!(config.canvas_height, Some(1080.0));
        assert_eq!(config.texture_suffix.as_deref(), Some("_Tex"));
        assert_eq!(
            config.widget_classes.unwrap().get("PSDTestAtlas").map(String::as_str),
            Some("Image")
        );
        assert!(config.root_index.is_none());
    }

    #[test]
    fn test_load_rejects_other_extensions() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("psdui.ini");
        fs::write(&path, "canvas_width=1").unwrap();
        assert!(matches!(
            load(path.to_str().unwrap()),
            Err(ConvertError::InvalidFormat { .. })
        ));
    }
}
