//! Decoded layer records handed over by the PSD reader

use crate::types::{LayerId, Rect};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// One entry of the decoded document's flat layer list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerRecord {
    pub id: LayerId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<LayerId>,
    /// Legacy Pascal-string name
    #[serde(default)]
    pub name: String,
    /// UTF-16 name from the `luni` block, when the document has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unicode_name: Option<Vec<u16>>,
    #[serde(flatten)]
    pub rect: Rect,
}

impl LayerRecord {
    pub fn new(id: u32, name: impl Into<String>, rect: Rect) -> Self {
        Self {
            id: LayerId(id),
            parent: None,
            name: name.into(),
            unicode_name: None,
            rect,
        }
    }

    pub fn with_parent(mut self, parent: u32) -> Self {
        self.parent = Some(LayerId(parent));
        self
    }

    pub fn with_unicode_name(mut self, name: &str) -> Self {
        self.unicode_name = Some(name.encode_utf16().collect());
        self
    }

    /// The name used for parsing: the UTF-16 name when present and valid,
    /// otherwise the legacy name.
    pub fn display_name(&self) -> Cow<'_, str> {
        let Some(units) = &self.unicode_name else {
            return Cow::Borrowed(&self.name);
        };

        let end = units.iter().rposition(|&u| u != 0).map_or(0, |i| i + 1);
        match String::from_utf16(&units[..end]) {
            Ok(name) => Cow::Owned(name),
            Err(e) => {
                log::warn!(
                    "Layer {}: invalid UTF-16 name ({}), using legacy name '{}'",
                    self.id,
                    e,
                    self.name
                );
                Cow::Borrowed(&self.name)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_prefers_unicode() {
        let layer = LayerRecord::new(0, "Start?@Button", Rect::default()).with_unicode_name("Start€@Button");
        assert_eq!(layer.display_name(), "Start€@Button");

        let plain = LayerRecord::new(1, "Title@Text", Rect::default());
        assert_eq!(plain.display_name(), "Title@Text");
    }

    #[test]
    fn test_display_name_trims_nul_and_falls_back() {
        let mut layer = LayerRecord::new(0, "legacy", Rect::default());
        layer.unicode_name = Some(vec![0x48, 0x69, 0, 0]);
        assert_eq!(layer.display_name(), "Hi");

        // Lone high surrogate
        layer.unicode_name = Some(vec![0xD800, 0x41]);
        assert_eq!(layer.display_name(), "legacy");
    }

    #[test]
    fn test_deserialize_flattened_rect() {
        let json = r#"{"id": 4, "parent": 1, "name": "Bg@Image", "left": 1, "top": 2, "right": 3, "bottom": 4}"#;
        let layer: LayerRecord = serde_json::from_str(json).unwrap();
        assert_eq!(layer.id, LayerId(4));
        assert_eq!(layer.parent, Some(LayerId(1)));
        assert_eq!(layer.rect, Rect::new(1, 2, 3, 4));
        assert!(layer.unicode_name.is_none());
    }
}
