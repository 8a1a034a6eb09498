//! Core types and constants for the PSD layer converter

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference canvas the design documents are authored against
pub const DEFAULT_CANVAS_WIDTH: f32 = 1100.0;
pub const DEFAULT_CANVAS_HEIGHT: f32 = 682.0;

/// Name marker for layers that carry override geometry for their parent
pub const CONTROL_INFO_MARKER: &str = "ControlInfo";

/// Name marker for font-specimen layers that are never exported as textures
pub const FONT_MARKER: &str = "Font";

/// Name PSD gives to the closing divider of a layer group
pub const SECTION_DIVIDER_NAME: &str = "</Layer group>";

pub const DEFAULT_TEXTURE_SUFFIX: &str = "_Texture";

pub fn default_canvas() -> Vec2 {
    Vec2::new(DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT)
}

/// Case-insensitive substring test used for all name markers
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Identity of a layer in the decoded document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(pub u32);

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Index of a node inside a `PanelTree` arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Axis-aligned layer bounds in source-canvas pixels.
///
/// Not validated: `right < left` or `bottom < top` yield negative sizes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self { left, top, right, bottom }
    }

    pub fn width(&self) -> i64 {
        i64::from(self.right) - i64::from(self.left)
    }

    pub fn height(&self) -> i64 {
        i64::from(self.bottom) - i64::from(self.top)
    }

    pub fn top_left(&self) -> Vec2 {
        Vec2::new(self.left as f32, self.top as f32)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width() as f32, self.height() as f32)
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.left, self.top, self.right, self.bottom)
    }
}

/// UI role declared in a layer name, resolved once at parse time
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ControlType {
    Panel,
    Image,
    Text,
    Button,
    Slider,
    InputField,
    Toggle,
    Common,
    Other(String),
}

impl ControlType {
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "panel" => Self::Panel,
            "image" | "texture" => Self::Image,
            "text" => Self::Text,
            "button" => Self::Button,
            "slider" => Self::Slider,
            "inputfield" | "editabletextbox" => Self::InputField,
            "toggle" => Self::Toggle,
            "common" => Self::Common,
            _ => Self::Other(name.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Panel => "Panel",
            Self::Image => "Image",
            Self::Text => "Text",
            Self::Button => "Button",
            Self::Slider => "Slider",
            Self::InputField => "InputField",
            Self::Toggle => "Toggle",
            Self::Common => "Common",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for ControlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for ControlType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}
