//! Widget plan generation: the host-facing description of the widgets to build
//!
//! Walks a `PanelTree` the way a UI generator consumes it: control-info and
//! structural layers are skipped, control types are mapped to widget classes
//! through a lookup table, and each widget carries its resolved placement.

use crate::coordinates::CoordinateResolver;
use crate::error::{ConvertError, Result};
use crate::hierarchy::{PanelNode, PanelTree};
use crate::types::*;
use crate::ConvertOptions;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Widget classes the host knows how to instantiate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WidgetClass {
    CanvasPanel,
    Image,
    TextBlock,
    Button,
    Slider,
    EditableTextBox,
    CheckBox,
}

impl WidgetClass {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "CanvasPanel" => Some(Self::CanvasPanel),
            "Image" => Some(Self::Image),
            "TextBlock" => Some(Self::TextBlock),
            "Button" => Some(Self::Button),
            "Slider" => Some(Self::Slider),
            "EditableTextBox" => Some(Self::EditableTextBox),
            "CheckBox" => Some(Self::CheckBox),
            _ => None,
        }
    }
}

impl fmt::Display for WidgetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Control type to widget class table, extendable with project types
#[derive(Debug, Clone, Default)]
pub struct WidgetClassMap {
    custom: HashMap<String, WidgetClass>,
}

impl WidgetClassMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `type name -> class name` pairs, e.g. from a config file
    pub fn from_names(names: &HashMap<String, String>) -> Result<Self> {
        let mut map = Self::new();
        for (type_name, class_name) in names {
            let class = WidgetClass::from_name(class_name).ok_or_else(|| {
                ConvertError::invalid_format(format!(
                    "Unknown widget class '{}' for control type '{}'",
                    class_name, type_name
                ))
            })?;
            map.insert(type_name.clone(), class);
        }
        Ok(map)
    }

    pub fn insert(&mut self, control_type: impl Into<String>, class: WidgetClass) {
        self.custom.insert(control_type.into(), class);
    }

    pub fn lookup(&self, control_type: &ControlType) -> Option<WidgetClass> {
        match control_type {
            ControlType::Panel => Some(WidgetClass::CanvasPanel),
            ControlType::Image | ControlType::Common => Some(WidgetClass::Image),
            ControlType::Text => Some(WidgetClass::TextBlock),
            ControlType::Button => Some(WidgetClass::Button),
            ControlType::Slider => Some(WidgetClass::Slider),
            ControlType::InputField => Some(WidgetClass::EditableTextBox),
            ControlType::Toggle => Some(WidgetClass::CheckBox),
            ControlType::Other(name) => self.custom.get(name).copied(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ButtonState {
    Normal,
    Hovered,
    Pressed,
    Disabled,
}

impl ButtonState {
    /// State named by a texture layer suffix such as `Play_Hovered`
    pub fn from_layer_name(name: &str) -> Option<Self> {
        if contains_ignore_case(name, "_Normal") {
            Some(Self::Normal)
        } else if contains_ignore_case(name, "_Hovered") {
            Some(Self::Hovered)
        } else if contains_ignore_case(name, "_Pressed") {
            Some(Self::Pressed)
        } else if contains_ignore_case(name, "_Disabled") {
            Some(Self::Disabled)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ButtonStateTexture {
    pub state: ButtonState,
    pub texture: String,
}

/// One widget the host should create
#[derive(Debug, Clone, Serialize)]
pub struct WidgetNode {
    pub name: String,
    pub control_type: ControlType,
    pub widget_class: WidgetClass,
    pub layer: LayerId,
    pub position: Vec2,
    pub size: Vec2,
    pub full_screen: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub auto_size: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub texture: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub button_states: Vec<ButtonStateTexture>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declared_size: Option<Vec2>,
    pub params: serde_json::Value,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<WidgetNode>,
}

impl WidgetNode {
    /// Number of widgets in this subtree, including `self`
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(WidgetNode::count).sum::<usize>()
    }
}

/// Root canvas plus everything under it
#[derive(Debug, Clone, Serialize)]
pub struct WidgetPlan {
    pub name: String,
    pub canvas: Vec2,
    pub widgets: Vec<WidgetNode>,
    /// Layers whose pixels should be exported as textures, document order
    pub texture_layers: Vec<String>,
    #[serde(skip)]
    pub skipped: usize,
}

impl WidgetPlan {
    pub fn widget_count(&self) -> usize {
        self.widgets.iter().map(WidgetNode::count).sum()
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ConvertError::serialization(format!("Widget plan: {}", e)))
    }
}

pub struct WidgetPlanner<'a> {
    tree: &'a PanelTree,
    resolver: CoordinateResolver<'a>,
    classes: &'a WidgetClassMap,
    texture_suffix: &'a str,
    skipped: usize,
}

impl<'a> WidgetPlanner<'a> {
    pub fn new(tree: &'a PanelTree, classes: &'a WidgetClassMap, options: &'a ConvertOptions) -> Self {
        Self {
            tree,
            resolver: CoordinateResolver::new(tree, options.resolve_canvas(None)),
            classes,
            texture_suffix: &options.texture_suffix,
            skipped: 0,
        }
    }

    /// Plan the document root at `root_index` (index into `tree.roots()`)
    pub fn plan(mut self, root_index: usize) -> Result<WidgetPlan> {
        let tree = self.tree;
        let root = *tree.roots().get(root_index).ok_or(ConvertError::NoRoot {
            index: root_index,
            root_count: tree.roots().len(),
        })?;

        let mut widgets = Vec::new();
        for child in tree.visible_children(root) {
            if let Some(widget) = self.plan_node(child) {
                widgets.push(widget);
            }
        }

        let texture_layers = tree
            .iter()
            .filter(|(_, node)| !node.is_control_info() && !node.is_font() && !node.is_section_divider())
            .map(|(_, node)| node.control_name.clone())
            .collect();

        Ok(WidgetPlan {
            name: tree.node(root).control_name.clone(),
            canvas: self.resolver.canvas(),
            widgets,
            texture_layers,
            skipped: self.skipped,
        })
    }

    fn should_skip(node: &PanelNode) -> bool {
        node.control_name.is_empty()
            || node.is_section_divider()
            || node.control_name.contains('@')
            || node.control_type.is_empty()
            || node.is_control_info()
    }

    fn plan_node(&mut self, id: NodeId) -> Option<WidgetNode> {
        let tree = self.tree;
        let node = tree.node(id);
        if Self::should_skip(node) {
            self.skipped += 1;
            return None;
        }

        let control_type = node.control().cloned().unwrap_or_else(|| ControlType::from_name(&node.control_type));
        let Some(widget_class) = self.classes.lookup(&control_type) else {
            log::warn!(
                "Could not find widget class for type '{}'. Skipping layer '{}'.",
                node.control_type,
                node.control_name
            );
            self.skipped += 1;
            return None;
        };

        let mut widget = WidgetNode {
            name: node.control_name.clone(),
            control_type,
            widget_class,
            layer: node.layer,
            position: self.resolver.position(id),
            size: self.resolver.size(id),
            full_screen: node.is_full_screen,
            auto_size: false,
            text: None,
            hint_text: None,
            texture: None,
            button_states: Vec::new(),
            declared_size: node.element.as_ref().and_then(|e| e.declared_size()),
            params: node
                .element
                .as_ref()
                .map(|e| e.params.value().clone())
                .unwrap_or_else(|| serde_json::json!({})),
            children: Vec::new(),
        };

        self.configure(&mut widget, id);
        Some(widget)
    }

    fn configure(&mut self, widget: &mut WidgetNode, id: NodeId) {
        let tree = self.tree;
        match widget.widget_class {
            WidgetClass::TextBlock => {
                widget.text = Some(widget.name.clone());
                widget.auto_size = true;
            }
            WidgetClass::EditableTextBox => {
                widget.hint_text = Some(widget.name.clone());
            }
            WidgetClass::Image => {
                widget.texture = Some(self.texture_name(&widget.name));
            }
            WidgetClass::Button => {
                for &child in tree.children(id) {
                    let child_node = tree.node(child);
                    if child_node.control() == Some(&ControlType::Text) {
                        if let Some(label) = self.plan_node(child) {
                            widget.children.push(label);
                        }
                        continue;
                    }
                    if let Some(state) = ButtonState::from_layer_name(&child_node.control_name) {
                        widget.button_states.push(ButtonStateTexture {
                            state,
                            texture: self.texture_name(&child_node.control_name),
                        });
                    }
                }
            }
            WidgetClass::CanvasPanel => {
                for child in tree.visible_children(id) {
                    if let Some(child_widget) = self.plan_node(child) {
                        widget.children.push(child_widget);
                    }
                }
            }
            WidgetClass::Slider | WidgetClass::CheckBox => {}
        }
    }

    fn texture_name(&self, layer_name: &str) -> String {
        format!("{}{}", layer_name, self.texture_suffix)
    }
}
