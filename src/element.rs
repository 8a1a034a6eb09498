//! Layer-name descriptors: `<name>@<type>` and `<name>@<type>:<json-params>`

use crate::types::ControlType;
use glam::Vec2;
use serde::Serialize;
use serde_json::{Map, Value};

/// Free-form parameters attached to a layer name.
///
/// Usually an object, but any JSON value is accepted by the grammar.
/// Accessors return `None` for missing keys and wrong-typed values alike.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ElementParams(Value);

impl Default for ElementParams {
    fn default() -> Self {
        Self(Value::Object(Map::new()))
    }
}

impl ElementParams {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.as_object().and_then(|map| map.get(key))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_f64)
    }

    /// A two-element numeric array such as `"size": [200, 100]`
    pub fn get_size(&self, key: &str) -> Option<Vec2> {
        match self.get(key)?.as_array()?.as_slice() {
            [w, h] => Some(Vec2::new(w.as_f64()? as f32, h.as_f64()? as f32)),
            _ => None,
        }
    }

    /// Number of keys, 0 for non-object params
    pub fn len(&self) -> usize {
        self.0.as_object().map_or(0, Map::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Structured descriptor parsed from a layer name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UIElement {
    pub name: String,
    #[serde(rename = "type")]
    pub element_type: String,
    #[serde(skip)]
    pub control_type: ControlType,
    pub params: ElementParams,
}

impl UIElement {
    pub fn is_full_screen(&self) -> bool {
        self.params.get_bool("fullscreen").unwrap_or(false)
    }

    pub fn declared_size(&self) -> Option<Vec2> {
        self.params.get_size("size")
    }
}

/// Parse a layer name into a `UIElement`.
///
/// Returns `None` when the name has no `@`, when a `:` directly follows the
/// `@` (empty type), or when the parameter text is not valid JSON.
pub fn parse_element(raw_name: &str) -> Option<UIElement> {
    let (name, rest) = raw_name.split_once('@')?;

    let (element_type, params) = match rest.split_once(':') {
        None => (rest, ElementParams::default()),
        Some(("", _)) => {
            log::debug!("'{}': type is empty before ':'", raw_name);
            return None;
        }
        Some((element_type, "")) => (element_type, ElementParams::default()),
        Some((element_type, json)) => match serde_json::from_str::<Value>(json) {
            Ok(value) => (element_type, ElementParams::new(value)),
            Err(e) => {
                log::debug!("'{}': invalid parameters: {}", raw_name, e);
                return None;
            }
        },
    };

    Some(UIElement {
        name: name.to_string(),
        element_type: element_type.to_string(),
        control_type: ControlType::from_name(element_type),
        params,
    })
}
