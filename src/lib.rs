//! PSD layer hierarchy to UI widget plan converter
//!
//! Turns the flat layer list of a decoded PSD document into a tree of typed
//! UI-element descriptors and a widget plan a host application can
//! instantiate.
//!
//! Layer names carry the UI annotation: `<name>@<type>` or
//! `<name>@<type>:<json-params>`, e.g. `Play@Button:{"fullscreen":false}`.
//! A child layer whose name contains `ControlInfo` overrides its parent's
//! bounds.
//!
//! # Basic Usage
//!
//! ```no_run
//! use psdui::{generate_plan_file, ConvertOptions, Result};
//!
//! fn main() -> Result<()> {
//!     generate_plan_file("menu.json", "menu.plan.json", &ConvertOptions::default())?;
//!     Ok(())
//! }
//! ```
//!
//! # Pipeline
//!
//! 1. **Manifest** - load the decoded layer list (JSON or TOML)
//! 2. **Hierarchy** - parse layer names and rebuild the parent/child tree
//! 3. **Coordinates** - resolve canvas-centred, parent-relative placement
//! 4. **Plan** - map control types to widget classes and emit the plan

pub mod types;
pub mod error;
pub mod element;
pub mod layer;
pub mod hierarchy;
pub mod coordinates;
pub mod plan;
pub mod manifest;
pub mod cli;

use glam::Vec2;
use serde::Serialize;
use std::collections::HashMap;

// Re-export commonly used types and functions
pub use error::{ConvertError, Result};
pub use types::*;
pub use element::{parse_element, ElementParams, UIElement};
pub use layer::LayerRecord;
pub use hierarchy::{HierarchyBuilder, PanelNode, PanelTree};
pub use coordinates::CoordinateResolver;
pub use plan::{WidgetClass, WidgetClassMap, WidgetNode, WidgetPlan, WidgetPlanner};
pub use manifest::{LayerManifest, ManifestFormat};
pub use cli::EnhancedCli;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Conversion options and settings
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Enable extra logging of each pipeline phase
    pub debug_mode: bool,

    /// Reference canvas used when nothing more specific is given
    pub canvas: Vec2,

    /// Canvas requested explicitly, beats the manifest's own canvas
    pub canvas_override: Option<Vec2>,

    /// Which document root becomes the plan (index into the root list)
    pub root_index: usize,

    /// Appended to a layer name to form its texture asset name
    pub texture_suffix: String,

    /// Project control types mapped to widget class names
    pub widget_classes: HashMap<String, String>,
}

impl ConvertOptions {
    /// Explicit override, then the manifest canvas, then the configured one
    pub fn resolve_canvas(&self, manifest_canvas: Option<manifest::CanvasSize>) -> Vec2 {
        self.canvas_override
            .or_else(|| manifest_canvas.map(Vec2::from))
            .unwrap_or(self.canvas)
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            debug_mode: false,
            canvas: default_canvas(),
            canvas_override: None,
            root_index: 0,
            texture_suffix: DEFAULT_TEXTURE_SUFFIX.to_string(),
            widget_classes: HashMap::new(),
        }
    }
}

/// Conversion statistics
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationStats {
    /// Number of layers in the input
    pub layer_count: usize,

    /// Number of parent-less layers
    pub root_count: usize,

    /// Layers whose name parsed as a UI element
    pub parsed_count: usize,

    /// Layers whose name did not parse
    pub unparsed_count: usize,

    /// Control-info override layers
    pub control_info_count: usize,

    /// Widgets in the generated plan
    pub widget_count: usize,

    /// Nodes the planner skipped
    pub skipped_count: usize,

    /// Layers listed for texture export
    pub texture_count: usize,

    /// Plan size in bytes when written to disk
    pub output_size: u64,

    /// Generation time in milliseconds
    pub generate_time_ms: u64,
}

impl GenerationStats {
    fn from_tree(tree: &PanelTree) -> Self {
        let parsed_count = tree.iter().filter(|(_, node)| node.element.is_some()).count();
        Self {
            layer_count: tree.len(),
            root_count: tree.roots().len(),
            parsed_count,
            unparsed_count: tree.len() - parsed_count,
            control_info_count: tree.iter().filter(|(_, node)| node.is_control_info()).count(),
            ..Default::default()
        }
    }
}

/// Build the hierarchy of `layers` and plan the selected root
pub fn generate_plan(layers: &[LayerRecord], options: &ConvertOptions) -> Result<(WidgetPlan, GenerationStats)> {
    let start_time = std::time::Instant::now();

    if options.debug_mode {
        log::debug!("Building hierarchy from {} layers", layers.len());
    }

    let tree = HierarchyBuilder::new().build(layers)?;
    let mut stats = GenerationStats::from_tree(&tree);

    if options.debug_mode {
        log::debug!(
            "Hierarchy built. Roots: {}, parsed: {}, unparsed: {}",
            stats.root_count, stats.parsed_count, stats.unparsed_count
        );
    }

    let classes = WidgetClassMap::from_names(&options.widget_classes)?;
    let plan = WidgetPlanner::new(&tree, &classes, options).plan(options.root_index)?;

    stats.widget_count = plan.widget_count();
    stats.skipped_count = plan.skipped;
    stats.texture_count = plan.texture_layers.len();
    stats.generate_time_ms = start_time.elapsed().as_millis() as u64;

    if options.debug_mode {
        log::debug!("Plan '{}' has {} widgets ({} skipped)", plan.name, stats.widget_count, stats.skipped_count);
    }

    Ok((plan, stats))
}

/// Load a manifest, generate its plan and write it as JSON
pub fn generate_plan_file(input_path: &str, output_path: &str, options: &ConvertOptions) -> Result<GenerationStats> {
    if options.debug_mode {
        log::info!("{} v{}", NAME, VERSION);
        log::info!("Generating '{}' from '{}'...", output_path, input_path);
        log::debug!("Options: {:?}", options);
    }

    let manifest = LayerManifest::load(input_path)?;

    let mut options = options.clone();
    options.canvas = options.resolve_canvas(manifest.canvas);

    let (plan, mut stats) = generate_plan(&manifest.layers, &options)?;
    let json = plan.to_json()?;
    std::fs::write(output_path, &json)?;
    stats.output_size = json.len() as u64;

    if options.debug_mode {
        log::info!("Generation successful!");
        log::info!("Widgets: {}, textures: {}", stats.widget_count, stats.texture_count);
        log::info!("Output size: {} bytes", stats.output_size);
    }

    Ok(stats)
}
