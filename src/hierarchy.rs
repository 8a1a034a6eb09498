//! Rebuild the layer tree from the flat, parent-referencing layer list

use crate::element::{parse_element, UIElement};
use crate::error::{ConvertError, Result};
use crate::layer::LayerRecord;
use crate::types::*;
use std::collections::HashMap;
use std::fmt::Write;

/// One node of the reconstructed UI tree
#[derive(Debug, Clone)]
pub struct PanelNode {
    pub layer: LayerId,
    pub rect: Rect,
    pub control_name: String,
    pub control_type: String,
    pub element: Option<UIElement>,
    pub is_full_screen: bool,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl PanelNode {
    fn from_layer(layer: &LayerRecord) -> Self {
        let display_name = layer.display_name();
        let mut node = Self {
            layer: layer.id,
            rect: layer.rect,
            control_name: display_name.to_string(),
            control_type: String::new(),
            element: None,
            is_full_screen: false,
            parent: None,
            children: Vec::new(),
        };

        match parse_element(&display_name) {
            Some(element) => {
                node.control_name = element.name.clone();
                node.control_type = element.element_type.clone();
                if element.params.contains_key("fullscreen") && element.params.get_bool("fullscreen").is_none() {
                    log::warn!("Layer '{}': 'fullscreen' is not a boolean, ignoring it", display_name);
                }
                node.is_full_screen = element.is_full_screen();
                node.element = Some(element);
            }
            None => {
                log::warn!("Failed to parse UI element from layer name: {}", display_name);
            }
        }

        node
    }

    pub fn is_control_info(&self) -> bool {
        contains_ignore_case(&self.control_name, CONTROL_INFO_MARKER)
    }

    pub fn is_font(&self) -> bool {
        contains_ignore_case(&self.control_name, FONT_MARKER)
    }

    pub fn is_section_divider(&self) -> bool {
        self.control_name == SECTION_DIVIDER_NAME
    }

    pub fn control(&self) -> Option<&ControlType> {
        self.element.as_ref().map(|e| &e.control_type)
    }
}

/// Arena holding every node of one document
#[derive(Debug, Clone, Default)]
pub struct PanelTree {
    nodes: Vec<PanelNode>,
    roots: Vec<NodeId>,
    by_layer: HashMap<LayerId, NodeId>,
}

impl PanelTree {
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn node(&self, id: NodeId) -> &PanelNode {
        &self.nodes[id.0]
    }

    pub fn get(&self, id: NodeId) -> Option<&PanelNode> {
        self.nodes.get(id.0)
    }

    pub fn node_for_layer(&self, layer: LayerId) -> Option<NodeId> {
        self.by_layer.get(&layer).copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in input (document) order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &PanelNode)> {
        self.nodes.iter().enumerate().map(|(i, node)| (NodeId(i), node))
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// Children that consumers should materialise, i.e. not control-info nodes
    pub fn visible_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(move |&child| !self.node(child).is_control_info())
    }

    pub fn first_control_info_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|&child| self.node(child).is_control_info())
    }

    pub fn control_info_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|&child| self.node(child).is_control_info())
            .collect()
    }

    pub fn first_child_of_type(&self, id: NodeId, control_type: &str) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|&child| self.node(child).control_type.eq_ignore_ascii_case(control_type))
    }

    pub fn children_of_type(&self, id: NodeId, control_type: &str) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|&child| self.node(child).control_type.eq_ignore_ascii_case(control_type))
            .collect()
    }

    /// Number of ancestors above `id`
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.parent(id);
        while let Some(parent) = current {
            depth += 1;
            current = self.parent(parent);
        }
        depth
    }

    /// Pre-order walk of the subtree rooted at `id`
    pub fn traverse<F>(&self, id: NodeId, visitor: &mut F)
    where
        F: FnMut(NodeId, usize),
    {
        self.traverse_at(id, 0, visitor);
    }

    fn traverse_at<F>(&self, id: NodeId, depth: usize, visitor: &mut F)
    where
        F: FnMut(NodeId, usize),
    {
        visitor(id, depth);
        for &child in self.children(id) {
            self.traverse_at(child, depth + 1, visitor);
        }
    }

    /// Indented outline of every root, one node per line
    pub fn outline(&self) -> String {
        let mut out = String::new();
        for &root in &self.roots {
            self.traverse(root, &mut |id, depth| {
                let _ = writeln!(out, "{}- {}", "  ".repeat(depth), self.node(id).control_name);
            });
        }
        out
    }
}

/// Two-pass builder: allocate every node, then link parents and children
pub struct HierarchyBuilder;

impl HierarchyBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build(&self, layers: &[LayerRecord]) -> Result<PanelTree> {
        let mut tree = PanelTree {
            nodes: Vec::with_capacity(layers.len()),
            roots: Vec::new(),
            by_layer: HashMap::with_capacity(layers.len()),
        };

        // Pass 1: one node per layer
        for layer in layers {
            let id = NodeId(tree.nodes.len());
            if tree.by_layer.insert(layer.id, id).is_some() {
                return Err(ConvertError::DuplicateLayer { layer: layer.id });
            }
            tree.nodes.push(PanelNode::from_layer(layer));
        }

        // Pass 2: link
        for (index, layer) in layers.iter().enumerate() {
            let id = NodeId(index);
            match layer.parent {
                None => tree.roots.push(id),
                Some(parent_layer) => {
                    let parent = tree.node_for_layer(parent_layer).ok_or(ConvertError::MissingParent {
                        layer: layer.id,
                        parent: parent_layer,
                    })?;
                    tree.nodes[index].parent = Some(parent);
                    tree.nodes[parent.0].children.push(id);
                }
            }
        }

        self.check_acyclic(&tree)?;

        log::debug!("--- Reconstructed layer hierarchy ---\n{}", tree.outline());

        Ok(tree)
    }

    fn check_acyclic(&self, tree: &PanelTree) -> Result<()> {
        for (id, node) in tree.iter() {
            let mut steps = 0;
            let mut current = node.parent;
            while let Some(parent) = current {
                steps += 1;
                if parent == id || steps > tree.len() {
                    return Err(ConvertError::ParentCycle { layer: node.layer });
                }
                current = tree.parent(parent);
            }
        }
        Ok(())
    }
}

impl Default for HierarchyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_layers() -> Vec<LayerRecord> {
        vec![
            LayerRecord::new(10, r#"Main@Panel:{"fullscreen":true}"#, Rect::new(0, 0, 1100, 682)),
            LayerRecord::new(11, "Start@Button", Rect::new(100, 100, 300, 160)).with_parent(10),
            LayerRecord::new(12, "ControlInfo", Rect::new(110, 110, 290, 150)).with_parent(11),
            LayerRecord::new(13, "Label@Text", Rect::new(120, 120, 280, 140)).with_parent(11),
            LayerRecord::new(14, "Overlay", Rect::new(0, 0, 10, 10)),
            LayerRecord::new(15, "Quit@Button", Rect::new(100, 200, 300, 260)).with_parent(10),
        ]
    }

    #[test]
    fn test_build_links_in_input_order() {
        let tree = HierarchyBuilder::new().build(&sample_layers()).unwrap();

        assert_eq!(tree.len(), 6);
        let roots: Vec<LayerId> = tree.roots().iter().map(|&r| tree.node(r).layer).collect();
        assert_eq!(roots, [LayerId(10), LayerId(14)]);

        let main = tree.node_for_layer(LayerId(10)).unwrap();
        let children: Vec<&str> = tree
            .children(main)
            .iter()
            .map(|&c| tree.node(c).control_name.as_str())
            .collect();
        assert_eq!(children, ["Start", "Quit"]);

        let start = tree.node_for_layer(LayerId(11)).unwrap();
        assert_eq!(tree.parent(start), Some(main));
        assert_eq!(tree.children(start).len(), 2);
        assert_eq!(tree.depth(start), 1);
        assert_eq!(tree.depth(tree.children(start)[1]), 2);
    }

    #[test]
    fn test_build_fills_element_fields() {
        let tree = HierarchyBuilder::new().build(&sample_layers()).unwrap();

        let main = tree.node(tree.node_for_layer(LayerId(10)).unwrap());
        assert_eq!(main.control_name, "Main");
        assert_eq!(main.control_type, "Panel");
        assert!(main.is_full_screen);
        assert_eq!(main.control(), Some(&ControlType::Panel));

        let overlay = tree.node(tree.node_for_layer(LayerId(14)).unwrap());
        assert_eq!(overlay.control_name, "Overlay");
        assert_eq!(overlay.control_type, "");
        assert!(overlay.element.is_none());
        assert!(!overlay.is_full_screen);
    }

    #[test]
    fn test_fullscreen_wrong_type_is_absent() {
        let layers = vec![LayerRecord::new(0, r#"P@Panel:{"fullscreen":1}"#, Rect::default())];
        let tree = HierarchyBuilder::new().build(&layers).unwrap();
        assert!(!tree.node(tree.roots()[0]).is_full_screen);
    }

    #[test]
    fn test_unparsed_name_kept_verbatim() {
        let layers = vec![LayerRecord::new(0, "Broken@:{}", Rect::new(1, 2, 3, 4))];
        let tree = HierarchyBuilder::new().build(&layers).unwrap();
        let node = tree.node(tree.roots()[0]);
        assert_eq!(node.control_name, "Broken@:{}");
        assert!(node.control_type.is_empty());
        assert_eq!(node.rect, Rect::new(1, 2, 3, 4));
    }

    #[test]
    fn test_markers_are_built_normally() {
        let tree = HierarchyBuilder::new().build(&sample_layers()).unwrap();
        let start = tree.node_for_layer(LayerId(11)).unwrap();
        let info = tree.node_for_layer(LayerId(12)).unwrap();

        assert!(tree.node(info).is_control_info());
        assert_eq!(tree.first_control_info_child(start), Some(info));
        assert_eq!(tree.control_info_children(start), vec![info]);
        let visible: Vec<NodeId> = tree.visible_children(start).collect();
        assert_eq!(visible, vec![tree.node_for_layer(LayerId(13)).unwrap()]);
    }

    #[test]
    fn test_children_of_type() {
        let tree = HierarchyBuilder::new().build(&sample_layers()).unwrap();
        let main = tree.node_for_layer(LayerId(10)).unwrap();
        assert_eq!(tree.children_of_type(main, "button").len(), 2);
        assert_eq!(
            tree.first_child_of_type(main, "BUTTON"),
            tree.node_for_layer(LayerId(11))
        );
        assert!(tree.first_child_of_type(main, "Slider").is_none());
    }

    #[test]
    fn test_missing_parent_is_structural_error() {
        let layers = vec![
            LayerRecord::new(0, "A@Panel", Rect::default()),
            LayerRecord::new(1, "B@Text", Rect::default()).with_parent(7),
        ];
        match HierarchyBuilder::new().build(&layers) {
            Err(ConvertError::MissingParent { layer, parent }) => {
                assert_eq!(layer, LayerId(1));
                assert_eq!(parent, LayerId(7));
            }
            other => panic!("Expected MissingParent, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_and_cycle_rejected() {
        let duplicate = vec![
            LayerRecord::new(0, "A@Panel", Rect::default()),
            LayerRecord::new(0, "B@Panel", Rect::default()),
        ];
        assert!(matches!(
            HierarchyBuilder::new().build(&duplicate),
            Err(ConvertError::DuplicateLayer { .. })
        ));

        let cycle = vec![
            LayerRecord::new(0, "A@Panel", Rect::default()).with_parent(1),
            LayerRecord::new(1, "B@Panel", Rect::default()).with_parent(0),
        ];
        assert!(matches!(
            HierarchyBuilder::new().build(&cycle),
            Err(ConvertError::ParentCycle { .. })
        ));
    }

    #[test]
    fn test_child_before_parent_in_input() {
        let layers = vec![
            LayerRecord::new(1, "Child@Text", Rect::default()).with_parent(0),
            LayerRecord::new(0, "Parent@Panel", Rect::default()),
        ];
        let tree = HierarchyBuilder::new().build(&layers).unwrap();
        assert_eq!(tree.roots().len(), 1);
        assert_eq!(tree.children(tree.roots()[0]).len(), 1);
    }

    #[test]
    fn test_outline() {
        let tree = HierarchyBuilder::new().build(&sample_layers()).unwrap();
        let outline = tree.outline();
        assert!(outline.starts_with("- Main\n  - Start\n    - ControlInfo\n"));
        assert!(outline.ends_with("- Overlay\n"));
    }

    #[test]
    fn test_empty_input() {
        let tree = HierarchyBuilder::new().build(&[]).unwrap();
        assert!(tree.is_empty());
        assert!(tree.roots().is_empty());
    }
}
