//! Canvas-centred, parent-relative placement of tree nodes

use crate::hierarchy::PanelTree;
use crate::types::{NodeId, Rect};
use glam::Vec2;

/// Resolves node geometry against a fixed reference canvas.
///
/// Positions are the node centre relative to the canvas centre, minus the
/// parent's resolved position. Y grows downward as in the source document.
pub struct CoordinateResolver<'a> {
    tree: &'a PanelTree,
    canvas: Vec2,
}

impl<'a> CoordinateResolver<'a> {
    pub fn new(tree: &'a PanelTree, canvas: Vec2) -> Self {
        Self { tree, canvas }
    }

    pub fn canvas(&self) -> Vec2 {
        self.canvas
    }

    /// Bounds used for placement: the first control-info child's rect if the
    /// node has one, otherwise the node's own rect.
    pub fn effective_rect(&self, id: NodeId) -> Rect {
        match self.tree.first_control_info_child(id) {
            Some(info) => self.tree.node(info).rect,
            None => self.tree.node(id).rect,
        }
    }

    pub fn size(&self, id: NodeId) -> Vec2 {
        self.effective_rect(id).size()
    }

    pub fn position(&self, id: NodeId) -> Vec2 {
        let parent_offset = match self.tree.parent(id) {
            Some(parent) => self.position(parent),
            None => Vec2::ZERO,
        };

        self.canvas_centered(&self.effective_rect(id)) - parent_offset
    }

    /// Centre of `rect` in canvas-centred space, without parent adjustment
    pub fn canvas_centered(&self, rect: &Rect) -> Vec2 {
        let center = rect.top_left() + rect.size() / 2.0;
        center - self.canvas / 2.0
    }
}
