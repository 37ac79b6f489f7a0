// Drag-to-reparent gesture.
//
// States: Idle -> Dragging -> Idle.
//
// - start: remember the pointer as anchor, raise the node in draw order
// - drag_to: displacement = pointer - anchor, applied rigidly to the node
//   and its whole subtree through a side table of offsets
// - end: box-overlap test of the dragged node against every other node in
//   draw order; first hit is the proposed new parent. Offsets are dropped
//   and every node is back at its layout position.
//
// Ancestors and descendants of the dragged node are tested like any other
// node. A descendant hit is flagged on the proposal, not filtered out.
//
// All coordinates are scene coordinates (before the zoom transform).

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, trace};

use super::scene_point;
use crate::forest::TaskId;
use crate::layout::{ForestLayout, NodeIx, PointF, RectF};

/// Re-parent signal surfaced at the end of a drag.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReparentProposal {
    /// The dragged task.
    pub task: TaskId,
    /// The task whose box the dragged node was dropped on.
    pub new_parent: TaskId,
    /// Accepting this would put the task under its own subtree.
    pub is_descendant: bool,
}

#[derive(Debug, Clone, PartialEq)]
enum DragState {
    Idle,
    Dragging { node: NodeIx, anchor: PointF },
}

#[derive(Debug, Clone)]
pub struct DragSession {
    state: DragState,
    /// Transient per-node displacement, only populated while dragging.
    offsets: HashMap<NodeIx, PointF>,
    draw_order: Vec<NodeIx>,
    node_width: f64,
    node_height: f64,
}

impl DragSession {
    pub fn new(layout: &ForestLayout, node_width: f64, node_height: f64) -> Self {
        Self {
            state: DragState::Idle,
            offsets: HashMap::new(),
            draw_order: layout.indices().collect(),
            node_width,
            node_height,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn dragged(&self) -> Option<NodeIx> {
        match self.state {
            DragState::Dragging { node, .. } => Some(node),
            DragState::Idle => None,
        }
    }

    /// Back to front.
    pub fn draw_order(&self) -> &[NodeIx] {
        &self.draw_order
    }

    /// Begin dragging `node` with the pointer at `pointer`. Rejected while
    /// another drag is active or when `node` is not in the layout.
    pub fn start(&mut self, layout: &ForestLayout, node: NodeIx, pointer: PointF) -> bool {
        if self.is_dragging() || layout.get(node).is_none() {
            return false;
        }
        if let Some(pos) = self.draw_order.iter().position(|&n| n == node) {
            let raised = self.draw_order.remove(pos);
            self.draw_order.push(raised);
        }
        self.offsets.clear();
        self.state = DragState::Dragging { node, anchor: pointer };
        trace!(node = node.0, x = pointer.x, y = pointer.y, "drag started");
        true
    }

    /// Move the dragged subtree so that it follows the pointer. Returns the
    /// nodes that moved; empty when idle.
    pub fn drag_to(&mut self, layout: &ForestLayout, pointer: PointF) -> Vec<NodeIx> {
        let DragState::Dragging { node, anchor } = self.state else {
            return Vec::new();
        };
        let delta = PointF::new(pointer.x - anchor.x, pointer.y - anchor.y);
        let moved = layout.subtree(node);
        for &ix in &moved {
            self.offsets.insert(ix, delta);
        }
        moved
    }

    /// Current scene position of a node, drag offset included.
    pub fn position(&self, layout: &ForestLayout, ix: NodeIx) -> PointF {
        let base = scene_point(layout.node(ix));
        match self.offsets.get(&ix) {
            Some(d) => base.offset(d.x, d.y),
            None => base,
        }
    }

    pub fn bounds(&self, layout: &ForestLayout, ix: NodeIx) -> RectF {
        RectF::centered(self.position(layout, ix), self.node_width, self.node_height)
    }

    /// Finish the gesture and report the first node the dragged box
    /// overlaps, if any. Positions always revert.
    pub fn end(&mut self, layout: &ForestLayout) -> Option<ReparentProposal> {
        let DragState::Dragging { node, .. } = self.state else {
            return None;
        };

        let dragged = self.bounds(layout, node);
        let candidate = self
            .draw_order
            .iter()
            .copied()
            .filter(|&ix| ix != node)
            .find(|&ix| dragged.overlaps(&self.bounds(layout, ix)));

        self.offsets.clear();
        self.state = DragState::Idle;

        let candidate = candidate?;
        let proposal = ReparentProposal {
            task: layout.node(node).id.clone(),
            new_parent: layout.node(candidate).id.clone(),
            is_descendant: layout.is_descendant(candidate, node),
        };
        debug!(
            task = %proposal.task,
            new_parent = %proposal.new_parent,
            is_descendant = proposal.is_descendant,
            "re-parent candidate"
        );
        Some(proposal)
    }

    /// Abort without an overlap test.
    pub fn cancel(&mut self) {
        self.offsets.clear();
        self.state = DragState::Idle;
    }
}
