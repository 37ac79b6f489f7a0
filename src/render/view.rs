//! Stateful view: one rendered forest plus its zoom transform and drag
//! session. Pointer input arrives in screen coordinates and is mapped into
//! scene coordinates through the current transform.

use serde::Serialize;
use tracing::trace;

use super::{
    link_shapes, Curve, DragSession, LinkShape, NodeDecorator, RenderConfig, ReparentProposal,
    ScaleExtent, Scene, ZoomTransform,
};
use crate::error::Result;
use crate::forest::{TaskId, TreeNode};
use crate::layout::{layout_forest, ForestLayout, PointF};

/// A node displaced by an active drag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovedNode {
    pub id: TaskId,
    pub center: PointF,
}

/// What the host needs to redraw after a pointer move.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DragFrame {
    pub nodes: Vec<MovedNode>,
    pub links: Vec<LinkShape>,
    /// Back to front; the dragged node is last.
    pub draw_order: Vec<TaskId>,
}

#[derive(Debug, Clone)]
pub struct TreeView {
    layout: ForestLayout,
    scene: Scene,
    curve: Curve,
    extent: ScaleExtent,
    zoom: ZoomTransform,
    drag: DragSession,
}

impl TreeView {
    pub fn new(roots: &[TreeNode], cfg: &RenderConfig, deco: &dyn NodeDecorator) -> Result<Self> {
        let curve: Curve = cfg.curve.parse()?;
        let layout = layout_forest(roots, &cfg.layout);
        let scene = Scene::build(&layout, cfg, deco)?;
        let drag = DragSession::new(&layout, cfg.node_width, cfg.node_height);
        Ok(Self {
            layout,
            scene,
            curve,
            extent: cfg.scale_extent(),
            zoom: ZoomTransform::IDENTITY,
            drag,
        })
    }

    pub fn layout(&self) -> &ForestLayout {
        &self.layout
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn transform(&self) -> ZoomTransform {
        self.zoom
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// Nodes are drawn in [`TreeView::draw_order`].
    pub fn to_svg(&self) -> String {
        self.scene.to_svg_ordered(&self.zoom, self.drag.draw_order())
    }

    /// Task ids back to front. A node stays raised after its drag ends.
    pub fn draw_order(&self) -> Vec<TaskId> {
        self.drag
            .draw_order()
            .iter()
            .map(|&ix| self.layout.node(ix).id.clone())
            .collect()
    }

    pub fn zoom_by(&mut self, factor: f64, anchor: PointF) -> ZoomTransform {
        self.zoom.scale_by(factor, anchor, self.extent);
        self.zoom
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) -> ZoomTransform {
        self.zoom.translate_by(dx, dy);
        self.zoom
    }

    /// Start dragging the node carrying `id`. False if unknown or a drag is
    /// already running.
    pub fn pointer_down(&mut self, id: &TaskId, screen: PointF) -> bool {
        let Some(ix) = self.layout.find(id) else {
            trace!(task = %id, "pointer down on unknown task");
            return false;
        };
        let pointer = self.zoom.invert(screen);
        self.drag.start(&self.layout, ix, pointer)
    }

    /// Same as [`TreeView::pointer_down`], keyed by the id's string form.
    pub fn pointer_down_key(&mut self, key: &str, screen: PointF) -> bool {
        match self.layout.find_by_key(key) {
            Some(ix) => {
                let id = self.layout.node(ix).id.clone();
                self.pointer_down(&id, screen)
            }
            None => false,
        }
    }

    pub fn pointer_move(&mut self, screen: PointF) -> Option<DragFrame> {
        if !self.drag.is_dragging() {
            return None;
        }
        let pointer = self.zoom.invert(screen);
        let moved = self.drag.drag_to(&self.layout, pointer);
        let nodes = moved
            .into_iter()
            .map(|ix| MovedNode {
                id: self.layout.node(ix).id.clone(),
                center: self.drag.position(&self.layout, ix),
            })
            .collect();
        let links = link_shapes(&self.layout, self.curve, |ix| self.drag.position(&self.layout, ix));
        Some(DragFrame { nodes, links, draw_order: self.draw_order() })
    }

    pub fn pointer_up(&mut self) -> Option<ReparentProposal> {
        self.drag.end(&self.layout)
    }

    pub fn pointer_cancel(&mut self) {
        self.drag.cancel();
    }
}
