//! Render/interaction surface.
//!
//! Turns a [`ForestLayout`] into a [`Scene`]: node boxes with fill and
//! wrapped label, connector paths, the "create child" affordance and the
//! viewport. The scene is plain data; the host (or [`Scene::to_svg`]) draws
//! it. Scene coordinates put the depth axis horizontally and the breadth
//! axis vertically.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::forest::TaskId;
use crate::label::wrap_label;
use crate::layout::{ForestLayout, LaidOutNode, LayoutConfig, NodeIx, PointF, RectF};

mod curve;
mod drag;
mod svg;
mod view;
mod zoom;

pub use curve::Curve;
pub use drag::{DragSession, ReparentProposal};
pub use view::{DragFrame, MovedNode, TreeView};
pub use zoom::{ScaleExtent, ZoomTransform};

/// Fill used when a node has no color and the decorator does not pick one.
pub const DEFAULT_FILL: &str = "#6b7280";

/// Radius of the "create child" circle drawn at the node's right edge.
pub const AFFORDANCE_RADIUS: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Minimum outer width of the drawing.
    pub width: f64,
    pub node_width: f64,
    pub node_height: f64,
    /// Characters per label line.
    pub max_label_length: usize,
    pub max_label_lines: usize,
    pub font_size: f64,
    /// Link curve name, see [`Curve`].
    pub curve: String,
    pub zoom_min: f64,
    pub zoom_max: f64,
    pub layout: LayoutConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 200.0,
            node_width: 150.0,
            node_height: 50.0,
            max_label_length: 18,
            max_label_lines: 3,
            font_size: 14.0,
            curve: "bumpX".to_string(),
            zoom_min: 0.75,
            zoom_max: 5.0,
            layout: LayoutConfig::default(),
        }
    }
}

impl RenderConfig {
    pub fn scale_extent(&self) -> ScaleExtent {
        ScaleExtent { min: self.zoom_min, max: self.zoom_max }
    }
}

/// Per-node presentation hooks: label text, link targets and fill.
pub trait NodeDecorator {
    fn label(&self, node: &LaidOutNode) -> String {
        node.name.clone()
    }

    fn link(&self, _node: &LaidOutNode) -> Option<String> {
        None
    }

    fn create_child_link(&self, _node: &LaidOutNode) -> Option<String> {
        None
    }

    fn fill(&self, node: &LaidOutNode) -> String {
        node.color.clone().unwrap_or_else(|| DEFAULT_FILL.to_string())
    }
}

/// Name as label, node color as fill, no links.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainNodes;

impl NodeDecorator for PlainNodes {}

/// Link targets built from templates; `{id}` is replaced by the task id.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrlTemplates {
    pub link: Option<String>,
    pub create_child_link: Option<String>,
    /// Fill for nodes without a color.
    pub fallback_fill: Option<String>,
}

impl UrlTemplates {
    fn expand(template: &Option<String>, node: &LaidOutNode) -> Option<String> {
        template.as_ref().map(|t| t.replace("{id}", &node.id.to_string()))
    }
}

impl NodeDecorator for UrlTemplates {
    fn link(&self, node: &LaidOutNode) -> Option<String> {
        Self::expand(&self.link, node)
    }

    fn create_child_link(&self, node: &LaidOutNode) -> Option<String> {
        Self::expand(&self.create_child_link, node)
    }

    fn fill(&self, node: &LaidOutNode) -> String {
        node.color
            .clone()
            .or_else(|| self.fallback_fill.clone())
            .unwrap_or_else(|| DEFAULT_FILL.to_string())
    }
}

/// Scene position of a laid-out node: depth horizontally, breadth vertically.
pub fn scene_point(node: &LaidOutNode) -> PointF {
    PointF { x: node.y, y: node.x }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeShape {
    pub id: TaskId,
    pub index: NodeIx,
    pub center: PointF,
    /// Node box, centered on `center`.
    pub bounds: RectF,
    pub fill: String,
    pub label: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_child_href: Option<String>,
    /// Center of the "create child" affordance.
    pub affordance: PointF,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkShape {
    pub source: TaskId,
    pub target: TaskId,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub view_box: RectF,
    pub scale_extent: ScaleExtent,
    pub font_size: f64,
    pub curve: Curve,
    pub links: Vec<LinkShape>,
    pub nodes: Vec<NodeShape>,
}

impl Scene {
    /// Build the scene. The curve is validated first: an unsupported curve
    /// fails before anything is drawn.
    pub fn build(layout: &ForestLayout, cfg: &RenderConfig, deco: &dyn NodeDecorator) -> Result<Scene> {
        let curve: Curve = cfg.curve.parse()?;

        let nodes: Vec<NodeShape> = layout
            .indices()
            .map(|ix| {
                let node = layout.node(ix);
                let center = scene_point(node);
                NodeShape {
                    id: node.id.clone(),
                    index: ix,
                    center,
                    bounds: RectF::centered(center, cfg.node_width, cfg.node_height),
                    fill: deco.fill(node),
                    label: wrap_label(&deco.label(node), cfg.max_label_length, cfg.max_label_lines),
                    href: deco.link(node),
                    create_child_href: deco.create_child_link(node),
                    affordance: center.offset(cfg.node_width / 2.0, 0.0),
                }
            })
            .collect();

        let links = link_shapes(layout, curve, |ix| scene_point(layout.node(ix)));
        let view_box = view_box(layout, cfg);

        debug!(nodes = nodes.len(), links = links.len(), curve = %curve, "built scene");

        Ok(Scene {
            view_box,
            scale_extent: cfg.scale_extent(),
            font_size: cfg.font_size,
            curve,
            links,
            nodes,
        })
    }

    pub fn node(&self, id: &TaskId) -> Option<&NodeShape> {
        self.nodes.iter().find(|n| &n.id == id)
    }
}

/// One connector per parent/child pair, using `position` for endpoints.
pub fn link_shapes(
    layout: &ForestLayout,
    curve: Curve,
    position: impl Fn(NodeIx) -> PointF,
) -> Vec<LinkShape> {
    layout
        .links()
        .map(|(parent, child)| LinkShape {
            source: layout.node(parent).id.clone(),
            target: layout.node(child).id.clone(),
            path: curve.path(position(parent), position(child)),
        })
        .collect()
}

/// Viewport covering every node box and affordance. Its height is the
/// stacked forest height with margin, centered on the stack.
fn view_box(layout: &ForestLayout, cfg: &RenderConfig) -> RectF {
    let pad = AFFORDANCE_RADIUS;
    let content_w = layout.max_y + cfg.node_width + 2.0 * pad;
    let height = layout.viewport_height.max(cfg.node_height);
    RectF {
        x: -cfg.node_width / 2.0 - pad,
        y: -(height - layout.total_height) / 2.0,
        w: content_w.max(cfg.width),
        h: height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TreeError;
    use crate::forest::TreeNode;
    use crate::layout::layout_forest;

    fn sample() -> ForestLayout {
        let root = TreeNode::leaf(1, "Root").with_children(vec![TreeNode::leaf(2, "A rather long child task name")]);
        layout_forest(&[root, TreeNode::leaf(3, "Other")], &LayoutConfig::default())
    }

    #[test]
    fn test_scene_shapes() {
        let layout = sample();
        let scene = Scene::build(&layout, &RenderConfig::default(), &PlainNodes).unwrap();
        assert_eq!(scene.nodes.len(), 3);
        assert_eq!(scene.links.len(), 1);
        assert_eq!(scene.curve, Curve::BumpX);

        let child = scene.node(&TaskId::Int(2)).unwrap();
        assert_eq!(child.center.x, 200.0);
        assert_eq!(child.bounds.w, 150.0);
        assert_eq!(child.fill, DEFAULT_FILL);
        assert!(child.label.len() <= 3);
        assert_eq!(child.label[0], "A rather long");
    }

    #[test]
    fn test_view_box_covers_stack() {
        let layout = sample();
        let scene = Scene::build(&layout, &RenderConfig::default(), &PlainNodes).unwrap();
        assert!(scene.view_box.h >= layout.total_height);
        for node in &scene.nodes {
            assert!(node.center.y >= scene.view_box.y);
            assert!(node.center.y <= scene.view_box.bottom());
            assert!(node.bounds.right() <= scene.view_box.right());
        }
    }

    #[test]
    fn test_unsupported_curve_fails_before_drawing() {
        let cfg = RenderConfig { curve: "spline".into(), ..RenderConfig::default() };
        let err = Scene::build(&sample(), &cfg, &PlainNodes).unwrap_err();
        assert!(matches!(err, TreeError::UnsupportedCurve(_)));
    }

    #[test]
    fn test_url_templates() {
        let layout = sample();
        let deco = UrlTemplates {
            link: Some("/task/{id}".into()),
            create_child_link: Some("/task/new?parent={id}".into()),
            fallback_fill: Some("#000000".into()),
        };
        let scene = Scene::build(&layout, &RenderConfig::default(), &deco).unwrap();
        let root = scene.node(&TaskId::Int(1)).unwrap();
        assert_eq!(root.href.as_deref(), Some("/task/1"));
        assert_eq!(root.create_child_href.as_deref(), Some("/task/new?parent=1"));
        assert_eq!(root.fill, "#000000");
    }

    #[test]
    fn test_partial_config_json() {
        let cfg: RenderConfig = serde_json::from_str(r#"{"node_width": 120, "layout": {"separation": 1.5}}"#).unwrap();
        assert_eq!(cfg.node_width, 120.0);
        assert_eq!(cfg.node_height, 50.0);
        assert_eq!(cfg.layout.separation, 1.5);
        assert_eq!(cfg.layout.depth_spacing, 200.0);
    }
}
