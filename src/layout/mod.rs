// Task tree layouter.
//
// Goals:
// - Deterministic: no randomness, no hash-order dependence
// - Tidy: siblings never overlap, parents centered over their children
// - Depth is a pure function of the tree: y = depth * depth_spacing
// - Forests: trees stacked along the breadth axis, one band per tree,
//   bands never overlap
//
// Submodules:
// - tidy: unit-space Buchheim/Walker placement of one tree
// - stack: folding laid-out trees into one coordinate space
//
// Output:
// - ForestLayout: every node in pre-order (tree by tree) with parent/child
//   indices, one band per tree, total and viewport heights.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::forest::{TaskId, TreeNode};

mod stack;
mod tidy;

pub use stack::TreeBand;

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointF {
    pub x: f64,
    pub y: f64,
}

impl PointF {
    pub const ORIGIN: PointF = PointF { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self { x: self.x + dx, y: self.y + dy }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectF {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl RectF {
    pub fn centered(center: PointF, w: f64, h: f64) -> Self {
        Self { x: center.x - w / 2.0, y: center.y - h / 2.0, w, h }
    }

    pub fn right(&self) -> f64 { self.x + self.w }
    pub fn bottom(&self) -> f64 { self.y + self.h }

    /// Strict overlap: rectangles that only share an edge do not overlap.
    pub fn overlaps(&self, other: &RectF) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

/// Index of a node inside a [`ForestLayout`] (pre-order, tree by tree).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeIx(pub usize);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Distance between consecutive depths.
    pub depth_spacing: f64,
    /// Minimum distance between adjacent sibling centers.
    pub breadth_spacing: f64,
    /// Gap multiplier for adjacent nodes at one depth with different parents.
    pub separation: f64,
    /// Viewport height = stacked height * margin.
    pub viewport_margin: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            depth_spacing: 200.0,
            breadth_spacing: 60.0,
            separation: 2.0,
            viewport_margin: 1.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaidOutNode {
    pub id: TaskId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Value>,
    /// Root = 0.
    pub depth: usize,
    /// Breadth axis.
    pub x: f64,
    /// Depth axis.
    pub y: f64,
    pub parent: Option<NodeIx>,
    pub children: Vec<NodeIx>,
    /// Index of the tree (and band) this node belongs to.
    pub tree: usize,
}

/// One tree laid out on its own, root at `x = 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeLayout {
    pub nodes: Vec<LaidOutNode>,
    pub min_x: f64,
    pub max_x: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForestLayout {
    pub nodes: Vec<LaidOutNode>,
    pub bands: Vec<TreeBand>,
    /// Sum of all band spans.
    pub total_height: f64,
    /// `total_height * viewport_margin`.
    pub viewport_height: f64,
    /// Largest `y` of any node.
    pub max_y: f64,
}

/// Lay out a single tree. Node order is pre-order; the root sits at the
/// origin.
pub fn layout_tree(root: &TreeNode, cfg: &LayoutConfig) -> TreeLayout {
    let unit = tidy::place(root, cfg.separation);

    let mut nodes = Vec::with_capacity(unit.x.len());
    for (i, source) in root.preorder().into_iter().enumerate() {
        nodes.push(LaidOutNode {
            id: source.id.clone(),
            name: source.name.clone(),
            color: source.color.clone(),
            status: source.status.clone(),
            depth: unit.depth[i],
            x: unit.x[i] * cfg.breadth_spacing,
            y: unit.depth[i] as f64 * cfg.depth_spacing,
            parent: unit.parent[i].map(NodeIx),
            children: unit.children[i].iter().copied().map(NodeIx).collect(),
            tree: 0,
        });
    }

    let (min_x, max_x) = nodes
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), n| (lo.min(n.x), hi.max(n.x)));

    TreeLayout { nodes, min_x, max_x }
}

/// Lay out every tree and stack them along the breadth axis.
pub fn layout_forest(roots: &[TreeNode], cfg: &LayoutConfig) -> ForestLayout {
    let layouts: Vec<TreeLayout> = roots.iter().map(|r| layout_tree(r, cfg)).collect();
    let forest = stack::stack_trees(layouts, cfg);
    tracing::debug!(
        trees = forest.bands.len(),
        nodes = forest.nodes.len(),
        height = forest.total_height,
        "laid out task forest"
    );
    forest
}

impl ForestLayout {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, ix: NodeIx) -> &LaidOutNode {
        &self.nodes[ix.0]
    }

    pub fn get(&self, ix: NodeIx) -> Option<&LaidOutNode> {
        self.nodes.get(ix.0)
    }

    /// First node (in pre-order) carrying this task id.
    pub fn find(&self, id: &TaskId) -> Option<NodeIx> {
        self.nodes.iter().position(|n| &n.id == id).map(NodeIx)
    }

    /// Lookup by the id's string form, as handed over by a JS host.
    ///
    /// A key in canonical integer form (`"7"`, not `"07"`) resolves to the
    /// integer id first and falls back to a string id with the same text;
    /// any other key only matches string ids.
    pub fn find_by_key(&self, key: &str) -> Option<NodeIx> {
        key.parse::<i64>()
            .ok()
            .filter(|n| n.to_string() == key)
            .and_then(|n| self.find(&TaskId::Int(n)))
            .or_else(|| self.find(&TaskId::Text(key.to_string())))
    }

    pub fn indices(&self) -> impl Iterator<Item = NodeIx> + '_ {
        (0..self.nodes.len()).map(NodeIx)
    }

    /// `(parent, child)` pairs in pre-order of the child.
    pub fn links(&self) -> impl Iterator<Item = (NodeIx, NodeIx)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| n.parent.map(|p| (p, NodeIx(i))))
    }

    /// `ix` and all of its descendants, pre-order.
    pub fn subtree(&self, ix: NodeIx) -> Vec<NodeIx> {
        let mut out = Vec::new();
        let mut stack = vec![ix];
        while let Some(v) = stack.pop() {
            out.push(v);
            stack.extend(self.nodes[v.0].children.iter().rev().copied());
        }
        out
    }

    /// True when `node` lies strictly below `ancestor`.
    pub fn is_descendant(&self, node: NodeIx, ancestor: NodeIx) -> bool {
        let mut cur = self.nodes[node.0].parent;
        while let Some(p) = cur {
            if p == ancestor {
                return true;
            }
            cur = self.nodes[p.0].parent;
        }
        false
    }

    /// Tree roots in stacking order.
    pub fn roots(&self) -> impl Iterator<Item = NodeIx> + '_ {
        self.bands.iter().map(|b| b.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(id: i64) -> TreeNode {
        TreeNode::leaf(id, format!("task {id}"))
    }

    #[test]
    fn test_root_and_child_depths() {
        let cfg = LayoutConfig::default();
        let tree = layout_tree(&leaf(1).with_children(vec![leaf(2)]), &cfg);
        assert_eq!(tree.nodes[0].depth, 0);
        assert_eq!(tree.nodes[0].y, 0.0);
        assert_eq!(tree.nodes[1].depth, 1);
        assert_eq!(tree.nodes[1].y, cfg.depth_spacing);
        assert_eq!(tree.nodes[1].parent, Some(NodeIx(0)));
    }

    #[test]
    fn test_siblings_spaced_by_breadth() {
        let cfg = LayoutConfig::default();
        let tree = layout_tree(&leaf(1).with_children(vec![leaf(2), leaf(3), leaf(4)]), &cfg);
        assert_eq!(tree.nodes[2].x - tree.nodes[1].x, cfg.breadth_spacing);
        assert_eq!(tree.nodes[3].x - tree.nodes[2].x, cfg.breadth_spacing);
        assert_eq!(tree.nodes[0].x, tree.nodes[2].x);
        assert_eq!(tree.min_x, -cfg.breadth_spacing);
        assert_eq!(tree.max_x, cfg.breadth_spacing);
    }

    #[test]
    fn test_custom_separation() {
        let cfg = LayoutConfig { separation: 1.5, ..LayoutConfig::default() };
        let root = leaf(1).with_children(vec![
            leaf(2).with_children(vec![leaf(4)]),
            leaf(3).with_children(vec![leaf(5)]),
        ]);
        let tree = layout_tree(&root, &cfg);
        let gap = tree.nodes[4].x - tree.nodes[2].x;
        assert!((gap - 1.5 * cfg.breadth_spacing).abs() < 1e-9);
    }

    #[test]
    fn test_forest_queries() {
        let cfg = LayoutConfig::default();
        let roots = vec![
            leaf(1).with_children(vec![leaf(2).with_children(vec![leaf(3)])]),
            leaf(10),
        ];
        let forest = layout_forest(&roots, &cfg);
        assert_eq!(forest.len(), 4);
        let one = forest.find(&TaskId::Int(1)).unwrap();
        let three = forest.find_by_key("3").unwrap();
        assert!(forest.is_descendant(three, one));
        assert!(!forest.is_descendant(one, three));
        assert_eq!(forest.subtree(one), vec![NodeIx(0), NodeIx(1), NodeIx(2)]);
        assert_eq!(forest.links().count(), 2);
        assert_eq!(forest.roots().collect::<Vec<_>>(), vec![NodeIx(0), NodeIx(3)]);
        assert_eq!(forest.node(NodeIx(3)).tree, 1);
        assert_eq!(forest.max_y, 2.0 * cfg.depth_spacing);
    }

    #[test]
    fn test_find_by_key_with_mixed_ids() {
        let cfg = LayoutConfig::default();
        let roots = vec![
            TreeNode::leaf("1", "text one"),
            TreeNode::leaf(1, "int one"),
            TreeNode::leaf("07", "text seven"),
            TreeNode::leaf(7, "int seven"),
        ];
        let forest = layout_forest(&roots, &cfg);
        assert_eq!(forest.find_by_key("1"), Some(NodeIx(1)));
        assert_eq!(forest.find_by_key("07"), Some(NodeIx(2)));
        assert_eq!(forest.find_by_key("7"), Some(NodeIx(3)));
        assert_eq!(forest.find_by_key("8"), None);

        let text_only = layout_forest(&[TreeNode::leaf("42", "answer")], &cfg);
        assert_eq!(text_only.find_by_key("42"), Some(NodeIx(0)));
    }

    #[test]
    fn test_empty_forest() {
        let forest = layout_forest(&[], &LayoutConfig::default());
        assert!(forest.is_empty());
        assert_eq!(forest.total_height, 0.0);
        assert_eq!(forest.viewport_height, 0.0);
    }

    #[test]
    fn test_rect_overlap() {
        let a = RectF::centered(PointF::ORIGIN, 10.0, 10.0);
        let b = RectF::centered(PointF::new(5.0, 5.0), 10.0, 10.0);
        let c = RectF::centered(PointF::new(10.0, 0.0), 10.0, 10.0);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }
}
