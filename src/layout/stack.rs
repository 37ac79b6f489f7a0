// Forest stacking.
//
// Trees are laid out independently (root at x = 0) and then folded into one
// coordinate space along the breadth axis. The fold carries the cumulative
// height of the trees placed so far; tree k gets the band
// [cumulative, cumulative + span_k) and is shifted so that its breadth
// extent is centered in that band.

use serde::Serialize;

use super::{ForestLayout, LaidOutNode, LayoutConfig, NodeIx, TreeLayout};

/// The breadth-axis band assigned to one tree of a forest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeBand {
    /// Position of this tree in the forest.
    pub tree: usize,
    pub root: NodeIx,
    pub node_count: usize,
    /// Shift applied to every breadth coordinate of the tree.
    pub offset: f64,
    /// Extent of node centers after the shift.
    pub min_x: f64,
    pub max_x: f64,
    /// `(max_x - min_x) + breadth_spacing`.
    pub span: f64,
    pub start: f64,
    pub end: f64,
}

impl TreeBand {
    pub fn contains(&self, x: f64) -> bool {
        x >= self.start && x < self.end
    }
}

struct Acc {
    nodes: Vec<LaidOutNode>,
    bands: Vec<TreeBand>,
    cumulative: f64,
    max_y: f64,
}

pub(super) fn stack_trees(trees: Vec<TreeLayout>, cfg: &LayoutConfig) -> ForestLayout {
    let total_nodes = trees.iter().map(|t| t.nodes.len()).sum();
    let init = Acc {
        nodes: Vec::with_capacity(total_nodes),
        bands: Vec::with_capacity(trees.len()),
        cumulative: 0.0,
        max_y: 0.0,
    };

    let acc = trees.into_iter().enumerate().fold(init, |mut acc, (t, tree)| {
        let span = (tree.max_x - tree.min_x) + cfg.breadth_spacing;
        let center = (tree.min_x + tree.max_x) / 2.0;
        let offset = acc.cumulative + span / 2.0 - center;
        let base = acc.nodes.len();

        acc.bands.push(TreeBand {
            tree: t,
            root: NodeIx(base),
            node_count: tree.nodes.len(),
            offset,
            min_x: tree.min_x + offset,
            max_x: tree.max_x + offset,
            span,
            start: acc.cumulative,
            end: acc.cumulative + span,
        });

        for mut node in tree.nodes {
            node.x += offset;
            node.tree = t;
            node.parent = node.parent.map(|p| NodeIx(p.0 + base));
            for c in node.children.iter_mut() {
                c.0 += base;
            }
            acc.max_y = acc.max_y.max(node.y);
            acc.nodes.push(node);
        }

        acc.cumulative += span;
        acc
    });

    ForestLayout {
        nodes: acc.nodes,
        bands: acc.bands,
        total_height: acc.cumulative,
        viewport_height: acc.cumulative * cfg.viewport_margin,
        max_y: acc.max_y,
    }
}
