// Tidy tree placement (Buchheim, Jünger & Leipert's linear-time variant of
// Walker's algorithm).
//
// Works in "unit" breadth coordinates: adjacent siblings sit 1.0 apart and
// adjacent non-siblings `separation` apart. The caller scales by the
// configured breadth spacing.
//
// - First walk (post-order): preliminary x per node, subtree contours are
//   merged left to right through threads, conflicts resolved by shifting
//   whole subtrees and spreading the shift over the siblings in between.
// - Second walk (pre-order): accumulate modifiers into final x.
//
// The root always ends at x = 0.

use crate::forest::TreeNode;

#[derive(Debug)]
struct Walk {
    parent: Option<usize>,
    children: Vec<usize>,
    /// Index among its siblings.
    number: usize,
    depth: usize,
    prelim: f64,
    modifier: f64,
    change: f64,
    shift: f64,
    ancestor: usize,
    thread: Option<usize>,
    /// Default ancestor for the apportion step of this node's children.
    default_ancestor: Option<usize>,
    x: f64,
}

/// Unit-space placement of one tree. Nodes are in pre-order.
#[derive(Debug, Clone)]
pub(super) struct UnitPlacement {
    pub parent: Vec<Option<usize>>,
    pub children: Vec<Vec<usize>>,
    pub depth: Vec<usize>,
    pub x: Vec<f64>,
}

pub(super) fn place(root: &TreeNode, separation: f64) -> UnitPlacement {
    let mut tidy = Tidy { nodes: Vec::new(), separation };
    tidy.build(root);

    for v in tidy.post_order() {
        tidy.first_walk(v);
    }
    tidy.second_walk();

    let n = tidy.nodes.len();
    let mut out = UnitPlacement {
        parent: Vec::with_capacity(n),
        children: Vec::with_capacity(n),
        depth: Vec::with_capacity(n),
        x: Vec::with_capacity(n),
    };
    for w in tidy.nodes {
        out.parent.push(w.parent);
        out.children.push(w.children);
        out.depth.push(w.depth);
        out.x.push(w.x);
    }
    out
}

struct Tidy {
    nodes: Vec<Walk>,
    separation: f64,
}

impl Tidy {
    /// Flatten `root` into the arena in pre-order. Frames are
    /// `(node, parent, number, depth)`.
    fn build(&mut self, root: &TreeNode) {
        let mut stack: Vec<(&TreeNode, Option<usize>, usize, usize)> = vec![(root, None, 0, 0)];
        while let Some((node, parent, number, depth)) = stack.pop() {
            let ix = self.nodes.len();
            self.nodes.push(Walk {
                parent,
                children: Vec::with_capacity(node.children.len()),
                number,
                depth,
                prelim: 0.0,
                modifier: 0.0,
                change: 0.0,
                shift: 0.0,
                ancestor: ix,
                thread: None,
                default_ancestor: None,
                x: 0.0,
            });
            if let Some(p) = parent {
                self.nodes[p].children.push(ix);
            }
            for (i, child) in node.children.iter().enumerate().rev() {
                stack.push((child, Some(ix), i, depth + 1));
            }
        }
    }

    /// Children before parents, siblings left to right.
    fn post_order(&self) -> Vec<usize> {
        let mut out = Vec::with_capacity(self.nodes.len());
        if self.nodes.is_empty() {
            return out;
        }
        let mut stack: Vec<(usize, usize)> = vec![(0, 0)];
        while let Some((v, next)) = stack.pop() {
            if let Some(&c) = self.nodes[v].children.get(next) {
                stack.push((v, next + 1));
                stack.push((c, 0));
            } else {
                out.push(v);
            }
        }
        out
    }

    fn separation_between(&self, a: usize, b: usize) -> f64 {
        if self.nodes[a].parent == self.nodes[b].parent {
            1.0
        } else {
            self.separation
        }
    }

    fn next_left(&self, v: usize) -> Option<usize> {
        self.nodes[v].children.first().copied().or(self.nodes[v].thread)
    }

    fn next_right(&self, v: usize) -> Option<usize> {
        self.nodes[v].children.last().copied().or(self.nodes[v].thread)
    }

    fn left_sibling(&self, v: usize) -> Option<usize> {
        let number = self.nodes[v].number;
        if number == 0 {
            return None;
        }
        let parent = self.nodes[v].parent?;
        self.nodes[parent].children.get(number - 1).copied()
    }

    fn leftmost_sibling(&self, v: usize) -> usize {
        match self.nodes[v].parent {
            Some(p) => self.nodes[p].children[0],
            None => v,
        }
    }

    fn first_walk(&mut self, v: usize) {
        let w = self.left_sibling(v);
        let (first, last) = match (self.nodes[v].children.first(), self.nodes[v].children.last()) {
            (Some(&f), Some(&l)) => (Some(f), Some(l)),
            _ => (None, None),
        };

        if let (Some(first), Some(last)) = (first, last) {
            self.execute_shifts(v);
            let midpoint = (self.nodes[first].prelim + self.nodes[last].prelim) / 2.0;
            match w {
                Some(w) => {
                    let prelim = self.nodes[w].prelim + self.separation_between(v, w);
                    self.nodes[v].prelim = prelim;
                    self.nodes[v].modifier = prelim - midpoint;
                }
                None => self.nodes[v].prelim = midpoint,
            }
        } else if let Some(w) = w {
            self.nodes[v].prelim = self.nodes[w].prelim + self.separation_between(v, w);
        }

        let parent = self.nodes[v].parent;
        let default = parent
            .and_then(|p| self.nodes[p].default_ancestor)
            .unwrap_or_else(|| self.leftmost_sibling(v));
        let ancestor = self.apportion(v, w, default);
        if let Some(p) = parent {
            self.nodes[p].default_ancestor = Some(ancestor);
        }
    }

    fn apportion(&mut self, v: usize, w: Option<usize>, mut ancestor: usize) -> usize {
        let Some(w) = w else {
            return ancestor;
        };

        let mut vop = v;
        let mut vom = self.leftmost_sibling(v);
        let mut sip = self.nodes[v].modifier;
        let mut sop = self.nodes[v].modifier;
        let mut sim = self.nodes[w].modifier;
        let mut som = self.nodes[vom].modifier;

        let mut vim = self.next_right(w);
        let mut vip = self.next_left(v);

        while let (Some(im), Some(ip)) = (vim, vip) {
            vom = self.next_left(vom).unwrap_or(vom);
            vop = self.next_right(vop).unwrap_or(vop);
            self.nodes[vop].ancestor = v;

            let shift = self.nodes[im].prelim + sim - self.nodes[ip].prelim - sip
                + self.separation_between(im, ip);
            if shift > 0.0 {
                let wm = self.next_ancestor(im, v, ancestor);
                self.move_subtree(wm, v, shift);
                sip += shift;
                sop += shift;
            }

            sim += self.nodes[im].modifier;
            sip += self.nodes[ip].modifier;
            som += self.nodes[vom].modifier;
            sop += self.nodes[vop].modifier;

            vim = self.next_right(im);
            vip = self.next_left(ip);
        }

        if let Some(im) = vim {
            if self.next_right(vop).is_none() {
                self.nodes[vop].thread = Some(im);
                self.nodes[vop].modifier += sim - sop;
            }
        }
        if let Some(ip) = vip {
            if self.next_left(vom).is_none() {
                self.nodes[vom].thread = Some(ip);
                self.nodes[vom].modifier += sip - som;
                ancestor = v;
            }
        }
        ancestor
    }

    fn next_ancestor(&self, vim: usize, v: usize, ancestor: usize) -> usize {
        let a = self.nodes[vim].ancestor;
        if self.nodes[a].parent == self.nodes[v].parent {
            a
        } else {
            ancestor
        }
    }

    fn move_subtree(&mut self, wm: usize, wp: usize, shift: f64) {
        let subtrees = (self.nodes[wp].number - self.nodes[wm].number) as f64;
        let change = shift / subtrees;
        self.nodes[wp].change -= change;
        self.nodes[wp].shift += shift;
        self.nodes[wm].change += change;
        self.nodes[wp].prelim += shift;
        self.nodes[wp].modifier += shift;
    }

    fn execute_shifts(&mut self, v: usize) {
        let mut shift = 0.0;
        let mut change = 0.0;
        for i in (0..self.nodes[v].children.len()).rev() {
            let w = self.nodes[v].children[i];
            self.nodes[w].prelim += shift;
            self.nodes[w].modifier += shift;
            change += self.nodes[w].change;
            shift += self.nodes[w].shift + change;
        }
    }

    /// Pre-order (arena order) modifier accumulation.
    fn second_walk(&mut self) {
        if self.nodes.is_empty() {
            return;
        }
        let root_mod = -self.nodes[0].prelim;
        for v in 0..self.nodes.len() {
            let parent_mod = match self.nodes[v].parent {
                Some(p) => self.nodes[p].modifier,
                None => root_mod,
            };
            self.nodes[v].x = self.nodes[v].prelim + parent_mod;
            self.nodes[v].modifier += parent_mod;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(id: i64) -> TreeNode {
        TreeNode::leaf(id, format!("n{id}"))
    }

    #[test]
    fn test_single_node() {
        let p = place(&leaf(1), 2.0);
        assert_eq!(p.x, vec![0.0]);
        assert_eq!(p.depth, vec![0]);
    }

    #[test]
    fn test_two_children_centered() {
        let root = leaf(1).with_children(vec![leaf(2), leaf(3)]);
        let p = place(&root, 2.0);
        assert_eq!(p.x[0], 0.0);
        assert_eq!(p.x[1], -0.5);
        assert_eq!(p.x[2], 0.5);
    }

    #[test]
    fn test_cousins_use_separation() {
        // 1 -> (2 -> 4), (3 -> 5): 4 and 5 are adjacent cousins.
        let root = leaf(1).with_children(vec![
            leaf(2).with_children(vec![leaf(4)]),
            leaf(3).with_children(vec![leaf(5)]),
        ]);
        let p = place(&root, 2.0);
        // pre-order: 1, 2, 4, 3, 5
        let gap = p.x[4] - p.x[2];
        assert!((gap - 2.0).abs() < 1e-9, "gap was {gap}");
        assert!((p.x[3] - p.x[1] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_deep_chain() {
        let mut root = leaf(0);
        for id in 1..20_000 {
            root = leaf(id).with_children(vec![root]);
        }
        let p = place(&root, 2.0);
        assert_eq!(p.x.len(), 20_000);
        assert!(p.x.iter().all(|&x| x == 0.0));
        assert_eq!(p.depth[19_999], 19_999);
        assert_eq!(p.parent[19_999], Some(19_998));
    }

    #[test]
    fn test_post_order_children_first() {
        let root = leaf(1).with_children(vec![leaf(2).with_children(vec![leaf(3)]), leaf(4)]);
        let mut tidy = Tidy { nodes: Vec::new(), separation: 1.0 };
        tidy.build(&root);
        assert_eq!(tidy.post_order(), vec![2, 1, 3, 0]);
    }
}
