//! An augmented red-black interval tree.
//!
//! Nodes are keyed by the interval's low endpoint. Intervals that share a low endpoint live in the
//! same node, in an entry list ordered by descending high endpoint. Every node caches the maximum
//! high endpoint of its subtree, which lets `search` skip subtrees that cannot reach the query.
//!
//! Removal is by item index: the tree keeps an `index -> node` map so the owning node is found
//! without a coordinate search.
use alloc::vec::Vec;
use core::cmp;

use smallvec::SmallVec;

use crate::key::KeyMap;

type NodeId = usize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Color {
    Red,
    Black,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Entry {
    index: usize,
    high: u64,
}

#[derive(Clone, Debug)]
struct Node {
    low: u64,
    /// Largest `high` in `list`.
    high: u64,
    /// Largest `high` in this subtree.
    max: u64,
    color: Color,
    parent: Option<NodeId>,
    left: Option<NodeId>,
    right: Option<NodeId>,
    list: SmallVec<[Entry; 2]>,
}

#[derive(Clone, Debug, Default)]
pub struct IntervalTree {
    nodes: Vec<Node>,
    free: Vec<NodeId>,
    root: Option<NodeId>,
    index_map: KeyMap<usize, NodeId>,
    size: usize,
}

impl IntervalTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live intervals (not nodes).
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn contains(&self, index: usize) -> bool {
        self.index_map.contains_key(&index)
    }

    /// Returns the `(low, high)` interval stored for `index`.
    pub fn get(&self, index: usize) -> Option<(u64, u64)> {
        let id = *self.index_map.get(&index)?;
        let node = &self.nodes[id];
        node.list
            .iter()
            .find(|e| e.index == index)
            .map(|e| (node.low, e.high))
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.root = None;
        self.index_map.clear();
        self.size = 0;
    }

    /// Inserts `[low, high]` tagged with `index`.
    ///
    /// Returns `false` when `index` is already stored at `low` (the tree is left untouched). An
    /// `index` stored at a different `low` is moved.
    pub fn insert(&mut self, low: u64, high: u64, index: usize) -> bool {
        if let Some(&id) = self.index_map.get(&index) {
            if self.nodes[id].low == low {
                return false;
            }
            self.remove(index);
        }

        if let Some(id) = self.find(low) {
            add_entry(&mut self.nodes[id].list, index, high);
            let head = self.nodes[id].list[0].high;
            self.nodes[id].high = head;
            self.update_max_up(id);
            self.index_map.insert(index, id);
            self.size += 1;
            return true;
        }

        let z = self.alloc(low, high, index);
        let mut parent = None;
        let mut cur = self.root;
        while let Some(x) = cur {
            parent = Some(x);
            cur = if low < self.nodes[x].low {
                self.nodes[x].left
            } else {
                self.nodes[x].right
            };
        }
        self.nodes[z].parent = parent;
        match parent {
            None => self.root = Some(z),
            Some(p) if low < self.nodes[p].low => self.nodes[p].left = Some(z),
            Some(p) => self.nodes[p].right = Some(z),
        }
        if let Some(p) = parent {
            self.update_max_up(p);
        }
        self.fix_insert(z);

        self.index_map.insert(index, z);
        self.size += 1;
        true
    }

    /// Removes the interval tagged with `index`. Unknown indexes are ignored.
    pub fn remove(&mut self, index: usize) -> bool {
        let Some(id) = self.index_map.remove(&index) else {
            return false;
        };
        let list = &mut self.nodes[id].list;
        let Some(pos) = list.iter().position(|e| e.index == index) else {
            debug_assert!(false, "index map points at a node without the entry");
            return false;
        };
        list.remove(pos);
        let head = list.first().map(|e| e.high);
        self.size -= 1;

        match head {
            Some(high) => {
                self.nodes[id].high = high;
                self.update_max_up(id);
            }
            None => self.delete_node(id),
        }
        true
    }

    /// Reports every stored interval overlapping `[low, high]` as `(index, interval_low)`.
    ///
    /// Visit order: a node is reported after both of its children are pushed, so results come out
    /// as node, right subtree, left subtree. Subtrees that cannot overlap are never pushed.
    pub fn search(&self, low: u64, high: u64, mut f: impl FnMut(usize, u64)) {
        let Some(root) = self.root else {
            return;
        };
        if low > self.nodes[root].max {
            return;
        }

        let mut stack: SmallVec<[NodeId; 32]> = SmallVec::new();
        stack.push(root);
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            if let Some(l) = node.left {
                if low <= self.nodes[l].max {
                    stack.push(l);
                }
            }
            if let Some(r) = node.right {
                if node.low <= high && low <= self.nodes[r].max {
                    stack.push(r);
                }
            }
            if node.low <= high && node.high >= low {
                for entry in &node.list {
                    if entry.high >= low {
                        f(entry.index, node.low);
                    }
                }
            }
        }
    }

    fn find(&self, low: u64) -> Option<NodeId> {
        let mut cur = self.root;
        while let Some(id) = cur {
            let node = &self.nodes[id];
            cur = match low.cmp(&node.low) {
                cmp::Ordering::Equal => return Some(id),
                cmp::Ordering::Less => node.left,
                cmp::Ordering::Greater => node.right,
            };
        }
        None
    }

    fn alloc(&mut self, low: u64, high: u64, index: usize) -> NodeId {
        let mut list = SmallVec::new();
        list.push(Entry { index, high });
        let node = Node {
            low,
            high,
            max: high,
            color: Color::Red,
            parent: None,
            left: None,
            right: None,
            list,
        };
        match self.free.pop() {
            Some(id) => {
                self.nodes[id] = node;
                id
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        }
    }

    fn color(&self, id: Option<NodeId>) -> Color {
        id.map_or(Color::Black, |id| self.nodes[id].color)
    }

    fn set_color(&mut self, id: Option<NodeId>, color: Color) {
        if let Some(id) = id {
            self.nodes[id].color = color;
        }
    }

    fn max_of(&self, id: Option<NodeId>) -> u64 {
        id.map_or(0, |id| self.nodes[id].max)
    }

    fn update_max(&mut self, id: NodeId) {
        let node = &self.nodes[id];
        let max = node
            .high
            .max(self.max_of(node.left))
            .max(self.max_of(node.right));
        self.nodes[id].max = max;
    }

    fn update_max_up(&mut self, id: NodeId) {
        let mut cur = Some(id);
        while let Some(id) = cur {
            self.update_max(id);
            cur = self.nodes[id].parent;
        }
    }

    fn rotate_left(&mut self, x: NodeId) {
        let Some(y) = self.nodes[x].right else {
            return;
        };
        let y_left = self.nodes[y].left;
        self.nodes[x].right = y_left;
        if let Some(b) = y_left {
            self.nodes[b].parent = Some(x);
        }
        let x_parent = self.nodes[x].parent;
        self.nodes[y].parent = x_parent;
        self.replace_child(x_parent, x, Some(y));
        self.nodes[y].left = Some(x);
        self.nodes[x].parent = Some(y);

        self.update_max(x);
        self.update_max(y);
    }

    fn rotate_right(&mut self, x: NodeId) {
        let Some(y) = self.nodes[x].left else {
            return;
        };
        let y_right = self.nodes[y].right;
        self.nodes[x].left = y_right;
        if let Some(b) = y_right {
            self.nodes[b].parent = Some(x);
        }
        let x_parent = self.nodes[x].parent;
        self.nodes[y].parent = x_parent;
        self.replace_child(x_parent, x, Some(y));
        self.nodes[y].right = Some(x);
        self.nodes[x].parent = Some(y);

        self.update_max(x);
        self.update_max(y);
    }

    /// Points `parent`'s link to `old` (or the root) at `new`.
    fn replace_child(&mut self, parent: Option<NodeId>, old: NodeId, new: Option<NodeId>) {
        match parent {
            None => self.root = new,
            Some(p) if self.nodes[p].left == Some(old) => self.nodes[p].left = new,
            Some(p) => self.nodes[p].right = new,
        }
    }

    fn transplant(&mut self, u: NodeId, v: Option<NodeId>) {
        let u_parent = self.nodes[u].parent;
        self.replace_child(u_parent, u, v);
        if let Some(v) = v {
            self.nodes[v].parent = u_parent;
        }
    }

    fn minimum(&self, mut id: NodeId) -> NodeId {
        while let Some(l) = self.nodes[id].left {
            id = l;
        }
        id
    }

    fn fix_insert(&mut self, mut z: NodeId) {
        while let Some(p) = self.nodes[z].parent {
            if self.nodes[p].color == Color::Black {
                break;
            }
            // A red node is never the root.
            let Some(g) = self.nodes[p].parent else {
                break;
            };

            if self.nodes[g].left == Some(p) {
                let uncle = self.nodes[g].right;
                if self.color(uncle) == Color::Red {
                    self.nodes[p].color = Color::Black;
                    self.set_color(uncle, Color::Black);
                    self.nodes[g].color = Color::Red;
                    z = g;
                    continue;
                }
                if self.nodes[p].right == Some(z) {
                    z = p;
                    self.rotate_left(z);
                }
                let Some(p) = self.nodes[z].parent else {
                    break;
                };
                self.nodes[p].color = Color::Black;
                self.nodes[g].color = Color::Red;
                self.rotate_right(g);
            } else {
                let uncle = self.nodes[g].left;
                if self.color(uncle) == Color::Red {
                    self.nodes[p].color = Color::Black;
                    self.set_color(uncle, Color::Black);
                    self.nodes[g].color = Color::Red;
                    z = g;
                    continue;
                }
                if self.nodes[p].left == Some(z) {
                    z = p;
                    self.rotate_right(z);
                }
                let Some(p) = self.nodes[z].parent else {
                    break;
                };
                self.nodes[p].color = Color::Black;
                self.nodes[g].color = Color::Red;
                self.rotate_left(g);
            }
        }
        self.set_color(self.root, Color::Black);
    }

    /// Structurally removes `z`, whose entry list is already empty.
    fn delete_node(&mut self, z: NodeId) {
        let mut original_color = self.nodes[z].color;
        let x;
        let x_parent;

        match (self.nodes[z].left, self.nodes[z].right) {
            (None, right) => {
                x = right;
                x_parent = self.nodes[z].parent;
                self.transplant(z, right);
            }
            (left, None) => {
                x = left;
                x_parent = self.nodes[z].parent;
                self.transplant(z, left);
            }
            (Some(z_left), Some(z_right)) => {
                let y = self.minimum(z_right);
                original_color = self.nodes[y].color;
                x = self.nodes[y].right;
                if self.nodes[y].parent == Some(z) {
                    x_parent = Some(y);
                } else {
                    x_parent = self.nodes[y].parent;
                    self.transplant(y, x);
                    self.nodes[y].right = Some(z_right);
                    self.nodes[z_right].parent = Some(y);
                }
                self.transplant(z, Some(y));
                self.nodes[y].left = Some(z_left);
                self.nodes[z_left].parent = Some(y);
                self.nodes[y].color = self.nodes[z].color;
            }
        }

        if let Some(p) = x_parent {
            self.update_max_up(p);
        }

        let node = &mut self.nodes[z];
        node.parent = None;
        node.left = None;
        node.right = None;
        node.list.clear();
        self.free.push(z);

        if original_color == Color::Black {
            self.fix_remove(x, x_parent);
        }
    }

    fn fix_remove(&mut self, mut x: Option<NodeId>, mut parent: Option<NodeId>) {
        while x != self.root && self.color(x) == Color::Black {
            let Some(p) = parent else {
                break;
            };

            if self.nodes[p].left == x {
                // A doubly-black position always has a real sibling.
                let Some(mut w) = self.nodes[p].right else {
                    break;
                };
                if self.nodes[w].color == Color::Red {
                    self.nodes[w].color = Color::Black;
                    self.nodes[p].color = Color::Red;
                    self.rotate_left(p);
                    let Some(next) = self.nodes[p].right else {
                        break;
                    };
                    w = next;
                }
                if self.color(self.nodes[w].left) == Color::Black
                    && self.color(self.nodes[w].right) == Color::Black
                {
                    self.nodes[w].color = Color::Red;
                    x = Some(p);
                    parent = self.nodes[p].parent;
                } else {
                    if self.color(self.nodes[w].right) == Color::Black {
                        self.set_color(self.nodes[w].left, Color::Black);
                        self.nodes[w].color = Color::Red;
                        self.rotate_right(w);
                        let Some(next) = self.nodes[p].right else {
                            break;
                        };
                        w = next;
                    }
                    self.nodes[w].color = self.nodes[p].color;
                    self.nodes[p].color = Color::Black;
                    self.set_color(self.nodes[w].right, Color::Black);
                    self.rotate_left(p);
                    x = self.root;
                    parent = None;
                }
            } else {
                let Some(mut w) = self.nodes[p].left else {
                    break;
                };
                if self.nodes[w].color == Color::Red {
                    self.nodes[w].color = Color::Black;
                    self.nodes[p].color = Color::Red;
                    self.rotate_right(p);
                    let Some(next) = self.nodes[p].left else {
                        break;
                    };
                    w = next;
                }
                if self.color(self.nodes[w].right) == Color::Black
                    && self.color(self.nodes[w].left) == Color::Black
                {
                    self.nodes[w].color = Color::Red;
                    x = Some(p);
                    parent = self.nodes[p].parent;
                } else {
                    if self.color(self.nodes[w].left) == Color::Black {
                        self.set_color(self.nodes[w].right, Color::Black);
                        self.nodes[w].color = Color::Red;
                        self.rotate_left(w);
                        let Some(next) = self.nodes[p].left else {
                            break;
                        };
                        w = next;
                    }
                    self.nodes[w].color = self.nodes[p].color;
                    self.nodes[p].color = Color::Black;
                    self.set_color(self.nodes[w].left, Color::Black);
                    self.rotate_right(p);
                    x = self.root;
                    parent = None;
                }
            }
        }
        self.set_color(x, Color::Black);
    }
}

/// Inserts into a list kept in descending `high` order; equal highs keep insertion order.
fn add_entry(list: &mut SmallVec<[Entry; 2]>, index: usize, high: u64) {
    let pos = list
        .iter()
        .position(|e| high > e.high)
        .unwrap_or(list.len());
    list.insert(pos, Entry { index, high });
}

#[cfg(test)]
impl IntervalTree {
    /// In-order `(low, color, entries)` snapshot of the tree shape.
    pub(crate) fn shape(&self) -> Vec<(u64, Color, Vec<(usize, u64)>)> {
        let mut out = Vec::new();
        let mut stack = Vec::new();
        let mut cur = self.root;
        while cur.is_some() || !stack.is_empty() {
            while let Some(id) = cur {
                stack.push(id);
                cur = self.nodes[id].left;
            }
            let Some(id) = stack.pop() else {
                break;
            };
            let node = &self.nodes[id];
            out.push((
                node.low,
                node.color,
                node.list.iter().map(|e| (e.index, e.high)).collect(),
            ));
            cur = node.right;
        }
        out
    }

    /// Reference traversal: pushes both children and prunes on pop.
    pub(crate) fn search_unpruned(&self, low: u64, high: u64, mut f: impl FnMut(usize, u64)) {
        let mut stack = Vec::new();
        stack.push(self.root);
        while let Some(slot) = stack.pop() {
            let Some(id) = slot else {
                continue;
            };
            let node = &self.nodes[id];
            if low > node.max {
                continue;
            }
            stack.push(node.left);
            stack.push(node.right);
            if node.low <= high && node.high >= low {
                for entry in &node.list {
                    if entry.high >= low {
                        f(entry.index, node.low);
                    }
                }
            }
        }
    }

    /// Verifies every structural invariant, returning the black height.
    pub(crate) fn check_invariants(&self) -> Result<usize, alloc::string::String> {
        use alloc::format;

        if self.color(self.root) != Color::Black {
            return Err("root is red".into());
        }
        let mut entries = 0usize;
        let height = match self.root {
            None => 1,
            Some(root) => {
                if self.nodes[root].parent.is_some() {
                    return Err("root has a parent".into());
                }
                self.check_node(root, None, None, &mut entries)?
            }
        };
        if entries != self.size {
            return Err(format!("size {} but {} entries", self.size, entries));
        }
        if self.index_map.len() != self.size {
            return Err(format!(
                "size {} but index map has {}",
                self.size,
                self.index_map.len()
            ));
        }
        Ok(height)
    }

    fn check_node(
        &self,
        id: NodeId,
        lo: Option<u64>,
        hi: Option<u64>,
        entries: &mut usize,
    ) -> Result<usize, alloc::string::String> {
        use alloc::format;

        let node = &self.nodes[id];
        if lo.is_some_and(|lo| node.low <= lo) || hi.is_some_and(|hi| node.low >= hi) {
            return Err(format!("node {} breaks BST order", node.low));
        }
        if node.list.is_empty() {
            return Err(format!("node {} has an empty list", node.low));
        }
        if node.list.windows(2).any(|w| w[0].high < w[1].high) {
            return Err(format!("node {} list is not sorted", node.low));
        }
        if node.high != node.list[0].high {
            return Err(format!("node {} high is stale", node.low));
        }
        for e in &node.list {
            if self.index_map.get(&e.index) != Some(&id) {
                return Err(format!("index {} not mapped to its node", e.index));
            }
        }
        *entries += node.list.len();

        if node.color == Color::Red
            && (self.color(node.left) == Color::Red || self.color(node.right) == Color::Red)
        {
            return Err(format!("red node {} has a red child", node.low));
        }

        let mut max = node.high;
        let mut heights = [1usize, 1usize];
        for (slot, child, bounds) in [
            (0, node.left, (lo, Some(node.low))),
            (1, node.right, (Some(node.low), hi)),
        ] {
            if let Some(c) = child {
                if self.nodes[c].parent != Some(id) {
                    return Err(format!("child of {} has a stale parent", node.low));
                }
                heights[slot] = self.check_node(c, bounds.0, bounds.1, entries)?;
                max = max.max(self.nodes[c].max);
            }
        }
        if heights[0] != heights[1] {
            return Err(format!("black height mismatch under {}", node.low));
        }
        if node.max != max {
            return Err(format!("node {} max {} != {}", node.low, node.max, max));
        }
        Ok(heights[0] + usize::from(node.color == Color::Black))
    }
}
