use crate::path::TreePath;
use crate::render::Row;

use super::node::Node;

/// The single ordered sequence of currently visible nodes.
///
/// Invariant: read top to bottom, the sequence is a pre-order flattening of
/// the opened portions of the tree, each level internally ordered by
/// `TreePath::goes_after`. All operations patch the sequence in place and
/// touch only the affected sibling run or subtree, never the whole list.
#[derive(Debug, Default)]
pub struct FlatList {
    nodes: Vec<Node>,
}

impl FlatList {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub fn position(&self, path: &TreePath) -> Option<usize> {
        self.nodes.iter().position(|node| node.path() == path)
    }

    pub fn is_displayed(&self, path: &TreePath) -> bool {
        self.position(path).is_some()
    }

    /// The displayed path equal to `path`, carrying the authoritative
    /// directory flag (lookups ignore the flag).
    pub fn node_path(&self, path: &TreePath) -> Option<&TreePath> {
        self.nodes.iter().map(Node::path).find(|p| *p == path)
    }

    /// Inserts a node at its ordered position.
    ///
    /// Returns `false`, dropping the node, when the path is already
    /// present or, for nested paths, when the direct parent is not
    /// currently visible: a node must never appear without its parent, so
    /// an insert under a collapsed or unloaded branch is a safe no-op.
    pub fn add(&mut self, node: Node) -> bool {
        let path = node.path();
        if self.is_displayed(path) {
            return false;
        }
        let index = if path.is_root() {
            self.root_insertion_index(path)
        } else {
            match self.nested_insertion_index(path) {
                Some(index) => index,
                None => return false,
            }
        };
        self.nodes.insert(index, node);
        true
    }

    /// Roots are ordered among roots only; the subtree hanging off an
    /// earlier root stays contiguous with it.
    fn root_insertion_index(&self, path: &TreePath) -> usize {
        self.nodes
            .iter()
            .position(|node| node.path().is_root() && node.path().goes_after(path))
            .unwrap_or(self.nodes.len())
    }

    /// Scans forward from just after the direct parent for the first node
    /// that is either a later-sorting sibling or past the parent's subtree.
    fn nested_insertion_index(&self, path: &TreePath) -> Option<usize> {
        let parent = path.parent()?;
        let parent_index = self.position(&parent)?;

        let mut index = parent_index + 1;
        while let Some(node) = self.nodes.get(index) {
            let candidate = node.path();
            if !candidate.is_child_of(&parent) {
                break;
            }
            if candidate.has_same_parent_as(path) && candidate.goes_after(path) {
                break;
            }
            index += 1;
        }
        Some(index)
    }

    /// Removes `path` and, when it names a displayed directory, its entire
    /// subtree. Returns the removed paths (the path first, then its
    /// descendants in former list order); empty when nothing was displayed.
    pub fn remove(&mut self, path: &TreePath) -> Vec<TreePath> {
        let Some(index) = self.position(path) else {
            return Vec::new();
        };
        let mut removed = if self.nodes[index].is_directory() {
            self.remove_descendants(path)
        } else {
            Vec::new()
        };
        // Descendants sit strictly after the node, so the index still holds.
        let node = self.nodes.remove(index);
        removed.insert(0, node.path().clone());
        removed
    }

    /// Cascade-removes every strict descendant of `path`, keeping the node
    /// itself: a stable partition of the sequence. Dropping the removed
    /// nodes drops their rows.
    pub fn remove_descendants(&mut self, path: &TreePath) -> Vec<TreePath> {
        let mut kept = Vec::with_capacity(self.nodes.len());
        let mut removed = Vec::new();
        for node in self.nodes.drain(..) {
            if path.is_parent_of(node.path()) {
                removed.push(node.path().clone());
            } else {
                kept.push(node);
            }
        }
        self.nodes = kept;
        removed
    }

    /// Replaces the row of a displayed node in place; no-op when absent.
    pub fn refresh(&mut self, path: &TreePath, row: Row) {
        if let Some(index) = self.position(path) {
            self.nodes[index].set_row(row);
        }
    }
}
