use generational_arena::{Arena, Index};
use tracing::instrument;

/// Tree node in the arena-based forest structure.
#[derive(Debug)]
pub struct TreeNode<T> {
    /// Domain payload wrapped by this node, exactly one per node
    pub payload: T,
    /// Index of the parent node in the arena, None for root nodes
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena, in recognition order
    pub children: Vec<Index>,
}

impl<T> TreeNode<T> {
    pub fn new(payload: T) -> Self {
        Self {
            payload,
            parent: None,
            children: Vec::new(),
        }
    }

    /// True iff this node has no parent.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Arena-based forest structure for efficient hierarchy management.
///
/// Uses generational arena for memory-safe node references and O(1) lookups.
/// All nodes of one assembly live in a single arena; parent and child links
/// are arena indices rather than direct references. Parent links are
/// non-owning back-references used purely for upward traversal.
#[derive(Debug)]
pub struct Forest<T> {
    /// Arena storage for all forest nodes
    arena: Arena<TreeNode<T>>,
    /// Node indices in insertion order
    order: Vec<Index>,
}

impl<T> Default for Forest<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Forest<T> {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            order: Vec::new(),
        }
    }

    /// Insert a new node wrapping `payload`, with no parent and no children.
    #[instrument(level = "trace", skip(self, payload))]
    pub fn insert(&mut self, payload: T) -> Index {
        let idx = self.arena.insert(TreeNode::new(payload));
        self.order.push(idx);
        idx
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get(&self, idx: Index) -> Option<&TreeNode<T>> {
        self.arena.get(idx)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get_mut(&mut self, idx: Index) -> Option<&mut TreeNode<T>> {
        self.arena.get_mut(idx)
    }

    pub fn payload(&self, idx: Index) -> Option<&T> {
        self.get(idx).map(|node| &node.payload)
    }

    pub fn payload_mut(&mut self, idx: Index) -> Option<&mut T> {
        self.get_mut(idx).map(|node| &mut node.payload)
    }

    /// Replace a node's payload. Links are unaffected.
    #[instrument(level = "trace", skip(self, payload))]
    pub fn set_payload(&mut self, idx: Index, payload: T) {
        if let Some(node) = self.arena.get_mut(idx) {
            node.payload = payload;
        }
    }

    /// The node's parent index, or None for roots and stale indices.
    #[instrument(level = "trace", skip(self))]
    pub fn parent(&self, idx: Index) -> Option<Index> {
        self.get(idx).and_then(|node| node.parent)
    }

    /// Replace the parent link only. The node is not removed from a previous
    /// parent's child list; keeping both sides consistent is the assembler's
    /// responsibility.
    #[instrument(level = "trace", skip(self))]
    pub fn set_parent(&mut self, idx: Index, parent: Option<Index>) {
        if let Some(node) = self.arena.get_mut(idx) {
            node.parent = parent;
        }
    }

    /// Read view of the node's children, in recognition order.
    #[instrument(level = "trace", skip(self))]
    pub fn children(&self, idx: Index) -> &[Index] {
        self.get(idx).map_or(&[], |node| node.children.as_slice())
    }

    /// Append `child` to `parent`'s child list. The child's parent link is
    /// not touched; the assembler must set both sides.
    #[instrument(level = "trace", skip(self))]
    pub fn add_child(&mut self, parent: Index, child: Index) {
        if let Some(node) = self.arena.get_mut(parent) {
            node.children.push(child);
        }
    }

    /// True iff the node exists and has no parent.
    #[instrument(level = "trace", skip(self))]
    pub fn is_root(&self, idx: Index) -> bool {
        self.get(idx).is_some_and(|node| node.is_root())
    }

    /// Indices of all parentless nodes, in insertion order.
    #[instrument(level = "debug", skip(self))]
    pub fn roots(&self) -> Vec<Index> {
        self.order
            .iter()
            .copied()
            .filter(|&idx| self.is_root(idx))
            .collect()
    }

    /// All node indices in insertion order.
    pub fn indices(&self) -> &[Index] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Depth-first preorder traversal over the whole forest, visiting roots
    /// in insertion order and children left-to-right.
    #[instrument(level = "trace", skip(self))]
    pub fn iter(&self) -> ForestIterator<'_, T> {
        ForestIterator::new(self, self.roots())
    }

    /// Preorder traversal of the subtree rooted at `idx`.
    #[instrument(level = "trace", skip(self))]
    pub fn iter_from(&self, idx: Index) -> ForestIterator<'_, T> {
        ForestIterator::new(self, vec![idx])
    }

    /// Postorder traversal over the whole forest (children before parents).
    #[instrument(level = "trace", skip(self))]
    pub fn iter_postorder(&self) -> PostOrderIterator<'_, T> {
        PostOrderIterator::new(self, self.roots())
    }

    /// Maximum node count on any root-to-leaf path, 0 for an empty forest.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.roots()
            .iter()
            .map(|&root| self.subtree_depth(root))
            .max()
            .unwrap_or(0)
    }

    #[instrument(level = "trace", skip(self))]
    fn subtree_depth(&self, idx: Index) -> usize {
        if let Some(node) = self.get(idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.subtree_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Collects all leaf nodes (nodes with no children), in preorder.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_nodes(&self) -> Vec<Index> {
        self.iter()
            .filter(|(_, node)| node.children.is_empty())
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Every leaf-to-root index path in the forest, one per leaf.
    ///
    /// The upward walk keeps a visited set, so a malformed parent chain
    /// terminates instead of looping.
    #[instrument(level = "debug", skip(self))]
    pub fn branches(&self) -> Vec<Vec<Index>> {
        let mut branches = Vec::new();
        for leaf in self.leaf_nodes() {
            let mut branch = Vec::new();
            let mut current = Some(leaf);
            while let Some(idx) = current {
                if branch.contains(&idx) {
                    break;
                }
                branch.push(idx);
                current = self.parent(idx);
            }
            branches.push(branch);
        }
        branches
    }
}

pub struct ForestIterator<'a, T> {
    forest: &'a Forest<T>,
    stack: Vec<Index>,
}

impl<'a, T> ForestIterator<'a, T> {
    fn new(forest: &'a Forest<T>, mut starts: Vec<Index>) -> Self {
        // Pop order is LIFO, so reverse to visit starts first-to-last
        starts.reverse();
        Self {
            forest,
            stack: starts,
        }
    }
}

impl<'a, T> Iterator for ForestIterator<'a, T> {
    type Item = (Index, &'a TreeNode<T>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.forest.get(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a, T> {
    forest: &'a Forest<T>,
    stack: Vec<(Index, bool)>,
}

impl<'a, T> PostOrderIterator<'a, T> {
    fn new(forest: &'a Forest<T>, starts: Vec<Index>) -> Self {
        let stack = starts.into_iter().rev().map(|idx| (idx, false)).collect();
        Self { forest, stack }
    }
}

impl<'a, T> Iterator for PostOrderIterator<'a, T> {
    type Item = (Index, &'a TreeNode<T>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.forest.get(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_starts_detached() {
        let mut forest = Forest::new();
        let idx = forest.insert("a");

        assert!(forest.is_root(idx));
        assert!(forest.children(idx).is_empty());
        assert_eq!(forest.parent(idx), None);
    }

    #[test]
    fn test_link_primitives_are_one_sided() {
        let mut forest = Forest::new();
        let parent = forest.insert("parent");
        let child = forest.insert("child");

        forest.add_child(parent, child);
        assert_eq!(forest.children(parent), &[child]);
        // add_child alone leaves the child a root
        assert!(forest.is_root(child));

        forest.set_parent(child, Some(parent));
        assert!(!forest.is_root(child));
        assert_eq!(forest.parent(child), Some(parent));
    }

    #[test]
    fn test_set_payload_keeps_links() {
        let mut forest = Forest::new();
        let parent = forest.insert(1);
        let child = forest.insert(2);
        forest.set_parent(child, Some(parent));
        forest.add_child(parent, child);

        forest.set_payload(child, 20);

        assert_eq!(forest.payload(child), Some(&20));
        assert_eq!(forest.parent(child), Some(parent));
        assert_eq!(forest.children(parent), &[child]);
    }

    #[test]
    fn test_roots_preserve_insertion_order() {
        let mut forest = Forest::new();
        let a = forest.insert("a");
        let b = forest.insert("b");
        let c = forest.insert("c");
        forest.set_parent(b, Some(a));
        forest.add_child(a, b);

        assert_eq!(forest.roots(), vec![a, c]);
    }
}
