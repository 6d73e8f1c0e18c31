use std::fmt::Display;

use generational_arena::Index;
use termtree::Tree;
use tracing::instrument;

use crate::arena::Forest;

/// Conversion of assembled forests into printable termtree structures.
pub trait TreeRender {
    /// Printable tree for the subtree rooted at `root`.
    fn subtree_to_tree(&self, root: Index) -> Tree<String>;

    /// Printable trees, one per root, in root order.
    fn to_trees(&self) -> Vec<Tree<String>>;
}

impl<T: Display> TreeRender for Forest<T> {
    #[instrument(level = "debug", skip(self))]
    fn subtree_to_tree(&self, root: Index) -> Tree<String> {
        fn build<T: Display>(forest: &Forest<T>, idx: Index, parent_tree: &mut Tree<String>) {
            for &child_idx in forest.children(idx) {
                if let Some(child) = forest.get(child_idx) {
                    let mut child_tree = Tree::new(child.payload.to_string());
                    build(forest, child_idx, &mut child_tree);
                    parent_tree.push(child_tree);
                }
            }
        }

        match self.get(root) {
            Some(node) => {
                let mut tree = Tree::new(node.payload.to_string());
                build(self, root, &mut tree);
                tree
            }
            None => Tree::new("<empty>".to_string()),
        }
    }

    #[instrument(level = "debug", skip(self))]
    fn to_trees(&self) -> Vec<Tree<String>> {
        self.roots()
            .into_iter()
            .map(|root| self.subtree_to_tree(root))
            .collect()
    }
}
