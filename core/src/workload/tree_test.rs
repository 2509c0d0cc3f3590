#[cfg(test)]
mod tests {
    use crate::workload::binary_trees;
    use crate::workload::tree::{TreeArena, TreeNode, check_tree, create_tree, free_tree, perfect_tree_nodes};

    #[test]
    fn test_binary_trees_node_counts() {
        assert_eq!(binary_trees(0), 1);
        assert_eq!(binary_trees(1), 3);
        assert_eq!(binary_trees(3), 15);
        assert_eq!(binary_trees(10), 2047);
    }

    #[test]
    fn test_binary_trees_matches_closed_form() {
        for depth in 0..=16 {
            assert_eq!(binary_trees(depth), perfect_tree_nodes(depth), "depth={depth}");
        }
    }

    #[test]
    fn test_create_tree_layout() {
        let mut arena = TreeArena::new();
        let root = create_tree(&mut arena, 2);
        assert_eq!(arena.len(), 7);
        // children are pushed before their parent, so the root is last
        assert_eq!(root.index(), 6);

        let node = arena.node(root).copied().expect("root exists");
        assert!(!node.is_leaf());
        let left = arena.node(node.left.expect("left child")).copied().expect("left exists");
        assert!(!left.is_leaf());
        let leaf = arena.node(left.left.expect("grandchild")).copied().expect("leaf exists");
        assert!(leaf.is_leaf());
    }

    #[test]
    fn test_check_tree_counts_subtrees() {
        let mut arena = TreeArena::for_depth(4);
        let root = create_tree(&mut arena, 4);
        assert_eq!(check_tree(&arena, root), 31);
        let child = arena.node(root).and_then(|n| n.right).expect("right child");
        assert_eq!(check_tree(&arena, child), 15);
    }

    #[test]
    fn test_check_tree_half_built_node_counts_once() {
        let mut arena = TreeArena::new();
        let subtree = create_tree(&mut arena, 3);
        let left_only = arena.push(TreeNode {
            left: Some(subtree),
            right: None,
        });
        let right_only = arena.push(TreeNode {
            left: None,
            right: Some(subtree),
        });

        assert!(arena.node(left_only).expect("left-only node").is_leaf());
        assert_eq!(check_tree(&arena, left_only), 1);
        assert_eq!(check_tree(&arena, right_only), 1);
        // the subtree itself is still fully counted
        assert_eq!(check_tree(&arena, subtree), 15);
    }

    #[test]
    fn test_free_tree_releases_every_node() {
        let mut arena = TreeArena::for_depth(5);
        create_tree(&mut arena, 5);
        assert_eq!(free_tree(arena), 63);
        assert_eq!(free_tree(TreeArena::new()), 0);
    }

    #[test]
    fn test_for_depth_preallocates_exactly() {
        let mut arena = TreeArena::for_depth(6);
        assert!(arena.is_empty());
        create_tree(&mut arena, 6);
        assert_eq!(arena.len() as u64, perfect_tree_nodes(6));
    }
}
