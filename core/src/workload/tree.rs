//! Perfect binary trees stored in an arena.
//!
//! Children are indices into the arena rather than individual boxes, so a
//! whole tree is released by dropping one `Vec`.

use tracing::trace;

/// Index of a node inside a [`TreeArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TreeNode {
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() || self.right.is_none()
    }
}

#[derive(Debug, Default)]
pub struct TreeArena {
    nodes: Vec<TreeNode>,
}

impl TreeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arena pre-sized for a perfect tree of `depth`.
    pub fn for_depth(depth: u32) -> Self {
        Self {
            nodes: Vec::with_capacity(perfect_tree_nodes(depth) as usize),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id.index())
    }

    pub(crate) fn push(&mut self, node: TreeNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }
}

/// Number of nodes in a perfect binary tree of `depth`: `2^(depth+1) - 1`.
pub fn perfect_tree_nodes(depth: u32) -> u64 {
    (1u64 << (depth + 1)) - 1
}

/// Build a perfect tree of `depth` and return its root. Depth 0 is a single
/// childless node; children are pushed before their parent.
pub fn create_tree(arena: &mut TreeArena, depth: u32) -> NodeId {
    if depth == 0 {
        return arena.push(TreeNode::default());
    }
    let left = create_tree(arena, depth - 1);
    let right = create_tree(arena, depth - 1);
    arena.push(TreeNode {
        left: Some(left),
        right: Some(right),
    })
}

/// Count nodes reachable from `id`. A node missing either child counts as 1.
pub fn check_tree(arena: &TreeArena, id: NodeId) -> u64 {
    let Some(node) = arena.node(id) else {
        return 0;
    };
    match (node.left, node.right) {
        (Some(left), Some(right)) => 1 + check_tree(arena, left) + check_tree(arena, right),
        _ => 1,
    }
}

/// Release every node of the arena at once, returning how many were freed.
pub fn free_tree(arena: TreeArena) -> usize {
    let released = arena.len();
    drop(arena);
    released
}

/// Build, check, then release a perfect tree of `depth`.
pub fn binary_trees(depth: u32) -> u64 {
    let mut arena = TreeArena::for_depth(depth);
    let root = create_tree(&mut arena, depth);
    let count = check_tree(&arena, root);
    let released = free_tree(arena);
    trace!(target: "nbench::workload", depth, count, released, "binary_trees.done");
    count
}
