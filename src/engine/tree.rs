use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::engine::frequency::FrequencyTable;

pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf {
        symbol: u8,
        weight: u64,
    },
    Internal {
        weight: u64,
        left: NodeId,
        right: NodeId,
    },
}

impl Node {
    pub fn weight(&self) -> u64 {
        match self {
            Node::Leaf { weight, .. } => *weight,
            Node::Internal { weight, .. } => *weight,
        }
    }
}

/// Pending subtree in the merge queue.
///
/// Ordered by weight, then by arrival: leaves arrive in ascending byte order,
/// every merged node arrives after all nodes already queued. The smallest entry
/// pops first.
#[derive(Debug, Clone, Copy)]
struct QueueEntry {
    weight: u64,
    arrival: usize,
    node: NodeId,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight && self.arrival == other.arrival
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse for min-heap
        other
            .weight
            .cmp(&self.weight)
            .then_with(|| other.arrival.cmp(&self.arrival))
    }
}

/// Huffman tree stored as an arena. Every internal node owns exactly two
/// children by index; the root is always the last node pushed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl HuffmanTree {
    /// Build the tree for every symbol with a nonzero count.
    ///
    /// Returns `None` for an empty table. A table with one distinct symbol
    /// yields a tree whose root is that leaf.
    pub fn build(frequencies: &FrequencyTable) -> Option<Self> {
        let leaf_count = frequencies.distinct();
        if leaf_count == 0 {
            return None;
        }

        let mut nodes = Vec::with_capacity(2 * leaf_count - 1);
        let mut queue = BinaryHeap::with_capacity(leaf_count);

        for (symbol, weight) in frequencies.symbols() {
            let id = nodes.len();
            nodes.push(Node::Leaf { symbol, weight });
            queue.push(QueueEntry {
                weight,
                arrival: id,
                node: id,
            });
        }

        while queue.len() > 1 {
            let (Some(left), Some(right)) = (queue.pop(), queue.pop()) else {
                break;
            };

            // Tables whose total overflows never reach the decoder
            let weight = left.weight.saturating_add(right.weight);
            let id = nodes.len();
            nodes.push(Node::Internal {
                weight,
                left: left.node,
                right: right.node,
            });
            queue.push(QueueEntry {
                weight,
                arrival: id,
                node: id,
            });
        }

        let root = queue.pop()?.node;
        Some(Self { nodes, root })
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Follow one edge: `false` goes left, `true` goes right.
    /// `None` when `id` is a leaf or out of range.
    pub fn child(&self, id: NodeId, bit: bool) -> Option<NodeId> {
        match self.nodes.get(id)? {
            Node::Leaf { .. } => None,
            Node::Internal { left, right, .. } => Some(if bit { *right } else { *left }),
        }
    }

    pub fn symbol(&self, id: NodeId) -> Option<u8> {
        match self.nodes.get(id)? {
            Node::Leaf { symbol, .. } => Some(*symbol),
            Node::Internal { .. } => None,
        }
    }

    pub fn is_leaf(&self, id: NodeId) -> bool {
        matches!(self.nodes.get(id), Some(Node::Leaf { .. }))
    }

    /// True when the whole tree is one leaf
    pub fn is_single_leaf(&self) -> bool {
        self.is_leaf(self.root)
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, Node::Leaf { .. }))
            .count()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Length of the longest root-to-leaf path
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(self.root, 0usize)];

        while let Some((id, depth)) = stack.pop() {
            match &self.nodes[id] {
                Node::Leaf { .. } => max_depth = max_depth.max(depth),
                Node::Internal { left, right, .. } => {
                    stack.push((*left, depth + 1));
                    stack.push((*right, depth + 1));
                }
            }
        }

        max_depth
    }
}
