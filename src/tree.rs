use crate::error::{Error, Result};
use crate::frequency::FrequencyTable;
use slotmap::{DefaultKey, SlotMap};
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// A node of the Huffman tree.
///
/// Children are referenced by arena key; every key is owned by exactly one
/// parent, so the structure is a strict tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TreeNode {
    Leaf {
        symbol: u8,
        weight: u64,
    },

    /// `right` is `None` only for the synthetic root of a one-symbol alphabet.
    Internal {
        weight: u64,
        left: DefaultKey,
        right: Option<DefaultKey>,
    },
}

impl TreeNode {
    pub(crate) fn weight(&self) -> u64 {
        match self {
            TreeNode::Leaf { weight, .. } | TreeNode::Internal { weight, .. } => *weight,
        }
    }
}

/// Heap entry ordered by weight, then by creation order.
#[derive(Debug, Clone, Copy)]
struct Pending {
    weight: u64,
    order: usize,
    key: DefaultKey,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        self.weight
            .cmp(&other.weight)
            .then(self.order.cmp(&other.order))
    }
}

/// Huffman tree stored in a generational arena.
///
/// Built fresh for every encode and decode call. Construction is a pure
/// function of the frequency table's entries and their order, which is what
/// lets the decoder rebuild exactly the tree the encoder used.
#[derive(Debug)]
pub struct HuffmanTree {
    pub(crate) nodes: SlotMap<DefaultKey, TreeNode>,
    pub(crate) root: DefaultKey,
    leaf_count: usize,
}

impl HuffmanTree {
    /// Builds the tree by repeatedly merging the two lightest nodes.
    ///
    /// The first node removed becomes the left child. Equal weights are broken
    /// by creation order: leaves in table order, then internal nodes in the
    /// order they were merged.
    pub fn build(table: &FrequencyTable) -> Result<Self> {
        if table.is_empty() {
            return Err(Error::validation(
                "cannot build a Huffman tree from an empty frequency table",
            ));
        }

        let mut nodes = SlotMap::with_capacity(table.len() * 2);

        if let [only] = table.entries() {
            let left = nodes.insert(TreeNode::Leaf {
                symbol: only.symbol,
                weight: only.count,
            });
            let root = nodes.insert(TreeNode::Internal {
                weight: only.count,
                left,
                right: None,
            });
            return Ok(Self {
                nodes,
                root,
                leaf_count: 1,
            });
        }

        let mut heap = BinaryHeap::with_capacity(table.len());
        let mut order = 0usize;

        for entry in table.entries() {
            let key = nodes.insert(TreeNode::Leaf {
                symbol: entry.symbol,
                weight: entry.count,
            });
            heap.push(Reverse(Pending {
                weight: entry.count,
                order,
                key,
            }));
            order += 1;
        }

        let root = loop {
            let Some(Reverse(left)) = heap.pop() else {
                return Err(Error::validation("Huffman merge ran out of nodes"));
            };
            let Some(Reverse(right)) = heap.pop() else {
                break left.key;
            };
            let weight = left.weight.checked_add(right.weight).ok_or_else(|| {
                Error::validation("symbol frequencies overflow a 64-bit total")
            })?;
            let key = nodes.insert(TreeNode::Internal {
                weight,
                left: left.key,
                right: Some(right.key),
            });
            heap.push(Reverse(Pending { weight, order, key }));
            order += 1;
        };

        Ok(Self {
            nodes,
            root,
            leaf_count: table.len(),
        })
    }

    /// Number of leaves, i.e. distinct symbols.
    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    /// Total weight held at the root.
    pub fn weight(&self) -> u64 {
        self.nodes[self.root].weight()
    }

    /// Follows one edge down from `from`: `false` is left, `true` is right.
    ///
    /// Returns `None` when the edge does not exist (leaves, or the missing
    /// right child of a one-symbol root).
    pub(crate) fn step(&self, from: DefaultKey, bit: bool) -> Option<DefaultKey> {
        match &self.nodes[from] {
            TreeNode::Leaf { .. } => None,
            TreeNode::Internal { left, right, .. } => {
                if bit {
                    *right
                } else {
                    Some(*left)
                }
            }
        }
    }

    /// Returns the symbol if `key` is a leaf.
    pub(crate) fn leaf_symbol(&self, key: DefaultKey) -> Option<u8> {
        match self.nodes[key] {
            TreeNode::Leaf { symbol, .. } => Some(symbol),
            TreeNode::Internal { .. } => None,
        }
    }

    /// Length of the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(self.root, 0usize)];
        while let Some((key, depth)) = stack.pop() {
            match &self.nodes[key] {
                TreeNode::Leaf { .. } => max = max.max(depth),
                TreeNode::Internal { left, right, .. } => {
                    stack.push((*left, depth + 1));
                    if let Some(right) = right {
                        stack.push((*right, depth + 1));
                    }
                }
            }
        }
        max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaves(tree: &HuffmanTree) -> usize {
        tree.nodes
            .values()
            .filter(|n| matches!(n, TreeNode::Leaf { .. }))
            .count()
    }

    #[test]
    fn test_empty_table_rejected() {
        let err = HuffmanTree::build(&FrequencyTable::new()).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_single_symbol_synthetic_root() {
        let tree = HuffmanTree::build(&FrequencyTable::from_symbols(b"AAAA")).unwrap();
        assert_eq!(tree.leaf_count(), 1);
        assert_eq!(tree.weight(), 4);

        let left = tree.step(tree.root, false).expect("root should have a left child");
        assert_eq!(tree.leaf_symbol(left), Some(b'A'));
        assert_eq!(tree.step(tree.root, true), None);
        assert_eq!(tree.depth(), 1);
    }

    #[test]
    fn test_two_symbols() {
        let tree = HuffmanTree::build(&FrequencyTable::from_symbols(b"AAB")).unwrap();
        assert_eq!(leaves(&tree), 2);
        assert_eq!(tree.weight(), 3);

        // Lighter node is removed first and becomes the left child
        let left = tree.step(tree.root, false).unwrap();
        let right = tree.step(tree.root, true).unwrap();
        assert_eq!(tree.leaf_symbol(left), Some(b'B'));
        assert_eq!(tree.leaf_symbol(right), Some(b'A'));
    }

    #[test]
    fn test_ties_follow_table_order() {
        let tree = HuffmanTree::build(&FrequencyTable::from_symbols(b"CA")).unwrap();
        let left = tree.step(tree.root, false).unwrap();
        let right = tree.step(tree.root, true).unwrap();
        assert_eq!(tree.leaf_symbol(left), Some(b'C'));
        assert_eq!(tree.leaf_symbol(right), Some(b'A'));
    }

    #[test]
    fn test_internal_weights_are_sums() {
        let tree = HuffmanTree::build(&FrequencyTable::from_symbols(b"ABRACADABRA")).unwrap();
        for node in tree.nodes.values() {
            if let TreeNode::Internal { weight, left, right } = node {
                let right_weight = right.map(|r| tree.nodes[r].weight()).unwrap_or(0);
                assert_eq!(*weight, tree.nodes[*left].weight() + right_weight);
                assert!(right.is_some(), "only a one-symbol root lacks a right child");
            }
        }
        assert_eq!(leaves(&tree), 5);
        assert_eq!(tree.weight(), 11);
    }

    #[test]
    fn test_rebuild_is_identical() {
        let table = FrequencyTable::from_symbols(b"the quick brown fox jumps over the lazy dog");
        let first = HuffmanTree::build(&table).unwrap();
        let second = HuffmanTree::build(&table).unwrap();
        assert_eq!(first.root, second.root);
        assert_eq!(first.nodes.len(), second.nodes.len());
        for (key, node) in &first.nodes {
            assert_eq!(Some(node), second.nodes.get(key));
        }
    }

    #[test]
    fn test_weight_overflow_rejected() {
        let mut table = FrequencyTable::new();
        table.add(b'A', u64::MAX);
        table.add(b'B', 1);
        let err = HuffmanTree::build(&table).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_skewed_depth() {
        // Fibonacci weights produce a maximally skewed tree
        let mut table = FrequencyTable::new();
        let (mut a, mut b) = (1u64, 1u64);
        for symbol in 0..20u8 {
            table.add(symbol, a);
            let next = a + b;
            a = b;
            b = next;
        }
        let tree = HuffmanTree::build(&table).unwrap();
        assert_eq!(tree.depth(), 19);
    }
}
