use crate::tree::{HuffmanTree, TreeNode};

/// The bit code assigned to one symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTableEntry {
    pub symbol: u8,
    /// Never empty; `false` is a `0` bit.
    pub code: Vec<bool>,
}

/// Symbol to bit-code mapping derived from a [`HuffmanTree`].
#[derive(Debug, Clone)]
pub struct CodeTable {
    /// Entries in pre-order leaf order
    entries: Vec<CodeTableEntry>,
    lookup: [Option<u16>; 256],
}

impl CodeTable {
    /// Walks the tree in pre-order, appending `0` on left edges and `1` on
    /// right edges.
    ///
    /// Uses an explicit stack; skewed trees can be as deep as the alphabet is
    /// large.
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut entries = Vec::with_capacity(tree.leaf_count());
        let mut lookup = [None; 256];
        let mut stack: Vec<(slotmap::DefaultKey, Vec<bool>)> = vec![(tree.root, Vec::new())];

        while let Some((key, prefix)) = stack.pop() {
            match &tree.nodes[key] {
                TreeNode::Leaf { symbol, .. } => {
                    let code = if prefix.is_empty() { vec![false] } else { prefix };
                    lookup[*symbol as usize] = Some(entries.len() as u16);
                    entries.push(CodeTableEntry {
                        symbol: *symbol,
                        code,
                    });
                }
                TreeNode::Internal { left, right, .. } => {
                    // Right is pushed first so the left subtree is visited first
                    if let Some(right) = right {
                        let mut code = prefix.clone();
                        code.push(true);
                        stack.push((*right, code));
                    }
                    let mut code = prefix;
                    code.push(false);
                    stack.push((*left, code));
                }
            }
        }

        Self { entries, lookup }
    }

    /// Returns the code for `symbol`, if the symbol has a leaf in the tree.
    pub fn code(&self, symbol: u8) -> Option<&[bool]> {
        self.lookup[symbol as usize].map(|slot| self.entries[slot as usize].code.as_slice())
    }

    pub fn entries(&self) -> &[CodeTableEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of bits needed to encode `symbols`, or `None` if a symbol has no code.
    pub fn encoded_bits(&self, symbols: &[u8]) -> Option<u64> {
        symbols
            .iter()
            .map(|&s| self.code(s).map(|c| c.len() as u64))
            .sum()
    }
}
