use crate::engine::frequency::FrequencyTable;
use crate::engine::tree::{HuffmanTree, Node};
use crate::utils::limits::ALPHABET_SIZE;

/// Root-to-leaf path, `false` = left, `true` = right.
pub type Code = Vec<bool>;

/// Code for every symbol present in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: Vec<Option<Code>>,
}

impl CodeTable {
    pub fn empty() -> Self {
        Self {
            codes: vec![None; ALPHABET_SIZE],
        }
    }

    /// Derive codes by walking the tree depth-first.
    ///
    /// A single-leaf tree has no edges, so its symbol gets the code `0`.
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut table = Self::empty();

        if let Some(Node::Leaf { symbol, .. }) = tree.node(tree.root()) {
            table.codes[*symbol as usize] = Some(vec![false]);
            return table;
        }

        let mut path: Vec<bool> = Vec::new();
        let mut stack = vec![(tree.root(), 0usize, None::<bool>)];

        while let Some((id, depth, edge)) = stack.pop() {
            path.truncate(depth.saturating_sub(1));
            if let Some(bit) = edge {
                path.push(bit);
            }

            match tree.node(id) {
                Some(Node::Leaf { symbol, .. }) => {
                    table.codes[*symbol as usize] = Some(path.clone());
                }
                Some(Node::Internal { left, right, .. }) => {
                    stack.push((*right, depth + 1, Some(true)));
                    stack.push((*left, depth + 1, Some(false)));
                }
                None => {}
            }
        }

        table
    }

    pub fn get(&self, symbol: u8) -> Option<&[bool]> {
        self.codes[symbol as usize].as_deref()
    }

    /// Number of symbols with a code
    pub fn len(&self) -> usize {
        self.codes.iter().filter(|code| code.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(symbol, code)` pairs in ascending symbol order.
    pub fn entries(&self) -> impl Iterator<Item = (u8, &[bool])> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(symbol, code)| code.as_deref().map(|code| (symbol as u8, code)))
    }

    /// Exact bit length of the payload for `frequencies`, `None` on overflow
    /// or when a counted symbol has no code.
    pub fn encoded_bits(&self, frequencies: &FrequencyTable) -> Option<u64> {
        frequencies.symbols().try_fold(0u64, |acc, (symbol, count)| {
            let len = self.get(symbol)?.len() as u64;
            acc.checked_add(count.checked_mul(len)?)
        })
    }
}

/// Render a code as a string of `0` and `1`.
pub fn code_to_string(code: &[bool]) -> String {
    code.iter().map(|&bit| if bit { '1' } else { '0' }).collect()
}
