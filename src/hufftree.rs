use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;

use crate::bit_io::BitReader;
use crate::error::{CodecError, Result};
use crate::frequency::FrequencyTable;
use crate::min_heap::MinHeap;

/// Symbol -> code, in ascending symbol order.
pub type CodeMap = BTreeMap<u8, Code>;

/// Root-to-leaf path of one symbol: `false` is a left step, `true` a right one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Code {
    bits: Vec<bool>,
}

impl Code {
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().copied()
    }

    pub fn is_prefix_of(&self, other: &Code) -> bool {
        other.bits.starts_with(&self.bits)
    }
}

impl From<Vec<bool>> for Code {
    fn from(bits: Vec<bool>) -> Self {
        Code { bits }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.iter() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffNode {
    Leaf {
        weight: u64,
        byte: u8,
    },
    Internal {
        weight: u64,
        left: Box<HuffNode>,
        right: Box<HuffNode>,
    },
}

impl HuffNode {
    pub fn new(b: u8, f: u64) -> Self {
        HuffNode::Leaf { weight: f, byte: b }
    }

    pub fn weight(&self) -> u64 {
        match self {
            HuffNode::Leaf { weight, .. } => *weight,
            HuffNode::Internal { weight, .. } => *weight,
        }
    }

    pub fn merge(a: Self, b: Self) -> Self {
        // a is the smaller node and goes left
        let weight = a.weight() + b.weight();
        HuffNode::Internal {
            weight,
            left: Box::new(a),
            right: Box::new(b),
        }
    }
}

/// Heap key: weight first, then the order the node entered the heap.
///
/// Leaves enter in ascending symbol order and every merged node gets the next
/// sequence number, so the same table always yields the same tree.
#[derive(Debug)]
struct HeapEntry {
    weight: u64,
    order: usize,
    node: HuffNode,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.weight
            .cmp(&other.weight)
            .then(self.order.cmp(&other.order))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    root: HuffNode,
}

impl HuffmanTree {
    /// Greedy Huffman construction. Returns `None` for an empty table.
    pub fn build(table: &FrequencyTable) -> Option<Self> {
        let leaves: Vec<HeapEntry> = table
            .iter()
            .enumerate()
            .map(|(order, (byte, count))| HeapEntry {
                weight: count as u64,
                order,
                node: HuffNode::new(byte, count as u64),
            })
            .collect();

        let mut next_order = leaves.len();
        let mut heap = MinHeap::build(leaves);

        while heap.heap_size() > 1 {
            let x = heap.extract_min()?;
            let y = heap.extract_min()?;

            let z = HuffNode::merge(x.node, y.node);
            heap.insert(HeapEntry {
                weight: z.weight(),
                order: next_order,
                node: z,
            });
            next_order += 1;
        }

        let root = heap.extract_min()?.node;
        Some(HuffmanTree { root })
    }

    pub fn root(&self) -> &HuffNode {
        &self.root
    }

    /// Sum of all leaf weights.
    pub fn weight(&self) -> u64 {
        self.root.weight()
    }

    pub fn leaf_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            match node {
                HuffNode::Leaf { .. } => count += 1,
                HuffNode::Internal { left, right, .. } => {
                    stack.push(right);
                    stack.push(left);
                }
            }
        }
        count
    }

    /// Longest root-to-leaf path. A lone leaf still has depth 1, since its
    /// code is one bit long.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(&self.root, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            match node {
                HuffNode::Leaf { .. } => deepest = deepest.max(depth),
                HuffNode::Internal { left, right, .. } => {
                    stack.push((&**right, depth + 1));
                    stack.push((&**left, depth + 1));
                }
            }
        }
        deepest.max(1)
    }

    pub fn derive_codes(&self) -> CodeMap {
        let mut codes = CodeMap::new();

        if let HuffNode::Leaf { byte, .. } = &self.root {
            codes.insert(*byte, Code::from(vec![false]));
            return codes;
        }

        let mut stack = vec![(&self.root, Vec::new())];
        while let Some((node, path)) = stack.pop() {
            match node {
                HuffNode::Leaf { byte, .. } => {
                    codes.insert(*byte, Code::from(path));
                }
                HuffNode::Internal { left, right, .. } => {
                    let mut right_path = path.clone();
                    right_path.push(true);
                    stack.push((&**right, right_path));

                    let mut left_path = path;
                    left_path.push(false);
                    stack.push((&**left, left_path));
                }
            }
        }

        codes
    }

    /// Reads bits until a leaf is reached. A single-leaf tree consumes
    /// exactly one bit per symbol.
    pub fn decode_symbol<R: Read>(&self, reader: &mut BitReader<R>) -> Result<u8> {
        let mut current_node = &self.root;

        if let HuffNode::Leaf { byte, .. } = current_node {
            return match reader.read_bit()? {
                Some(_) => Ok(*byte),
                None => Err(CodecError::TruncatedStream),
            };
        }

        loop {
            match current_node {
                HuffNode::Leaf { byte, .. } => return Ok(*byte),
                HuffNode::Internal { left, right, .. } => {
                    let bit = reader.read_bit()?.ok_or(CodecError::TruncatedStream)?;
                    current_node = if bit { &**right } else { &**left };
                }
            }
        }
    }
}

impl Drop for HuffmanTree {
    // unlinks the tree iteratively instead of recursing through nested boxes
    fn drop(&mut self) {
        let mut stack = vec![std::mem::replace(&mut self.root, HuffNode::new(0, 0))];
        while let Some(node) = stack.pop() {
            if let HuffNode::Internal { left, right, .. } = node {
                stack.push(*left);
                stack.push(*right);
            }
        }
    }
}

impl fmt::Display for HuffmanTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack = vec![(&self.root, 0usize, "root")];
        while let Some((node, depth, label)) = stack.pop() {
            let indent = "  ".repeat(depth);
            match node {
                HuffNode::Leaf { byte, weight } => {
                    writeln!(
                        f,
                        "{}{} -> leaf {:#04x} [weight: {}]",
                        indent, label, byte, weight
                    )?;
                }
                HuffNode::Internal { weight, left, right } => {
                    writeln!(f, "{}{} -> internal [weight: {}]", indent, label, weight)?;
                    stack.push((&**right, depth + 1, "R"));
                    stack.push((&**left, depth + 1, "L"));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::bit_io::BitWriter;

    fn tree_for(input: &[u8]) -> HuffmanTree {
        let table = FrequencyTable::compute(input).unwrap();
        HuffmanTree::build(&table).unwrap()
    }

    fn assert_prefix_free(codes: &CodeMap) {
        for (a, code_a) in codes {
            for (b, code_b) in codes {
                if a != b {
                    assert!(
                        !code_a.is_prefix_of(code_b),
                        "{} ({}) is a prefix of {} ({})",
                        a,
                        code_a,
                        b,
                        code_b
                    );
                }
            }
        }
    }

    #[test]
    fn test_empty_table_has_no_tree() {
        assert!(HuffmanTree::build(&FrequencyTable::default()).is_none());
    }

    #[test]
    fn test_single_symbol_gets_one_bit_code() {
        let tree = tree_for(b"aaaa");
        assert_eq!(tree.leaf_count(), 1);
        assert_eq!(tree.weight(), 4);
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.root(), &HuffNode::new(b'a', 4));

        let codes = tree.derive_codes();
        assert_eq!(codes.len(), 1);
        assert_eq!(codes[&b'a'].to_string(), "0");
    }

    #[test]
    fn test_known_code_lengths() {
        let tree = tree_for(b"aabbbcccc");
        match tree.root() {
            HuffNode::Internal { weight, left, .. } => {
                assert_eq!(*weight, 9);
                assert_eq!(**left, HuffNode::new(b'c', 4));
            }
            leaf => panic!("expected an internal root, got {:?}", leaf),
        }
        let codes = tree.derive_codes();

        assert_eq!(codes[&b'c'].len(), 1);
        assert_eq!(codes[&b'a'].len(), 2);
        assert_eq!(codes[&b'b'].len(), 2);
        // a(2) and b(3) merge first, so a takes the left branch under it
        assert_eq!(codes[&b'c'].to_string(), "0");
        assert_eq!(codes[&b'a'].to_string(), "10");
        assert_eq!(codes[&b'b'].to_string(), "11");
    }

    #[test]
    fn test_root_weight_is_frequency_sum() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let len = rng.gen_range(1..2000);
            let alphabet = rng.gen_range(1..=255u8);
            let input: Vec<u8> = (0..len).map(|_| rng.gen_range(0..alphabet)).collect();
            let table = FrequencyTable::compute(&input).unwrap();
            let tree = HuffmanTree::build(&table).unwrap();
            assert_eq!(tree.weight(), table.total());
            assert_eq!(tree.leaf_count(), table.len());
        }
    }

    #[test]
    fn test_codes_are_prefix_free() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let len = rng.gen_range(2..4000);
            let input: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
            let codes = tree_for(&input).derive_codes();
            assert_eq!(codes.len(), FrequencyTable::compute(&input).unwrap().len());
            assert_prefix_free(&codes);
        }
    }

    #[test]
    fn test_tied_weights_build_identical_trees() {
        // every symbol occurs exactly twice, so every merge is a tie
        let input: Vec<u8> = (0..=255u8).chain(0..=255u8).collect();
        let table = FrequencyTable::compute(&input).unwrap();

        let first = HuffmanTree::build(&table).unwrap();
        let second = HuffmanTree::build(&table.clone()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.derive_codes(), second.derive_codes());
        // 256 equal weights make a perfectly balanced tree
        assert!(first.derive_codes().values().all(|c| c.len() == 8));
    }

    #[test]
    fn test_skewed_tree() {
        // fibonacci-like counts give one new level per symbol
        let mut input = Vec::new();
        let (mut a, mut b) = (1usize, 1usize);
        for symbol in 0..20u8 {
            input.extend(std::iter::repeat(symbol).take(a));
            let next = a + b;
            a = b;
            b = next;
        }
        let tree = tree_for(&input);
        assert_eq!(tree.depth(), 19);
        assert_prefix_free(&tree.derive_codes());
    }

    #[test]
    fn test_decode_symbol_follows_codes() {
        let input = b"abracadabra";
        let tree = tree_for(input);
        let codes = tree.derive_codes();

        let mut writer = BitWriter::new(Vec::new());
        for byte in input {
            writer.write_code(&codes[byte]).unwrap();
        }
        let bytes = writer.finish().unwrap();

        let mut reader = BitReader::new(Cursor::new(bytes));
        let decoded: Vec<u8> = (0..input.len())
            .map(|_| tree.decode_symbol(&mut reader).unwrap())
            .collect();
        assert_eq!(decoded, input);
    }

    #[test]
    fn test_decode_symbol_reports_exhaustion() {
        let tree = tree_for(b"aabbbcccc");
        let mut reader = BitReader::new(Cursor::new(Vec::new()));
        let err = tree.decode_symbol(&mut reader).unwrap_err();
        assert!(matches!(err, CodecError::TruncatedStream));

        let single = tree_for(b"zz");
        let mut reader = BitReader::new(Cursor::new(Vec::new()));
        assert!(matches!(
            single.decode_symbol(&mut reader),
            Err(CodecError::TruncatedStream)
        ));
    }

    #[test]
    fn test_display_lists_every_node() {
        let tree = tree_for(b"aabbbcccc");
        let rendered = tree.to_string();
        assert_eq!(rendered.lines().count(), 5);
        assert!(rendered.starts_with("root -> internal [weight: 9]"));
    }
}
