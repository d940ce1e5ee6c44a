//! Huffman tree construction.
//!
//! The tree is built by the classic greedy merge: repeatedly take the two
//! lightest nodes from a priority queue and join them under a new internal
//! node. Queue order is fully deterministic:
//!
//! 1. ascending weight,
//! 2. at equal weight, internal (already merged) nodes before leaves,
//! 3. then ascending creation order (leaves in symbol order, internal nodes
//!    in the order they were merged).
//!
//! The first node taken in a merge becomes the left (`0`) child.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use haagenti_core::{Error, Result};

use crate::frequency::FrequencyTable;

/// A node of the encoder-side Huffman tree.
///
/// Each parent exclusively owns its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A symbol and its frequency.
    Leaf { symbol: u8, weight: u64 },
    /// Merged subtree. `right` is only absent under the synthetic root built
    /// for a single-symbol alphabet.
    Internal {
        weight: u64,
        left: Box<Node>,
        right: Option<Box<Node>>,
    },
}

impl Node {
    /// Combined frequency of everything below this node.
    #[inline]
    pub fn weight(&self) -> u64 {
        match self {
            Node::Leaf { weight, .. } | Node::Internal { weight, .. } => *weight,
        }
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    fn merge(left: Node, right: Node) -> Node {
        Node::Internal {
            weight: left.weight() + right.weight(),
            left: Box::new(left),
            right: Some(Box::new(right)),
        }
    }

    fn leaf_count(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Internal { left, right, .. } => {
                left.leaf_count() + right.as_ref().map_or(0, |r| r.leaf_count())
            }
        }
    }
}

/// Priority queue entry. `BinaryHeap` is a max-heap, so ordering is reversed.
#[derive(Debug)]
struct QueueEntry {
    seq: u32,
    node: Node,
}

impl QueueEntry {
    #[inline]
    fn key(&self) -> (u64, bool, u32) {
        // false < true puts internal nodes ahead of leaves on equal weight
        (self.node.weight(), self.node.is_leaf(), self.seq)
    }
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
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
        other.key().cmp(&self.key())
    }
}

/// Encoder-side Huffman tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    root: Node,
}

impl HuffmanTree {
    /// Build the optimal prefix-code tree for `frequencies`.
    ///
    /// Requires at least one symbol with a non-zero count. A single-symbol
    /// alphabet produces one leaf under a synthetic internal root so that the
    /// symbol still gets a one-bit code.
    pub fn build(frequencies: &FrequencyTable) -> Result<Self> {
        if frequencies.is_empty() {
            return Err(Error::invalid_input(
                "cannot build a Huffman tree without symbols",
            ));
        }

        let mut heap = BinaryHeap::with_capacity(frequencies.distinct_symbols());
        let mut seq = 0u32;
        for (symbol, weight) in frequencies.present() {
            heap.push(QueueEntry {
                seq,
                node: Node::Leaf { symbol, weight },
            });
            seq += 1;
        }

        if heap.len() == 1 {
            let only = heap
                .pop()
                .ok_or_else(|| Error::invalid_input("empty priority queue"))?;
            let root = Node::Internal {
                weight: only.node.weight(),
                left: Box::new(only.node),
                right: None,
            };
            return Ok(Self { root });
        }

        while heap.len() > 1 {
            let (Some(first), Some(second)) = (heap.pop(), heap.pop()) else {
                break;
            };
            heap.push(QueueEntry {
                seq,
                node: Node::merge(first.node, second.node),
            });
            seq += 1;
        }

        let root = heap
            .pop()
            .map(|entry| entry.node)
            .ok_or_else(|| Error::invalid_input("empty priority queue"))?;
        Ok(Self { root })
    }

    /// Root node.
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Total weight (number of input bytes the tree was built from).
    pub fn weight(&self) -> u64 {
        self.root.weight()
    }

    /// Number of leaves, i.e. distinct symbols.
    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }
}
