//! Block tree document model
//!
//! The pagination engine treats the document as opaque apart from content
//! positions, leaf traversal and a version that changes on every mutation.
//! This model provides exactly that for hosts that don't bring their own.

mod block;

pub use block::{Block, BlockKind};

use serde::{Deserialize, Serialize};

/// Position in the document content.
///
/// Every non-atom node opens and closes with one position, text counts one
/// position per char, atoms take a single position.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ContentPos(pub usize);

/// A leaf block found during traversal
#[derive(Debug, Clone, Copy)]
pub struct LeafBlock<'a> {
    /// Position immediately before the block
    pub pos: ContentPos,
    /// Container nesting depth
    pub depth: usize,
    pub block: &'a Block,
}

/// The main document structure
#[derive(Debug, Clone)]
pub struct Document {
    blocks: Vec<Block>,
    /// Monotonic version counter
    version: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document holding a single empty paragraph
    pub fn new() -> Self {
        Self::from_blocks(vec![Block::paragraph("")])
    }

    /// Create a document from top-level blocks
    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        Self { blocks, version: 0 }
    }

    /// Create a document with one paragraph per line
    pub fn from_text(text: &str) -> Self {
        Self::from_blocks(text.split('\n').map(Block::paragraph).collect())
    }

    /// Get the document version
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Top-level blocks
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Number of top-level blocks
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Check if the document has no blocks at all
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Size of the document content in positions
    pub fn content_size(&self) -> usize {
        self.blocks.iter().map(Block::node_size).sum()
    }

    /// Append a top-level block
    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
        self.version += 1;
    }

    /// Insert a top-level block, clamping the index to the end
    pub fn insert(&mut self, index: usize, block: Block) {
        let index = index.min(self.blocks.len());
        self.blocks.insert(index, block);
        self.version += 1;
    }

    /// Remove a top-level block
    pub fn remove(&mut self, index: usize) -> Option<Block> {
        if index >= self.blocks.len() {
            return None;
        }
        self.version += 1;
        Some(self.blocks.remove(index))
    }

    /// Replace the text of the text block at `pos`
    pub fn set_text(&mut self, pos: ContentPos, text: impl Into<String>) -> bool {
        let Some(block) = find_mut(&mut self.blocks, 0, pos.0) else {
            return false;
        };
        if !block.kind.is_textblock() {
            return false;
        }
        block.text = text.into();
        self.version += 1;
        true
    }

    /// Leaf blocks in document order.
    ///
    /// Lists, list items and blockquotes are descended into; tables, text
    /// blocks and atoms are leaves.
    pub fn leaf_blocks(&self) -> Vec<LeafBlock<'_>> {
        let mut leaves = Vec::new();
        collect_leaves(&self.blocks, 0, 0, &mut leaves);
        leaves
    }

    /// Find the leaf block starting at `pos`
    pub fn leaf_at(&self, pos: ContentPos) -> Option<LeafBlock<'_>> {
        self.leaf_blocks().into_iter().find(|leaf| leaf.pos == pos)
    }
}

fn collect_leaves<'a>(
    blocks: &'a [Block],
    start: usize,
    depth: usize,
    out: &mut Vec<LeafBlock<'a>>,
) {
    let mut pos = start;
    for block in blocks {
        if block.kind.is_container() {
            collect_leaves(&block.children, pos + 1, depth + 1, out);
        } else {
            out.push(LeafBlock {
                pos: ContentPos(pos),
                depth,
                block,
            });
        }
        pos += block.node_size();
    }
}

fn find_mut(blocks: &mut [Block], start: usize, target: usize) -> Option<&mut Block> {
    let mut pos = start;
    for block in blocks {
        let size = block.node_size();
        if pos == target {
            return Some(block);
        }
        if target > pos && target < pos + size && !block.kind.is_atom() {
            return find_mut(&mut block.children, pos + 1, target);
        }
        pos += size;
    }
    None
}
