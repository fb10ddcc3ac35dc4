//! Block-level nodes

use serde::{Deserialize, Serialize};

/// The kind of block node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum BlockKind {
    /// Regular paragraph
    Paragraph,
    /// Heading with level (1-6)
    Heading { level: u8 },
    /// Preformatted code
    CodeBlock,
    /// Bulleted or numbered list, holds list items
    List { ordered: bool },
    /// List item, holds blocks
    ListItem,
    /// Quotation, holds blocks
    Blockquote,
    /// Table, holds rows
    Table,
    /// Table row, holds cells
    TableRow,
    /// Table cell with inline text
    TableCell,
    /// Horizontal rule (atom)
    HorizontalRule,
    /// Image with an intrinsic height (atom)
    Image { height: f32 },
}

impl Default for BlockKind {
    fn default() -> Self {
        BlockKind::Paragraph
    }
}

impl BlockKind {
    /// Containers are descended into when collecting leaf blocks
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            BlockKind::List { .. } | BlockKind::ListItem | BlockKind::Blockquote
        )
    }

    /// Atoms occupy a single position and carry no content
    pub fn is_atom(&self) -> bool {
        matches!(self, BlockKind::HorizontalRule | BlockKind::Image { .. })
    }

    /// Whether this block holds inline text
    pub fn is_textblock(&self) -> bool {
        matches!(
            self,
            BlockKind::Paragraph
                | BlockKind::Heading { .. }
                | BlockKind::CodeBlock
                | BlockKind::TableCell
        )
    }

    /// Get the line height multiplier for this block kind
    pub fn line_height_multiplier(&self) -> f32 {
        match self {
            BlockKind::Heading { level } => match level {
                1 => 1.5,
                2 => 1.4,
                3 => 1.3,
                _ => 1.2,
            },
            _ => 1.0,
        }
    }

    /// Vertical margins as (top, bottom), in line heights
    pub fn margins(&self) -> (f32, f32) {
        match self {
            BlockKind::Paragraph | BlockKind::CodeBlock => (0.0, 1.0),
            BlockKind::Heading { .. } => (0.5, 0.5),
            BlockKind::HorizontalRule => (0.5, 0.5),
            BlockKind::Table => (0.0, 1.0),
            _ => (0.0, 0.0),
        }
    }

    /// Check if this is a heading
    pub fn is_heading(&self) -> bool {
        matches!(self, BlockKind::Heading { .. })
    }
}

/// A node in the block tree
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub kind: BlockKind,
    /// Inline text, only meaningful for text blocks
    #[serde(default)]
    pub text: String,
    /// Child blocks, only meaningful for containers and tables
    #[serde(default)]
    pub children: Vec<Block>,
}

impl Block {
    fn text_node(kind: BlockKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            children: Vec::new(),
        }
    }

    fn container(kind: BlockKind, children: Vec<Block>) -> Self {
        Self {
            kind,
            text: String::new(),
            children,
        }
    }

    /// Create a paragraph
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::text_node(BlockKind::Paragraph, text)
    }

    /// Create a heading, level clamped to 1-6
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Self::text_node(
            BlockKind::Heading {
                level: level.clamp(1, 6),
            },
            text,
        )
    }

    /// Create a code block
    pub fn code(text: impl Into<String>) -> Self {
        Self::text_node(BlockKind::CodeBlock, text)
    }

    /// Create a list; each item is wrapped in a list item
    pub fn list(ordered: bool, items: Vec<Block>) -> Self {
        let items = items
            .into_iter()
            .map(|item| Self::container(BlockKind::ListItem, vec![item]))
            .collect();
        Self::container(BlockKind::List { ordered }, items)
    }

    /// Create a blockquote
    pub fn blockquote(children: Vec<Block>) -> Self {
        Self::container(BlockKind::Blockquote, children)
    }

    /// Create a table from rows of cell text
    pub fn table<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let rows = rows
            .into_iter()
            .map(|row| {
                let cells = row
                    .into_iter()
                    .map(|cell| Self::text_node(BlockKind::TableCell, cell))
                    .collect();
                Self::container(BlockKind::TableRow, cells)
            })
            .collect();
        Self::container(BlockKind::Table, rows)
    }

    /// Create a horizontal rule
    pub fn rule() -> Self {
        Self::text_node(BlockKind::HorizontalRule, "")
    }

    /// Create an image of the given height
    pub fn image(height: f32) -> Self {
        Self::text_node(BlockKind::Image { height }, "")
    }

    /// Number of content positions this node spans
    pub fn node_size(&self) -> usize {
        if self.kind.is_atom() {
            1
        } else if self.kind.is_textblock() {
            self.text.chars().count() + 2
        } else {
            self.children.iter().map(Block::node_size).sum::<usize>() + 2
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_kind() {
        assert!(!BlockKind::Paragraph.is_container());
        assert!(BlockKind::Paragraph.is_textblock());
        assert!(BlockKind::Blockquote.is_container());
        assert!(BlockKind::Image { height: 10.0 }.is_atom());
        assert!(!BlockKind::Table.is_container());
        assert!(BlockKind::Heading { level: 2 }.is_heading());
    }

    #[test]
    fn test_node_size() {
        assert_eq!(Block::paragraph("").node_size(), 2);
        assert_eq!(Block::paragraph("héllo").node_size(), 7);
        assert_eq!(Block::rule().node_size(), 1);

        // list(2) + item(2) + paragraph("ab") = 8
        let list = Block::list(false, vec![Block::paragraph("ab")]);
        assert_eq!(list.node_size(), 8);

        // table(2) + row(2) + two cells of 1 char (3 each) = 10
        let table = Block::table([["a", "b"]]);
        assert_eq!(table.node_size(), 10);
    }

    #[test]
    fn test_heading_level_clamped() {
        assert_eq!(Block::heading(9, "x").kind, BlockKind::Heading { level: 6 });
        assert_eq!(Block::heading(0, "x").kind, BlockKind::Heading { level: 1 });
    }
}
