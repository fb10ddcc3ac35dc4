//! In-memory view that stacks a [`Document`] into a single column
//!
//! Blocks are laid out top to bottom with fixed text metrics; mounted
//! decorations take up real space, so measuring after a commit sees the
//! same shifted geometry a browser would.

use super::{EditorView, ElementBox, MountedRegion, RegionKind, TextMetrics};
use crate::document::{Block, BlockKind, ContentPos, Document, LeafBlock};
use crate::layout::PageGeometry;
use crate::render::PaginationPlan;
use crate::Rect;
use rustc_hash::{FxHashMap, FxHashSet};

/// Visual constants of the simulated surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceStyle {
    /// Width available to top-level blocks
    pub content_width: f32,
    /// Padding above the first block; the first page's top margin
    pub padding_top: f32,
    pub metrics: TextMetrics,
    /// Indentation per container level
    pub indent: f32,
    pub rule_height: f32,
    /// Vertical padding inside each table row, per side
    pub cell_padding: f32,
}

impl Default for SurfaceStyle {
    fn default() -> Self {
        Self {
            content_width: 602.0, // 210mm at 96 DPI less two 1" margins
            padding_top: 96.0,
            metrics: TextMetrics::default(),
            indent: 24.0,
            rule_height: 2.0,
            cell_padding: 4.0,
        }
    }
}

impl SurfaceStyle {
    /// Default style whose padding matches the page's top margin
    pub fn for_geometry(geometry: &PageGeometry) -> Self {
        Self {
            padding_top: geometry.margin_top,
            ..Self::default()
        }
    }

    /// Margin-box extents of a leaf as (margin_top, height, margin_bottom)
    fn block_box(&self, leaf: &LeafBlock<'_>) -> (f32, f32, f32) {
        let kind = &leaf.block.kind;
        let line_height = self.metrics.line_height * kind.line_height_multiplier();
        let (above, below) = kind.margins();
        let width = (self.content_width - leaf.depth as f32 * self.indent).max(self.metrics.char_width);

        let height = match kind {
            BlockKind::CodeBlock => leaf.block.text.split('\n').count() as f32 * line_height,
            BlockKind::HorizontalRule => self.rule_height,
            BlockKind::Image { height } => *height,
            BlockKind::Table => self.table_height(leaf.block, width),
            _ => self.metrics.line_count(&leaf.block.text, width) as f32 * line_height,
        };

        (
            above * self.metrics.line_height,
            height,
            below * self.metrics.line_height,
        )
    }

    fn table_height(&self, table: &Block, width: f32) -> f32 {
        table
            .children
            .iter()
            .map(|row| {
                let cell_width = width / row.children.len().max(1) as f32;
                let lines = row
                    .children
                    .iter()
                    .map(|cell| self.metrics.line_count(&cell.text, cell_width))
                    .max()
                    .unwrap_or(1);
                lines as f32 * self.metrics.line_height + 2.0 * self.cell_padding
            })
            .sum()
    }
}

/// A [`EditorView`] over an owned [`Document`]
#[derive(Debug)]
pub struct SimulatedView {
    document: Document,
    style: SurfaceStyle,
    elements: FxHashMap<ContentPos, ElementBox>,
    regions: Vec<MountedRegion>,
    applied: PaginationPlan,
    detached: FxHashSet<ContentPos>,
    height: f32,
    applies: u64,
}

impl SimulatedView {
    pub fn new(document: Document, style: SurfaceStyle) -> Self {
        let mut view = Self {
            document,
            style,
            elements: FxHashMap::default(),
            regions: Vec::new(),
            applied: PaginationPlan::default(),
            detached: FxHashSet::default(),
            height: 0.0,
            applies: 0,
        };
        view.relayout();
        view
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn style(&self) -> &SurfaceStyle {
        &self.style
    }

    /// Mutate the document and re-render
    pub fn edit<R>(&mut self, f: impl FnOnce(&mut Document) -> R) -> R {
        let result = f(&mut self.document);
        self.relayout();
        result
    }

    /// Change the column width, as a container resize would
    pub fn set_content_width(&mut self, width: f32) {
        self.style.content_width = width;
        self.relayout();
    }

    /// Take the element for `pos` off the surface
    pub fn detach(&mut self, pos: ContentPos) {
        self.detached.insert(pos);
        self.relayout();
    }

    pub fn reattach(&mut self, pos: ContentPos) {
        self.detached.remove(&pos);
        self.relayout();
    }

    /// Total rendered height, decorations included
    pub fn height(&self) -> f32 {
        self.height
    }

    /// The plan last handed to [`EditorView::apply_decorations`]
    pub fn applied(&self) -> &PaginationPlan {
        &self.applied
    }

    /// How many times decorations were applied
    pub fn apply_count(&self) -> u64 {
        self.applies
    }

    fn mount(&mut self, kind: RegionKind, pos: ContentPos, y: f32, height: f32) {
        self.regions.push(MountedRegion {
            kind,
            pos,
            rect: Rect::new(0.0, y, self.style.content_width, height),
        });
    }

    fn relayout(&mut self) {
        self.elements.clear();
        self.regions.clear();

        let mut y = self.style.padding_top;
        let mut mounts = Vec::new();
        let mut next_break = 0;
        let breaks = &self.applied.breaks;

        for leaf in self.document.leaf_blocks() {
            // widgets sit before the block they are anchored to
            while let Some(region) = breaks.get(next_break).filter(|b| b.pos <= leaf.pos) {
                mounts.push((RegionKind::Break, region.pos, y, region.height));
                y += region.height;
                next_break += 1;
            }

            let x = leaf.depth as f32 * self.style.indent;
            if self.detached.contains(&leaf.pos) {
                let mut element = ElementBox::content(Rect::new(x, y, 0.0, 0.0), 0.0, 0.0);
                element.attached = false;
                self.elements.insert(leaf.pos, element);
                continue;
            }

            let (margin_top, height, margin_bottom) = self.style.block_box(&leaf);
            let rect = Rect::new(x, y + margin_top, self.style.content_width - x, height);
            self.elements
                .insert(leaf.pos, ElementBox::content(rect, margin_top, margin_bottom));
            y += margin_top + height + margin_bottom;
        }

        // anchors past the last block, e.g. a stale plan after deletion
        for region in &breaks[next_break.min(breaks.len())..] {
            mounts.push((RegionKind::Break, region.pos, y, region.height));
            y += region.height;
        }
        if let Some(filler) = &self.applied.filler {
            mounts.push((RegionKind::Filler, filler.pos, y, filler.height));
            y += filler.height;
        }

        for (kind, pos, top, height) in mounts {
            self.mount(kind, pos, top, height);
        }
        self.height = y;
    }
}

impl EditorView for SimulatedView {
    fn leaf_blocks(&self) -> Vec<ContentPos> {
        self.document.leaf_blocks().iter().map(|leaf| leaf.pos).collect()
    }

    fn content_end(&self) -> ContentPos {
        ContentPos(self.document.content_size())
    }

    fn element_at(&self, pos: ContentPos) -> Option<ElementBox> {
        self.elements.get(&pos).copied()
    }

    fn mounted_regions(&self) -> Vec<MountedRegion> {
        self.regions.clone()
    }

    fn apply_decorations(&mut self, plan: &PaginationPlan) {
        self.applied = plan.clone();
        self.applies += 1;
        self.relayout();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{BreakRegion, FillerRegion};

    fn view(blocks: Vec<Block>) -> SimulatedView {
        SimulatedView::new(Document::from_blocks(blocks), SurfaceStyle::default())
    }

    #[test]
    fn test_blocks_stack_with_margins() {
        let view = view(vec![Block::paragraph("one"), Block::heading(1, "Title")]);
        let first = view.element_at(ContentPos(0)).unwrap();
        assert_eq!(first.rect.y, 96.0);
        assert_eq!(first.rect.height, 24.0);
        assert_eq!(first.outer_height(), 48.0);

        // heading: 12px margins, 36px line
        let heading = view.element_at(ContentPos(5)).unwrap();
        assert_eq!(heading.outer_top(), 144.0);
        assert_eq!(heading.rect.y, 156.0);
        assert_eq!(heading.rect.height, 36.0);
        assert_eq!(view.height(), 144.0 + 60.0);
    }

    #[test]
    fn test_leaf_sizes() {
        let view = view(vec![
            Block::image(300.0),
            Block::rule(),
            Block::code("a\nb\nc"),
            Block::table([["x", "y"], ["z", "w"]]),
        ]);
        let heights: Vec<_> = view
            .leaf_blocks()
            .into_iter()
            .map(|pos| view.element_at(pos).unwrap().rect.height)
            .collect();
        assert_eq!(heights, vec![300.0, 2.0, 72.0, 64.0]);
    }

    #[test]
    fn test_nested_blocks_indent() {
        let view = view(vec![Block::list(true, vec![Block::paragraph("item")])]);
        let pos = view.leaf_blocks()[0];
        let element = view.element_at(pos).unwrap();
        assert_eq!(element.rect.x, 48.0);
        assert_eq!(element.rect.width, 602.0 - 48.0);
    }

    #[test]
    fn test_decorations_take_space() {
        let mut view = view(vec![Block::image(600.0), Block::image(500.0)]);
        let second = view.leaf_blocks()[1];

        view.apply_decorations(&PaginationPlan {
            breaks: vec![BreakRegion {
                pos: second,
                height: 553.0,
                page: 2,
            }],
            filler: Some(FillerRegion {
                pos: view.content_end(),
                height: 527.0,
            }),
            pages: 2,
        });

        let regions = view.mounted_regions();
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].kind, RegionKind::Break);
        assert_eq!(regions[0].rect.y, 696.0);
        assert_eq!(regions[0].bottom(), 1249.0);
        assert_eq!(view.element_at(second).unwrap().outer_top(), 1249.0);
        assert_eq!(regions[1].kind, RegionKind::Filler);
        // two pages and a gap
        assert_eq!(view.height(), 1123.0 + 30.0 + 1123.0);
        assert_eq!(view.apply_count(), 1);
    }

    #[test]
    fn test_detach_removes_block_from_flow() {
        let mut view = view(vec![Block::paragraph("a"), Block::paragraph("b")]);
        let [first, second] = [view.leaf_blocks()[0], view.leaf_blocks()[1]];
        view.detach(first);
        assert!(!view.element_at(first).unwrap().attached);
        assert_eq!(view.element_at(second).unwrap().rect.y, 96.0);

        view.reattach(first);
        assert_eq!(view.element_at(second).unwrap().rect.y, 144.0);
    }

    #[test]
    fn test_edit_relayouts() {
        let mut view = view(vec![Block::paragraph("a")]);
        view.edit(|doc| doc.push(Block::image(100.0)));
        assert_eq!(view.leaf_blocks().len(), 2);
        assert_eq!(view.height(), 96.0 + 48.0 + 100.0);
        assert_eq!(view.content_end(), ContentPos(4));
    }
}
