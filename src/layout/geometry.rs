//! Geometry reader: measures leaf blocks on the rendering surface

use crate::document::ContentPos;
use crate::layout::BreakRegistry;
use crate::view::EditorView;

/// Geometry of one leaf block for one pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderedBlock {
    pub pos: ContentPos,
    /// Top of the margin box, from the top of the surface
    pub top: f32,
    /// Height including vertical margins
    pub height: f32,
}

impl RenderedBlock {
    pub fn new(pos: ContentPos, top: f32, height: f32) -> Self {
        Self { pos, top, height }
    }
}

/// Raw result of reading the surface once
#[derive(Debug, Clone, Default)]
pub struct Measurement {
    /// Blocks as measured, break regions included in their tops
    pub blocks: Vec<RenderedBlock>,
    pub registry: BreakRegistry,
    /// Leaf blocks that had no attached element
    pub skipped: usize,
}

impl Measurement {
    /// Blocks with the height of mounted break regions removed from their
    /// tops
    pub fn clean_blocks(&self, epsilon: f32) -> Vec<RenderedBlock> {
        self.blocks
            .iter()
            .map(|block| RenderedBlock {
                top: self.registry.clean_top(block.top, epsilon),
                ..*block
            })
            .collect()
    }
}

/// Reads block geometry from an [`EditorView`]. Read-only.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeometryReader;

impl GeometryReader {
    pub fn new() -> Self {
        Self
    }

    pub fn read<V: EditorView + ?Sized>(&self, view: &V) -> Measurement {
        let mut blocks = Vec::new();
        let mut skipped = 0;

        for pos in view.leaf_blocks() {
            let Some(element) = view.element_at(pos) else {
                log::trace!("block at {} has no element, skipping", pos.0);
                skipped += 1;
                continue;
            };
            if element.synthetic {
                continue;
            }
            if !element.attached {
                log::trace!("block at {} is detached, skipping", pos.0);
                skipped += 1;
                continue;
            }
            blocks.push(RenderedBlock::new(
                pos,
                element.outer_top(),
                element.outer_height(),
            ));
        }

        Measurement {
            blocks,
            registry: BreakRegistry::from_regions(&view.mounted_regions()),
            skipped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::PaginationPlan;
    use crate::view::{ElementBox, MountedRegion, RegionKind};
    use crate::Rect;
    use rustc_hash::FxHashMap;

    /// View with hand-placed elements
    #[derive(Default)]
    struct FixedView {
        order: Vec<ContentPos>,
        elements: FxHashMap<ContentPos, ElementBox>,
        regions: Vec<MountedRegion>,
    }

    impl FixedView {
        fn add(&mut self, pos: usize, element: ElementBox) {
            self.order.push(ContentPos(pos));
            self.elements.insert(ContentPos(pos), element);
        }
    }

    impl EditorView for FixedView {
        fn leaf_blocks(&self) -> Vec<ContentPos> {
            self.order.clone()
        }

        fn content_end(&self) -> ContentPos {
            ContentPos(100)
        }

        fn element_at(&self, pos: ContentPos) -> Option<ElementBox> {
            self.elements.get(&pos).copied()
        }

        fn mounted_regions(&self) -> Vec<MountedRegion> {
            self.regions.clone()
        }

        fn apply_decorations(&mut self, _plan: &PaginationPlan) {}
    }

    #[test]
    fn test_heights_include_margins() {
        let mut view = FixedView::default();
        view.add(0, ElementBox::content(Rect::new(0.0, 96.0, 600.0, 24.0), 0.0, 24.0));
        view.add(5, ElementBox::content(Rect::new(0.0, 156.0, 600.0, 36.0), 12.0, 12.0));

        let measurement = GeometryReader::new().read(&view);
        assert_eq!(
            measurement.blocks,
            vec![
                RenderedBlock::new(ContentPos(0), 96.0, 48.0),
                RenderedBlock::new(ContentPos(5), 144.0, 60.0),
            ]
        );
        assert_eq!(measurement.skipped, 0);
    }

    #[test]
    fn test_unmounted_and_synthetic_skipped() {
        let mut view = FixedView::default();
        view.add(0, ElementBox::content(Rect::new(0.0, 96.0, 600.0, 24.0), 0.0, 0.0));
        view.order.push(ContentPos(3)); // never rendered
        let mut detached = ElementBox::content(Rect::new(0.0, 0.0, 0.0, 0.0), 0.0, 0.0);
        detached.attached = false;
        view.add(6, detached);
        let mut spacer = ElementBox::content(Rect::new(0.0, 120.0, 600.0, 300.0), 0.0, 0.0);
        spacer.synthetic = true;
        view.add(9, spacer);

        let measurement = GeometryReader::new().read(&view);
        assert_eq!(measurement.blocks.len(), 1);
        assert_eq!(measurement.skipped, 2);
    }

    #[test]
    fn test_clean_blocks_subtract_regions() {
        let mut view = FixedView::default();
        view.add(0, ElementBox::content(Rect::new(0.0, 96.0, 600.0, 600.0), 0.0, 0.0));
        view.regions.push(MountedRegion {
            kind: RegionKind::Break,
            pos: ContentPos(5),
            rect: Rect::new(0.0, 696.0, 600.0, 553.0),
        });
        view.add(5, ElementBox::content(Rect::new(0.0, 1249.0, 600.0, 500.0), 0.0, 0.0));

        let measurement = GeometryReader::new().read(&view);
        let clean = measurement.clean_blocks(5.0);
        assert_eq!(clean[0].top, 96.0);
        assert_eq!(clean[1].top, 696.0);
        assert_eq!(measurement.blocks[1].top, 1249.0);
    }
}
