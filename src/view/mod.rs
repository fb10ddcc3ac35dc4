//! The editor view the engine reads geometry from and writes regions into

mod simulated;
mod text;

pub use simulated::{SimulatedView, SurfaceStyle};
pub use text::TextMetrics;

use crate::document::ContentPos;
use crate::render::PaginationPlan;
use crate::Rect;

/// Rendered box of a block element
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementBox {
    /// Border box, `y` measured from the top of the rendering surface
    pub rect: Rect,
    /// Computed top margin
    pub margin_top: f32,
    /// Computed bottom margin
    pub margin_bottom: f32,
    /// Whether the element is currently attached to the surface
    pub attached: bool,
    /// Whether the element is a break or filler region rather than content
    pub synthetic: bool,
}

impl ElementBox {
    /// Box of an attached content element
    pub fn content(rect: Rect, margin_top: f32, margin_bottom: f32) -> Self {
        Self {
            rect,
            margin_top,
            margin_bottom,
            attached: true,
            synthetic: false,
        }
    }

    /// Top of the margin box
    pub fn outer_top(&self) -> f32 {
        self.rect.y - self.margin_top
    }

    /// Height including vertical margins
    pub fn outer_height(&self) -> f32 {
        self.rect.height + self.margin_top + self.margin_bottom
    }
}

/// Kind of a mounted decoration element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionKind {
    Break,
    Filler,
}

/// A break or filler region currently mounted on the surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MountedRegion {
    pub kind: RegionKind,
    /// Anchor position of the decoration
    pub pos: ContentPos,
    pub rect: Rect,
}

impl MountedRegion {
    pub fn bottom(&self) -> f32 {
        self.rect.bottom()
    }
}

/// What the engine needs from the editing surface.
///
/// Implementations read the live rendered state on every call; the engine
/// never caches anything between passes.
pub trait EditorView {
    /// Positions of the leaf blocks, in document order
    fn leaf_blocks(&self) -> Vec<ContentPos>;

    /// Position at the end of the document content
    fn content_end(&self) -> ContentPos;

    /// The element currently rendered for the block at `pos`
    fn element_at(&self, pos: ContentPos) -> Option<ElementBox>;

    /// Decoration regions currently mounted, in visual order
    fn mounted_regions(&self) -> Vec<MountedRegion>;

    /// Replace all mounted decorations with the ones described by `plan`.
    ///
    /// Must not alter document content.
    fn apply_decorations(&mut self, plan: &PaginationPlan);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_box_outer_extent() {
        let element = ElementBox::content(Rect::new(0.0, 120.0, 600.0, 48.0), 12.0, 24.0);
        assert_eq!(element.outer_top(), 108.0);
        assert_eq!(element.outer_height(), 84.0);
        assert!(element.attached);
        assert!(!element.synthetic);
    }
}
