//! Pagination planner
//!
//! One forward pass over the clean block geometry. Offsets are tracked on a
//! clean axis (as if no break region existed) and relative to the content
//! start of the first page; `inserted` carries the break height added so
//! far in the pass to convert back to where things will end up visually.

use crate::document::ContentPos;
use crate::layout::{OversizedBlockPolicy, PageGeometry, PaginationConfig, RenderedBlock};
use crate::render::{BreakRegion, FillerRegion, PaginationPlan};

/// Computes a [`PaginationPlan`] from block geometry. Pure and
/// deterministic: the same blocks always give the same plan.
#[derive(Debug, Clone, Copy)]
pub struct Planner {
    geometry: PageGeometry,
    oversized: OversizedBlockPolicy,
}

impl Default for Planner {
    fn default() -> Self {
        Self::new(PageGeometry::default(), OversizedBlockPolicy::default())
    }
}

impl Planner {
    pub fn new(geometry: PageGeometry, oversized: OversizedBlockPolicy) -> Self {
        Self {
            geometry,
            oversized,
        }
    }

    pub fn from_config(config: &PaginationConfig) -> Self {
        Self::new(config.geometry, config.oversized)
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Plan breaks for `blocks`, given in document order with clean tops.
    /// The filler is anchored at `end`.
    pub fn plan(&self, blocks: &[RenderedBlock], end: ContentPos) -> PaginationPlan {
        let capacity = self.geometry.content_height();
        let stride = self.geometry.page_stride();

        let mut breaks = Vec::new();
        let mut page_index: usize = 0;
        let mut page_start: f32 = 0.0;
        let mut inserted: f32 = 0.0;
        let mut deepest: f32 = 0.0;

        for block in blocks {
            let clean_top = block.top - self.geometry.margin_top;
            let offset_on_page = clean_top - page_start;
            let bottom_on_page = offset_on_page + block.height;

            let needs_break = if block.height > capacity {
                match self.oversized {
                    OversizedBlockPolicy::Overflow => false,
                    OversizedBlockPolicy::StartNewPage => offset_on_page > 0.0,
                }
            } else {
                bottom_on_page > capacity
            };

            if needs_break {
                // Where the block would land with this pass's breaks so far.
                // An overflowing block before it may already have pushed it
                // past the next page, in which case it skips ahead.
                let visual = clean_top + inserted;
                let target = (page_index + 1).max((visual / stride).floor() as usize + 1);
                let height = target as f32 * stride - visual;

                log::trace!(
                    "break before {} (bottom {} > {}), spacer {} to page {}",
                    block.pos.0,
                    bottom_on_page,
                    capacity,
                    height,
                    target + 1
                );

                breaks.push(BreakRegion {
                    pos: block.pos,
                    height,
                    page: target + 1,
                });
                page_index = target;
                page_start = clean_top;
                inserted += height;
            }

            deepest = deepest.max(clean_top + inserted + block.height);
        }

        // An overflowing block may run past the sheet of the page it started
        // on; the last page is the first whose sheet reaches the content end
        let sheet_bottom = capacity + self.geometry.margin_bottom;
        let reached = ((deepest - sheet_bottom) / stride).ceil().max(0.0) as usize;
        let last_page = page_index.max(reached);

        let filler_height = last_page as f32 * stride + sheet_bottom - deepest;

        let filler = if filler_height > 0.0 && filler_height < self.geometry.page_height {
            Some(FillerRegion {
                pos: end,
                height: filler_height,
            })
        } else {
            log::debug!("suppressing degenerate filler of height {}", filler_height);
            None
        };

        PaginationPlan {
            breaks,
            filler,
            pages: last_page + 1,
        }
    }
}
