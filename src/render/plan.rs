//! Pagination plan: the break and filler regions of one pass

use crate::document::ContentPos;
use crate::layout::PageGeometry;
use serde::Serialize;
use smallvec::{smallvec, SmallVec};
use std::fmt::Write;

/// Spacer inserted before the block that would overflow its page
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakRegion {
    /// Position immediately before the block that triggered the break
    pub pos: ContentPos,
    pub height: f32,
    /// 1-based number of the page that starts after this region
    pub page: usize,
}

/// Padding after the last block so the final page looks full-height
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FillerRegion {
    /// End of the document content
    pub pos: ContentPos,
    pub height: f32,
}

/// Part of a region as drawn by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BandKind {
    /// Blank page area: leftover content space plus the bottom margin
    Fill,
    /// Space between two pages
    Gap,
    /// Top margin of the following page
    Margin,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Band {
    pub kind: BandKind,
    pub height: f32,
}

/// Which side of its anchor a widget sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Side {
    Before,
    After,
}

/// A plan region ready to be mounted as a widget decoration
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Decoration {
    /// Stable identity so hosts can reuse widget nodes
    pub key: String,
    pub pos: ContentPos,
    pub side: Side,
    pub height: f32,
    /// Page number shown in the gap band, breaks only
    pub page_label: Option<usize>,
    pub bands: SmallVec<[Band; 3]>,
}

/// Compact identity of a plan, compared instead of the plan itself.
///
/// Heights are quantized to 1/100 px so float noise below that never
/// counts as a change.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PlanSignature(String);

impl PlanSignature {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn quantize(height: f32) -> i64 {
    (height * 100.0).round() as i64
}

/// The committed output of a pagination pass
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationPlan {
    /// Strictly increasing in both position and page
    pub breaks: Vec<BreakRegion>,
    pub filler: Option<FillerRegion>,
    /// Pages the content reaches, at least 1. Can exceed the last break's
    /// page when a trailing block overflows.
    pub pages: usize,
}

impl Default for PaginationPlan {
    fn default() -> Self {
        Self {
            breaks: Vec::new(),
            filler: None,
            pages: 1,
        }
    }
}

impl PaginationPlan {
    /// Single-page plan with no regions at all
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.breaks.is_empty() && self.filler.is_none()
    }

    /// Number of simulated pages
    pub fn page_count(&self) -> usize {
        self.pages
    }

    /// Page number (1-based) of the content at `pos`
    pub fn page_of(&self, pos: ContentPos) -> usize {
        let idx = self.breaks.partition_point(|b| b.pos <= pos);
        match idx {
            0 => 1,
            n => self.breaks[n - 1].page,
        }
    }

    pub fn signature(&self) -> PlanSignature {
        let mut sig = String::with_capacity(self.breaks.len() * 16 + 16);
        for region in &self.breaks {
            let _ = write!(
                sig,
                "b{}:{}:{};",
                region.pos.0,
                region.page,
                quantize(region.height)
            );
        }
        if let Some(filler) = &self.filler {
            let _ = write!(sig, "f{}:{};", filler.pos.0, quantize(filler.height));
        }
        let _ = write!(sig, "p{}", self.pages);
        PlanSignature(sig)
    }

    /// Widget decorations for every region, in document order
    pub fn decorations(&self, geometry: &PageGeometry) -> Vec<Decoration> {
        let mut decorations: Vec<_> = self
            .breaks
            .iter()
            .map(|region| Decoration {
                key: format!("spacer-{}-{}", region.page - 1, region.pos.0),
                pos: region.pos,
                side: Side::Before,
                height: region.height,
                page_label: Some(region.page),
                bands: break_bands(region.height, geometry),
            })
            .collect();

        if let Some(filler) = &self.filler {
            decorations.push(Decoration {
                key: "page-filler".to_string(),
                pos: filler.pos,
                side: Side::After,
                height: filler.height,
                page_label: None,
                bands: smallvec![Band {
                    kind: BandKind::Fill,
                    height: filler.height,
                }],
            });
        }

        decorations
    }
}

/// Split a break region into its drawn bands. The gap and top margin keep
/// their nominal size; the fill band takes whatever is left.
fn break_bands(height: f32, geometry: &PageGeometry) -> SmallVec<[Band; 3]> {
    let fixed = geometry.page_gap + geometry.margin_top;
    smallvec![
        Band {
            kind: BandKind::Fill,
            height: (height - fixed).max(0.0),
        },
        Band {
            kind: BandKind::Gap,
            height: geometry.page_gap,
        },
        Band {
            kind: BandKind::Margin,
            height: geometry.margin_top,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_page_plan() -> PaginationPlan {
        PaginationPlan {
            breaks: vec![BreakRegion {
                pos: ContentPos(40),
                height: 553.0,
                page: 2,
            }],
            filler: Some(FillerRegion {
                pos: ContentPos(80),
                height: 527.0,
            }),
            pages: 2,
        }
    }

    #[test]
    fn test_page_queries() {
        let plan = two_page_plan();
        assert_eq!(plan.page_count(), 2);
        assert_eq!(plan.page_of(ContentPos(0)), 1);
        assert_eq!(plan.page_of(ContentPos(39)), 1);
        assert_eq!(plan.page_of(ContentPos(40)), 2);
        assert_eq!(plan.page_of(ContentPos(79)), 2);

        assert_eq!(PaginationPlan::new().page_count(), 1);
        assert!(PaginationPlan::new().is_empty());
    }

    #[test]
    fn test_signature() {
        let plan = two_page_plan();
        assert_eq!(plan.signature().as_str(), "b40:2:55300;f80:52700;p2");

        let mut jittered = plan.clone();
        jittered.breaks[0].height += 0.001;
        assert_eq!(plan.signature(), jittered.signature());

        let mut moved = plan.clone();
        moved.breaks[0].height += 1.0;
        assert_ne!(plan.signature(), moved.signature());

        assert_eq!(PaginationPlan::new().signature().as_str(), "p1");
    }

    #[test]
    fn test_signature_tracks_pages() {
        let plan = two_page_plan();

        // same anchor and height, later page
        let mut relabelled = plan.clone();
        relabelled.breaks[0].page = 3;
        relabelled.pages = 3;
        assert_ne!(plan.signature(), relabelled.signature());

        // same regions, overflow reaches one more page
        let mut longer = plan.clone();
        longer.pages = 3;
        assert_ne!(plan.signature(), longer.signature());
    }

    #[test]
    fn test_decorations() {
        let geometry = PageGeometry::default();
        let decorations = two_page_plan().decorations(&geometry);
        assert_eq!(decorations.len(), 2);

        let spacer = &decorations[0];
        assert_eq!(spacer.key, "spacer-1-40");
        assert_eq!(spacer.side, Side::Before);
        assert_eq!(spacer.page_label, Some(2));
        let heights: Vec<_> = spacer.bands.iter().map(|b| (b.kind, b.height)).collect();
        // 553 = (931 - 600) + 96 bottom margin, then gap and top margin
        assert_eq!(
            heights,
            vec![
                (BandKind::Fill, 427.0),
                (BandKind::Gap, 30.0),
                (BandKind::Margin, 96.0)
            ]
        );

        let filler = &decorations[1];
        assert_eq!(filler.key, "page-filler");
        assert_eq!(filler.side, Side::After);
        assert_eq!(filler.bands.len(), 1);
    }

    #[test]
    fn test_serialize() {
        let json = serde_json::to_value(two_page_plan()).unwrap();
        assert_eq!(json["breaks"][0]["pos"], 40);
        assert_eq!(json["breaks"][0]["page"], 2);
        assert_eq!(json["filler"]["height"], 527.0);
        assert_eq!(json["pages"], 2);
    }
}
