//! Correction accounting for mounted break regions
//!
//! A block measured after break regions were mounted sits lower by the
//! height of every region above it. Subtracting that height gives the
//! block's clean top, its position as if no region existed, so each pass
//! plans from the same baseline instead of stacking breaks on breaks.

use crate::view::{MountedRegion, RegionKind};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Entry {
    bottom: f32,
    height: f32,
}

/// Mounted break regions sorted by visual position
#[derive(Debug, Clone, Default)]
pub struct BreakRegistry {
    entries: Vec<Entry>,
    /// prefix[i] is the total height of entries[..i]
    prefix: Vec<f32>,
}

impl BreakRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from regions as read off the surface; filler regions are ignored
    pub fn from_regions(regions: &[MountedRegion]) -> Self {
        let mut registry = Self::new();
        for region in regions.iter().filter(|r| r.kind == RegionKind::Break) {
            registry.register(region.bottom(), region.rect.height);
        }
        registry
    }

    /// Record a break region by its bottom edge and height
    pub fn register(&mut self, bottom: f32, height: f32) {
        let entry = Entry { bottom, height };
        let idx = self.entries.partition_point(|e| e.bottom <= bottom);
        self.entries.insert(idx, entry);

        self.prefix.clear();
        self.prefix.push(0.0);
        let mut total = 0.0;
        for entry in &self.entries {
            total += entry.height;
            self.prefix.push(total);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total height of the regions whose bottom is at or above `top`
    pub fn correction_at(&self, top: f32, epsilon: f32) -> f32 {
        let above = self.entries.partition_point(|e| e.bottom <= top + epsilon);
        self.prefix.get(above).copied().unwrap_or(0.0)
    }

    /// `top` with the height of all regions above it removed
    pub fn clean_top(&self, top: f32, epsilon: f32) -> f32 {
        top - self.correction_at(top, epsilon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ContentPos;
    use crate::Rect;

    #[test]
    fn test_empty_registry() {
        let registry = BreakRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.correction_at(500.0, 5.0), 0.0);
        assert_eq!(registry.clean_top(500.0, 5.0), 500.0);
    }

    #[test]
    fn test_regions_above_are_subtracted() {
        let mut registry = BreakRegistry::new();
        // registered out of order on purpose
        registry.register(2400.0, 300.0);
        registry.register(1249.0, 553.0);

        assert_eq!(registry.correction_at(100.0, 5.0), 0.0);
        assert_eq!(registry.correction_at(1249.0, 5.0), 553.0);
        assert_eq!(registry.correction_at(2400.0, 5.0), 853.0);
        assert_eq!(registry.clean_top(2500.0, 5.0), 1647.0);
    }

    #[test]
    fn test_epsilon_absorbs_jitter() {
        let mut registry = BreakRegistry::new();
        registry.register(1249.0, 553.0);

        // block top reported slightly above the region bottom
        assert_eq!(registry.correction_at(1246.5, 5.0), 553.0);
        assert_eq!(registry.correction_at(1246.5, 0.0), 0.0);
        assert_eq!(registry.correction_at(1240.0, 5.0), 0.0);
    }

    #[test]
    fn test_from_regions_skips_filler() {
        let regions = [
            MountedRegion {
                kind: RegionKind::Break,
                pos: ContentPos(10),
                rect: Rect::new(0.0, 696.0, 794.0, 553.0),
            },
            MountedRegion {
                kind: RegionKind::Filler,
                pos: ContentPos(20),
                rect: Rect::new(0.0, 1749.0, 794.0, 527.0),
            },
        ];
        let registry = BreakRegistry::from_regions(&regions);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.correction_at(1249.0, 5.0), 553.0);
        assert_eq!(registry.correction_at(3000.0, 5.0), 553.0);
    }
}
