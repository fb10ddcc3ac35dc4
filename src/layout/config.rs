//! Page geometry and pagination settings

use crate::error::PaginationError;
use crate::scheduler::SchedulerConfig;
use serde::Deserialize;

/// Simulated page constants, all in pixels at 96 DPI
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageGeometry {
    pub page_height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    /// Space drawn between two consecutive pages
    pub page_gap: f32,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self {
            page_height: 1123.0, // A4
            margin_top: 96.0,    // 1 inch
            margin_bottom: 96.0,
            page_gap: 30.0,
        }
    }
}

impl PageGeometry {
    /// Vertical space available for content on one page
    pub fn content_height(&self) -> f32 {
        self.page_height - self.margin_top - self.margin_bottom
    }

    /// Distance from one page's top edge to the next
    pub fn page_stride(&self) -> f32 {
        self.page_height + self.page_gap
    }

    pub fn validate(&self) -> Result<(), PaginationError> {
        let values = [
            ("page_height", self.page_height),
            ("margin_top", self.margin_top),
            ("margin_bottom", self.margin_bottom),
            ("page_gap", self.page_gap),
        ];
        for (field, value) in values {
            if !value.is_finite() {
                return Err(PaginationError::invalid(field, "must be finite"));
            }
            if value < 0.0 {
                return Err(PaginationError::invalid(field, "must not be negative"));
            }
        }
        if self.content_height() <= 0.0 {
            return Err(PaginationError::invalid(
                "page_height",
                "must exceed the sum of the margins",
            ));
        }
        Ok(())
    }
}

/// What to do with a block taller than one page's content area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OversizedBlockPolicy {
    /// Never break around the block; it straddles page boundaries
    #[default]
    Overflow,
    /// Move the block to a fresh page unless it already starts one, then
    /// let it overflow
    StartNewPage,
}

/// Everything fixed at engine construction
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaginationConfig {
    pub geometry: PageGeometry,
    /// Tolerance for matching a break region's bottom to a block's top.
    /// Absorbs sub-pixel layout jitter of the host.
    pub correction_epsilon: f32,
    pub oversized: OversizedBlockPolicy,
    pub scheduler: SchedulerConfig,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            geometry: PageGeometry::default(),
            correction_epsilon: 5.0,
            oversized: OversizedBlockPolicy::default(),
            scheduler: SchedulerConfig::default(),
        }
    }
}

impl PaginationConfig {
    /// Parse from JSON, missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, PaginationError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PaginationError> {
        self.geometry.validate()?;
        if !self.correction_epsilon.is_finite() || self.correction_epsilon < 0.0 {
            return Err(PaginationError::invalid(
                "correction_epsilon",
                "must be a finite non-negative number",
            ));
        }
        self.scheduler.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_geometry() {
        let geometry = PageGeometry::default();
        assert_eq!(geometry.content_height(), 931.0); // 1123 - 96 - 96
        assert_eq!(geometry.page_stride(), 1153.0);
        assert!(geometry.validate().is_ok());
    }

    #[test]
    fn test_margins_consuming_page_rejected() {
        let geometry = PageGeometry {
            page_height: 100.0,
            margin_top: 60.0,
            margin_bottom: 40.0,
            page_gap: 0.0,
        };
        assert!(matches!(
            geometry.validate(),
            Err(PaginationError::InvalidConfig {
                field: "page_height",
                ..
            })
        ));
    }

    #[test]
    fn test_non_finite_rejected() {
        let geometry = PageGeometry {
            page_gap: f32::NAN,
            ..PageGeometry::default()
        };
        assert!(geometry.validate().is_err());

        let config = PaginationConfig {
            correction_epsilon: -1.0,
            ..PaginationConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_json_partial() {
        let config = PaginationConfig::from_json(
            r#"{ "geometry": { "pageHeight": 1056 }, "oversized": "startNewPage" }"#,
        )
        .unwrap();
        assert_eq!(config.geometry.page_height, 1056.0);
        assert_eq!(config.geometry.margin_top, 96.0);
        assert_eq!(config.correction_epsilon, 5.0);
        assert_eq!(config.oversized, OversizedBlockPolicy::StartNewPage);
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(matches!(
            PaginationConfig::from_json("{ not json"),
            Err(PaginationError::Config(_))
        ));
        assert!(matches!(
            PaginationConfig::from_json(r#"{ "geometry": { "pageHeight": 10 } }"#),
            Err(PaginationError::InvalidConfig { .. })
        ));
    }
}
