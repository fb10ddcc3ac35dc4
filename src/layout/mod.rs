//! Measurement, correction accounting and break planning

mod config;
mod correction;
mod geometry;
mod pagination;

pub use config::{OversizedBlockPolicy, PageGeometry, PaginationConfig};
pub use correction::BreakRegistry;
pub use geometry::{GeometryReader, Measurement, RenderedBlock};
pub use pagination::Planner;
