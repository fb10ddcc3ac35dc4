//! Flat buffer protocol for the WASM bridge
//!
//! Geometry comes in as plain typed arrays measured by JS; the plan goes out
//! the same way so the host can mount regions without decoding JSON.
//!
//! ## Input
//! ```text
//! positions: u32[n]       content position of each leaf block, document order
//! geometry:  f32[2n]      per block: [top, height] of the margin box
//!                         top = NaN marks a block with no mounted element
//! regions:   f32[2m]      per mounted break region: [top, height]
//! ```
//!
//! ## u32 Buffer Layout:
//! ```text
//! Header:
//! [0]     MAGIC (0x50475657 = "PGVW" for validation)
//! [1]     SCHEMA_VERSION (protocol version, currently 1)
//! [2]     commit_lo (number of committed plans)
//! [3]     commit_hi
//! [4]     page_count
//! [5]     break_count
//! [6]     filler_present (0 or 1)
//! [7..]   per break: [pos, page]
//!         then if filler_present: [pos]
//! ```
//!
//! ## f32 Buffer Layout:
//! ```text
//! Per break: [height, fill, gap, margin]
//! If filler_present: [height]
//! ```

use crate::document::ContentPos;
use crate::error::PaginationError;
use crate::layout::{BreakRegistry, Measurement, PageGeometry, RenderedBlock};
use crate::render::{BandKind, PaginationPlan};

/// Magic number for format validation: "PGVW" (PaGed VieW)
pub const MAGIC: u32 = 0x50475657;

/// Schema version for protocol compatibility checking
pub const SCHEMA_VERSION: u32 = 1;

/// Header size in u32 elements
pub const HEADER_SIZE: usize = 7;

/// f32 values per measured block: [top, height]
pub const F32_PER_BLOCK: usize = 2;

/// f32 values per mounted region: [top, height]
pub const F32_PER_REGION: usize = 2;

/// u32 values per break: [pos, page]
pub const U32_PER_BREAK: usize = 2;

/// f32 values per break: [height, fill, gap, margin]
pub const F32_PER_BREAK: usize = 4;

/// Decode one pass of host measurements
pub fn read_measurement(
    positions: &[u32],
    geometry: &[f32],
    regions: &[f32],
) -> Result<Measurement, PaginationError> {
    if geometry.len() != positions.len() * F32_PER_BLOCK {
        return Err(PaginationError::malformed(format!(
            "expected {} geometry values for {} blocks, got {}",
            positions.len() * F32_PER_BLOCK,
            positions.len(),
            geometry.len()
        )));
    }
    if regions.len() % F32_PER_REGION != 0 {
        return Err(PaginationError::malformed(format!(
            "region buffer length {} is not a multiple of {}",
            regions.len(),
            F32_PER_REGION
        )));
    }

    let mut blocks = Vec::with_capacity(positions.len());
    let mut skipped = 0;
    for (pos, record) in positions.iter().zip(geometry.chunks_exact(F32_PER_BLOCK)) {
        let (top, height) = (record[0], record[1]);
        if top.is_nan() {
            skipped += 1;
            continue;
        }
        if !top.is_finite() || !height.is_finite() || height < 0.0 {
            return Err(PaginationError::malformed(format!(
                "block at {} has top {} and height {}",
                pos, top, height
            )));
        }
        blocks.push(RenderedBlock::new(ContentPos(*pos as usize), top, height));
    }

    let mut registry = BreakRegistry::new();
    for record in regions.chunks_exact(F32_PER_REGION) {
        let (top, height) = (record[0], record[1]);
        if !top.is_finite() || !height.is_finite() || height < 0.0 {
            return Err(PaginationError::malformed(format!(
                "region has top {} and height {}",
                top, height
            )));
        }
        registry.register(top + height, height);
    }

    Ok(Measurement {
        blocks,
        registry,
        skipped,
    })
}

/// Plan buffer for zero-copy WASM transfer
#[derive(Debug, Default)]
pub struct PlanBuffer {
    /// Integer data (header, positions, page numbers)
    pub u32_data: Vec<u32>,
    /// Float data (region heights and bands)
    pub f32_data: Vec<f32>,
}

impl PlanBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.u32_data.clear();
        self.f32_data.clear();
    }

    /// Encode `plan`, replacing the previous contents.
    ///
    /// Buffers are reused when capacity allows; JS must re-read the
    /// pointers after every call.
    pub fn write_plan(&mut self, plan: &PaginationPlan, geometry: &PageGeometry, commits: u64) {
        self.clear();
        let filler = plan.filler.is_some() as usize;
        self.u32_data
            .reserve(HEADER_SIZE + plan.breaks.len() * U32_PER_BREAK + filler);
        self.f32_data
            .reserve(plan.breaks.len() * F32_PER_BREAK + filler);

        self.u32_data.push(MAGIC); // [0] magic number
        self.u32_data.push(SCHEMA_VERSION); // [1] schema version
        self.u32_data.push((commits & 0xFFFFFFFF) as u32); // [2] commit_lo
        self.u32_data.push((commits >> 32) as u32); // [3] commit_hi
        self.u32_data.push(plan.page_count() as u32); // [4] page_count
        self.u32_data.push(plan.breaks.len() as u32); // [5] break_count
        self.u32_data.push(filler as u32); // [6] filler_present

        for decoration in plan.decorations(geometry) {
            self.u32_data.push(decoration.pos.0 as u32);
            self.f32_data.push(decoration.height);
            let Some(page) = decoration.page_label else {
                continue;
            };
            self.u32_data.push(page as u32);
            for kind in [BandKind::Fill, BandKind::Gap, BandKind::Margin] {
                let height = decoration
                    .bands
                    .iter()
                    .find(|band| band.kind == kind)
                    .map_or(0.0, |band| band.height);
                self.f32_data.push(height);
            }
        }
    }

    // Accessors for WASM
    // wasm32 linear memory uses u32 offsets

    pub fn u32_ptr(&self) -> u32 {
        self.u32_data.as_ptr() as u32
    }

    pub fn u32_len(&self) -> u32 {
        self.u32_data.len() as u32
    }

    pub fn f32_ptr(&self) -> u32 {
        self.f32_data.as_ptr() as u32
    }

    pub fn f32_len(&self) -> u32 {
        self.f32_data.len() as u32
    }
}
