//! WASM bindings for the paginator
//!
//! JS owns the DOM: it measures leaf blocks and mounted break regions once
//! per animation frame, hands the numbers over as typed arrays and mounts
//! whatever plan comes back. Frame scheduling stays on the JS side.

pub mod flat_buffer;

use crate::layout::{PaginationConfig, Planner};
use crate::render::{PaginationPlan, Reconciler};
use crate::{ContentPos, PaginationError};
use flat_buffer::PlanBuffer;
use wasm_bindgen::prelude::*;

/// Initialize panic hook for better error messages
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

impl From<PaginationError> for JsValue {
    fn from(err: PaginationError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

/// WASM-exposed paginator
#[wasm_bindgen]
pub struct WasmPaginator {
    config: PaginationConfig,
    planner: Planner,
    reconciler: Reconciler,
    buffer: PlanBuffer,
    skipped: usize,
}

impl WasmPaginator {
    fn from_config(config: PaginationConfig) -> Self {
        let mut paginator = Self {
            planner: Planner::from_config(&config),
            config,
            reconciler: Reconciler::new(),
            buffer: PlanBuffer::new(),
            skipped: 0,
        };
        paginator.encode();
        paginator
    }

    fn encode(&mut self) {
        self.buffer.write_plan(
            self.reconciler.applied(),
            &self.config.geometry,
            self.reconciler.commits(),
        );
    }

    /// The plan currently applied
    pub fn plan(&self) -> &PaginationPlan {
        self.reconciler.applied()
    }

    pub fn buffer(&self) -> &PlanBuffer {
        &self.buffer
    }
}

#[wasm_bindgen]
impl WasmPaginator {
    /// Create a paginator for A4 pages with 1" margins
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::from_config(PaginationConfig::default())
    }

    /// Create a paginator from a JSON config; missing fields take defaults
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(json: &str) -> Result<WasmPaginator, JsValue> {
        let config = PaginationConfig::from_json(json)?;
        Ok(Self::from_config(config))
    }

    /// Plan from one pass of measurements.
    ///
    /// Returns true if the plan changed and must be re-mounted.
    pub fn measure(
        &mut self,
        positions: &[u32],
        geometry: &[f32],
        regions: &[f32],
        content_end: u32,
    ) -> Result<bool, JsValue> {
        let measurement = flat_buffer::read_measurement(positions, geometry, regions)?;
        self.skipped = measurement.skipped;

        let blocks = measurement.clean_blocks(self.config.correction_epsilon);
        let plan = self
            .planner
            .plan(&blocks, ContentPos(content_end as usize));

        if self.reconciler.reconcile(plan).is_none() {
            return Ok(false);
        }
        self.encode();
        Ok(true)
    }

    /// Decorations of the applied plan, keys and bands included
    #[wasm_bindgen(js_name = planJson)]
    pub fn plan_json(&self) -> Result<String, JsValue> {
        let decorations = self.plan().decorations(&self.config.geometry);
        serde_json::to_string(&decorations).map_err(|err| PaginationError::from(err).into())
    }

    /// Copy of the integer half of the plan buffer
    #[wasm_bindgen(js_name = planU32)]
    pub fn plan_u32(&self) -> js_sys::Uint32Array {
        js_sys::Uint32Array::from(self.buffer.u32_data.as_slice())
    }

    /// Copy of the float half of the plan buffer
    #[wasm_bindgen(js_name = planF32)]
    pub fn plan_f32(&self) -> js_sys::Float32Array {
        js_sys::Float32Array::from(self.buffer.f32_data.as_slice())
    }

    /// Pointer into linear memory; valid until the next `measure`
    #[wasm_bindgen(js_name = u32Ptr)]
    pub fn u32_ptr(&self) -> u32 {
        self.buffer.u32_ptr()
    }

    #[wasm_bindgen(js_name = u32Len)]
    pub fn u32_len(&self) -> u32 {
        self.buffer.u32_len()
    }

    #[wasm_bindgen(js_name = f32Ptr)]
    pub fn f32_ptr(&self) -> u32 {
        self.buffer.f32_ptr()
    }

    #[wasm_bindgen(js_name = f32Len)]
    pub fn f32_len(&self) -> u32 {
        self.buffer.f32_len()
    }

    #[wasm_bindgen(js_name = pageCount)]
    pub fn page_count(&self) -> usize {
        self.plan().page_count()
    }

    /// Page number (1-based) of the content at `pos`
    #[wasm_bindgen(js_name = pageOf)]
    pub fn page_of(&self, pos: u32) -> usize {
        self.plan().page_of(ContentPos(pos as usize))
    }

    /// Blocks without a mounted element in the last pass
    #[wasm_bindgen(js_name = skippedBlocks)]
    pub fn skipped_blocks(&self) -> usize {
        self.skipped
    }

    /// Forget the applied plan, e.g. after the host remounted the editor
    pub fn reset(&mut self) {
        self.reconciler.reset();
        self.encode();
    }
}

impl Default for WasmPaginator {
    fn default() -> Self {
        Self::new()
    }
}
