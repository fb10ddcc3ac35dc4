//! Browser-side checks of the WASM binding
#![cfg(target_arch = "wasm32")]

use paged_view::wasm::flat_buffer::{HEADER_SIZE, MAGIC};
use paged_view::WasmPaginator;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn plan_buffer_round_trips_through_js_arrays() {
    let mut paginator = WasmPaginator::new();
    let changed = paginator
        .measure(&[0, 1], &[96.0, 600.0, 696.0, 500.0], &[], 2)
        .unwrap();
    assert!(changed);

    let ints = paginator.plan_u32().to_vec();
    assert_eq!(ints[0], MAGIC);
    assert_eq!(ints[4], 2);
    assert_eq!(ints.len(), HEADER_SIZE + 3);

    let floats = paginator.plan_f32().to_vec();
    assert_eq!(floats[0], 553.0);
    assert_eq!(floats[4], 527.0);
}

#[wasm_bindgen_test]
fn malformed_geometry_becomes_js_error() {
    let mut paginator = WasmPaginator::new();
    let err = paginator.measure(&[0, 1], &[96.0], &[], 2).unwrap_err();
    let err = err.dyn_into::<js_sys::Error>().unwrap();
    let message: String = err.message().into();
    assert!(message.starts_with("malformed geometry"));
}

#[wasm_bindgen_test]
fn invalid_config_rejected() {
    assert!(WasmPaginator::with_config(r#"{"geometry":{"pageHeight":-1}}"#).is_err());
    assert!(WasmPaginator::with_config("not json").is_err());
}
