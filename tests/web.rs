// Browser smoke test: `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn start_game_mounts_the_canvas() {
    archery_range::start_game().unwrap();
    let doc = web_sys::window().unwrap().document().unwrap();
    assert!(doc.get_element_by_id("ar-range-canvas").is_some());
}

#[wasm_bindgen_test]
fn starting_twice_keeps_one_range() {
    archery_range::start_game().unwrap();
    archery_range::start_game().unwrap();
    let doc = web_sys::window().unwrap().document().unwrap();
    let canvases = doc.query_selector_all("#ar-range-canvas").unwrap();
    assert_eq!(canvases.length(), 1);
}
