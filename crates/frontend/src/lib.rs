//! Student Stress Diagnosis - Yew WASM Frontend
//!
//! This crate provides the single-page survey form.

mod app;
mod components;
mod pages;
mod transport;

pub use app::App;

use wasm_bindgen::prelude::*;

/// WASM entry point.
#[wasm_bindgen(start)]
pub fn main() {
    yew::Renderer::<App>::new().render();
}
