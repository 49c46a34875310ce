use wasm_bindgen::prelude::*;

mod scenarios;
mod sims;

lab_web::export_lab!(scenarios::registry, "physics-lab");
