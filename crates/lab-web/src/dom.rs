//! DOM checks and the inline error panel.

use lab_engine::{HostError, SurfaceSize};
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlCanvasElement};

fn document() -> Result<Document, HostError> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| HostError::Surface("no document".into()))
}

/// Verify that `canvas_id` names a canvas element. No rendering context is
/// acquired, so the page may draw the vertex buffer through either Canvas2D
/// or WebGL. Returns the canvas size when it is usable as a surface.
pub fn check_canvas(canvas_id: &str) -> Result<Option<SurfaceSize>, HostError> {
    let canvas: HtmlCanvasElement = document()?
        .get_element_by_id(canvas_id)
        .ok_or_else(|| HostError::Surface(format!("element #{} not found", canvas_id)))?
        .dyn_into()
        .map_err(|_| HostError::Surface(format!("#{} is not a canvas", canvas_id)))?;
    Ok(canvas_surface(canvas.width(), canvas.height()))
}

/// Surface for a canvas of `width × height` pixels. A zero-sized canvas
/// (not laid out yet) keeps the configured surface.
fn canvas_surface(width: u32, height: u32) -> Option<SurfaceSize> {
    let surface = SurfaceSize::new(width as f32, height as f32);
    surface.is_usable().then_some(surface)
}

/// Replace the contents of `container_id` with a static error message.
/// Only that container is touched; the rest of the page keeps working.
pub fn show_error_panel(container_id: &str, message: &str) {
    let Ok(doc) = document() else {
        log::error!("{}", message);
        return;
    };
    let Some(container) = doc.get_element_by_id(container_id) else {
        log::error!("error panel #{} missing: {}", container_id, message);
        return;
    };
    container.set_text_content(None);
    match doc.create_element("div") {
        Ok(panel) => {
            let _ = panel.set_attribute("class", "lab-error");
            let _ = panel.set_attribute("role", "alert");
            panel.set_text_content(Some(message));
            if container.append_child(&panel).is_err() {
                container.set_text_content(Some(message));
            }
        }
        Err(_) => container.set_text_content(Some(message)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_size_becomes_surface() {
        assert_eq!(canvas_surface(640, 480), Some(SurfaceSize::new(640.0, 480.0)));
        assert_eq!(canvas_surface(0, 480), None);
        assert_eq!(canvas_surface(300, 0), None);
        assert_eq!(canvas_surface(100_000, 480), None);
    }
}
