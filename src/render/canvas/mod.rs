//! Canvas 2D rendering backend.
//!
//! Draws dots through the HTML Canvas 2D API via web-sys. Only built for
//! `wasm32`; everything it draws is decided by [`super::frame`].

mod renderer;

pub use renderer::CanvasRenderer;
