//! Structured error types for dotgrid.

/// All errors that can occur while setting up or driving the dot grid.
#[derive(Debug, thiserror::Error)]
pub enum DotGridError {
    /// The canvas could not provide a 2D context.
    #[error("Canvas context: {0}")]
    Context(String),

    /// Construction options or theme could not be decoded.
    #[error("Invalid options: {0}")]
    Options(String),

    /// Browser API call failed (listener registration, observers, timers).
    #[error("DOM error: {0}")]
    Dom(String),

    /// JSON serialization error (CLI output).
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Catch-all for string errors.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DotGridError>;

impl From<String> for DotGridError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for DotGridError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<DotGridError> for wasm_bindgen::JsValue {
    fn from(e: DotGridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
