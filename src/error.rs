//! Crate-wide error type

use thiserror::Error;

/// Errors raised while configuring the field or talking to its host.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid field config: {0}")]
    InvalidConfig(String),

    #[error("unknown preset `{0}` (expected `portfolio` or `dense`)")]
    UnknownPreset(String),

    #[error("failed to parse field config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read field config: {0}")]
    Io(#[from] std::io::Error),

    /// Browser objects missing or a JS call threw
    #[error("host error: {0}")]
    Host(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Wrap a thrown JS value with the call that threw it
#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
pub(crate) fn js_error(context: &str, value: wasm_bindgen::JsValue) -> Error {
    Error::Host(format!("{context}: {value:?}"))
}

#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
impl From<Error> for wasm_bindgen::JsValue {
    fn from(e: Error) -> Self {
        js_sys::Error::new(&e.to_string()).into()
    }
}
