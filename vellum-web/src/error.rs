use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};

#[derive(Clone, PartialEq, Eq, Error, Debug)]
pub enum Error {
    #[error("not running within a browser environment")]
    Unsupported,
    #[error("JavaScript window.document undefined")]
    NoDocument,
    #[error("selector `{0}` matched no elements")]
    SelectorNotFound(String),
    #[error("JavaScript exception: {0}")]
    Js(String),
}

impl From<JsValue> for Error {
    fn from(value: JsValue) -> Self {
        let message = value
            .dyn_ref::<js_sys::Error>()
            .map(|err| String::from(err.message()))
            .or_else(|| value.as_string())
            .unwrap_or_else(|| format!("{value:?}"));
        Self::Js(message)
    }
}
