use vellum_core::{RenderFlag, RenderObserver};
use wasm_bindgen::JsValue;

use crate::{util::window, Error};

/// A [`RenderFlag`] that is also mirrored onto `window[name]`, so that scripts
/// outside the wasm module can tell the page rendered.
#[derive(Clone, Debug)]
pub struct WindowFlag {
    name: String,
    local: RenderFlag,
}

impl WindowFlag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            local: RenderFlag::new(),
        }
    }

    pub fn get(&self) -> bool {
        self.local.get()
    }
}

impl RenderObserver for WindowFlag {
    fn rendered(&self) {
        self.local.rendered();

        let Ok(window) = window() else {
            return;
        };
        if let Err(err) = js_sys::Reflect::set(&window, &JsValue::from_str(&self.name), &JsValue::TRUE)
        {
            tracing::warn!(name = %self.name, err = %Error::from(err), "failed to set window flag");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_flag_without_window() {
        let flag = WindowFlag::new("rendered");
        assert!(!flag.get());
        flag.rendered();
        assert!(flag.get());
    }

    #[cfg(target_family = "wasm")]
    #[wasm_bindgen_test::wasm_bindgen_test]
    fn mirrors_onto_window() {
        let flag = WindowFlag::new("vellum_flag_test");
        flag.rendered();

        let window = window().unwrap();
        let value = js_sys::Reflect::get(&window, &JsValue::from_str("vellum_flag_test")).unwrap();
        assert_eq!(value, JsValue::TRUE);
    }
}
