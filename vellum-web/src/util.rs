use crate::Error;

/// Whether the code runs inside a browser with a global `window`.
pub fn is_browser() -> bool {
    cfg!(target_family = "wasm") && web_sys::window().is_some()
}

pub fn window() -> Result<web_sys::Window, Error> {
    if !cfg!(target_family = "wasm") {
        return Err(Error::Unsupported);
    }
    web_sys::window().ok_or(Error::Unsupported)
}

pub fn document() -> Result<web_sys::Document, Error> {
    window()?.document().ok_or(Error::NoDocument)
}

#[cfg(all(test, not(target_family = "wasm")))]
mod tests {
    use super::*;

    #[test]
    fn native_targets_are_unsupported() {
        assert!(!is_browser());
        assert_eq!(document().err(), Some(Error::Unsupported));
    }
}
