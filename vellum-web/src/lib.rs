//! Mounts [`vellum_core`] components into a browser document.

#![warn(clippy::use_self)]

mod error;
mod flag;
mod mount;
mod util;

pub use self::{
    error::Error,
    flag::WindowFlag,
    mount::{mount, Mounted},
    util::{document, is_browser, window},
};

pub use web_sys;
