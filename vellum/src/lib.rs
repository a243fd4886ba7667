#![warn(clippy::use_self)]

pub mod html;

pub use vellum_core::{
    attrs, render, render_to_string, tree_to_string, Component, Element, IntoNode, Mode, Node,
    RenderFlag, RenderObserver,
};
pub use vellum_web::{self as web, mount, Mounted, WindowFlag};

pub mod prelude {
    pub use crate::{
        html, mount, Component, Element, IntoNode as _, Node, RenderFlag, RenderObserver,
    };
}
