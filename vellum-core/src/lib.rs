#![warn(clippy::use_self)]

pub mod attrs;
pub mod component;
pub mod render;

mod node;

pub use component::{Component, RenderFlag, RenderObserver};
pub use node::*;
pub use render::{render, render_to_string, tree_to_string, Mode};
