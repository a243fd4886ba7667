//! Server-side rendering of vellum pages from the command line.
//!
//! A binary registers its pages and hands them to [`launch`]:
//!
//! ```no_run
//! use vellum_cli::Registry;
//! use vellum_core::Node;
//!
//! fn main() -> std::process::ExitCode {
//!     vellum_cli::launch(Registry::new().page("hello", || Node::text("hi")))
//! }
//! ```

#![warn(clippy::use_self)]

pub mod config;
pub mod ogp;
pub mod page;
pub mod shell;
pub mod site;
pub mod splice;

mod error;

pub use self::{error::LookupError, page::Registry, shell::shell, site::Site};

#[cfg(feature = "cli")]
mod cli;
#[cfg(feature = "cli")]
pub mod proxy;

#[cfg(feature = "cli")]
pub use cli::{launch, run};
