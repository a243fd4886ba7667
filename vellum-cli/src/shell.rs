use std::{
    fmt,
    io::Write,
    sync::{Mutex, OnceLock},
};

use anstyle::*;

const ERROR: Style = AnsiColor::Red.on_default().bold();
const WARN: Style = AnsiColor::Yellow.on_default().bold();
const STATUS: Style = AnsiColor::Green.on_default().bold();

static SHELL: OnceLock<Shell> = OnceLock::new();

pub fn shell() -> &'static Shell {
    SHELL.get_or_init(Shell::new)
}

/// Styled, line-oriented messages on stderr.
pub struct Shell {
    stderr: Mutex<anstream::Stderr>,
}

impl Shell {
    fn new() -> Self {
        Self {
            stderr: Mutex::new(anstream::stderr()),
        }
    }

    pub fn error(&self, message: impl fmt::Display) {
        self.print(&labelled(ERROR, "error", message));
    }

    pub fn warn(&self, message: impl fmt::Display) {
        self.print(&labelled(WARN, "warning", message));
    }

    /// Right-aligned status word followed by a message, `cargo` style.
    pub fn status(&self, status: impl fmt::Display, message: impl fmt::Display) {
        self.print(&justified(STATUS, status, message));
    }

    fn print(&self, line: &str) {
        // a poisoned lock still holds a usable stream
        let mut stderr = self
            .stderr
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        // nowhere left to report a failed stderr write
        let _ = writeln!(stderr, "{line}");
    }
}

fn justified(style: Style, status: impl fmt::Display, message: impl fmt::Display) -> String {
    format!("{style}{status:>12}{style:#} {message}")
}

fn labelled(style: Style, label: impl fmt::Display, message: impl fmt::Display) -> String {
    let bold = if style.get_effects().contains(Effects::BOLD) {
        Style::new().bold()
    } else {
        Style::new()
    };
    format!("{style}{label}{style:#}{bold}:{bold:#} {message}")
}
