use std::fmt::{self, Write};

use bitflags::bitflags;

use crate::{
    component::Component,
    node::{Element, Node},
};

// Reference: https://developer.mozilla.org/en-US/docs/Glossary/Void_element
const VOID: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

bitflags! {
    #[derive(Clone, Copy, PartialEq, Eq, Debug)]
    pub struct Mode: u8 {
        /// One node per line, children indented by two spaces.
        const PRETTY = 0b01;
        /// Close void elements as `<br />`.
        const XHTML = 0b10;
    }
}

impl Default for Mode {
    fn default() -> Self {
        Self::empty()
    }
}

pub fn render_to_string<C>(mode: Mode, component: &C) -> String
where
    C: Component + ?Sized,
{
    let mut out = String::new();
    render(&mut out, mode, component).unwrap();
    out
}

pub fn render<W, C>(w: &mut W, mode: Mode, component: &C) -> fmt::Result
where
    W: Write,
    C: Component + ?Sized,
{
    render_node(w, mode, &component.view())
}

/// Renders an already built tree.
pub fn tree_to_string(mode: Mode, node: &Node) -> String {
    let mut out = String::new();
    render_node(&mut out, mode, node).unwrap();
    out
}

pub(crate) fn render_node<W: Write + ?Sized>(w: &mut W, mode: Mode, node: &Node) -> fmt::Result {
    match node {
        Node::Element(element) => render_element(w, mode, element),
        Node::Text(content) => {
            w.write_str(&html_escape(content))?;
            newline(w, mode)
        }
        Node::Fragment(children) => {
            for child in children {
                render_node(w, mode, child)?;
            }
            Ok(())
        }
    }
}

pub(crate) fn render_element<W: Write + ?Sized>(
    w: &mut W,
    mode: Mode,
    element: &Element,
) -> fmt::Result {
    let name = element.name();
    let attr_str = element
        .attrs()
        .iter()
        .map(|(key, value)| format!(" {}=\"{}\"", key, html_escape(value)))
        .collect::<Vec<_>>()
        .join("");

    if VOID.contains(&name) {
        if mode.contains(Mode::XHTML) {
            write!(w, "<{name}{attr_str} />")?;
        } else {
            write!(w, "<{name}{attr_str}>")?;
        }
        newline(w, mode)
    } else {
        write!(w, "<{name}{attr_str}>")?;
        newline(w, mode)?;
        render_children(w, mode, element.child_nodes())?;
        write!(w, "</{name}>")?;
        newline(w, mode)
    }
}

fn render_children<W: Write + ?Sized>(w: &mut W, mode: Mode, children: &[Node]) -> fmt::Result {
    if mode.contains(Mode::PRETTY) {
        let mut buf = String::new();
        for child in children {
            render_node(&mut buf, mode, child)?;
        }

        for line in buf.lines() {
            writeln!(w, "  {}", line)?;
        }
    } else {
        for child in children {
            render_node(w, mode, child)?;
        }
    }
    Ok(())
}

fn newline<W: Write + ?Sized>(w: &mut W, mode: Mode) -> fmt::Result {
    if mode.contains(Mode::PRETTY) {
        writeln!(w)
    } else {
        Ok(())
    }
}

// See https://cheatsheetseries.owasp.org/cheatsheets/Cross_Site_Scripting_Prevention_Cheat_Sheet.html#output-encoding-for-html-contexts
fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
