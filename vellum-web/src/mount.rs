use vellum_core::{Component, Node};
use wasm_bindgen::intern;

use crate::{util::document, Error};

/// A component attached to a live element.
pub struct Mounted<C> {
    root: web_sys::Element,
    component: C,
}

/// Looks up `selector` and renders `component` into the matched element.
///
/// The first [`view`](Component::view) happens synchronously, before this
/// returns. Existing content of the element is replaced.
pub fn mount<C>(selector: &str, component: C) -> Result<Mounted<C>, Error>
where
    C: Component,
{
    let root = document()?
        .query_selector(selector)?
        .ok_or_else(|| Error::SelectorNotFound(selector.to_string()))?;
    tracing::debug!(selector, "mounting component");

    let mounted = Mounted { root, component };
    mounted.redraw()?;
    Ok(mounted)
}

impl<C: Component> Mounted<C> {
    /// Calls `view` again and swaps the element's content for the new tree.
    pub fn redraw(&self) -> Result<(), Error> {
        let tree = self.component.view();
        tracing::debug!(nodes = tree.node_count(), "rendering view");

        let document = document()?;
        let fragment = document.create_document_fragment();
        materialize(&document, &fragment, &tree).inspect_err(|err| {
            tracing::error!(%err, "failed to build DOM nodes");
        })?;

        self.root.set_text_content(None);
        self.root.append_child(&fragment)?;
        Ok(())
    }

    pub fn root(&self) -> &web_sys::Element {
        &self.root
    }

    pub fn component(&self) -> &C {
        &self.component
    }
}

fn materialize(
    document: &web_sys::Document,
    parent: &web_sys::Node,
    node: &Node,
) -> Result<(), Error> {
    match node {
        Node::Element(element) => {
            let native = document.create_element(intern(element.name()))?;
            for (key, value) in element.attrs() {
                native.set_attribute(intern(key), value)?;
            }
            for child in element.child_nodes() {
                materialize(document, &native, child)?;
            }
            parent.append_child(&native)?;
        }
        Node::Text(content) => {
            let text = document.create_text_node(content);
            parent.append_child(&text)?;
        }
        Node::Fragment(children) => {
            for child in children {
                materialize(document, parent, child)?;
            }
        }
    }
    Ok(())
}
