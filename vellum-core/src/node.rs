use std::fmt;

use indexmap::IndexMap;

use crate::{
    attrs::IntoAttr,
    render::{render_element, render_node, Mode},
};

/// An immutable description of a piece of UI.
///
/// Trees are built by value and never mutated afterwards; a component builds a
/// fresh tree on every [`view`](crate::Component::view) call.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Node {
    Element(Element),
    Text(String),
    /// Groups children without introducing an element of its own.
    Fragment(Vec<Node>),
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Element {
    name: String,
    attrs: IndexMap<String, String>,
    children: Vec<Node>,
}

impl Node {
    pub fn element(name: impl Into<String>) -> Element {
        Element::new(name)
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn fragment<I, N>(children: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: IntoNode,
    {
        children.into_iter().collect()
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Concatenated text of this subtree, in document order.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    /// Finds the first element named `tag`, depth-first, starting with `self`.
    pub fn find(&self, tag: &str) -> Option<&Element> {
        match self {
            Self::Element(element) => element.find(tag),
            Self::Text(_) => None,
            Self::Fragment(children) => children.iter().find_map(|child| child.find(tag)),
        }
    }

    /// Number of nodes in this subtree, fragments included.
    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(Self::node_count).sum::<usize>()
    }

    pub fn children(&self) -> &[Self] {
        match self {
            Self::Element(element) => &element.children,
            Self::Text(_) => &[],
            Self::Fragment(children) => children,
        }
    }

    fn collect_text(&self, out: &mut String) {
        if let Self::Text(text) = self {
            out.push_str(text);
        }
        for child in self.children() {
            child.collect_text(out);
        }
    }
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: IndexMap::new(),
            children: vec![],
        }
    }

    /// Sets (or, for an absent value, clears) an attribute.
    pub fn attr<'a>(mut self, key: impl Into<String>, value: impl IntoAttr<'a>) -> Self {
        let key = key.into();
        match value.into_attr() {
            Some(value) => {
                self.attrs.insert(key, value.into_owned());
            }
            None => {
                self.attrs.shift_remove(&key);
            }
        }
        self
    }

    pub fn child(mut self, child: impl IntoNode) -> Self {
        self.children.push(child.into_node());
        self
    }

    pub fn children<I, N>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: IntoNode,
    {
        self.children
            .extend(children.into_iter().map(IntoNode::into_node));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get_attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    pub fn attrs(&self) -> &IndexMap<String, String> {
        &self.attrs
    }

    pub fn child_nodes(&self) -> &[Node] {
        &self.children
    }

    pub fn find(&self, tag: &str) -> Option<&Self> {
        if self.name == tag {
            Some(self)
        } else {
            self.children.iter().find_map(|child| child.find(tag))
        }
    }

    pub fn text_content(&self) -> String {
        self.children.iter().map(Node::text_content).collect()
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render_node(f, Mode::empty(), self)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render_element(f, Mode::empty(), self)
    }
}

pub trait IntoNode {
    fn into_node(self) -> Node;
}

impl IntoNode for Node {
    fn into_node(self) -> Node {
        self
    }
}

impl IntoNode for Element {
    fn into_node(self) -> Node {
        Node::Element(self)
    }
}

impl IntoNode for &str {
    fn into_node(self) -> Node {
        Node::text(self)
    }
}

impl IntoNode for String {
    fn into_node(self) -> Node {
        Node::Text(self)
    }
}

impl<N: IntoNode> IntoNode for Vec<N> {
    fn into_node(self) -> Node {
        self.into_iter().collect()
    }
}

impl<N: IntoNode> IntoNode for Option<N> {
    fn into_node(self) -> Node {
        self.into_iter().collect()
    }
}

impl<N> FromIterator<N> for Node
where
    N: IntoNode,
{
    fn from_iter<T: IntoIterator<Item = N>>(iter: T) -> Self {
        Self::Fragment(iter.into_iter().map(IntoNode::into_node).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_keeps_child_order() {
        let node = Node::element("ul")
            .child(Node::element("li").child("a"))
            .child(Node::element("li").child("b"))
            .children(["c", "d"]);

        let names = node
            .child_nodes()
            .iter()
            .map(|child| match child {
                Node::Element(el) => el.name().to_string(),
                Node::Text(text) => text.clone(),
                Node::Fragment(_) => unreachable!(),
            })
            .collect::<Vec<_>>();
        assert_eq!(names, ["li", "li", "c", "d"]);
    }

    #[test]
    fn absent_attr_clears_previous_value() {
        let el = Node::element("a")
            .attr("href", "/")
            .attr("title", "home")
            .attr("href", None::<&str>);

        assert_eq!(el.get_attr("href"), None);
        assert_eq!(el.get_attr("title"), Some("home"));
        assert_eq!(el.attrs().len(), 1);
    }

    #[test]
    fn queries_walk_fragments() {
        let tree: Node = Node::element("div")
            .child(Node::fragment([
                Node::text("one "),
                Node::element("img").attr("src", "/a.png").into(),
            ]))
            .child(Node::element("span").child("two"))
            .into();

        assert_eq!(tree.text_content(), "one two");
        assert_eq!(tree.find("img").and_then(|img| img.get_attr("src")), Some("/a.png"));
        assert_eq!(tree.find("div").map(Element::name), Some("div"));
        assert!(tree.find("table").is_none());
        assert_eq!(tree.node_count(), 6);
    }

    #[test]
    fn structural_equality() {
        let build = || Node::element("p").attr("class", "x").child("hi");
        assert_eq!(build(), build());
        assert_ne!(build(), build().attr("id", "y"));
    }
}
