//! Splicing server-rendered pages into an HTML document shell.
//!
//! The shell is parsed with `scraper`, targets are resolved with CSS
//! selectors, and rendered markup is inserted verbatim when the document is
//! serialized again.

use scraper::{node::Comment, Html, Node, Selector};
use thiserror::Error;

#[derive(Clone, PartialEq, Eq, Error, Debug)]
pub enum SpliceError {
    #[error("invalid selector `{selector}`: {message}")]
    Selector { selector: String, message: String },
    #[error("selector `{0}` matched no elements")]
    NotFound(String),
    #[error("element matched by `{0}` cannot have content")]
    Void(String),
}

const VOID: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// A parsed document shell with pending insertions.
pub struct Document {
    html: Html,
    /// Marker comment text and the markup that replaces it.
    inserts: Vec<(String, String)>,
}

impl Document {
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
            inserts: vec![],
        }
    }

    /// Text of the document's `<title>`, if it has a non-empty one.
    pub fn title(&self) -> Option<String> {
        let selector = Selector::parse("title").ok()?;
        let title = self.html.select(&selector).next()?;
        let text = title.text().collect::<String>();
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }

    /// Replaces the content of the first element matching `selector` with `content`.
    pub fn replace_inner(&mut self, selector: &str, content: &str) -> Result<(), SpliceError> {
        self.insert(selector, content, true)
    }

    /// Appends `content` to the end of `<head>`.
    pub fn append_to_head(&mut self, content: &str) -> Result<(), SpliceError> {
        self.insert("head", content, false)
    }

    pub fn to_html(&self) -> String {
        let mut out = self.html.html();
        for (marker, content) in &self.inserts {
            out = out.replacen(&format!("<!--{marker}-->"), content, 1);
        }
        out
    }

    fn insert(&mut self, selector: &str, content: &str, replace: bool) -> Result<(), SpliceError> {
        let parsed = Selector::parse(selector).map_err(|err| SpliceError::Selector {
            selector: selector.to_string(),
            message: err.to_string(),
        })?;
        let target = self
            .html
            .select(&parsed)
            .next()
            .ok_or_else(|| SpliceError::NotFound(selector.to_string()))?;
        if VOID.contains(&target.value().name()) {
            return Err(SpliceError::Void(selector.to_string()));
        }
        let id = target.id();

        let marker = format!("vellum-insert-{}", self.inserts.len());
        if let Some(mut node) = self.html.tree.get_mut(id) {
            if replace {
                while let Some(mut child) = node.first_child() {
                    child.detach();
                }
            }
            node.append(Node::Comment(Comment {
                comment: marker.as_str().into(),
            }));
        }
        self.inserts.push((marker, content.to_string()));
        Ok(())
    }
}
