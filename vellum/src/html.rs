//! Constructors for HTML elements, one per tag.

use vellum_core::Element;

macro_rules! elements {
    ($($tag:ident),* $(,)?) => {
        $(
            #[doc = concat!("&lt;", stringify!($tag), "&gt;")]
            #[doc = "\n"]
            #[doc = concat!("[MDN Documentation](https://developer.mozilla.org/en-US/docs/Web/HTML/Element/", stringify!($tag), ")")]
            pub fn $tag() -> Element {
                Element::new(stringify!($tag))
            }
        )*
    };
}

elements! {
    a, article, aside, b, blockquote, body, br, button, code, div, em, footer, form, h1, h2, h3,
    h4, h5, h6, head, header, hr, html, i, img, input, label, li, link, main, meta, nav, ol,
    option, p, pre, section, select, small, span, strong, table, tbody, td, textarea, th, thead,
    title, tr, ul,
}
