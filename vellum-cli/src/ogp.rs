//! Open Graph and Twitter card tags derived from a rendered page.

use chrono::{DateTime, SecondsFormat, Utc};
use vellum_core::{Element, Node};

use crate::config::{Config, Route};

pub const DESCRIPTION_LIMIT: usize = 160;

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct OpenGraph {
    pub title: String,
    pub description: String,
    pub image: String,
    pub url: String,
    pub site_name: String,
    pub author: String,
    pub published: DateTime<Utc>,
    pub twitter_site: Option<String>,
    pub facebook_app_id: Option<String>,
}

impl OpenGraph {
    /// Derives the tags for `tree`.
    ///
    /// The title is the route's configured title, then `document_title` (the
    /// `<title>` of the shell the page is rendered into), then the page's first
    /// `h1`, then the route name.
    pub fn new(
        config: &Config,
        name: &str,
        route: &Route,
        tree: &Node,
        document_title: Option<&str>,
    ) -> Self {
        let title = route
            .title
            .clone()
            .or_else(|| document_title.map(str::to_string))
            .or_else(|| {
                tree.find("h1")
                    .map(|h1| h1.text_content().trim().to_string())
                    .filter(|text| !text.is_empty())
            })
            .unwrap_or_else(|| name.to_string());

        let image = tree
            .find("img")
            .and_then(|img| img.get_attr("src"))
            .unwrap_or(config.site_logo_url.as_str())
            .to_string();

        Self {
            title,
            description: describe(tree),
            image,
            url: format!("{}{}", config.domain.trim_end_matches('/'), route.path),
            site_name: config.site_name.clone(),
            author: config.site_owner.clone(),
            published: Utc::now(),
            twitter_site: config.twitter_id.clone(),
            facebook_app_id: config.facebook_app_id.clone(),
        }
    }

    pub fn tags(&self) -> Vec<Element> {
        let property = |key: &str, content: &str| {
            Element::new("meta")
                .attr("property", key)
                .attr("content", content)
        };
        let named = |key: &str, content: &str| {
            Element::new("meta")
                .attr("name", key)
                .attr("content", content)
        };

        let mut tags = vec![
            property("og:title", &self.title),
            property("og:type", "article"),
            property("og:url", &self.url),
            property("og:image", &self.image),
            property("og:description", &self.description),
            property("og:site_name", &self.site_name),
            property("article:author", &self.author),
            property(
                "article:published_time",
                &self.published.to_rfc3339_opts(SecondsFormat::Secs, true),
            ),
            named("twitter:card", "summary"),
        ];
        if let Some(site) = &self.twitter_site {
            tags.push(named("twitter:site", site));
        }
        if let Some(app_id) = &self.facebook_app_id {
            tags.push(property("fb:app_id", app_id));
        }
        tags
    }

    /// One tag per line.
    pub fn to_html(&self) -> String {
        self.tags().iter().map(|tag| format!("{tag}\n")).collect()
    }
}

/// Whitespace-collapsed text of the page, cut to [`DESCRIPTION_LIMIT`] characters.
pub fn describe(tree: &Node) -> String {
    tree.text_content()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(DESCRIPTION_LIMIT)
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn config() -> Config {
        Config {
            domain: "https://example.com/".to_string(),
            site_name: "Example".to_string(),
            site_owner: "someone".to_string(),
            site_logo_url: "https://example.com/logo.png".to_string(),
            twitter_id: Some("@example".to_string()),
            ..Config::default()
        }
    }

    fn page() -> Node {
        Node::element("main")
            .child(Node::element("h1").child("  Big  \"news\" "))
            .child(Node::element("p").child("first\n\n   second"))
            .into()
    }

    #[test]
    fn derives_from_tree() {
        let route = Route {
            path: "/news".to_string(),
            ..Route::default()
        };
        let og = OpenGraph::new(&config(), "news", &route, &page(), None);

        assert_eq!(og.title, "Big  \"news\"");
        assert_eq!(og.description, "Big \"news\" first second");
        assert_eq!(og.image, "https://example.com/logo.png");
        assert_eq!(og.url, "https://example.com/news");
        assert_eq!(og.facebook_app_id, None);
    }

    #[test]
    fn configured_title_and_page_image_win() {
        let route = Route {
            title: Some("Front page".to_string()),
            ..Route::default()
        };
        let tree = Node::element("div")
            .child(Node::element("img").attr("src", "/cover.jpg"))
            .into();
        let og = OpenGraph::new(&config(), "home", &route, &tree, Some("Shell"));

        assert_eq!(og.title, "Front page");
        assert_eq!(og.image, "/cover.jpg");
        assert_eq!(og.url, "https://example.com/");
    }

    #[test]
    fn document_title_comes_before_heading() {
        let route = Route::default();
        let og = OpenGraph::new(&config(), "news", &route, &page(), Some("Shell Title"));
        assert_eq!(og.title, "Shell Title");
    }

    #[test]
    fn falls_back_to_route_name() {
        let og = OpenGraph::new(&config(), "blank", &Route::default(), &Node::text(""), None);
        assert_eq!(og.title, "blank");
        assert_eq!(og.description, "");
    }

    #[test]
    fn description_is_cut_on_char_boundary() {
        let text = "é".repeat(DESCRIPTION_LIMIT + 10);
        let description = describe(&Node::text(text));
        assert_eq!(description.chars().count(), DESCRIPTION_LIMIT);
        assert!(description.chars().all(|c| c == 'é'));
    }

    #[test]
    fn html_is_escaped() {
        let mut og = OpenGraph::new(&config(), "news", &Route::default(), &page(), None);
        og.published = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let html = og.to_html();

        assert!(html.starts_with(
            "<meta property=\"og:title\" content=\"Big  &quot;news&quot;\">\n"
        ));
        assert!(html.contains("<meta name=\"twitter:site\" content=\"@example\">\n"));
        assert!(html.contains(
            "<meta property=\"article:published_time\" content=\"2024-05-01T12:30:00Z\">\n"
        ));
        assert!(!html.contains("fb:app_id"));
        assert_eq!(html.lines().count(), 10);
    }
}
