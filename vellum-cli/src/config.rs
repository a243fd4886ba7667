use std::{
    collections::{BTreeMap, BTreeSet},
    fs,
};

use anyhow::{Context, Result};
use camino::Utf8Path;
use serde::Deserialize;

use crate::{page::Registry, shell};

pub const DEFAULT_PATH: &str = "vellum.toml";

/// Site-wide settings plus one [`Route`] per renderable page.
#[derive(Clone, Default, Deserialize, Debug)]
#[serde(default)]
pub struct Config {
    pub domain: String,
    /// Address `serve` listens on, e.g. `127.0.0.1:8080`.
    pub proxy_address: String,
    /// Origin that `serve` forwards every request to.
    pub backend_server: String,
    pub site_name: String,
    pub site_owner: String,
    pub site_logo_url: String,
    pub twitter_id: Option<String>,
    pub facebook_app_id: Option<String>,
    #[serde(rename = "route")]
    pub routes: BTreeMap<String, Route>,
}

#[derive(Clone, PartialEq, Eq, Deserialize, Debug)]
#[serde(default)]
pub struct Route {
    pub path: String,
    /// Element of the HTML shell that receives the rendered page.
    pub body_selector: String,
    pub title: Option<String>,
    pub ogp: bool,
    pub ssr: bool,
}

impl Default for Route {
    fn default() -> Self {
        Self {
            path: "/".to_string(),
            body_selector: "#root".to_string(),
            title: None,
            ogp: false,
            ssr: false,
        }
    }
}

impl Config {
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("`{path}` is not a valid config file"))?;

        let (config, unused) =
            Self::parse(&contents).with_context(|| format!("failed to parse `{path}`"))?;
        for key in unused {
            shell().warn(format!("{path}: unused config key: {key}"));
        }
        Ok(config)
    }

    /// Parses `contents`, also returning the keys that were not recognized.
    pub fn parse(contents: &str) -> Result<(Self, BTreeSet<String>), toml::de::Error> {
        let mut unused = BTreeSet::new();
        let config = serde_ignored::deserialize(toml::Deserializer::new(contents), |path| {
            unused.insert(path.to_string());
        })?;
        Ok((config, unused))
    }

    /// A configuration with one server-rendered route per registered page.
    pub fn from_registry(registry: &Registry) -> Self {
        let routes = registry
            .names()
            .map(|name| {
                let route = Route {
                    path: format!("/{name}"),
                    ssr: true,
                    ..Route::default()
                };
                (name.to_string(), route)
            })
            .collect();

        Self {
            routes,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use vellum_core::Node;

    use super::*;

    const SITE: &str = r##"
domain = "https://example.com"
proxy_address = "127.0.0.1:8080"
backend_server = "http://127.0.0.1:3000"
site_name = "Example"
site_owner = "someone"
site_logo_url = "https://example.com/logo.png"
twitter_id = "@example"
color = "blue"

[route.hello]
path = "/"
ogp = true
ssr = true

[route.about]
path = "/about"
body_selector = "main"
title = "About us"
cache = 3600
"##;

    #[test]
    fn parses_routes_with_defaults() {
        let (config, _) = Config::parse(SITE).unwrap();
        assert_eq!(config.domain, "https://example.com");
        assert_eq!(config.proxy_address, "127.0.0.1:8080");
        assert_eq!(config.backend_server, "http://127.0.0.1:3000");
        assert_eq!(config.twitter_id.as_deref(), Some("@example"));
        assert_eq!(config.facebook_app_id, None);

        let hello = &config.routes["hello"];
        assert_eq!(hello.body_selector, "#root");
        assert!(hello.ogp && hello.ssr);
        assert_eq!(hello.title, None);

        let about = &config.routes["about"];
        assert_eq!(about.body_selector, "main");
        assert_eq!(about.title.as_deref(), Some("About us"));
        assert!(!about.ogp && !about.ssr);
    }

    #[test]
    fn reports_unused_keys() {
        let (_, unused) = Config::parse(SITE).unwrap();
        let unused = unused.into_iter().collect::<Vec<_>>();
        assert_eq!(unused, ["color", "route.about.cache"]);
    }

    #[test]
    fn rejects_wrong_types() {
        assert!(Config::parse("[route.hello]\nssr = \"yes\"\n").is_err());
    }

    #[test]
    fn routes_from_registry() {
        let registry = Registry::new()
            .page("hello", || Node::text("hi"))
            .page("about", || Node::text("about"));
        let config = Config::from_registry(&registry);

        assert_eq!(config.routes.len(), 2);
        assert_eq!(config.routes["about"].path, "/about");
        assert!(config.routes["hello"].ssr);
        assert!(!config.routes["hello"].ogp);
    }
}
