use std::{fs, io::Write};

use anyhow::{Context, Result};
use camino::Utf8Path;
use vellum_core::{tree_to_string, Component, Mode};

use crate::{
    config::{self, Config, Route},
    error::LookupError,
    ogp::OpenGraph,
    page::Registry,
    shell,
    splice::Document,
};

/// A configuration paired with the pages it refers to.
pub struct Site {
    pub config: Config,
    pub registry: Registry,
}

impl Site {
    pub fn new(config: Config, registry: Registry) -> Self {
        Self { config, registry }
    }

    /// Loads `config_path`, or `vellum.toml` if present, or derives routes from
    /// the registry.
    pub fn load(config_path: Option<&Utf8Path>, registry: Registry) -> Result<Self> {
        let default = Utf8Path::new(config::DEFAULT_PATH);
        let config = match config_path {
            Some(path) => Config::load(path)?,
            None if default.exists() => Config::load(default)?,
            None => {
                tracing::debug!("no {} found, deriving routes from pages", config::DEFAULT_PATH);
                Config::from_registry(&registry)
            }
        };

        for name in config.routes.keys() {
            if registry.get(name).is_none() {
                shell().warn(format!("route `{name}` has no registered page"));
            }
        }
        Ok(Self::new(config, registry))
    }

    pub fn lookup(&self, name: &str) -> Result<(&Route, &dyn Component), LookupError> {
        let route = self
            .config
            .routes
            .get(name)
            .ok_or_else(|| LookupError::UnknownRoute(name.to_string()))?;
        let page = self
            .registry
            .get(name)
            .ok_or_else(|| LookupError::UnknownPage(name.to_string()))?;
        Ok((route, page))
    }

    // Commands

    /// Renders a route's page, spliced into `shell` when one is given.
    pub fn render(&self, name: &str, shell: Option<&str>, mode: Mode) -> Result<String> {
        let (route, page) = self.lookup(name)?;
        let tree = page.view();
        let body = tree_to_string(mode, &tree);
        tracing::debug!(route = name, nodes = tree.node_count(), "rendered page");

        let Some(shell) = shell else {
            return Ok(body);
        };

        if !route.ssr && !route.ogp {
            return Ok(shell.to_string());
        }

        let mut document = Document::parse(shell);
        let title = document.title();
        if route.ssr {
            document
                .replace_inner(&route.body_selector, &body)
                .with_context(|| format!("failed to insert `{name}` into the shell"))?;
        }
        if route.ogp {
            let tags = OpenGraph::new(&self.config, name, route, &tree, title.as_deref()).to_html();
            document
                .append_to_head(&tags)
                .with_context(|| format!("failed to insert Open Graph tags for `{name}`"))?;
        }
        Ok(document.to_html())
    }

    pub fn meta(&self, name: &str) -> Result<String> {
        let (route, page) = self.lookup(name)?;
        Ok(OpenGraph::new(&self.config, name, route, &page.view(), None).to_html())
    }

    pub fn routes(&self) -> String {
        self.config
            .routes
            .iter()
            .map(|(name, route)| {
                let mut flags = vec![];
                if route.ssr {
                    flags.push("ssr");
                }
                if route.ogp {
                    flags.push("ogp");
                }
                let line = format!("{name:<16} {:<24} {}", route.path, flags.join(","));
                format!("{}\n", line.trim_end())
            })
            .collect()
    }
}

/// Writes `contents` to `path`, or to stdout.
pub fn write_output(path: Option<&Utf8Path>, contents: &str) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, contents).with_context(|| format!("failed to write `{path}`"))?;
        }
        None => {
            let mut stdout = anstream::stdout().lock();
            stdout.write_all(contents.as_bytes())?;
            if !contents.ends_with('\n') {
                writeln!(stdout)?;
            }
        }
    }
    Ok(())
}
