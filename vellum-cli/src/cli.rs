use std::process::ExitCode;

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use vellum_core::Mode;

use crate::{
    page::Registry,
    proxy, shell,
    site::{write_output, Site},
};

/// Runs the command line against `registry` and reports failures.
///
/// Meant to be returned straight from a binary's `main`.
pub fn launch(registry: Registry) -> ExitCode {
    init_tracing();

    if let Err(err) = run(registry) {
        shell().error(format!("{err:#}"));
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

pub fn run(registry: Registry) -> Result<()> {
    let cli = Cli::parse();
    let site = Site::load(cli.config.as_deref(), registry)?;

    match cli.command {
        Command::Render {
            route,
            shell: shell_path,
            pretty,
            output,
        } => {
            let shell_html = shell_path
                .as_deref()
                .map(|path| {
                    std::fs::read_to_string(path)
                        .with_context(|| format!("failed to read shell `{path}`"))
                })
                .transpose()?;
            let mode = if pretty { Mode::PRETTY } else { Mode::empty() };

            let html = site.render(&route, shell_html.as_deref(), mode)?;
            write_output(output.as_deref(), &html)?;
            if let Some(path) = output {
                shell().status("Rendered", format!("{route} → {path}"));
            }
        }
        Command::Meta { route } => write_output(None, &site.meta(&route)?)?,
        Command::Routes => write_output(None, &site.routes())?,
        Command::Serve { address } => proxy::serve(&site, address.as_deref())?,
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("VELLUM_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    // a subscriber installed by an embedding program takes precedence
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .try_init();
}

#[derive(Parser)]
#[command(version, about = "Render vellum pages to HTML, or serve them through a proxy")]
struct Cli {
    /// Path to the vellum.toml file
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<Utf8PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a route's page to HTML
    Render {
        route: String,
        /// HTML document to render the page into
        #[arg(long, value_name = "FILE")]
        shell: Option<Utf8PathBuf>,
        /// Put every node on its own line
        #[arg(long)]
        pretty: bool,
        /// Write to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<Utf8PathBuf>,
    },
    /// Print the Open Graph tags for a route
    Meta { route: String },
    /// List configured routes
    Routes,
    /// Proxy `backend_server`, server-rendering configured routes
    Serve {
        /// Listen here instead of at `proxy_address`
        #[arg(long, value_name = "ADDR")]
        address: Option<String>,
    },
}
