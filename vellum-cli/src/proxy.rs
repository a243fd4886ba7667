//! Reverse proxy that server-renders configured routes.
//!
//! Every request is forwarded to `backend_server`. `GET` requests for routes
//! with `ssr` or `ogp` enabled get the backend's HTML back with the page
//! spliced in, and the result is kept for [`CACHE_TTL`] per request URL.
//!
//! Pages are rendered on the thread that called [`serve`]; the HTTP side runs
//! on a tokio runtime and hands render jobs over a channel.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
    time::{Duration, Instant},
};

use anyhow::{anyhow, bail, Context, Result};
use axum::{
    body::{Body, Bytes},
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use tokio::{
    net::TcpListener,
    sync::{mpsc, oneshot},
};
use vellum_core::Mode;

use crate::{config::Config, shell, site::Site};

/// How long a rendered page is served from memory.
pub const CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// Rendered documents keyed by request URL.
#[derive(Debug)]
pub struct RenderCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, (Instant, Arc<str>)>>,
}

impl RenderCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::default(),
        }
    }

    pub fn get(&self, url: &str) -> Option<Arc<str>> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let fresh = entries
            .get(url)
            .filter(|(stored, _)| stored.elapsed() < self.ttl)
            .map(|(_, html)| html.clone());
        if fresh.is_none() {
            entries.remove(url);
        }
        fresh
    }

    pub fn insert(&self, url: impl Into<String>, html: impl Into<Arc<str>>) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.retain(|_, (stored, _)| stored.elapsed() < self.ttl);
        entries.insert(url.into(), (Instant::now(), html.into()));
    }
}

/// A shell from the backend waiting to have a route's page spliced in.
struct RenderJob {
    route: String,
    shell: String,
    reply: oneshot::Sender<Result<String>>,
}

struct Proxy {
    client: reqwest::Client,
    /// Backend origin without a trailing slash.
    backend: String,
    /// Path of every rendered route, mapped to the route name.
    routes: HashMap<String, String>,
    cache: RenderCache,
    jobs: mpsc::Sender<RenderJob>,
}

impl Proxy {
    fn new(config: &Config, jobs: mpsc::Sender<RenderJob>, cache: RenderCache) -> Result<Self> {
        if config.backend_server.is_empty() {
            bail!("`backend_server` is not set");
        }
        reqwest::Url::parse(&config.backend_server)
            .with_context(|| format!("invalid `backend_server` `{}`", config.backend_server))?;

        let routes = config
            .routes
            .iter()
            .filter(|(_, route)| route.ssr || route.ogp)
            .map(|(name, route)| (route.path.clone(), name.clone()))
            .collect();

        Ok(Self {
            client: reqwest::Client::new(),
            backend: config.backend_server.trim_end_matches('/').to_string(),
            routes,
            cache,
            jobs,
        })
    }

    fn rendered_route(&self, method: &Method, path: &str) -> Option<&str> {
        if method != Method::GET {
            return None;
        }
        self.routes.get(path).map(String::as_str)
    }

    async fn respond(&self, request: Request) -> Result<Response> {
        let url = request.uri().to_string();
        let route = self
            .rendered_route(request.method(), request.uri().path())
            .map(str::to_string);

        if route.is_some() {
            if let Some(html) = self.cache.get(&url) {
                tracing::debug!(%url, "serving cached render");
                let mut headers = HeaderMap::new();
                headers.insert(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("text/html; charset=utf-8"),
                );
                return Ok(response(StatusCode::OK, headers, html.to_string()));
            }
        }

        let (status, headers, body) = self.forward(request, route.is_some()).await?;
        let Some(route) = route.filter(|_| status.is_success()) else {
            return Ok(response(status, headers, body));
        };
        let Ok(shell) = String::from_utf8(body.to_vec()) else {
            tracing::warn!(%url, "backend sent a non UTF-8 document, passing it through");
            return Ok(response(status, headers, body));
        };

        let html = self.render(route, shell).await?;
        self.cache.insert(url, html.as_str());
        Ok(response(status, headers, html))
    }

    async fn forward(
        &self,
        request: Request,
        rendered: bool,
    ) -> Result<(StatusCode, HeaderMap, Bytes)> {
        let (parts, body) = request.into_parts();
        let path = parts.uri.path_and_query().map_or("/", |pq| pq.as_str());
        let url = format!("{}{path}", self.backend);
        let body = axum::body::to_bytes(body, usize::MAX)
            .await
            .context("failed to read the request body")?;

        let mut headers = parts.headers;
        headers.remove(header::HOST);
        headers.remove(header::CONTENT_LENGTH);
        if rendered {
            // the document is edited as text
            headers.remove(header::ACCEPT_ENCODING);
        }

        let upstream = self
            .client
            .request(parts.method, &url)
            .headers(headers)
            .body(body)
            .send()
            .await
            .with_context(|| format!("request to `{url}` failed"))?;
        let status = upstream.status();
        let headers = upstream.headers().clone();
        let body = upstream
            .bytes()
            .await
            .with_context(|| format!("failed to read the response from `{url}`"))?;
        Ok((status, headers, body))
    }

    async fn render(&self, route: String, shell: String) -> Result<String> {
        let (reply, result) = oneshot::channel();
        self.jobs
            .send(RenderJob {
                route,
                shell,
                reply,
            })
            .await
            .map_err(|_| anyhow!("the renderer has stopped"))?;
        result.await.context("the renderer dropped the request")?
    }
}

fn response(status: StatusCode, mut headers: HeaderMap, body: impl Into<Body>) -> Response {
    // the body is sent in one piece, its length is set again on the way out
    headers.remove(header::CONTENT_LENGTH);
    headers.remove(header::TRANSFER_ENCODING);

    let mut response = Response::new(body.into());
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}

async fn handle(State(proxy): State<Arc<Proxy>>, request: Request) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    match proxy.respond(request).await {
        Ok(response) => {
            tracing::info!("[{}] {method} {uri}", response.status().as_u16());
            response
        }
        Err(err) => {
            tracing::error!("[502] {method} {uri}: {err:#}");
            (StatusCode::BAD_GATEWAY, format!("proxy error: {err:#}")).into_response()
        }
    }
}

fn router(proxy: Proxy) -> Router {
    Router::new().fallback(handle).with_state(Arc::new(proxy))
}

/// Renders queued pages on the calling thread until every sender is gone.
fn render_jobs(site: &Site, queue: &mut mpsc::Receiver<RenderJob>) {
    while let Some(job) = queue.blocking_recv() {
        let result = site.render(&job.route, Some(&job.shell), Mode::empty());
        if let Err(err) = &result {
            tracing::warn!(route = %job.route, "render failed: {err:#}");
        }
        // the request may have been cancelled
        let _ = job.reply.send(result);
    }
}

/// Runs the proxy on `address`, or the configured `proxy_address`, until the
/// server fails.
pub fn serve(site: &Site, address: Option<&str>) -> Result<()> {
    let address = address.unwrap_or(&site.config.proxy_address);
    if address.is_empty() {
        bail!("`proxy_address` is not set");
    }

    let (jobs, mut queue) = mpsc::channel(32);
    let proxy = Proxy::new(&site.config, jobs, RenderCache::new(CACHE_TTL))?;
    let backend = proxy.backend.clone();

    let runtime = tokio::runtime::Runtime::new().context("failed to start the async runtime")?;
    let listener = runtime
        .block_on(TcpListener::bind(address))
        .with_context(|| format!("failed to listen on `{address}`"))?;
    shell().status("Listening", format!("http://{address} → {backend}"));

    let server = runtime.spawn(async move { axum::serve(listener, router(proxy)).await });
    render_jobs(site, &mut queue);

    runtime
        .block_on(server)
        .context("the server task failed")?
        .context("the server stopped")
}

#[cfg(test)]
mod tests {
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        thread,
    };

    use axum::response::Html;
    use vellum_core::Node;

    use super::*;
    use crate::page::Registry;

    const SHELL: &str = "<html><head><title>Shop</title></head><body><div id=\"root\"></div></body></html>";

    fn config(backend: &str) -> Config {
        let (config, _) = Config::parse(&format!(
            r#"
backend_server = "{backend}"

[route.home]
path = "/"
ssr = true
ogp = true

[route.about]
path = "/about"
"#
        ))
        .unwrap();
        config
    }

    fn proxy(backend: &str) -> (Proxy, mpsc::Receiver<RenderJob>) {
        let (jobs, queue) = mpsc::channel(4);
        let proxy = Proxy::new(&config(backend), jobs, RenderCache::new(CACHE_TTL)).unwrap();
        (proxy, queue)
    }

    async fn spawn(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await });
        format!("http://{address}")
    }

    #[test]
    fn cache_entries_expire() {
        let cache = RenderCache::new(CACHE_TTL);
        cache.insert("/?a=1", "<p>a</p>");
        assert_eq!(cache.get("/?a=1").as_deref(), Some("<p>a</p>"));
        assert_eq!(cache.get("/?a=2"), None);

        let stale = RenderCache::new(Duration::ZERO);
        stale.insert("/", "<p>a</p>");
        assert_eq!(stale.get("/"), None);
    }

    #[test]
    fn only_gets_of_rendered_routes() {
        let (proxy, _queue) = proxy("http://127.0.0.1:3000/");
        assert_eq!(proxy.backend, "http://127.0.0.1:3000");
        assert_eq!(proxy.rendered_route(&Method::GET, "/"), Some("home"));
        assert_eq!(proxy.rendered_route(&Method::POST, "/"), None);
        assert_eq!(proxy.rendered_route(&Method::GET, "/about"), None);
        assert_eq!(proxy.rendered_route(&Method::GET, "/missing"), None);
    }

    #[test]
    fn backend_is_required() {
        let (jobs, _queue) = mpsc::channel(1);
        let err = Proxy::new(&Config::default(), jobs.clone(), RenderCache::new(CACHE_TTL));
        assert!(err.is_err());
        let err = Proxy::new(&config("not a url"), jobs, RenderCache::new(CACHE_TTL));
        assert!(err.is_err());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn renders_routes_and_forwards_the_rest() {
        let hits = Arc::new(AtomicUsize::new(0));
        let backend = Router::new().fallback({
            let hits = hits.clone();
            move |request: Request| async move {
                if request.uri().path() == "/" {
                    hits.fetch_add(1, Ordering::SeqCst);
                    Html(SHELL).into_response()
                } else {
                    let body = axum::body::to_bytes(request.into_body(), usize::MAX)
                        .await
                        .unwrap();
                    format!("echo {}", String::from_utf8_lossy(&body)).into_response()
                }
            }
        });
        let backend = spawn(backend).await;

        let (proxy, mut queue) = proxy(&backend);
        let site_config = config(&backend);
        thread::spawn(move || {
            let home = || -> Node { Node::element("h1").child("Home").into() };
            let site = Site::new(site_config, Registry::new().page("home", home));
            render_jobs(&site, &mut queue);
        });
        let address = spawn(router(proxy)).await;

        let client = reqwest::Client::new();
        let page = client
            .get(format!("{address}/"))
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert!(page.contains("<div id=\"root\"><h1>Home</h1></div>"));
        assert!(page.contains("<meta property=\"og:title\" content=\"Shop\">"));

        let again = client
            .get(format!("{address}/"))
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert_eq!(again, page);
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        let echoed = client
            .post(format!("{address}/api/items"))
            .body("payload")
            .send()
            .await
            .unwrap();
        assert_eq!(echoed.status(), StatusCode::OK);
        assert_eq!(echoed.text().await.unwrap(), "echo payload");
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_bad_gateway() {
        let (proxy, _queue) = proxy("http://127.0.0.1:9");
        let address = spawn(router(proxy)).await;

        let response = reqwest::get(format!("{address}/about")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
