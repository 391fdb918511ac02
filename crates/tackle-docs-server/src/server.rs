//! Development server implementation.

use std::net::SocketAddr;
use std::path::{Path as FsPath, PathBuf};
use std::sync::Arc;

use axum::{
    extract::{ws::WebSocketUpgrade, Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use tower_http::cors::CorsLayer;

use tackle_docs_app::{ConfigFile, DevConfig, Page, ProgramOptions, SiteConfig};
use tackle_docs_static::{AssetPipeline, Context, TemplateEngine};

use crate::context::AppContext;
use crate::devtools;
use crate::session::run_session;
use crate::watcher::{FileWatcher, WatchEvent};
use crate::websocket::{live_client_script, LiveMessage};

const LIVE_PATH: &str = "/__live";

/// Configuration for the development server.
#[derive(Debug, Clone)]
pub struct DevServerConfig {
    /// Configuration file, watched for changes
    pub config_path: PathBuf,

    /// Site settings
    pub site: SiteConfig,

    /// Server and middleware settings
    pub dev: DevConfig,

    /// Open browser on start
    pub open: bool,
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from("docs.toml"),
            site: SiteConfig::default(),
            dev: DevConfig::default(),
            open: true,
        }
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid listen address {0}")]
    AddressError(String),

    #[error("Failed to bind to {0}: {1}")]
    BindError(SocketAddr, String),

    #[error("File watch error: {0}")]
    WatchError(String),

    #[error("Template error: {0}")]
    TemplateError(String),
}

/// Shared server state.
struct ServerState {
    ctx: Arc<AppContext>,
    templates: TemplateEngine,
}

/// Development server.
pub struct DevServer {
    config: DevServerConfig,
}

impl DevServer {
    /// Create a new development server.
    pub fn new(config: DevServerConfig) -> Self {
        Self { config }
    }

    /// Start the development server.
    pub async fn start(self) -> Result<(), ServerError> {
        let address = format!("{}:{}", self.config.dev.host, self.config.dev.port);
        let addr: SocketAddr = address
            .parse()
            .map_err(|_| ServerError::AddressError(address.clone()))?;

        let options = ProgramOptions::from_dev_config(&self.config.dev);
        let ctx = Arc::new(AppContext::new(self.config.site.clone(), options));

        // Set up file watcher
        let styles: Vec<PathBuf> = self
            .config
            .site
            .local_styles()
            .map(FsPath::to_path_buf)
            .collect();
        let (watcher, mut rx) = FileWatcher::new(&self.config.config_path, &styles)
            .map_err(|e| ServerError::WatchError(e.to_string()))?;

        // Spawn file watch handler
        let watch_ctx = Arc::clone(&ctx);
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                handle_watch_event(&watch_ctx, event).await;
            }
            // Keep watcher alive
            drop(watcher);
        });

        let app = router(Arc::clone(&ctx), self.config.dev.devtools.enabled)?;

        tracing::info!("Starting dev server at http://{}", addr);

        // Open browser if configured
        if self.config.open {
            let url = format!("http://{}", addr);
            if let Err(e) = open::that(&url) {
                tracing::warn!("Failed to open browser: {}", e);
            }
        }

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        Ok(())
    }
}

/// Build the application router.
fn router(ctx: Arc<AppContext>, devtools_enabled: bool) -> Result<Router, ServerError> {
    let templates =
        TemplateEngine::new().map_err(|e| ServerError::TemplateError(e.to_string()))?;
    let state = Arc::new(ServerState {
        ctx: Arc::clone(&ctx),
        templates,
    });

    let mut app = Router::new()
        .route("/", get(index_handler))
        .route("/assets/{file}", get(asset_handler))
        .route(LIVE_PATH, get(ws_handler))
        .route("/__live.js", get(live_script_handler))
        .with_state(state);

    if devtools_enabled {
        tracing::info!("Devtools available under /__devtools");
        app = app.nest(
            "/__devtools",
            devtools::routes().with_state(ctx).layer(CorsLayer::permissive()),
        );
    }

    Ok(app)
}

/// Handle file watch events.
async fn handle_watch_event(ctx: &AppContext, event: WatchEvent) {
    match event {
        WatchEvent::ConfigModified(path) => {
            tracing::info!("Config modified: {}", path.display());

            match ConfigFile::load(&path) {
                Ok(config) => {
                    ctx.replace_site(config.site).await;
                    let sessions = ctx.hub().subscriber_count();
                    tracing::info!("Re-rendering {} live sessions", sessions);
                    ctx.hub().send(LiveMessage::Rerender);
                }
                Err(e) => tracing::warn!("Keeping previous settings: {}", e),
            }
        }

        WatchEvent::StyleModified(path) => {
            tracing::info!("Stylesheet modified: {}", path.display());
            ctx.hub().send(LiveMessage::Reload);
        }

        WatchEvent::Deleted(path) => {
            tracing::warn!("Watched file removed: {}", path.display());
            ctx.hub().send(LiveMessage::Reload);
        }
    }
}

/// Handler for the page shell.
///
/// The first paint shows the landing page; the live session replaces it as
/// soon as the browser reports its location.
async fn index_handler(State(state): State<Arc<ServerState>>) -> Response {
    let site = state.ctx.site().await;
    let initial = tackle_docs_app::State {
        page: Page::ROUTABLE[0],
        theme: site.default_theme.clone(),
    };

    let context = Context {
        site_title: site.title.clone(),
        base_url: "/".to_string(),
        styles: stylesheet_links(&site),
        app_html: tackle_docs_app::view::app_view(&initial, &site).render(),
        default_theme: site.default_theme.clone(),
        script: "/__live.js".to_string(),
        ..Default::default()
    };

    match state.templates.render_page("live.html", &context) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Failed to render shell: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// Remote stylesheets as-is, local ones served from `/assets/`.
fn stylesheet_links(site: &SiteConfig) -> Vec<String> {
    let remote = site.remote_styles().map(str::to_string);
    let local = site
        .local_styles()
        .filter_map(|path| path.file_name().and_then(|f| f.to_str()))
        .map(|name| format!("/assets/{}", name));
    remote.chain(local).collect()
}

/// Handler for the generated stylesheet and configured local ones.
async fn asset_handler(
    State(state): State<Arc<ServerState>>,
    Path(file): Path<String>,
) -> Response {
    if file == "main.css" {
        return css_response(AssetPipeline::generate_css());
    }

    let site = state.ctx.site().await;
    let source = site
        .local_styles()
        .find(|path| path.file_name().and_then(|f| f.to_str()) == Some(file.as_str()));

    let Some(source) = source else {
        return StatusCode::NOT_FOUND.into_response();
    };

    match tokio::fs::read_to_string(source).await {
        Ok(css) => css_response(css),
        Err(e) => {
            tracing::warn!("Failed to read stylesheet {}: {}", source.display(), e);
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

fn css_response(css: String) -> Response {
    ([(header::CONTENT_TYPE, "text/css")], css).into_response()
}

/// Handler for the live WebSocket endpoint.
async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<ServerState>>) -> Response {
    let ctx = Arc::clone(&state.ctx);
    ws.on_upgrade(move |socket| run_session(socket, ctx))
}

/// Handler for the live client script.
async fn live_script_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript")],
        live_client_script(LIVE_PATH),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn context(site: SiteConfig) -> Arc<AppContext> {
        Arc::new(AppContext::new(site, ProgramOptions::default()))
    }

    fn server_state(site: SiteConfig) -> Arc<ServerState> {
        Arc::new(ServerState {
            ctx: context(site),
            templates: TemplateEngine::new().unwrap(),
        })
    }

    async fn body(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn creates_server_with_default_config() {
        let server = DevServer::new(DevServerConfig::default());
        assert_eq!(server.config.dev.port, 8080);
        assert_eq!(server.config.config_path, PathBuf::from("docs.toml"));
    }

    #[test]
    fn builds_router_with_and_without_devtools() {
        assert!(router(context(SiteConfig::default()), true).is_ok());
        assert!(router(context(SiteConfig::default()), false).is_ok());
    }

    #[tokio::test]
    async fn serves_live_shell() {
        let response = index_handler(State(server_state(SiteConfig::default()))).await;
        assert_eq!(response.status(), StatusCode::OK);

        let html = body(response).await;
        assert!(html.contains(r#"<script src="/__live.js"></script>"#));
        assert!(html.contains(r#"id="app""#));
        assert!(html.contains("Installation"));
    }

    #[tokio::test]
    async fn serves_generated_and_local_styles() {
        let temp = tempdir().unwrap();
        let style = temp.path().join("site.css");
        fs::write(&style, ".brand { color: red; }").unwrap();

        let state = server_state(SiteConfig {
            styles: vec![style.display().to_string()],
            ..Default::default()
        });

        let main = asset_handler(State(Arc::clone(&state)), Path("main.css".to_string())).await;
        assert_eq!(main.status(), StatusCode::OK);
        assert!(body(main).await.contains(".mockup-code"));

        let local = asset_handler(State(Arc::clone(&state)), Path("site.css".to_string())).await;
        assert_eq!(body(local).await, ".brand { color: red; }");

        let missing = asset_handler(State(state), Path("other.css".to_string())).await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn config_change_reloads_site_and_rerenders() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("docs.toml");
        fs::write(&path, "[site]\ntitle = \"Reloaded\"\n").unwrap();

        let ctx = context(SiteConfig::default());
        let mut rx = ctx.hub().subscribe();
        assert_eq!(ctx.hub().subscriber_count(), 1);

        handle_watch_event(&ctx, WatchEvent::ConfigModified(path)).await;

        assert_eq!(ctx.site().await.title, "Reloaded");
        assert_eq!(rx.recv().await.unwrap(), LiveMessage::Rerender);
    }

    #[tokio::test]
    async fn broken_config_keeps_previous_settings() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("docs.toml");
        fs::write(&path, "[site\n").unwrap();

        let ctx = context(SiteConfig {
            title: "Kept".to_string(),
            ..Default::default()
        });
        let mut rx = ctx.hub().subscribe();

        handle_watch_event(&ctx, WatchEvent::ConfigModified(path)).await;

        assert_eq!(ctx.site().await.title, "Kept");
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn style_change_reloads_browsers() {
        let ctx = context(SiteConfig::default());
        let mut rx = ctx.hub().subscribe();

        handle_watch_event(&ctx, WatchEvent::StyleModified(PathBuf::from("site.css"))).await;
        assert_eq!(rx.recv().await.unwrap(), LiveMessage::Reload);
    }

    #[test]
    fn links_remote_and_local_styles() {
        let site = SiteConfig {
            styles: vec![
                "https://cdn.example.com/daisy.css".to_string(),
                "styles/site.css".to_string(),
            ],
            ..Default::default()
        };

        assert_eq!(
            stylesheet_links(&site),
            vec![
                "https://cdn.example.com/daisy.css".to_string(),
                "/assets/site.css".to_string()
            ]
        );
    }
}
