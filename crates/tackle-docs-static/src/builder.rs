//! Static site builder.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;

use tackle_docs_app::view::layout::page_title;
use tackle_docs_app::{pages, view, Page, SiteConfig, State};

use crate::assets::{AssetPipeline, RouteTable};
use crate::templates::{Context, PageTemplate, TemplateEngine};

/// Configuration for building a static site.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Output directory
    pub output_dir: PathBuf,

    /// Minify CSS output
    pub minify: bool,

    /// Site settings shared with the live server
    pub site: SiteConfig,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("dist"),
            minify: true,
            site: SiteConfig::default(),
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of pages rendered
    pub pages: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to read input: {0}")]
    ReadError(String),

    #[error("Failed to render template: {0}")]
    TemplateError(String),

    #[error("Failed to write output: {0}")]
    WriteError(String),
}

/// Static site builder.
pub struct StaticBuilder {
    config: BuildConfig,
    templates: TemplateEngine,
}

impl StaticBuilder {
    /// Create a new static builder.
    pub fn new(config: BuildConfig) -> Result<Self, BuildError> {
        let templates =
            TemplateEngine::new().map_err(|e| BuildError::TemplateError(e.to_string()))?;
        Ok(Self { config, templates })
    }

    /// Build the static site.
    pub async fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        fs::create_dir_all(&self.config.output_dir)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        // Every page is rendered up front; the client only swaps templates.
        let rendered: Vec<PageTemplate> = Page::ALL
            .par_iter()
            .map(|&page| self.render_page(page))
            .collect();

        let initial = rendered
            .iter()
            .find(|p| p.slug == Page::ROUTABLE[0].slug())
            .map(|p| p.html.clone())
            .unwrap_or_default();

        self.write_index(initial, &rendered)?;
        self.generate_assets()?;
        self.generate_search_index()?;

        let duration = start.elapsed();

        Ok(BuildResult {
            pages: rendered.len(),
            duration_ms: duration.as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
        })
    }

    /// Render the application as it looks on `page` with the default theme.
    fn render_page(&self, page: Page) -> PageTemplate {
        let state = State {
            page,
            theme: self.config.site.default_theme.clone(),
        };

        PageTemplate {
            slug: page.slug().to_string(),
            html: view::app_view(&state, &self.config.site).render(),
        }
    }

    fn write_index(&self, initial: String, pages: &[PageTemplate]) -> Result<(), BuildError> {
        let routes_json = serde_json::to_string(&RouteTable::build())
            .map_err(|e| BuildError::WriteError(e.to_string()))?;
        let base_url = &self.config.site.base_url;

        let context = Context {
            site_title: self.config.site.title.clone(),
            base_url: base_url.clone(),
            styles: self.stylesheet_links(),
            app_html: initial,
            default_theme: self.config.site.default_theme.clone(),
            pages: pages.to_vec(),
            routes_json,
            script: format!("{}assets/app.js", base_url),
        };

        let html = self
            .templates
            .render_page("static.html", &context)
            .map_err(|e| BuildError::TemplateError(e.to_string()))?;

        fs::write(self.config.output_dir.join("index.html"), html)
            .map_err(|e| BuildError::WriteError(e.to_string()))
    }

    /// Remote stylesheets as-is, local ones under `assets/`.
    fn stylesheet_links(&self) -> Vec<String> {
        let site = &self.config.site;
        let remote = site.remote_styles().map(str::to_string);
        let local = site
            .local_styles()
            .map(|path| format!("{}assets/{}", site.base_url, file_name(path)));
        remote.chain(local).collect()
    }

    /// Generate static assets.
    fn generate_assets(&self) -> Result<(), BuildError> {
        let assets_dir = self.config.output_dir.join("assets");
        fs::create_dir_all(&assets_dir).map_err(|e| BuildError::WriteError(e.to_string()))?;

        let css = AssetPipeline::generate_css();
        let css = if self.config.minify {
            AssetPipeline::minify_css(&css).unwrap_or(css)
        } else {
            css
        };
        fs::write(assets_dir.join("main.css"), css)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        fs::write(assets_dir.join("app.js"), AssetPipeline::generate_js())
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        // Copy configured stylesheets
        for source_path in self.config.site.local_styles() {
            if source_path.exists() {
                let content = fs::read_to_string(source_path).map_err(|e| {
                    BuildError::ReadError(format!("Failed to read stylesheet: {}", e))
                })?;
                let content = if self.config.minify {
                    AssetPipeline::minify_css(&content).unwrap_or(content)
                } else {
                    content
                };
                fs::write(assets_dir.join(file_name(source_path)), content)
                    .map_err(|e| BuildError::WriteError(e.to_string()))?;
                tracing::info!("Copied stylesheet from {}", source_path.display());
            } else {
                tracing::warn!("Stylesheet not found: {}", source_path.display());
            }
        }

        Ok(())
    }

    /// Generate search index.
    fn generate_search_index(&self) -> Result<(), BuildError> {
        let index: Vec<serde_json::Value> = Page::ROUTABLE
            .iter()
            .map(|&page| {
                let text = pages::content(page, &self.config.site).text_content();
                let content: String = text
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ")
                    .chars()
                    .take(SEARCH_SNIPPET_CHARS)
                    .collect();

                serde_json::json!({
                    "title": page_title(page),
                    "url": page.href(),
                    "content": content,
                })
            })
            .collect();

        let json = serde_json::to_string_pretty(&index)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        fs::write(self.config.output_dir.join("search-index.json"), json)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        Ok(())
    }
}

const SEARCH_SNIPPET_CHARS: usize = 300;

fn file_name(path: &Path) -> &str {
    path.file_name()
        .and_then(|f| f.to_str())
        .unwrap_or("style.css")
}
