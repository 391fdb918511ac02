//! Site configuration (`docs.toml`).

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::app::DEFAULT_THEME;

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {message}")]
    ReadError { path: PathBuf, message: String },

    #[error("Failed to parse {path}: {message}")]
    ParseError { path: PathBuf, message: String },
}

/// Configuration file structure (docs.toml).
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct ConfigFile {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub dev: DevConfig,
    #[serde(default)]
    pub build: BuildSettings,
}

/// What the views need to know about the documented package.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct SiteConfig {
    /// Site title, shown in the browser tab
    pub title: String,
    /// NuGet package name shown in the sidebar
    pub package: String,
    /// Source repository, used for "fix docs" links
    pub repository: String,
    /// Path of the page sources inside the repository
    pub docs_path: String,
    /// Base URL (for deployment)
    pub base_url: String,
    /// Theme a fresh session starts with
    pub default_theme: String,
    /// Themes offered by the theme picker
    pub themes: Vec<String>,
    /// Stylesheets: URLs are linked, local paths are copied
    pub styles: Vec<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "AzureTackle".to_string(),
            package: "AzureTackle".to_string(),
            repository: "https://github.com/tforkmann/AzureTackle".to_string(),
            docs_path: "src/Docs/Pages".to_string(),
            base_url: "/".to_string(),
            default_theme: DEFAULT_THEME.to_string(),
            themes: ["light", "dark", "cupcake", "business"]
                .iter()
                .map(|t| t.to_string())
                .collect(),
            styles: vec![],
        }
    }
}

impl SiteConfig {
    /// NuGet gallery page of the package.
    pub fn nuget_url(&self) -> String {
        format!("https://www.nuget.org/packages/{}", self.package)
    }

    /// Version badge of the package.
    pub fn badge_url(&self) -> String {
        format!(
            "https://img.shields.io/nuget/v/{}.svg?style=flat-square",
            self.package
        )
    }

    /// Link to the source file of a documentation page.
    pub fn source_url(&self, file_name: &str) -> String {
        format!(
            "{}/blob/main/{}/{}.fs",
            self.repository.trim_end_matches('/'),
            self.docs_path.trim_matches('/'),
            file_name
        )
    }

    /// Stylesheets given as absolute URLs.
    pub fn remote_styles(&self) -> impl Iterator<Item = &str> {
        self.styles.iter().map(String::as_str).filter(|s| is_url(s))
    }

    /// Stylesheets given as local paths.
    pub fn local_styles(&self) -> impl Iterator<Item = &Path> {
        self.styles
            .iter()
            .map(String::as_str)
            .filter(|s| !is_url(s))
            .map(Path::new)
    }
}

/// Development server settings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct DevConfig {
    pub port: u16,
    pub host: String,
    /// Log every message and resulting state
    pub trace: bool,
    pub devtools: DevtoolsConfig,
}

impl Default for DevConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            trace: false,
            devtools: DevtoolsConfig::default(),
        }
    }
}

/// Time-travel monitor settings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct DevtoolsConfig {
    pub enabled: bool,
    /// State encoding used by the monitor
    pub encoding: String,
    /// Number of history entries kept per session
    pub max_age: usize,
}

impl Default for DevtoolsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            encoding: "json".to_string(),
            max_age: 50,
        }
    }
}

/// Static build settings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct BuildSettings {
    pub output: String,
    pub minify: bool,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            output: "dist".to_string(),
            minify: true,
        }
    }
}

impl ConfigFile {
    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load configuration from `path` if it exists, defaults otherwise.
    ///
    /// Returns an error if the file exists but is malformed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!("{} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config = Self::from_toml(&content, path)?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }
}

fn is_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://") || s.starts_with("//")
}
