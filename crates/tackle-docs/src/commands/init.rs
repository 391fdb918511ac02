//! Write a starter configuration file.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Run the init command.
pub async fn run(config_path: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing tackle-docs...");

    if config_path.exists() && !yes {
        tracing::warn!(
            "{} already exists. Use --yes to overwrite.",
            config_path.display()
        );
        return Ok(());
    }

    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    fs::write(config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    tracing::info!("Created {}", config_path.display());

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'tackle-docs dev' to start the development server.");

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# tackle-docs configuration

[site]
# Browser tab title
title = "AzureTackle"

# NuGet package shown in the sidebar
package = "AzureTackle"

# Repository and page source path, used by "Fix docs file" links
repository = "https://github.com/tforkmann/AzureTackle"
docs_path = "src/Docs/Pages"

# Base URL (for deployment)
base_url = "/"

# Themes offered by the theme picker
default_theme = "light"
themes = ["light", "dark", "cupcake", "business"]

# Stylesheets: URLs are linked, local paths are copied
styles = ["https://cdn.jsdelivr.net/npm/daisyui@2/dist/full.css"]

[dev]
port = 8080
# Log every message and resulting state
trace = false

[dev.devtools]
enabled = true
encoding = "json"
max_age = 50

[build]
output = "dist"
minify = true
"#;
