//! Development server command.

use std::path::Path;

use anyhow::Result;
use tackle_docs_app::ConfigFile;
use tackle_docs_server::{DevServer, DevServerConfig};

/// Run the dev server.
pub async fn run(config_path: &Path, port: Option<u16>, open: bool) -> Result<()> {
    let file = ConfigFile::load(config_path)?;

    let mut dev = file.dev;
    if let Some(port) = port {
        dev.port = port;
    }
    tracing::info!("Starting development server on port {}", dev.port);

    let config = DevServerConfig {
        config_path: config_path.to_path_buf(),
        site: file.site,
        dev,
        open,
    };

    DevServer::new(config).start().await?;

    Ok(())
}
