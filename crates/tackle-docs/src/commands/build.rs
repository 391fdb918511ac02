//! Static site build command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tackle_docs_app::ConfigFile;
use tackle_docs_static::{BuildConfig, StaticBuilder};

/// Resolve the build settings from the config file and command-line overrides.
fn build_config(file: ConfigFile, output: Option<PathBuf>, minify: Option<bool>) -> BuildConfig {
    BuildConfig {
        output_dir: output.unwrap_or_else(|| PathBuf::from(&file.build.output)),
        minify: minify.unwrap_or(file.build.minify),
        site: file.site,
    }
}

/// Run the build command.
pub async fn run(config_path: &Path, output: Option<PathBuf>, minify: Option<bool>) -> Result<()> {
    tracing::info!("Building static site...");

    let file = ConfigFile::load(config_path)?;
    let config = build_config(file, output, minify);

    let result = StaticBuilder::new(config)?
        .build()
        .await
        .context("Static build failed")?;

    tracing::info!("Built {} pages in {}ms", result.pages, result.duration_ms);
    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_overrides_config() {
        let file = ConfigFile::from_toml(
            "[build]\noutput = \"public\"\nminify = true\n",
            Path::new("docs.toml"),
        )
        .unwrap();

        let config = build_config(file.clone(), None, None);
        assert_eq!(config.output_dir, PathBuf::from("public"));
        assert!(config.minify);

        let config = build_config(file, Some(PathBuf::from("out")), Some(false));
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert!(!config.minify);
    }

    #[tokio::test]
    async fn builds_from_missing_config_with_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let out = temp.path().join("dist");

        run(&temp.path().join("docs.toml"), Some(out.clone()), None)
            .await
            .unwrap();

        assert!(out.join("index.html").exists());
    }
}
