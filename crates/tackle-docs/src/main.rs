//! `tackle-docs`: builds and serves the AzureTackle documentation site.
//!
//! `dev` runs the live server with state-preserving reload and devtools,
//! `build` exports a static site, `serve` previews that export and `init`
//! writes a starter `docs.toml`.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "tackle-docs", version)]
#[command(about = "Documentation site for the AzureTackle library")]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Site configuration file
    #[arg(short, long, global = true, default_value = "docs.toml")]
    config: PathBuf,

    /// Log at debug level, overriding RUST_LOG
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter docs.toml
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        yes: bool,
    },

    /// Run the live development server
    Dev {
        /// Listen port, overriding [dev].port
        #[arg(short, long)]
        port: Option<u16>,

        #[arg(long)]
        no_open: bool,
    },

    /// Export the site as static files
    Build {
        /// Output directory, overriding [build].output
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(long)]
        no_minify: bool,
    },

    /// Preview an exported site
    Serve {
        #[arg(short, long, default_value = "4000")]
        port: u16,

        #[arg(short, long, default_value = "dist")]
        dir: PathBuf,
    },
}

/// Log filter: `debug` when verbose, else `RUST_LOG` falling back to `info`.
fn log_filter(verbose: bool) -> EnvFilter {
    if verbose {
        return EnvFilter::new("debug");
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

async fn run(cli: Cli) -> Result<()> {
    let config = cli.config.as_path();

    match cli.command {
        Commands::Init { yes } => commands::init::run(config, yes).await,
        Commands::Dev { port, no_open } => commands::dev::run(config, port, !no_open).await,
        Commands::Build { output, no_minify } => {
            let minify = no_minify.then_some(false);
            commands::build::run(config, output, minify).await
        }
        Commands::Serve { port, dir } => commands::serve::run(port, dir).await,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    fmt()
        .with_env_filter(log_filter(cli.verbose))
        .with_target(false)
        .init();

    run(cli).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["tackle-docs", "dev", "--port", "9000", "-c", "site.toml"])
            .unwrap();

        assert_eq!(cli.config, PathBuf::from("site.toml"));
        match cli.command {
            Commands::Dev { port, no_open } => {
                assert_eq!(port, Some(9000));
                assert!(!no_open);
            }
            _ => panic!("expected dev command"),
        }
    }

    #[test]
    fn build_flags_default_to_config() {
        let cli = Cli::try_parse_from(["tackle-docs", "build"]).unwrap();

        match cli.command {
            Commands::Build { output, no_minify } => {
                assert_eq!(output, None);
                assert!(!no_minify);
            }
            _ => panic!("expected build command"),
        }
    }

    #[test]
    fn verbose_forces_debug_logging() {
        assert_eq!(log_filter(true).to_string(), "debug");
    }
}
