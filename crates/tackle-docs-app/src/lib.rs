//! The AzureTackle documentation application.
//!
//! Pages, the hash router, the state/update pair, and the views that turn a
//! state into a markup tree. Hosting (live server, static export) lives in
//! the sibling crates.

pub mod app;
pub mod config;
pub mod devtools;
pub mod pages;
pub mod program;
pub mod router;
pub mod view;

pub use app::{init, init_with_theme, update, Effect, Msg, State};
pub use config::{ConfigError, ConfigFile, DevConfig, SiteConfig};
pub use devtools::{Coders, DevtoolsError, Entry, Monitor};
pub use program::{Program, ProgramOptions};
pub use router::{navigate, normalize, Page};
pub use view::Node;
