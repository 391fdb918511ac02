//! Live development server for the AzureTackle documentation site.
//!
//! Each browser tab drives its own [`tackle_docs_app::Program`] over a
//! WebSocket. Session state survives reloads and reconnects, the
//! configuration file and stylesheets are watched, and a time-travel
//! monitor is exposed over HTTP.

pub mod context;
pub mod devtools;
pub mod server;
pub mod session;
pub mod watcher;
pub mod websocket;

pub use context::{AppContext, SessionInfo};
pub use server::{DevServer, DevServerConfig, ServerError};
pub use session::{run_session, SessionCommand, Transport};
pub use watcher::{FileWatcher, WatchEvent};
pub use websocket::{ClientMessage, LiveHub, LiveMessage, ServerMessage};
