//! WebSocket protocol between the browser and live sessions.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use tackle_docs_app::router;
use tackle_docs_app::Msg;

/// Messages broadcast to every live session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiveMessage {
    /// Site configuration changed; re-render with the current state
    Rerender,

    /// Assets changed; the browser should reload the page
    Reload,
}

/// Messages sent by the browser.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// First message of a connection
    Hello {
        /// Current location hash
        hash: String,
        /// Session id from a previous connection of this tab
        #[serde(default)]
        session: Option<String>,
    },

    /// The location hash changed
    UrlChanged { hash: String },

    /// The theme picker changed
    SetTheme { theme: String },
}

impl ClientMessage {
    /// Translate a browser event into an application message.
    ///
    /// `Hello` is connection bookkeeping and carries no message.
    pub fn into_msg(self) -> Option<Msg> {
        match self {
            ClientMessage::Hello { .. } => None,
            ClientMessage::UrlChanged { hash } => Some(Msg::UrlChanged(router::parse_hash(&hash))),
            ClientMessage::SetTheme { theme } => Some(Msg::SetTheme(theme)),
        }
    }
}

/// Messages sent to the browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Session id to present when reconnecting
    Welcome { session: String },

    /// Replace the application markup
    Render { html: String },

    /// Move the browser to a hash URL
    Navigate { hash: String },

    /// Full page reload
    Reload,
}

/// Hub for broadcasting live messages to all connected sessions.
#[derive(Debug, Clone)]
pub struct LiveHub {
    sender: broadcast::Sender<LiveMessage>,
}

impl LiveHub {
    /// Create a new live hub.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(100);
        Self { sender }
    }

    /// Send a message to all connected sessions.
    pub fn send(&self, msg: LiveMessage) {
        // Ignore send errors (no receivers)
        let _ = self.sender.send(msg);
    }

    /// Subscribe to live messages.
    pub fn subscribe(&self) -> broadcast::Receiver<LiveMessage> {
        self.sender.subscribe()
    }

    /// Get the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for LiveHub {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate the client-side live script.
///
/// The script forwards hash changes and theme picks to the server and
/// swaps in whatever markup comes back. It keeps its session id in
/// `sessionStorage` so a reload resumes the same state.
pub fn live_client_script(ws_path: &str) -> String {
    format!(
        r#"
(function() {{
  'use strict';

  const SESSION_KEY = 'tackle-docs-session';
  const app = document.getElementById('app');
  const url = (location.protocol === 'https:' ? 'wss://' : 'ws://') + location.host + '{}';
  const maxReconnectAttempts = 10;
  let reconnectAttempts = 0;
  let ws = null;

  function send(msg) {{
    if (ws && ws.readyState === WebSocket.OPEN) {{
      ws.send(JSON.stringify(msg));
    }}
  }}

  function connect() {{
    ws = new WebSocket(url);

    ws.onopen = function() {{
      console.log('[live] Connected');
      reconnectAttempts = 0;
      send({{
        type: 'hello',
        hash: location.hash,
        session: sessionStorage.getItem(SESSION_KEY)
      }});
    }};

    ws.onmessage = function(event) {{
      const msg = JSON.parse(event.data);

      switch (msg.type) {{
        case 'welcome':
          sessionStorage.setItem(SESSION_KEY, msg.session);
          break;

        case 'render':
          app.innerHTML = msg.html;
          break;

        case 'navigate':
          if (location.hash !== msg.hash) {{
            location.hash = msg.hash;
          }}
          break;

        case 'reload':
          location.reload();
          break;
      }}
    }};

    ws.onclose = function() {{
      console.log('[live] Disconnected');
      if (reconnectAttempts < maxReconnectAttempts) {{
        reconnectAttempts++;
        setTimeout(connect, 1000 * reconnectAttempts);
      }}
    }};

    ws.onerror = function(e) {{
      console.error('[live] WebSocket error:', e);
    }};
  }}

  window.addEventListener('hashchange', function() {{
    send({{ type: 'url_changed', hash: location.hash }});
  }});

  document.addEventListener('change', function(event) {{
    const target = event.target;
    if (target && target.dataset && target.dataset.msg === 'set_theme') {{
      send({{ type: 'set_theme', theme: target.value }});
    }}
  }});

  connect();
}})();
"#,
        ws_path
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tackle_docs_app::Page;

    #[test]
    fn hub_broadcasts_messages() {
        let hub = LiveHub::new();
        let mut rx = hub.subscribe();

        hub.send(LiveMessage::Reload);

        match rx.try_recv() {
            Ok(LiveMessage::Reload) => {}
            _ => panic!("Expected Reload message"),
        }
        assert_eq!(hub.subscriber_count(), 1);
    }

    #[test]
    fn parses_client_messages() {
        let hello: ClientMessage =
            serde_json::from_str(r##"{"type":"hello","hash":"#/docs/use","session":null}"##)
                .unwrap();
        assert_eq!(
            hello,
            ClientMessage::Hello {
                hash: "#/docs/use".to_string(),
                session: None,
            }
        );

        let theme: ClientMessage =
            serde_json::from_str(r#"{"type":"set_theme","theme":"dark"}"#).unwrap();
        assert_eq!(theme.into_msg(), Some(Msg::SetTheme("dark".to_string())));
    }

    #[test]
    fn url_changes_resolve_through_router() {
        let known = ClientMessage::UrlChanged {
            hash: "#/querytable".to_string(),
        };
        let unknown = ClientMessage::UrlChanged {
            hash: "#/unknown/path".to_string(),
        };

        assert_eq!(known.into_msg(), Some(Msg::UrlChanged(Page::QueryTable)));
        assert_eq!(unknown.into_msg(), Some(Msg::UrlChanged(Page::NotFound)));
    }

    #[test]
    fn rejects_unknown_client_messages() {
        assert!(serde_json::from_str::<ClientMessage>(r#"{"type":"click"}"#).is_err());
    }

    #[test]
    fn serializes_server_messages() {
        let msg = ServerMessage::Navigate {
            hash: "#/docs/install".to_string(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r##"{"type":"navigate","hash":"#/docs/install"}"##);

        let json = serde_json::to_string(&ServerMessage::Reload).unwrap();
        assert_eq!(json, r#"{"type":"reload"}"#);
    }

    #[test]
    fn script_targets_socket_path() {
        let script = live_client_script("/__live");
        assert!(script.contains("location.host + '/__live'"));
        assert!(script.contains("hashchange"));
    }
}
