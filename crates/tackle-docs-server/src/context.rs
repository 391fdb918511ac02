//! State shared by every live session.
//!
//! Sessions are keyed by an id the browser keeps in `sessionStorage`. When
//! a tab reloads or reconnects, it presents the id again and picks up the
//! state it left behind instead of starting over.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use serde::Serialize;
use tokio::sync::{mpsc, RwLock};

use tackle_docs_app::{ProgramOptions, SiteConfig, State};

use crate::session::SessionCommand;
use crate::websocket::LiveHub;

/// Preserved sessions kept once their socket is gone.
const MAX_PRESERVED_SESSIONS: usize = 64;

/// A session as reported to devtools clients.
#[derive(Debug, Clone, Serialize)]
pub struct SessionInfo {
    pub id: String,
    pub connected: bool,
    pub state: State,
}

/// Outcome of opening a session.
#[derive(Debug)]
pub struct OpenedSession {
    pub id: String,
    /// State left behind by an earlier connection, if any
    pub preserved: Option<State>,
}

#[derive(Debug)]
struct SessionSlot {
    state: Option<State>,
    commands: Option<mpsc::Sender<SessionCommand>>,
    last_seen: Instant,
}

/// Shared application context.
#[derive(Debug)]
pub struct AppContext {
    site: RwLock<Arc<SiteConfig>>,
    options: ProgramOptions,
    hub: LiveHub,
    sessions: RwLock<HashMap<String, SessionSlot>>,
    epoch: u64,
    counter: AtomicU64,
}

impl AppContext {
    pub fn new(site: SiteConfig, options: ProgramOptions) -> Self {
        let epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();

        Self {
            site: RwLock::new(Arc::new(site)),
            options,
            hub: LiveHub::new(),
            sessions: RwLock::new(HashMap::new()),
            epoch,
            counter: AtomicU64::new(0),
        }
    }

    /// Current site settings.
    pub async fn site(&self) -> Arc<SiteConfig> {
        Arc::clone(&*self.site.read().await)
    }

    /// Swap in reloaded site settings.
    pub async fn replace_site(&self, site: SiteConfig) {
        *self.site.write().await = Arc::new(site);
    }

    /// Middleware every new program is started with.
    pub fn options(&self) -> ProgramOptions {
        self.options.clone()
    }

    pub fn hub(&self) -> &LiveHub {
        &self.hub
    }

    /// Register a connection.
    ///
    /// A known, disconnected id is reattached and its state handed back.
    /// An id that is already connected elsewhere (a duplicated tab) gets a
    /// fresh id seeded with a copy of that state.
    pub async fn open_session(
        &self,
        requested: Option<&str>,
        commands: mpsc::Sender<SessionCommand>,
    ) -> OpenedSession {
        let mut sessions = self.sessions.write().await;

        if let Some(id) = requested {
            if let Some(slot) = sessions.get_mut(id) {
                if slot.commands.is_none() {
                    slot.commands = Some(commands);
                    slot.last_seen = Instant::now();
                    return OpenedSession {
                        id: id.to_string(),
                        preserved: slot.state.clone(),
                    };
                }

                let preserved = slot.state.clone();
                let id = self.next_id();
                sessions.insert(id.clone(), connected_slot(preserved.clone(), commands));
                return OpenedSession { id, preserved };
            }
        }

        let id = self.next_id();
        sessions.insert(id.clone(), connected_slot(None, commands));
        OpenedSession {
            id,
            preserved: None,
        }
    }

    /// Remember the latest state of a session.
    pub async fn save_state(&self, id: &str, state: &State) {
        if let Some(slot) = self.sessions.write().await.get_mut(id) {
            slot.state = Some(state.clone());
            slot.last_seen = Instant::now();
        }
    }

    /// Detach a session's socket. Its state stays available for a reconnect.
    pub async fn close_session(&self, id: &str) {
        let mut sessions = self.sessions.write().await;

        if let Some(slot) = sessions.get_mut(id) {
            slot.commands = None;
            slot.last_seen = Instant::now();
        }

        evict_stale(&mut sessions);
    }

    /// Command channel of a connected session.
    pub async fn commands(&self, id: &str) -> Option<mpsc::Sender<SessionCommand>> {
        self.sessions
            .read()
            .await
            .get(id)
            .and_then(|slot| slot.commands.clone())
    }

    /// Every known session with a recorded state, sorted by id.
    pub async fn sessions(&self) -> Vec<SessionInfo> {
        let sessions = self.sessions.read().await;

        let mut infos: Vec<SessionInfo> = sessions
            .iter()
            .filter_map(|(id, slot)| {
                slot.state.as_ref().map(|state| SessionInfo {
                    id: id.clone(),
                    connected: slot.commands.is_some(),
                    state: state.clone(),
                })
            })
            .collect();
        infos.sort_by(|a, b| a.id.cmp(&b.id));
        infos
    }

    fn next_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        format!("{:x}-{}", self.epoch, n)
    }
}

fn connected_slot(state: Option<State>, commands: mpsc::Sender<SessionCommand>) -> SessionSlot {
    SessionSlot {
        state,
        commands: Some(commands),
        last_seen: Instant::now(),
    }
}

/// Drop the longest-idle disconnected sessions beyond the cap.
fn evict_stale(sessions: &mut HashMap<String, SessionSlot>) {
    let mut idle: Vec<(Instant, String)> = sessions
        .iter()
        .filter(|(_, slot)| slot.commands.is_none())
        .map(|(id, slot)| (slot.last_seen, id.clone()))
        .collect();

    if idle.len() <= MAX_PRESERVED_SESSIONS {
        return;
    }

    idle.sort();
    let excess = idle.len() - MAX_PRESERVED_SESSIONS;
    for (_, id) in idle.into_iter().take(excess) {
        tracing::debug!("Evicting preserved session {}", id);
        sessions.remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tackle_docs_app::Page;

    fn context() -> AppContext {
        AppContext::new(SiteConfig::default(), ProgramOptions::default())
    }

    fn state(page: Page) -> State {
        State {
            page,
            theme: "dark".to_string(),
        }
    }

    #[tokio::test]
    async fn issues_distinct_ids() {
        let ctx = context();
        let (tx, _rx) = mpsc::channel(1);

        let a = ctx.open_session(None, tx.clone()).await;
        let b = ctx.open_session(None, tx).await;

        assert_ne!(a.id, b.id);
        assert!(a.preserved.is_none());
    }

    #[tokio::test]
    async fn resumes_preserved_state_after_close() {
        let ctx = context();
        let (tx, _rx) = mpsc::channel(1);

        let opened = ctx.open_session(None, tx.clone()).await;
        ctx.save_state(&opened.id, &state(Page::QueryTable)).await;
        ctx.close_session(&opened.id).await;
        assert!(ctx.commands(&opened.id).await.is_none());

        let resumed = ctx.open_session(Some(&opened.id), tx).await;
        assert_eq!(resumed.id, opened.id);
        assert_eq!(resumed.preserved, Some(state(Page::QueryTable)));
        assert!(ctx.commands(&opened.id).await.is_some());
    }

    #[tokio::test]
    async fn duplicated_tab_gets_new_id_with_copied_state() {
        let ctx = context();
        let (tx, _rx) = mpsc::channel(1);

        let first = ctx.open_session(None, tx.clone()).await;
        ctx.save_state(&first.id, &state(Page::Use)).await;

        let second = ctx.open_session(Some(&first.id), tx).await;
        assert_ne!(second.id, first.id);
        assert_eq!(second.preserved, Some(state(Page::Use)));
    }

    #[tokio::test]
    async fn unknown_id_starts_fresh() {
        let ctx = context();
        let (tx, _rx) = mpsc::channel(1);

        let opened = ctx.open_session(Some("stale-id"), tx).await;
        assert_ne!(opened.id, "stale-id");
        assert!(opened.preserved.is_none());
    }

    #[tokio::test]
    async fn lists_sessions_with_state() {
        let ctx = context();
        let (tx, _rx) = mpsc::channel(1);

        let opened = ctx.open_session(None, tx.clone()).await;
        ctx.open_session(None, tx).await;
        ctx.save_state(&opened.id, &state(Page::Install)).await;

        let sessions = ctx.sessions().await;
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].id, opened.id);
        assert!(sessions[0].connected);
    }

    #[tokio::test]
    async fn evicts_oldest_disconnected_sessions() {
        let ctx = context();
        let (tx, _rx) = mpsc::channel(1);

        let mut ids = Vec::new();
        for _ in 0..MAX_PRESERVED_SESSIONS + 2 {
            let opened = ctx.open_session(None, tx.clone()).await;
            ctx.save_state(&opened.id, &state(Page::Use)).await;
            ctx.close_session(&opened.id).await;
            ids.push(opened.id);
        }

        let sessions = ctx.sessions().await;
        assert_eq!(sessions.len(), MAX_PRESERVED_SESSIONS);
        assert!(!sessions.iter().any(|s| s.id == ids[0]));
        assert!(sessions.iter().any(|s| s.id == ids[ids.len() - 1]));
    }

    #[tokio::test]
    async fn replaces_site_settings() {
        let ctx = context();
        ctx.replace_site(SiteConfig {
            title: "Changed".to_string(),
            ..Default::default()
        })
        .await;

        assert_eq!(ctx.site().await.title, "Changed");
    }
}
