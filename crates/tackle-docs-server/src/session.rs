//! One browser tab driving one [`Program`] over a WebSocket.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use serde_json::Value;
use tokio::sync::{broadcast, mpsc, oneshot};

use tackle_docs_app::{router, DevtoolsError, Effect, Entry, Msg, Program, SiteConfig};

use crate::context::AppContext;
use crate::websocket::{ClientMessage, LiveMessage, ServerMessage};

/// Requests devtools clients make of a running session.
#[derive(Debug)]
pub enum SessionCommand {
    History(oneshot::Sender<Option<Vec<Entry>>>),
    JumpTo(usize, oneshot::Sender<Result<(), DevtoolsError>>),
    Import(Value, oneshot::Sender<Result<(), DevtoolsError>>),
}

/// The transport a session talks through.
///
/// Split out from the socket so the session loop can run against a
/// channel pair in tests.
pub trait Transport: Send {
    /// Next browser message, `None` once the peer is gone.
    fn recv(&mut self) -> impl std::future::Future<Output = Option<ClientMessage>> + Send;

    /// Deliver a message; `false` once the peer is gone.
    fn send(&mut self, msg: ServerMessage) -> impl std::future::Future<Output = bool> + Send;
}

impl Transport for WebSocket {
    async fn recv(&mut self) -> Option<ClientMessage> {
        loop {
            match WebSocket::recv(self).await? {
                Ok(Message::Text(text)) => match serde_json::from_str(text.as_str()) {
                    Ok(msg) => return Some(msg),
                    Err(e) => tracing::warn!("Ignoring malformed client message: {}", e),
                },
                Ok(Message::Close(_)) | Err(_) => return None,
                Ok(_) => {}
            }
        }
    }

    async fn send(&mut self, msg: ServerMessage) -> bool {
        let json = match serde_json::to_string(&msg) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Failed to encode server message: {}", e);
                return true;
            }
        };
        WebSocket::send(self, Message::Text(json.into())).await.is_ok()
    }
}

/// Run a session until the browser disconnects.
pub async fn run_session<T: Transport>(mut transport: T, ctx: Arc<AppContext>) {
    // Nothing happens until the browser says where it is.
    let (hash, requested) = loop {
        match transport.recv().await {
            Some(ClientMessage::Hello { hash, session }) => break (hash, session),
            Some(other) => tracing::debug!("Ignoring {:?} before hello", other),
            None => return,
        }
    };

    let (commands_tx, mut commands) = mpsc::channel(16);
    let mut live = ctx.hub().subscribe();
    let opened = ctx.open_session(requested.as_deref(), commands_tx).await;
    let id = opened.id;

    let (mut program, effect) = match opened.preserved {
        Some(state) => {
            tracing::info!("Resuming session {} on {:?}", id, state.page);
            let mut program = Program::resume(state, ctx.options());
            let page = router::parse_hash(&hash);
            if page != program.state().page {
                program.dispatch(Msg::UrlChanged(page));
            }
            (program, router::normalize(page))
        }
        None => {
            tracing::info!("Starting session {}", id);
            let site = ctx.site().await;
            Program::init(&hash, &site.default_theme, ctx.options())
        }
    };

    let mut session = Session {
        id,
        ctx: Arc::clone(&ctx),
        last_html: None,
    };

    if !transport
        .send(ServerMessage::Welcome {
            session: session.id.clone(),
        })
        .await
    {
        ctx.close_session(&session.id).await;
        return;
    }

    let mut open = session.commit(&mut transport, &program, effect).await;

    while open {
        open = tokio::select! {
            msg = transport.recv() => match msg {
                Some(msg) => match msg.into_msg() {
                    Some(msg) => {
                        let effect = program.dispatch(msg);
                        session.commit(&mut transport, &program, effect).await
                    }
                    None => {
                        tracing::debug!("Ignoring repeated hello on session {}", session.id);
                        true
                    }
                },
                None => false,
            },

            live_msg = live.recv() => match live_msg {
                Ok(LiveMessage::Rerender) => {
                    session.last_html = None;
                    session.commit(&mut transport, &program, Effect::None).await
                }
                Ok(LiveMessage::Reload) => transport.send(ServerMessage::Reload).await,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::debug!("Session {} skipped {} live messages", session.id, skipped);
                    true
                }
                Err(broadcast::error::RecvError::Closed) => false,
            },

            Some(command) = commands.recv() => {
                session.handle_command(&mut transport, &mut program, command).await
            }
        };
    }

    tracing::info!("Session {} disconnected", session.id);
    ctx.close_session(&session.id).await;
}

struct Session {
    id: String,
    ctx: Arc<AppContext>,
    last_html: Option<String>,
}

impl Session {
    /// Persist the state, push the view if it changed, then run the effect.
    async fn commit<T: Transport>(
        &mut self,
        transport: &mut T,
        program: &Program,
        effect: Effect,
    ) -> bool {
        self.ctx.save_state(&self.id, program.state()).await;

        let site = self.ctx.site().await;
        if !self.render(transport, program, &site).await {
            return false;
        }

        match effect.target_url() {
            Some(hash) => transport.send(ServerMessage::Navigate { hash }).await,
            None => true,
        }
    }

    async fn render<T: Transport>(
        &mut self,
        transport: &mut T,
        program: &Program,
        site: &SiteConfig,
    ) -> bool {
        let html = program.view(site).render();
        if self.last_html.as_deref() == Some(html.as_str()) {
            return true;
        }

        self.last_html = Some(html.clone());
        transport.send(ServerMessage::Render { html }).await
    }

    async fn handle_command<T: Transport>(
        &mut self,
        transport: &mut T,
        program: &mut Program,
        command: SessionCommand,
    ) -> bool {
        match command {
            SessionCommand::History(reply) => {
                let _ = reply.send(program.history());
                true
            }
            SessionCommand::JumpTo(index, reply) => {
                let result = program.jump_to(index);
                self.restored(transport, program, result, reply).await
            }
            SessionCommand::Import(value, reply) => {
                let result = program.import(&value);
                self.restored(transport, program, result, reply).await
            }
        }
    }

    /// Answer a restore request; on success show the restored page under its own URL.
    async fn restored<T: Transport>(
        &mut self,
        transport: &mut T,
        program: &Program,
        result: Result<(), DevtoolsError>,
        reply: oneshot::Sender<Result<(), DevtoolsError>>,
    ) -> bool {
        let changed = result.is_ok();
        let _ = reply.send(result);
        if !changed {
            return true;
        }

        let effect = router::normalize(program.state().page);
        self.commit(transport, program, effect).await
    }
}
