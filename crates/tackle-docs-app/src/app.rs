//! Application state and the reducer that drives it.

use serde::{Deserialize, Serialize};

use crate::router::{self, Page};

/// Theme used when nothing else is configured.
pub const DEFAULT_THEME: &str = "light";

/// Events fed into [`update`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Msg {
    UrlChanged(Page),
    SetTheme(String),
}

/// The single source of truth for what is on screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    pub page: Page,
    pub theme: String,
}

/// Side effect requested by the reducer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Move the browser location to the page's canonical URL.
    Navigate(Page),
}

impl Effect {
    /// Hash URL the browser should be moved to, if any.
    pub fn target_url(&self) -> Option<String> {
        match self {
            Effect::None => None,
            Effect::Navigate(page) => Some(page.href()),
        }
    }
}

/// Build the initial state from the current location hash.
pub fn init(hash: &str) -> (State, Effect) {
    init_with_theme(hash, DEFAULT_THEME)
}

/// Like [`init`], starting from a configured theme.
///
/// The returned navigation effect normalizes the address bar to the
/// canonical URL of the resolved page. An unknown hash stays as typed.
pub fn init_with_theme(hash: &str, theme: &str) -> (State, Effect) {
    let page = router::parse_hash(hash);
    let state = State {
        page,
        theme: theme.to_string(),
    };
    (state, router::normalize(page))
}

/// Apply a message to the state.
pub fn update(msg: Msg, state: &State) -> (State, Effect) {
    match msg {
        Msg::UrlChanged(page) => (
            State {
                page,
                ..state.clone()
            },
            Effect::None,
        ),
        Msg::SetTheme(theme) => (
            State {
                theme,
                ..state.clone()
            },
            Effect::None,
        ),
    }
}
