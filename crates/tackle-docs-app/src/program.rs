//! The render loop: owns a [`State`], runs messages through [`app::update`] and
//! layers the optional development middleware.

use serde_json::Value;

use crate::app::{self, Effect, Msg, State};
use crate::config::{DevConfig, SiteConfig};
use crate::devtools::{Coders, DevtoolsError, Entry, Monitor};
use crate::view::{app_view, Node};

/// Middleware switches for a [`Program`].
#[derive(Debug, Clone, Default)]
pub struct ProgramOptions {
    /// Log every message and the state it produced
    pub trace: bool,
    /// Attach a time-travel monitor using these coders
    pub monitor: Option<(Coders, usize)>,
}

impl ProgramOptions {
    /// Options described by the `[dev]` section of the configuration.
    pub fn from_dev_config(dev: &DevConfig) -> Self {
        let monitor = if dev.devtools.enabled {
            Some((Coders::setup(&dev.devtools.encoding), dev.devtools.max_age))
        } else {
            None
        };

        Self {
            trace: dev.trace,
            monitor,
        }
    }
}

/// One running instance of the application.
#[derive(Debug)]
pub struct Program {
    state: State,
    trace: bool,
    monitor: Option<Monitor>,
}

impl Program {
    /// Start from a location hash.
    pub fn init(hash: &str, default_theme: &str, options: ProgramOptions) -> (Self, Effect) {
        let (state, effect) = app::init_with_theme(hash, default_theme);
        (Self::resume(state, options), effect)
    }

    /// Continue from a state preserved across a reload.
    pub fn resume(state: State, options: ProgramOptions) -> Self {
        let monitor = options.monitor.map(|(coders, max_age)| {
            let mut monitor = Monitor::new(coders, max_age);
            monitor.init(&state);
            monitor
        });

        if options.trace {
            tracing::info!(?state, "Initial state");
        }

        Self {
            state,
            trace: options.trace,
            monitor,
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    /// Feed one message through the reducer.
    pub fn dispatch(&mut self, msg: Msg) -> Effect {
        if self.trace {
            tracing::info!(?msg, "New message");
        }

        let (state, effect) = app::update(msg.clone(), &self.state);
        self.state = state;

        if self.trace {
            tracing::info!(state = ?self.state, "Updated state");
        }
        if let Some(monitor) = self.monitor.as_mut() {
            monitor.record(&msg, &self.state);
        }

        effect
    }

    pub fn view(&self, site: &SiteConfig) -> Node {
        app_view(&self.state, site)
    }

    /// Recorded history, when a monitor is attached.
    pub fn history(&self) -> Option<Vec<Entry>> {
        self.monitor
            .as_ref()
            .map(|m| m.history().iter().cloned().collect())
    }

    /// Replace the state with the one recorded at history `index`.
    ///
    /// History is left untouched so the user can jump forward again.
    pub fn jump_to(&mut self, index: usize) -> Result<(), DevtoolsError> {
        let monitor = self.monitor.as_ref().ok_or(DevtoolsError::Detached)?;
        self.state = monitor.state_at(index)?;
        tracing::debug!(index, state = ?self.state, "Jumped to history entry");
        Ok(())
    }

    /// Replace the state with an externally supplied, encoded one.
    pub fn import(&mut self, value: &Value) -> Result<(), DevtoolsError> {
        let monitor = self.monitor.as_mut().ok_or(DevtoolsError::Detached)?;
        let state = monitor.decode(value)?;
        monitor.init(&state);
        self.state = state;
        Ok(())
    }
}
