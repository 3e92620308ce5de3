//! Bootstrap lifecycle state machine.
//!
//! ```text
//! Idle ──begin──▶ ScriptLoading ──script_loaded──▶ Instantiating(p) ──▶ Ready
//!   │                  │                               │  ▲ progress
//!   └──────────────────┴────────────▶ Failed ◀─────────┴──┘
//! ```
//!
//! The controller never performs I/O itself. The async driver in
//! [`crate::bootstrap`] feeds it events; listeners observe every applied
//! transition.

use crate::config::ModuleConfig;
use crate::device::DeviceProfile;
use crate::overlay::Overlay;
use crate::runtime::RuntimeHandle;
use thiserror::Error;

/// Why a bootstrap attempt ended in [`LoadState::Failed`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BootstrapError {
    /// The rendering surface was not mounted when bootstrap fired.
    #[error("rendering surface is not mounted")]
    MissingSurface,
    /// The loader script ran but did not install the factory.
    #[error("loader script did not install the module factory")]
    MissingFactory,
    /// The loader script could not be fetched or executed.
    #[error("loader script failed to load: {0}")]
    ScriptLoad(String),
    /// The factory rejected.
    #[error("module instantiation failed: {0}")]
    InstantiationFailure(String),
}

/// Load state of the embedded module for this page session.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState {
    /// Nothing has happened yet.
    #[default]
    Idle,
    /// The loader script has been requested.
    ScriptLoading,
    /// The factory is running.
    Instantiating {
        /// Latest reported progress, in `[0, 1]`.
        progress: f64,
    },
    /// The module is interactive.
    Ready,
    /// Bootstrap failed; terminal.
    Failed(BootstrapError),
}

impl LoadState {
    const fn rank(&self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::ScriptLoading => 1,
            Self::Instantiating { .. } => 2,
            Self::Ready | Self::Failed(_) => 3,
        }
    }

    /// `Ready` or `Failed`.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Ready | Self::Failed(_))
    }

    /// The module is interactive.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    /// Bootstrap failed.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// The failure cause, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&BootstrapError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Progress for display: `0` before instantiation starts, `1` once ready.
    #[must_use]
    pub const fn progress(&self) -> f64 {
        match self {
            Self::Idle | Self::ScriptLoading | Self::Failed(_) => 0.0,
            Self::Instantiating { progress } => *progress,
            Self::Ready => 1.0,
        }
    }

    /// Short lowercase name, stable for scripting and logs.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::ScriptLoading => "script-loading",
            Self::Instantiating { .. } => "instantiating",
            Self::Ready => "ready",
            Self::Failed(_) => "failed",
        }
    }

    /// Whether moving to `next` is a legal transition.
    ///
    /// Only forward moves are legal, except repeated `Instantiating`
    /// updates. `Failed` is reachable from every non-terminal state.
    #[must_use]
    pub fn can_transition_to(&self, next: &Self) -> bool {
        match (self, next) {
            (Self::Ready | Self::Failed(_), _) => false,
            (Self::Idle, Self::Failed(BootstrapError::MissingSurface)) => true,
            (Self::Idle, Self::Failed(_)) => false,
            (_, Self::Failed(_)) => true,
            (Self::Idle, Self::ScriptLoading) => true,
            (Self::ScriptLoading, Self::Instantiating { .. })
            | (Self::Instantiating { .. }, Self::Instantiating { .. } | Self::Ready) => true,
            _ => false,
        }
    }
}

/// Callback invoked after every applied transition.
pub type StateListener = Box<dyn Fn(&LoadState)>;

/// Owns the load state, the bootstrap configuration and the runtime handle.
pub struct BootstrapController<H> {
    state: LoadState,
    started: bool,
    config: Option<ModuleConfig>,
    handle: Option<H>,
    listeners: Vec<StateListener>,
    transitions: u64,
}

impl<H> Default for BootstrapController<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> std::fmt::Debug for BootstrapController<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapController")
            .field("state", &self.state)
            .field("started", &self.started)
            .field("has_handle", &self.handle.is_some())
            .field("listener_count", &self.listeners.len())
            .field("transitions", &self.transitions)
            .finish()
    }
}

impl<H> BootstrapController<H> {
    /// Create an idle controller.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: LoadState::Idle,
            started: false,
            config: None,
            handle: None,
            listeners: Vec::new(),
            transitions: 0,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &LoadState {
        &self.state
    }

    /// Whether [`Self::begin`] has already accepted a trigger.
    #[must_use]
    pub const fn is_started(&self) -> bool {
        self.started
    }

    /// Configuration of the running attempt.
    #[must_use]
    pub const fn config(&self) -> Option<&ModuleConfig> {
        self.config.as_ref()
    }

    /// The runtime handle, once ready.
    #[must_use]
    pub const fn handle(&self) -> Option<&H> {
        self.handle.as_ref()
    }

    /// Number of transitions applied so far.
    #[must_use]
    pub const fn transition_count(&self) -> u64 {
        self.transitions
    }

    /// Register a listener for state changes.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: Fn(&LoadState) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Overlay to show for the current state on the given device.
    #[must_use]
    pub fn overlay(&self, profile: DeviceProfile) -> Overlay {
        Overlay::select(&self.state, profile)
    }

    /// Whether post-ready controls may be offered.
    #[must_use]
    pub const fn controls_enabled(&self) -> bool {
        self.state.is_ready() && self.handle.is_some()
    }

    /// Accept the mount trigger.
    ///
    /// Returns `true` only for the first call, and only when the surface is
    /// present; the caller must then fetch the loader script. Later calls
    /// are ignored.
    pub fn begin(&mut self, surface_present: bool, config: ModuleConfig) -> bool {
        if self.started {
            log::debug!("bootstrap already started, ignoring trigger");
            return false;
        }
        self.started = true;

        if !surface_present {
            self.fail(BootstrapError::MissingSurface);
            return false;
        }

        self.config = Some(config);
        self.transition(LoadState::ScriptLoading)
    }

    /// The loader script finished executing.
    ///
    /// Returns `true` only when the factory may now be invoked. A missing
    /// factory fails the session and returns `false`.
    pub fn script_loaded(&mut self, factory_present: bool) -> bool {
        if !matches!(self.state, LoadState::ScriptLoading) {
            log::warn!("script load reported in state `{}`", self.state.label());
            return false;
        }
        if factory_present {
            self.transition(LoadState::Instantiating { progress: 0.0 })
        } else {
            self.fail(BootstrapError::MissingFactory);
            false
        }
    }

    /// The loader script could not be fetched or executed.
    pub fn script_failed(&mut self, cause: impl Into<String>) -> bool {
        if !matches!(self.state, LoadState::ScriptLoading) {
            return false;
        }
        self.fail(BootstrapError::ScriptLoad(cause.into()))
    }

    /// Progress callback from the factory.
    ///
    /// Values are clamped to `[0, 1]`. Decreases are accepted; the latest
    /// value always wins. Non-finite values are dropped.
    pub fn progress(&mut self, value: f64) -> bool {
        if !matches!(self.state, LoadState::Instantiating { .. }) {
            log::debug!(
                "progress {value} ignored in state `{}`",
                self.state.label()
            );
            return false;
        }
        if !value.is_finite() {
            log::warn!("ignoring non-finite progress value {value}");
            return false;
        }
        self.transition(LoadState::Instantiating {
            progress: value.clamp(0.0, 1.0),
        })
    }

    /// The factory resolved.
    pub fn instantiated(&mut self, handle: H) -> bool {
        if !matches!(self.state, LoadState::Instantiating { .. }) {
            log::warn!(
                "instantiation result dropped in state `{}`",
                self.state.label()
            );
            return false;
        }
        self.handle = Some(handle);
        self.transition(LoadState::Ready)
    }

    /// The factory rejected.
    pub fn instantiation_failed(&mut self, cause: impl Into<String>) -> bool {
        if !matches!(self.state, LoadState::Instantiating { .. }) {
            return false;
        }
        self.fail(BootstrapError::InstantiationFailure(cause.into()))
    }

    fn fail(&mut self, err: BootstrapError) -> bool {
        log::error!("bootstrap failed: {err}");
        self.transition(LoadState::Failed(err))
    }

    fn transition(&mut self, next: LoadState) -> bool {
        if !self.state.can_transition_to(&next) {
            log::warn!(
                "illegal transition `{}` -> `{}` ignored",
                self.state.label(),
                next.label()
            );
            return false;
        }

        match &next {
            LoadState::Instantiating { progress } if self.state.label() == next.label() => {
                log::debug!("module load progress {:.0}%", progress * 100.0);
            }
            _ => log::info!("bootstrap `{}` -> `{}`", self.state.label(), next.label()),
        }

        self.state = next;
        self.transitions += 1;
        for listener in &self.listeners {
            listener(&self.state);
        }
        true
    }
}

impl<H: RuntimeHandle> BootstrapController<H> {
    /// Forward a fullscreen request to the module.
    ///
    /// Before `Ready` this does nothing and returns `false`; nothing is
    /// queued. Errors from the module are logged, not returned.
    pub fn request_fullscreen(&self) -> bool {
        if !self.state.is_ready() {
            log::debug!("fullscreen requested before ready, ignoring");
            return false;
        }
        let Some(handle) = self.handle.as_ref() else {
            return false;
        };
        match handle.set_fullscreen(true) {
            Ok(()) => true,
            Err(err) => {
                log::error!("fullscreen request failed: {err}");
                false
            }
        }
    }
}
