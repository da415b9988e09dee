//! Session-scoped UI state.
//!
//! [`AppState`] is only ever replaced through [`AppAction`]s applied by
//! [`AppStore::dispatch`]. Each dispatch swaps the whole state atomically and
//! wakes subscribers once.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use careboard_core::{Alert, AlertPatch, Persona, User, find_by_id, seed_personas};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub current_user: Option<User>,
    pub current_persona: Option<Persona>,
    /// Locally appended alerts, newest first.
    pub alerts: Vec<Alert>,
    pub personas: Vec<Persona>,
    pub theme: Theme,
    pub sidebar_collapsed: bool,
    pub command_palette_open: bool,
    pub is_online: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            current_user: None,
            current_persona: None,
            alerts: Vec::new(),
            personas: Vec::new(),
            theme: Theme::default(),
            sidebar_collapsed: false,
            command_palette_open: false,
            is_online: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    SetCurrentUser(User),
    SetCurrentPersona(Persona),
    /// Prepend. Alerts with an id already in the list are kept as duplicates.
    AddAlert(Alert),
    UpdateAlert { id: String, patch: AlertPatch },
    RemoveAlert(String),
    SetTheme(Theme),
    ToggleSidebar,
    ToggleCommandPalette,
    SetOnlineStatus(bool),
    LoadInitialData,
}

impl AppState {
    /// Apply one action, returning the next state.
    pub fn apply(mut self, action: AppAction) -> Self {
        match action {
            AppAction::SetCurrentUser(user) => self.current_user = Some(user),
            AppAction::SetCurrentPersona(persona) => self.current_persona = Some(persona),
            AppAction::AddAlert(alert) => self.alerts.insert(0, alert),
            AppAction::UpdateAlert { id, patch } => {
                self.alerts
                    .iter_mut()
                    .filter(|a| a.id == id)
                    .for_each(|a| a.apply(&patch));
            }
            AppAction::RemoveAlert(id) => self.alerts.retain(|a| a.id != id),
            AppAction::SetTheme(theme) => self.theme = theme,
            AppAction::ToggleSidebar => self.sidebar_collapsed = !self.sidebar_collapsed,
            AppAction::ToggleCommandPalette => {
                self.command_palette_open = !self.command_palette_open
            }
            AppAction::SetOnlineStatus(online) => self.is_online = online,
            AppAction::LoadInitialData => self.personas = seed_personas(),
        }
        self
    }
}

/// Cloneable handle to one shared [`AppState`].
#[derive(Debug, Clone)]
pub struct AppStore {
    state: Arc<watch::Sender<AppState>>,
}

impl Default for AppStore {
    fn default() -> Self {
        Self::new(AppState::default())
    }
}

impl AppStore {
    pub fn new(initial: AppState) -> Self {
        let (state, _) = watch::channel(initial);
        Self {
            state: Arc::new(state),
        }
    }

    pub fn dispatch(&self, action: AppAction) {
        tracing::trace!(?action, "store dispatch");
        self.state.send_modify(|state| {
            let current = std::mem::take(state);
            *state = current.apply(action);
        });
    }

    /// Owned copy of the current state.
    pub fn snapshot(&self) -> AppState {
        self.state.borrow().clone()
    }

    /// Read a slice of the state without cloning all of it.
    pub fn read<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        f(&self.state.borrow())
    }

    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.state.subscribe()
    }

    pub fn set_current_user(&self, user: User) {
        self.dispatch(AppAction::SetCurrentUser(user));
    }

    pub fn set_current_persona(&self, persona: Persona) {
        self.dispatch(AppAction::SetCurrentPersona(persona));
    }

    pub fn add_alert(&self, alert: Alert) {
        self.dispatch(AppAction::AddAlert(alert));
    }

    pub fn update_alert(&self, id: impl Into<String>, patch: AlertPatch) {
        self.dispatch(AppAction::UpdateAlert {
            id: id.into(),
            patch,
        });
    }

    pub fn remove_alert(&self, id: impl Into<String>) {
        self.dispatch(AppAction::RemoveAlert(id.into()));
    }

    pub fn set_theme(&self, theme: Theme) {
        self.dispatch(AppAction::SetTheme(theme));
    }

    pub fn toggle_sidebar(&self) {
        self.dispatch(AppAction::ToggleSidebar);
    }

    pub fn toggle_command_palette(&self) {
        self.dispatch(AppAction::ToggleCommandPalette);
    }

    pub fn set_online_status(&self, online: bool) {
        self.dispatch(AppAction::SetOnlineStatus(online));
    }

    pub fn load_initial_data(&self) {
        self.dispatch(AppAction::LoadInitialData);
    }

    /// Switch to a loaded persona. Returns its dashboard path, or `None` when
    /// no persona with that id has been loaded.
    pub fn select_persona(&self, id: &str) -> Option<String> {
        let persona = self.read(|s| find_by_id(&s.personas, id).cloned())?;
        let path = persona.dashboard_path.clone();
        self.set_current_persona(persona);
        Some(path)
    }

    pub fn current_persona(&self) -> Option<Persona> {
        self.read(|s| s.current_persona.clone())
    }

    pub fn current_user(&self) -> Option<User> {
        self.read(|s| s.current_user.clone())
    }

    pub fn alerts(&self) -> Vec<Alert> {
        self.read(|s| s.alerts.clone())
    }

    pub fn theme(&self) -> Theme {
        self.read(|s| s.theme)
    }

    pub fn is_online(&self) -> bool {
        self.read(|s| s.is_online)
    }

    pub fn sidebar_collapsed(&self) -> bool {
        self.read(|s| s.sidebar_collapsed)
    }

    pub fn command_palette_open(&self) -> bool {
        self.read(|s| s.command_palette_open)
    }
}
