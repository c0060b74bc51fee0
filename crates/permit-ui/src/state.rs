//! Application State
//!
//! One explicit object holding everything the UI shows. Only `update`
//! mutates it.
//!
//! ## Structure
//!
//! - **View**: login screen or the authenticated workspace
//! - **Workspace**: session, menu, active section and per-section state
//! - **messages**: transient inline messages, one per slot
//! - **in_flight**: actions awaiting a response, keyed by action kind

use std::collections::{BTreeMap, BTreeSet};

use permit_types::ActionKind;

use crate::filter::FilterForm;
use crate::forms::{ObservationForm, PermitForm};
use crate::message::{Message, MessageSlot};
use crate::sections::Section;
use crate::session::Session;
use crate::table::{OpenPermitsView, ResultsView};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub view: View,
    pub messages: BTreeMap<MessageSlot, Message>,
    pub in_flight: BTreeSet<ActionKind>,
}

/// Top-level view. Using an enum makes "workspace without a session"
/// unrepresentable.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Login {
        /// Stays visible until the next attempt
        error: Option<String>,
    },
    Workspace(Box<Workspace>),
}

impl Default for View {
    fn default() -> Self {
        View::Login { error: None }
    }
}

/// Everything that exists only while signed in.
#[derive(Debug, Clone, PartialEq)]
pub struct Workspace {
    pub session: Session,
    pub menu: Vec<Section>,
    pub active: Section,
    pub permit_form: PermitForm,
    pub observation_form: ObservationForm,
    pub filter: FilterForm,
    pub results: ResultsView,
    pub open_permits: OpenPermitsView,
    /// A close succeeded while the list was already loading; fetch again
    /// once that answer lands.
    pub reload_open_permits: bool,
}

impl Workspace {
    pub fn new(session: Session, menu: Vec<Section>, active: Section) -> Self {
        Self {
            session,
            menu,
            active,
            permit_form: PermitForm::default(),
            observation_form: ObservationForm::default(),
            filter: FilterForm::default(),
            results: ResultsView::default(),
            open_permits: OpenPermitsView::default(),
            reload_open_permits: false,
        }
    }

    pub fn is_visible(&self, section: Section) -> bool {
        self.active == section
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn workspace(&self) -> Option<&Workspace> {
        match &self.view {
            View::Workspace(ws) => Some(ws),
            View::Login { .. } => None,
        }
    }

    pub fn workspace_mut(&mut self) -> Option<&mut Workspace> {
        match &mut self.view {
            View::Workspace(ws) => Some(ws),
            View::Login { .. } => None,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.workspace().map(|ws| &ws.session)
    }

    pub fn is_authenticated(&self) -> bool {
        self.workspace().is_some()
    }

    pub fn login_error(&self) -> Option<&str> {
        match &self.view {
            View::Login { error } => error.as_deref(),
            View::Workspace(_) => None,
        }
    }

    pub fn message(&self, slot: MessageSlot) -> Option<&Message> {
        self.messages.get(&slot)
    }

    pub fn is_in_flight(&self, kind: ActionKind) -> bool {
        self.in_flight.contains(&kind)
    }

    /// Any action awaiting a response.
    pub fn is_busy(&self) -> bool {
        !self.in_flight.is_empty()
    }
}
