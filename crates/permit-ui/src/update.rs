//! State transitions
//!
//! `update` is the only place [`AppState`] changes. It is pure: given the
//! same state, event and clock reading it yields the same state and the same
//! commands. All IO is described by the returned [`AppCommand`]s.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDateTime;
use permit_client::ActionError;
use permit_types::{ActionKind, ActionRequest, STATUS_SUCCESS};
use tracing::{debug, info, warn};

use crate::event::{AppCommand, AppEvent};
use crate::filter::FilterForm;
use crate::menu::{derive_menu, initial_section};
use crate::message::{Message, MessageSlot, MESSAGE_TTL};
use crate::sections::Section;
use crate::session::Session;
use crate::state::{AppState, View, Workspace};
use crate::table::{OpenPermitsView, ResultsView};

pub const LOGIN_REJECTED: &str = "Login failed or user data was not returned.";
pub const LOGIN_FAILED: &str = "Login failed. Unknown error.";
pub const SAVED: &str = "Saved.";
pub const CLOSED: &str = "Closed.";

/// Apply one event.
pub fn update(
    mut state: AppState,
    event: AppEvent,
    now: NaiveDateTime,
) -> (AppState, Vec<AppCommand>) {
    if let Some(kind) = event.completes() {
        state.in_flight.remove(&kind);
    }

    let AppState {
        view,
        messages,
        in_flight,
    } = &mut state;
    let mut fx = Effects {
        in_flight,
        messages,
        commands: Vec::new(),
    };

    match event {
        AppEvent::LoginSubmitted { username, password } => match view {
            View::Login { error } => {
                *error = None;
                fx.dispatch(ActionRequest::CheckLogin { username, password });
            }
            View::Workspace(_) => debug!("Already signed in; login ignored"),
        },

        AppEvent::LoginCompleted(result) => match view {
            View::Login { error } => match login_outcome(result) {
                Ok(workspace) => {
                    let ws = enter_workspace(workspace, now, &mut fx);
                    *view = View::Workspace(Box::new(ws));
                }
                Err(message) => *error = Some(message),
            },
            View::Workspace(_) => debug!("Late login answer ignored"),
        },

        AppEvent::Logout => {
            info!("Signing out");
            *view = View::default();
            fx.messages.clear();
            fx.in_flight.clear();
            fx.commands.push(AppCommand::Reload);
        }

        AppEvent::MessageExpired(slot) => {
            fx.messages.remove(&slot);
        }

        other => match view {
            View::Workspace(ws) => workspace_event(ws, other, now, &mut fx),
            View::Login { .. } => debug!("No session; event ignored"),
        },
    }

    let commands = fx.commands;
    (state, commands)
}

// =============================================================================
// EFFECTS
// =============================================================================

struct Effects<'s> {
    in_flight: &'s mut BTreeSet<ActionKind>,
    messages: &'s mut BTreeMap<MessageSlot, Message>,
    commands: Vec<AppCommand>,
}

impl Effects<'_> {
    /// Queue a call unless the same action is still awaiting its answer.
    fn dispatch(&mut self, request: ActionRequest) -> bool {
        let kind = request.kind();
        if !self.in_flight.insert(kind) {
            debug!("{} already in flight; trigger ignored", kind);
            return false;
        }
        self.commands.push(AppCommand::Call(request));
        true
    }

    fn show(&mut self, slot: MessageSlot, message: Message) {
        self.messages.insert(slot, message);
        self.commands.push(AppCommand::ExpireMessage {
            slot,
            after: MESSAGE_TTL,
        });
    }

    fn fail(&mut self, slot: MessageSlot, err: &ActionError) {
        self.show(slot, Message::error(err.to_string()));
    }
}

// =============================================================================
// SESSION
// =============================================================================

fn login_outcome(
    result: Result<permit_types::LoginResponse, ActionError>,
) -> Result<Workspace, String> {
    let response = match result {
        Ok(response) => response,
        Err(err) => {
            warn!("Login failed: {}", err);
            let message = non_blank(Some(err.to_string())).unwrap_or_else(|| LOGIN_FAILED.into());
            return Err(message);
        }
    };

    match response.user_info {
        Some(user) if response.status == STATUS_SUCCESS => {
            let menu = derive_menu(&user.sections);
            Ok(Workspace::new(Session::new(user), menu, Section::Dashboard))
        }
        _ => Err(non_blank(response.message).unwrap_or_else(|| LOGIN_REJECTED.into())),
    }
}

/// Load reference data, then show the initial section.
fn enter_workspace(mut ws: Workspace, now: NaiveDateTime, fx: &mut Effects<'_>) -> Workspace {
    info!(
        "Signed in as {} ({} sections)",
        ws.session.username(),
        ws.menu.len()
    );
    fx.dispatch(ActionRequest::GetInitialData {
        user_info: ws.session.user.clone(),
    });
    let initial = initial_section(&ws.menu, &ws.session.user.sections);
    enter_section(&mut ws, initial, now, fx);
    ws
}

// =============================================================================
// WORKSPACE
// =============================================================================

fn workspace_event(
    ws: &mut Workspace,
    event: AppEvent,
    now: NaiveDateTime,
    fx: &mut Effects<'_>,
) {
    if let Some(section) = owning_section(&event) {
        if !ws.menu.contains(&section) {
            warn!("Section \"{}\" is not in the menu; request ignored", section);
            return;
        }
    }

    match event {
        // ---------------------------------------------------------------------
        // Navigation and reference data
        // ---------------------------------------------------------------------
        AppEvent::Navigate(id) => {
            let section = resolve_section(ws, &id);
            enter_section(ws, section, now, fx);
        }

        AppEvent::ReferenceDataLoaded(Ok(response)) => {
            ws.session.reference = Some(response.into_reference_data());
            if ws.is_visible(Section::MonitorPermits) {
                ws.filter.set_projects(ws.session.projects());
            }
        }
        AppEvent::ReferenceDataLoaded(Err(err)) => {
            warn!("Reference data failed to load: {}", err);
            fx.show(
                MessageSlot::Global,
                Message::error(format!("Failed to load configuration: {err}")),
            );
        }

        // ---------------------------------------------------------------------
        // Forms
        // ---------------------------------------------------------------------
        AppEvent::PermitSubmitted(form) => {
            ws.permit_form = form;
            match ws.permit_form.validate() {
                Ok(permit_object) => {
                    fx.dispatch(ActionRequest::SavePermit {
                        permit_object,
                        user_info: ws.session.user.clone(),
                    });
                }
                Err(err) => fx.fail(MessageSlot::Permit, &err),
            }
        }
        AppEvent::PermitSaved(Ok(ack)) => {
            fx.show(
                MessageSlot::Permit,
                Message::success(non_blank(ack.message).unwrap_or_else(|| SAVED.into())),
            );
            ws.permit_form.reset(Some(&ws.session), now);
        }
        AppEvent::PermitSaved(Err(err)) => fx.fail(MessageSlot::Permit, &err),

        AppEvent::ObservationSubmitted(form) => {
            ws.observation_form = form;
            match ws.observation_form.validate() {
                Ok(observation_object) => {
                    fx.dispatch(ActionRequest::SaveObservation {
                        observation_object,
                        user_info: ws.session.user.clone(),
                    });
                }
                Err(err) => fx.fail(MessageSlot::Observation, &err),
            }
        }
        AppEvent::ObservationSaved(Ok(ack)) => {
            fx.show(
                MessageSlot::Observation,
                Message::success(non_blank(ack.message).unwrap_or_else(|| SAVED.into())),
            );
            ws.observation_form.reset(Some(&ws.session), now);
        }
        AppEvent::ObservationSaved(Err(err)) => fx.fail(MessageSlot::Observation, &err),

        // ---------------------------------------------------------------------
        // Close permit
        // ---------------------------------------------------------------------
        AppEvent::RefreshOpenPermits => {
            load_open_permits(ws, fx);
        }
        AppEvent::OpenPermitsLoaded(result) => {
            ws.open_permits = match result {
                Ok(response) => {
                    OpenPermitsView::from_permits(response.permits.as_deref().unwrap_or_default())
                }
                Err(err) => OpenPermitsView::Failed(err.to_string()),
            };
            if std::mem::take(&mut ws.reload_open_permits) {
                load_open_permits(ws, fx);
            }
        }

        AppEvent::CloseRequested(permit_id) => match non_blank(Some(permit_id)) {
            Some(permit_id) => fx.commands.push(AppCommand::ConfirmClose { permit_id }),
            None => warn!("Close requested for a permit without an id"),
        },
        AppEvent::CloseConfirmed(permit_id) => {
            fx.dispatch(ActionRequest::ClosePermit { permit_id });
        }
        AppEvent::PermitClosed(Ok(ack)) => {
            fx.show(
                MessageSlot::ClosePermit,
                Message::success(non_blank(ack.message).unwrap_or_else(|| CLOSED.into())),
            );
            // the answer in flight may predate the close
            if !load_open_permits(ws, fx) {
                ws.reload_open_permits = true;
            }
        }
        AppEvent::PermitClosed(Err(err)) => fx.fail(MessageSlot::ClosePermit, &err),

        // ---------------------------------------------------------------------
        // Monitor
        // ---------------------------------------------------------------------
        AppEvent::SearchSubmitted(filter) => {
            ws.filter = filter;
            match ws.filter.criteria() {
                Ok(filters) => {
                    let sent = fx.dispatch(ActionRequest::SearchPermits {
                        filters,
                        user_info: ws.session.user.clone(),
                    });
                    if sent {
                        ws.results = ResultsView::Searching;
                    }
                }
                Err(err) => fx.fail(MessageSlot::Monitor, &err),
            }
        }
        AppEvent::SearchCompleted(Ok(response)) => {
            ws.results = ResultsView::from_records(&response.permits);
        }
        AppEvent::SearchCompleted(Err(err)) => {
            ws.results = ResultsView::Cleared;
            fx.fail(MessageSlot::Monitor, &err);
        }

        AppEvent::LoginSubmitted { .. }
        | AppEvent::LoginCompleted(_)
        | AppEvent::Logout
        | AppEvent::MessageExpired(_) => {}
    }
}

/// Known section in the user's menu, else `Dashboard`.
fn resolve_section(ws: &Workspace, id: &str) -> Section {
    match Section::from_id(id) {
        Some(Section::Dashboard) => Section::Dashboard,
        Some(section) if ws.menu.contains(&section) => section,
        Some(section) => {
            warn!("Section \"{}\" is not in the menu; showing Dashboard", section);
            Section::Dashboard
        }
        None => {
            warn!("Section \"{}\" not found; showing Dashboard", id);
            Section::Dashboard
        }
    }
}

fn enter_section(ws: &mut Workspace, section: Section, now: NaiveDateTime, fx: &mut Effects<'_>) {
    ws.active = section;
    match section {
        Section::NewPermit => ws.permit_form.reset(Some(&ws.session), now),
        Section::NewObservation => ws.observation_form.reset(Some(&ws.session), now),
        Section::ClosePermit => {
            load_open_permits(ws, fx);
        }
        Section::MonitorPermits => {
            ws.filter = FilterForm::with_projects(ws.session.projects());
            ws.results = ResultsView::Prompt;
            fx.messages.remove(&MessageSlot::Monitor);
        }
        Section::Dashboard | Section::NewNearMiss => {}
    }
}

/// Returns false when a load is already in flight.
fn load_open_permits(ws: &mut Workspace, fx: &mut Effects<'_>) -> bool {
    let sent = fx.dispatch(ActionRequest::GetOpenPermits {
        user_info: ws.session.user.clone(),
    });
    if sent {
        ws.open_permits = OpenPermitsView::Loading;
    }
    sent
}

/// Section a user request belongs to; the user must have it in their menu.
fn owning_section(event: &AppEvent) -> Option<Section> {
    match event {
        AppEvent::PermitSubmitted(_) => Some(Section::NewPermit),
        AppEvent::ObservationSubmitted(_) => Some(Section::NewObservation),
        AppEvent::RefreshOpenPermits
        | AppEvent::CloseRequested(_)
        | AppEvent::CloseConfirmed(_) => Some(Section::ClosePermit),
        AppEvent::SearchSubmitted(_) => Some(Section::MonitorPermits),
        _ => None,
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
