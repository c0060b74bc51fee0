//! Events in, commands out
//!
//! Adapters and completed calls emit [`AppEvent`]s; `update` answers with
//! [`AppCommand`]s describing the IO to perform. This separates "what to do"
//! from "how to do it".

use std::time::Duration;

use permit_client::{decode, ActionError};
use permit_types::{
    Ack, ActionKind, ActionRequest, InitialDataResponse, LoginResponse, OpenPermitsResponse,
    SearchResponse,
};

use crate::filter::FilterForm;
use crate::forms::{ObservationForm, PermitForm};
use crate::message::MessageSlot;

// =============================================================================
// APP EVENT - User Intent + Call Completions
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    // -------------------------------------------------------------------------
    // Session
    // -------------------------------------------------------------------------
    LoginSubmitted { username: String, password: String },
    Logout,

    // -------------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------------
    /// Show a section by id; unknown ids fall back to the dashboard
    Navigate(String),

    // -------------------------------------------------------------------------
    // Forms
    // -------------------------------------------------------------------------
    PermitSubmitted(PermitForm),
    ObservationSubmitted(ObservationForm),

    // -------------------------------------------------------------------------
    // Close permit flow
    // -------------------------------------------------------------------------
    /// User pressed close on a card; asks for confirmation first
    CloseRequested(String),
    CloseConfirmed(String),
    RefreshOpenPermits,

    // -------------------------------------------------------------------------
    // Monitor
    // -------------------------------------------------------------------------
    SearchSubmitted(FilterForm),

    // -------------------------------------------------------------------------
    // Timers
    // -------------------------------------------------------------------------
    MessageExpired(MessageSlot),

    // -------------------------------------------------------------------------
    // Call completions
    // -------------------------------------------------------------------------
    LoginCompleted(Result<LoginResponse, ActionError>),
    ReferenceDataLoaded(Result<InitialDataResponse, ActionError>),
    PermitSaved(Result<Ack, ActionError>),
    ObservationSaved(Result<Ack, ActionError>),
    OpenPermitsLoaded(Result<OpenPermitsResponse, ActionError>),
    PermitClosed(Result<Ack, ActionError>),
    SearchCompleted(Result<SearchResponse, ActionError>),
}

impl AppEvent {
    /// Wrap a finished call as the completion event for its action.
    pub fn completed(kind: ActionKind, result: Result<serde_json::Value, ActionError>) -> Self {
        match kind {
            ActionKind::CheckLogin => AppEvent::LoginCompleted(result.and_then(decode)),
            ActionKind::GetInitialData => AppEvent::ReferenceDataLoaded(result.and_then(decode)),
            ActionKind::SavePermit => AppEvent::PermitSaved(result.and_then(decode)),
            ActionKind::SaveObservation => AppEvent::ObservationSaved(result.and_then(decode)),
            ActionKind::GetOpenPermits => AppEvent::OpenPermitsLoaded(result.and_then(decode)),
            ActionKind::ClosePermit => AppEvent::PermitClosed(result.and_then(decode)),
            ActionKind::SearchPermits => AppEvent::SearchCompleted(result.and_then(decode)),
        }
    }

    /// The action this event completes, if it is a completion.
    pub fn completes(&self) -> Option<ActionKind> {
        match self {
            AppEvent::LoginCompleted(_) => Some(ActionKind::CheckLogin),
            AppEvent::ReferenceDataLoaded(_) => Some(ActionKind::GetInitialData),
            AppEvent::PermitSaved(_) => Some(ActionKind::SavePermit),
            AppEvent::ObservationSaved(_) => Some(ActionKind::SaveObservation),
            AppEvent::OpenPermitsLoaded(_) => Some(ActionKind::GetOpenPermits),
            AppEvent::PermitClosed(_) => Some(ActionKind::ClosePermit),
            AppEvent::SearchCompleted(_) => Some(ActionKind::SearchPermits),
            _ => None,
        }
    }
}

// =============================================================================
// APP COMMAND - IO to perform
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    /// Send one action; feed the result back via [`AppEvent::completed`]
    Call(ActionRequest),

    /// Post [`AppEvent::MessageExpired`] after the delay
    ExpireMessage { slot: MessageSlot, after: Duration },

    /// Ask the user; on yes post [`AppEvent::CloseConfirmed`]
    ConfirmClose { permit_id: String },

    /// Logged out: the adapter starts over from a blank screen
    Reload,
}
