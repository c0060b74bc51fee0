//! Action catalog
//!
//! Every remote operation is a variant of [`ActionRequest`]. Serialized, a
//! request is exactly the `/api` body: `{"action": "<name>", "payload": {...}}`.

use serde::{Deserialize, Serialize};

use crate::records::{
    ObservationDraft, OpenPermit, PermitDraft, PermitRecord, ReferenceData, SearchFilters,
    UserInfo,
};

// ============================================================================
// REQUESTS
// ============================================================================

/// A request to the backend, tagged by action name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "payload")]
pub enum ActionRequest {
    #[serde(rename = "checkLogin")]
    CheckLogin { username: String, password: String },

    #[serde(rename = "getInitialData", rename_all = "camelCase")]
    GetInitialData { user_info: UserInfo },

    #[serde(rename = "savePermit", rename_all = "camelCase")]
    SavePermit {
        permit_object: PermitDraft,
        user_info: UserInfo,
    },

    #[serde(rename = "saveObservation", rename_all = "camelCase")]
    SaveObservation {
        observation_object: ObservationDraft,
        user_info: UserInfo,
    },

    #[serde(rename = "getOpenPermits", rename_all = "camelCase")]
    GetOpenPermits { user_info: UserInfo },

    #[serde(rename = "closePermit", rename_all = "camelCase")]
    ClosePermit { permit_id: String },

    #[serde(rename = "searchPermits", rename_all = "camelCase")]
    SearchPermits {
        filters: SearchFilters,
        user_info: UserInfo,
    },
}

impl ActionRequest {
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::CheckLogin { .. } => ActionKind::CheckLogin,
            Self::GetInitialData { .. } => ActionKind::GetInitialData,
            Self::SavePermit { .. } => ActionKind::SavePermit,
            Self::SaveObservation { .. } => ActionKind::SaveObservation,
            Self::GetOpenPermits { .. } => ActionKind::GetOpenPermits,
            Self::ClosePermit { .. } => ActionKind::ClosePermit,
            Self::SearchPermits { .. } => ActionKind::SearchPermits,
        }
    }
}

/// Payload-free identity of an action, used for logging and in-flight tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ActionKind {
    CheckLogin,
    GetInitialData,
    SavePermit,
    SaveObservation,
    GetOpenPermits,
    ClosePermit,
    SearchPermits,
}

impl ActionKind {
    /// Wire name, as it appears in the `action` field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CheckLogin => "checkLogin",
            Self::GetInitialData => "getInitialData",
            Self::SavePermit => "savePermit",
            Self::SaveObservation => "saveObservation",
            Self::GetOpenPermits => "getOpenPermits",
            Self::ClosePermit => "closePermit",
            Self::SearchPermits => "searchPermits",
        }
    }

    /// Text shown by the busy indicator while the action is in flight.
    pub fn busy_label(self) -> &'static str {
        match self {
            Self::CheckLogin => "Signing in...",
            Self::GetInitialData => "Loading configuration...",
            Self::SavePermit => "Saving permit...",
            Self::SaveObservation => "Saving observation...",
            Self::GetOpenPermits => "Loading permits...",
            Self::ClosePermit => "Closing permit...",
            Self::SearchPermits => "Searching...",
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// RESPONSES
// ============================================================================
//
// The backend always answers with a `status` field; the rest depends on the
// action. Every field defaults so a partial answer still decodes.

/// `checkLogin` response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user_info: Option<UserInfo>,
}

/// `getInitialData` response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialDataResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub projects: Vec<String>,
    #[serde(default)]
    pub permit_types: Vec<String>,
    #[serde(default)]
    pub requesters: Vec<String>,
}

impl InitialDataResponse {
    pub fn into_reference_data(self) -> ReferenceData {
        ReferenceData {
            projects: self.projects,
            permit_types: self.permit_types,
            requesters: self.requesters,
        }
    }
}

/// Plain acknowledgement (`savePermit`, `saveObservation`, `closePermit`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// `getOpenPermits` response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpenPermitsResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub permits: Option<Vec<OpenPermit>>,
}

/// `searchPermits` response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub permits: Vec<PermitRecord>,
}
