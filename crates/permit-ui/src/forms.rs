//! Entry forms
//!
//! Field values as the user typed them, reset to defaults from the session and
//! the local clock, and validated against each form's required set before
//! anything is sent.

use chrono::NaiveDateTime;
use permit_client::ActionError;
use permit_types::{ObservationDraft, PermitDraft};

use crate::session::Session;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

// =============================================================================
// PERMIT FORM
// =============================================================================

/// Editable fields of the permit form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermitField {
    Project,
    Date,
    Shift,
    PermitType,
    Requester,
    SiteEngineer,
    Subcontractor,
    Location,
    StartTime,
    WorkersCount,
    Description,
}

impl PermitField {
    /// Entry order.
    pub const ALL: [PermitField; 11] = [
        PermitField::Project,
        PermitField::Date,
        PermitField::Shift,
        PermitField::PermitType,
        PermitField::Requester,
        PermitField::SiteEngineer,
        PermitField::Subcontractor,
        PermitField::Location,
        PermitField::StartTime,
        PermitField::WorkersCount,
        PermitField::Description,
    ];

    pub const REQUIRED: [PermitField; 8] = [
        PermitField::Project,
        PermitField::Date,
        PermitField::Shift,
        PermitField::PermitType,
        PermitField::Location,
        PermitField::StartTime,
        PermitField::WorkersCount,
        PermitField::Description,
    ];

    /// Wire name inside `permitObject`.
    pub fn key(self) -> &'static str {
        match self {
            PermitField::Project => "projectName",
            PermitField::Date => "permitDate",
            PermitField::Shift => "shift",
            PermitField::PermitType => "permitType",
            PermitField::Requester => "requester",
            PermitField::SiteEngineer => "siteEngineer",
            PermitField::Subcontractor => "subcontractor",
            PermitField::Location => "location",
            PermitField::StartTime => "startTime",
            PermitField::WorkersCount => "workersCount",
            PermitField::Description => "description",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PermitField::Project => "Project",
            PermitField::Date => "Date",
            PermitField::Shift => "Shift",
            PermitField::PermitType => "Permit type",
            PermitField::Requester => "Requester",
            PermitField::SiteEngineer => "Site engineer",
            PermitField::Subcontractor => "Subcontractor",
            PermitField::Location => "Location",
            PermitField::StartTime => "Start time",
            PermitField::WorkersCount => "Workers count",
            PermitField::Description => "Description",
        }
    }

    pub fn is_required(self) -> bool {
        PermitField::REQUIRED.contains(&self)
    }
}

/// Permit form state. `issuer` and `timestamp` are read-only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PermitForm {
    pub draft: PermitDraft,
    pub issuer: String,
    pub timestamp: String,
}

impl PermitForm {
    /// Clear every field, then prefill issuer, date and timestamp.
    ///
    /// Without a session there is nothing to prefill and the form is left alone.
    pub fn reset(&mut self, session: Option<&Session>, now: NaiveDateTime) {
        let Some(session) = session else {
            return;
        };
        *self = Self {
            draft: PermitDraft {
                permit_date: now.format(DATE_FORMAT).to_string(),
                ..PermitDraft::default()
            },
            issuer: session.username().to_string(),
            timestamp: now.format(TIMESTAMP_FORMAT).to_string(),
        };
    }

    pub fn value(&self, field: PermitField) -> &str {
        let d = &self.draft;
        match field {
            PermitField::Project => &d.project_name,
            PermitField::Date => &d.permit_date,
            PermitField::Shift => &d.shift,
            PermitField::PermitType => &d.permit_type,
            PermitField::Requester => &d.requester,
            PermitField::SiteEngineer => &d.site_engineer,
            PermitField::Subcontractor => &d.subcontractor,
            PermitField::Location => &d.location,
            PermitField::StartTime => &d.start_time,
            PermitField::WorkersCount => &d.workers_count,
            PermitField::Description => &d.description,
        }
    }

    pub fn set(&mut self, field: PermitField, value: impl Into<String>) {
        let d = &mut self.draft;
        let slot = match field {
            PermitField::Project => &mut d.project_name,
            PermitField::Date => &mut d.permit_date,
            PermitField::Shift => &mut d.shift,
            PermitField::PermitType => &mut d.permit_type,
            PermitField::Requester => &mut d.requester,
            PermitField::SiteEngineer => &mut d.site_engineer,
            PermitField::Subcontractor => &mut d.subcontractor,
            PermitField::Location => &mut d.location,
            PermitField::StartTime => &mut d.start_time,
            PermitField::WorkersCount => &mut d.workers_count,
            PermitField::Description => &mut d.description,
        };
        *slot = value.into();
    }

    /// The draft to send, or a validation error naming the first empty
    /// required field.
    pub fn validate(&self) -> Result<PermitDraft, ActionError> {
        if let Some(field) = PermitField::REQUIRED
            .into_iter()
            .find(|f| self.value(*f).trim().is_empty())
        {
            return Err(missing(field.key(), field.label()));
        }
        Ok(self.draft.clone())
    }
}

// =============================================================================
// OBSERVATION FORM
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObservationField {
    Project,
    Date,
    Time,
    Location,
    ObservationType,
    Description,
    CorrectiveAction,
}

impl ObservationField {
    pub const ALL: [ObservationField; 7] = [
        ObservationField::Project,
        ObservationField::Date,
        ObservationField::Time,
        ObservationField::Location,
        ObservationField::ObservationType,
        ObservationField::Description,
        ObservationField::CorrectiveAction,
    ];

    pub const REQUIRED: [ObservationField; 6] = [
        ObservationField::Project,
        ObservationField::Date,
        ObservationField::Time,
        ObservationField::Location,
        ObservationField::ObservationType,
        ObservationField::Description,
    ];

    pub fn key(self) -> &'static str {
        match self {
            ObservationField::Project => "projectName",
            ObservationField::Date => "date",
            ObservationField::Time => "time",
            ObservationField::Location => "location",
            ObservationField::ObservationType => "observationType",
            ObservationField::Description => "description",
            ObservationField::CorrectiveAction => "correctiveAction",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ObservationField::Project => "Project",
            ObservationField::Date => "Date",
            ObservationField::Time => "Time",
            ObservationField::Location => "Location",
            ObservationField::ObservationType => "Observation type",
            ObservationField::Description => "Description",
            ObservationField::CorrectiveAction => "Corrective action",
        }
    }

    pub fn is_required(self) -> bool {
        ObservationField::REQUIRED.contains(&self)
    }
}

/// Observation form state. `issuer` is read-only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationForm {
    pub draft: ObservationDraft,
    pub issuer: String,
}

impl ObservationForm {
    pub fn reset(&mut self, session: Option<&Session>, now: NaiveDateTime) {
        let Some(session) = session else {
            return;
        };
        *self = Self {
            draft: ObservationDraft {
                date: now.format(DATE_FORMAT).to_string(),
                time: now.format(TIME_FORMAT).to_string(),
                ..ObservationDraft::default()
            },
            issuer: session.username().to_string(),
        };
    }

    pub fn value(&self, field: ObservationField) -> &str {
        let d = &self.draft;
        match field {
            ObservationField::Project => &d.project_name,
            ObservationField::Date => &d.date,
            ObservationField::Time => &d.time,
            ObservationField::Location => &d.location,
            ObservationField::ObservationType => &d.observation_type,
            ObservationField::Description => &d.description,
            ObservationField::CorrectiveAction => &d.corrective_action,
        }
    }

    pub fn set(&mut self, field: ObservationField, value: impl Into<String>) {
        let d = &mut self.draft;
        let slot = match field {
            ObservationField::Project => &mut d.project_name,
            ObservationField::Date => &mut d.date,
            ObservationField::Time => &mut d.time,
            ObservationField::Location => &mut d.location,
            ObservationField::ObservationType => &mut d.observation_type,
            ObservationField::Description => &mut d.description,
            ObservationField::CorrectiveAction => &mut d.corrective_action,
        };
        *slot = value.into();
    }

    pub fn validate(&self) -> Result<ObservationDraft, ActionError> {
        if let Some(field) = ObservationField::REQUIRED
            .into_iter()
            .find(|f| self.value(*f).trim().is_empty())
        {
            return Err(missing(field.key(), field.label()));
        }
        Ok(self.draft.clone())
    }
}

fn missing(key: &str, label: &str) -> ActionError {
    ActionError::validation(key, format!("Please fill in the required field: {label}."))
}
