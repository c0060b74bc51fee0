//! Session State
//!
//! Identity of the signed-in user plus the reference data loaded for them.

use permit_types::{ReferenceData, UserInfo};

/// The one active session. Created on login, dropped on logout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub user: UserInfo,
    /// `None` until `getInitialData` answers.
    pub reference: Option<ReferenceData>,
}

impl Session {
    pub fn new(user: UserInfo) -> Self {
        Self {
            user,
            reference: None,
        }
    }

    pub fn username(&self) -> &str {
        &self.user.username
    }

    pub fn projects(&self) -> &[String] {
        self.reference
            .as_ref()
            .map(|r| r.projects.as_slice())
            .unwrap_or_default()
    }

    pub fn permit_types(&self) -> &[String] {
        self.reference
            .as_ref()
            .map(|r| r.permit_types.as_slice())
            .unwrap_or_default()
    }

    pub fn requesters(&self) -> &[String] {
        self.reference
            .as_ref()
            .map(|r| r.requesters.as_slice())
            .unwrap_or_default()
    }
}
