//! Section catalog
//!
//! The fixed set of views a session can be granted, in declared order.

/// A page of the authenticated workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Section {
    Dashboard,
    NewPermit,
    ClosePermit,
    NewObservation,
    MonitorPermits,
    NewNearMiss,
}

impl Section {
    /// Every known section, in catalog order.
    pub const ALL: [Section; 6] = [
        Section::Dashboard,
        Section::NewPermit,
        Section::ClosePermit,
        Section::NewObservation,
        Section::MonitorPermits,
        Section::NewNearMiss,
    ];

    /// Identifier used in capability strings and navigation requests.
    pub fn id(self) -> &'static str {
        match self {
            Section::Dashboard => "Dashboard",
            Section::NewPermit => "NewPermit",
            Section::ClosePermit => "ClosePermit",
            Section::NewObservation => "NewObservation",
            Section::MonitorPermits => "MonitorPermits",
            Section::NewNearMiss => "NewNearMiss",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Section::Dashboard => "Dashboard",
            Section::NewPermit => "New Permit",
            Section::ClosePermit => "Close Permits",
            Section::NewObservation => "New Observation",
            Section::MonitorPermits => "Monitor Permits",
            Section::NewNearMiss => "Near Miss",
        }
    }

    /// Icon class for menu entries.
    pub fn icon(self) -> &'static str {
        match self {
            Section::Dashboard => "fas fa-tachometer-alt",
            Section::NewPermit => "fas fa-file-signature",
            Section::ClosePermit => "fas fa-clipboard-check",
            Section::NewObservation => "fas fa-eye",
            Section::MonitorPermits => "fas fa-tasks",
            Section::NewNearMiss => "fas fa-exclamation-triangle",
        }
    }

    /// Exact (case-sensitive) lookup by identifier.
    pub fn from_id(id: &str) -> Option<Section> {
        Section::ALL.into_iter().find(|s| s.id() == id)
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}
