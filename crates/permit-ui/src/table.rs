//! Result projections
//!
//! What the monitor results area and the open-permits list show. Adapters
//! render these; nothing here knows about a toolkit.

use permit_types::{OpenPermit, PermitRecord};

pub const SEARCH_PROMPT: &str = "Select search criteria...";
pub const SEARCHING: &str = "Searching...";
pub const NO_RESULTS: &str = "No results.";
pub const LOADING_PERMITS: &str = "Loading...";
pub const NO_OPEN_PERMITS: &str = "No open permits.";
pub const EMPTY_CELL: &str = "-";

// =============================================================================
// SEARCH RESULTS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Open,
    Closed,
}

impl StatusClass {
    pub fn css_class(self) -> &'static str {
        match self {
            StatusClass::Open => "status-open",
            StatusClass::Closed => "status-closed",
        }
    }
}

/// One table row: the fixed projection of a [`PermitRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub id: String,
    pub project: String,
    pub date: String,
    pub permit_type: String,
    pub issuer: String,
    pub requester: String,
    pub description: String,
    pub status: String,
    pub status_class: StatusClass,
}

impl ResultRow {
    pub const COLUMNS: [&'static str; 8] = [
        "ID",
        "Project",
        "Date",
        "Type",
        "Issuer",
        "Requester",
        "Description",
        "Status",
    ];

    pub fn from_record(record: &PermitRecord) -> Self {
        Self {
            id: cell(&record.id),
            project: cell(&record.project_name),
            date: cell(&record.permit_date),
            permit_type: cell(&record.permit_type),
            issuer: cell(&record.issuer),
            requester: cell(&record.requester),
            description: cell(&record.description),
            status: cell(&record.status),
            status_class: if record.is_open() {
                StatusClass::Open
            } else {
                StatusClass::Closed
            },
        }
    }

    /// Cells in [`ResultRow::COLUMNS`] order.
    pub fn cells(&self) -> [&str; 8] {
        [
            self.id.as_str(),
            self.project.as_str(),
            self.date.as_str(),
            self.permit_type.as_str(),
            self.issuer.as_str(),
            self.requester.as_str(),
            self.description.as_str(),
            self.status.as_str(),
        ]
    }
}

/// State of the monitor results area.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ResultsView {
    /// Nothing searched yet
    #[default]
    Prompt,
    Searching,
    /// Search succeeded with zero rows; shows [`NO_RESULTS`], never an empty table
    NoResults,
    Table(Vec<ResultRow>),
    /// Search failed; area left blank, the error is in the monitor message
    Cleared,
}

impl ResultsView {
    pub fn from_records(records: &[PermitRecord]) -> Self {
        if records.is_empty() {
            ResultsView::NoResults
        } else {
            ResultsView::Table(records.iter().map(ResultRow::from_record).collect())
        }
    }

    /// Placeholder text for the non-table states.
    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            ResultsView::Prompt => Some(SEARCH_PROMPT),
            ResultsView::Searching => Some(SEARCHING),
            ResultsView::NoResults => Some(NO_RESULTS),
            ResultsView::Table(_) | ResultsView::Cleared => None,
        }
    }
}

// =============================================================================
// OPEN PERMITS
// =============================================================================

/// A card in the close-permit list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenPermitCard {
    /// Needed to close the permit; cards without one can't be closed
    pub id: Option<String>,
    pub project: String,
    pub permit_type: String,
    pub date: String,
    pub description: String,
}

impl OpenPermitCard {
    pub fn from_permit(permit: &OpenPermit) -> Self {
        Self {
            id: permit.id.clone().filter(|id| !id.trim().is_empty()),
            project: cell(&permit.project),
            permit_type: cell(&permit.permit_type),
            date: cell(&permit.date),
            description: cell(&permit.description),
        }
    }

    pub fn display_id(&self) -> &str {
        self.id.as_deref().unwrap_or(EMPTY_CELL)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OpenPermitsView {
    /// Section not visited yet
    #[default]
    Idle,
    Loading,
    Empty,
    Cards(Vec<OpenPermitCard>),
    Failed(String),
}

impl OpenPermitsView {
    pub fn from_permits(permits: &[OpenPermit]) -> Self {
        if permits.is_empty() {
            OpenPermitsView::Empty
        } else {
            OpenPermitsView::Cards(permits.iter().map(OpenPermitCard::from_permit).collect())
        }
    }
}

fn cell(value: &Option<String>) -> String {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => EMPTY_CELL.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, status: &str) -> PermitRecord {
        PermitRecord {
            id: Some(id.into()),
            project_name: Some("Tower A".into()),
            permit_date: Some("2024-03-05".into()),
            permit_type: Some("Hot Work".into()),
            issuer: Some("amal".into()),
            requester: None,
            description: Some("Welding".into()),
            status: Some(status.into()),
        }
    }

    #[test]
    fn test_empty_results_use_placeholder() {
        let view = ResultsView::from_records(&[]);
        assert_eq!(view, ResultsView::NoResults);
        assert_eq!(view.placeholder(), Some(NO_RESULTS));
    }

    #[test]
    fn test_rows_project_fixed_columns() {
        let view = ResultsView::from_records(&[record("P-1", "Open"), record("P-2", "CLOSED")]);
        let ResultsView::Table(rows) = view else {
            panic!("expected a table");
        };
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0].cells(),
            ["P-1", "Tower A", "2024-03-05", "Hot Work", "amal", "-", "Welding", "Open"]
        );
        assert_eq!(rows[0].status_class, StatusClass::Open);
        assert_eq!(rows[1].status_class, StatusClass::Closed);
        assert_eq!(rows[1].status_class.css_class(), "status-closed");
    }

    #[test]
    fn test_open_permit_cards() {
        let permits = vec![
            OpenPermit {
                id: Some("P-9".into()),
                project: Some("Depot".into()),
                ..Default::default()
            },
            OpenPermit::default(),
        ];
        let OpenPermitsView::Cards(cards) = OpenPermitsView::from_permits(&permits) else {
            panic!("expected cards");
        };
        assert_eq!(cards[0].id.as_deref(), Some("P-9"));
        assert_eq!(cards[0].permit_type, EMPTY_CELL);
        assert_eq!(cards[1].display_id(), EMPTY_CELL);
        assert_eq!(OpenPermitsView::from_permits(&[]), OpenPermitsView::Empty);
    }
}
