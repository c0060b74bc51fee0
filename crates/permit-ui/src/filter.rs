//! Monitor filter form
//!
//! Turns the monitor controls into [`SearchFilters`], rejecting bad date
//! ranges before any request goes out.

use chrono::NaiveDate;
use permit_client::ActionError;
use permit_types::{SearchFilters, ALL_ACCESSIBLE};

use crate::forms::DATE_FORMAT;

#[derive(Debug, Clone, PartialEq)]
pub struct FilterForm {
    /// Choices for `project`: the sentinel first, then the session's projects.
    pub project_options: Vec<String>,
    pub project: String,
    pub requester: String,
    pub from_date: String,
    pub to_date: String,
    pub open_only: bool,
}

impl Default for FilterForm {
    fn default() -> Self {
        Self::with_projects(&[])
    }
}

impl FilterForm {
    pub fn with_projects(projects: &[String]) -> Self {
        let mut project_options = Vec::with_capacity(projects.len() + 1);
        project_options.push(ALL_ACCESSIBLE.to_string());
        project_options.extend(projects.iter().cloned());
        Self {
            project_options,
            project: ALL_ACCESSIBLE.to_string(),
            requester: String::new(),
            from_date: String::new(),
            to_date: String::new(),
            open_only: false,
        }
    }

    /// Replace the project choices, keeping everything the user entered.
    pub fn set_projects(&mut self, projects: &[String]) {
        let fresh = Self::with_projects(projects);
        self.project_options = fresh.project_options;
    }

    pub fn criteria(&self) -> Result<SearchFilters, ActionError> {
        let from = parse_bound("fromDate", "From", &self.from_date)?;
        let to = parse_bound("toDate", "To", &self.to_date)?;

        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(ActionError::validation(
                    "fromDate",
                    "'From' date must be before 'To' date.",
                ));
            }
        }

        let project = self.project.trim();
        Ok(SearchFilters {
            selected_project: if project.is_empty() {
                ALL_ACCESSIBLE.to_string()
            } else {
                project.to_string()
            },
            requester: non_blank(&self.requester),
            from_date: from.map(|d| d.format(DATE_FORMAT).to_string()),
            to_date: to.map(|d| d.format(DATE_FORMAT).to_string()),
            show_open_only: self.open_only,
        })
    }
}

fn parse_bound(key: &str, label: &str, raw: &str) -> Result<Option<NaiveDate>, ActionError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map(Some)
        .map_err(|_| ActionError::validation(key, format!("'{label}' date must be YYYY-MM-DD.")))
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverted_range_is_rejected() {
        let form = FilterForm {
            from_date: "2024-02-01".into(),
            to_date: "2024-01-01".into(),
            ..FilterForm::default()
        };
        let err = form.criteria().unwrap_err();
        assert!(matches!(err, ActionError::Validation { .. }));
        assert!(err.to_string().contains("before"));
    }

    #[test]
    fn test_equal_bounds_are_inclusive() {
        let form = FilterForm {
            from_date: "2024-01-01".into(),
            to_date: "2024-01-01".into(),
            ..FilterForm::default()
        };
        let filters = form.criteria().unwrap();
        assert_eq!(filters.from_date.as_deref(), Some("2024-01-01"));
        assert_eq!(filters.to_date.as_deref(), Some("2024-01-01"));
    }

    #[test]
    fn test_defaults_to_all_accessible() {
        let filters = FilterForm::default().criteria().unwrap();
        assert_eq!(filters, SearchFilters::default());
    }

    #[test]
    fn test_optional_requester_and_single_bound() {
        let form = FilterForm {
            project: "Tower A".into(),
            requester: " Omar ".into(),
            to_date: "2024-05-31".into(),
            open_only: true,
            ..FilterForm::with_projects(&["Tower A".to_string()])
        };
        let filters = form.criteria().unwrap();
        assert_eq!(filters.selected_project, "Tower A");
        assert_eq!(filters.requester.as_deref(), Some("Omar"));
        assert_eq!(filters.from_date, None);
        assert!(filters.show_open_only);
    }

    #[test]
    fn test_malformed_date_is_rejected() {
        let form = FilterForm {
            from_date: "01/02/2024".into(),
            ..FilterForm::default()
        };
        assert!(form.criteria().is_err());
    }

    #[test]
    fn test_project_options_start_with_sentinel() {
        let mut form = FilterForm::default();
        form.requester = "Omar".into();
        form.set_projects(&["Tower A".to_string(), "Depot".to_string()]);
        assert_eq!(form.project_options, vec![ALL_ACCESSIBLE, "Tower A", "Depot"]);
        assert_eq!(form.requester, "Omar");
    }
}
