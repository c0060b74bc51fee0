//! Records and payload objects
//!
//! Identity, reference data, form drafts and the permit projections returned
//! by the backend.

use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// IDENTITY
// ============================================================================

/// Identity returned by `checkLogin` and echoed back on every later action.
///
/// Unknown fields are kept in `extra` so the backend gets back exactly what
/// it handed out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub role: String,
    /// Capability string: `"ALL"` or a comma-separated list of section ids.
    #[serde(default)]
    pub sections: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl UserInfo {
    pub fn new(username: &str, role: &str, sections: &str) -> Self {
        Self {
            username: username.to_string(),
            role: role.to_string(),
            sections: sections.to_string(),
            extra: serde_json::Map::new(),
        }
    }
}

/// Lookup lists loaded once per session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceData {
    pub projects: Vec<String>,
    pub permit_types: Vec<String>,
    pub requesters: Vec<String>,
}

// ============================================================================
// DRAFTS
// ============================================================================

/// Permit form capture sent as `permitObject`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermitDraft {
    pub project_name: String,
    pub permit_date: String,
    pub shift: String,
    pub permit_type: String,
    pub requester: String,
    pub site_engineer: String,
    pub subcontractor: String,
    pub location: String,
    pub start_time: String,
    pub workers_count: String,
    pub description: String,
}

/// Observation form capture sent as `observationObject`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationDraft {
    pub project_name: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub observation_type: String,
    pub description: String,
    pub corrective_action: String,
}

/// Search criteria sent as `filters`.
///
/// Absent bounds serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    pub selected_project: String,
    pub requester: Option<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub show_open_only: bool,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            selected_project: crate::ALL_ACCESSIBLE.to_string(),
            requester: None,
            from_date: None,
            to_date: None,
            show_open_only: false,
        }
    }
}

// ============================================================================
// PERMIT PROJECTIONS
// ============================================================================

/// Row of `getOpenPermits`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpenPermit {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub project: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "lenient_string")]
    pub permit_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
}

/// Row of `searchPermits`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermitRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub project_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub permit_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub permit_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub issuer: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub requester: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: Option<String>,
}

impl PermitRecord {
    /// Case-insensitive comparison against "open".
    pub fn is_open(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|s| s.trim().eq_ignore_ascii_case("open"))
    }
}

/// Accepts a string, number or bool as `Some(String)`; `null` as `None`.
///
/// Spreadsheet-backed rows carry numeric ids and dates as whatever the cell held.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de;

    struct LenientVisitor;

    impl<'de> de::Visitor<'de> for LenientVisitor {
        type Value = Option<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a string, number, bool or null")
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D2: Deserializer<'de>>(self, d: D2) -> Result<Self::Value, D2::Error> {
            d.deserialize_any(LenientVisitor)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
            Ok(Some(v))
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }
    }

    deserializer.deserialize_any(LenientVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_info_keeps_unknown_fields() {
        let value = json!({"username": "amal", "role": "HSE", "sections": "ALL", "token": "t-1"});
        let user: UserInfo = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(user.sections, "ALL");
        assert_eq!(serde_json::to_value(&user).unwrap(), value);
    }

    #[test]
    fn test_search_filters_serialize_null_bounds() {
        let value = serde_json::to_value(SearchFilters::default()).unwrap();
        assert_eq!(
            value,
            json!({
                "selectedProject": "ALL_ACCESSIBLE",
                "requester": null,
                "fromDate": null,
                "toDate": null,
                "showOpenOnly": false
            })
        );
    }

    #[test]
    fn test_permit_record_status_is_case_insensitive() {
        let mut record = PermitRecord {
            status: Some("OPEN".into()),
            ..Default::default()
        };
        assert!(record.is_open());
        record.status = Some("Closed".into());
        assert!(!record.is_open());
        record.status = None;
        assert!(!record.is_open());
    }

    #[test]
    fn test_permit_record_null_cells() {
        let record: PermitRecord =
            serde_json::from_value(json!({"id": null, "projectName": "Tower A", "status": "open"}))
                .unwrap();
        assert_eq!(record.id, None);
        assert_eq!(record.project_name.as_deref(), Some("Tower A"));
    }

    #[test]
    fn test_permit_draft_field_names() {
        let value = serde_json::to_value(PermitDraft::default()).unwrap();
        for key in [
            "projectName",
            "permitDate",
            "shift",
            "permitType",
            "requester",
            "siteEngineer",
            "subcontractor",
            "location",
            "startTime",
            "workersCount",
            "description",
        ] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
    }
}
