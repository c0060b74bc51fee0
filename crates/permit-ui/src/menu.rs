//! Navigation menu derived from a session's capability string.

use tracing::warn;

use crate::sections::Section;

/// Capability value granting every section.
pub const ALL_SECTIONS: &str = "ALL";

/// Build the menu for a capability string.
///
/// `"ALL"` (any case) yields the whole catalog. Otherwise the string is a
/// comma-separated allow-list: entries are trimmed, blanks skipped, unknown
/// ids dropped with a warning and repeats dropped.
pub fn derive_menu(capabilities: &str) -> Vec<Section> {
    let capabilities = capabilities.trim();
    if capabilities.is_empty() {
        return Vec::new();
    }
    if capabilities.eq_ignore_ascii_case(ALL_SECTIONS) {
        return Section::ALL.to_vec();
    }

    let mut menu = Vec::new();
    for entry in listed(capabilities) {
        match Section::from_id(entry) {
            Some(section) if !menu.contains(&section) => menu.push(section),
            Some(_) => {}
            None => warn!("Section ID \"{}\" ignored", entry),
        }
    }
    menu
}

/// Section shown right after login.
///
/// First menu entry; else `Dashboard` when the capability string names it;
/// else the first listed capability with a known display name; else `Dashboard`.
pub fn initial_section(menu: &[Section], capabilities: &str) -> Section {
    if let Some(first) = menu.first() {
        return *first;
    }
    if capabilities.to_ascii_uppercase().contains("DASHBOARD") {
        return Section::Dashboard;
    }
    listed(capabilities)
        .find_map(Section::from_id)
        .unwrap_or(Section::Dashboard)
}

fn listed(capabilities: &str) -> impl Iterator<Item = &str> {
    capabilities
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
