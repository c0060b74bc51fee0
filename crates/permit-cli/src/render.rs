//! Terminal rendering of [`AppState`].

use std::fmt::Write;

use colored::Colorize;
use permit_ui::{
    AppState, Message, MessageSlot, OpenPermitsView, ResultRow, ResultsView, Section,
    StatusClass, Workspace,
};

pub fn render(state: &AppState) -> String {
    let mut out = String::new();
    match state.workspace() {
        None => render_login(&mut out, state),
        Some(ws) => render_workspace(&mut out, state, ws),
    }
    out
}

fn render_login(out: &mut String, state: &AppState) {
    let _ = writeln!(out, "{}", "Permit Desk".bold());
    let _ = writeln!(out, "Not signed in. Use: login <username> [password]");
    if let Some(error) = state.login_error() {
        let _ = writeln!(out, "{}", error.red());
    }
}

fn render_workspace(out: &mut String, state: &AppState, ws: &Workspace) {
    let user = &ws.session.user;
    let _ = writeln!(
        out,
        "{} {} ({})",
        "Permit Desk".bold(),
        user.username.cyan(),
        if user.role.is_empty() { "?" } else { user.role.as_str() }
    );
    let _ = writeln!(out, "{}", menu_line(ws));
    message_line(out, state.message(MessageSlot::Global));
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", ws.active.display_name().bold().underline());

    match ws.active {
        Section::Dashboard => {
            let _ = writeln!(
                out,
                "{} projects, {} permit types, {} requesters",
                ws.session.projects().len(),
                ws.session.permit_types().len(),
                ws.session.requesters().len()
            );
        }
        Section::NewPermit => {
            let _ = writeln!(out, "Issuer: {}", ws.permit_form.issuer);
            let _ = writeln!(out, "Type `permit` to fill in the form.");
            message_line(out, state.message(MessageSlot::Permit));
        }
        Section::NewObservation => {
            let _ = writeln!(out, "Issuer: {}", ws.observation_form.issuer);
            let _ = writeln!(out, "Type `observation` to fill in the form.");
            message_line(out, state.message(MessageSlot::Observation));
        }
        Section::ClosePermit => {
            message_line(out, state.message(MessageSlot::ClosePermit));
            render_open_permits(out, &ws.open_permits);
        }
        Section::MonitorPermits => {
            message_line(out, state.message(MessageSlot::Monitor));
            render_results(out, &ws.results);
        }
        Section::NewNearMiss => {
            let _ = writeln!(out, "Nothing to do here from the terminal yet.");
        }
    }
}

pub fn menu_line(ws: &Workspace) -> String {
    if ws.menu.is_empty() {
        return "No sections available".dimmed().to_string();
    }
    ws.menu
        .iter()
        .enumerate()
        .map(|(i, section)| {
            let entry = format!("{}:{}", i + 1, section.id());
            if *section == ws.active {
                entry.reversed().to_string()
            } else {
                entry
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

fn message_line(out: &mut String, message: Option<&Message>) {
    if let Some(message) = message {
        let text = if message.is_error() {
            message.text.red()
        } else {
            message.text.green()
        };
        let _ = writeln!(out, "{text}");
    }
}

fn render_open_permits(out: &mut String, view: &OpenPermitsView) {
    match view {
        OpenPermitsView::Idle => {}
        OpenPermitsView::Loading => {
            let _ = writeln!(out, "{}", permit_ui::table::LOADING_PERMITS.dimmed());
        }
        OpenPermitsView::Empty => {
            let _ = writeln!(out, "{}", permit_ui::table::NO_OPEN_PERMITS);
        }
        OpenPermitsView::Failed(error) => {
            let _ = writeln!(out, "{}", error.red());
        }
        OpenPermitsView::Cards(cards) => {
            for card in cards {
                let _ = writeln!(
                    out,
                    "[{}] {} | {} | {}",
                    card.display_id().bold(),
                    card.project,
                    card.permit_type,
                    card.date
                );
                let _ = writeln!(out, "      {}", card.description.dimmed());
            }
        }
    }
}

fn render_results(out: &mut String, view: &ResultsView) {
    if let Some(placeholder) = view.placeholder() {
        let _ = writeln!(out, "{}", placeholder.dimmed());
        return;
    }
    if let ResultsView::Table(rows) = view {
        let _ = write!(out, "{}", results_table(rows));
    }
}

/// Column-aligned table; the status column is coloured.
pub fn results_table(rows: &[ResultRow]) -> String {
    let mut widths = ResultRow::COLUMNS.map(|c| c.chars().count());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row.cells()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header: Vec<String> = ResultRow::COLUMNS
        .iter()
        .zip(widths)
        .map(|(c, w)| format!("{c:<w$}"))
        .collect();
    let _ = writeln!(out, "{}", header.join("  ").bold());

    for row in rows {
        let cells: Vec<String> = row
            .cells()
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(i, (cell, w))| {
                let padded = format!("{cell:<w$}");
                if i == ResultRow::COLUMNS.len() - 1 {
                    match row.status_class {
                        StatusClass::Open => padded.green().to_string(),
                        StatusClass::Closed => padded.red().to_string(),
                    }
                } else {
                    padded
                }
            })
            .collect();
        let _ = writeln!(out, "{}", cells.join("  ").trim_end());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use permit_types::{PermitRecord, UserInfo};
    use permit_ui::Session;

    fn workspace(sections: &str) -> Workspace {
        let menu = permit_ui::derive_menu(sections);
        let active = permit_ui::initial_section(&menu, sections);
        Workspace::new(
            Session::new(UserInfo::new("amal", "Engineer", sections)),
            menu,
            active,
        )
    }

    #[test]
    fn test_login_view_shows_error() {
        let mut state = AppState::default();
        state.view = permit_ui::View::Login {
            error: Some("Invalid credentials".into()),
        };
        let text = render(&state);
        assert!(text.contains("Not signed in"));
        assert!(text.contains("Invalid credentials"));
    }

    #[test]
    fn test_menu_line_numbers_sections() {
        let ws = workspace("NewPermit, MonitorPermits");
        let line = menu_line(&ws);
        assert!(line.contains("1:NewPermit"));
        assert!(line.contains("2:MonitorPermits"));
        assert!(menu_line(&workspace("")).contains("No sections"));
    }

    #[test]
    fn test_results_table_has_every_row() {
        let record = |id: &str, status: &str| PermitRecord {
            id: Some(id.into()),
            project_name: Some("Tower A".into()),
            status: Some(status.into()),
            ..Default::default()
        };
        let ResultsView::Table(rows) =
            ResultsView::from_records(&[record("P-1", "Open"), record("P-22", "Closed")])
        else {
            panic!("expected a table");
        };
        let table = results_table(&rows);
        assert_eq!(table.lines().count(), 3);
        assert!(table.contains("Requester"));
        assert!(table.contains("P-22"));
        assert!(table.contains("Closed"));
    }

    #[test]
    fn test_monitor_prompt_before_search() {
        let mut state = AppState::default();
        let mut ws = workspace("MonitorPermits");
        ws.results = ResultsView::Prompt;
        state.view = permit_ui::View::Workspace(Box::new(ws));
        assert!(render(&state).contains(permit_ui::table::SEARCH_PROMPT));
    }
}
