//! Interactive shell
//!
//! Line editing runs on its own OS thread (rustyline blocks); the async loop
//! hands it a prompt, then waits for either the line or a message-expiry
//! event from the controller.

use colored::Colorize;
use permit_client::ActionClient;
use permit_ui::{
    AppCommand, AppEvent, Controller, ObservationField, ObservationForm, PermitField, PermitForm,
    Section,
};
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;
use tracing::{debug, error};

use crate::command::{self, Command, SearchArgs, FORM_KEYS, HELP};
use crate::render::{menu_line, render};

/// Multi-line interactions in progress.
enum Pending {
    Password { username: String },
    ConfirmClose { permit_id: String },
    Permit { form: PermitForm, step: usize },
    Observation { form: ObservationForm, step: usize },
}

enum LineEvent {
    Line(String),
    Interrupted,
    Eof,
}

enum Flow {
    Continue,
    Quit,
}

pub struct Shell<C> {
    controller: Controller<C>,
    expiries: mpsc::UnboundedReceiver<AppEvent>,
    pending: Option<Pending>,
}

impl<C: ActionClient> Shell<C> {
    pub fn new(controller: Controller<C>, expiries: mpsc::UnboundedReceiver<AppEvent>) -> Self {
        Self {
            controller,
            expiries,
            pending: None,
        }
    }

    /// Ask for the password of `username` at the first prompt.
    pub fn start_login(&mut self, username: String) {
        self.pending = Some(Pending::Password { username });
    }

    pub async fn run(mut self) -> anyhow::Result<()> {
        let (prompts, mut lines) = spawn_line_reader()?;
        println!("{}", render(self.controller.state()));
        println!("{}", "Type `help` for commands.".dimmed());

        loop {
            if prompts.send(self.prompt()).is_err() {
                break;
            }

            let event = loop {
                tokio::select! {
                    biased;

                    Some(expired) = self.expiries.recv() => {
                        self.controller.dispatch(expired).await;
                    }
                    event = lines.recv() => break event,
                }
            };

            let flow = match event {
                Some(LineEvent::Line(line)) => self.handle_line(&line).await,
                Some(LineEvent::Interrupted) => {
                    if self.pending.take().is_some() {
                        println!("Cancelled.");
                    }
                    Flow::Continue
                }
                Some(LineEvent::Eof) | None => Flow::Quit,
            };
            if let Flow::Quit = flow {
                break;
            }
        }
        Ok(())
    }

    fn prompt(&self) -> String {
        match &self.pending {
            Some(Pending::Password { .. }) => "password: ".to_string(),
            Some(Pending::ConfirmClose { permit_id }) => {
                format!("Close permit {permit_id}? [y/N] ")
            }
            Some(Pending::Permit { form, step }) => {
                let field = PermitField::ALL[*step];
                field_prompt(field.label(), field.is_required(), form.value(field))
            }
            Some(Pending::Observation { form, step }) => {
                let field = ObservationField::ALL[*step];
                field_prompt(field.label(), field.is_required(), form.value(field))
            }
            None => match self.controller.state().workspace() {
                Some(ws) => format!("{}@{}> ", ws.session.username(), ws.active.id()),
                None => "permit> ".to_string(),
            },
        }
    }

    async fn handle_line(&mut self, line: &str) -> Flow {
        if let Some(pending) = self.pending.take() {
            self.continue_pending(pending, line).await;
            return Flow::Continue;
        }

        match command::parse(line) {
            Ok(Some(command)) => self.run_command(command).await,
            Ok(None) => Flow::Continue,
            Err(e) => {
                eprintln!("{}: {}", "error".red().bold(), e);
                Flow::Continue
            }
        }
    }

    async fn run_command(&mut self, command: Command) -> Flow {
        match command {
            Command::Login { username, password } => match password {
                Some(password) => self.send(AppEvent::LoginSubmitted { username, password }).await,
                None => self.start_login(username),
            },
            Command::Logout => self.send(AppEvent::Logout).await,
            Command::Menu => match self.controller.state().workspace() {
                Some(ws) => println!("{}", menu_line(ws)),
                None => println!("Not signed in."),
            },
            Command::Go(target) => {
                let id = self.section_id(&target);
                self.send(AppEvent::Navigate(id)).await;
            }
            Command::Permit => {
                if self.enter(Section::NewPermit).await {
                    if let Some(ws) = self.controller.state().workspace() {
                        self.pending = Some(Pending::Permit {
                            form: ws.permit_form.clone(),
                            step: 0,
                        });
                        println!("{}", FORM_KEYS.dimmed());
                        self.hint();
                    }
                }
            }
            Command::Observation => {
                if self.enter(Section::NewObservation).await {
                    if let Some(ws) = self.controller.state().workspace() {
                        self.pending = Some(Pending::Observation {
                            form: ws.observation_form.clone(),
                            step: 0,
                        });
                        println!("{}", FORM_KEYS.dimmed());
                        self.hint();
                    }
                }
            }
            Command::Open => {
                self.send(AppEvent::Navigate(Section::ClosePermit.id().to_string()))
                    .await
            }
            Command::Refresh => self.send(AppEvent::RefreshOpenPermits).await,
            Command::Close(permit_id) => self.send(AppEvent::CloseRequested(permit_id)).await,
            Command::Search(args) => self.search(args).await,
            Command::Show => println!("{}", render(self.controller.state())),
            Command::Help => println!("{HELP}"),
            Command::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    async fn continue_pending(&mut self, pending: Pending, line: &str) {
        match pending {
            Pending::Password { username } => {
                self.send(AppEvent::LoginSubmitted {
                    username,
                    password: line.to_string(),
                })
                .await
            }
            Pending::ConfirmClose { permit_id } => {
                if matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes") {
                    self.send(AppEvent::CloseConfirmed(permit_id)).await;
                } else {
                    println!("Cancelled.");
                }
            }
            Pending::Permit { mut form, step } => {
                if let Some(value) = field_input(line) {
                    form.set(PermitField::ALL[step], value);
                }
                if step + 1 < PermitField::ALL.len() {
                    self.pending = Some(Pending::Permit {
                        form,
                        step: step + 1,
                    });
                    self.hint();
                } else {
                    self.send(AppEvent::PermitSubmitted(form)).await;
                }
            }
            Pending::Observation { mut form, step } => {
                if let Some(value) = field_input(line) {
                    form.set(ObservationField::ALL[step], value);
                }
                if step + 1 < ObservationField::ALL.len() {
                    self.pending = Some(Pending::Observation {
                        form,
                        step: step + 1,
                    });
                    self.hint();
                } else {
                    self.send(AppEvent::ObservationSubmitted(form)).await;
                }
            }
        }
    }

    /// Dispatch, handle what only the shell can do, redraw.
    async fn send(&mut self, event: AppEvent) {
        for command in self.controller.dispatch(event).await {
            match command {
                AppCommand::ConfirmClose { permit_id } => {
                    self.pending = Some(Pending::ConfirmClose { permit_id });
                }
                AppCommand::Reload => {
                    self.pending = None;
                    println!("{}", "Signed out.".dimmed());
                }
                other => debug!("Shell ignores {:?}", other),
            }
        }
        println!("{}", render(self.controller.state()));
    }

    /// Show `section`, navigating first when needed. False when the user
    /// cannot reach it.
    async fn enter(&mut self, section: Section) -> bool {
        let Some(ws) = self.controller.state().workspace() else {
            println!("Not signed in.");
            return false;
        };
        if ws.active != section {
            self.send(AppEvent::Navigate(section.id().to_string()))
                .await;
        }
        let reached = self
            .controller
            .state()
            .workspace()
            .is_some_and(|ws| ws.active == section);
        if !reached {
            println!("{} is not in your menu.", section.display_name());
        }
        reached
    }

    async fn search(&mut self, args: SearchArgs) {
        if !self.enter(Section::MonitorPermits).await {
            return;
        }
        let Some(ws) = self.controller.state().workspace() else {
            return;
        };
        let mut filter = ws.filter.clone();
        if let Some(project) = args.project {
            filter.project = project;
        }
        if let Some(requester) = args.requester {
            filter.requester = requester;
        }
        if let Some(from) = args.from {
            filter.from_date = from;
        }
        if let Some(to) = args.to {
            filter.to_date = to;
        }
        filter.open_only = args.open_only;
        self.send(AppEvent::SearchSubmitted(filter)).await;
    }

    /// Menu position (1-based) or the id as typed.
    fn section_id(&self, target: &str) -> String {
        let by_position = target.parse::<usize>().ok().and_then(|n| {
            let ws = self.controller.state().workspace()?;
            ws.menu.get(n.checked_sub(1)?).copied()
        });
        by_position
            .map(|s| s.id().to_string())
            .unwrap_or_else(|| target.to_string())
    }

    /// List the choices for the field about to be prompted.
    fn hint(&self) {
        let Some(ws) = self.controller.state().workspace() else {
            return;
        };
        let session = &ws.session;
        let options: &[String] = match &self.pending {
            Some(Pending::Permit { step, .. }) => match PermitField::ALL[*step] {
                PermitField::Project => session.projects(),
                PermitField::PermitType => session.permit_types(),
                PermitField::Requester => session.requesters(),
                _ => &[],
            },
            Some(Pending::Observation { step, .. }) => match ObservationField::ALL[*step] {
                ObservationField::Project => session.projects(),
                _ => &[],
            },
            _ => &[],
        };
        if !options.is_empty() {
            println!("  {}", options.join(" | ").dimmed());
        }
    }
}

/// Typed into a form prompt to empty the field.
const CLEAR_FIELD: &str = "-";

/// New value for a form field, or `None` to keep the current one.
fn field_input(line: &str) -> Option<&str> {
    match line.trim() {
        "" => None,
        CLEAR_FIELD => Some(""),
        value => Some(value),
    }
}

fn field_prompt(label: &str, required: bool, current: &str) -> String {
    let marker = if required { "*" } else { "" };
    if current.is_empty() {
        format!("{label}{marker}: ")
    } else {
        format!("{label}{marker} [{current}]: ")
    }
}

/// Own the line editor on a dedicated thread; one prompt in, one event out.
fn spawn_line_reader(
) -> anyhow::Result<(std::sync::mpsc::Sender<String>, mpsc::UnboundedReceiver<LineEvent>)> {
    let (prompt_tx, prompt_rx) = std::sync::mpsc::channel::<String>();
    let (line_tx, line_rx) = mpsc::unbounded_channel();

    std::thread::Builder::new()
        .name("permit-readline".into())
        .spawn(move || {
            let mut editor = match rustyline::DefaultEditor::new() {
                Ok(editor) => editor,
                Err(e) => {
                    error!("Failed to create line editor: {e}");
                    let _ = line_tx.send(LineEvent::Eof);
                    return;
                }
            };

            while let Ok(prompt) = prompt_rx.recv() {
                let event = match editor.readline(&prompt) {
                    Ok(line) => {
                        let _ = editor.add_history_entry(line.as_str());
                        LineEvent::Line(line)
                    }
                    Err(ReadlineError::Interrupted) => LineEvent::Interrupted,
                    Err(ReadlineError::Eof) => LineEvent::Eof,
                    Err(e) => {
                        error!("Readline error: {e}");
                        LineEvent::Eof
                    }
                };
                let done = matches!(event, LineEvent::Eof);
                if line_tx.send(event).is_err() || done {
                    break;
                }
            }
        })?;

    Ok((prompt_tx, line_rx))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_prompt() {
        assert_eq!(field_prompt("Shift", true, ""), "Shift*: ");
        assert_eq!(
            field_prompt("Date", true, "2024-03-05"),
            "Date* [2024-03-05]: "
        );
        assert_eq!(field_prompt("Requester", false, ""), "Requester: ");
    }

    #[test]
    fn test_field_input_keeps_sets_or_clears() {
        assert_eq!(field_input(""), None);
        assert_eq!(field_input("   "), None);
        assert_eq!(field_input(" Night "), Some("Night"));
        assert_eq!(field_input("-"), Some(""));
    }

    #[test]
    fn test_dash_clears_prefilled_date() {
        let mut form = PermitForm::default();
        form.set(PermitField::Date, "2024-03-05");
        if let Some(value) = field_input("-") {
            form.set(PermitField::Date, value);
        }
        assert_eq!(form.value(PermitField::Date), "");
        assert!(form.validate().is_err());
    }
}
