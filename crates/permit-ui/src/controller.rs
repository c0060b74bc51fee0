//! Controller
//!
//! Owns the [`AppState`], runs `update`, and performs the commands it can:
//! calls go through the [`ActionClient`], message expiries become tokio
//! timers that post back on the event channel. Confirmation and reload are
//! returned to the adapter.

use std::collections::VecDeque;
use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use permit_client::ActionClient;
use tokio::sync::mpsc;
use tracing::debug;

use crate::event::{AppCommand, AppEvent};
use crate::message::MessageSlot;
use crate::state::AppState;
use crate::update::update;

/// Source of the local time used to prefill forms.
pub type Clock = fn() -> NaiveDateTime;

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

pub struct Controller<C> {
    client: C,
    state: AppState,
    clock: Clock,
    events: mpsc::UnboundedSender<AppEvent>,
}

impl<C: ActionClient> Controller<C> {
    /// Build a controller and the receiver its timers post to.
    ///
    /// The adapter drains the receiver and feeds each event to
    /// [`Controller::dispatch`].
    pub fn new(client: C) -> (Self, mpsc::UnboundedReceiver<AppEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let controller = Self {
            client,
            state: AppState::default(),
            clock: local_now,
            events,
        };
        (controller, rx)
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Apply an event and everything it triggers.
    ///
    /// Calls run one after another; each completion is applied before the
    /// next queued event. Returns the commands only the adapter can carry out.
    pub async fn dispatch(&mut self, event: AppEvent) -> Vec<AppCommand> {
        let mut queue = VecDeque::from([event]);
        let mut for_adapter = Vec::new();

        while let Some(event) = queue.pop_front() {
            let state = std::mem::take(&mut self.state);
            let (state, commands) = update(state, event, (self.clock)());
            self.state = state;

            for command in commands {
                match command {
                    AppCommand::Call(request) => {
                        let kind = request.kind();
                        let result = self.client.call(&request).await;
                        queue.push_back(AppEvent::completed(kind, result));
                    }
                    AppCommand::ExpireMessage { slot, after } => self.schedule_expiry(slot, after),
                    other => for_adapter.push(other),
                }
            }
        }

        for_adapter
    }

    fn schedule_expiry(&self, slot: MessageSlot, after: Duration) {
        let events = self.events.clone();
        tokio::spawn(async move {
            tokio::time::sleep(after).await;
            if events.send(AppEvent::MessageExpired(slot)).is_err() {
                debug!("Controller gone; expiry for {:?} dropped", slot);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::PermitField;
    use crate::message::MESSAGE_TTL;
    use crate::sections::Section;
    use crate::table::{OpenPermitsView, ResultsView};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use permit_client::ActionError;
    use permit_types::{ActionKind, ActionRequest};
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Answers from a script keyed by action and records every request.
    #[derive(Default)]
    struct ScriptedClient {
        answers: HashMap<ActionKind, Result<Value, ActionError>>,
        sent: Mutex<Vec<ActionRequest>>,
    }

    impl ScriptedClient {
        fn answer(mut self, kind: ActionKind, answer: Result<Value, ActionError>) -> Self {
            self.answers.insert(kind, answer);
            self
        }

        fn sent(&self) -> Vec<ActionKind> {
            self.sent.lock().unwrap().iter().map(|r| r.kind()).collect()
        }
    }

    #[async_trait]
    impl ActionClient for ScriptedClient {
        async fn call(&self, request: &ActionRequest) -> permit_client::Result<Value> {
            self.sent.lock().unwrap().push(request.clone());
            self.answers
                .get(&request.kind())
                .cloned()
                .unwrap_or_else(|| Ok(json!({"status": "success"})))
        }
    }

    fn fixed_clock() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(8, 15, 0)
            .unwrap()
    }

    fn client(sections: &str) -> ScriptedClient {
        ScriptedClient::default()
            .answer(
                ActionKind::CheckLogin,
                Ok(json!({
                    "status": "success",
                    "userInfo": {"username": "amal", "role": "Engineer", "sections": sections}
                })),
            )
            .answer(
                ActionKind::GetInitialData,
                Ok(json!({
                    "status": "success",
                    "projects": ["Tower A"],
                    "permitTypes": ["Hot Work"],
                    "requesters": ["Omar"]
                })),
            )
    }

    async fn signed_in(
        client: ScriptedClient,
    ) -> (Controller<ScriptedClient>, mpsc::UnboundedReceiver<AppEvent>) {
        let (controller, rx) = Controller::new(client);
        let mut controller = controller.with_clock(fixed_clock);
        controller
            .dispatch(AppEvent::LoginSubmitted {
                username: "amal".into(),
                password: "pw".into(),
            })
            .await;
        (controller, rx)
    }

    #[tokio::test]
    async fn test_login_runs_initial_calls_in_order() {
        let (controller, _rx) = signed_in(client("ClosePermit, MonitorPermits")).await;

        assert_eq!(
            controller.client().sent(),
            vec![
                ActionKind::CheckLogin,
                ActionKind::GetInitialData,
                ActionKind::GetOpenPermits
            ]
        );
        let state = controller.state();
        let ws = state.workspace().unwrap();
        assert_eq!(ws.active, Section::ClosePermit);
        assert_eq!(ws.session.projects(), ["Tower A"]);
        assert_eq!(ws.open_permits, OpenPermitsView::Empty);
        assert!(!state.is_busy());
    }

    #[tokio::test]
    async fn test_close_success_issues_fresh_open_permits_call() {
        let scripted = client("ClosePermit").answer(
            ActionKind::ClosePermit,
            Ok(json!({"status": "success", "message": "Permit closed."})),
        );
        let (mut controller, _rx) = signed_in(scripted).await;

        let adapter = controller
            .dispatch(AppEvent::CloseRequested("P-3".into()))
            .await;
        assert_eq!(
            adapter,
            vec![AppCommand::ConfirmClose {
                permit_id: "P-3".into()
            }]
        );

        controller
            .dispatch(AppEvent::CloseConfirmed("P-3".into()))
            .await;
        let sent = controller.client().sent();
        assert_eq!(
            &sent[sent.len() - 2..],
            &[ActionKind::ClosePermit, ActionKind::GetOpenPermits]
        );
    }

    #[tokio::test]
    async fn test_validation_failure_issues_no_call() {
        let (mut controller, _rx) = signed_in(client("NewPermit")).await;
        let before = controller.client().sent().len();

        let mut form = controller.state().workspace().unwrap().permit_form.clone();
        form.set(PermitField::Project, "Tower A");
        controller.dispatch(AppEvent::PermitSubmitted(form)).await;

        assert_eq!(controller.client().sent().len(), before);
        assert!(controller
            .state()
            .message(MessageSlot::Permit)
            .unwrap()
            .is_error());
    }

    #[tokio::test]
    async fn test_search_failure_shows_monitor_error() {
        let scripted = client("MonitorPermits").answer(
            ActionKind::SearchPermits,
            Err(ActionError::Application {
                message: "Search unavailable".into(),
            }),
        );
        let (mut controller, _rx) = signed_in(scripted).await;
        let filter = controller.state().workspace().unwrap().filter.clone();
        controller.dispatch(AppEvent::SearchSubmitted(filter)).await;

        let state = controller.state();
        assert_eq!(state.workspace().unwrap().results, ResultsView::Cleared);
        assert_eq!(
            state.message(MessageSlot::Monitor).unwrap().text,
            "Search unavailable"
        );
    }

    #[tokio::test]
    async fn test_logout_hands_reload_to_adapter() {
        let (mut controller, _rx) = signed_in(client("ALL")).await;
        let adapter = controller.dispatch(AppEvent::Logout).await;
        assert_eq!(adapter, vec![AppCommand::Reload]);
        assert!(!controller.state().is_authenticated());
    }

    #[tokio::test(start_paused = true)]
    async fn test_message_expires_after_ttl() {
        let scripted = client("ALL").answer(
            ActionKind::GetInitialData,
            Err(ActionError::Transport {
                status: Some(502),
                message: "Proxy error: upstream unreachable".into(),
            }),
        );
        let (mut controller, mut rx) = signed_in(scripted).await;
        assert!(controller.state().message(MessageSlot::Global).is_some());

        tokio::time::advance(MESSAGE_TTL).await;
        let expired = rx.recv().await.unwrap();
        assert_eq!(expired, AppEvent::MessageExpired(MessageSlot::Global));

        controller.dispatch(expired).await;
        assert!(controller.state().message(MessageSlot::Global).is_none());
    }
}
