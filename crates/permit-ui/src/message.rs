//! Transient inline messages
//!
//! Each area of the UI has one message slot. Showing a message schedules its
//! expiry; the expiry clears whatever the slot holds at that moment, so a
//! newer message can be cut short by an older message's timer.

use std::time::Duration;

/// How long a transient message stays visible.
pub const MESSAGE_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MessageSlot {
    /// Workspace-wide (reference data failures)
    Global,
    Permit,
    Observation,
    ClosePermit,
    Monitor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub kind: MessageKind,
    pub text: String,
}

impl Message {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Error,
            text: text.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == MessageKind::Error
    }
}
