//! Permit Desk UI core
//!
//! Everything the front end does, minus the toolkit: the view state
//! machine, entry forms, the monitor filter and the result projections.
//! Adapters (the terminal shell today) render [`AppState`] and feed
//! [`AppEvent`]s to a [`Controller`].
//!
//! ```text
//! adapter ──AppEvent──► Controller ──► update(state, event, now)
//!    ▲                      │                    │
//!    │                      │◄──(state, commands)┘
//!    └──Confirm / Reload────┤
//!                           ├── Call ──► ActionClient ──► completion event
//!                           └── ExpireMessage ──► tokio timer ──► channel
//! ```

pub mod controller;
pub mod event;
pub mod filter;
pub mod forms;
pub mod menu;
pub mod message;
pub mod sections;
pub mod session;
pub mod state;
pub mod table;
pub mod update;

pub use controller::{Clock, Controller};
pub use event::{AppCommand, AppEvent};
pub use filter::FilterForm;
pub use forms::{ObservationField, ObservationForm, PermitField, PermitForm};
pub use menu::{derive_menu, initial_section};
pub use message::{Message, MessageKind, MessageSlot, MESSAGE_TTL};
pub use sections::Section;
pub use session::Session;
pub use state::{AppState, View, Workspace};
pub use table::{OpenPermitCard, OpenPermitsView, ResultRow, ResultsView, StatusClass};
pub use update::update;
