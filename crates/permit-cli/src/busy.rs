//! Busy indicator on stderr.

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};

use colored::Colorize;
use permit_client::BusyIndicator;

/// Prints the action label while a call is in flight and wipes it after.
#[derive(Default)]
pub struct StderrBusy {
    shown: AtomicUsize,
}

impl BusyIndicator for StderrBusy {
    fn show(&self, label: &str) {
        self.shown.store(label.chars().count(), Ordering::Relaxed);
        let mut err = std::io::stderr();
        let _ = write!(err, "{}", label.dimmed());
        let _ = err.flush();
    }

    fn hide(&self) {
        let width = self.shown.swap(0, Ordering::Relaxed);
        if width > 0 {
            eprint!("\r{:width$}\r", "");
        }
    }
}
