//! Busy indicator around in-flight calls
//!
//! [`BusyGuard`] shows the indicator when acquired and hides it when dropped,
//! so every exit path of a call (success, transport failure, malformed body,
//! backend error) clears it.

/// Something that can show and hide a "working..." state.
pub trait BusyIndicator: Send + Sync {
    fn show(&self, label: &str);
    fn hide(&self);
}

/// Indicator that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBusyIndicator;

impl BusyIndicator for NoBusyIndicator {
    fn show(&self, _label: &str) {}
    fn hide(&self) {}
}

/// Scoped acquisition of a [`BusyIndicator`].
#[must_use = "the indicator is hidden as soon as the guard is dropped"]
pub struct BusyGuard<'a> {
    indicator: &'a dyn BusyIndicator,
}

impl<'a> BusyGuard<'a> {
    pub fn acquire(indicator: &'a dyn BusyIndicator, label: &str) -> Self {
        indicator.show(label);
        Self { indicator }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.indicator.hide();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<String>>);

    impl BusyIndicator for Recorder {
        fn show(&self, label: &str) {
            self.0.lock().unwrap().push(format!("show:{label}"));
        }
        fn hide(&self) {
            self.0.lock().unwrap().push("hide".into());
        }
    }

    fn fails(indicator: &dyn BusyIndicator) -> Result<(), ()> {
        let _busy = BusyGuard::acquire(indicator, "Saving...");
        Err(())
    }

    #[test]
    fn test_guard_hides_on_early_return() {
        let recorder = Recorder::default();
        assert!(fails(&recorder).is_err());
        assert_eq!(*recorder.0.lock().unwrap(), vec!["show:Saving...", "hide"]);
    }
}
