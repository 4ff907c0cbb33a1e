use std::sync::atomic::{AtomicBool, Ordering};

/// Checkpoint in front of request submission.
///
/// Starts locked on every load and only ever moves to unlocked.
#[derive(Debug, Default)]
pub struct RequestGate {
    unlocked: AtomicBool,
}

impl RequestGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Explicit confirmation, i.e. the receiver pressed "Continue".
    pub fn unlock(&self) {
        if !self.unlocked.swap(true, Ordering::SeqCst) {
            tracing::debug!("request gate unlocked");
        }
    }

    /// Pages that render the form up front have nothing to confirm.
    pub fn observe_form_visibility(&self, visible: bool) {
        if visible {
            self.unlock();
        }
    }

    pub fn can_submit(&self) -> bool {
        self.unlocked.load(Ordering::SeqCst)
    }
}
