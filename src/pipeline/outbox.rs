//! Single-slot verdict outbox consumed by the UI thread.
//!
//! `publish` overwrites any unconsumed verdict (last write wins); `take`
//! drains the slot. The worker publishes, the UI loop takes. This is the
//! only cross-thread handoff toward presentation.

use std::sync::Mutex;

use crate::classify::Verdict;

#[derive(Default)]
pub struct VerdictOutbox {
    slot: Mutex<Option<Verdict>>,
}

impl VerdictOutbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, verdict: Verdict) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(verdict);
        }
    }

    pub fn take(&self) -> Option<Verdict> {
        self.slot.lock().ok().and_then(|mut slot| slot.take())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_on_empty_is_none() {
        let outbox = VerdictOutbox::new();
        assert_eq!(outbox.take(), None);
    }

    #[test]
    fn last_write_wins() {
        let outbox = VerdictOutbox::new();
        outbox.publish(Verdict::Cat);
        outbox.publish(Verdict::NotCat);
        assert_eq!(outbox.take(), Some(Verdict::NotCat));
        assert_eq!(outbox.take(), None);
    }
}
