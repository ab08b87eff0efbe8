//! Verdict presentation.
//!
//! The display surface is deliberately small: `set_text`, called only from
//! the UI-owning thread. `run_display_loop` is that thread's consumer loop,
//! draining the single-slot outbox (last write wins when the loop lags
//! behind the worker).

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use crate::classify::Verdict;
use crate::pipeline::VerdictOutbox;

/// Text shown for a positive verdict.
pub const CAT_TEXT: &str = "It's a cat!";
/// Text shown for a negative verdict.
pub const NOT_CAT_TEXT: &str = "Not a cat.";

pub fn verdict_text(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::Cat => CAT_TEXT,
        Verdict::NotCat => NOT_CAT_TEXT,
    }
}

/// A text surface updatable only from the UI-owning thread.
pub trait TextDisplay {
    fn set_text(&mut self, text: &str);
}

/// Console display: one line per text change.
#[derive(Default)]
pub struct ConsoleDisplay;

impl TextDisplay for ConsoleDisplay {
    fn set_text(&mut self, text: &str) {
        println!("{}", text);
    }
}

/// Drain the outbox until `running` clears, pushing changed text to the
/// display. Repeated identical verdicts update the display once.
pub fn run_display_loop(
    outbox: &VerdictOutbox,
    display: &mut dyn TextDisplay,
    running: &AtomicBool,
    poll_interval: Duration,
) {
    let mut last = None;
    while running.load(Ordering::SeqCst) {
        deliver(outbox, display, &mut last);
        thread::sleep(poll_interval);
    }
    // One final drain so a verdict published just before shutdown lands.
    deliver(outbox, display, &mut last);
}

fn deliver(outbox: &VerdictOutbox, display: &mut dyn TextDisplay, last: &mut Option<Verdict>) {
    if let Some(verdict) = outbox.take() {
        if *last != Some(verdict) {
            display.set_text(verdict_text(verdict));
            *last = Some(verdict);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct MemoryDisplay {
        texts: Vec<String>,
    }

    impl TextDisplay for MemoryDisplay {
        fn set_text(&mut self, text: &str) {
            self.texts.push(text.to_string());
        }
    }

    #[test]
    fn verdict_text_maps_both_verdicts() {
        assert_eq!(verdict_text(Verdict::Cat), CAT_TEXT);
        assert_eq!(verdict_text(Verdict::NotCat), NOT_CAT_TEXT);
    }

    #[test]
    fn queued_updates_collapse_to_the_last_one() {
        let outbox = VerdictOutbox::new();
        let mut display = MemoryDisplay::default();
        let mut last = None;

        outbox.publish(Verdict::Cat);
        outbox.publish(Verdict::NotCat);
        deliver(&outbox, &mut display, &mut last);

        assert_eq!(display.texts, vec![NOT_CAT_TEXT.to_string()]);
    }

    #[test]
    fn repeated_verdicts_update_once() {
        let outbox = VerdictOutbox::new();
        let mut display = MemoryDisplay::default();
        let mut last = None;

        outbox.publish(Verdict::Cat);
        deliver(&outbox, &mut display, &mut last);
        outbox.publish(Verdict::Cat);
        deliver(&outbox, &mut display, &mut last);
        outbox.publish(Verdict::NotCat);
        deliver(&outbox, &mut display, &mut last);

        assert_eq!(
            display.texts,
            vec![CAT_TEXT.to_string(), NOT_CAT_TEXT.to_string()]
        );
    }

    #[test]
    fn empty_outbox_leaves_display_untouched() {
        let outbox = VerdictOutbox::new();
        let mut display = MemoryDisplay::default();
        let mut last = Some(Verdict::Cat);

        deliver(&outbox, &mut display, &mut last);
        assert!(display.texts.is_empty());
    }
}
