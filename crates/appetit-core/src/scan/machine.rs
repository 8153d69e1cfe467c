//! The scan state machine.
//!
//! All session state lives in [`ScanSnapshot`]; the only way it changes is
//! [`ScanSnapshot::apply`], which folds one [`ScanUpdate`] into a fresh
//! snapshot. The function is pure, so every protocol rule here is testable
//! without a network.

use super::event::ScanEvent;
use super::model::{ScanPhase, ScanSnapshot};
use tracing::{debug, warn};

/// An input consumed by the scan state machine.
///
/// Decoded server events and the three channel-level signals (end of
/// stream, transport error, consumer cancellation) go through the same
/// transition function so the terminal-phase rules apply uniformly.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanUpdate {
    /// A decoded push message.
    Event(ScanEvent),
    /// The push stream ended normally.
    StreamEnd,
    /// The transport failed with the given description.
    StreamError(String),
    /// The consumer asked to abandon the session.
    Cancel,
}

impl ScanSnapshot {
    /// Folds one update into the next snapshot.
    ///
    /// Rules:
    /// - A terminal snapshot absorbs everything; updates after `Done`,
    ///   `Failed`, or `Cancelled` return the snapshot unchanged.
    /// - `start`/`stop` only move the phase forward; an event implying a
    ///   phase regression is a protocol anomaly and is dropped.
    /// - Items and summary text are content, not phase markers: they are
    ///   accepted in every non-terminal phase, even before `start` or
    ///   after `stop`. Items append in arrival order; a repeated summary
    ///   overwrites the previous one.
    pub fn apply(&self, update: &ScanUpdate) -> ScanSnapshot {
        if self.phase.is_terminal() {
            debug!(phase = %self.phase, ?update, "update after terminal phase discarded");
            return self.clone();
        }

        let mut next = self.clone();
        match update {
            ScanUpdate::Event(ScanEvent::Start) => {
                if !advance(&mut next, ScanPhase::Scanning) {
                    warn!(phase = %self.phase, "out-of-order start event discarded");
                }
            }
            ScanUpdate::Event(ScanEvent::Stop) => {
                if !advance(&mut next, ScanPhase::Summarizing) {
                    warn!(phase = %self.phase, "out-of-order stop event discarded");
                }
            }
            ScanUpdate::Event(ScanEvent::Summary(text)) => {
                next.summary_text = Some(text.clone());
            }
            ScanUpdate::Event(ScanEvent::Item(item)) => {
                next.detected_items.push(item.clone());
            }
            ScanUpdate::StreamEnd => {
                next.phase = ScanPhase::Done;
            }
            ScanUpdate::StreamError(message) => {
                next.phase = ScanPhase::Failed;
                next.last_error = Some(message.clone());
            }
            ScanUpdate::Cancel => {
                next.phase = ScanPhase::Cancelled;
            }
        }
        next
    }
}

/// Moves the phase to `target` if that is a forward step; returns whether
/// the snapshot changed.
fn advance(snapshot: &mut ScanSnapshot, target: ScanPhase) -> bool {
    match (snapshot.phase.progress_rank(), target.progress_rank()) {
        (Some(current), Some(next)) if current < next => {
            snapshot.phase = target;
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::model::DetectedItem;

    fn run(updates: &[ScanUpdate]) -> ScanSnapshot {
        updates
            .iter()
            .fold(ScanSnapshot::new(), |snapshot, update| snapshot.apply(update))
    }

    fn item(label: &str, serving: &str) -> ScanUpdate {
        ScanUpdate::Event(ScanEvent::Item(DetectedItem::new(label, serving)))
    }

    fn summary(text: &str) -> ScanUpdate {
        ScanUpdate::Event(ScanEvent::Summary(text.to_string()))
    }

    #[test]
    fn test_canonical_sequence() {
        let last = run(&[
            ScanUpdate::Event(ScanEvent::Start),
            item("Blueberry pancakes", "1 cup"),
            item("Clam Chowder", "1 bowl"),
            summary("Balanced breakfast"),
            ScanUpdate::Event(ScanEvent::Stop),
            ScanUpdate::StreamEnd,
        ]);

        assert_eq!(last.phase, ScanPhase::Done);
        assert_eq!(
            last.detected_items,
            vec![
                DetectedItem::new("Blueberry pancakes", "1 cup"),
                DetectedItem::new("Clam Chowder", "1 bowl"),
            ]
        );
        assert_eq!(last.summary_text.as_deref(), Some("Balanced breakfast"));
        assert!(last.last_error.is_none());
    }

    #[test]
    fn test_apply_is_pure() {
        let before = ScanSnapshot::new();
        let after = before.apply(&ScanUpdate::Event(ScanEvent::Start));
        assert_eq!(before.phase, ScanPhase::Uploading);
        assert_eq!(after.phase, ScanPhase::Scanning);
    }

    #[test]
    fn test_content_accepted_before_start_and_after_stop() {
        let last = run(&[
            item("Hash Browns", "1 serving"),
            ScanUpdate::Event(ScanEvent::Start),
            ScanUpdate::Event(ScanEvent::Stop),
            // The server still owns the data after the stop marker.
            summary("Trailing summary"),
            item("Orange Juice", "1 glass"),
        ]);

        assert_eq!(last.phase, ScanPhase::Summarizing);
        assert_eq!(last.detected_items.len(), 2);
        assert_eq!(last.summary_text.as_deref(), Some("Trailing summary"));
    }

    #[test]
    fn test_duplicate_summary_last_write_wins() {
        let last = run(&[
            ScanUpdate::Event(ScanEvent::Start),
            summary("first"),
            summary("second"),
        ]);
        assert_eq!(last.summary_text.as_deref(), Some("second"));
    }

    #[test]
    fn test_phase_never_regresses() {
        let last = run(&[
            ScanUpdate::Event(ScanEvent::Start),
            ScanUpdate::Event(ScanEvent::Stop),
            // Regression attempt: the phase must stay at Summarizing.
            ScanUpdate::Event(ScanEvent::Start),
        ]);
        assert_eq!(last.phase, ScanPhase::Summarizing);
    }

    #[test]
    fn test_duplicate_start_is_dropped() {
        let once = run(&[ScanUpdate::Event(ScanEvent::Start)]);
        let twice = once.apply(&ScanUpdate::Event(ScanEvent::Start));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_stream_end_from_any_progress_phase() {
        for prefix in [
            vec![],
            vec![ScanUpdate::Event(ScanEvent::Start)],
            vec![
                ScanUpdate::Event(ScanEvent::Start),
                ScanUpdate::Event(ScanEvent::Stop),
            ],
        ] {
            let mut updates = prefix;
            updates.push(ScanUpdate::StreamEnd);
            assert_eq!(run(&updates).phase, ScanPhase::Done);
        }
    }

    #[test]
    fn test_transport_error_keeps_collected_items() {
        let last = run(&[
            ScanUpdate::Event(ScanEvent::Start),
            item("Clam Chowder", "1 bowl"),
            ScanUpdate::StreamError("reset".to_string()),
        ]);

        assert_eq!(last.phase, ScanPhase::Failed);
        assert_eq!(last.last_error.as_deref(), Some("reset"));
        assert_eq!(last.detected_items.len(), 1);
    }

    #[test]
    fn test_terminal_phases_absorb_everything() {
        let done = run(&[ScanUpdate::StreamEnd]);
        for update in [
            ScanUpdate::Event(ScanEvent::Start),
            item("Late Dish", "1"),
            summary("late"),
            ScanUpdate::StreamError("late error".to_string()),
            ScanUpdate::Cancel,
        ] {
            assert_eq!(done.apply(&update), done);
        }
    }

    #[test]
    fn test_cancel_then_late_item_is_not_applied() {
        let cancelled = run(&[ScanUpdate::Event(ScanEvent::Start), ScanUpdate::Cancel]);
        assert_eq!(cancelled.phase, ScanPhase::Cancelled);
        assert!(cancelled.last_error.is_none());

        let after_race = cancelled.apply(&item("Raced Dish", "1"));
        assert_eq!(after_race, cancelled);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let once = run(&[ScanUpdate::Cancel]);
        let twice = once.apply(&ScanUpdate::Cancel);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_item_count_matches_item_events() {
        let updates = [
            item("a", "1"),
            ScanUpdate::Event(ScanEvent::Start),
            item("b", "2"),
            summary("s"),
            item("c", "3"),
            ScanUpdate::Event(ScanEvent::Stop),
            item("d", "4"),
        ];

        let mut snapshot = ScanSnapshot::new();
        let mut expected = 0;
        for update in &updates {
            let previous = snapshot.detected_items.len();
            snapshot = snapshot.apply(update);
            if matches!(update, ScanUpdate::Event(ScanEvent::Item(_))) {
                expected += 1;
            }
            assert!(snapshot.detected_items.len() >= previous);
            assert_eq!(snapshot.detected_items.len(), expected);
        }
    }
}
