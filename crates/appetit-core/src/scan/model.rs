//! Snapshot types for a scan session.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a scan session currently stands.
///
/// The three terminal phases are absorbing: once one is reached the session
/// accepts no further updates. The progress phases only ever move forward
/// (`Uploading → Scanning → Summarizing → Done`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanPhase {
    /// The photo is being uploaded; no server event has arrived yet.
    Uploading,
    /// The server reported that analysis has begun.
    Scanning,
    /// The server finished detecting dishes; trailing events may still arrive.
    Summarizing,
    /// The stream ended normally.
    Done,
    /// The transport failed; see [`ScanSnapshot::last_error`].
    Failed,
    /// The consumer abandoned the session.
    Cancelled,
}

impl ScanPhase {
    /// Whether this phase ends the session.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed | Self::Cancelled)
    }

    /// Position in the forward progress ordering, `None` for terminals
    /// reached by failure or cancellation.
    pub(crate) fn progress_rank(&self) -> Option<u8> {
        match self {
            Self::Uploading => Some(0),
            Self::Scanning => Some(1),
            Self::Summarizing => Some(2),
            Self::Done => Some(3),
            Self::Failed | Self::Cancelled => None,
        }
    }
}

impl fmt::Display for ScanPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Uploading => "uploading",
            Self::Scanning => "scanning",
            Self::Summarizing => "summarizing",
            Self::Done => "done",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        };
        write!(f, "{}", label)
    }
}

/// One recognized dish and its estimated serving.
///
/// Items are immutable once appended to a snapshot and keep their arrival
/// order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedItem {
    /// Dish name as reported by the analysis.
    pub label: String,
    /// Free-text serving/quantity estimate ("1 cup", "2").
    pub serving: String,
}

impl DetectedItem {
    pub fn new(label: impl Into<String>, serving: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            serving: serving.into(),
        }
    }
}

/// Read-only view of a scan session, rebuilt on every transition.
///
/// The presentation layer renders directly from this; it never observes a
/// partially applied update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanSnapshot {
    pub phase: ScanPhase,
    /// Detected dishes in arrival order; grows monotonically.
    pub detected_items: Vec<DetectedItem>,
    /// Free-text meal summary; last write wins if sent more than once.
    pub summary_text: Option<String>,
    /// Present only when `phase` is [`ScanPhase::Failed`].
    pub last_error: Option<String>,
}

impl ScanSnapshot {
    /// A fresh session snapshot: uploading, nothing detected yet.
    pub fn new() -> Self {
        Self {
            phase: ScanPhase::Uploading,
            detected_items: Vec::new(),
            summary_text: None,
            last_error: None,
        }
    }
}

impl Default for ScanSnapshot {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_phases() {
        assert!(ScanPhase::Done.is_terminal());
        assert!(ScanPhase::Failed.is_terminal());
        assert!(ScanPhase::Cancelled.is_terminal());
        assert!(!ScanPhase::Uploading.is_terminal());
        assert!(!ScanPhase::Scanning.is_terminal());
        assert!(!ScanPhase::Summarizing.is_terminal());
    }

    #[test]
    fn test_progress_ordering() {
        let order = [
            ScanPhase::Uploading,
            ScanPhase::Scanning,
            ScanPhase::Summarizing,
            ScanPhase::Done,
        ];
        for pair in order.windows(2) {
            assert!(pair[0].progress_rank() < pair[1].progress_rank());
        }
        assert_eq!(ScanPhase::Failed.progress_rank(), None);
        assert_eq!(ScanPhase::Cancelled.progress_rank(), None);
    }

    #[test]
    fn test_fresh_snapshot() {
        let snapshot = ScanSnapshot::new();
        assert_eq!(snapshot.phase, ScanPhase::Uploading);
        assert!(snapshot.detected_items.is_empty());
        assert!(snapshot.summary_text.is_none());
        assert!(snapshot.last_error.is_none());
    }
}
