//! Meal photo scan state machine.
//!
//! A scan session uploads one photo and then consumes a stream of pushed
//! analysis events. This module holds the network-free half of that
//! feature: the typed event set with its decoder, the immutable snapshot
//! the presentation layer renders from, and the single pure transition
//! function that folds one update into the next snapshot.
//!
//! The transport half (the multipart upload, the SSE stream, the consumer
//! task, cancellation plumbing) lives in `appetit-client`.

pub mod event;
pub mod machine;
pub mod model;

pub use event::{DecodeError, ScanEvent};
pub use machine::ScanUpdate;
pub use model::{DetectedItem, ScanPhase, ScanSnapshot};
