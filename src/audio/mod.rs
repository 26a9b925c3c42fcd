//! Verse audio sequencing.

pub mod sequencer;

pub use sequencer::{AudioSequencer, PlaybackItem, PlaybackStatus};
