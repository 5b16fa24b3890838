//! Records and recorders for training progress.
//!
//! A [`Record`] is a map from names to values, produced by the training loop
//! at its reporting cadence. A [`Recorder`] writes records to an output
//! destination; I/O failures inside a recorder are logged and never interrupt
//! training.
mod base;
mod null_recorder;
mod text_recorder;
pub use base::{Record, RecordValue};
pub use null_recorder::NullRecorder;
pub use text_recorder::TextRecorder;

/// Writes a record to an output destination.
pub trait Recorder {
    /// Writes a record.
    fn write(&mut self, record: Record);
}
