//! Video capture: frame sinks, the ffmpeg bridge and the one-loop recorder.

/// Codec probing/selection and the ffmpeg child-process sink.
pub mod ffmpeg;
/// The one-loop capture state machine.
pub mod recorder;
/// The frame sink contract and in-memory test doubles.
pub mod sink;
