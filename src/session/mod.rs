//! Embedding surface: the [`Player`](player::Player) ties the renderer, the
//! shared settings and the recorder into one host-driven object.

/// The host-driven playback and capture session.
pub mod player;
