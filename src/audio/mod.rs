// src/audio/mod.rs
pub mod signal;
pub mod source;
pub mod track;
pub use signal::Signal;
pub use source::{AudioDecoder, DecodedAudio, ManualDecoder};
pub use track::Track;
