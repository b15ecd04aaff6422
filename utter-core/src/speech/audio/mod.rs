//! Audio decode, playback, and export.

pub mod decode;
pub mod playback;
pub mod wav;

pub use playback::SessionController;
