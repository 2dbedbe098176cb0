//! Prebuilt hooks composed from the rehook core.

pub mod keystroke;

pub use keystroke::{use_keystroke, KeystrokeState, SubmitHandler};
