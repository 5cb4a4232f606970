//! Interactive session layer for FractalVis: viewport state, pointer
//! gestures and saved preferences. The windowing toolkit sits on top and
//! forwards its events to a [`ViewportController`].

pub mod app_dir;
pub mod controller;
pub mod preferences;

pub use controller::{MouseButton, Outcome, ViewportController};
pub use preferences::{AppPreferences, PreferencesError};
