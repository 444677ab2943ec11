//! Application domain model.
//!
//! This module contains pure business logic (no FFI dependencies)
//! including the persisted state definition, scroll bounds, engine
//! configuration and constants.
//!
//! Persistence lives in `storage`.

pub mod app_state;
pub mod bounds;
pub mod config;
pub mod constants;

pub use app_state::{
    EditorState, KeyboardState, PanelState, PlaybackState, RecordingState, RecordingStatus,
    TeleprompterState,
};
pub use bounds::{ContentMeasurer, MonospaceMeasurer, ScrollBounds, TextLayout};
pub use config::{EngineConfig, LayoutProfile, Limits, TickerConfig};
pub use constants::*;
