//! Event handlers and dispatching.
//!
//! This module contains the event dispatcher that processes events
//! from the event bus and applies them to the playback controller.

pub mod dispatcher;

pub use dispatcher::{dispatch_events, dispatch_single_event, Flow};
