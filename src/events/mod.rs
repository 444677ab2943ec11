//! Event system for decoupled inter-module communication.
//!
//! This module provides a simple publish/subscribe mechanism using Rust's
//! standard library `mpsc` channels. The tick thread, hotkey handlers and
//! IPC all publish here; only the thread that owns the controller drains,
//! so the state has a single writer and needs no locks.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ Tick thread │     │ Hotkeys/IPC │     │  Recording  │
//! │             │     │             │     │  pipeline   │
//! └──────┬──────┘     └──────┬──────┘     └──────┬──────┘
//!        │                   │                   │
//!        │ publish()         │ publish()         │ publish()
//!        ▼                   ▼                   ▼
//! ┌─────────────────────────────────────────────────────┐
//! │                     EventBus                        │
//! │                   (mpsc channel)                    │
//! └─────────────────────────┬───────────────────────────┘
//!                           │ drain()
//!                           ▼
//! ┌─────────────────────────────────────────────────────┐
//! │             Dispatcher → PlaybackController          │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Module Structure
//!
//! - [`types`]: Event definitions (`AppEvent` enum)
//! - [`bus`]: `EventBus` and `EventPublisher` types

pub mod bus;
pub mod types;

// Re-export main types for convenient access
pub use bus::{EventBus, EventPublisher};
pub use types::AppEvent;
