//! Marquee Core - Host-lifecycle playback session library
//!
//! This crate provides the glue between a host environment's lifecycle
//! callbacks and an external player engine:
//! - Exclusive ownership of an opaque player handle
//! - Resume state (position, window, play intent) across teardown cycles
//! - Capability-gated lifecycle binding policies
//! - A simulated engine for headless operation and testing
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                    Marquee Core                      │
//! ├──────────────────────────────────────────────────────┤
//! │                                                      │
//! │  host signals ──► ┌─────────────┐   ┌────────────┐   │
//! │                   │  Lifecycle  │──►│  Playback  │   │
//! │                   │  Controller │   │  Session   │   │
//! │                   └──────┬──────┘   └─────┬──────┘   │
//! │                          │                │          │
//! │                   ┌──────┴──────┐   ┌─────┴──────┐   │
//! │                   │   Policy    │   │   Player   │   │
//! │                   │   (A / B)   │   │   Engine   │   │
//! │                   └─────────────┘   └────────────┘   │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! Everything below the `PlayerEngine` trait (demuxing, decoding, rendering,
//! buffering, track selection) belongs to the engine and is out of scope.

pub mod engine;
pub mod error;
pub mod events;
pub mod lifecycle;
pub mod session;
pub mod sim;
pub mod types;

pub use engine::{
    BufferPolicy, DisplaySurface, EngineOptions, MediaSourceDescriptor, PlayerEngine,
    PlayerHandle, RendererOptions, TrackSelectionPolicy,
};
pub use error::{Error, Result};
pub use events::{EventLog, LoggedEvent, SessionEvent};
pub use lifecycle::{
    policy_for, DeferredReleasePolicy, EagerReleasePolicy, LifecycleAction, LifecycleController,
    LifecyclePolicy,
};
pub use session::PlaybackSession;
pub use sim::SimulatedEngine;
pub use types::{
    HostCapabilities, LifecycleSignal, LifecycleState, ResumeState, SessionConfig, SessionId,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library with default configuration
pub fn init() {
    tracing::info!(version = VERSION, "Marquee Core initialized");
}
