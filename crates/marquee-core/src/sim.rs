//! Simulated player engine
//!
//! An in-memory [`PlayerEngine`] that records every contract call and lets a
//! harness script the playback position handles report. Backs the CLI's
//! headless demo mode and the lifecycle tests; performs no real decoding or
//! I/O.

use crate::engine::{
    DisplaySurface, EngineOptions, MediaSourceDescriptor, PlayerEngine, PlayerHandle,
};
use crate::{Error, Result};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::trace;

#[derive(Debug, Default)]
struct Playhead {
    window_index: u32,
    position_ms: u64,
    auto_play: bool,
}

#[derive(Debug, Default)]
struct SimShared {
    live_handles: usize,
    total_created: usize,
    fail_creation: bool,
    playhead: Playhead,
    calls: Vec<String>,
}

/// Shared-state simulated engine; clones observe the same instance
#[derive(Clone, Default)]
pub struct SimulatedEngine {
    shared: Arc<Mutex<SimShared>>,
}

impl SimulatedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SimShared> {
        self.shared.lock().expect("simulated engine state poisoned")
    }

    /// Make the next (and all following) creation attempts fail
    pub fn set_fail_creation(&self, fail: bool) {
        self.lock().fail_creation = fail;
    }

    /// Script the playback progress the live handle will report
    pub fn advance_to(&self, window_index: u32, position_ms: u64) {
        let mut shared = self.lock();
        shared.playhead.window_index = window_index;
        shared.playhead.position_ms = position_ms;
    }

    /// Number of handles created and not yet released
    pub fn live_handles(&self) -> usize {
        self.lock().live_handles
    }

    /// Number of handles ever created
    pub fn total_created(&self) -> usize {
        self.lock().total_created
    }

    /// Every contract call recorded so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }
}

impl PlayerEngine for SimulatedEngine {
    fn create(&self, _options: &EngineOptions) -> Result<Box<dyn PlayerHandle>> {
        let mut shared = self.lock();
        if shared.fail_creation {
            return Err(Error::HandleCreation(
                "simulated engine configured to fail".into(),
            ));
        }
        shared.live_handles += 1;
        shared.total_created += 1;
        shared.calls.push("create".into());
        trace!(live = shared.live_handles, "Simulated handle created");

        Ok(Box::new(SimulatedHandle {
            shared: self.shared.clone(),
        }))
    }
}

#[derive(Debug)]
struct SimulatedHandle {
    shared: Arc<Mutex<SimShared>>,
}

impl SimulatedHandle {
    fn lock(&self) -> MutexGuard<'_, SimShared> {
        self.shared.lock().expect("simulated engine state poisoned")
    }
}

impl PlayerHandle for SimulatedHandle {
    fn bind(&mut self, surface: &DisplaySurface) {
        self.lock().calls.push(format!("bind {surface}"));
    }

    fn set_auto_play(&mut self, auto_play: bool) {
        let mut shared = self.lock();
        shared.playhead.auto_play = auto_play;
        shared.calls.push(format!("set_auto_play {auto_play}"));
    }

    fn seek(&mut self, window_index: u32, position_ms: u64) {
        let mut shared = self.lock();
        shared.playhead.window_index = window_index;
        shared.playhead.position_ms = position_ms;
        shared.calls.push(format!("seek {window_index} {position_ms}"));
    }

    fn prepare(
        &mut self,
        source: &MediaSourceDescriptor,
        reset_position: bool,
        reset_state: bool,
    ) -> Result<()> {
        self.lock().calls.push(format!(
            "prepare {} reset_position={reset_position} reset_state={reset_state}",
            source.uri
        ));
        Ok(())
    }

    fn position_ms(&self) -> u64 {
        self.lock().playhead.position_ms
    }

    fn current_window_index(&self) -> u32 {
        self.lock().playhead.window_index
    }

    fn auto_play(&self) -> bool {
        self.lock().playhead.auto_play
    }

    fn release(self: Box<Self>) {
        let mut shared = self.lock();
        shared.live_handles -= 1;
        shared.calls.push("release".into());
        trace!(live = shared.live_handles, "Simulated handle released");
    }
}
