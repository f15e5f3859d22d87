//! Playback session - ownership of the player handle
//!
//! Coordinates:
//! - Lazy handle creation on activation
//! - Resume-state capture and restore across teardown
//! - Media source submission
//! - State change broadcasting

use crate::{
    engine::{MediaSourceDescriptor, PlayerEngine, PlayerHandle, DisplaySurface},
    events::{EventLog, LoggedEvent, SessionEvent},
    types::{LifecycleState, ResumeState, SessionConfig, SessionId},
    Result,
};
use tokio::sync::watch;
use tracing::{debug, info};

/// Handle ownership, tagged by lifecycle state
///
/// A handle exists exactly when the session is active; there is no state in
/// which a released handle can still be reached.
enum SessionState {
    Inactive,
    Active(Box<dyn PlayerHandle>),
}

/// A playback session bound to one screen instance
///
/// Created once per screen; the player handle inside it is created and
/// destroyed repeatedly as the screen moves between foreground and
/// background. Resume state survives those cycles.
pub struct PlaybackSession {
    /// Unique session ID
    id: SessionId,
    /// Session configuration
    config: SessionConfig,
    /// Engine the handle is created from
    engine: Box<dyn PlayerEngine>,
    /// Surface each new handle is bound to
    surface: DisplaySurface,
    /// Current handle ownership
    state: SessionState,
    /// Position/intent persisted across teardown
    resume: ResumeState,
    /// State change broadcaster
    state_tx: watch::Sender<LifecycleState>,
    /// Lifecycle event recorder
    events: EventLog,
}

impl PlaybackSession {
    /// Create a new, inactive session
    pub fn new(
        config: SessionConfig,
        engine: Box<dyn PlayerEngine>,
        surface: DisplaySurface,
    ) -> Self {
        let (state_tx, _) = watch::channel(LifecycleState::Inactive);
        let resume = ResumeState {
            play_when_ready: config.play_when_ready,
            ..ResumeState::default()
        };

        Self {
            id: SessionId::new(),
            config,
            engine,
            surface,
            state: SessionState::Inactive,
            resume,
            state_tx,
            events: EventLog::default(),
        }
    }

    /// Get session ID
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Get current lifecycle state
    pub fn state(&self) -> LifecycleState {
        match self.state {
            SessionState::Inactive => LifecycleState::Inactive,
            SessionState::Active(_) => LifecycleState::Active,
        }
    }

    /// True while a player handle is held
    pub fn is_active(&self) -> bool {
        matches!(self.state, SessionState::Active(_))
    }

    /// Resume state as of the last deactivation
    pub fn resume_state(&self) -> ResumeState {
        self.resume
    }

    /// Session configuration
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Subscribe to lifecycle state changes
    pub fn subscribe_state(&self) -> watch::Receiver<LifecycleState> {
        self.state_tx.subscribe()
    }

    /// Recorded lifecycle events, oldest first
    pub fn events(&self) -> impl Iterator<Item = &LoggedEvent> {
        self.events.events()
    }

    pub(crate) fn record_event(&mut self, event: SessionEvent) {
        self.events.record(event);
    }

    /// Acquire the player resource and submit media for preparation.
    ///
    /// Creates a handle if none exists, binds it to the surface, restores
    /// the persisted play intent and seeks to the resume point. A second
    /// call on an already-active session never creates another handle;
    /// whether it re-submits preparation is governed by
    /// `SessionConfig::reprepare_on_activate`.
    pub fn activate(&mut self) -> Result<()> {
        let created = if self.is_active() {
            debug!(session_id = %self.id, "Activate on active session, handle reused");
            self.events.record(SessionEvent::RedundantCall {
                operation: "activate".into(),
            });
            false
        } else {
            let mut handle = self.engine.create(&self.config.engine_options)?;
            handle.bind(&self.surface);
            handle.set_auto_play(self.resume.play_when_ready);
            handle.seek(self.resume.window_index, self.resume.position_ms);

            info!(
                session_id = %self.id,
                window = self.resume.window_index,
                position_ms = self.resume.position_ms,
                auto_play = self.resume.play_when_ready,
                "Player handle created"
            );
            self.events.record(SessionEvent::HandleCreated {
                window_index: self.resume.window_index,
                position_ms: self.resume.position_ms,
                auto_play: self.resume.play_when_ready,
            });

            self.state = SessionState::Active(handle);
            let _ = self.state_tx.send(LifecycleState::Active);
            true
        };

        if created || self.config.reprepare_on_activate {
            let source =
                MediaSourceDescriptor::new(self.config.media_uri.clone(), &self.config.user_agent);
            if let SessionState::Active(handle) = &mut self.state {
                // reset_position=false, reset_state=false: preparation must
                // not clobber the seek target applied above
                handle.prepare(&source, false, false)?;
                debug!(session_id = %self.id, uri = %source.uri, "Media source submitted");
                self.events.record(SessionEvent::Prepared {
                    uri: source.uri.to_string(),
                });
            }
        }

        Ok(())
    }

    /// Release the player resource, capturing resume state first.
    ///
    /// Safe no-op when no handle is held.
    pub fn deactivate(&mut self) {
        match std::mem::replace(&mut self.state, SessionState::Inactive) {
            SessionState::Active(handle) => {
                self.resume = ResumeState {
                    position_ms: handle.position_ms(),
                    window_index: handle.current_window_index(),
                    play_when_ready: handle.auto_play(),
                };
                handle.release();

                info!(
                    session_id = %self.id,
                    window = self.resume.window_index,
                    position_ms = self.resume.position_ms,
                    auto_play = self.resume.play_when_ready,
                    "Player handle released"
                );
                self.events.record(SessionEvent::Deactivated {
                    resume: self.resume,
                });
                let _ = self.state_tx.send(LifecycleState::Inactive);
            }
            SessionState::Inactive => {
                debug!(session_id = %self.id, "Deactivate on inactive session");
                self.events.record(SessionEvent::RedundantCall {
                    operation: "deactivate".into(),
                });
            }
        }
    }
}

impl std::fmt::Debug for PlaybackSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackSession")
            .field("id", &self.id)
            .field("state", &self.state())
            .field("resume", &self.resume)
            .field("media_uri", &self.config.media_uri.as_str())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimulatedEngine;
    use crate::types::SessionConfig;

    fn test_session(engine: &SimulatedEngine) -> PlaybackSession {
        let config = SessionConfig::from_uri_str("https://example.com/audio.mp3").unwrap();
        PlaybackSession::new(config, Box::new(engine.clone()), DisplaySurface::new("main"))
    }

    #[test]
    fn test_session_starts_inactive() {
        let engine = SimulatedEngine::new();
        let session = test_session(&engine);

        assert_eq!(session.state(), LifecycleState::Inactive);
        assert!(!session.is_active());
        assert_eq!(session.resume_state(), ResumeState::default());
    }

    #[test]
    fn test_activate_creates_configures_and_prepares() {
        let engine = SimulatedEngine::new();
        let mut session = test_session(&engine);

        session.activate().unwrap();

        assert!(session.is_active());
        assert_eq!(engine.live_handles(), 1);
        let calls = engine.calls();
        assert_eq!(
            calls,
            vec![
                "create",
                "bind surface:main",
                "set_auto_play true",
                "seek 0 0",
                "prepare https://example.com/audio.mp3 reset_position=false reset_state=false",
            ]
        );
    }

    #[test]
    fn test_deactivate_captures_resume_and_releases() {
        let engine = SimulatedEngine::new();
        let mut session = test_session(&engine);

        session.activate().unwrap();
        engine.advance_to(0, 5000);
        session.deactivate();

        assert!(!session.is_active());
        assert_eq!(engine.live_handles(), 0);
        assert_eq!(
            session.resume_state(),
            ResumeState {
                play_when_ready: true,
                window_index: 0,
                position_ms: 5000,
            }
        );
    }

    #[test]
    fn test_state_broadcast() {
        let engine = SimulatedEngine::new();
        let mut session = test_session(&engine);
        let rx = session.subscribe_state();

        assert_eq!(*rx.borrow(), LifecycleState::Inactive);
        session.activate().unwrap();
        assert_eq!(*rx.borrow(), LifecycleState::Active);
        session.deactivate();
        assert_eq!(*rx.borrow(), LifecycleState::Inactive);
    }

    #[test]
    fn test_initial_play_intent_from_config() {
        let engine = SimulatedEngine::new();
        let config = SessionConfig::from_uri_str("https://example.com/audio.mp3")
            .unwrap()
            .with_play_when_ready(false);
        let mut session =
            PlaybackSession::new(config, Box::new(engine.clone()), DisplaySurface::new("main"));

        session.activate().unwrap();
        assert!(engine.calls().contains(&"set_auto_play false".to_string()));
    }

    #[test]
    fn test_fatal_creation_failure() {
        let engine = SimulatedEngine::new();
        engine.set_fail_creation(true);
        let mut session = test_session(&engine);

        let err = session.activate().unwrap_err();
        assert!(err.is_fatal());
        assert!(!session.is_active());
        assert_eq!(engine.live_handles(), 0);
    }
}
