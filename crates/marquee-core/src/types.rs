//! Core types for Marquee

use crate::engine::EngineOptions;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

/// Unique identifier for a playback session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Observable session lifecycle states
///
/// `Active` means the session currently owns a live player handle; `Inactive`
/// means no handle exists. There are no intermediate states: handle creation
/// and release are synchronous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifecycleState {
    /// No player handle held
    Inactive,
    /// Player handle held, media submitted for preparation
    Active,
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LifecycleState::Inactive => write!(f, "inactive"),
            LifecycleState::Active => write!(f, "active"),
        }
    }
}

/// Host visibility/activity transitions delivered to the controller
///
/// These are the four entry points a host environment exposes. Which of them
/// trigger activation or deactivation depends on the selected
/// [`LifecyclePolicy`](crate::lifecycle::LifecyclePolicy).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleSignal {
    /// Screen may start running, possibly without foreground focus
    /// (split-window hosts deliver this while another screen is focused)
    BecameStartable,
    /// Screen is fully visible and focused
    BecameVisible,
    /// Screen lost foreground focus but may still be visible
    LostFocus,
    /// Screen is fully stopped and no longer visible
    FullyStopped,
}

impl std::fmt::Display for LifecycleSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LifecycleSignal::BecameStartable => write!(f, "startable"),
            LifecycleSignal::BecameVisible => write!(f, "visible"),
            LifecycleSignal::LostFocus => write!(f, "focus-lost"),
            LifecycleSignal::FullyStopped => write!(f, "stopped"),
        }
    }
}

impl std::str::FromStr for LifecycleSignal {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "startable" | "start" => Ok(LifecycleSignal::BecameStartable),
            "visible" | "resume" => Ok(LifecycleSignal::BecameVisible),
            "focus-lost" | "pause" => Ok(LifecycleSignal::LostFocus),
            "stopped" | "stop" => Ok(LifecycleSignal::FullyStopped),
            other => Err(Error::InvalidConfig(format!(
                "unknown lifecycle signal '{other}'"
            ))),
        }
    }
}

/// Playback position persisted across handle teardown
///
/// Only written at the moment of deactivation, from values read back off the
/// live handle; never mutated while a handle is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeState {
    /// Play/pause intent
    pub play_when_ready: bool,
    /// Last active window index in the media timeline
    pub window_index: u32,
    /// Last playback offset in milliseconds
    pub position_ms: u64,
}

impl Default for ResumeState {
    fn default() -> Self {
        Self {
            play_when_ready: true,
            window_index: 0,
            position_ms: 0,
        }
    }
}

/// Capabilities of the host environment, fixed for the session's lifetime
///
/// The only capability that matters to lifecycle binding is whether the host
/// guarantees a "fully stopped" notification after "lost focus". Hosts that
/// do not may never deliver it, so the handle has to be released earlier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostCapabilities {
    /// Host guarantees delivery of `FullyStopped` before teardown
    pub guarantees_stop: bool,
}

impl HostCapabilities {
    /// Capabilities for a host platform API level.
    ///
    /// Levels above 23 introduced split-window mode together with a delivery
    /// guarantee for the stop notification.
    pub fn from_api_level(level: u32) -> Self {
        Self {
            guarantees_stop: level > 23,
        }
    }
}

/// Session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Media locator submitted for preparation on every activation
    pub media_uri: Url,
    /// User agent passed to the engine's data source
    pub user_agent: String,
    /// Initial play/pause intent for a fresh session
    pub play_when_ready: bool,
    /// Re-submit media preparation when `activate()` finds a live handle.
    ///
    /// With dual activation signals (startable + visible) a session can be
    /// activated twice in a row; this flag decides whether the second call
    /// re-prepares the already-prepared handle or leaves it alone.
    pub reprepare_on_activate: bool,
    /// Engine construction options, passed through opaquely
    pub engine_options: EngineOptions,
}

impl SessionConfig {
    /// Configuration with defaults for the given media locator
    pub fn new(media_uri: Url) -> Self {
        Self {
            media_uri,
            user_agent: format!("marquee/{}", crate::VERSION),
            play_when_ready: true,
            reprepare_on_activate: true,
            engine_options: EngineOptions::default(),
        }
    }

    /// Parse a media locator string into a configuration
    pub fn from_uri_str(uri: &str) -> Result<Self> {
        let url = Url::parse(uri).map_err(|e| Error::InvalidMediaUri(format!("{uri}: {e}")))?;
        Ok(Self::new(url))
    }

    /// Override the play/pause intent a fresh session starts with
    pub fn with_play_when_ready(mut self, play_when_ready: bool) -> Self {
        self.play_when_ready = play_when_ready;
        self
    }

    /// Override re-preparation behavior for redundant activations
    pub fn with_reprepare_on_activate(mut self, reprepare: bool) -> Self {
        self.reprepare_on_activate = reprepare;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_resume_state_defaults() {
        let resume = ResumeState::default();
        assert!(resume.play_when_ready);
        assert_eq!(resume.window_index, 0);
        assert_eq!(resume.position_ms, 0);
    }

    #[test]
    fn test_capabilities_from_api_level() {
        assert!(!HostCapabilities::from_api_level(23).guarantees_stop);
        assert!(HostCapabilities::from_api_level(24).guarantees_stop);
        assert!(HostCapabilities::from_api_level(34).guarantees_stop);
    }

    #[test]
    fn test_signal_parsing() {
        assert_eq!(
            LifecycleSignal::from_str("visible").unwrap(),
            LifecycleSignal::BecameVisible
        );
        assert_eq!(
            LifecycleSignal::from_str("pause").unwrap(),
            LifecycleSignal::LostFocus
        );
        assert_eq!(
            LifecycleSignal::from_str("STOPPED").unwrap(),
            LifecycleSignal::FullyStopped
        );
        assert!(LifecycleSignal::from_str("hibernate").is_err());
    }

    #[test]
    fn test_signal_display_round_trip() {
        for signal in [
            LifecycleSignal::BecameStartable,
            LifecycleSignal::BecameVisible,
            LifecycleSignal::LostFocus,
            LifecycleSignal::FullyStopped,
        ] {
            assert_eq!(
                LifecycleSignal::from_str(&signal.to_string()).unwrap(),
                signal
            );
        }
    }

    #[test]
    fn test_config_from_uri_str() {
        let config = SessionConfig::from_uri_str("https://example.com/audio.mp3").unwrap();
        assert!(config.play_when_ready);
        assert!(config.reprepare_on_activate);
        assert_eq!(config.media_uri.path(), "/audio.mp3");

        assert!(SessionConfig::from_uri_str("not a uri").is_err());
    }
}
