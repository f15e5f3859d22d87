//! The external player-engine contract
//!
//! Everything substantive about playback (demuxing, decoding, rendering,
//! buffering, track selection) lives behind these traits. Marquee only
//! sequences calls to them; it never reimplements any of it.

use crate::Result;
use serde::{Deserialize, Serialize};
use url::Url;

/// Renderer construction options
///
/// Selects which timestamp-synchronized renderers the engine instantiates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RendererOptions {
    pub video: bool,
    pub audio: bool,
    pub text: bool,
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            video: true,
            audio: true,
            text: true,
        }
    }
}

/// Track selection constraints passed through to the engine
///
/// The selection logic itself is the engine's; these are only hints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackSelectionPolicy {
    /// Preferred audio/text language (BCP-47)
    pub preferred_language: Option<String>,
    /// Bitrate cap in bps (None = unconstrained)
    pub max_bitrate: Option<u64>,
}

/// Buffering thresholds passed through to the engine's load control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferPolicy {
    /// Minimum buffered media before playback starts, in milliseconds
    pub min_buffer_ms: u64,
    /// Maximum media the engine will buffer ahead, in milliseconds
    pub max_buffer_ms: u64,
}

impl Default for BufferPolicy {
    fn default() -> Self {
        Self {
            min_buffer_ms: 15_000,
            max_buffer_ms: 50_000,
        }
    }
}

/// Options handed to [`PlayerEngine::create`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineOptions {
    pub renderers: RendererOptions,
    pub track_selection: TrackSelectionPolicy,
    pub buffering: BufferPolicy,
}

/// Describes how the engine should read a media locator
///
/// Opaque to the session beyond construction: the engine decides how to
/// demux whatever the locator points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaSourceDescriptor {
    pub uri: Url,
    pub user_agent: String,
}

impl MediaSourceDescriptor {
    pub fn new(uri: Url, user_agent: impl Into<String>) -> Self {
        Self {
            uri,
            user_agent: user_agent.into(),
        }
    }
}

/// Opaque identifier of the output surface a handle renders into
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DisplaySurface {
    id: String,
}

impl DisplaySurface {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl std::fmt::Display for DisplaySurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "surface:{}", self.id)
    }
}

/// Factory for player handles
///
/// A creation failure is fatal for the session; there is no retry.
pub trait PlayerEngine: Send {
    fn create(&self, options: &EngineOptions) -> Result<Box<dyn PlayerHandle>>;
}

/// A live, exclusively-owned player instance
///
/// The session holds at most one of these at a time and consumes it on
/// release, so a released handle cannot be touched again.
pub trait PlayerHandle: Send + std::fmt::Debug {
    /// Bind the handle's output to a display surface
    fn bind(&mut self, surface: &DisplaySurface);

    /// Set whether playback starts as soon as media is ready
    fn set_auto_play(&mut self, auto_play: bool);

    /// Seek to a window index and offset within it
    fn seek(&mut self, window_index: u32, position_ms: u64);

    /// Submit a media source for preparation
    fn prepare(
        &mut self,
        source: &MediaSourceDescriptor,
        reset_position: bool,
        reset_state: bool,
    ) -> Result<()>;

    /// Current playback offset in milliseconds
    fn position_ms(&self) -> u64;

    /// Currently selected window index
    fn current_window_index(&self) -> u32;

    /// Current auto-play intent
    fn auto_play(&self) -> bool;

    /// Release the underlying engine resources, consuming the handle
    fn release(self: Box<Self>);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_policy_defaults() {
        let policy = BufferPolicy::default();
        assert_eq!(policy.min_buffer_ms, 15_000);
        assert_eq!(policy.max_buffer_ms, 50_000);
    }

    #[test]
    fn test_renderer_defaults_enable_all() {
        let renderers = RendererOptions::default();
        assert!(renderers.video && renderers.audio && renderers.text);
    }

    #[test]
    fn test_media_source_descriptor() {
        let uri = Url::parse("https://example.com/stream.mp3").unwrap();
        let source = MediaSourceDescriptor::new(uri.clone(), "marquee-test");
        assert_eq!(source.uri, uri);
        assert_eq!(source.user_agent, "marquee-test");
    }
}
