//! Host lifecycle binding
//!
//! Maps host visibility/activity signals onto session activation and
//! deactivation. Which signal triggers what depends on a single host
//! capability: whether a "fully stopped" notification is guaranteed to
//! follow "lost focus". The two resulting strategies are isolated behind
//! [`LifecyclePolicy`] so the platform quirk can be tested on its own.

use crate::{
    events::SessionEvent,
    session::PlaybackSession,
    types::{HostCapabilities, LifecycleSignal},
    Result,
};
use tracing::{debug, instrument};

/// What the controller should do in response to a signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleAction {
    Activate,
    Deactivate,
    Ignore,
}

/// Strategy mapping host signals to lifecycle actions
///
/// Selected once at controller construction and never swapped mid-session.
pub trait LifecyclePolicy: Send {
    /// Policy name for logs and reports
    fn name(&self) -> &'static str;

    /// Decide the action for a signal. `active` reports whether the session
    /// currently holds a handle, for policies that re-check on later signals.
    fn on_signal(&self, signal: LifecycleSignal, active: bool) -> LifecycleAction;
}

/// Select the policy matching the host's capabilities
pub fn policy_for(capabilities: &HostCapabilities) -> Box<dyn LifecyclePolicy> {
    if capabilities.guarantees_stop {
        Box::new(DeferredReleasePolicy)
    } else {
        Box::new(EagerReleasePolicy)
    }
}

/// Policy A: hosts with no stop guarantee.
///
/// The stop notification may never arrive, so the handle is released at the
/// earliest safe point: the moment focus is lost. Activation waits for full
/// visibility, holding the resource for as short a span as possible.
pub struct EagerReleasePolicy;

impl LifecyclePolicy for EagerReleasePolicy {
    fn name(&self) -> &'static str {
        "eager-release"
    }

    fn on_signal(&self, signal: LifecycleSignal, _active: bool) -> LifecycleAction {
        match signal {
            LifecycleSignal::BecameVisible => LifecycleAction::Activate,
            LifecycleSignal::LostFocus => LifecycleAction::Deactivate,
            LifecycleSignal::BecameStartable | LifecycleSignal::FullyStopped => {
                LifecycleAction::Ignore
            }
        }
    }
}

/// Policy B: hosts that guarantee the stop notification.
///
/// Split-window hosts can run a screen that is visible but not focused, so
/// activation happens already on "startable" and the handle survives losing
/// focus. Release is deferred to "fully stopped", which the host guarantees
/// to deliver. "Became visible" re-activates only when no handle exists,
/// covering hosts that skip the startable signal after a partial teardown.
pub struct DeferredReleasePolicy;

impl LifecyclePolicy for DeferredReleasePolicy {
    fn name(&self) -> &'static str {
        "deferred-release"
    }

    fn on_signal(&self, signal: LifecycleSignal, active: bool) -> LifecycleAction {
        match signal {
            LifecycleSignal::BecameStartable => LifecycleAction::Activate,
            LifecycleSignal::BecameVisible if !active => LifecycleAction::Activate,
            LifecycleSignal::FullyStopped => LifecycleAction::Deactivate,
            LifecycleSignal::BecameVisible | LifecycleSignal::LostFocus => LifecycleAction::Ignore,
        }
    }
}

/// Drives a session from host lifecycle signals through a fixed policy
pub struct LifecycleController {
    session: PlaybackSession,
    policy: Box<dyn LifecyclePolicy>,
}

impl LifecycleController {
    /// Build a controller, selecting the policy for the host's capabilities
    pub fn new(session: PlaybackSession, capabilities: &HostCapabilities) -> Self {
        Self::with_policy(session, policy_for(capabilities))
    }

    /// Build a controller with an explicit policy
    pub fn with_policy(session: PlaybackSession, policy: Box<dyn LifecyclePolicy>) -> Self {
        debug!(session_id = %session.id(), policy = policy.name(), "Lifecycle policy selected");
        Self { session, policy }
    }

    /// Policy name in effect
    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    /// The controlled session
    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    /// Dispatch one host signal through the policy
    #[instrument(skip(self), fields(session_id = %self.session.id(), policy = self.policy.name()))]
    pub fn handle_signal(&mut self, signal: LifecycleSignal) -> Result<()> {
        match self.policy.on_signal(signal, self.session.is_active()) {
            LifecycleAction::Activate => self.session.activate(),
            LifecycleAction::Deactivate => {
                self.session.deactivate();
                Ok(())
            }
            LifecycleAction::Ignore => {
                debug!(signal = %signal, "Signal ignored by policy");
                self.session.record_event(SessionEvent::SignalIgnored { signal });
                Ok(())
            }
        }
    }

    /// Final deactivation before the screen is destroyed.
    ///
    /// Safe to call regardless of state; with either policy this is the
    /// backstop that guarantees the handle is reclaimed exactly once.
    pub fn shutdown(&mut self) {
        self.session.deactivate();
    }

    /// Tear down the controller, returning the session for inspection
    pub fn into_session(mut self) -> PlaybackSession {
        self.session.deactivate();
        self.session
    }
}
