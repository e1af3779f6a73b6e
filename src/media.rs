//! Viewport gating for the render loop and the background video.
//!
//! Both are driven by the same intersection signal. The controllers are
//! pure state machines: they return what the host should do, and the host
//! reports back how its media element responded.

/// Browsers may report a crossing ratio just under the observer threshold.
const RATIO_SLACK: f32 = 0.01;

/// Tracks whether the hosting element is on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityGate {
    threshold: f32,
    visible: Option<bool>,
}

impl Default for VisibilityGate {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl VisibilityGate {
    /// A gate that opens once `threshold` of the element is in view.
    /// Starts unknown: the first observation is always reported.
    #[must_use]
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            visible: None,
        }
    }

    /// Feed one intersection observation. Returns the new state on the
    /// first observation and whenever it changes.
    pub fn observe(&mut self, intersecting: bool, ratio: f32) -> Option<bool> {
        let visible = intersecting && ratio + RATIO_SLACK >= self.threshold;
        if self.visible == Some(visible) {
            return None;
        }
        self.visible = Some(visible);
        Some(visible)
    }

    /// Current state. Unobserved counts as hidden.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible.unwrap_or(false)
    }
}

/// What the host should do with its media element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaCommand {
    /// Call `play()` and report the outcome.
    Play,
    /// Call `pause()`.
    Pause,
}

/// Playback as last known to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// Never asked to play.
    Idle,
    /// A play attempt is awaiting its outcome.
    Pending,
    /// Playing.
    Playing,
    /// The last attempt was rejected (e.g. autoplay policy).
    Rejected,
    /// Paused because the element left the viewport.
    Paused,
}

/// Autoplay policy for the background video.
///
/// Plays on entering the viewport and pauses on leaving it. A rejected
/// play attempt is recorded and dropped; the next attempt happens only on
/// the next entry into the viewport, never on a timer.
#[derive(Debug, Clone)]
pub struct AutoplayController {
    state: PlaybackState,
    in_view: bool,
    attempts: u32,
    rejections: u32,
    last_rejection: Option<String>,
}

impl Default for AutoplayController {
    fn default() -> Self {
        Self::new()
    }
}

impl AutoplayController {
    /// Controller for an element that starts off screen.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: PlaybackState::Idle,
            in_view: false,
            attempts: 0,
            rejections: 0,
            last_rejection: None,
        }
    }

    /// React to the element entering or leaving the viewport.
    #[must_use]
    pub fn on_visibility(&mut self, visible: bool) -> Option<MediaCommand> {
        let was_in_view = std::mem::replace(&mut self.in_view, visible);
        match (was_in_view, visible) {
            (false, true) => {
                if self.state == PlaybackState::Playing {
                    return None;
                }
                self.attempts += 1;
                self.state = PlaybackState::Pending;
                Some(MediaCommand::Play)
            }
            (true, false) => match self.state {
                PlaybackState::Playing | PlaybackState::Pending => {
                    self.state = PlaybackState::Paused;
                    Some(MediaCommand::Pause)
                }
                _ => None,
            },
            _ => None,
        }
    }

    /// The host's play call succeeded.
    #[must_use]
    pub fn play_resolved(&mut self) -> Option<MediaCommand> {
        match self.state {
            PlaybackState::Pending => {
                self.state = PlaybackState::Playing;
                None
            }
            // Left the viewport before the promise settled
            PlaybackState::Paused => Some(MediaCommand::Pause),
            _ => None,
        }
    }

    /// The host's play call was rejected. Recorded, not retried.
    pub fn play_rejected(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        log::debug!("autoplay rejected: {reason}");
        self.rejections += 1;
        self.last_rejection = Some(reason);
        if self.state == PlaybackState::Pending {
            self.state = PlaybackState::Rejected;
        }
    }

    /// Last known playback state.
    #[must_use]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Play attempts issued so far.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Rejected attempts so far.
    #[must_use]
    pub fn rejections(&self) -> u32 {
        self.rejections
    }

    /// Reason given for the most recent rejection.
    #[must_use]
    pub fn last_rejection(&self) -> Option<&str> {
        self.last_rejection.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_reports_only_changes() {
        let mut gate = VisibilityGate::new(0.25);
        assert_eq!(gate.observe(true, 0.1), Some(false));
        assert_eq!(gate.observe(true, 0.1), None);
        assert_eq!(gate.observe(true, 0.5), Some(true));
        assert_eq!(gate.observe(true, 0.9), None);
        assert_eq!(gate.observe(false, 0.0), Some(false));
        assert!(!gate.is_visible());
    }

    #[test]
    fn first_offscreen_observation_reports_hidden() {
        let mut gate = VisibilityGate::new(0.1);
        assert!(!gate.is_visible());
        assert_eq!(gate.observe(false, 0.0), Some(false));
        assert_eq!(gate.observe(false, 0.0), None);
    }

    #[test]
    fn crossing_just_under_threshold_opens_the_gate() {
        let mut gate = VisibilityGate::new(0.1);
        assert_eq!(gate.observe(true, 0.095), Some(true));
        assert!(gate.is_visible());
        assert_eq!(gate.observe(true, 0.05), Some(false));
    }

    #[test]
    fn entering_view_plays_and_leaving_pauses() {
        let mut video = AutoplayController::new();
        assert_eq!(video.on_visibility(true), Some(MediaCommand::Play));
        assert_eq!(video.play_resolved(), None);
        assert_eq!(video.state(), PlaybackState::Playing);
        assert_eq!(video.on_visibility(false), Some(MediaCommand::Pause));
        assert_eq!(video.state(), PlaybackState::Paused);
    }

    #[test]
    fn rejection_waits_for_reintersection() {
        let mut video = AutoplayController::new();
        assert_eq!(video.on_visibility(true), Some(MediaCommand::Play));
        video.play_rejected("NotAllowedError");
        assert_eq!(video.state(), PlaybackState::Rejected);
        assert_eq!(video.last_rejection(), Some("NotAllowedError"));

        // Staying in view never retries
        assert_eq!(video.on_visibility(true), None);
        assert_eq!(video.attempts(), 1);

        assert_eq!(video.on_visibility(false), None);
        assert_eq!(video.on_visibility(true), Some(MediaCommand::Play));
        assert_eq!(video.attempts(), 2);
        assert_eq!(video.rejections(), 1);
    }

    #[test]
    fn late_resolution_after_leaving_view_pauses() {
        let mut video = AutoplayController::new();
        let _ = video.on_visibility(true);
        assert_eq!(video.on_visibility(false), Some(MediaCommand::Pause));
        assert_eq!(video.play_resolved(), Some(MediaCommand::Pause));
        assert_eq!(video.state(), PlaybackState::Paused);
    }
}
