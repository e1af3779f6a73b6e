//! Tweens owned by one mounted visual.
//!
//! A scope is created on mount and killed on unmount. Killing snaps every
//! tween to its end value, so nothing keeps animating after teardown and
//! late readers still see a settled value.

use super::easing::EasingFunction;

/// Handle to a tween inside an [`AnimationScope`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TweenId(usize);

#[derive(Debug, Clone, Copy, PartialEq)]
struct Tween {
    from: f32,
    to: f32,
    start: f32,
    duration: f32,
    easing: EasingFunction,
    killed: bool,
}

impl Tween {
    fn progress(&self, now: f32) -> f32 {
        if self.killed || self.duration <= 0.0 {
            return 1.0;
        }
        ((now - self.start) / self.duration).clamp(0.0, 1.0)
    }

    fn value(&self, now: f32) -> f32 {
        let t = self.easing.evaluate(self.progress(now));
        self.from + (self.to - self.from) * t
    }
}

/// Scoped tween context. Times are seconds on the caller's clock.
#[derive(Debug, Default)]
pub struct AnimationScope {
    tweens: Vec<Tween>,
    killed: bool,
}

impl AnimationScope {
    /// An empty, live scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a tween from `from` to `to` beginning at `start`.
    ///
    /// Tweens added after [`kill_all`](Self::kill_all) are born finished.
    pub fn tween(
        &mut self,
        from: f32,
        to: f32,
        start: f32,
        duration: f32,
        easing: EasingFunction,
    ) -> TweenId {
        self.tweens.push(Tween {
            from,
            to,
            start,
            duration,
            easing,
            killed: self.killed,
        });
        TweenId(self.tweens.len() - 1)
    }

    /// Current value of a tween, or `None` for a handle from another scope.
    #[must_use]
    pub fn value(&self, id: TweenId, now: f32) -> Option<f32> {
        self.tweens.get(id.0).map(|tween| tween.value(now))
    }

    /// Whether a tween is still moving at `now`.
    #[must_use]
    pub fn is_running(&self, id: TweenId, now: f32) -> bool {
        self.tweens
            .get(id.0)
            .is_some_and(|tween| tween.progress(now) < 1.0)
    }

    /// Number of tweens still moving at `now`.
    #[must_use]
    pub fn running(&self, now: f32) -> usize {
        self.tweens
            .iter()
            .filter(|tween| tween.progress(now) < 1.0)
            .count()
    }

    /// Snap one tween to its end value.
    pub fn kill(&mut self, id: TweenId) {
        if let Some(tween) = self.tweens.get_mut(id.0) {
            tween.killed = true;
        }
    }

    /// Snap every tween to its end value and finish any added later.
    pub fn kill_all(&mut self) {
        if !self.killed {
            log::debug!("killing {} tween(s)", self.tweens.len());
        }
        self.killed = true;
        for tween in &mut self.tweens {
            tween.killed = true;
        }
    }

    /// Whether [`kill_all`](Self::kill_all) has run.
    #[must_use]
    pub fn is_killed(&self) -> bool {
        self.killed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tween_runs_from_start_to_end() {
        let mut scope = AnimationScope::new();
        let id = scope.tween(0.6, 1.0, 0.0, 1.2, EasingFunction::Linear);
        assert_eq!(scope.value(id, 0.0), Some(0.6));
        assert!((scope.value(id, 0.6).unwrap() - 0.8).abs() < 1e-6);
        assert_eq!(scope.value(id, 5.0), Some(1.0));
        assert!(scope.is_running(id, 0.6));
        assert!(!scope.is_running(id, 1.2));
    }

    #[test]
    fn delayed_tween_holds_its_start_value() {
        let mut scope = AnimationScope::new();
        let id = scope.tween(2.0, 4.0, 1.0, 1.0, EasingFunction::DEFAULT);
        assert_eq!(scope.value(id, 0.5), Some(2.0));
    }

    #[test]
    fn kill_snaps_to_the_end_value() {
        let mut scope = AnimationScope::new();
        let a = scope.tween(0.0, 1.0, 0.0, 10.0, EasingFunction::Linear);
        let b = scope.tween(5.0, 3.0, 0.0, 10.0, EasingFunction::Linear);
        scope.kill(a);
        assert_eq!(scope.value(a, 1.0), Some(1.0));
        assert_eq!(scope.running(1.0), 1);

        scope.kill_all();
        assert_eq!(scope.value(b, 1.0), Some(3.0));
        assert_eq!(scope.running(1.0), 0);
        assert!(scope.is_killed());
    }

    #[test]
    fn tweens_added_after_kill_are_finished() {
        let mut scope = AnimationScope::new();
        scope.kill_all();
        let id = scope.tween(0.0, 1.0, 0.0, 3.0, EasingFunction::Linear);
        assert_eq!(scope.value(id, 0.0), Some(1.0));
    }

    #[test]
    fn zero_duration_is_immediately_settled() {
        let mut scope = AnimationScope::new();
        let id = scope.tween(0.0, 2.0, 0.0, 0.0, EasingFunction::Linear);
        assert_eq!(scope.value(id, 0.0), Some(2.0));
    }

    #[test]
    fn unknown_handle_reads_none() {
        let mut other = AnimationScope::new();
        let _ = other.tween(0.0, 1.0, 0.0, 1.0, EasingFunction::Linear);
        let id = other.tween(0.0, 1.0, 0.0, 1.0, EasingFunction::Linear);
        assert_eq!(AnimationScope::new().value(id, 0.0), None);
    }
}
