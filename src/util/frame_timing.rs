use web_time::{Duration, Instant};

/// Smoothed frame rate plus a throttle for periodic reporting.
pub struct FrameTiming {
    /// Last frame timestamp
    last_frame: Instant,
    /// Last time `due_report` returned true
    last_report: Instant,
    /// Smoothed FPS using exponential moving average
    smoothed_fps: f32,
    /// Smoothing factor (lower = smoother, 0.0-1.0)
    smoothing: f32,
}

impl Default for FrameTiming {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTiming {
    /// Create a timer starting now.
    #[must_use]
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            last_frame: now,
            last_report: now,
            smoothed_fps: 60.0,
            smoothing: 0.05,
        }
    }

    /// Call after presenting a frame.
    pub fn end_frame(&mut self) {
        let now = Instant::now();
        self.record(now.duration_since(self.last_frame));
        self.last_frame = now;
    }

    /// Fold one frame duration into the average.
    pub fn record(&mut self, frame_time: Duration) {
        let secs = frame_time.as_secs_f32();
        if secs > 0.0 {
            let instant_fps = 1.0 / secs;
            self.smoothed_fps = self.smoothed_fps * (1.0 - self.smoothing)
                + instant_fps * self.smoothing;
        }
    }

    /// Get the current FPS (smoothed)
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }

    /// True at most once per `interval`.
    pub fn due_report(&mut self, interval: Duration) -> bool {
        let now = Instant::now();
        if now.duration_since(self.last_report) >= interval {
            self.last_report = now;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converges_toward_steady_rate() {
        let mut timing = FrameTiming::new();
        for _ in 0..400 {
            timing.record(Duration::from_millis(20));
        }
        assert!((timing.fps() - 50.0).abs() < 0.5);
    }

    #[test]
    fn zero_length_frames_are_ignored() {
        let mut timing = FrameTiming::new();
        timing.record(Duration::ZERO);
        assert_eq!(timing.fps(), 60.0);
    }

    #[test]
    fn report_is_throttled() {
        let mut timing = FrameTiming::new();
        assert!(!timing.due_report(Duration::from_secs(3600)));
        assert!(timing.due_report(Duration::ZERO));
    }
}
