use glam::Vec2;

/// Last known pointer position, normalized to `[-1, 1]` with y up.
///
/// Last write wins; there is no history or smoothing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    normalized: Vec2,
}

impl PointerState {
    /// Pointer at the center of the element.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pixel position inside an element of the given size.
    /// Positions outside the element clamp to its edge. Ignored while the
    /// element has zero area.
    pub fn update(&mut self, x: f32, y: f32, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        let nx = x / width as f32 * 2.0 - 1.0;
        let ny = 1.0 - y / height as f32 * 2.0;
        self.normalized = Vec2::new(nx, ny).clamp(Vec2::NEG_ONE, Vec2::ONE);
    }

    /// Set an already-normalized position (clamped).
    pub fn set(&mut self, normalized: Vec2) {
        self.normalized = normalized.clamp(Vec2::NEG_ONE, Vec2::ONE);
    }

    /// Return to center.
    pub fn reset(&mut self) {
        self.normalized = Vec2::ZERO;
    }

    /// Current normalized position.
    #[must_use]
    pub fn normalized(&self) -> Vec2 {
        self.normalized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_map_to_unit_square() {
        let mut pointer = PointerState::new();
        pointer.update(0.0, 0.0, 200, 100);
        assert_eq!(pointer.normalized(), Vec2::new(-1.0, 1.0));
        pointer.update(200.0, 100.0, 200, 100);
        assert_eq!(pointer.normalized(), Vec2::new(1.0, -1.0));
        pointer.update(100.0, 50.0, 200, 100);
        assert_eq!(pointer.normalized(), Vec2::ZERO);
    }

    #[test]
    fn outside_positions_clamp() {
        let mut pointer = PointerState::new();
        pointer.update(-50.0, 400.0, 200, 100);
        assert_eq!(pointer.normalized(), Vec2::new(-1.0, -1.0));
        pointer.set(Vec2::new(3.0, 0.5));
        assert_eq!(pointer.normalized(), Vec2::new(1.0, 0.5));
    }

    #[test]
    fn zero_area_keeps_last_position() {
        let mut pointer = PointerState::new();
        pointer.update(150.0, 25.0, 200, 100);
        let before = pointer.normalized();
        pointer.update(10.0, 10.0, 0, 100);
        assert_eq!(pointer.normalized(), before);
        pointer.reset();
        assert_eq!(pointer.normalized(), Vec2::ZERO);
    }
}
