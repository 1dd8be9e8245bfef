//! Per-channel "next free position".

/// Signed distance, in cells, from the player to the next unplaced cell.
///
/// Placing content pushes the cursor forward; player movement pulls it back.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LaneCursor {
    z: f32,
}

impl LaneCursor {
    /// Creates a cursor at `z`.
    #[inline]
    #[must_use]
    pub const fn new(z: f32) -> Self {
        Self { z }
    }

    /// Current position.
    #[inline]
    #[must_use]
    pub const fn z(self) -> f32 {
        self.z
    }

    /// Moves the cursor to `z`.
    #[inline]
    pub fn set(&mut self, z: f32) {
        self.z = z;
    }

    /// Pushes the cursor forward by a placed footprint.
    #[inline]
    pub fn advance(&mut self, cells: f32) {
        self.z += cells;
    }

    /// Pulls the cursor back by the distance the player traveled.
    #[inline]
    pub fn scroll(&mut self, cells: f32) {
        self.z -= cells;
    }

    /// Whether the cursor has fallen inside the build-ahead distance.
    #[inline]
    #[must_use]
    pub fn needs_content(self, build_ahead: f32) -> bool {
        self.z < build_ahead
    }
}

/// Farthest of a set of cursors (0 for none).
#[must_use]
pub fn farthest(cursors: &[LaneCursor]) -> f32 {
    cursors
        .iter()
        .map(|cursor| cursor.z)
        .reduce(f32::max)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_and_scroll() {
        let mut cursor = LaneCursor::new(10.0);
        cursor.advance(5.0);
        cursor.scroll(12.5);
        assert!((cursor.z() - 2.5).abs() < f32::EPSILON);
        assert!(cursor.needs_content(3.0));
        assert!(!cursor.needs_content(2.5));
    }

    #[test]
    fn test_farthest() {
        let cursors = [LaneCursor::new(-3.0), LaneCursor::new(12.0), LaneCursor::new(7.0)];
        assert!((farthest(&cursors) - 12.0).abs() < f32::EPSILON);
        assert!(farthest(&[]).abs() < f32::EPSILON);
    }
}
