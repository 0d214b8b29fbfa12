//! Rectangular screen regions.

use picaso_hw::Point;

/// A widget's screen region, corners inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Envelope {
    pub x1: u16,
    pub y1: u16,
    pub x2: u16,
    pub y2: u16,
}

impl Envelope {
    pub const fn new(x1: u16, y1: u16, x2: u16, y2: u16) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Covers a whole display of the given dimensions.
    pub fn screen((width, height): (u16, u16)) -> Self {
        Self::new(0, 0, width.saturating_sub(1), height.saturating_sub(1))
    }

    /// Distance between the left and right edges.
    pub fn width(&self) -> u16 {
        self.x2.saturating_sub(self.x1)
    }

    /// Distance between the top and bottom edges.
    pub fn height(&self) -> u16 {
        self.y2.saturating_sub(self.y1)
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    pub fn bottom_right(&self) -> Point {
        Point::new(self.x2, self.y2)
    }

    /// Returns true if `other` lies entirely inside this envelope.
    pub fn contains(&self, other: &Envelope) -> bool {
        other.x1 >= self.x1 && other.y1 >= self.y1 && other.x2 <= self.x2 && other.y2 <= self.y2
    }

    /// Returns the overlapping region, if any.
    pub fn intersect(&self, other: &Envelope) -> Option<Envelope> {
        let x1 = self.x1.max(other.x1);
        let y1 = self.y1.max(other.y1);
        let x2 = self.x2.min(other.x2);
        let y2 = self.y2.min(other.y2);
        (x1 <= x2 && y1 <= y2).then_some(Envelope::new(x1, y1, x2, y2))
    }
}

impl From<(u16, u16, u16, u16)> for Envelope {
    fn from((x1, y1, x2, y2): (u16, u16, u16, u16)) -> Self {
        Self::new(x1, y1, x2, y2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen() {
        assert_eq!(Envelope::screen((480, 272)), Envelope::new(0, 0, 479, 271));
    }

    #[test]
    fn test_contains_and_intersect() {
        let outer = Envelope::new(0, 0, 100, 50);
        assert!(outer.contains(&Envelope::new(10, 10, 100, 50)));
        assert!(!outer.contains(&Envelope::new(10, 10, 101, 50)));

        assert_eq!(
            outer.intersect(&Envelope::new(90, 40, 200, 200)),
            Some(Envelope::new(90, 40, 100, 50))
        );
        assert_eq!(outer.intersect(&Envelope::new(101, 0, 120, 10)), None);
    }
}
