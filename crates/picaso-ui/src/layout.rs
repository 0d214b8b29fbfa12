//! Grid layout.
//!
//! A grid divides its envelope evenly among its children along one axis.
//! Child boundaries are rounded from the exact cumulative split, so adjacent
//! children share no pixels, together cover the parent, and differ in size by
//! at most one pixel.

use crate::envelope::Envelope;

/// How a widget arranges its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// At most one child, laid over the parent.
    #[default]
    Single,
    /// Children side by side, left to right.
    Horizontal,
    /// Children stacked, top to bottom.
    Vertical,
}

impl Orientation {
    pub fn is_grid(&self) -> bool {
        !matches!(self, Orientation::Single)
    }
}

/// Splits `parent` into `count` envelopes along the orientation's axis.
///
/// Returns an empty list for [`Orientation::Single`], whose child keeps its
/// own envelope.
pub fn split(parent: Envelope, orientation: Orientation, count: usize) -> Vec<Envelope> {
    match orientation {
        Orientation::Single => Vec::new(),
        Orientation::Horizontal => spans(parent.x1, parent.x2, count)
            .into_iter()
            .map(|(x1, x2)| Envelope::new(x1, parent.y1, x2, parent.y2))
            .collect(),
        Orientation::Vertical => spans(parent.y1, parent.y2, count)
            .into_iter()
            .map(|(y1, y2)| Envelope::new(parent.x1, y1, parent.x2, y2))
            .collect(),
    }
}

// Spans are sized from the pixel count. When children outnumber pixels the
// trailing spans collapse onto `end`.
fn spans(start: u16, end: u16, count: usize) -> Vec<(u16, u16)> {
    if count == 0 {
        return Vec::new();
    }

    let pixels = f64::from(end.saturating_sub(start)) + 1.0;
    let share = pixels / count as f64;
    let mut near = start;
    let mut spans = Vec::with_capacity(count);
    for i in 1..=count {
        let far = if i == count {
            end
        } else {
            let offset = (share * i as f64).round() as i64 - 1;
            (i64::from(start) + offset).clamp(i64::from(near), i64::from(end)) as u16
        };
        spans.push((near, far));
        near = far.saturating_add(1).min(end);
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_partition(parent: Envelope, children: &[Envelope], horizontal: bool) {
        let edges = |e: &Envelope| if horizontal { (e.x1, e.x2) } else { (e.y1, e.y2) };
        let (start, end) = edges(&parent);

        assert_eq!(edges(&children[0]).0, start);
        assert_eq!(edges(children.last().unwrap()).1, end);
        for pair in children.windows(2) {
            assert_eq!(edges(&pair[0]).1 + 1, edges(&pair[1]).0);
        }

        let sizes: Vec<u16> = children
            .iter()
            .map(|c| edges(c).1 - edges(c).0 + 1)
            .collect();
        let max = sizes.iter().max().unwrap();
        let min = sizes.iter().min().unwrap();
        assert!(max - min <= 1, "uneven split {:?}", sizes);

        for child in children {
            assert!(parent.contains(child));
        }
    }

    #[test]
    fn test_horizontal_two() {
        let parent = Envelope::new(0, 0, 100, 50);
        let children = split(parent, Orientation::Horizontal, 2);
        assert_eq!(
            children,
            vec![Envelope::new(0, 0, 50, 50), Envelope::new(51, 0, 100, 50)]
        );
        assert_partition(parent, &children, true);
    }

    #[test]
    fn test_vertical_three() {
        let parent = Envelope::new(10, 20, 110, 271);
        let children = split(parent, Orientation::Vertical, 3);
        assert_eq!(children.len(), 3);
        assert!(children.iter().all(|c| c.x1 == 10 && c.x2 == 110));
        assert_partition(parent, &children, false);
    }

    #[test]
    fn test_many_counts_partition() {
        let parent = Envelope::new(0, 0, 479, 271);
        for count in 1..=12 {
            assert_partition(parent, &split(parent, Orientation::Horizontal, count), true);
            assert_partition(parent, &split(parent, Orientation::Vertical, count), false);
        }
    }

    #[test]
    fn test_single_and_empty() {
        let parent = Envelope::new(0, 0, 100, 50);
        assert!(split(parent, Orientation::Single, 1).is_empty());
        assert!(split(parent, Orientation::Horizontal, 0).is_empty());
        assert_eq!(split(parent, Orientation::Vertical, 1), vec![parent]);
    }

    #[test]
    fn test_more_children_than_pixels_stays_inside() {
        let parent = Envelope::new(0, 0, 2, 10);
        let children = split(parent, Orientation::Horizontal, 5);
        assert_eq!(children.len(), 5);
        for child in &children {
            assert!(parent.contains(child));
        }
    }
}
