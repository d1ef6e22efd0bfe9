use std::fmt;

use nalgebra::Point2;

/// A location in image space, in pixels
pub type Point = Point2<f64>;

/// Push both endpoints of a segment outward along its own direction
///
/// `p1` moves away from `p2` and `p2` away from `p1`, each by `offset`.
/// A zero-length segment has no direction and is returned unchanged.
pub fn extend_line(p1: Point, p2: Point, offset: f64) -> (Point, Point) {
    let direction = p2 - p1;
    let length = direction.norm();
    if length == 0.0 {
        return (p1, p2);
    }

    let unit = direction / length;
    (p1 - unit * offset, p2 + unit * offset)
}

/// Fourth corner of the parallelogram spanned by `p0`, `p1`, `p2`, opposite `p1`
pub fn complete_parallelogram(p0: Point, p1: Point, p2: Point) -> Point {
    Point::new(p0.x - p1.x + p2.x, p0.y - p1.y + p2.y)
}

/// Symbol boundary: three detected corners plus the derived fourth
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    pub corners: [Point; 4],
}

impl Quad {
    pub fn from_corners(p0: Point, p1: Point, p2: Point) -> Self {
        Self {
            corners: [p0, p1, p2, complete_parallelogram(p0, p1, p2)],
        }
    }

    /// The four sides, connected cyclically: (p0,p1), (p1,p2), (p2,p3), (p3,p0)
    pub fn edges(&self) -> [(Point, Point); 4] {
        let c = &self.corners;
        [(c[0], c[1]), (c[1], c[2]), (c[2], c[3]), (c[3], c[0])]
    }

    /// Each side lengthened by `offset` past both of its corners
    pub fn extended_edges(&self, offset: f64) -> [(Point, Point); 4] {
        self.edges().map(|(a, b)| extend_line(a, b, offset))
    }
}

impl fmt::Display for Quad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, corner) in self.corners.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "({:.1}, {:.1})", corner.x, corner.y)?;
        }
        Ok(())
    }
}
