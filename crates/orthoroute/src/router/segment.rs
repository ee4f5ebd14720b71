use std::fmt;

use super::RouteError;
use super::types::{Orientation, Point};

/// One end of a segment along its running axis.
///
/// Unbounded ends replace sentinel integers, so extending a line to "infinity" never
/// participates in arithmetic. The derived ordering places `NegInfinity` below every finite
/// value and `PosInfinity` above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Bound {
    NegInfinity,
    Finite(i32),
    PosInfinity,
}

impl Bound {
    pub fn finite(self) -> Option<i32> {
        match self {
            Bound::Finite(v) => Some(v),
            Bound::NegInfinity | Bound::PosInfinity => None,
        }
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::NegInfinity => write!(f, "-inf"),
            Bound::Finite(v) => write!(f, "{v}"),
            Bound::PosInfinity => write!(f, "+inf"),
        }
    }
}

/// Axis-aligned segment, possibly unbounded at either end.
///
/// A horizontal segment sits on the line `y = line` and runs between `a` and `b` along x;
/// a vertical one sits on `x = line` and runs along y. The ends keep their construction
/// order, which equality and hashing take into account.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Segment {
    orientation: Orientation,
    line: i32,
    a: Bound,
    b: Bound,
}

impl Segment {
    /// Segment between two finite points.
    ///
    /// Points sharing an x coordinate produce a vertical segment (including the degenerate
    /// single-point case), points sharing a y coordinate a horizontal one.
    pub fn between(p: Point, q: Point) -> Result<Self, RouteError> {
        if p.x == q.x {
            Ok(Self::vertical(p.x, Bound::Finite(p.y), Bound::Finite(q.y)))
        } else if p.y == q.y {
            Ok(Self::horizontal(p.y, Bound::Finite(p.x), Bound::Finite(q.x)))
        } else {
            Err(RouteError::NotAxisAligned { a: p, b: q })
        }
    }

    /// Like [`Segment::between`], for callers that already guarantee alignment.
    ///
    /// # Panics
    ///
    /// Panics when `p` and `q` differ in both coordinates.
    #[track_caller]
    pub fn new(p: Point, q: Point) -> Self {
        match Self::between(p, q) {
            Ok(segment) => segment,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn horizontal(y: i32, a: Bound, b: Bound) -> Self {
        Self {
            orientation: Orientation::Horizontal,
            line: y,
            a,
            b,
        }
    }

    pub fn vertical(x: i32, a: Bound, b: Bound) -> Self {
        Self {
            orientation: Orientation::Vertical,
            line: x,
            a,
            b,
        }
    }

    /// Full line of the given orientation through `p`.
    pub fn line_through(p: Point, orientation: Orientation) -> Self {
        Self {
            orientation,
            line: p.across(orientation),
            a: Bound::NegInfinity,
            b: Bound::PosInfinity,
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// The fixed coordinate: y of a horizontal segment, x of a vertical one.
    pub fn line(&self) -> i32 {
        self.line
    }

    /// First end as a point, if it is finite.
    pub fn start(&self) -> Option<Point> {
        self.a.finite().map(|v| self.point_at(v))
    }

    /// Second end as a point, if it is finite.
    pub fn end(&self) -> Option<Point> {
        self.b.finite().map(|v| self.point_at(v))
    }

    #[cfg(test)]
    pub fn is_bounded(&self) -> bool {
        self.a.finite().is_some() && self.b.finite().is_some()
    }

    fn point_at(&self, along: i32) -> Point {
        match self.orientation {
            Orientation::Horizontal => Point::new(along, self.line),
            Orientation::Vertical => Point::new(self.line, along),
        }
    }

    fn range(&self) -> (Bound, Bound) {
        (self.a.min(self.b), self.a.max(self.b))
    }

    fn spans(&self, along: i32) -> bool {
        let (lo, hi) = self.range();
        let k = Bound::Finite(along);
        k >= lo && k <= hi
    }

    /// Whether the perpendicular projection of `p` onto this segment's line lands inside
    /// the segment.
    pub fn covers(&self, p: Point) -> bool {
        self.spans(p.along(self.orientation))
    }

    /// Crossing point of a horizontal and a vertical segment.
    ///
    /// Parallel segments never intersect, even when they overlap.
    pub fn intersect(&self, other: &Segment) -> Option<Point> {
        if self.orientation == other.orientation {
            return None;
        }
        let (vertical, horizontal) = match self.orientation {
            Orientation::Vertical => (self, other),
            Orientation::Horizontal => (other, self),
        };
        if !horizontal.spans(vertical.line) || !vertical.spans(horizontal.line) {
            return None;
        }
        Some(Point::new(vertical.line, horizontal.line))
    }

    /// Whether `p` lies on the infinite line carrying this segment.
    pub fn lies_on_line(&self, p: Point) -> bool {
        p.across(self.orientation) == self.line
    }

    /// Whether `p` lies on the segment itself, ends included.
    pub fn contains_point(&self, p: Point) -> bool {
        self.lies_on_line(p) && self.covers(p)
    }

    /// Whether both ends of `other` lie on this segment.
    pub fn contains_segment(&self, other: &Segment) -> bool {
        if self.orientation != other.orientation || self.line != other.line {
            return false;
        }
        let (lo, hi) = self.range();
        let (other_lo, other_hi) = other.range();
        other_lo >= lo && other_hi <= hi
    }

    /// Nudge an end point one unit further out along the segment.
    ///
    /// Points that are not a finite end of the segment are returned unchanged.
    pub fn extend_outwards(&self, p: Point) -> Point {
        if self.start() != Some(p) && self.end() != Some(p) {
            return p;
        }
        let k = p.along(self.orientation);
        let (lo, _) = self.range();
        let k = if Bound::Finite(k) == lo {
            k.saturating_sub(1)
        } else {
            k.saturating_add(1)
        };
        self.point_at(k)
    }

    /// Unbounded line through `p`, perpendicular to this segment.
    pub fn perpendicular_through(&self, p: Point) -> Segment {
        Segment::line_through(p, self.orientation.perpendicular())
    }
}

impl fmt::Debug for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.orientation {
            Orientation::Horizontal => write!(
                f,
                "Segment ({}, {}) - ({}, {}), Horizontal",
                self.a, self.line, self.b, self.line
            ),
            Orientation::Vertical => write!(
                f,
                "Segment ({}, {}) - ({}, {}), Vertical",
                self.line, self.a, self.line, self.b
            ),
        }
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    fn p(x: i32, y: i32) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn between_picks_orientation() {
        assert_eq!(
            Segment::new(p(0, 0), p(10, 0)).orientation(),
            Orientation::Horizontal
        );
        assert_eq!(
            Segment::new(p(5, 0), p(5, 10)).orientation(),
            Orientation::Vertical
        );
        // A single point is treated as a vertical segment.
        assert_eq!(
            Segment::new(p(3, 3), p(3, 3)).orientation(),
            Orientation::Vertical
        );
    }

    #[test]
    fn between_rejects_diagonal() {
        let err = Segment::between(p(0, 0), p(1, 1)).unwrap_err();
        assert_eq!(
            err,
            RouteError::NotAxisAligned {
                a: p(0, 0),
                b: p(1, 1)
            }
        );
    }

    #[test]
    #[should_panic(expected = "not axis-aligned")]
    fn new_panics_on_diagonal() {
        let _ = Segment::new(p(0, 0), p(2, 3));
    }

    #[test]
    fn covers_uses_projection() {
        let s = Segment::new(p(0, 5), p(10, 5));
        assert!(s.covers(p(0, 100)));
        assert!(s.covers(p(10, -3)));
        assert!(!s.covers(p(11, 5)));

        let ray = Segment::vertical(0, Bound::Finite(0), Bound::PosInfinity);
        assert!(ray.covers(p(7, 1_000_000)));
        assert!(!ray.covers(p(7, -1)));
    }

    #[test]
    fn intersect_crossing_segments() {
        let h = Segment::new(p(0, 5), p(10, 5));
        let v = Segment::new(p(4, 0), p(4, 10));
        assert_eq!(h.intersect(&v), Some(p(4, 5)));
        assert_eq!(v.intersect(&h), Some(p(4, 5)));
    }

    #[test]
    fn intersect_touching_ends_counts() {
        let h = Segment::new(p(0, 0), p(10, 0));
        let v = Segment::new(p(10, 0), p(10, 20));
        assert_eq!(h.intersect(&v), Some(p(10, 0)));
    }

    #[test]
    fn intersect_misses() {
        let h = Segment::new(p(0, 0), p(10, 0));
        let v = Segment::new(p(11, -5), p(11, 5));
        assert_eq!(h.intersect(&v), None);
        let v = Segment::new(p(5, 1), p(5, 5));
        assert_eq!(h.intersect(&v), None);
    }

    #[test]
    fn intersect_parallel_is_none() {
        let a = Segment::new(p(0, 0), p(10, 0));
        let b = Segment::new(p(5, 0), p(20, 0));
        assert_eq!(a.intersect(&b), None);
    }

    #[test]
    fn intersect_unbounded_lines() {
        let h = Segment::line_through(p(-40, 7), Orientation::Horizontal);
        let v = Segment::line_through(p(900, 0), Orientation::Vertical);
        assert_eq!(h.intersect(&v), Some(p(900, 7)));
    }

    #[test]
    fn lies_on_line_ignores_extent() {
        let s = Segment::new(p(0, 5), p(10, 5));
        assert!(s.lies_on_line(p(500, 5)));
        assert!(!s.lies_on_line(p(5, 6)));
        assert!(!s.contains_point(p(500, 5)));
        assert!(s.contains_point(p(10, 5)));
    }

    #[test]
    fn contains_segment_requires_same_line() {
        let outer = Segment::new(p(0, 0), p(0, 100));
        assert!(outer.contains_segment(&Segment::new(p(0, 90), p(0, 10))));
        assert!(!outer.contains_segment(&Segment::new(p(1, 10), p(1, 90))));
        assert!(!outer.contains_segment(&Segment::new(p(0, 10), p(0, 101))));
    }

    #[test]
    fn extend_outwards_moves_past_the_end() {
        let s = Segment::new(p(0, 10), p(0, 30));
        assert_eq!(s.extend_outwards(p(0, 10)), p(0, 9));
        assert_eq!(s.extend_outwards(p(0, 30)), p(0, 31));
        let s = Segment::new(p(20, 4), p(-5, 4));
        assert_eq!(s.extend_outwards(p(-5, 4)), p(-6, 4));
        assert_eq!(s.extend_outwards(p(20, 4)), p(21, 4));
        // Not an end point: untouched.
        assert_eq!(s.extend_outwards(p(3, 4)), p(3, 4));
    }

    #[test]
    fn perpendicular_is_unbounded() {
        let s = Segment::new(p(0, 0), p(10, 0));
        let perp = s.perpendicular_through(p(3, 0));
        assert_eq!(perp.orientation(), Orientation::Vertical);
        assert_eq!(perp.line(), 3);
        assert!(!perp.is_bounded());
        assert!(perp.contains_point(p(3, -1_000_000)));
    }

    #[test]
    fn ends_are_none_when_unbounded() {
        let s = Segment::horizontal(2, Bound::NegInfinity, Bound::Finite(8));
        assert_eq!(s.start(), None);
        assert_eq!(s.end(), Some(p(8, 2)));
    }

    #[test]
    fn equality_respects_end_order() {
        let a = Segment::new(p(0, 0), p(0, 10));
        let b = Segment::new(p(0, 10), p(0, 0));
        assert_ne!(a, b);
        assert_eq!(a, Segment::new(p(0, 0), p(0, 10)));
    }

    #[test]
    fn debug_shows_infinity() {
        let s = Segment::horizontal(2, Bound::NegInfinity, Bound::PosInfinity);
        assert_eq!(format!("{s:?}"), "Segment (-inf, 2) - (+inf, 2), Horizontal");
    }
}
