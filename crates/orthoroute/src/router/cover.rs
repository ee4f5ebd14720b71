use super::RouteError;
use super::segment::{Bound, Segment};
use super::types::{Orientation, Point, Rect, Side};

/// Blocking segments a route may not cross, plus the memo of escape lines already tried.
///
/// Covers of each orientation are kept free of subsumed entries: a cover lying entirely on
/// another cover of the same orientation is never stored twice.
#[derive(Debug, Clone, Default)]
pub struct CoverSet {
    vertical: Vec<Segment>,
    horizontal: Vec<Segment>,
    used_escape_lines: Vec<Segment>,
}

impl CoverSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build covers from obstacle rectangles (four edges each) and explicit line pairs.
    pub fn build(rectangles: &[Rect], lines: &[(Point, Point)]) -> Result<Self, RouteError> {
        let mut set = Self::new();
        for rect in rectangles {
            set.add_rect(rect);
        }
        for &(a, b) in lines {
            set.add_cover(Segment::between(a, b)?);
        }
        Ok(set)
    }

    /// Add the four edges of `rect` as covers.
    pub fn add_rect(&mut self, rect: &Rect) {
        let top_left = Point::new(rect.left(), rect.top());
        let top_right = Point::new(rect.right(), rect.top());
        let bottom_left = Point::new(rect.left(), rect.bottom());
        let bottom_right = Point::new(rect.right(), rect.bottom());
        self.add_cover(Segment::new(top_left, bottom_left));
        self.add_cover(Segment::new(top_right, bottom_right));
        self.add_cover(Segment::new(top_left, top_right));
        self.add_cover(Segment::new(bottom_left, bottom_right));
    }

    /// Insert a cover, dropping it if an existing cover already contains it, and dropping
    /// existing covers it contains.
    pub fn add_cover(&mut self, cover: Segment) {
        let covers = match cover.orientation() {
            Orientation::Vertical => &mut self.vertical,
            Orientation::Horizontal => &mut self.horizontal,
        };
        if covers.iter().any(|existing| existing.contains_segment(&cover)) {
            return;
        }
        covers.retain(|existing| !cover.contains_segment(existing));
        covers.push(cover);
    }

    pub fn vertical_covers(&self) -> &[Segment] {
        &self.vertical
    }

    pub fn horizontal_covers(&self) -> &[Segment] {
        &self.horizontal
    }

    pub fn clear_used_lines(&mut self) {
        self.used_escape_lines.clear();
    }

    pub fn add_used_escape_line(&mut self, segment: Segment) {
        self.used_escape_lines.push(segment);
    }

    /// Whether `escape_point` lies on any escape line tried before.
    pub fn escape_line_has_been_used(&self, escape_point: Point) -> bool {
        self.used_escape_lines
            .iter()
            .any(|used| used.contains_point(escape_point))
    }

    fn candidates(&self, p: Point, side: Side) -> impl Iterator<Item = (i64, &Segment)> {
        let covers = match side.cover_orientation() {
            Orientation::Vertical => &self.vertical,
            Orientation::Horizontal => &self.horizontal,
        };
        covers
            .iter()
            .map(move |segment| (side.distance(p, segment.line()), segment))
            .filter(move |(distance, segment)| *distance > 0 && segment.covers(p))
    }

    /// Nearest cover strictly beyond `p` toward `side` that covers `p`'s projection.
    ///
    /// Ties go to the cover inserted first.
    pub fn cover(&self, p: Point, side: Side) -> Option<Segment> {
        let mut best: Option<(i64, &Segment)> = None;
        for (distance, segment) in self.candidates(p, side) {
            if best.is_none_or(|(best_distance, _)| distance < best_distance) {
                best = Some((distance, segment));
            }
        }
        best.map(|(_, segment)| *segment)
    }

    /// Whether `escape` is a usable escape point for the cover found from `origin` toward
    /// `side`.
    ///
    /// The point must have left the projection of that cover, and no other cover toward
    /// `side` may sit closer to it than the original cover's line.
    pub fn is_escape_point(&self, origin: Point, escape: Point, side: Side) -> bool {
        let Some(original) = self.cover(origin, side) else {
            return false;
        };
        if original.covers(escape) {
            return false;
        }
        let original_distance = side.distance(escape, original.line()).abs();
        self.candidates(escape, side).all(|(distance, segment)| {
            *segment != original && distance.abs() >= original_distance
        })
    }

    /// Widest horizontal segment through `p` bounded by its left and right covers.
    pub fn horizontal_span(&self, p: Point) -> Segment {
        let left = self
            .cover(p, Side::Left)
            .map_or(Bound::NegInfinity, |c| Bound::Finite(c.line()));
        let right = self
            .cover(p, Side::Right)
            .map_or(Bound::PosInfinity, |c| Bound::Finite(c.line()));
        Segment::horizontal(p.y, left, right)
    }

    /// Widest vertical segment through `p` bounded by its lower and upper covers.
    pub fn vertical_span(&self, p: Point) -> Segment {
        let lower = self
            .cover(p, Side::Lower)
            .map_or(Bound::NegInfinity, |c| Bound::Finite(c.line()));
        let upper = self
            .cover(p, Side::Upper)
            .map_or(Bound::PosInfinity, |c| Bound::Finite(c.line()));
        Segment::vertical(p.x, lower, upper)
    }

    pub fn span(&self, p: Point, orientation: Orientation) -> Segment {
        match orientation {
            Orientation::Horizontal => self.horizontal_span(p),
            Orientation::Vertical => self.vertical_span(p),
        }
    }

    /// Span through `a` along the line it shares with `b`, or `None` for a diagonal pair.
    pub fn bound_segment(&self, a: Point, b: Point) -> Option<Segment> {
        if a.x == b.x {
            Some(self.vertical_span(a))
        } else if a.y == b.y {
            Some(self.horizontal_span(a))
        } else {
            None
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
    fn rect_produces_four_covers() {
        let set = CoverSet::build(&[Rect::new(0, 0, 10, 20)], &[]).unwrap();
        assert_eq!(set.vertical_covers().len(), 2);
        assert_eq!(set.horizontal_covers().len(), 2);
    }

    #[test]
    fn build_rejects_diagonal_line() {
        let err = CoverSet::build(&[], &[(p(0, 0), p(5, 5))]).unwrap_err();
        assert!(matches!(err, RouteError::NotAxisAligned { .. }));
    }

    #[test]
    fn contained_cover_is_dropped() {
        let mut set = CoverSet::new();
        set.add_cover(Segment::new(p(0, 0), p(0, 100)));
        set.add_cover(Segment::new(p(0, 10), p(0, 20)));
        assert_eq!(set.vertical_covers(), &[Segment::new(p(0, 0), p(0, 100))]);
    }

    #[test]
    fn containing_cover_replaces_all_contained() {
        let mut set = CoverSet::new();
        set.add_cover(Segment::new(p(0, 10), p(0, 20)));
        set.add_cover(Segment::new(p(0, 30), p(0, 40)));
        set.add_cover(Segment::new(p(5, 0), p(5, 50)));
        set.add_cover(Segment::new(p(0, 0), p(0, 100)));
        assert_eq!(
            set.vertical_covers(),
            &[
                Segment::new(p(5, 0), p(5, 50)),
                Segment::new(p(0, 0), p(0, 100))
            ]
        );
    }

    #[test]
    fn overlapping_covers_are_both_kept() {
        let mut set = CoverSet::new();
        set.add_cover(Segment::new(p(0, 0), p(20, 0)));
        set.add_cover(Segment::new(p(10, 0), p(30, 0)));
        assert_eq!(set.horizontal_covers().len(), 2);
    }

    #[test]
    fn cover_finds_nearest_beyond() {
        let mut set = CoverSet::new();
        set.add_cover(Segment::new(p(50, -10), p(50, 10)));
        set.add_cover(Segment::new(p(30, -10), p(30, 10)));
        set.add_cover(Segment::new(p(20, 50), p(20, 60)));
        let origin = p(0, 0);
        assert_eq!(
            set.cover(origin, Side::Right),
            Some(Segment::new(p(30, -10), p(30, 10)))
        );
        assert_eq!(set.cover(origin, Side::Left), None);
        assert_eq!(set.candidates(origin, Side::Right).count(), 2);
    }

    #[test]
    fn cover_on_the_point_is_not_beyond() {
        let mut set = CoverSet::new();
        set.add_cover(Segment::new(p(0, -10), p(0, 10)));
        assert_eq!(set.cover(p(0, 0), Side::Right), None);
        assert_eq!(set.cover(p(0, 0), Side::Left), None);
    }

    #[test]
    fn cover_lower_and_upper() {
        let set = CoverSet::build(&[Rect::new(-10, -10, 20, 20)], &[]).unwrap();
        let lower = set.cover(p(0, 0), Side::Lower).unwrap();
        let upper = set.cover(p(0, 0), Side::Upper).unwrap();
        assert_eq!(lower.line(), -10);
        assert_eq!(upper.line(), 10);
    }

    #[test]
    fn spans_stop_at_covers() {
        let set = CoverSet::build(&[Rect::new(-10, -20, 20, 40)], &[]).unwrap();
        let h = set.horizontal_span(p(0, 0));
        assert_eq!(h.start(), Some(p(-10, 0)));
        assert_eq!(h.end(), Some(p(10, 0)));
        let v = set.vertical_span(p(0, 0));
        assert_eq!(v.start(), Some(p(0, -20)));
        assert_eq!(v.end(), Some(p(0, 20)));
    }

    #[test]
    fn spans_are_open_without_covers() {
        let set = CoverSet::new();
        assert!(!set.horizontal_span(p(3, 4)).is_bounded());
        assert!(!set.vertical_span(p(3, 4)).is_bounded());
    }

    #[test]
    fn bound_segment_follows_pair_orientation() {
        let set = CoverSet::new();
        let s = set.bound_segment(p(0, 0), p(0, 9)).unwrap();
        assert_eq!(s.orientation(), Orientation::Vertical);
        assert!(set.bound_segment(p(0, 0), p(1, 9)).is_none());
    }

    #[test]
    fn escape_point_must_leave_the_cover() {
        let mut set = CoverSet::new();
        set.add_cover(Segment::new(p(40, -10), p(40, 10)));
        assert!(!set.is_escape_point(p(0, 0), p(0, 5), Side::Right));
        assert!(set.is_escape_point(p(0, 0), p(0, -20), Side::Right));
    }

    #[test]
    fn escape_point_blocked_by_closer_cover() {
        let mut set = CoverSet::new();
        set.add_cover(Segment::new(p(40, -10), p(40, 10)));
        // Between the escape point and the original cover's line.
        set.add_cover(Segment::new(p(20, -30), p(20, -15)));
        assert!(!set.is_escape_point(p(0, 0), p(0, -20), Side::Right));
        // Further out than the original cover: harmless.
        let mut set = CoverSet::new();
        set.add_cover(Segment::new(p(40, -10), p(40, 10)));
        set.add_cover(Segment::new(p(60, -30), p(60, -15)));
        assert!(set.is_escape_point(p(0, 0), p(0, -20), Side::Right));
    }

    #[test]
    fn escape_point_blocked_on_lower_side_too() {
        let mut set = CoverSet::new();
        set.add_cover(Segment::new(p(-10, -40), p(10, -40)));
        set.add_cover(Segment::new(p(15, -25), p(30, -25)));
        assert!(!set.is_escape_point(p(0, 0), p(20, 0), Side::Lower));
        assert!(set.is_escape_point(p(0, 0), p(12, 0), Side::Lower));
    }

    #[test]
    fn escape_point_without_original_cover() {
        let set = CoverSet::new();
        assert!(!set.is_escape_point(p(0, 0), p(0, 10), Side::Upper));
    }

    #[test]
    fn used_escape_lines_are_remembered() {
        let mut set = CoverSet::new();
        set.add_used_escape_line(Segment::new(p(0, 0), p(0, -20)));
        assert!(set.escape_line_has_been_used(p(0, -20)));
        assert!(set.escape_line_has_been_used(p(0, -5)));
        assert!(!set.escape_line_has_been_used(p(0, -21)));
        set.clear_used_lines();
        assert!(!set.escape_line_has_been_used(p(0, -5)));
    }
}
