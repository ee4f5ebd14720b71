use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Integer diagram coordinate.
///
/// Coordinates are logical diagram units. Exact integer arithmetic keeps Eq, Hash and Ord
/// well defined, which the cover set and the escape-line memo rely on.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Squared euclidean distance, widened so that far-apart points cannot overflow.
    pub fn distance_sq(self, other: Point) -> i64 {
        let dx = i64::from(self.x) - i64::from(other.x);
        let dy = i64::from(self.y) - i64::from(other.y);
        dx * dx + dy * dy
    }

    /// Shift by `(dx, dy)`, saturating at the coordinate range.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }

    /// Move `distance` units toward `side`.
    pub fn step(self, side: Side, distance: i32) -> Self {
        match side {
            Side::Left => self.offset(distance.saturating_neg(), 0),
            Side::Right => self.offset(distance, 0),
            Side::Lower => self.offset(0, distance.saturating_neg()),
            Side::Upper => self.offset(0, distance),
        }
    }

    /// Coordinate along the axis that `orientation` runs on.
    pub fn along(self, orientation: Orientation) -> i32 {
        match orientation {
            Orientation::Horizontal => self.x,
            Orientation::Vertical => self.y,
        }
    }

    /// Coordinate across the axis that `orientation` runs on.
    pub fn across(self, orientation: Orientation) -> i32 {
        match orientation {
            Orientation::Horizontal => self.y,
            Orientation::Vertical => self.x,
        }
    }
}

impl Ord for Point {
    fn cmp(&self, other: &Self) -> Ordering {
        self.y.cmp(&other.y).then(self.x.cmp(&other.x))
    }
}

impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Width/height pair, used for routing margins and rectangle inflation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Same extent on both axes.
    pub const fn square(side: i32) -> Self {
        Self::new(side, side)
    }

    pub fn scale(self, factor: i32) -> Self {
        Self::new(
            self.width.saturating_mul(factor),
            self.height.saturating_mul(factor),
        )
    }

    /// Halve both components, never dropping below one unit.
    pub fn halved(self) -> Self {
        Self::new((self.width / 2).max(1), (self.height / 2).max(1))
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Axis-aligned rectangle in diagram coordinates.
///
/// `top` is the smaller y and `bottom` the larger one, following the usual screen layout of
/// diagram shapes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle spanning two opposite corners, in any order.
    pub fn from_corners(a: Point, b: Point) -> Self {
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        let extent = |a: i32, b: i32| i32::try_from(a.abs_diff(b)).unwrap_or(i32::MAX);
        Self::new(x, y, extent(a.x, b.x), extent(a.y, b.y))
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Grow the rectangle by `margin` on every side.
    pub fn inflate(&self, margin: Size) -> Self {
        Self::new(
            self.x.saturating_sub(margin.width),
            self.y.saturating_sub(margin.height),
            self.width.saturating_add(margin.width.saturating_mul(2)),
            self.height.saturating_add(margin.height.saturating_mul(2)),
        )
    }

    /// Clamp `p` to lie at least one unit inside the rectangle.
    pub fn clamp_inside(&self, p: Point) -> Point {
        Point::new(
            p.x.max(self.left().saturating_add(1))
                .min(self.right().saturating_sub(1)),
            p.y.max(self.top().saturating_add(1))
                .min(self.bottom().saturating_sub(1)),
        )
    }
}

/// Orientation of an axis-aligned segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn perpendicular(self) -> Self {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }
}

/// Side of a point on which a cover is looked for.
///
/// `Lower` points toward smaller y and `Upper` toward larger y. These are coordinate
/// directions, not screen directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Side {
    Left,
    Right,
    Lower,
    Upper,
}

impl Side {
    /// Order in which Escape Process II probes the covers around a point.
    pub const PROBE_ORDER: [Side; 4] = [Side::Upper, Side::Right, Side::Lower, Side::Left];

    /// Orientation of the covers that block movement toward this side.
    pub fn cover_orientation(self) -> Orientation {
        match self {
            Side::Left | Side::Right => Orientation::Vertical,
            Side::Lower | Side::Upper => Orientation::Horizontal,
        }
    }

    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
            Side::Lower => Side::Upper,
            Side::Upper => Side::Lower,
        }
    }

    /// Signed distance from `from` to the line coordinate `line`, positive when the line
    /// lies toward this side.
    pub fn distance(self, from: Point, line: i32) -> i64 {
        let (origin, line) = match self {
            Side::Left | Side::Right => (i64::from(from.x), i64::from(line)),
            Side::Lower | Side::Upper => (i64::from(from.y), i64::from(line)),
        };
        match self {
            Side::Left | Side::Lower => origin - line,
            Side::Right | Side::Upper => line - origin,
        }
    }
}

/// Whether every consecutive pair of points differs in at most one axis.
///
/// An empty path is never orthogonal. Repeated points are tolerated.
pub fn is_orthogonal(path: &[Point]) -> bool {
    !path.is_empty() && path.windows(2).all(|w| w[0].x == w[1].x || w[0].y == w[1].y)
}
