use serde::{Deserialize, Serialize};

use super::types::{Point, Rect, Size};

/// Edge of a shape's bounding rectangle.
///
/// `Top` is the edge at the smaller y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Left,
    Top,
    Right,
    Bottom,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Left, Edge::Top, Edge::Right, Edge::Bottom];

    /// End points of this edge of `rect`, in increasing coordinate order.
    pub fn endpoints(self, rect: &Rect) -> (Point, Point) {
        let (l, t, r, b) = (rect.left(), rect.top(), rect.right(), rect.bottom());
        match self {
            Edge::Left => (Point::new(l, t), Point::new(l, b)),
            Edge::Top => (Point::new(l, t), Point::new(r, t)),
            Edge::Right => (Point::new(r, t), Point::new(r, b)),
            Edge::Bottom => (Point::new(l, b), Point::new(r, b)),
        }
    }

    pub fn midpoint(self, rect: &Rect) -> Point {
        let (a, b) = self.endpoints(rect);
        // The mean of two i32 values always fits back into an i32.
        let mean = |a: i32, b: i32| ((i64::from(a) + i64::from(b)) / 2) as i32;
        Point::new(mean(a.x, b.x), mean(a.y, b.y))
    }

    /// Edge of `rect` nearest to `p`; earlier edges in [`Edge::ALL`] win ties.
    pub fn closest(rect: &Rect, p: Point) -> Edge {
        let mut best = Edge::Left;
        let mut best_distance = i64::MAX;
        for edge in Edge::ALL {
            let (a, b) = edge.endpoints(rect);
            let nearest = Point::new(p.x.clamp(a.x, b.x), p.y.clamp(a.y, b.y));
            let distance = p.distance_sq(nearest);
            if distance < best_distance {
                best = edge;
                best_distance = distance;
            }
        }
        best
    }

    /// Coordinate that orders anchors along this edge.
    fn along(self, p: Point) -> i32 {
        match self {
            Edge::Left | Edge::Right => p.y,
            Edge::Top | Edge::Bottom => p.x,
        }
    }

    /// Channel from the edge line at `rect` in to the anchor `p`, two units wide.
    ///
    /// Anchors outside the rectangle or level with a corner get no channel.
    fn notch(self, rect: &Rect, p: Point) -> Option<[Point; 4]> {
        let (l, t, r, b) = (rect.left(), rect.top(), rect.right(), rect.bottom());
        let beside_vertical = p.y > t && p.y < b;
        let beside_horizontal = p.x > l && p.x < r;
        match self {
            Edge::Left if p.x > l && beside_vertical => Some([
                Point::new(l, p.y.saturating_sub(1)),
                Point::new(p.x.saturating_add(1), p.y.saturating_sub(1)),
                Point::new(p.x.saturating_add(1), p.y.saturating_add(1)),
                Point::new(l, p.y.saturating_add(1)),
            ]),
            Edge::Right if p.x < r && beside_vertical => Some([
                Point::new(r, p.y.saturating_sub(1)),
                Point::new(p.x.saturating_sub(1), p.y.saturating_sub(1)),
                Point::new(p.x.saturating_sub(1), p.y.saturating_add(1)),
                Point::new(r, p.y.saturating_add(1)),
            ]),
            Edge::Top if p.y > t && beside_horizontal => Some([
                Point::new(p.x.saturating_sub(1), t),
                Point::new(p.x.saturating_sub(1), p.y.saturating_add(1)),
                Point::new(p.x.saturating_add(1), p.y.saturating_add(1)),
                Point::new(p.x.saturating_add(1), t),
            ]),
            Edge::Bottom if p.y < b && beside_horizontal => Some([
                Point::new(p.x.saturating_sub(1), b),
                Point::new(p.x.saturating_sub(1), p.y.saturating_sub(1)),
                Point::new(p.x.saturating_add(1), p.y.saturating_sub(1)),
                Point::new(p.x.saturating_add(1), b),
            ]),
            _ => None,
        }
    }
}

/// Connector end point attached to a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub location: Point,
    /// Edge the connector leaves through; the closest edge when unset.
    pub edge: Option<Edge>,
}

impl Anchor {
    pub fn new(location: Point, edge: Option<Edge>) -> Self {
        Self { location, edge }
    }
}

/// Obstacle lines surrounding a shape, with a notch opening toward each anchor.
///
/// The shape's bounds are inflated by `margin`; every edge becomes one line, or a polyline
/// whose notches let a route leave the shape only from the anchor, through its edge.
pub fn escape_cover(bounds: Rect, margin: Size, anchors: &[Anchor]) -> Vec<(Point, Point)> {
    let inflated = bounds.inflate(margin);
    let mut lines = Vec::new();

    for edge in Edge::ALL {
        let mut anchored: Vec<Point> = anchors
            .iter()
            .filter(|a| a.edge.unwrap_or_else(|| Edge::closest(&bounds, a.location)) == edge)
            .map(|a| a.location)
            .collect();
        anchored.sort_by_key(|p| edge.along(*p));
        anchored.dedup();

        let (start, finish) = edge.endpoints(&inflated);
        let mut polyline = vec![start];
        for p in anchored {
            if let Some(notch) = edge.notch(&inflated, p) {
                polyline.extend(notch);
            }
        }
        polyline.push(finish);

        lines.extend(polyline.windows(2).map(|w| (w[0], w[1])));
    }

    lines
}
