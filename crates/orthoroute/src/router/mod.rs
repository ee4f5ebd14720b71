pub mod cover;
pub mod error;
pub mod escape;
pub mod escape_cover;
pub mod refine;
pub mod segment;
pub mod serialize;
pub mod types;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use tracing::debug;

use cover::CoverSet;
pub use error::RouteError;
use types::{Point, Rect, Size, is_orthogonal};

/// Obstacles and end points for one connector.
///
/// Rectangles block their edges, lines block themselves, and each point obstacle blocks a
/// small cross centred on it. The optional enclosing rectangle keeps the route inside the
/// canvas.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub begin: Point,
    pub end: Point,
    #[serde(default)]
    pub enclosing: Option<Rect>,
    #[serde(default)]
    pub rectangles: Vec<Rect>,
    #[serde(default)]
    pub lines: Vec<(Point, Point)>,
    #[serde(default)]
    pub points: Vec<Point>,
}

impl RouteRequest {
    pub fn new(begin: Point, end: Point) -> Self {
        Self {
            begin,
            end,
            ..Self::default()
        }
    }

    pub fn with_enclosing(mut self, enclosing: Rect) -> Self {
        self.enclosing = Some(enclosing);
        self
    }

    pub fn with_rectangles(mut self, rectangles: impl IntoIterator<Item = Rect>) -> Self {
        self.rectangles.extend(rectangles);
        self
    }

    pub fn with_lines(mut self, lines: impl IntoIterator<Item = (Point, Point)>) -> Self {
        self.lines.extend(lines);
        self
    }

    pub fn with_points(mut self, points: impl IntoIterator<Item = Point>) -> Self {
        self.points.extend(points);
        self
    }

    /// End points pulled one unit inside the enclosing rectangle, if there is one.
    pub fn clamped_endpoints(&self) -> (Point, Point) {
        match self.enclosing.filter(|r| !r.is_empty()) {
            Some(enclosing) => (
                enclosing.clamp_inside(self.begin),
                enclosing.clamp_inside(self.end),
            ),
            None => (self.begin, self.end),
        }
    }

    /// The same request with rectangle and point obstacles removed.
    fn relaxed(&self) -> Self {
        Self {
            rectangles: Vec::new(),
            points: Vec::new(),
            ..self.clone()
        }
    }
}

/// Tuning knobs for a routing attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteOptions {
    /// Clearance kept from obstacle corners, per axis.
    pub margin: Size,
    /// Escape steps and probe stops allowed before the search gives up.
    pub max_iterations: usize,
}

impl Default for RouteOptions {
    fn default() -> Self {
        Self {
            margin: Size::square(4),
            max_iterations: 10_000,
        }
    }
}

/// Which attempt of `route_connector` produced the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Full obstacle set.
    General,
    /// Lines only, with half the margin.
    Relaxed,
    /// One bend, ignoring obstacles.
    Direct,
}

/// Path produced by `route_connector`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Routed {
    pub path: Vec<Point>,
    pub strategy: Strategy,
}

/// Route a connector around the obstacles of `request`.
///
/// The path starts at the (clamped) begin point, ends at the (clamped) end point and every
/// consecutive pair of points shares an x or a y coordinate. Equal end points give a
/// single-point path.
pub fn route(request: &RouteRequest, options: &RouteOptions) -> Result<Vec<Point>, RouteError> {
    let margin = options.margin;
    if margin.width < 1 || margin.height < 1 {
        return Err(RouteError::InvalidMargin(margin));
    }

    let (begin, end) = request.clamped_endpoints();
    if begin == end {
        return Ok(vec![begin]);
    }

    let mut rectangles = Vec::with_capacity(request.rectangles.len() + 1);
    rectangles.extend(request.enclosing.filter(|r| !r.is_empty()));
    rectangles.extend_from_slice(&request.rectangles);

    let mut lines = request.lines.clone();
    lines.extend(point_covers(&request.points, margin));

    let mut covers = CoverSet::build(&rectangles, &lines)?;
    debug!(
        %begin,
        %end,
        %margin,
        vertical = covers.vertical_covers().len(),
        horizontal = covers.horizontal_covers().len(),
        "routing connector"
    );

    let escaped = escape::escape(&mut covers, begin, end, margin, options.max_iterations)?;
    let mut path = refine::assemble(escaped);
    refine::simplify(&mut path);
    refine::remove_detours(&covers, &mut path, margin, options.max_iterations)?;
    refine::simplify(&mut path);

    if !is_orthogonal(&path) {
        return Err(RouteError::NotOrthogonal);
    }
    Ok(path)
}

/// Route a connector, falling back to simpler strategies instead of failing.
///
/// Tries the full request first, then only its lines with half the margin, and finally a
/// single-bend path between the end points.
pub fn route_connector(request: &RouteRequest, options: &RouteOptions) -> Routed {
    match route(request, options) {
        Ok(path) => {
            return Routed {
                path,
                strategy: Strategy::General,
            };
        }
        Err(err) => debug!(%err, "general routing failed, relaxing obstacles"),
    }

    let relaxed_options = RouteOptions {
        margin: options.margin.halved(),
        ..*options
    };
    match route(&request.relaxed(), &relaxed_options) {
        Ok(path) => {
            return Routed {
                path,
                strategy: Strategy::Relaxed,
            };
        }
        Err(err) => debug!(%err, "relaxed routing failed, using a direct path"),
    }

    let (begin, end) = request.clamped_endpoints();
    Routed {
        path: direct_path(begin, end),
        strategy: Strategy::Direct,
    }
}

/// Orthogonal path with at most one bend, ignoring obstacles.
///
/// Shallow connections (slope below one) run horizontally first, steep ones vertically.
pub fn direct_path(begin: Point, end: Point) -> Vec<Point> {
    if begin == end {
        return vec![begin];
    }
    if begin.x == end.x || begin.y == end.y {
        return vec![begin, end];
    }

    // slope = dy / dx < 1, compared without dividing.
    let dx = i64::from(end.x) - i64::from(begin.x);
    let dy = i64::from(end.y) - i64::from(begin.y);
    let shallow = if dx > 0 { dy < dx } else { dy > dx };
    let bend = if shallow {
        Point::new(end.x, begin.y)
    } else {
        Point::new(begin.x, end.y)
    };
    vec![begin, bend, end]
}

/// Cross-shaped covers standing in for point obstacles.
fn point_covers(points: &[Point], margin: Size) -> Vec<(Point, Point)> {
    let half = margin.halved();
    points
        .iter()
        .flat_map(|p| {
            [
                (p.offset(-half.width, 0), p.offset(half.width, 0)),
                (p.offset(0, -half.height), p.offset(0, half.height)),
            ]
        })
        .collect()
}
