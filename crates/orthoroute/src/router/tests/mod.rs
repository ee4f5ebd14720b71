mod determinism;
mod fallback;
mod simple;

use super::types::{Point, Rect, Size, is_orthogonal};
use super::{RouteOptions, RouteRequest, route};

/// Helper to create a Point.
fn p(x: i32, y: i32) -> Point {
    Point::new(x, y)
}

/// Helper to create RouteOptions with a square margin.
fn options(margin: i32) -> RouteOptions {
    RouteOptions {
        margin: Size::square(margin),
        ..RouteOptions::default()
    }
}

/// Route a request and panic with the error if it fails.
fn route_ok(request: &RouteRequest, opts: &RouteOptions) -> Vec<Point> {
    match route(request, opts) {
        Ok(path) => path,
        Err(err) => panic!(
            "route {} -> {} failed: {}",
            request.begin, request.end, err
        ),
    }
}

/// Whether an axis-aligned segment passes through the interior of a rectangle.
fn crosses_interior(a: Point, b: Point, rect: &Rect) -> bool {
    let (lo_x, hi_x) = (a.x.min(b.x), a.x.max(b.x));
    let (lo_y, hi_y) = (a.y.min(b.y), a.y.max(b.y));
    if a.y == b.y {
        a.y > rect.top() && a.y < rect.bottom() && lo_x < rect.right() && hi_x > rect.left()
    } else {
        a.x > rect.left() && a.x < rect.right() && lo_y < rect.bottom() && hi_y > rect.top()
    }
}

/// Assert that a path is orthogonal, has the expected end points and avoids `obstacles`.
fn assert_valid_path(path: &[Point], begin: Point, end: Point, obstacles: &[Rect]) {
    assert!(is_orthogonal(path), "path is not orthogonal: {:?}", path);
    assert_eq!(path.first(), Some(&begin), "path {:?}", path);
    assert_eq!(path.last(), Some(&end), "path {:?}", path);
    for w in path.windows(2) {
        for rect in obstacles {
            assert!(
                !crosses_interior(w[0], w[1], rect),
                "segment {} - {} crosses {:?} in {:?}",
                w[0],
                w[1],
                rect,
                path
            );
        }
    }
}
