use super::*;
use crate::router::{Strategy, route_connector};

/// Closed square of lines around `center`.
fn line_box(center: Point, half: i32) -> Vec<(Point, Point)> {
    let (l, r) = (center.x - half, center.x + half);
    let (t, b) = (center.y - half, center.y + half);
    vec![
        (p(l, t), p(r, t)),
        (p(r, t), p(r, b)),
        (p(r, b), p(l, b)),
        (p(l, b), p(l, t)),
    ]
}

#[test]
fn unobstructed_connector_uses_general_strategy() {
    let request = RouteRequest::new(p(0, 0), p(100, 100));
    let routed = route_connector(&request, &RouteOptions::default());
    assert_eq!(routed.strategy, Strategy::General);
    assert_eq!(routed.path, vec![p(0, 0), p(0, 100), p(100, 100)]);
}

#[test]
fn blocked_rectangles_fall_back_to_relaxed() {
    let request = RouteRequest::new(p(0, 0), p(100, 0))
        .with_rectangles([Rect::new(-20, -20, 40, 40), Rect::new(80, -20, 40, 40)]);
    let routed = route_connector(&request, &options(10));
    assert_eq!(routed.strategy, Strategy::Relaxed);
    assert_eq!(routed.path, vec![p(0, 0), p(100, 0)]);
}

#[test]
fn blocked_lines_fall_back_to_direct() {
    let mut lines = line_box(p(0, 0), 20);
    lines.extend(line_box(p(100, 50), 20));
    let request = RouteRequest::new(p(0, 0), p(100, 50)).with_lines(lines);
    let routed = route_connector(&request, &options(10));
    assert_eq!(routed.strategy, Strategy::Direct);
    assert_eq!(routed.path, vec![p(0, 0), p(100, 0), p(100, 50)]);
}

#[test]
fn invalid_margin_still_yields_a_path() {
    let request = RouteRequest::new(p(0, 0), p(100, 50));
    let routed = route_connector(&request, &options(0));
    // Halving a zero margin clamps it to one unit, so the relaxed attempt succeeds.
    assert_eq!(routed.strategy, Strategy::Relaxed);
    assert!(is_orthogonal(&routed.path));
}
