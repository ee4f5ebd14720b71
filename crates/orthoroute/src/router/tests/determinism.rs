use super::*;
use crate::router::serialize::path_to_string;

/// Route a request multiple times and assert identical output.
fn assert_deterministic(request: &RouteRequest, opts: &RouteOptions, iterations: usize) {
    let reference = route(request, opts).map(|path| path_to_string(&path));
    for i in 1..iterations {
        let result = route(request, opts).map(|path| path_to_string(&path));
        assert_eq!(reference, result, "Non-deterministic result on iteration {}", i);
    }
}

#[test]
fn open_plane_deterministic() {
    let request = RouteRequest::new(p(0, 0), p(100, 100));
    assert_deterministic(&request, &RouteOptions::default(), 20);
}

#[test]
fn obstacles_deterministic() {
    let request = RouteRequest::new(p(0, 0), p(200, 40))
        .with_rectangles([Rect::new(40, -10, 20, 20), Rect::new(120, 20, 30, 60)])
        .with_points([p(90, 0)]);
    assert_deterministic(&request, &options(10), 20);
}

#[test]
fn failure_deterministic() {
    let request = RouteRequest::new(p(0, 0), p(100, 0))
        .with_rectangles([Rect::new(-20, -20, 40, 40), Rect::new(80, -20, 40, 40)]);
    assert_deterministic(&request, &options(10), 5);
}
