use super::*;

#[test]
fn straight_horizontal_in_open_plane() {
    let request = RouteRequest::new(p(0, 0), p(100, 0));
    let path = route_ok(&request, &RouteOptions::default());
    assert_eq!(path, vec![p(0, 0), p(100, 0)]);
}

#[test]
fn straight_vertical_in_open_plane() {
    let request = RouteRequest::new(p(0, 0), p(0, -60));
    let path = route_ok(&request, &RouteOptions::default());
    assert_eq!(path, vec![p(0, 0), p(0, -60)]);
}

#[test]
fn diagonal_end_points_get_one_bend() {
    let request = RouteRequest::new(p(0, 0), p(100, 100));
    let path = route_ok(&request, &RouteOptions::default());
    assert_eq!(path, vec![p(0, 0), p(0, 100), p(100, 100)]);
}

#[test]
fn distant_lines_leave_the_path_alone() {
    let request = RouteRequest::new(p(0, 0), p(100, 0))
        .with_lines([(p(0, 500), p(100, 500)), (p(-300, -10), p(-300, 10))]);
    let path = route_ok(&request, &RouteOptions::default());
    assert_eq!(path, vec![p(0, 0), p(100, 0)]);
}

#[test]
fn equal_end_points_give_single_point() {
    let request = RouteRequest::new(p(7, 7), p(7, 7)).with_rectangles([Rect::new(0, 0, 40, 40)]);
    let path = route_ok(&request, &RouteOptions::default());
    assert_eq!(path, vec![p(7, 7)]);
}
