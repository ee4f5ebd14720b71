//! Obstacle-avoiding orthogonal connector routing.
//!
//! [`router::route`] computes one path between two points around rectangle, line and point
//! obstacles; [`router::route_connector`] wraps it with progressively simpler fallbacks so a
//! connector always gets drawn. [`scene::Scene`] turns a diagram description into routing
//! requests.

pub mod router;
pub mod scene;

pub use router::types::{Point, Rect, Size};
pub use router::{
    RouteError, RouteOptions, RouteRequest, Routed, Strategy, route, route_connector,
};
