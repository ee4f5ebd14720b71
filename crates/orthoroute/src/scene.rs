use std::fmt;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::router::escape_cover::{Anchor, Edge, escape_cover};
use crate::router::types::{Point, Rect, Size};
use crate::router::{RouteOptions, RouteRequest, Routed, route_connector};

/// Clearance around shapes when a scene does not set one.
pub const DEFAULT_MARGIN: Size = Size::square(10);

#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("unknown shape '{0}'")]
    UnknownShape(String),

    #[error("endpoint needs `at`, or a `shape` with an `edge`")]
    MissingLocation,

    #[error("invalid YAML scene: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON scene: {0}")]
    Json(#[from] serde_json::Error),
}

/// A diagram: shapes, free obstacles and the connectors to route between them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    /// Drawing area; routes are kept inside it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canvas: Option<Rect>,

    /// Clearance around shapes. Routing uses twice this value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin: Option<Size>,

    #[serde(default)]
    pub shapes: Vec<Shape>,

    #[serde(default)]
    pub obstacles: Vec<Rect>,

    #[serde(default)]
    pub lines: Vec<(Point, Point)>,

    #[serde(default)]
    pub points: Vec<Point>,

    #[serde(default)]
    pub connectors: Vec<Connector>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    pub name: String,
    pub bounds: Rect,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connector {
    pub from: Endpoint,
    pub to: Endpoint,
}

/// One end of a connector.
///
/// Either a shape edge (the connector starts at the edge midpoint) or an explicit location,
/// optionally attached to a shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge: Option<Edge>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at: Option<Point>,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.shape, self.edge, self.at) {
            (Some(shape), _, Some(at)) => write!(f, "{shape}@{at}"),
            (Some(shape), Some(edge), None) => write!(f, "{shape}.{}", edge_name(edge)),
            (Some(shape), None, None) => write!(f, "{shape}"),
            (None, _, Some(at)) => write!(f, "{at}"),
            (None, _, None) => write!(f, "?"),
        }
    }
}

fn edge_name(edge: Edge) -> &'static str {
    match edge {
        Edge::Left => "left",
        Edge::Top => "top",
        Edge::Right => "right",
        Edge::Bottom => "bottom",
    }
}

/// Where an endpoint sits, and the shape it leaves from, if any.
struct Resolved<'a> {
    location: Point,
    shape: Option<(&'a Shape, Anchor)>,
}

impl Scene {
    pub fn from_yaml_str(s: &str) -> Result<Self, SceneError> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn from_json_str(s: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn margin(&self) -> Size {
        self.margin.unwrap_or(DEFAULT_MARGIN)
    }

    pub fn shape(&self, name: &str) -> Result<&Shape, SceneError> {
        self.shapes
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| SceneError::UnknownShape(name.to_string()))
    }

    /// Router options for this scene: twice the scene margin, other knobs from `base`.
    pub fn route_options(&self, base: &RouteOptions) -> RouteOptions {
        RouteOptions {
            margin: self.margin().scale(2),
            ..*base
        }
    }

    fn resolve(&self, endpoint: &Endpoint) -> Result<Resolved<'_>, SceneError> {
        let Some(name) = &endpoint.shape else {
            let location = endpoint.at.ok_or(SceneError::MissingLocation)?;
            return Ok(Resolved {
                location,
                shape: None,
            });
        };

        let shape = self.shape(name)?;
        let location = match (endpoint.at, endpoint.edge) {
            (Some(at), _) => at,
            (None, Some(edge)) => edge.midpoint(&shape.bounds),
            (None, None) => return Err(SceneError::MissingLocation),
        };
        Ok(Resolved {
            location,
            shape: Some((shape, Anchor::new(location, endpoint.edge))),
        })
    }

    /// Flatten the scene into the obstacles relevant to one connector.
    ///
    /// Shapes the connector attaches to are replaced by escape covers, so the route can only
    /// leave them through the connection point; every other shape blocks its inflated bounds.
    pub fn request(&self, connector: &Connector) -> Result<RouteRequest, SceneError> {
        let margin = self.margin();
        let source = self.resolve(&connector.from)?;
        let target = self.resolve(&connector.to)?;

        let attached = |shape: &Shape| {
            [&source.shape, &target.shape]
                .iter()
                .any(|end| end.is_some_and(|(s, _)| s.name == shape.name))
        };

        let rectangles: Vec<Rect> = self
            .shapes
            .iter()
            .filter(|s| !attached(s))
            .map(|s| s.bounds.inflate(margin))
            .chain(self.obstacles.iter().copied())
            .collect();

        let mut lines = self.lines.clone();
        match (source.shape, target.shape) {
            (Some((a, from)), Some((b, to))) if a.name == b.name => {
                lines.extend(escape_cover(a.bounds, margin, &[from, to]));
            }
            (from, to) => {
                for (shape, anchor) in from.into_iter().chain(to) {
                    lines.extend(escape_cover(shape.bounds, margin, &[anchor]));
                }
            }
        }

        Ok(RouteRequest {
            begin: source.location,
            end: target.location,
            enclosing: self.canvas,
            rectangles,
            lines,
            points: self.points.clone(),
        })
    }

    /// Route every connector in parallel, preserving connector order.
    ///
    /// Fails before routing anything if a connector references an unknown shape.
    pub fn route_all(&self, base: &RouteOptions) -> Result<Vec<Routed>, SceneError> {
        let requests = self
            .connectors
            .iter()
            .map(|c| self.request(c))
            .collect::<Result<Vec<_>, _>>()?;
        let options = self.route_options(base);
        debug!(
            connectors = requests.len(),
            margin = %options.margin,
            "routing scene"
        );

        Ok(requests
            .par_iter()
            .map(|request| route_connector(request, &options))
            .collect())
    }
}
