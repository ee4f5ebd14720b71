use super::types::{Point, Size};

/// Why a single routing attempt failed.
///
/// `route_connector` swallows these and falls back to a cheaper strategy; `route` hands
/// them to the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("segment from {a} to {b} is not axis-aligned")]
    NotAxisAligned { a: Point, b: Point },

    #[error("routing margin must be at least 1x1, got {0}")]
    InvalidMargin(Size),

    #[error("no obstacle-free route exists")]
    NoRoute,

    #[error("escape search gave up after {0} steps")]
    IterationLimit(usize),

    #[error("refined path is not orthogonal")]
    NotOrthogonal,
}
