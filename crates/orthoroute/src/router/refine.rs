use tracing::trace;

use super::RouteError;
use super::cover::CoverSet;
use super::escape::{Budget, Escaped};
use super::segment::Segment;
use super::types::{Point, Size};

/// Upper bound on detour-removal rounds; each round only ever shortens the path.
const MAX_REFINEMENT_ROUNDS: usize = 16;

/// Join both escape chains through the meeting point.
///
/// Each chain is first collapsed onto the escape line that produced the meeting, so points
/// the chain visited after that line was drawn are dropped.
pub(crate) fn assemble(escaped: Escaped) -> Vec<Point> {
    let mut begin = collapse_corners(escaped.begin, escaped.begin_segment);
    begin.reverse();
    let end = collapse_corners(escaped.end, escaped.end_segment);

    let mut path = Vec::with_capacity(begin.len() + end.len() + 1);
    path.extend(begin);
    path.push(escaped.meeting);
    path.extend(end);
    path
}

/// Walk a chain back from its tip, keeping only the points where the path turns.
///
/// Starting from `reference`, the last chain point on the current line is kept and the line
/// becomes the perpendicular through it. The result runs from the kept point nearest the
/// meeting back to the chain's origin.
pub(crate) fn collapse_corners(mut chain: Vec<Point>, reference: Segment) -> Vec<Point> {
    let mut kept = Vec::new();
    let mut line = reference;

    while let Some(last) = chain.len().checked_sub(1) {
        let mut i = last;
        while i > 0 && !line.lies_on_line(chain[i]) {
            i -= 1;
        }
        while i > 0 && line.lies_on_line(chain[i - 1]) {
            i -= 1;
        }

        let corner = chain[i];
        kept.push(corner);
        chain.truncate(i);
        line = line.perpendicular_through(corner);
    }

    kept
}

/// Drop repeated points and the middle point of any straight run.
pub fn simplify(path: &mut Vec<Point>) {
    let mut out: Vec<Point> = Vec::with_capacity(path.len());
    for &p in path.iter() {
        if out.last() == Some(&p) {
            continue;
        }
        while out.len() >= 2 && collinear(out[out.len() - 2], out[out.len() - 1], p) {
            out.pop();
        }
        if out.last() == Some(&p) {
            continue;
        }
        out.push(p);
    }
    *path = out;
}

fn collinear(a: Point, b: Point, c: Point) -> bool {
    (a.x == b.x && b.x == c.x) || (a.y == b.y && b.y == c.y)
}

/// Shortcut detours until a full round leaves the path unchanged.
///
/// Both end points are never moved. Probe stops share one budget of `max_steps`; once it
/// is used up the path is left as it stands.
pub(crate) fn remove_detours(
    covers: &CoverSet,
    path: &mut Vec<Point>,
    margin: Size,
    max_steps: usize,
) -> Result<(), RouteError> {
    let mut budget = Budget::new(max_steps);
    for round in 0..MAX_REFINEMENT_ROUNDS {
        let bounds_changed = shortcut_through_bounds(covers, path);
        let probes_changed = shortcut_through_probes(covers, path, margin, &mut budget)?;
        if !bounds_changed && !probes_changed {
            break;
        }
        simplify(path);
        trace!(round, points = path.len(), "detours removed");
    }
    Ok(())
}

/// Connect a segment directly to a later one when their cover-bounded lines cross.
fn shortcut_through_bounds(covers: &CoverSet, path: &mut Vec<Point>) -> bool {
    let mut changed = false;
    let mut current = 0;

    while current + 1 < path.len() {
        let bound = covers.bound_segment(path[current], path[current + 1]);
        let mut other = current + 2;
        while other + 1 < path.len() {
            let crossing = bound
                .zip(covers.bound_segment(path[other], path[other + 1]))
                .and_then(|(a, b)| a.intersect(&b));
            match crossing {
                Some(p) => {
                    path.splice(current + 1..other + 1, [p]);
                    changed = true;
                    other = current + 2;
                }
                None => other += 1,
            }
        }
        current += 1;
    }

    changed
}

/// Walk each segment in margin-sized steps, leaving it sideways as soon as the perpendicular
/// through the step reaches a later segment.
fn shortcut_through_probes(
    covers: &CoverSet,
    path: &mut Vec<Point>,
    margin: Size,
    budget: &mut Budget,
) -> Result<bool, RouteError> {
    let mut changed = false;
    let mut current = 0;

    // Only segments with a non-adjacent successor can be shortcut.
    'segments: while current + 3 < path.len() {
        let (a1, a2) = (path[current], path[current + 1]);
        let Some(bound) = covers.bound_segment(a1, a2) else {
            current += 1;
            continue;
        };

        let dx = i64::from(a2.x) - i64::from(a1.x);
        let dy = i64::from(a2.y) - i64::from(a1.y);
        let (mx, my) = (i64::from(margin.width), i64::from(margin.height));
        let steps = (dx / mx).abs().max((dy / my).abs());
        let perpendicular = bound.orientation().perpendicular();

        for i in 1..=steps {
            if budget.spend().is_err() {
                return Ok(changed);
            }
            // Every stop lies between a1 and a2, so it fits the coordinate range.
            let k = Point::new(
                (i64::from(a1.x) + i * mx * dx.signum()) as i32,
                (i64::from(a1.y) + i * my * dy.signum()) as i32,
            );
            if k == a2 {
                break;
            }

            let probe = covers.span(k, perpendicular);
            for other in current + 2..path.len().saturating_sub(1) {
                let target = Segment::between(path[other], path[other + 1])?;
                if let Some(p) = probe.intersect(&target) {
                    path.splice(current + 1..other + 1, [k, p]);
                    changed = true;
                    continue 'segments;
                }
            }
        }

        current += 1;
    }

    Ok(changed)
}
