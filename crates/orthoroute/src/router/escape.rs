use tracing::trace;

use super::RouteError;
use super::cover::CoverSet;
use super::segment::Segment;
use super::types::{Orientation, Point, Side, Size};

/// Which end of the connector a chain grows from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Role {
    Begin,
    End,
}

impl Role {
    fn other(self) -> Role {
        match self {
            Role::Begin => Role::End,
            Role::End => Role::Begin,
        }
    }
}

/// Escape points grown from one end point, with the escape lines implied by each of them.
#[derive(Debug, Clone)]
pub(crate) struct Chain {
    origin: Point,
    pub points: Vec<Point>,
    pub horizontal: Vec<Segment>,
    pub vertical: Vec<Segment>,
    pub stuck: bool,
}

impl Chain {
    fn new(origin: Point) -> Self {
        Self {
            origin,
            points: vec![origin],
            horizontal: Vec::new(),
            vertical: Vec::new(),
            stuck: false,
        }
    }

    fn tip(&self) -> Point {
        self.points.last().copied().unwrap_or(self.origin)
    }

    fn push_escape_line(&mut self, line: Segment) {
        match line.orientation() {
            Orientation::Horizontal => self.horizontal.push(line),
            Orientation::Vertical => self.vertical.push(line),
        }
    }
}

/// Both chains plus the role currently advancing.
///
/// Swapping roles flips the tag; the chains themselves never move.
#[derive(Debug, Clone)]
pub(crate) struct Chains {
    begin: Chain,
    end: Chain,
    active: Role,
}

impl Chains {
    fn new(begin: Point, end: Point) -> Self {
        Self {
            begin: Chain::new(begin),
            end: Chain::new(end),
            active: Role::Begin,
        }
    }

    /// The advancing chain and the waiting one.
    fn split(&mut self) -> (&mut Chain, &mut Chain) {
        match self.active {
            Role::Begin => (&mut self.begin, &mut self.end),
            Role::End => (&mut self.end, &mut self.begin),
        }
    }

    fn swap(&mut self) {
        self.active = self.active.other();
    }

    fn finish(self, crossing: Crossing) -> Escaped {
        let (begin_segment, end_segment) = match self.active {
            Role::Begin => (crossing.active_segment, crossing.waiting_segment),
            Role::End => (crossing.waiting_segment, crossing.active_segment),
        };
        Escaped {
            begin: self.begin.points,
            end: self.end.points,
            meeting: crossing.point,
            begin_segment,
            end_segment,
        }
    }
}

/// Where an escape line of the advancing chain crossed one of the waiting chain.
#[derive(Debug, Clone, Copy)]
struct Crossing {
    point: Point,
    active_segment: Segment,
    waiting_segment: Segment,
}

/// Successful outcome of the escape search.
///
/// `begin_segment` and `end_segment` are the escape lines of each chain that pass through
/// `meeting`; corner collapsing starts from them.
#[derive(Debug, Clone)]
pub(crate) struct Escaped {
    pub begin: Vec<Point>,
    pub end: Vec<Point>,
    pub meeting: Point,
    pub begin_segment: Segment,
    pub end_segment: Segment,
}

/// Escape steps and probe stops the search may still take.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Budget {
    limit: usize,
    spent: usize,
}

impl Budget {
    pub fn new(limit: usize) -> Self {
        Self { limit, spent: 0 }
    }

    pub fn spent(&self) -> usize {
        self.spent
    }

    /// Take one unit, or fail with `IterationLimit` once none are left.
    pub fn spend(&mut self) -> Result<(), RouteError> {
        if self.spent >= self.limit {
            return Err(RouteError::IterationLimit(self.limit));
        }
        self.spent += 1;
        Ok(())
    }
}

/// Outcome of probing from an intermediate point in Escape Process II.
enum Probe {
    Crossing(Crossing),
    Escape(Point),
}

/// Grow escape chains from `begin` and `end` in alternation until their escape lines cross.
///
/// Returns `NoRoute` once neither chain can move, or `IterationLimit` when the budget runs
/// out first. Every chain step and every Escape Process II probe stop costs one unit.
pub(crate) fn escape(
    covers: &mut CoverSet,
    begin: Point,
    end: Point,
    margin: Size,
    max_iterations: usize,
) -> Result<Escaped, RouteError> {
    covers.clear_used_lines();
    let mut chains = Chains::new(begin, end);
    let mut budget = Budget::new(max_iterations);

    loop {
        budget.spend()?;
        let step = budget.spent();
        let role = chains.active;
        let (active, waiting) = chains.split();
        if active.stuck {
            if waiting.stuck {
                return Err(RouteError::NoRoute);
            }
            chains.swap();
            continue;
        }

        let tip = active.tip();
        if let Some(crossing) = advance(covers, active, waiting, margin, &mut budget)? {
            trace!(step, ?role, ?tip, meeting = ?crossing.point, "escape chains met");
            return Ok(chains.finish(crossing));
        }
        trace!(step, ?role, ?tip, stuck = active.stuck, "escape step");
        chains.swap();
    }
}

/// One step of the advancing chain.
fn advance(
    covers: &mut CoverSet,
    active: &mut Chain,
    waiting: &Chain,
    margin: Size,
    budget: &mut Budget,
) -> Result<Option<Crossing>, RouteError> {
    let z = active.tip();

    let h = covers.horizontal_span(z);
    let v = covers.vertical_span(z);
    active.horizontal.push(h);
    active.vertical.push(v);

    if let Some(crossing) = find_crossing(&h, &v, waiting) {
        return Ok(Some(crossing));
    }

    // Escape Process I: step sideways past the nearest cover extremity.
    if let Some(escape) = escape_process_i(covers, z, &v, Orientation::Horizontal, margin)? {
        active.points.push(escape);
        return Ok(None);
    }
    if let Some(escape) = escape_process_i(covers, z, &h, Orientation::Vertical, margin)? {
        active.points.push(escape);
        return Ok(None);
    }

    // Escape Process II: walk back from each cover toward z, retrying from every stop.
    let mut probes: Vec<(Side, Point)> = Side::PROBE_ORDER
        .iter()
        .filter_map(|&side| covers.cover(z, side).map(|c| (side, probe_start(z, side, &c))))
        .collect();

    loop {
        let mut advanced = false;
        for (side, probe) in probes.iter_mut() {
            let side = *side;
            let step = match side.cover_orientation() {
                Orientation::Vertical => margin.width,
                Orientation::Horizontal => margin.height,
            };
            *probe = probe.step(side.opposite(), step);
            if side.distance(z, side_coordinate(side, *probe)) <= 0 {
                continue;
            }
            advanced = true;
            budget.spend()?;

            let order = match side.cover_orientation() {
                Orientation::Vertical => Orientation::Horizontal,
                Orientation::Horizontal => Orientation::Vertical,
            };
            match escape_process_ii(covers, order, active, waiting, *probe, margin)? {
                Some(Probe::Crossing(crossing)) => return Ok(Some(crossing)),
                Some(Probe::Escape(escape)) => {
                    covers.add_used_escape_line(Segment::between(z, *probe)?);
                    covers.add_used_escape_line(Segment::between(*probe, escape)?);
                    active.points.push(escape);
                    return Ok(None);
                }
                None => {}
            }
        }
        if !advanced {
            break;
        }
    }

    active.stuck = true;
    Ok(None)
}

/// First point of the probe walk: the projection of `z` onto the cover's line.
fn probe_start(z: Point, side: Side, cover: &Segment) -> Point {
    match side.cover_orientation() {
        Orientation::Vertical => Point::new(cover.line(), z.y),
        Orientation::Horizontal => Point::new(z.x, cover.line()),
    }
}

fn side_coordinate(side: Side, p: Point) -> i32 {
    match side.cover_orientation() {
        Orientation::Vertical => p.x,
        Orientation::Horizontal => p.y,
    }
}

fn find_crossing(h: &Segment, v: &Segment, waiting: &Chain) -> Option<Crossing> {
    for segment in &waiting.vertical {
        if let Some(point) = h.intersect(segment) {
            return Some(Crossing {
                point,
                active_segment: *h,
                waiting_segment: *segment,
            });
        }
    }
    for segment in &waiting.horizontal {
        if let Some(point) = v.intersect(segment) {
            return Some(Crossing {
                point,
                active_segment: *v,
                waiting_segment: *segment,
            });
        }
    }
    None
}

/// Look for an escape point on `escape_line` just past one of the extremities of the covers
/// bounding `z`.
///
/// With `Orientation::Horizontal` the left/right covers are escaped by moving vertically;
/// with `Orientation::Vertical` the lower/upper covers are escaped by moving horizontally.
/// Extremities are tried nearest first.
fn escape_process_i(
    covers: &mut CoverSet,
    z: Point,
    escape_line: &Segment,
    orientation: Orientation,
    margin: Size,
) -> Result<Option<Point>, RouteError> {
    let sides = match orientation {
        Orientation::Horizontal => [Side::Left, Side::Right],
        Orientation::Vertical => [Side::Lower, Side::Upper],
    };

    let mut extremities: Vec<(Segment, Point)> = Vec::with_capacity(4);
    for side in sides {
        if let Some(cover) = covers.cover(z, side) {
            extremities.extend(cover.start().into_iter().chain(cover.end()).map(|p| (cover, p)));
        }
    }
    extremities.sort_by_key(|(_, p)| z.distance_sq(*p));

    for (cover, extremity) in extremities {
        let mut direction = signum(extremity, z);
        let sideways = match orientation {
            Orientation::Vertical => direction.x,
            Orientation::Horizontal => direction.y,
        };
        if sideways == 0 {
            // Extremity level with z: the side to pass on is the one the cover ends toward.
            direction = signum(cover.extend_outwards(extremity), z);
        }

        let (side, escape) = match orientation {
            Orientation::Vertical => (
                if direction.y < 0 { Side::Lower } else { Side::Upper },
                extremity
                    .x
                    .checked_add(direction.x * margin.width)
                    .map(|x| Point::new(x, z.y)),
            ),
            Orientation::Horizontal => (
                if direction.x < 0 { Side::Left } else { Side::Right },
                extremity
                    .y
                    .checked_add(direction.y * margin.height)
                    .map(|y| Point::new(z.x, y)),
            ),
        };
        // Past the edge of the coordinate range there is nothing to escape to.
        let Some(escape) = escape else {
            continue;
        };

        if !covers.escape_line_has_been_used(escape)
            && escape_line.contains_point(escape)
            && escape_line.start() != Some(escape)
            && escape_line.end() != Some(escape)
            && covers.is_escape_point(z, escape, side)
        {
            covers.add_used_escape_line(Segment::between(z, escape)?);
            return Ok(Some(escape));
        }
    }

    Ok(None)
}

/// Retry the crossing test and Escape Process I from the intermediate point `r`.
///
/// `order` decides which escape line is tried first. On success `r` joins the chain.
fn escape_process_ii(
    covers: &mut CoverSet,
    order: Orientation,
    active: &mut Chain,
    waiting: &Chain,
    r: Point,
    margin: Size,
) -> Result<Option<Probe>, RouteError> {
    let h = covers.horizontal_span(r);
    let v = covers.vertical_span(r);

    if let Some(crossing) = find_crossing(&h, &v, waiting) {
        active.points.push(r);
        return Ok(Some(Probe::Crossing(crossing)));
    }

    let attempts = match order {
        Orientation::Horizontal => [(v, Orientation::Horizontal), (h, Orientation::Vertical)],
        Orientation::Vertical => [(h, Orientation::Vertical), (v, Orientation::Horizontal)],
    };
    for (line, orientation) in attempts {
        if let Some(escape) = escape_process_i(covers, r, &line, orientation, margin)? {
            active.push_escape_line(line);
            active.points.push(r);
            return Ok(Some(Probe::Escape(escape)));
        }
    }

    Ok(None)
}

/// Per-axis sign of `p - origin`.
fn signum(p: Point, origin: Point) -> Point {
    Point::new(p.x.cmp(&origin.x) as i32, p.y.cmp(&origin.y) as i32)
}
