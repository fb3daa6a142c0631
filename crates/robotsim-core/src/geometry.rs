//! Integer plane geometry shared by every entity.
//!
//! Entities are axis-aligned rectangles anchored at their top-left corner.
//! Obstacle queries use a [`Probe`]: either a single point or a rectangle
//! *centered* on a point (the footprint of a robot standing there).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A point on the floor plan. Equality and hashing are by coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance, exact.
    pub fn squared_distance(&self, other: &Position) -> i64 {
        let dx = (other.x - self.x) as i64;
        let dy = (other.y - self.y) as i64;
        dx * dx + dy * dy
    }

    /// Euclidean distance.
    pub fn distance(&self, other: &Position) -> f64 {
        (self.squared_distance(other) as f64).sqrt()
    }

    /// Offset by `(dx, dy)`.
    pub fn offset(&self, dx: i32, dy: i32) -> Position {
        Position::new(self.x + dx, self.y + dy)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

// ---------------------------------------------------------------------------
// Bounds
// ---------------------------------------------------------------------------

/// Inclusive clamp range on one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AxisRange {
    pub min: i32,
    pub max: i32,
}

impl AxisRange {
    /// Returns `None` when `min > max`, meaning the axis is unbounded.
    pub fn new(min: i32, max: i32) -> Option<Self> {
        (min <= max).then_some(Self { min, max })
    }

    pub fn clamp(&self, v: i32) -> i32 {
        v.clamp(self.min, self.max)
    }

    pub fn contains(&self, v: i32) -> bool {
        v >= self.min && v <= self.max
    }
}

/// Coordinate clamp applied to every position a world creates or mutates.
///
/// Each axis is clamped independently; an axis without a range is left as is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: Option<AxisRange>,
    pub y: Option<AxisRange>,
}

impl Bounds {
    /// No clamping on either axis.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Clamp to `[min_x, max_x] x [min_y, max_y]`. An inverted range leaves
    /// that axis unbounded.
    pub fn new(min_x: i32, max_x: i32, min_y: i32, max_y: i32) -> Self {
        Self {
            x: AxisRange::new(min_x, max_x),
            y: AxisRange::new(min_y, max_y),
        }
    }

    /// Clamp a raw coordinate pair into range.
    pub fn position(&self, x: i32, y: i32) -> Position {
        Position::new(
            self.x.map_or(x, |r| r.clamp(x)),
            self.y.map_or(y, |r| r.clamp(y)),
        )
    }

    pub fn clamp(&self, p: Position) -> Position {
        self.position(p.x, p.y)
    }

    pub fn contains(&self, p: Position) -> bool {
        self.x.is_none_or(|r| r.contains(p.x)) && self.y.is_none_or(|r| r.contains(p.y))
    }
}

// ---------------------------------------------------------------------------
// Footprint / Probe
// ---------------------------------------------------------------------------

/// Width and height of an agent. Robots with equal footprints share a
/// navigation graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Footprint {
    pub width: i32,
    pub height: i32,
}

impl Footprint {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub const fn square(size: i32) -> Self {
        Self::new(size, size)
    }
}

/// The shape of an obstacle query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    /// A single point.
    Point(Position),
    /// A rectangle of `footprint` centered on `center`.
    Area { center: Position, footprint: Footprint },
}

/// Edges of a probe rectangle: `left = x - w/2`, `right = x + w/2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extent {
    pub left: i32,
    pub right: i32,
    pub top: i32,
    pub bottom: i32,
}

impl Probe {
    pub fn point(p: Position) -> Self {
        Probe::Point(p)
    }

    pub fn square(center: Position, size: i32) -> Self {
        Probe::area(center, Footprint::square(size))
    }

    pub fn area(center: Position, footprint: Footprint) -> Self {
        Probe::Area { center, footprint }
    }

    pub fn center(&self) -> Position {
        match *self {
            Probe::Point(p) => p,
            Probe::Area { center, .. } => center,
        }
    }

    /// Edges of an area probe; `None` for a point.
    pub fn extent(&self) -> Option<Extent> {
        match *self {
            Probe::Point(_) => None,
            Probe::Area { center, footprint } => Some(Extent {
                left: center.x - footprint.width / 2,
                right: center.x + footprint.width / 2,
                top: center.y - footprint.height / 2,
                bottom: center.y + footprint.height / 2,
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Rect
// ---------------------------------------------------------------------------

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn anchor(&self) -> Position {
        Position::new(self.x, self.y)
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn footprint(&self) -> Footprint {
        Footprint::new(self.width, self.height)
    }

    /// Corners in the order top-left, top-right, bottom-left, bottom-right.
    pub fn corners(&self) -> [Position; 4] {
        [
            Position::new(self.left(), self.top()),
            Position::new(self.right(), self.top()),
            Position::new(self.left(), self.bottom()),
            Position::new(self.right(), self.bottom()),
        ]
    }

    pub fn center(&self) -> Position {
        Position::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Center-to-center Euclidean distance.
    pub fn distance_to(&self, other: &Rect) -> f64 {
        self.center().distance(&other.center())
    }

    /// Point test, edges included.
    pub fn contains_point(&self, p: Position) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }

    /// Strict overlap with another rectangle (touching edges do not count).
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    fn overlaps_extent(&self, e: &Extent) -> bool {
        self.left() < e.right && self.right() > e.left && self.top() < e.bottom && self.bottom() > e.top
    }

    /// Geometric test for an obstacle query: inclusive for points, strict
    /// overlap for centered areas.
    pub fn overlaps_probe(&self, probe: &Probe) -> bool {
        match probe.extent() {
            None => self.contains_point(probe.center()),
            Some(e) => self.overlaps_extent(&e),
        }
    }

    /// Whether `other` lies fully inside (all four corners, edges included).
    pub fn contains(&self, other: &Rect) -> bool {
        other.corners().iter().all(|c| self.contains_point(*c))
    }

    /// Visit point next to this rectangle, pushed outward from the named
    /// side by `clearance / 2 + 1`.
    pub fn anchor_point(&self, anchor: VisitAnchor, clearance: i32) -> Position {
        let margin = clearance / 2 + 1;
        let (x, y, w, h) = (self.x, self.y, self.width, self.height);
        let cx = x + (w + 1) / 2;
        let cy = y + (h + 1) / 2;
        match anchor {
            VisitAnchor::Top => Position::new(cx, y - margin),
            VisitAnchor::Bottom => Position::new(cx, y + h + margin),
            VisitAnchor::Left => Position::new(x - margin, cy),
            VisitAnchor::Right => Position::new(x + w + margin, cy),
            VisitAnchor::Center => Position::new(cx, cy),
            VisitAnchor::TopLeft => Position::new(x - margin, y - margin),
            VisitAnchor::TopRight => Position::new(x + w + margin, y - margin),
            VisitAnchor::BottomLeft => Position::new(x - margin, y + h + margin),
            VisitAnchor::BottomRight => Position::new(x + w + margin, y + h + margin),
        }
    }
}

// ---------------------------------------------------------------------------
// Visit anchors
// ---------------------------------------------------------------------------

/// Named side or corner used to place a visit point around an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisitAnchor {
    Top,
    Bottom,
    Left,
    Right,
    Center,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl VisitAnchor {
    pub fn name(self) -> &'static str {
        match self {
            VisitAnchor::Top => "top",
            VisitAnchor::Bottom => "bottom",
            VisitAnchor::Left => "left",
            VisitAnchor::Right => "right",
            VisitAnchor::Center => "center",
            VisitAnchor::TopLeft => "d-top-left",
            VisitAnchor::TopRight => "d-top-right",
            VisitAnchor::BottomLeft => "d-bottom-left",
            VisitAnchor::BottomRight => "d-bottom-right",
        }
    }
}

/// Errors from geometric helpers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeometryError {
    #[error("unknown visit anchor '{0}'")]
    UnknownAnchor(String),
}

impl FromStr for VisitAnchor {
    type Err = GeometryError;

    /// Case-insensitive. Diagonal corners carry a `d-` prefix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "top" => Ok(VisitAnchor::Top),
            "bottom" => Ok(VisitAnchor::Bottom),
            "left" => Ok(VisitAnchor::Left),
            "right" => Ok(VisitAnchor::Right),
            "center" => Ok(VisitAnchor::Center),
            "d-top-left" => Ok(VisitAnchor::TopLeft),
            "d-top-right" => Ok(VisitAnchor::TopRight),
            "d-bottom-left" => Ok(VisitAnchor::BottomLeft),
            "d-bottom-right" => Ok(VisitAnchor::BottomRight),
            _ => Err(GeometryError::UnknownAnchor(s.to_string())),
        }
    }
}
