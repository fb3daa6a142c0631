//! The shared spatial record every placed entity carries, and the
//! [`Visitable`] capability robots navigate toward.

use crate::geometry::{Footprint, Position, Probe, Rect};
use crate::id::EntityId;
use crate::style::Style;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Component
// ---------------------------------------------------------------------------

/// Geometry, obstacle flag, visit point and display style of one entity.
///
/// Fields are only mutated through [`crate::world::World`], which clamps
/// positions to its bounds and notifies observers on every change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub(crate) name: String,
    pub(crate) rect: Rect,
    pub(crate) obstacle: bool,
    pub(crate) visit: Position,
    pub(crate) style: Style,
    pub(crate) charging: bool,
}

impl Component {
    /// A component whose visit point is its center.
    pub(crate) fn new(name: impl Into<String>, rect: Rect, obstacle: bool, style: Style) -> Self {
        Self {
            name: name.into(),
            rect,
            obstacle,
            visit: rect.center(),
            style,
            charging: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Top-left anchor.
    pub fn position(&self) -> Position {
        self.rect.anchor()
    }

    pub fn width(&self) -> i32 {
        self.rect.width
    }

    pub fn height(&self) -> i32 {
        self.rect.height
    }

    pub fn footprint(&self) -> Footprint {
        self.rect.footprint()
    }

    pub fn center(&self) -> Position {
        self.rect.center()
    }

    pub fn corners(&self) -> [Position; 4] {
        self.rect.corners()
    }

    pub fn style(&self) -> Style {
        self.style
    }

    /// Raw obstacle flag. Whether a query is actually blocked also depends on
    /// the entity kind; see [`crate::world::World::is_obstacle`].
    pub fn is_obstacle_flag(&self) -> bool {
        self.obstacle
    }

    pub fn overlaps_point(&self, p: Position) -> bool {
        self.rect.contains_point(p)
    }

    /// Strict overlap with a `size x size` square centered on `center`.
    pub fn overlaps_square(&self, center: Position, size: i32) -> bool {
        self.rect.overlaps_probe(&Probe::square(center, size))
    }

    pub fn overlaps_probe(&self, probe: &Probe) -> bool {
        self.rect.overlaps_probe(probe)
    }

    pub fn overlaps(&self, other: &Component) -> bool {
        self.rect.overlaps(&other.rect)
    }

    /// Whether `other` lies fully inside this component.
    pub fn contains(&self, other: &Component) -> bool {
        self.rect.contains(&other.rect)
    }

    /// Center-to-center distance.
    pub fn distance_to(&self, other: &Component) -> f64 {
        self.rect.distance_to(&other.rect)
    }
}

// ---------------------------------------------------------------------------
// Visitable
// ---------------------------------------------------------------------------

/// Anything a robot can be sent to.
pub trait Visitable {
    /// The coordinate a robot converges on.
    fn visit_point(&self) -> Position;

    fn visit_name(&self) -> String;

    /// Whether a robot arriving here can recharge.
    fn offers_charging(&self) -> bool;
}

impl Visitable for Position {
    fn visit_point(&self) -> Position {
        *self
    }

    fn visit_name(&self) -> String {
        self.to_string()
    }

    fn offers_charging(&self) -> bool {
        false
    }
}

impl Visitable for Component {
    fn visit_point(&self) -> Position {
        self.visit
    }

    fn visit_name(&self) -> String {
        self.name.clone()
    }

    fn offers_charging(&self) -> bool {
        self.charging
    }
}

/// An entry in a robot's visit queue.
///
/// Entity targets are resolved against the world each time they are read, so
/// a moved visit point is picked up on the next tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VisitTarget {
    Position(Position),
    Entity(EntityId),
}

impl From<Position> for VisitTarget {
    fn from(p: Position) -> Self {
        VisitTarget::Position(p)
    }
}

impl From<EntityId> for VisitTarget {
    fn from(id: EntityId) -> Self {
        VisitTarget::Entity(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine() -> Component {
        Component::new("prod", Rect::new(30, 20, 80, 80), true, Style::ProductionActive)
    }

    #[test]
    fn visit_point_defaults_to_center() {
        let c = machine();
        assert_eq!(c.visit_point(), Position::new(70, 60));
        assert_eq!(c.visit_name(), "prod");
        assert!(!c.offers_charging());
    }

    #[test]
    fn position_is_visitable() {
        let p = Position::new(450, 260);
        assert_eq!(p.visit_point(), p);
        assert_eq!(p.visit_name(), "(450,260)");
        assert!(!p.offers_charging());
    }

    #[test]
    fn overlap_queries() {
        let c = machine();
        assert!(c.overlaps_point(Position::new(30, 20)));
        assert!(c.overlaps_point(Position::new(110, 100)));
        assert!(!c.overlaps_square(Position::new(10, 60), 40));
        assert!(c.overlaps_square(Position::new(11, 60), 40));
    }

    #[test]
    fn component_containment_and_distance() {
        let room = Component::new("room", Rect::new(10, 10, 550, 320), false, Style::Room);
        let c = machine();
        assert!(room.contains(&c));
        assert!(!c.contains(&room));
        assert!(room.overlaps(&c));
        let other = Component::new("other", Rect::new(60, 60, 80, 80), true, Style::Conveyor);
        assert_eq!(c.distance_to(&other), 50.0);
    }

    #[test]
    fn visit_targets_compare_by_value() {
        let a: VisitTarget = Position::new(1, 2).into();
        let b: VisitTarget = Position::new(1, 2).into();
        assert_eq!(a, b);
    }
}
