//! Rooms: rectangles whose border walls block travel except through doors.

use crate::component::Component;
use crate::door::Door;
use crate::geometry::{Probe, Rect};
use crate::id::EntityId;
use crate::style::Style;
use crate::world::{EntityKind, World};
use serde::{Deserialize, Serialize};

/// Room-specific state. The walls are the edges of the room's rectangle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub(crate) doors: Vec<EntityId>,
}

impl Room {
    /// Doors carved into this room, in registration order.
    pub fn doors(&self) -> &[EntityId] {
        &self.doors
    }
}

impl World {
    /// Register a room. Its walls block travel until doors are added.
    pub fn add_room(&mut self, name: impl Into<String>, rect: Rect) -> EntityId {
        let component = Component::new(name, self.clamp_rect(rect), true, Style::Room);
        self.register(component, EntityKind::Room(Room::default()))
    }
}

/// Whether a probe touches the wall of `room`.
///
/// A point must lie exactly on an edge. An area probe counts when any part
/// of it, edges included, reaches across a wall line.
pub fn is_on_border(room: &Rect, probe: &Probe) -> bool {
    let (left, right, top, bottom) = (room.left(), room.right(), room.top(), room.bottom());
    match probe.extent() {
        None => {
            let p = probe.center();
            let in_y = p.y >= top && p.y <= bottom;
            let in_x = p.x >= left && p.x <= right;
            (p.x == left && in_y) || (p.x == right && in_y) || (p.y == top && in_x) || (p.y == bottom && in_x)
        }
        Some(e) => {
            let in_x = e.left <= right && e.right >= left;
            let in_y = e.bottom >= top && e.top <= bottom;
            let on_left = e.left <= left && e.right >= left && in_y;
            let on_right = e.right >= right && e.left <= right && in_y;
            let on_top = e.top <= top && e.bottom >= top && in_x;
            let on_bottom = e.bottom >= bottom && e.top <= bottom && in_x;
            on_left || on_right || on_top || on_bottom
        }
    }
}

/// Wall test with door openings carved out: blocked when the probe touches
/// the border and no opening admits it.
pub(crate) fn border_blocks<'a>(
    room: &Rect,
    mut openings: impl Iterator<Item = (&'a Rect, &'a Door)>,
    probe: &Probe,
) -> bool {
    is_on_border(room, probe) && !openings.any(|(rect, door)| door.admits(rect, probe))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Position;

    fn room() -> Rect {
        Rect::new(10, 10, 780, 580)
    }

    #[test]
    fn points_on_each_edge() {
        let r = room();
        assert!(is_on_border(&r, &Probe::point(Position::new(10, 300))));
        assert!(is_on_border(&r, &Probe::point(Position::new(790, 300))));
        assert!(is_on_border(&r, &Probe::point(Position::new(400, 10))));
        assert!(is_on_border(&r, &Probe::point(Position::new(400, 590))));
        assert!(!is_on_border(&r, &Probe::point(Position::new(400, 300))));
        assert!(!is_on_border(&r, &Probe::point(Position::new(10, 600))));
    }

    #[test]
    fn area_reaching_a_wall() {
        let r = room();
        // 40x40 at (30, 300) spans x in [10, 50]: touches the left wall.
        assert!(is_on_border(&r, &Probe::square(Position::new(30, 300), 40)));
        assert!(!is_on_border(&r, &Probe::square(Position::new(31, 300), 40)));
        // Outside the room, near the wall.
        assert!(is_on_border(&r, &Probe::square(Position::new(-10, 300), 40)));
        assert!(!is_on_border(&r, &Probe::square(Position::new(-11, 300), 40)));
    }

    #[test]
    fn room_border_blocks_but_interior_does_not() {
        let mut w = World::new("Factory", 800, 600);
        let id = w.add_room("Room-0", room());
        assert!(w.is_obstacle(&Probe::point(Position::new(10, 300))));
        assert!(w.is_obstacle(&Probe::square(Position::new(25, 300), 40)));
        assert!(!w.is_obstacle(&Probe::square(Position::new(400, 300), 40)));
        assert!(w.room(id).unwrap().doors().is_empty());
    }

    #[test]
    fn no_openings_blocks_the_whole_border() {
        let r = room();
        let probe = Probe::point(Position::new(10, 100));
        assert!(border_blocks(&r, std::iter::empty(), &probe));
    }
}
