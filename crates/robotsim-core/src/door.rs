//! Doors: openings carved into a room's wall.
//!
//! A door is never an obstacle on its own. It only tells its room which part
//! of the wall may be crossed. The open/closed flag follows robots standing in
//! the doorway and is purely cosmetic.

use crate::component::Component;
use crate::error::{PlacementError, SimError};
use crate::geometry::{Position, Probe, Rect};
use crate::id::EntityId;
use crate::style::Style;
use crate::world::{Entity, EntityKind, Kind, World};
use serde::{Deserialize, Serialize};

/// Which wall a door sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// On the left or right wall; the opening runs along y.
    Vertical,
    /// On the top or bottom wall; the opening runs along x.
    Horizontal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Door {
    pub(crate) room: EntityId,
    pub(crate) open: bool,
    pub(crate) orientation: Orientation,
}

impl Door {
    pub(crate) fn new(room: EntityId, orientation: Orientation) -> Self {
        Self {
            room,
            open: false,
            orientation,
        }
    }

    /// The room this door belongs to.
    pub fn room(&self) -> EntityId {
        self.room
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Whether the opening `rect` lets the probe through.
    ///
    /// Points use a half-open test on the opening. Areas must reach across
    /// the opening's thickness and fit inside it along the wall: a vertical
    /// door checks the y range, a horizontal one the x range.
    pub fn admits(&self, rect: &Rect, probe: &Probe) -> bool {
        let (left, right, top, bottom) = (rect.left(), rect.right(), rect.top(), rect.bottom());
        match *probe {
            Probe::Point(p) => p.x >= left && p.x < right && p.y >= top && p.y < bottom,
            Probe::Area { center, footprint } => {
                let (w, h) = (footprint.width, footprint.height);
                match self.orientation {
                    Orientation::Vertical => {
                        let across = center.x - w / 2 <= right && center.x + w / 2 >= left;
                        let probe_top = center.y - h / 2;
                        let probe_bottom = center.y + (h + 1) / 2;
                        across && probe_top >= top && probe_bottom <= bottom
                    }
                    Orientation::Horizontal => {
                        let across = center.y - h / 2 <= bottom && center.y + h / 2 >= top;
                        let probe_left = center.x - w / 2;
                        let probe_right = center.x + (w + 1) / 2;
                        across && probe_left >= left && probe_right <= right
                    }
                }
            }
        }
    }
}

/// Opening geometry for a door requested at `at` on `room`'s wall.
///
/// The opening is `thickness` wide across the wall, centered on it, and
/// `size` long along it, clamped so it never runs past the far corner of
/// the wall. Returns `None` when `at` is not on the wall.
pub(crate) fn opening(room: &Rect, at: Position, size: i32, thickness: i32) -> Option<(Rect, Orientation)> {
    let (x, y) = (at.x, at.y);
    let in_y = y >= room.top() && y <= room.bottom();
    let in_x = x >= room.left() && x <= room.right();
    if (x == room.left() || x == room.right()) && in_y {
        let height = size.min(room.height - (y - room.y));
        Some((Rect::new(x - thickness / 2, y, thickness, height), Orientation::Vertical))
    } else if (y == room.top() || y == room.bottom()) && in_x {
        let width = size.min(room.width - (x - room.x));
        Some((Rect::new(x, y - thickness / 2, width, thickness), Orientation::Horizontal))
    } else {
        None
    }
}

impl World {
    /// Carve a door of length `size` into `room`'s wall at `at`.
    ///
    /// Fails with [`PlacementError::DoorNotOnBorder`] when `at` (after
    /// clamping) is not on the wall; nothing is registered in that case.
    pub fn add_door(&mut self, room: EntityId, at: Position, size: i32) -> Result<EntityId, PlacementError> {
        let (room_rect, room_name, n) = match self.entity(room) {
            Some(e) => match e.as_room() {
                Some(r) => (e.component().rect(), e.component().name().to_string(), r.doors.len()),
                None => return Err(PlacementError::NotARoom(room)),
            },
            None => return Err(PlacementError::NotARoom(room)),
        };
        let at = self.bounds().clamp(at);
        let thickness = self.defaults().door_thickness;
        let Some((rect, orientation)) = opening(&room_rect, at, size, thickness) else {
            return Err(PlacementError::DoorNotOnBorder {
                x: at.x,
                y: at.y,
                room: room_name,
            });
        };
        let component = Component::new(format!("{room_name}-door-{n}"), rect, false, Style::DoorClosed);
        let id = self.register(component, EntityKind::Door(Door::new(room, orientation)));
        if let Ok(r) = self.typed_mut(room, Kind::Room, Entity::as_room_mut) {
            r.doors.push(id);
        }
        Ok(id)
    }

    /// Set the display flag. Returns whether it changed; notifies only then.
    pub fn set_door_open(&mut self, id: EntityId, open: bool) -> Result<bool, SimError> {
        let d = self.typed_mut(id, Kind::Door, Entity::as_door_mut)?;
        if d.open == open {
            return Ok(false);
        }
        d.open = open;
        self.component_mut(id)?.style = if open { Style::DoorOpen } else { Style::DoorClosed };
        self.notify_observers()?;
        Ok(true)
    }
}

/// Open while any robot overlaps the doorway, closed otherwise.
pub(crate) fn behave(world: &mut World, id: EntityId) -> Result<(), SimError> {
    let rect = world.entity_component(id)?.rect();
    let occupied = world
        .robots()
        .iter()
        .filter_map(|&r| world.entity(r))
        .any(|e| e.component().rect().overlaps(&rect));
    world.set_door_open(id, occupied)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Footprint;
    use slotmap::SlotMap;

    fn room_id() -> EntityId {
        let mut sm: SlotMap<EntityId, ()> = SlotMap::with_key();
        sm.insert(())
    }

    #[test]
    fn vertical_opening_is_clamped_to_the_wall() {
        let room = Rect::new(10, 10, 550, 320);
        let (rect, orientation) = opening(&room, Position::new(10, 250), 120, 5).unwrap();
        assert_eq!(orientation, Orientation::Vertical);
        assert_eq!(rect, Rect::new(8, 250, 5, 80));
    }

    #[test]
    fn horizontal_opening_keeps_requested_size_when_it_fits() {
        let room = Rect::new(10, 10, 550, 320);
        let (rect, orientation) = opening(&room, Position::new(40, 330), 120, 5).unwrap();
        assert_eq!(orientation, Orientation::Horizontal);
        assert_eq!(rect, Rect::new(40, 328, 120, 5));
    }

    #[test]
    fn off_border_request_is_rejected() {
        let room = Rect::new(10, 10, 550, 320);
        assert!(opening(&room, Position::new(100, 100), 120, 5).is_none());
        assert!(opening(&room, Position::new(10, 400), 120, 5).is_none());
    }

    #[test]
    fn door_requested_off_the_wall_is_not_registered() {
        let mut w = World::new("Factory", 1200, 700);
        let room = w.add_room("Room-0", Rect::new(10, 10, 550, 320));
        let err = w.add_door(room, Position::new(100, 100), 120).unwrap_err();
        assert_eq!(
            err,
            PlacementError::DoorNotOnBorder {
                x: 100,
                y: 100,
                room: "Room-0".into()
            }
        );
        assert_eq!(w.len(), 1);
        assert!(w.room(room).unwrap().doors().is_empty());
    }

    #[test]
    fn door_opens_the_wall_it_sits_on() {
        let mut w = World::new("Factory", 1200, 700);
        let room = w.add_room("Room-0", Rect::new(10, 10, 550, 320));
        let on_wall = Probe::point(Position::new(60, 330));
        assert!(w.is_obstacle(&on_wall));

        let door = w.add_door(room, Position::new(40, 330), 120).unwrap();
        assert_eq!(w.room(room).unwrap().doors(), &[door]);
        assert!(!w.is_obstacle(&on_wall));
        assert!(!w.is_obstacle(&Probe::square(Position::new(100, 330), 40)));
        // Beyond the opening the wall still blocks.
        assert!(w.is_obstacle(&Probe::point(Position::new(200, 330))));
        // A door never blocks on its own account off the wall.
        assert!(!w.entity_is_obstacle(door, &Probe::point(Position::new(100, 200))));
    }

    #[test]
    fn door_flag_follows_robots_and_never_gates_travel() {
        let mut w = World::new("Factory", 1200, 700);
        let room = w.add_room("Room-0", Rect::new(10, 10, 550, 320));
        let door = w.add_door(room, Position::new(40, 330), 120).unwrap();
        let robot = w.add_robot(crate::robot::RobotSpec::new("r", Position::new(300, 100)));
        let through = Probe::square(Position::new(100, 330), 40);

        w.tick().unwrap();
        assert!(!w.door(door).unwrap().is_open());
        assert!(!w.is_obstacle(&through));

        w.set_center(robot, Position::new(100, 330)).unwrap();
        w.tick().unwrap();
        assert!(w.door(door).unwrap().is_open());
        assert_eq!(w.entity_component(door).unwrap().style(), Style::DoorOpen);
        assert!(!w.is_obstacle(&through));
    }

    #[test]
    fn door_leaves_the_opposite_wall_solid() {
        let mut w = World::new("Factory", 1200, 700);
        let room = w.add_room("Room-0", Rect::new(10, 10, 550, 320));
        let top_wall = Probe::square(Position::new(100, 10), 40);
        let left_wall = Probe::square(Position::new(10, 150), 40);
        assert!(w.is_obstacle(&top_wall));
        assert!(w.is_obstacle(&left_wall));

        w.add_door(room, Position::new(40, 330), 120).unwrap();
        w.add_door(room, Position::new(560, 100), 120).unwrap();
        assert!(w.is_obstacle(&top_wall));
        assert!(w.is_obstacle(&left_wall));
        assert!(!w.is_obstacle(&Probe::square(Position::new(100, 330), 40)));
        assert!(!w.is_obstacle(&Probe::square(Position::new(560, 160), 40)));
    }

    #[test]
    fn point_admission_is_half_open() {
        let door = Door::new(room_id(), Orientation::Horizontal);
        let rect = Rect::new(40, 328, 120, 5);
        assert!(door.admits(&rect, &Probe::point(Position::new(40, 330))));
        assert!(door.admits(&rect, &Probe::point(Position::new(159, 332))));
        assert!(!door.admits(&rect, &Probe::point(Position::new(160, 330))));
    }

    #[test]
    fn area_admission_checks_the_axis_along_the_wall() {
        let door = Door::new(room_id(), Orientation::Horizontal);
        let rect = Rect::new(40, 328, 120, 5);
        let robot = Footprint::square(40);
        assert!(door.admits(&rect, &Probe::area(Position::new(60, 330), robot)));
        assert!(door.admits(&rect, &Probe::area(Position::new(140, 310), robot)));
        // Fits along the wall but stops short of the opening.
        assert!(!door.admits(&rect, &Probe::area(Position::new(140, 300), robot)));
        assert!(!door.admits(&rect, &Probe::area(Position::new(59, 330), robot)));
        assert!(!door.admits(&rect, &Probe::area(Position::new(141, 330), robot)));
    }
}
