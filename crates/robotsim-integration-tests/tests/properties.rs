//! Property tests across crates: door openings against the walls they do
//! not sit on, and scene files that must build the same world in every
//! format.

use proptest::prelude::*;
use robotsim_core::geometry::{Position, Probe, Rect};
use robotsim_core::world::World;
use robotsim_data::load_scene;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

// ===========================================================================
// Helpers
// ===========================================================================

static CASE: AtomicUsize = AtomicUsize::new(0);

fn case_dir() -> PathBuf {
    let n = CASE.fetch_add(1, Ordering::Relaxed);
    let dir = std::env::temp_dir().join(format!("robotsim_prop_{}_{n}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

/// Room with sides of at least 60, inside a 1000x1000 floor.
fn arb_room() -> impl Strategy<Value = Rect> {
    (20..300i32, 20..300i32, 60..400i32, 60..400i32).prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
}

/// Door position on `side` (left, right, top, bottom) plus the point on the
/// opposite wall facing the opening.
fn door_and_facing(room: Rect, side: u8, offset: i32, size: i32, k: i32) -> (Position, Position) {
    match side {
        0 | 1 => {
            let offset = 1 + offset % (room.height - 1);
            let opening = size.min(room.height - offset);
            let y = room.top() + offset;
            let (door_x, far_x) = if side == 0 {
                (room.left(), room.right())
            } else {
                (room.right(), room.left())
            };
            (Position::new(door_x, y), Position::new(far_x, y + k % opening))
        }
        _ => {
            let offset = 1 + offset % (room.width - 1);
            let opening = size.min(room.width - offset);
            let x = room.left() + offset;
            let (door_y, far_y) = if side == 2 {
                (room.top(), room.bottom())
            } else {
                (room.bottom(), room.top())
            };
            (Position::new(x, door_y), Position::new(x + k % opening, far_y))
        }
    }
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// A door opens its own wall and leaves the facing wall solid, for points
    /// and for robot-sized areas.
    #[test]
    fn door_never_opens_the_facing_wall(
        room in arb_room(),
        side in 0..4u8,
        offset in 0..1000i32,
        size in 1..150i32,
        k in 0..1000i32,
    ) {
        let mut w = World::new("Factory", 1000, 1000);
        let id = w.add_room("Room-0", room);
        let (at, facing) = door_and_facing(room, side, offset, size, k);
        w.add_door(id, at, size).unwrap();

        prop_assert!(!w.is_obstacle(&Probe::point(at)));
        prop_assert!(w.is_obstacle(&Probe::point(facing)));
        prop_assert!(w.is_obstacle(&Probe::square(facing, 20)));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// RON and JSON spellings of one floor stay in lockstep tick for tick.
    #[test]
    fn ron_and_json_scenes_run_identically(
        rx in 0..260i32,
        ry in 0..160i32,
        battery in 0.0..100.0f64,
        ticks in 1..40usize,
    ) {
        let dir = case_dir();
        let ron_path = dir.join("floor.ron");
        let json_path = dir.join("floor.json");
        fs::write(
            &ron_path,
            format!(
                r#"(
                    name: "Floor",
                    width: 300,
                    height: 200,
                    stations: [(id: "S", rect: (x: 10, y: 10, width: 50, height: 50))],
                    robots: [(id: "R", x: {rx}, y: {ry}, battery: Some({battery:?}), visits: [At(x: 150, y: 100)])],
                )"#
            ),
        )
        .unwrap();
        fs::write(
            &json_path,
            format!(
                r#"{{
                    "name": "Floor",
                    "width": 300,
                    "height": 200,
                    "stations": [{{"id": "S", "rect": {{"x": 10, "y": 10, "width": 50, "height": 50}}}}],
                    "robots": [{{"id": "R", "x": {rx}, "y": {ry}, "battery": {battery:?}, "visits": [{{"At": {{"x": 150, "y": 100}}}}]}}]
                }}"#
            ),
        )
        .unwrap();

        let mut a = load_scene(&ron_path).unwrap().into_world();
        let mut b = load_scene(&json_path).unwrap().into_world();
        for _ in 0..ticks {
            a.tick().unwrap();
            b.tick().unwrap();
            prop_assert_eq!(a.state_hash(), b.state_hash());
        }
        let _ = fs::remove_dir_all(&dir);
    }
}
