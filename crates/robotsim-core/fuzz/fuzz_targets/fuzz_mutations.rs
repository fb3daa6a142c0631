#![no_main]
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use robotsim_core::geometry::{Position, Rect};
use robotsim_core::id::EntityId;
use robotsim_core::robot::RobotSpec;
use robotsim_core::world::World;

/// A structured world operation for fuzzing.
#[derive(Arbitrary, Debug)]
enum FuzzOp {
    AddDoor { x: u8, y: u8, size: u8 },
    AddMachine { x: u8, y: u8, size: u8 },
    AddStation { x: u8, y: u8 },
    AddRobot { x: u8, y: u8, battery: u8, pathfinding: bool },
    AddVisit { robot: u8, x: u8, y: u8 },
    Hold { robot: u8 },
    Release { robot: u8 },
    Invalidate,
    Tick,
}

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    ops: Vec<FuzzOp>,
}

fuzz_target!(|input: FuzzInput| {
    let mut world = World::new("Factory", 256, 256);
    let room = world.add_room("Room-0", Rect::new(16, 16, 160, 160));
    let mut robots: Vec<EntityId> = Vec::new();

    // Limit operations to prevent timeouts.
    let max_ops = input.ops.len().min(100);

    for op in &input.ops[..max_ops] {
        match *op {
            FuzzOp::AddDoor { x, y, size } => {
                // Placement may be rejected; that is fine.
                let _ = world.add_door(room, Position::new(x as i32, y as i32), size as i32);
            }
            FuzzOp::AddMachine { x, y, size } => {
                let _ = world.add_production_machine("m", room, Position::new(x as i32, y as i32), size as i32 % 64);
            }
            FuzzOp::AddStation { x, y } => {
                world.add_charging_station("s", Rect::new(x as i32, y as i32, 30, 30));
            }
            FuzzOp::AddRobot { x, y, battery, pathfinding } => {
                let mut spec = RobotSpec::new("r", Position::new(x as i32, y as i32))
                    .size(8, 8)
                    .battery(robotsim_core::fixed::Fixed64::from_num(battery % 101));
                if pathfinding {
                    spec = spec.pathfinding();
                }
                robots.push(world.add_robot(spec));
            }
            FuzzOp::AddVisit { robot, x, y } => {
                if !robots.is_empty() {
                    let id = robots[robot as usize % robots.len()];
                    world.add_visit(id, Position::new(x as i32, y as i32)).unwrap();
                }
            }
            FuzzOp::Hold { robot } => {
                if !robots.is_empty() {
                    world.hold(robots[robot as usize % robots.len()]).unwrap();
                }
            }
            FuzzOp::Release { robot } => {
                if !robots.is_empty() {
                    world.release(robots[robot as usize % robots.len()]).unwrap();
                }
            }
            FuzzOp::Invalidate => world.invalidate_navigation(),
            FuzzOp::Tick => world.tick().unwrap(),
        }
    }

    for &id in &robots {
        let r = world.robot(id).unwrap();
        assert!(r.cursor() <= r.visits().len());
    }
});
