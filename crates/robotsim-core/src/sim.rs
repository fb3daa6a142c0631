//! Run state and the deterministic state hash.

use crate::fixed::{Fixed64, Ticks};
use crate::geometry::{Position, Rect};

// ---------------------------------------------------------------------------
// Simulation state
// ---------------------------------------------------------------------------

/// Run flag and tick counter carried by a world.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SimState {
    /// Number of completed ticks.
    pub tick: Ticks,

    /// Whether the simulation is running. Only gates external schedulers;
    /// `World::tick` itself always runs.
    pub running: bool,
}

impl SimState {
    /// A stopped simulation at tick 0.
    pub fn new() -> Self {
        Self::default()
    }
}

// ---------------------------------------------------------------------------
// State hash
// ---------------------------------------------------------------------------

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0100_0000_01b3;

/// FNV-1a accumulator over the simulated state of a world. Two worlds that
/// hash equal behave identically on every following tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateHash(pub u64);

impl StateHash {
    pub fn new() -> Self {
        Self(FNV_OFFSET)
    }

    pub fn write(&mut self, bytes: &[u8]) {
        self.0 = bytes
            .iter()
            .fold(self.0, |acc, &b| (acc ^ u64::from(b)).wrapping_mul(FNV_PRIME));
    }

    pub fn write_u64(&mut self, v: u64) {
        self.write(&v.to_le_bytes());
    }

    pub fn write_i32(&mut self, v: i32) {
        self.write(&v.to_le_bytes());
    }

    pub fn write_bool(&mut self, v: bool) {
        self.write(&[u8::from(v)]);
    }

    /// Raw bits, so equal hashes mean bit-equal batteries.
    pub fn write_fixed64(&mut self, v: Fixed64) {
        self.write(&v.to_bits().to_le_bytes());
    }

    pub fn write_position(&mut self, p: Position) {
        for v in [p.x, p.y] {
            self.write_i32(v);
        }
    }

    pub fn write_rect(&mut self, r: &Rect) {
        for v in [r.x, r.y, r.width, r.height] {
            self.write_i32(v);
        }
    }

    pub fn finish(self) -> u64 {
        self.0
    }
}

impl Default for StateHash {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_state_starts_stopped_at_zero() {
        let state = SimState::new();
        assert_eq!(state.tick, 0);
        assert!(!state.running);
    }

    #[test]
    fn state_hash_deterministic() {
        let mut h1 = StateHash::new();
        h1.write_u64(42);
        h1.write_position(Position::new(3, 4));

        let mut h2 = StateHash::new();
        h2.write_u64(42);
        h2.write_position(Position::new(3, 4));

        assert_eq!(h1.finish(), h2.finish());
    }

    #[test]
    fn state_hash_order_matters() {
        let mut h1 = StateHash::new();
        h1.write_position(Position::new(1, 2));

        let mut h2 = StateHash::new();
        h2.write_position(Position::new(2, 1));

        assert_ne!(h1.finish(), h2.finish());
    }

    #[test]
    fn state_hash_sees_flags() {
        let mut h1 = StateHash::new();
        h1.write_bool(true);
        let mut h2 = StateHash::new();
        h2.write_bool(false);
        assert_ne!(h1.finish(), h2.finish());
    }
}
