//! Binary world snapshots.
//!
//! A snapshot is a `bitcode` encoding of the world behind a small versioned
//! header. Observers, pathfinders and paths are transient: a restored world
//! has no observers and its robots rebuild navigation graphs lazily on their
//! next tick.

use crate::world::World;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Magic number identifying a world snapshot.
pub const SNAPSHOT_MAGIC: u32 = 0x5B07_0001;

/// Current format version. Increment when breaking the wire format.
pub const FORMAT_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SerializeError {
    #[error("bitcode encoding failed: {0}")]
    Encode(String),
}

#[derive(Debug, thiserror::Error)]
pub enum DeserializeError {
    #[error("data too short for snapshot header")]
    TooShort,
    #[error("invalid magic number: expected 0x{:08X}, got 0x{:08X}", SNAPSHOT_MAGIC, .0)]
    InvalidMagic(u32),
    #[error("unsupported format version: expected {}, got {}", FORMAT_VERSION, .0)]
    UnsupportedVersion(u32),
    #[error("snapshot from future version {0} (this build supports up to {FORMAT_VERSION})")]
    FutureVersion(u32),
    #[error("bitcode decoding failed: {0}")]
    Decode(String),
}

// ---------------------------------------------------------------------------
// Snapshot header
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotHeader {
    pub magic: u32,
    pub version: u32,
    /// Tick count at the time the snapshot was taken.
    pub tick: u64,
}

impl SnapshotHeader {
    pub fn new(tick: u64) -> Self {
        Self {
            magic: SNAPSHOT_MAGIC,
            version: FORMAT_VERSION,
            tick,
        }
    }

    pub fn validate(&self) -> Result<(), DeserializeError> {
        if self.magic != SNAPSHOT_MAGIC {
            return Err(DeserializeError::InvalidMagic(self.magic));
        }
        if self.version > FORMAT_VERSION {
            return Err(DeserializeError::FutureVersion(self.version));
        }
        if self.version < FORMAT_VERSION {
            return Err(DeserializeError::UnsupportedVersion(self.version));
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    header: SnapshotHeader,
    world: &'a World,
}

#[derive(Deserialize)]
struct Snapshot {
    header: SnapshotHeader,
    world: World,
}

/// Decode a snapshot and return only its header.
///
/// bitcode has no partial decoding, so this decodes the whole payload.
pub fn read_snapshot_header(data: &[u8]) -> Result<SnapshotHeader, DeserializeError> {
    decode(data).map(|s| s.header)
}

fn decode(data: &[u8]) -> Result<Snapshot, DeserializeError> {
    if data.is_empty() {
        return Err(DeserializeError::TooShort);
    }
    bitcode::deserialize(data).map_err(|e| DeserializeError::Decode(e.to_string()))
}

impl World {
    /// Encode the world as a versioned snapshot.
    pub fn serialize(&self) -> Result<Vec<u8>, SerializeError> {
        let snapshot = SnapshotRef {
            header: SnapshotHeader::new(self.tick_count()),
            world: self,
        };
        bitcode::serialize(&snapshot).map_err(|e| SerializeError::Encode(e.to_string()))
    }

    /// Decode a snapshot produced by [`World::serialize`].
    ///
    /// The header is validated before the world is handed back; a version
    /// mismatch is an error, never a panic.
    pub fn deserialize(data: &[u8]) -> Result<Self, DeserializeError> {
        let snapshot = decode(data)?;
        snapshot.header.validate()?;
        Ok(snapshot.world)
    }
}
