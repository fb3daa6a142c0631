use crate::id::EntityId;

/// Failure reported by an observer callback. Propagated unchanged to the
/// caller of the mutating operation that triggered the notification.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("observer failed: {0}")]
pub struct ObserverError(pub String);

/// Construction-time rejection. No entity is registered when this is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlacementError {
    #[error("door at ({x},{y}) is not on the border of room '{room}'")]
    DoorNotOnBorder { x: i32, y: i32, room: String },

    #[error("production machine '{machine}' is not contained in room '{room}'")]
    MachineOutsideRoom { machine: String, room: String },

    #[error("entity {0:?} is not a room")]
    NotARoom(EntityId),
}

/// Errors raised by world operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimError {
    #[error(transparent)]
    Observer(#[from] ObserverError),

    #[error("unknown entity {0:?}")]
    UnknownEntity(EntityId),

    #[error("entity {id:?} is not a {expected}")]
    WrongKind { id: EntityId, expected: &'static str },
}
