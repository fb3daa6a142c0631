use slotmap::new_key_type;

new_key_type! {
    /// Identifies an entity (room, door, robot, ...) registered in a world.
    pub struct EntityId;
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn entity_ids_are_distinct_and_copy() {
        let mut sm: SlotMap<EntityId, &str> = SlotMap::with_key();
        let a = sm.insert("room");
        let b = sm.insert("robot");
        let c = a; // Copy
        assert_ne!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn entity_ids_are_hashable() {
        use std::collections::HashMap;
        let mut sm: SlotMap<EntityId, ()> = SlotMap::with_key();
        let id = sm.insert(());
        let mut map = HashMap::new();
        map.insert(id, "door");
        assert_eq!(map[&id], "door");
    }
}
