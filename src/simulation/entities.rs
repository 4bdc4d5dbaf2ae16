//! Entity arena - fixed-capacity slots for sprites living on top of the grid.
//!
//! The engine only stores entities and hands out handles; stepping them is the
//! caller's job, through the sampling queries. Slots are never freed one by
//! one: the arena fills up and refuses further spawns until the world is
//! cleared, which bumps the generation and invalidates every old handle.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Bird,
    Human,
    Ant,
}

impl EntityKind {
    pub fn from_id(id: u8) -> Option<EntityKind> {
        match id {
            0 => Some(EntityKind::Bird),
            1 => Some(EntityKind::Human),
            2 => Some(EntityKind::Ant),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Entity {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub kind: EntityKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EntityHandle {
    index: u32,
    generation: u32,
}

impl EntityHandle {
    pub fn index(&self) -> u32 {
        self.index
    }
}

pub struct EntityArena {
    slots: Vec<Entity>,
    capacity: usize,
    generation: u32,
}

impl EntityArena {
    pub fn new(capacity: usize) -> Self {
        Self { slots: Vec::with_capacity(capacity), capacity, generation: 0 }
    }

    /// `None` when the arena is full or the position is not finite.
    pub fn spawn(&mut self, entity: Entity) -> Option<EntityHandle> {
        if self.is_full() || !entity.x.is_finite() || !entity.y.is_finite() {
            return None;
        }
        let index = self.slots.len() as u32;
        self.slots.push(entity);
        Some(EntityHandle { index, generation: self.generation })
    }

    pub fn get(&self, handle: EntityHandle) -> Option<&Entity> {
        if handle.generation != self.generation {
            return None;
        }
        self.slots.get(handle.index as usize)
    }

    pub fn get_mut(&mut self, handle: EntityHandle) -> Option<&mut Entity> {
        if handle.generation != self.generation {
            return None;
        }
        self.slots.get_mut(handle.index as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.slots.iter()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.slots.len() >= self.capacity
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.generation = self.generation.wrapping_add(1);
    }

    /// Change the cap; entities past the new cap are dropped.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        if self.slots.len() > capacity {
            self.slots.truncate(capacity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bird(x: f32) -> Entity {
        Entity { x, y: 1.0, vx: 0.0, vy: 0.0, kind: EntityKind::Bird }
    }

    #[test]
    fn full_arena_refuses_spawns() {
        let mut arena = EntityArena::new(2);
        assert!(arena.spawn(bird(1.0)).is_some());
        assert!(arena.spawn(bird(2.0)).is_some());
        assert!(arena.spawn(bird(3.0)).is_none());
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn clear_invalidates_old_handles() {
        let mut arena = EntityArena::new(4);
        let h = arena.spawn(bird(1.0)).unwrap();
        arena.get_mut(h).unwrap().vx = 3.0;
        assert_eq!(arena.get(h).unwrap().vx, 3.0);
        arena.clear();
        assert!(arena.get(h).is_none());
        let h2 = arena.spawn(bird(5.0)).unwrap();
        assert_eq!(h2.index(), h.index());
        assert_ne!(h2, h);
    }

    #[test]
    fn non_finite_positions_are_rejected() {
        let mut arena = EntityArena::new(4);
        assert!(arena.spawn(bird(f32::NAN)).is_none());
        assert!(arena.is_empty());
    }
}
