use rewind_common::TickId;

#[derive(Debug, Clone)]
struct Slot<T> {
    id: TickId,
    value: T,
}

/// Result of probing a ring slot for a specific tick id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// The slot holds the requested id.
    Present,
    /// The slot was overwritten by another id.
    Stale { occupant: TickId },
    /// Nothing was ever written to the slot.
    Empty,
}

/// Fixed-capacity ring buffer addressed by `id mod capacity`.
///
/// Every slot stores the id it was written for, and every read checks it, so a
/// slot reused by a newer id is reported as absent instead of handing back
/// another tick's data.
#[derive(Debug, Clone)]
pub struct TickRing<T> {
    slots: Box<[Option<Slot<T>>]>,
}

impl<T> TickRing<T> {
    /// Allocate all slots up front. A zero capacity is raised to one.
    pub fn new(capacity: usize) -> Self {
        let slots = (0..capacity.max(1)).map(|_| None).collect();
        Self { slots }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Store `value` for `id`, overwriting whatever held the slot.
    ///
    /// Returns the id that was evicted, if the slot held a different one.
    pub fn write(&mut self, id: TickId, value: T) -> Option<TickId> {
        let index = id.slot(self.slots.len());
        let previous = self.slots[index].replace(Slot { id, value });
        previous.map(|slot| slot.id).filter(|old| *old != id)
    }

    /// The value stored for `id`, if the slot still holds it.
    pub fn get(&self, id: TickId) -> Option<&T> {
        match &self.slots[id.slot(self.slots.len())] {
            Some(slot) if slot.id == id => Some(&slot.value),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, id: TickId) -> Option<&mut T> {
        let index = id.slot(self.slots.len());
        match &mut self.slots[index] {
            Some(slot) if slot.id == id => Some(&mut slot.value),
            _ => None,
        }
    }

    pub fn lookup(&self, id: TickId) -> Lookup {
        match &self.slots[id.slot(self.slots.len())] {
            Some(slot) if slot.id == id => Lookup::Present,
            Some(slot) => Lookup::Stale { occupant: slot.id },
            None => Lookup::Empty,
        }
    }

    pub fn contains(&self, id: TickId) -> bool {
        self.get(id).is_some()
    }

    /// Forget every slot. Capacity is kept.
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_back_what_was_written() {
        let mut ring = TickRing::new(4);
        assert_eq!(ring.write(TickId(2), "two"), None);
        assert_eq!(ring.get(TickId(2)), Some(&"two"));
        assert_eq!(ring.lookup(TickId(2)), Lookup::Present);
    }

    #[test]
    fn wraparound_write_makes_older_id_stale() {
        let mut ring = TickRing::new(128);
        ring.write(TickId(0), 'a');
        assert_eq!(ring.write(TickId(128), 'b'), Some(TickId(0)));

        assert_eq!(ring.get(TickId(0)), None);
        assert_eq!(
            ring.lookup(TickId(0)),
            Lookup::Stale {
                occupant: TickId(128)
            }
        );
        assert_eq!(ring.get(TickId(128)), Some(&'b'));
    }

    #[test]
    fn rewriting_the_same_id_evicts_nothing() {
        let mut ring = TickRing::new(8);
        ring.write(TickId(3), 1);
        assert_eq!(ring.write(TickId(3), 2), None);
        assert_eq!(ring.get(TickId(3)), Some(&2));
    }

    #[test]
    fn unwritten_slots_are_empty() {
        let ring: TickRing<u8> = TickRing::new(8);
        assert_eq!(ring.lookup(TickId(5)), Lookup::Empty);
        assert!(!ring.contains(TickId(5)));
    }

    #[test]
    fn get_mut_respects_id_check() {
        let mut ring = TickRing::new(2);
        ring.write(TickId(1), 10);
        *ring.get_mut(TickId(1)).unwrap() += 1;
        assert_eq!(ring.get(TickId(1)), Some(&11));
        assert!(ring.get_mut(TickId(3)).is_none());
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut ring = TickRing::new(16);
        ring.write(TickId(1), ());
        ring.clear();
        assert_eq!(ring.capacity(), 16);
        assert!(!ring.contains(TickId(1)));
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        let mut ring = TickRing::new(0);
        ring.write(TickId(7), 7);
        assert_eq!(ring.capacity(), 1);
        assert_eq!(ring.get(TickId(7)), Some(&7));
    }
}
