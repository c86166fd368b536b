//! Open-addressing index: a flat array of slots resolved by linear probing
//! with wraparound.
//!
//! Invariants
//! - A present key is reachable from its home slot without crossing an
//!   `Empty` slot. Tombstones keep probe chains connected until the next
//!   rebuild.
//! - `occupied` and `tombstones` always equal the number of slots in the
//!   respective state.
//! - The owner keeps at least one slot `Empty` (see `sizing`), so every
//!   probe terminates.

use slotmap::DefaultKey;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Slot {
    Empty,
    Occupied(DefaultKey),
    Tombstone,
}

/// Outcome of probing for a key.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Probe {
    /// Slot holding the matching element, and that element's arena key.
    Found(usize, DefaultKey),
    /// Key absent; the slot where it should be placed. This is the first
    /// tombstone on the probe path if there was one, else the terminating
    /// `Empty` slot.
    Vacant(usize),
}

#[derive(Debug)]
pub(crate) struct IndexTable {
    slots: Vec<Slot>,
    occupied: usize,
    tombstones: usize,
}

impl IndexTable {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![Slot::Empty; capacity],
            occupied: 0,
            tombstones: 0,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn occupied(&self) -> usize {
        self.occupied
    }

    pub(crate) fn tombstones(&self) -> usize {
        self.tombstones
    }

    #[cfg(test)]
    pub(crate) fn slot(&self, pos: usize) -> Slot {
        self.slots[pos]
    }

    /// Drop every slot and reallocate at `capacity`, all `Empty`.
    pub(crate) fn reset(&mut self, capacity: usize) {
        self.slots.clear();
        self.slots.resize(capacity, Slot::Empty);
        self.occupied = 0;
        self.tombstones = 0;
    }

    #[inline]
    pub(crate) fn home(&self, hash: u64) -> usize {
        (hash % self.slots.len() as u64) as usize
    }

    /// Slot positions in probe order for `hash`, wrapping once around the table.
    #[inline]
    fn probe_seq(&self, hash: u64) -> impl Iterator<Item = usize> {
        let home = self.home(hash);
        (home..self.slots.len()).chain(0..home)
    }

    /// Walk the probe sequence of `hash`, calling `eq` on each occupied slot's
    /// element until it matches or an `Empty` slot ends the chain.
    pub(crate) fn probe<F>(&self, hash: u64, mut eq: F) -> Probe
    where
        F: FnMut(DefaultKey) -> bool,
    {
        let mut first_tombstone = None;
        for pos in self.probe_seq(hash) {
            match self.slots[pos] {
                Slot::Empty => return Probe::Vacant(first_tombstone.unwrap_or(pos)),
                Slot::Tombstone => {
                    if first_tombstone.is_none() {
                        first_tombstone = Some(pos);
                    }
                }
                Slot::Occupied(k) => {
                    if eq(k) {
                        return Probe::Found(pos, k);
                    }
                }
            }
        }
        match first_tombstone {
            Some(pos) => Probe::Vacant(pos),
            None => unreachable!("index table has no free slot"),
        }
    }

    /// Position and node of the matching element, if any.
    pub(crate) fn find<F>(&self, hash: u64, eq: F) -> Option<(usize, DefaultKey)>
    where
        F: FnMut(DefaultKey) -> bool,
    {
        match self.probe(hash, eq) {
            Probe::Found(pos, k) => Some((pos, k)),
            Probe::Vacant(_) => None,
        }
    }

    /// First non-occupied slot on the probe path. Used while rebuilding,
    /// where keys are known to be unique and no comparison is needed.
    pub(crate) fn first_free(&self, hash: u64) -> usize {
        self.probe(hash, |_| false).into_vacant()
    }

    /// Point the free slot `pos` at arena node `node`.
    pub(crate) fn occupy(&mut self, pos: usize, node: DefaultKey) {
        match self.slots[pos] {
            Slot::Empty => {}
            Slot::Tombstone => self.tombstones -= 1,
            Slot::Occupied(_) => unreachable!("slot {pos} is already occupied"),
        }
        self.slots[pos] = Slot::Occupied(node);
        self.occupied += 1;
    }

    /// Turn the occupied slot `pos` into a tombstone and return the node it
    /// referenced.
    pub(crate) fn vacate(&mut self, pos: usize) -> Option<DefaultKey> {
        match self.slots[pos] {
            Slot::Occupied(k) => {
                self.slots[pos] = Slot::Tombstone;
                self.occupied -= 1;
                self.tombstones += 1;
                Some(k)
            }
            Slot::Empty | Slot::Tombstone => None,
        }
    }

    /// `(occupied, tombstone)` slot counts, recounted from the slots.
    #[cfg(test)]
    pub(crate) fn count_slots(&self) -> (usize, usize) {
        self.slots.iter().fold((0, 0), |(o, t), s| match s {
            Slot::Occupied(_) => (o + 1, t),
            Slot::Tombstone => (o, t + 1),
            Slot::Empty => (o, t),
        })
    }

    /// Arena keys of all occupied slots, in slot order.
    #[cfg(test)]
    pub(crate) fn occupied_keys(&self) -> impl Iterator<Item = DefaultKey> + '_ {
        self.slots.iter().filter_map(|s| match *s {
            Slot::Occupied(k) => Some(k),
            Slot::Empty | Slot::Tombstone => None,
        })
    }
}

impl Probe {
    fn into_vacant(self) -> usize {
        match self {
            Probe::Vacant(pos) => pos,
            Probe::Found(pos, _) => unreachable!("rebuild probe matched slot {pos}"),
        }
    }
}
