//! Fixed-capacity requestor tables
//!
//! Requestor ids are small dense integers assigned by the host platform, so
//! per-requestor state lives in a direct-indexed table sized once at
//! construction. Lookups are O(1) and the memory footprint stays fixed no
//! matter which ids show up at runtime. Ids at or above the capacity are
//! rejected; the policies answer those requests with their default priority
//! instead of growing the table.

use crate::policy::RequestorId;

/// Direct-indexed table of per-requestor values
///
/// Slot `i` holds the value for requestor id `i`. Out-of-range ids are
/// rejected by every operation rather than panicking.
#[derive(Debug, Clone)]
pub struct RequestorTable<T> {
    slots: Vec<Option<T>>,
}

impl<T> RequestorTable<T> {
    /// Create a table with one slot per requestor id in `0..capacity`
    pub fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self { slots }
    }

    /// Number of requestor ids this table can hold
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Whether `id` falls inside the table capacity
    #[inline]
    pub fn in_range(&self, id: RequestorId) -> bool {
        (id as usize) < self.slots.len()
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Whether no slot is occupied
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|slot| slot.is_none())
    }

    /// Get the value for `id`, if present
    pub fn get(&self, id: RequestorId) -> Option<&T> {
        self.slots.get(id as usize)?.as_ref()
    }

    /// Get a mutable reference to the value for `id`, if present
    pub fn get_mut(&mut self, id: RequestorId) -> Option<&mut T> {
        self.slots.get_mut(id as usize)?.as_mut()
    }

    /// Store a value for `id`, replacing any previous value
    ///
    /// Returns `false` if `id` is outside the table capacity.
    pub fn insert(&mut self, id: RequestorId, value: T) -> bool {
        match self.slots.get_mut(id as usize) {
            Some(slot) => {
                *slot = Some(value);
                true
            }
            None => false,
        }
    }

    /// Get the value for `id`, filling the slot from `init` if it is vacant
    ///
    /// Returns `None` if `id` is outside the table capacity.
    pub fn get_or_insert_with<F>(&mut self, id: RequestorId, init: F) -> Option<&mut T>
    where
        F: FnOnce() -> T,
    {
        let slot = self.slots.get_mut(id as usize)?;
        if slot.is_none() {
            *slot = Some(init());
        }
        slot.as_mut()
    }

    /// Iterate over occupied slots in requestor id order
    pub fn iter(&self) -> impl Iterator<Item = (RequestorId, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(id, slot)| slot.as_ref().map(|value| (id as RequestorId, value)))
    }

    /// Iterate mutably over occupied slots in requestor id order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (RequestorId, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(id, slot)| slot.as_mut().map(|value| (id as RequestorId, value)))
    }

    /// Remove every value, keeping the capacity
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_table() {
        let table: RequestorTable<u64> = RequestorTable::with_capacity(8);
        assert_eq!(table.capacity(), 8);
        assert_eq!(table.len(), 0);
        assert!(table.is_empty());
        assert!(table.get(0).is_none());
    }

    #[test]
    fn test_insert_and_get() {
        let mut table = RequestorTable::with_capacity(4);
        assert!(table.insert(2, "fast"));

        assert_eq!(table.get(2), Some(&"fast"));
        assert_eq!(table.len(), 1);
        assert!(!table.is_empty());

        // Overwrite
        assert!(table.insert(2, "slow"));
        assert_eq!(table.get(2), Some(&"slow"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_out_of_range() {
        let mut table = RequestorTable::with_capacity(4);
        assert!(!table.in_range(4));
        assert!(!table.insert(4, 1u64));
        assert!(table.get(4).is_none());
        assert!(table.get_mut(4).is_none());
        assert!(table.get_or_insert_with(4, || 1u64).is_none());
        assert_eq!(table.len(), 0);
    }

    #[test]
    fn test_get_or_insert_with() {
        let mut table = RequestorTable::with_capacity(4);

        let value = table.get_or_insert_with(1, || 10u64);
        assert_eq!(value, Some(&mut 10));

        // Second call must not overwrite
        let value = table.get_or_insert_with(1, || 99u64);
        assert_eq!(value, Some(&mut 10));
    }

    #[test]
    fn test_iter_in_id_order() {
        let mut table = RequestorTable::with_capacity(8);
        table.insert(5, 50u64);
        table.insert(1, 10u64);
        table.insert(3, 30u64);

        let entries: Vec<_> = table.iter().map(|(id, &value)| (id, value)).collect();
        assert_eq!(entries, vec![(1, 10), (3, 30), (5, 50)]);
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let mut table = RequestorTable::with_capacity(4);
        table.insert(0, 1u64);
        table.insert(3, 2u64);

        table.clear();

        assert!(table.is_empty());
        assert_eq!(table.capacity(), 4);
        assert!(table.insert(3, 7u64));
    }
}
