//! Entity plumbing shared by every fleet collection
//!
//! A `Table<T>` is an insertion-ordered collection with its own id allocator.
//! The store wraps one table per entity type and adds the cross-table rules
//! (cascades, category bookkeeping) on top.

use std::collections::HashSet;

/// Identifier type for every entity collection
pub type EntityId = u64;

/// A record that lives in a `Table`
///
/// `Draft` is what callers supply on creation (everything except the id and
/// store-defaulted fields), `Patch` is a partial update.
pub trait Entity: Clone {
    type Draft;
    type Patch;

    fn id(&self) -> EntityId;

    /// Build the stored record from a freshly allocated id and a draft
    fn build(id: EntityId, draft: Self::Draft) -> Self;

    /// Merge a partial update, leaving unspecified fields untouched
    fn apply(&mut self, patch: Self::Patch);
}

/// A record owned by exactly one ship
pub trait ShipOwned {
    fn ship_id(&self) -> EntityId;
}

/// Keep only the records owned by `ship_id`, preserving order
///
/// Pure and idempotent: running it over its own output yields the same set.
pub fn owned_by<'a, T, I>(records: I, ship_id: EntityId) -> Vec<&'a T>
where
    T: ShipOwned + 'a,
    I: IntoIterator<Item = &'a T>,
{
    records
        .into_iter()
        .filter(|record| record.ship_id() == ship_id)
        .collect()
}

/// Monotonic id counter
///
/// Ids are never reused within a session, even after deletes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdAllocator {
    next: EntityId,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdAllocator {
    /// Seed the counter past every id already in use
    pub fn starting_after<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = EntityId>,
    {
        let next = ids.into_iter().max().map_or(1, |max| max.saturating_add(1));
        Self { next }
    }

    /// Hand out the next id
    pub fn allocate(&mut self) -> EntityId {
        let id = self.next;
        self.next = self.next.saturating_add(1);
        id
    }

    /// Peek at the id the next `allocate` call will return
    #[cfg(test)]
    pub fn peek(&self) -> EntityId {
        self.next
    }
}

/// Insertion-ordered collection of one entity type
#[derive(Debug, Clone)]
pub struct Table<T: Entity> {
    rows: Vec<T>,
    ids: IdAllocator,
}

impl<T: Entity> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            ids: IdAllocator::default(),
        }
    }
}

impl<T: Entity> Table<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from loaded rows
    ///
    /// Rows whose id was already seen are dropped (first one wins). Returns the
    /// table and the number of dropped rows.
    pub fn from_rows(rows: Vec<T>) -> (Self, usize) {
        let mut seen = HashSet::new();
        let total = rows.len();
        let rows: Vec<T> = rows.into_iter().filter(|row| seen.insert(row.id())).collect();
        let dropped = total - rows.len();
        let ids = IdAllocator::starting_after(rows.iter().map(Entity::id));
        (Self { rows, ids }, dropped)
    }

    /// Append a new record and return its id
    pub fn insert(&mut self, draft: T::Draft) -> EntityId {
        let id = self.ids.allocate();
        self.rows.push(T::build(id, draft));
        id
    }

    /// Apply a patch; returns false (and changes nothing) for unknown ids
    pub fn update(&mut self, id: EntityId, patch: T::Patch) -> bool {
        match self.get_mut(id) {
            Some(row) => {
                row.apply(patch);
                true
            }
            None => false,
        }
    }

    /// Remove a record; returns false for unknown ids
    pub fn remove(&mut self, id: EntityId) -> bool {
        let before = self.rows.len();
        self.rows.retain(|row| row.id() != id);
        self.rows.len() != before
    }

    /// Keep the records matching `keep`, returning how many were removed
    pub fn retain<F>(&mut self, keep: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        let before = self.rows.len();
        self.rows.retain(keep);
        before - self.rows.len()
    }

    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.rows.iter().find(|row| row.id() == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        self.rows.iter_mut().find(|row| row.id() == id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.rows.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.rows.iter_mut()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}
