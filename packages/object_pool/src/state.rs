use std::collections::VecDeque;
use std::num::NonZero;

use foldhash::{HashSet, HashSetExt};

use crate::object_id::IdSequence;
use crate::{ObjectId, PoolStats};

/// The membership bookkeeping of one pool: which objects are idle, which are checked out.
///
/// Every object the pool manages is either in `available` (together with its value) or its
/// identity is in `in_use` (the value itself is owned by the caller), never both. Objects that are
/// being constructed are not yet managed and are only counted in `constructing`, so that a size
/// cap also covers constructions that happen outside the lock.
///
/// This type performs no locking of its own. The pool wraps it in a single mutex so that every
/// transition observes and leaves both collections consistent.
#[derive(Debug)]
pub(crate) struct PoolState<T> {
    /// Idle objects. The front is the next one handed out, releases append to the back.
    available: VecDeque<Idle<T>>,

    /// Identities of the objects currently checked out by callers.
    in_use: HashSet<ObjectId>,

    /// Slots reserved for objects whose factory call is in progress.
    constructing: usize,

    ids: IdSequence,

    created: usize,
    detached: usize,
}

/// An object resting in the pool.
#[derive(Debug)]
pub(crate) struct Idle<T> {
    pub(crate) id: ObjectId,
    pub(crate) value: T,
}

/// What a caller must do next to obtain an object.
#[derive(Debug)]
pub(crate) enum Checkout<T> {
    /// An idle object was moved to the in-use collection and is now owned by the caller.
    Reused(Idle<T>),

    /// No idle object exists. A construction slot has been reserved and the caller must either
    /// call [`PoolState::complete_checked_out()`] after constructing the object or
    /// [`PoolState::abandon_construction()`] if the construction failed.
    Construct,

    /// No idle object exists and the size cap does not allow constructing another one.
    Exhausted(NonZero<usize>),
}

impl<T> PoolState<T> {
    pub(crate) fn new() -> Self {
        Self {
            available: VecDeque::new(),
            in_use: HashSet::new(),
            constructing: 0,
            ids: IdSequence::new(),
            created: 0,
            detached: 0,
        }
    }

    /// Takes the front idle object or, failing that, reserves a construction slot.
    pub(crate) fn begin_checkout(&mut self, max_size: Option<NonZero<usize>>) -> Checkout<T> {
        if let Some(idle) = self.available.pop_front() {
            let newly_inserted = self.in_use.insert(idle.id);
            debug_assert!(newly_inserted, "an idle object cannot also be in use");

            return Checkout::Reused(idle);
        }

        if self.try_reserve(max_size) {
            Checkout::Construct
        } else {
            Checkout::Exhausted(
                max_size.expect("reservation can only fail when a maximum size is configured"),
            )
        }
    }

    /// Reserves a construction slot if the size cap (if any) permits another object.
    pub(crate) fn try_reserve(&mut self, max_size: Option<NonZero<usize>>) -> bool {
        if max_size.is_some_and(|max_size| self.managed_and_pending() >= max_size.get()) {
            return false;
        }

        self.constructing = self
            .constructing
            .checked_add(1)
            .expect("cannot have more than usize::MAX constructions in flight");

        true
    }

    /// Releases a reserved construction slot without adding an object.
    pub(crate) fn abandon_construction(&mut self) {
        self.release_reservation();
    }

    /// Converts a reserved construction slot into a new object that is immediately checked out.
    pub(crate) fn complete_checked_out(&mut self) -> ObjectId {
        let id = self.adopt();

        let newly_inserted = self.in_use.insert(id);
        debug_assert!(newly_inserted, "new object identities are never reused");

        id
    }

    /// Converts a reserved construction slot into a new idle object.
    pub(crate) fn complete_idle(&mut self, value: T) -> ObjectId {
        let id = self.adopt();

        self.available.push_back(Idle { id, value });

        id
    }

    /// Returns a checked out object to the back of the available collection.
    ///
    /// If `id` is not checked out from this pool, nothing changes and the value is handed back.
    pub(crate) fn check_in(&mut self, id: ObjectId, value: T) -> Result<(), T> {
        if !self.in_use.remove(&id) {
            return Err(value);
        }

        self.available.push_back(Idle { id, value });

        Ok(())
    }

    /// Stops tracking a checked out object. Returns whether the object was checked out.
    pub(crate) fn detach(&mut self, id: ObjectId) -> bool {
        if !self.in_use.remove(&id) {
            return false;
        }

        self.detached = self
            .detached
            .checked_add(1)
            .expect("cannot detach more than usize::MAX objects");

        true
    }

    pub(crate) fn available_count(&self) -> usize {
        self.available.len()
    }

    pub(crate) fn in_use_count(&self) -> usize {
        self.in_use.len()
    }

    pub(crate) fn is_in_use(&self, id: ObjectId) -> bool {
        self.in_use.contains(&id)
    }

    pub(crate) fn stats(&self) -> PoolStats {
        PoolStats {
            available: self.available.len(),
            in_use: self.in_use.len(),
            created: self.created,
            detached: self.detached,
        }
    }

    fn adopt(&mut self) -> ObjectId {
        self.release_reservation();

        self.created = self
            .created
            .checked_add(1)
            .expect("cannot construct more than usize::MAX objects");

        self.ids.next_id()
    }

    fn release_reservation(&mut self) {
        self.constructing = self
            .constructing
            .checked_sub(1)
            .expect("construction slot released without a matching reservation");
    }

    fn managed_and_pending(&self) -> usize {
        self.available
            .len()
            .saturating_add(self.in_use.len())
            .saturating_add(self.constructing)
    }
}
