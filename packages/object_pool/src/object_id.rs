use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide source of pool instance numbers, so object identities never collide across pools.
static NEXT_POOL_NUMBER: AtomicU64 = AtomicU64::new(0);

/// Identity of one object managed by an [`ObjectPool`][crate::ObjectPool].
///
/// Every object constructed by a pool receives a new identity that it keeps for as long as the
/// pool manages it, across any number of acquire/release cycles. Identities are never reused,
/// neither within a pool nor across different pools in the same process.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ObjectId {
    pool: u64,
    sequence: u64,
}

impl ObjectId {
    /// Position of the object in its pool's construction order, starting from zero.
    #[must_use]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.pool, self.sequence)
    }
}

/// Hands out identities for the objects of a single pool.
#[derive(Debug)]
pub(crate) struct IdSequence {
    pool: u64,
    next: u64,
}

impl IdSequence {
    pub(crate) fn new() -> Self {
        Self {
            pool: NEXT_POOL_NUMBER.fetch_add(1, Ordering::Relaxed),
            next: 0,
        }
    }

    #[cfg_attr(test, mutants::skip)] // Overflow of a u64 counter is not reachable in tests.
    pub(crate) fn next_id(&mut self) -> ObjectId {
        let id = ObjectId {
            pool: self.pool,
            sequence: self.next,
        };

        self.next = self
            .next
            .checked_add(1)
            .expect("a pool cannot construct more than u64::MAX objects");

        id
    }
}
