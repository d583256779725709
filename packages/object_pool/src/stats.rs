/// A point-in-time snapshot of the membership of an [`ObjectPool`][crate::ObjectPool].
///
/// All values are read under a single acquisition of the pool lock, so they are consistent with
/// each other: `available() + in_use() + detached() == created()` always holds for one snapshot.
/// The snapshot may be stale by the time it is inspected if other threads use the pool, so it is
/// suitable for monitoring and diagnostics, not for making synchronization decisions.
///
/// # Example
///
/// ```
/// use object_pool::ObjectPool;
///
/// let pool = ObjectPool::new(String::new);
///
/// let first = pool.acquire().unwrap();
/// let second = pool.acquire().unwrap();
/// pool.release(second).unwrap();
///
/// let stats = pool.stats();
/// assert_eq!(stats.available(), 1);
/// assert_eq!(stats.in_use(), 1);
/// assert_eq!(stats.created(), 2);
/// # drop(first);
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct PoolStats {
    pub(crate) available: usize,
    pub(crate) in_use: usize,
    pub(crate) created: usize,
    pub(crate) detached: usize,
}

impl PoolStats {
    /// Number of idle objects ready to be acquired.
    #[must_use]
    pub fn available(&self) -> usize {
        self.available
    }

    /// Number of objects currently checked out.
    #[must_use]
    pub fn in_use(&self) -> usize {
        self.in_use
    }

    /// Number of objects the factory has constructed over the lifetime of the pool.
    #[must_use]
    pub fn created(&self) -> usize {
        self.created
    }

    /// Number of objects that callers have taken out of pool management via
    /// [`Pooled::detach()`][crate::Pooled::detach].
    #[must_use]
    pub fn detached(&self) -> usize {
        self.detached
    }

    /// Number of objects the pool currently manages, idle or checked out.
    #[must_use]
    pub fn managed(&self) -> usize {
        self.available.saturating_add(self.in_use)
    }
}
