use std::fmt;
use std::num::NonZero;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, trace, warn};

use crate::constants::ERR_POISONED_LOCK;
use crate::state::{Checkout, Idle, PoolState};
use crate::{
    BoxError, Error, ObjectId, ObjectPoolBuilder, PoolStats, Pooled, ReleaseError, Result,
};

/// Constructs brand new objects for a pool when no idle one is available.
pub(crate) type Factory<T> = Box<dyn Fn() -> std::result::Result<T, BoxError> + Send + Sync>;

/// A thread-safe pool of reusable objects.
///
/// Callers borrow an object with [`acquire()`][Self::acquire] and give it back with
/// [`release()`][Self::release] (or by simply dropping the [`Pooled`] handle). When no idle object
/// exists, the pool constructs a new one using the factory it was created with, so acquiring
/// never waits for another caller to return an object.
///
/// Every object the pool manages is at any point in time either available (idle in the pool) or
/// in use (checked out by a caller), never both. Idle objects are handed out in the order they
/// were returned, oldest first.
///
/// This type acts as a cloneable handle to a shared pool instance. Multiple handles can exist
/// simultaneously and all of them operate on the same objects.
///
/// # Resource usage
///
/// By default the pool has no upper bound: it grows by one object every time an object is
/// requested while all existing objects are in use, and it never destroys objects on its own.
/// Peak concurrent demand therefore determines the long-term size of the pool. Use
/// [`ObjectPoolBuilder::max_size()`] to reject acquisitions beyond a fixed number of objects.
///
/// # Thread safety
///
/// All operations execute under one lock that covers both the available and the in-use
/// collections. The factory is called outside that lock, so a slow factory does not stall
/// callers that only reuse or return objects.
///
/// # Example
///
/// ```
/// use object_pool::ObjectPool;
///
/// let pool = ObjectPool::new(|| Vec::<u8>::with_capacity(1024));
///
/// let mut buffer = pool.acquire().unwrap();
/// buffer.extend_from_slice(b"hello");
/// assert_eq!(pool.in_use_count(), 1);
///
/// pool.release(buffer).unwrap();
/// assert_eq!(pool.available_count(), 1);
/// assert_eq!(pool.in_use_count(), 0);
/// ```
pub struct ObjectPool<T> {
    shared: Arc<Shared<T>>,
}

/// The part of the pool shared between all pool handles and all checked out objects.
pub(crate) struct Shared<T> {
    name: String,
    max_size: Option<NonZero<usize>>,
    factory: Factory<T>,
    state: Mutex<PoolState<T>>,
}

impl<T> ObjectPool<T> {
    /// Creates an unbounded pool that constructs objects with an infallible factory.
    ///
    /// # Example
    ///
    /// ```
    /// use object_pool::ObjectPool;
    ///
    /// let pool = ObjectPool::new(|| String::from("New Object"));
    ///
    /// let object = pool.acquire().unwrap();
    /// assert_eq!(*object, "New Object");
    /// ```
    #[must_use]
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self::builder(factory).build()
    }

    /// Returns a builder for a pool with custom configuration whose factory cannot fail.
    ///
    /// # Example
    ///
    /// ```
    /// use std::num::NonZero;
    ///
    /// use object_pool::ObjectPool;
    ///
    /// let pool = ObjectPool::builder(|| [0_u8; 64])
    ///     .name("scratch_buffers")
    ///     .max_size(NonZero::new(16).unwrap())
    ///     .build();
    ///
    /// assert_eq!(pool.name(), "scratch_buffers");
    /// ```
    pub fn builder<F>(factory: F) -> ObjectPoolBuilder<T>
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        ObjectPoolBuilder::new(Box::new(move || Ok(factory())))
    }

    /// Returns a builder for a pool with custom configuration whose factory may fail.
    ///
    /// Errors returned by the factory are surfaced by [`acquire()`][Self::acquire] as
    /// [`Error::Construction`].
    ///
    /// # Example
    ///
    /// ```
    /// use std::fs::File;
    ///
    /// use object_pool::{Error, ObjectPool};
    ///
    /// let pool = ObjectPool::try_builder(|| File::open("/this/path/does/not/exist")).build();
    ///
    /// assert!(matches!(pool.acquire(), Err(Error::Construction { .. })));
    /// assert_eq!(pool.len(), 0);
    /// ```
    pub fn try_builder<F, E>(factory: F) -> ObjectPoolBuilder<T>
    where
        F: Fn() -> std::result::Result<T, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        ObjectPoolBuilder::new(Box::new(move || factory().map_err(Into::into)))
    }

    pub(crate) fn new_inner(
        name: String,
        max_size: Option<NonZero<usize>>,
        factory: Factory<T>,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                name,
                max_size,
                factory,
                state: Mutex::new(PoolState::new()),
            }),
        }
    }

    /// Takes an idle object out of the pool or constructs a new one if none is idle.
    ///
    /// The returned handle gives access to the object. Hand it back with
    /// [`release()`][Self::release]; dropping the handle has the same effect.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Construction`] if a new object was needed and the factory failed. The pool
    /// is left exactly as it was before the call.
    ///
    /// Returns [`Error::Exhausted`] if the pool has a maximum size, no object is idle and the
    /// maximum number of objects already exists.
    ///
    /// # Example
    ///
    /// ```
    /// use object_pool::ObjectPool;
    ///
    /// let pool = ObjectPool::new(|| 0_u64);
    ///
    /// let first = pool.acquire().unwrap();
    /// let first_id = first.id();
    /// pool.release(first).unwrap();
    ///
    /// // The idle object is reused instead of constructing a new one.
    /// let again = pool.acquire().unwrap();
    /// assert_eq!(again.id(), first_id);
    /// assert_eq!(pool.stats().created(), 1);
    /// ```
    pub fn acquire(&self) -> Result<Pooled<T>> {
        let checkout = self.shared.lock().begin_checkout(self.shared.max_size);

        match checkout {
            Checkout::Reused(Idle { id, value }) => {
                trace!(pool = %self.shared.name, object_id = %id, "reusing idle object");

                Ok(Pooled::new(id, value, Arc::clone(&self.shared)))
            }
            Checkout::Construct => {
                let (id, value) = self
                    .shared
                    .construct(|state, value| (state.complete_checked_out(), value))?;

                Ok(Pooled::new(id, value, Arc::clone(&self.shared)))
            }
            Checkout::Exhausted(max_size) => {
                warn!(
                    pool = %self.shared.name,
                    max_size = max_size.get(),
                    "rejected acquire because the pool is at its maximum size"
                );

                Err(Error::Exhausted { max_size })
            }
        }
    }

    /// Returns a previously acquired object to the pool, making it available for reuse.
    ///
    /// The object is appended to the back of the available collection.
    ///
    /// # Errors
    ///
    /// If the object was not acquired from this pool, the pool is not modified and the object is
    /// handed back inside a [`ReleaseError`]. Releasing the same object twice is not possible
    /// because releasing consumes the [`Pooled`] handle.
    ///
    /// # Example
    ///
    /// ```
    /// use object_pool::ObjectPool;
    ///
    /// let pool = ObjectPool::new(|| 0_u32);
    /// let other_pool = ObjectPool::new(|| 0_u32);
    ///
    /// let object = pool.acquire().unwrap();
    ///
    /// // Releasing into the wrong pool is refused and gives the object back.
    /// let error = other_pool.release(object).unwrap_err();
    /// assert_eq!(other_pool.available_count(), 0);
    ///
    /// pool.release(error.into_inner()).unwrap();
    /// assert_eq!(pool.available_count(), 1);
    /// ```
    pub fn release(&self, pooled: Pooled<T>) -> std::result::Result<(), ReleaseError<T>> {
        let (id, value, owner) = pooled.into_parts();

        let outcome = self.shared.lock().check_in(id, value);

        match outcome {
            Ok(()) => {
                trace!(pool = %self.shared.name, object_id = %id, "object released");
                Ok(())
            }
            Err(value) => {
                warn!(
                    pool = %self.shared.name,
                    object_id = %id,
                    "refused to release an object that is not checked out from this pool"
                );

                Err(ReleaseError::new(Pooled::new(id, value, owner)))
            }
        }
    }

    /// Constructs up to `count` new objects ahead of demand and adds them to the available
    /// collection. Returns the number of objects that were added.
    ///
    /// Fewer than `count` objects are added if the pool reaches its maximum size.
    ///
    /// # Errors
    ///
    /// Stops at the first factory failure and returns it as [`Error::Construction`]. Objects
    /// constructed before the failure remain in the pool.
    ///
    /// # Example
    ///
    /// ```
    /// use object_pool::ObjectPool;
    ///
    /// let pool = ObjectPool::new(|| vec![0_u8; 4096]);
    ///
    /// assert_eq!(pool.prefill(4).unwrap(), 4);
    /// assert_eq!(pool.available_count(), 4);
    /// ```
    pub fn prefill(&self, count: usize) -> Result<usize> {
        let mut added: usize = 0;

        while added < count {
            if !self.shared.lock().try_reserve(self.shared.max_size) {
                debug!(
                    pool = %self.shared.name,
                    added,
                    requested = count,
                    "prefill stopped at the maximum pool size"
                );
                break;
            }

            self.shared.construct(PoolState::complete_idle)?;

            added = added
                .checked_add(1)
                .expect("guarded by loop condition, cannot overflow");
        }

        Ok(added)
    }

    /// Returns the number of idle objects at the instant of the call.
    ///
    /// The value may be stale as soon as it is returned if other threads use the pool.
    #[must_use]
    pub fn available_count(&self) -> usize {
        self.shared.lock().available_count()
    }

    /// Returns the number of checked out objects at the instant of the call.
    ///
    /// The value may be stale as soon as it is returned if other threads use the pool.
    #[must_use]
    pub fn in_use_count(&self) -> usize {
        self.shared.lock().in_use_count()
    }

    /// Returns the number of objects the pool manages, whether idle or checked out.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.lock().stats().managed()
    }

    /// Returns whether the pool manages no objects at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a consistent snapshot of all the pool counters.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        self.shared.lock().stats()
    }

    /// The maximum number of objects the pool may manage, if limited.
    #[must_use]
    pub fn max_size(&self) -> Option<NonZero<usize>> {
        self.shared.max_size
    }

    /// The name of the pool, as used in log events.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.shared.name
    }
}

impl<T> Shared<T> {
    fn lock(&self) -> MutexGuard<'_, PoolState<T>> {
        self.state.lock().expect(ERR_POISONED_LOCK)
    }

    /// Runs the factory for a construction slot that the caller has already reserved and passes
    /// the result to `complete`, which registers the new object under the lock.
    ///
    /// The reservation is abandoned if the factory fails or panics.
    fn construct<R>(&self, complete: impl FnOnce(&mut PoolState<T>, T) -> R) -> Result<R> {
        let reservation = scopeguard::guard((), |()| {
            self.lock().abandon_construction();
        });

        let outcome = (self.factory)();

        // From here on, the reservation is settled explicitly on every path.
        scopeguard::ScopeGuard::into_inner(reservation);

        match outcome {
            Ok(value) => {
                let mut state = self.lock();
                let completed = complete(&mut *state, value);
                let created = state.stats().created();
                drop(state);

                debug!(pool = %self.name, created, "constructed new pooled object");

                Ok(completed)
            }
            Err(source) => {
                self.lock().abandon_construction();

                debug!(pool = %self.name, error = %source, "failed to construct pooled object");

                Err(Error::Construction { source })
            }
        }
    }

    /// Takes back an object whose handle was dropped without an explicit release.
    pub(crate) fn return_dropped(&self, id: ObjectId, value: T) {
        let outcome = self.lock().check_in(id, value);

        if outcome.is_ok() {
            trace!(pool = %self.name, object_id = %id, "object returned by dropping its handle");
        } else {
            // The handle is the only way to hold a checked out object, so this cannot happen
            // unless the bookkeeping is broken. The object is dropped rather than tracked twice.
            warn!(pool = %self.name, object_id = %id, "dropped handle referred to an unknown object");
        }
    }

    /// Stops tracking a checked out object whose handle is being detached.
    pub(crate) fn forget(&self, id: ObjectId) {
        let was_in_use = self.lock().detach(id);

        if was_in_use {
            debug!(pool = %self.name, object_id = %id, "object detached from pool");
        } else {
            warn!(pool = %self.name, object_id = %id, "detached handle referred to an unknown object");
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }
}

impl<T> Clone for ObjectPool<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> fmt::Debug for ObjectPool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectPool")
            .field("shared", &self.shared)
            .finish()
    }
}

impl<T> fmt::Debug for Shared<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shared")
            .field("name", &self.name)
            .field("max_size", &self.max_size)
            .field("stats", &self.lock().stats())
            .finish_non_exhaustive()
    }
}
