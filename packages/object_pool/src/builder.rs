use std::fmt;
use std::num::NonZero;

use crate::ObjectPool;
use crate::constants::DEFAULT_POOL_NAME;
use crate::pool::Factory;

/// Builder for creating an instance of [`ObjectPool`].
///
/// Obtain one from [`ObjectPool::builder()`] or [`ObjectPool::try_builder()`], which take the
/// factory that constructs new objects. Everything else is optional.
///
/// # Examples
///
/// ```
/// use std::num::NonZero;
///
/// use object_pool::ObjectPool;
///
/// // Default pool: unbounded, with the default name.
/// let pool = ObjectPool::builder(|| 0_u32).build();
/// assert_eq!(pool.max_size(), None);
///
/// // Named pool that never manages more than 8 objects.
/// let pool = ObjectPool::builder(|| 0_u32)
///     .name("workers")
///     .max_size(NonZero::new(8).unwrap())
///     .build();
/// assert_eq!(pool.max_size(), NonZero::new(8));
/// ```
#[must_use]
pub struct ObjectPoolBuilder<T> {
    factory: Factory<T>,
    name: Option<String>,
    max_size: Option<NonZero<usize>>,
}

impl<T> ObjectPoolBuilder<T> {
    pub(crate) fn new(factory: Factory<T>) -> Self {
        Self {
            factory,
            name: None,
            max_size: None,
        }
    }

    /// Sets the name of the pool, which is attached to every log event the pool emits.
    ///
    /// Useful to tell pools apart when an application has more than one.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Limits the number of objects the pool may manage at the same time, counting both idle and
    /// checked out objects.
    ///
    /// When the limit is reached and no object is idle, [`ObjectPool::acquire()`] fails with
    /// [`Error::Exhausted`][crate::Error::Exhausted] instead of constructing a new object. It
    /// never waits for an object to be returned.
    ///
    /// By default there is no limit and the pool grows as needed.
    pub fn max_size(mut self, max_size: NonZero<usize>) -> Self {
        self.max_size = Some(max_size);
        self
    }

    /// Builds the pool with the specified configuration.
    ///
    /// The pool starts out empty. Use [`ObjectPool::prefill()`] to construct objects ahead of
    /// demand.
    #[must_use]
    pub fn build(self) -> ObjectPool<T> {
        ObjectPool::new_inner(
            self.name.unwrap_or_else(|| DEFAULT_POOL_NAME.to_owned()),
            self.max_size,
            self.factory,
        )
    }
}

impl<T> fmt::Debug for ObjectPoolBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectPoolBuilder")
            .field("name", &self.name)
            .field("max_size", &self.max_size)
            .finish_non_exhaustive()
    }
}
