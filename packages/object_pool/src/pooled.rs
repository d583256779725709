use std::fmt;
use std::mem::ManuallyDrop;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use crate::ObjectId;
use crate::pool::Shared;

/// An object checked out from an [`ObjectPool`][crate::ObjectPool].
///
/// The handle owns the object for as long as the caller holds it and gives access to it through
/// [`Deref`] and [`DerefMut`]. While the handle exists, the pool counts the object as in use.
///
/// The object goes back to the pool when the handle is passed to
/// [`ObjectPool::release()`][crate::ObjectPool::release] or [`release()`][Self::release], or
/// when the handle is dropped. The handle is not cloneable, so an object can be returned only once
/// per checkout.
///
/// The pool does not reset objects when they are returned. Whatever state the caller leaves in
/// the object is what the next caller receives.
///
/// # Example
///
/// ```
/// use object_pool::ObjectPool;
///
/// let pool = ObjectPool::new(String::new);
///
/// {
///     let mut greeting = pool.acquire().unwrap();
///     greeting.push_str("hello");
/// } // Returned to the pool here.
///
/// assert_eq!(pool.available_count(), 1);
/// assert_eq!(*pool.acquire().unwrap(), "hello");
/// ```
pub struct Pooled<T> {
    id: ObjectId,

    // Both fields are only ever taken out in `into_parts()` or `drop()`, whichever comes first.
    value: ManuallyDrop<T>,
    pool: ManuallyDrop<Arc<Shared<T>>>,
}

impl<T> Pooled<T> {
    pub(crate) fn new(id: ObjectId, value: T, pool: Arc<Shared<T>>) -> Self {
        Self {
            id,
            value: ManuallyDrop::new(value),
            pool: ManuallyDrop::new(pool),
        }
    }

    /// The identity of the object.
    ///
    /// The identity stays the same across any number of acquire/release cycles of the same
    /// object, so it can be used to recognize a reused object.
    #[must_use]
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Returns the object to the pool it was acquired from.
    ///
    /// This is the same as dropping the handle, spelled out for readability.
    pub fn release(self) {
        drop(self);
    }

    /// Takes the object out of pool management and returns it to the caller.
    ///
    /// The pool stops counting the object as in use and will never hand it out again. This is
    /// counted in [`PoolStats::detached()`][crate::PoolStats::detached].
    ///
    /// # Example
    ///
    /// ```
    /// use object_pool::ObjectPool;
    ///
    /// let pool = ObjectPool::new(|| String::from("keep me"));
    ///
    /// let owned: String = pool.acquire().unwrap().detach();
    ///
    /// assert_eq!(owned, "keep me");
    /// assert_eq!(pool.len(), 0);
    /// assert_eq!(pool.stats().detached(), 1);
    /// ```
    #[must_use]
    pub fn detach(self) -> T {
        let (id, value, pool) = self.into_parts();

        pool.forget(id);

        value
    }

    /// Disassembles the handle without running its `Drop` logic.
    pub(crate) fn into_parts(self) -> (ObjectId, T, Arc<Shared<T>>) {
        let mut this = ManuallyDrop::new(self);

        // SAFETY: `this` is never dropped and the field is not accessed again after this.
        let value = unsafe { ManuallyDrop::take(&mut this.value) };

        // SAFETY: `this` is never dropped and the field is not accessed again after this.
        let pool = unsafe { ManuallyDrop::take(&mut this.pool) };

        (this.id, value, pool)
    }
}

impl<T> Drop for Pooled<T> {
    fn drop(&mut self) {
        // SAFETY: We are in `drop()`, so the fields are never accessed again. Disassembled
        // handles do not reach this point because `into_parts()` suppresses `drop()`.
        let value = unsafe { ManuallyDrop::take(&mut self.value) };

        // SAFETY: See above.
        let pool = unsafe { ManuallyDrop::take(&mut self.pool) };

        pool.return_dropped(self.id, value);
    }
}

impl<T> Deref for Pooled<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T> DerefMut for Pooled<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.value
    }
}

impl<T> AsRef<T> for Pooled<T> {
    fn as_ref(&self) -> &T {
        &self.value
    }
}

impl<T> AsMut<T> for Pooled<T> {
    fn as_mut(&mut self) -> &mut T {
        &mut self.value
    }
}

impl<T: fmt::Debug> fmt::Debug for Pooled<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pooled")
            .field("id", &self.id)
            .field("pool", &self.pool.name())
            .field("value", &*self.value)
            .finish()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use static_assertions::{assert_impl_all, assert_not_impl_any};

    use super::*;
    use crate::ObjectPool;

    assert_impl_all!(Pooled<u32>: Send, Sync, fmt::Debug);
    assert_not_impl_any!(Pooled<u32>: Clone, Copy);

    #[test]
    fn drop_returns_to_pool() {
        let pool = ObjectPool::new(|| 5_u32);

        let object = pool.acquire().unwrap();
        assert_eq!(pool.in_use_count(), 1);

        drop(object);

        assert_eq!(pool.in_use_count(), 0);
        assert_eq!(pool.available_count(), 1);
    }

    #[test]
    fn release_method_returns_to_pool() {
        let pool = ObjectPool::new(|| 5_u32);

        let object = pool.acquire().unwrap();
        let id = object.id();
        object.release();

        assert_eq!(pool.available_count(), 1);
        assert_eq!(pool.acquire().unwrap().id(), id);
    }

    #[test]
    fn detach_removes_from_pool() {
        let pool = ObjectPool::new(|| vec![1_u8, 2, 3]);

        let object = pool.acquire().unwrap();
        let value = object.detach();

        assert_eq!(value, vec![1, 2, 3]);
        assert_eq!(pool.available_count(), 0);
        assert_eq!(pool.in_use_count(), 0);
        assert_eq!(pool.stats().created(), 1);
        assert_eq!(pool.stats().detached(), 1);

        // The detached object is gone for good, so the next acquire constructs a new one.
        _ = pool.acquire().unwrap();
        assert_eq!(pool.stats().created(), 2);
    }

    #[test]
    fn outlives_pool_handle() {
        let pool = ObjectPool::new(|| 9_u32);
        let clone = pool.clone();

        let object = pool.acquire().unwrap();
        drop(pool);

        assert_eq!(*object, 9);
        drop(object);

        assert_eq!(clone.available_count(), 1);
    }

    #[test]
    fn outlives_all_pool_handles() {
        let pool = ObjectPool::new(|| String::from("orphan"));

        let object = pool.acquire().unwrap();
        drop(pool);

        // The shared pool state stays alive until the last checked out object is gone.
        assert_eq!(*object, "orphan");
    }

    #[test]
    fn deref_and_as_ref_give_access() {
        let pool = ObjectPool::new(|| 1_i64);

        let mut object = pool.acquire().unwrap();
        *object += 1;
        *object.as_mut() *= 10;

        assert_eq!(*object.as_ref(), 20);
        assert_eq!(*object, 20);
    }

    #[test]
    fn debug_shows_value_and_identity() {
        let pool = ObjectPool::builder(|| 77_u32).name("numbers").build();

        let object = pool.acquire().unwrap();
        let output = format!("{object:?}");

        assert!(output.contains("77"));
        assert!(output.contains("numbers"));
    }
}
