use std::fmt;
use std::num::NonZero;

use thiserror::Error;

use crate::{ObjectId, Pooled};

/// Boxed error produced by a fallible object factory.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur when acquiring objects from an [`ObjectPool`][crate::ObjectPool].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The factory failed to construct a new object. The pool state is unchanged.
    #[error("failed to construct a new pooled object: {source}")]
    Construction {
        /// The error returned by the factory.
        #[source]
        source: BoxError,
    },

    /// The pool is configured with a maximum size, every slot is taken and no object is idle.
    #[error("pool is exhausted: all {max_size} objects are in use")]
    Exhausted {
        /// The configured maximum number of objects the pool may manage at once.
        max_size: NonZero<usize>,
    },
}

/// A specialized `Result` type for pool operations, returning the crate's
/// [`Error`] type as the error value.
pub type Result<T> = std::result::Result<T, Error>;

/// Returned by [`ObjectPool::release()`][crate::ObjectPool::release] when the object is not
/// checked out from that pool.
///
/// The pool state is not modified. The rejected object is carried back to the caller and can be
/// recovered via [`into_inner()`][Self::into_inner]; if this error is simply dropped, the object
/// returns to the pool it was actually acquired from.
#[derive(Error)]
#[error("object {object_id} is not checked out from this pool")]
pub struct ReleaseError<T> {
    object_id: ObjectId,
    pooled: Pooled<T>,
}

impl<T> ReleaseError<T> {
    pub(crate) fn new(pooled: Pooled<T>) -> Self {
        Self {
            object_id: pooled.id(),
            pooled,
        }
    }

    /// The identity of the rejected object.
    #[must_use]
    pub fn object_id(&self) -> ObjectId {
        self.object_id
    }

    /// Recovers the rejected object so it can be released to the pool that owns it.
    #[must_use]
    pub fn into_inner(self) -> Pooled<T> {
        self.pooled
    }
}

// Manual impl so that `T` does not need to be `Debug` for the error to be usable with `?`.
impl<T> fmt::Debug for ReleaseError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReleaseError")
            .field("object_id", &self.object_id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::fmt::Debug;
    use std::io;

    use static_assertions::assert_impl_all;

    use super::*;
    use crate::ObjectPool;

    assert_impl_all!(Error: Send, Sync, Debug);
    assert_impl_all!(ReleaseError<u32>: Send, Sync, Debug);

    #[test]
    fn construction_error_exposes_source() {
        let error = Error::Construction {
            source: Box::new(io::Error::other("disk on fire")),
        };

        let source = std::error::Error::source(&error).expect("construction error has a source");
        assert_eq!(source.to_string(), "disk on fire");
        assert!(error.to_string().contains("disk on fire"));
    }

    #[test]
    fn exhausted_error_mentions_cap() {
        let error = Error::Exhausted {
            max_size: NonZero::new(3).unwrap(),
        };

        assert_eq!(error.to_string(), "pool is exhausted: all 3 objects are in use");
    }

    #[test]
    fn release_error_returns_object() {
        let owner = ObjectPool::new(|| 7_u32);
        let other = ObjectPool::new(|| 0_u32);

        let pooled = owner.acquire().unwrap();
        let id = pooled.id();

        let error = other.release(pooled).unwrap_err();
        assert_eq!(error.object_id(), id);
        assert!(error.to_string().contains(&id.to_string()));

        let pooled = error.into_inner();
        assert_eq!(*pooled, 7);
        assert_eq!(owner.in_use_count(), 1);
    }
}
