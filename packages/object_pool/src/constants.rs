// A poisoned lock means another thread panicked halfway through moving an object between the
// available and in-use collections. The membership invariant can no longer be trusted (we panic).
pub(crate) const ERR_POISONED_LOCK: &str = "encountered poisoned lock - pool membership \
    can no longer be trusted because a thread panicked while mutating it";

/// Used when the caller does not give the pool a name of its own.
pub(crate) const DEFAULT_POOL_NAME: &str = "object_pool";
