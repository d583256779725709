#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! This package provides [`ObjectPool`], a thread-safe pool of reusable objects that are
//! expensive to construct.
//!
//! Instead of constructing and discarding such objects over and over, callers borrow an object
//! from the pool and give it back when done, so the next caller can reuse it. The pool is generic
//! over the object type and does not know or care what the objects do; new objects are created by
//! a factory function supplied when the pool is built.
//!
//! # Features
//!
//! - **Reuse before construction**: [`acquire()`][ObjectPool::acquire] hands out the idle object
//!   that has waited longest, and only calls the factory when no object is idle.
//! - **Never waits**: acquiring an object never blocks waiting for another caller to return one.
//!   The pool grows instead (or fails fast if a maximum size is configured).
//! - **Identity tracking**: every object has an [`ObjectId`] that survives reuse. The pool knows
//!   at all times which objects are available and which are in use, and every object is in
//!   exactly one of the two groups.
//! - **Safe return**: objects go back via [`release()`][ObjectPool::release] or by dropping the
//!   [`Pooled`] handle. Releasing into the wrong pool is refused and the object handed back.
//! - **Fallible factories**: construction errors surface as [`Error::Construction`] and leave the
//!   pool untouched.
//! - **Diagnostics**: point-in-time counters via [`available_count()`][ObjectPool::available_count],
//!   [`in_use_count()`][ObjectPool::in_use_count] and [`stats()`][ObjectPool::stats], plus
//!   `tracing` events for construction, reuse and rejected operations.
//!
//! # Example
//!
//! ```rust
//! use object_pool::ObjectPool;
//!
//! struct Connection {
//!     data: String,
//! }
//!
//! let pool = ObjectPool::new(|| Connection {
//!     data: String::from("New Object"),
//! });
//!
//! // The pool starts out empty, so this constructs a new object.
//! let connection = pool.acquire().unwrap();
//! println!("Acquired: {}", connection.data);
//!
//! assert_eq!(pool.available_count(), 0);
//! assert_eq!(pool.in_use_count(), 1);
//!
//! pool.release(connection).unwrap();
//!
//! assert_eq!(pool.available_count(), 1);
//! assert_eq!(pool.in_use_count(), 0);
//! ```
//!
//! # Sizing
//!
//! By default the pool is unbounded. It grows by one object whenever an object is requested while
//! all existing objects are in use, and it never destroys objects on its own, so its size settles
//! at the peak number of objects that were in use at the same time. This is a deliberate
//! limitation: objects are expected to be worth keeping once constructed.
//!
//! To cap the size, use [`ObjectPoolBuilder::max_size()`]. A capped pool rejects acquisitions
//! beyond the cap with [`Error::Exhausted`] instead of waiting.
//!
//! # Thread safety
//!
//! [`ObjectPool`] is a cloneable handle that can be shared between threads. All operations run
//! under a single per-pool lock covering both the available and the in-use collections. Counts
//! are snapshots and may be stale as soon as they are returned, so they are meant for monitoring,
//! not for coordinating between threads.

mod builder;
mod constants;
mod error;
mod object_id;
mod pool;
mod pooled;
mod state;
mod stats;

pub use builder::*;
pub use error::*;
pub use object_id::ObjectId;
pub use pool::ObjectPool;
pub use pooled::*;
pub use stats::*;
