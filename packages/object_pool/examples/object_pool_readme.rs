//! Example that demonstrates the basic borrow-and-return cycle of an `ObjectPool`.
//!
//! A pool of objects carrying some data is created, one object is acquired, its data printed,
//! and the object is released again before the pool counters are printed.

use object_pool::ObjectPool;

/// An object that is expensive to construct. The pool does not care what it holds.
#[derive(Debug)]
struct PooledObject {
    data: String,
}

impl PooledObject {
    fn new(data: &str) -> Self {
        Self {
            data: data.to_owned(),
        }
    }
}

fn main() {
    println!("=== Object Pool README Example ===");

    let pool = ObjectPool::new(|| PooledObject::new("New Object"));

    // Acquire an object from the pool. The pool is empty, so a new object is constructed.
    let object = pool.acquire().expect("infallible factory cannot fail");
    println!("Acquired Object 1: {}", object.data);

    // Give the object back so it can be reused.
    pool.release(object).expect("object was acquired from this pool");
    println!("Released Object 1");

    println!("Available Objects: {}", pool.available_count());
    println!("In Use Objects: {}", pool.in_use_count());

    assert_eq!(pool.available_count(), 1);
    assert_eq!(pool.in_use_count(), 0);
}
