pub mod error;
pub mod mpmc;
pub mod trace;
pub mod worker;

use std::time::Duration;

pub use error::{ClosedError, PushError, WaitTimeoutError};
pub use mpmc::ConcurrentQueue;
pub use mpmc::LockFreeQueue;
pub use trace::init_tracing;
pub use worker::Worker;

/// Common interface for all queues.
pub trait MpmcQueue<T: Send>: Send + Sync + 'static {
   /// Appends `item` at the tail. Fails only once the queue is closed.
   fn push(&self, item: T) -> Result<(), PushError<T>>;
   /// Removes the head item, or returns `None` right away when empty.
   fn try_pop(&self) -> Option<T>;

   /// Closes the queue. Returns `true` for the call that actually closed it.
   fn close(&self) -> bool;
   /// True once the queue is closed *and* no push can still land, so a
   /// drain that then runs until `try_pop` returns `None` has seen everything.
   fn is_closed(&self) -> bool;

   fn len(&self) -> usize;
   fn is_empty(&self) -> bool {
      self.len() == 0
   }
}

/// Queues whose consumers can sleep until an item arrives.
pub trait BlockingQueue<T: Send>: MpmcQueue<T> {
   /// Blocks until an item is available. Errors once closed and empty.
   fn wait_and_pop(&self) -> Result<T, ClosedError>;
   /// Like `wait_and_pop`, but gives up after `timeout`.
   fn wait_and_pop_timeout(&self, timeout: Duration) -> Result<T, WaitTimeoutError>;
}
