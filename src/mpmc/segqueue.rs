// Lock-free baseline – crossbeam's segmented MPMC queue plus a close flag.
//
// Only non-blocking operations; used to put the mutex queue's throughput
// into perspective.

use crate::error::PushError;
use crate::trace::debug;
use crate::MpmcQueue;
use crossbeam::queue::SegQueue;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

pub struct LockFreeQueue<T> {
   inner  : SegQueue<T>,
   closed : AtomicBool,
   // producers between their `closed` check and the end of their push
   writers: AtomicUsize,
}

impl<T> LockFreeQueue<T> {
   pub fn new() -> Self {
      Self {
         inner  : SegQueue::new(),
         closed : AtomicBool::new(false),
         writers: AtomicUsize::new(0),
      }
   }
}

impl<T> Default for LockFreeQueue<T> {
   fn default() -> Self {
      Self::new()
   }
}

impl<T: Send + 'static> MpmcQueue<T> for LockFreeQueue<T> {
   fn push(&self, item: T) -> Result<(), PushError<T>> {
      // SeqCst on both sides: either `close` sees us in `writers`, or we see
      // its flag and back off.
      self.writers.fetch_add(1, Ordering::SeqCst);
      if self.closed.load(Ordering::SeqCst) {
         self.writers.fetch_sub(1, Ordering::SeqCst);
         return Err(PushError(item));
      }
      self.inner.push(item);
      self.writers.fetch_sub(1, Ordering::SeqCst);
      Ok(())
   }

   #[inline]
   fn try_pop(&self) -> Option<T> {
      self.inner.pop()
   }

   fn close(&self) -> bool {
      let newly_closed = !self.closed.swap(true, Ordering::SeqCst);
      debug!(remaining = self.inner.len(), newly_closed, "lock-free queue closed");
      newly_closed
   }

   fn is_closed(&self) -> bool {
      self.closed.load(Ordering::SeqCst) && self.writers.load(Ordering::SeqCst) == 0
   }

   fn len(&self) -> usize {
      self.inner.len()
   }

   fn is_empty(&self) -> bool {
      self.inner.is_empty()
   }
}

impl<T> fmt::Debug for LockFreeQueue<T> {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.debug_struct("LockFreeQueue")
       .field("len", &self.inner.len())
       .field("closed", &self.closed.load(Ordering::Relaxed))
       .finish()
   }
}
