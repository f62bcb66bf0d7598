// Unbounded multi-producer / multi-consumer FIFO queue
//
// One mutex serialises every access to the buffer, so all pushes and pops
// form a single total order (lock-acquisition order). A condition variable
// lets consumers sleep while the queue is empty instead of polling.

use crate::error::{ClosedError, PushError, WaitTimeoutError};
use crate::trace::{debug, trace};
use crate::{BlockingQueue, MpmcQueue};
use std::{
   collections::VecDeque,
   fmt,
   sync::{Condvar, Mutex, MutexGuard, PoisonError},
   time::{Duration, Instant},
};

/*──────────────────────────────────────────────────────────────────────────*/
/*  Shared state                                                            */
/*──────────────────────────────────────────────────────────────────────────*/

struct State<T> {
   items : VecDeque<T>, // head at the front, tail at the back
   closed: bool,
}

pub struct ConcurrentQueue<T> {
   state    : Mutex<State<T>>,
   available: Condvar, // signalled on push (one waiter) and close (all)
}

impl<T> ConcurrentQueue<T> {
   pub fn new() -> Self {
      Self::with_capacity(0)
   }

   /// Pre-size the buffer. The queue still grows without bound.
   pub fn with_capacity(cap: usize) -> Self {
      Self {
         state: Mutex::new(State {
            items : VecDeque::with_capacity(cap),
            closed: false,
         }),
         available: Condvar::new(),
      }
   }

   // No user code runs while the lock is held, so a panic elsewhere can
   // never leave `State` half-updated and poisoning carries no information.
   #[inline]
   fn lock(&self) -> MutexGuard<'_, State<T>> {
      self.state.lock().unwrap_or_else(PoisonError::into_inner)
   }
}

/*──────────────────────────── queue operations ────────────────────────────*/

impl<T> ConcurrentQueue<T> {
   /// Append `item` as the new tail and wake one blocked consumer.
   pub fn push(&self, item: T) -> Result<(), PushError<T>> {
      let mut state = self.lock();
      if state.closed {
         return Err(PushError(item));
      }
      state.items.push_back(item);
      drop(state);

      self.available.notify_one();
      Ok(())
   }

   /// Remove the head item without ever suspending the caller.
   #[inline]
   pub fn try_pop(&self) -> Option<T> {
      self.lock().items.pop_front()
   }

   /// Sleep until an item is available, then remove and return the head.
   ///
   /// Queued items are still handed out after `close`; the error is only
   /// returned once the queue is closed *and* empty.
   pub fn wait_and_pop(&self) -> Result<T, ClosedError> {
      let mut state = self.lock();
      loop {
         if let Some(item) = state.items.pop_front() {
            return Ok(item);
         }
         if state.closed {
            return Err(ClosedError);
         }
         // spurious wakeups fall through to the re-check above
         state = self.available.wait(state).unwrap_or_else(PoisonError::into_inner);
      }
   }

   /// `wait_and_pop` bounded by `timeout`.
   pub fn wait_and_pop_timeout(&self, timeout: Duration) -> Result<T, WaitTimeoutError> {
      let deadline = match Instant::now().checked_add(timeout) {
         Some(d) => d,
         None => return self.wait_and_pop().map_err(WaitTimeoutError::from),
      };

      let mut state = self.lock();
      loop {
         // check the buffer before the clock: a notification that races
         // the deadline must still deliver its item
         if let Some(item) = state.items.pop_front() {
            return Ok(item);
         }
         if state.closed {
            return Err(WaitTimeoutError::Closed);
         }

         let now = Instant::now();
         if now >= deadline {
            trace!(?timeout, "wait_and_pop timed out");
            return Err(WaitTimeoutError::Timeout);
         }
         let (guard, _) = self
            .available
            .wait_timeout(state, deadline - now)
            .unwrap_or_else(PoisonError::into_inner);
         state = guard;
      }
   }

   /// Reject further pushes and wake every blocked consumer.
   pub fn close(&self) -> bool {
      let mut state = self.lock();
      let newly_closed = !state.closed;
      state.closed = true;
      debug!(remaining = state.items.len(), newly_closed, "queue closed");
      drop(state);

      self.available.notify_all();
      newly_closed
   }

   pub fn is_closed(&self) -> bool {
      self.lock().closed
   }

   pub fn len(&self) -> usize {
      self.lock().items.len()
   }

   pub fn is_empty(&self) -> bool {
      self.lock().items.is_empty()
   }
}

impl<T> Default for ConcurrentQueue<T> {
   fn default() -> Self {
      Self::new()
   }
}

impl<T> fmt::Debug for ConcurrentQueue<T> {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      let state = self.lock();
      f.debug_struct("ConcurrentQueue")
       .field("len", &state.items.len())
       .field("closed", &state.closed)
       .finish()
   }
}

/*──────────────────────────── trait plumbing ──────────────────────────────*/

impl<T: Send + 'static> MpmcQueue<T> for ConcurrentQueue<T> {
   #[inline]
   fn push(&self, item: T) -> Result<(), PushError<T>> {
      ConcurrentQueue::push(self, item)
   }

   #[inline]
   fn try_pop(&self) -> Option<T> {
      ConcurrentQueue::try_pop(self)
   }

   fn close(&self) -> bool {
      ConcurrentQueue::close(self)
   }

   // pushes check `closed` under the same lock, so the flag alone is final
   fn is_closed(&self) -> bool {
      ConcurrentQueue::is_closed(self)
   }

   fn len(&self) -> usize {
      ConcurrentQueue::len(self)
   }

   fn is_empty(&self) -> bool {
      ConcurrentQueue::is_empty(self)
   }
}

impl<T: Send + 'static> BlockingQueue<T> for ConcurrentQueue<T> {
   fn wait_and_pop(&self) -> Result<T, ClosedError> {
      ConcurrentQueue::wait_and_pop(self)
   }

   fn wait_and_pop_timeout(&self, timeout: Duration) -> Result<T, WaitTimeoutError> {
      ConcurrentQueue::wait_and_pop_timeout(self, timeout)
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn debug_reports_len_and_closed() {
      let q = ConcurrentQueue::new();
      q.push(1).unwrap();
      q.push(2).unwrap();
      q.close();
      assert_eq!(format!("{q:?}"), "ConcurrentQueue { len: 2, closed: true }");
   }

   #[test]
   fn poisoned_lock_is_recovered() {
      use std::sync::Arc;

      let q = Arc::new(ConcurrentQueue::new());
      q.push(1).unwrap();

      let q2 = Arc::clone(&q);
      let res = std::thread::spawn(move || {
         let _guard = q2.state.lock().unwrap();
         panic!("poison the queue lock");
      })
      .join();
      assert!(res.is_err());
      assert!(q.state.is_poisoned());

      assert_eq!(q.try_pop(), Some(1));
      q.push(2).unwrap();
      assert_eq!(q.wait_and_pop(), Ok(2));
   }

   #[test]
   fn huge_timeout_behaves_like_infinite_wait() {
      let q = ConcurrentQueue::new();
      q.push(5).unwrap();
      assert_eq!(q.wait_and_pop_timeout(Duration::MAX), Ok(5));
      q.close();
      assert_eq!(q.wait_and_pop_timeout(Duration::MAX), Err(WaitTimeoutError::Closed));
   }
}
