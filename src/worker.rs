//! Bulk driver for load and correctness tests.
//!
//! A [`Worker`] pushes a prepared batch into a shared queue and drains items
//! back out into its own buffer. It never spawns threads: callers decide
//! which thread runs which method and join them.

use crate::error::PushError;
use crate::mpmc::ConcurrentQueue;
use crate::trace::{debug, warn};
use crate::{BlockingQueue, MpmcQueue};
use crossbeam::utils::Backoff;
use std::sync::Arc;

pub struct Worker<T: Send + 'static, Q: MpmcQueue<T> = ConcurrentQueue<T>> {
   queue    : Arc<Q>,
   write_buf: Vec<T>, // items `push_all` sends
   read_buf : Vec<T>, // items drained so far, in pop order
}

impl<T: Send + 'static, Q: MpmcQueue<T>> Worker<T, Q> {
   pub fn new(queue: Arc<Q>) -> Self {
      Self {
         queue,
         write_buf: Vec::new(),
         read_buf : Vec::new(),
      }
   }

   /// Replace the write buffer. Does not touch the queue.
   pub fn init(&mut self, items: impl IntoIterator<Item = T>) {
      self.write_buf = items.into_iter().collect();
   }

   pub fn queue(&self) -> &Arc<Q> {
      &self.queue
   }

   pub fn write_buffer(&self) -> &[T] {
      &self.write_buf
   }

   pub fn read_buffer(&self) -> &[T] {
      &self.read_buf
   }

   pub fn take_read_buffer(&mut self) -> Vec<T> {
      std::mem::take(&mut self.read_buf)
   }

   /// Push every write-buffer item in order on the calling thread.
   ///
   /// The queue is left open; whoever joins the producers closes it.
   ///
   /// # Errors
   ///
   /// Stops at the first rejected push (queue closed) and returns it.
   pub fn push_all(&self) -> Result<usize, PushError<T>>
   where
      T: Clone,
   {
      for item in &self.write_buf {
         if let Err(e) = self.queue.push(item.clone()) {
            warn!(total = self.write_buf.len(), "queue closed during push_all");
            return Err(e);
         }
      }
      debug!(pushed = self.write_buf.len(), "push_all done");
      Ok(self.write_buf.len())
   }

   /// Pop until the first empty `try_pop`.
   ///
   /// Emptiness is not completion: run next to a producer that is still
   /// pushing, this can return early with only part of the items. Use
   /// [`drain_all`](Self::drain_all) unless every push has already happened.
   pub fn drain_available(&mut self) -> usize {
      let before = self.read_buf.len();
      while let Some(item) = self.queue.try_pop() {
         self.read_buf.push(item);
      }
      self.read_buf.len() - before
   }

   /// Pop until the queue is closed and empty.
   ///
   /// Backs off while the queue is empty but still open, so the producers
   /// must eventually `close` it or this never returns.
   pub fn drain_all(&mut self) -> usize {
      let before = self.read_buf.len();
      let backoff = Backoff::new();
      loop {
         if let Some(item) = self.queue.try_pop() {
            self.read_buf.push(item);
            backoff.reset();
            continue;
         }
         if self.queue.is_closed() {
            // pushes that landed between the empty pop and the close
            self.drain_available();
            break;
         }
         backoff.snooze();
      }
      let drained = self.read_buf.len() - before;
      debug!(drained, "drain_all done");
      drained
   }
}

impl<T: Send + 'static, Q: BlockingQueue<T>> Worker<T, Q> {
   /// Like [`drain_all`](Self::drain_all) but sleeps on the queue instead of
   /// polling it.
   pub fn drain_blocking(&mut self) -> usize {
      let before = self.read_buf.len();
      while let Ok(item) = self.queue.wait_and_pop() {
         self.read_buf.push(item);
      }
      let drained = self.read_buf.len() - before;
      debug!(drained, "drain_blocking done");
      drained
   }
}
