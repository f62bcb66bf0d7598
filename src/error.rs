use std::fmt;

/// Push on a closed queue. Carries the rejected item back to the caller.
#[derive(PartialEq, Eq, Clone, Copy, thiserror::Error)]
#[error("pushing on a closed queue")]
pub struct PushError<T>(pub T);

impl<T> PushError<T> {
   pub fn into_inner(self) -> T {
      self.0
   }
}

impl<T> fmt::Debug for PushError<T> {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.write_str("PushError { .. }")
   }
}

/// Blocking pop on a queue that is closed and fully drained.
#[derive(Debug, PartialEq, Eq, Clone, Copy, thiserror::Error)]
#[error("queue is closed and empty")]
pub struct ClosedError;

#[derive(Debug, PartialEq, Eq, Clone, Copy, thiserror::Error)]
pub enum WaitTimeoutError {
   #[error("timed out waiting on an empty queue")]
   Timeout,
   #[error("queue is closed and empty")]
   Closed,
}

impl From<ClosedError> for WaitTimeoutError {
   fn from(_: ClosedError) -> Self {
      WaitTimeoutError::Closed
   }
}
