mod locked;
mod segqueue;

pub use locked::ConcurrentQueue;
pub use segqueue::LockFreeQueue;
