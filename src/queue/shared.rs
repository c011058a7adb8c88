use core::cell::RefCell;

use embassy_sync::blocking_mutex::{raw::RawMutex, Mutex};

use super::{QueueError, RingQueue};
use crate::types::ButtonEvent;

/// [`RingQueue`] behind a caller-chosen lock.
///
/// `M` is the concurrency policy: `NoopRawMutex` when producer and consumer
/// are scheduled cooperatively in one context, `CriticalSectionRawMutex` (or
/// any other `RawMutex`) when the scan tick and the application loop can
/// preempt each other.
pub struct EventQueue<M: RawMutex, T> {
    inner: Mutex<M, RefCell<RingQueue<T>>>,
}

impl<M: RawMutex, T: Copy + Default> EventQueue<M, T> {
    pub fn new(len: usize) -> Result<Self, QueueError> {
        let ring = RingQueue::new(len)?;
        log::debug!("queue: created len={} capacity={}", len, ring.capacity());
        Ok(Self {
            inner: Mutex::new(RefCell::new(ring)),
        })
    }

    fn with<R>(&self, f: impl FnOnce(&mut RingQueue<T>) -> R) -> R {
        self.inner.lock(|ring| f(&mut ring.borrow_mut()))
    }

    pub fn len(&self) -> usize {
        self.with(|ring| ring.len())
    }

    pub fn free_slots(&self) -> usize {
        self.with(|ring| ring.free_slots())
    }

    pub fn capacity(&self) -> usize {
        self.with(|ring| ring.capacity())
    }

    pub fn is_full(&self) -> bool {
        self.with(|ring| ring.is_full())
    }

    pub fn is_empty(&self) -> bool {
        self.with(|ring| ring.is_empty())
    }

    pub fn put(&self, items: &[T]) -> Result<(), QueueError> {
        self.with(|ring| ring.put(items))
    }

    pub fn get(&self, out: &mut [T]) -> Result<(), QueueError> {
        self.with(|ring| ring.get(out))
    }

    pub fn peek(&self, out: &mut [T], offset: usize) -> Result<(), QueueError> {
        self.with(|ring| ring.peek(out, offset))
    }

    pub fn pop(&self, count: usize) -> Result<(), QueueError> {
        self.with(|ring| ring.pop(count))
    }

    pub fn pop_all(&self) {
        self.with(|ring| ring.pop_all())
    }

    pub fn push(&self, item: T) -> Result<(), QueueError> {
        self.with(|ring| ring.push(item))
    }

    pub fn pop_front(&self) -> Option<T> {
        self.with(|ring| ring.pop_front())
    }

    pub fn front(&self) -> Option<T> {
        self.with(|ring| ring.front())
    }
}

impl<M: RawMutex> EventQueue<M, ButtonEvent> {
    /// Removes and returns the oldest event. `None` just means nothing is
    /// pending.
    pub fn read_event(&self) -> Option<ButtonEvent> {
        self.pop_front()
    }

    pub fn peek_event(&self) -> Option<ButtonEvent> {
        self.front()
    }
}
