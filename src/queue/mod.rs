//! Bounded FIFO of fixed-size records over a circular buffer.
//!
//! The buffer has `len` slots. `front` is the next slot to consume and `rear`
//! the next slot to produce, both modulo `len`. One slot is never filled so
//! `front == rear` always means empty; a full queue holds `len - 1` records.
//!
//! Every operation is all-or-nothing: when the requested count cannot be
//! satisfied nothing is copied and neither index moves.

use alloc::{boxed::Box, vec::Vec};
use core::fmt;

mod shared;

pub use shared::EventQueue;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueueError {
    ZeroLength,
    ZeroSizedItem,
    Alloc,
    EmptyRequest,
    Insufficient { requested: usize, available: usize },
}

impl fmt::Display for QueueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroLength => f.write_str("queue length must be > 0"),
            Self::ZeroSizedItem => f.write_str("queue records must have a non-zero size"),
            Self::Alloc => f.write_str("queue storage allocation failed"),
            Self::EmptyRequest => f.write_str("request must cover at least one record"),
            Self::Insufficient {
                requested,
                available,
            } => write!(f, "requested {requested} records, {available} available"),
        }
    }
}

pub struct RingQueue<T> {
    // Slots outside `front..rear` hold stale or default records and are never read.
    slots: Box<[T]>,
    front: usize,
    rear: usize,
}

impl<T: Copy + Default> RingQueue<T> {
    pub fn new(len: usize) -> Result<Self, QueueError> {
        if len == 0 {
            return Err(QueueError::ZeroLength);
        }
        if core::mem::size_of::<T>() == 0 {
            return Err(QueueError::ZeroSizedItem);
        }
        let mut storage = Vec::new();
        storage
            .try_reserve_exact(len)
            .map_err(|_| QueueError::Alloc)?;
        storage.resize(len, T::default());
        Ok(Self {
            slots: storage.into_boxed_slice(),
            front: 0,
            rear: 0,
        })
    }

    /// Records currently stored.
    pub fn len(&self) -> usize {
        if self.front <= self.rear {
            self.rear - self.front
        } else {
            self.slots.len() - self.front + self.rear
        }
    }

    /// Records that can still be put before the queue is full.
    pub fn free_slots(&self) -> usize {
        self.capacity() - self.len()
    }

    pub fn capacity(&self) -> usize {
        self.slots.len() - 1
    }

    pub fn is_full(&self) -> bool {
        self.len() == self.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.front == self.rear
    }

    pub fn put(&mut self, items: &[T]) -> Result<(), QueueError> {
        let requested = items.len();
        if requested == 0 {
            return Err(QueueError::EmptyRequest);
        }
        let available = self.free_slots();
        if requested > available {
            return Err(QueueError::Insufficient {
                requested,
                available,
            });
        }

        let ring_len = self.slots.len();
        let first = (ring_len - self.rear).min(requested);
        let (head, tail) = items.split_at(first);
        self.slots[self.rear..self.rear + first].copy_from_slice(head);
        self.slots[..tail.len()].copy_from_slice(tail);
        self.rear = (self.rear + requested) % ring_len;
        Ok(())
    }

    pub fn get(&mut self, out: &mut [T]) -> Result<(), QueueError> {
        self.peek(out, 0)?;
        self.front = (self.front + out.len()) % self.slots.len();
        Ok(())
    }

    /// Copies `out.len()` records starting `offset` records past the front
    /// without consuming them.
    pub fn peek(&self, out: &mut [T], offset: usize) -> Result<(), QueueError> {
        let requested = out.len();
        if requested == 0 {
            return Err(QueueError::EmptyRequest);
        }
        let stored = self.len();
        if offset.saturating_add(requested) > stored {
            return Err(QueueError::Insufficient {
                requested: offset.saturating_add(requested),
                available: stored,
            });
        }

        let ring_len = self.slots.len();
        let start = (self.front + offset) % ring_len;
        let first = (ring_len - start).min(requested);
        let (head, tail) = out.split_at_mut(first);
        head.copy_from_slice(&self.slots[start..start + first]);
        tail.copy_from_slice(&self.slots[..requested - first]);
        Ok(())
    }

    /// Discards the `count` oldest records.
    pub fn pop(&mut self, count: usize) -> Result<(), QueueError> {
        if count == 0 {
            return Err(QueueError::EmptyRequest);
        }
        let stored = self.len();
        if count > stored {
            return Err(QueueError::Insufficient {
                requested: count,
                available: stored,
            });
        }
        self.front = (self.front + count) % self.slots.len();
        Ok(())
    }

    pub fn pop_all(&mut self) {
        self.front = self.rear;
    }

    pub fn push(&mut self, item: T) -> Result<(), QueueError> {
        self.put(core::slice::from_ref(&item))
    }

    pub fn pop_front(&mut self) -> Option<T> {
        let item = self.front()?;
        self.front = (self.front + 1) % self.slots.len();
        Some(item)
    }

    pub fn front(&self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        Some(self.slots[self.front])
    }
}
