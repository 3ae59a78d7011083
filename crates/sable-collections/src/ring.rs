//! A fixed-capacity FIFO ring buffer.
//!
//! Unlike `VecDeque`, a [`RingBuffer`] never grows: pushing into a full
//! buffer overwrites the oldest element. That makes it suitable as a bounded
//! recycle queue where dropping the oldest entry is an acceptable trade
//! against unbounded growth.

use std::mem;

/// Bounded FIFO queue with overwrite-oldest-on-full push.
#[derive(Debug)]
pub struct RingBuffer<T> {
    /// Backing storage; `None` marks a slot that has never held a value or
    /// whose value was popped.
    buf: Vec<Option<T>>,
    /// Index of the next write position.
    back: usize,
    /// Number of queued elements.
    len: usize,
}

impl<T> RingBuffer<T> {
    /// Create a buffer holding at most `capacity` elements.
    ///
    /// A zero-capacity buffer is valid: it is always empty and full, and
    /// every push is dropped.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut buf = Vec::with_capacity(capacity);
        buf.resize_with(capacity, || None);
        Self { buf, back: 0, len: 0 }
    }

    /// Append an element at the back.
    ///
    /// When the buffer is full the oldest element is overwritten and the
    /// push still succeeds.
    pub fn push(&mut self, value: T) {
        let capacity = self.buf.len();
        if capacity == 0 {
            return;
        }
        self.buf[self.back] = Some(value);
        self.back = (self.back + 1) % capacity;
        if self.len < capacity {
            self.len += 1;
        }
    }

    /// Remove and return the oldest element, or `None` if empty.
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let front = self.front_index();
        self.len -= 1;
        self.buf[front].take()
    }

    /// Peek at the oldest element without removing it.
    pub fn peek(&self) -> Option<&T> {
        if self.len == 0 {
            return None;
        }
        self.buf[self.front_index()].as_ref()
    }

    /// Number of queued elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the buffer holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether a push would overwrite the oldest element.
    pub fn is_full(&self) -> bool {
        self.len == self.buf.len()
    }

    /// Maximum number of elements the buffer can hold.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Bytes of heap memory owned by the backing storage.
    pub fn mem_usage(&self) -> usize {
        self.buf.capacity() * mem::size_of::<Option<T>>()
    }

    /// Index of the oldest element. Only meaningful when `len > 0`.
    fn front_index(&self) -> usize {
        (self.back + self.buf.len() - self.len) % self.buf.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
