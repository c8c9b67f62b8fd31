use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Fixed-capacity FIFO of recent samples, the data behind a sparkline.
///
/// Storage is allocated once; once full, each `push` overwrites the oldest
/// slot in place.
#[derive(Debug, Clone)]
pub struct BoundedHistory<T> {
    slots:    Vec<T>,
    /// Index of the oldest sample once `slots` is full.
    head:     usize,
    capacity: usize,
}

impl<T: Clone> BoundedHistory<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            head:  0,
            capacity,
        }
    }

    /// Append a sample, evicting the oldest if at capacity.
    pub fn push(&mut self, value: T) {
        if self.capacity == 0 {
            return;
        }
        if self.slots.len() < self.capacity {
            self.slots.push(value);
        } else {
            self.slots[self.head] = value;
            self.head = (self.head + 1) % self.capacity;
        }
    }

    /// Copy of the contents, oldest first.
    pub fn snapshot(&self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.slots.len());
        out.extend_from_slice(&self.slots[self.head..]);
        out.extend_from_slice(&self.slots[..self.head]);
        out
    }

    /// Most recent sample.
    pub fn latest(&self) -> Option<&T> {
        if self.slots.is_empty() {
            return None;
        }
        let idx = (self.head + self.slots.len() - 1) % self.slots.len();
        self.slots.get(idx)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// A [`BoundedHistory`] shared between the sampler (single writer) and any
/// number of readers.
///
/// The lock is held only for the append or the copy; readers iterate their
/// own snapshot and never hold up the writer.
#[derive(Debug, Clone)]
pub struct SharedHistory<T> {
    inner: Arc<Mutex<BoundedHistory<T>>>,
}

impl<T: Clone> SharedHistory<T> {
    pub fn new(capacity: usize) -> Self {
        Self { inner: Arc::new(Mutex::new(BoundedHistory::new(capacity))) }
    }

    pub fn push(&self, value: T) {
        self.lock().push(value);
    }

    /// Isolated copy of the contents, oldest first.
    pub fn snapshot(&self) -> Vec<T> {
        self.lock().snapshot()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.lock().capacity()
    }

    // A panic mid-push cannot leave the ring inconsistent, so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, BoundedHistory<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
