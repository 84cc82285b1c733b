/// Fixed-capacity circular store keeping the most recently added items.
///
/// Storage is allocated once at construction and never grows. Once full,
/// every [`RingBuffer::add`] silently evicts the oldest item.
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    buf: Box<[Option<T>]>,
    start: usize,
    size: usize,
}

impl<T: Clone> RingBuffer<T> {
    /// A capacity of zero is allowed; such a buffer drops everything.
    pub fn new(capacity: usize) -> Self {
        RingBuffer {
            buf: std::iter::repeat_with(|| None).take(capacity).collect(),
            start: 0,
            size: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn add(&mut self, item: T) {
        let capacity = self.capacity();
        if capacity == 0 {
            return;
        }

        if self.size < capacity {
            let idx = (self.start + self.size) % capacity;
            if let Some(slot) = self.buf.get_mut(idx) {
                *slot = Some(item);
                self.size += 1;
            }
        } else {
            if let Some(slot) = self.buf.get_mut(self.start) {
                *slot = Some(item);
            }
            self.start = (self.start + 1) % capacity;
        }
    }

    /// Copies out the held items, oldest first.
    pub fn chronological(&self) -> Vec<T> {
        let capacity = self.capacity();
        (0..self.size)
            .filter_map(|i| {
                self.buf
                    .get((self.start + i) % capacity)
                    .and_then(|slot| slot.clone())
            })
            .collect()
    }
}
