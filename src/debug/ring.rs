//! Fixed-capacity circular buffer.

use serde::{Serialize, Serializer};

/// Keeps the last `capacity` items pushed; older ones are overwritten.
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    items: Vec<T>,
    /// Slot the next push overwrites once the buffer is full
    head: usize,
    capacity: usize,
}

impl<T> RingBuffer<T> {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: Vec::with_capacity(capacity),
            head: 0,
            capacity,
        }
    }

    /// Appends an item, overwriting the oldest one when full.
    pub fn push(&mut self, item: T) {
        if self.items.len() < self.capacity {
            self.items.push(item);
        } else {
            self.items[self.head] = item;
            self.head = (self.head + 1) % self.capacity;
        }
    }

    /// Iterates from newest to oldest.
    pub fn iter_newest(&self) -> impl Iterator<Item = &T> {
        let (wrapped, oldest) = self.items.split_at(self.head);
        oldest.iter().chain(wrapped.iter()).rev()
    }

    /// Most recently pushed item.
    pub fn latest(&self) -> Option<&T> {
        self.iter_newest().next()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.head = 0;
    }
}

impl<T: Clone> RingBuffer<T> {
    /// Newest-first copy of the contents.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter_newest().cloned().collect()
    }
}

impl<T: Serialize> Serialize for RingBuffer<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter_newest())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_push_below_capacity() {
        let mut ring = RingBuffer::new(3);
        ring.push(1);
        ring.push(2);

        assert_eq!(ring.len(), 2);
        assert_eq!(ring.to_vec(), vec![2, 1]);
        assert_eq!(ring.latest(), Some(&2));
    }

    #[test]
    fn test_overwrites_oldest() {
        let mut ring = RingBuffer::new(3);
        for i in 1..=5 {
            ring.push(i);
        }

        assert_eq!(ring.len(), 3);
        assert_eq!(ring.to_vec(), vec![5, 4, 3]);
    }

    #[test]
    fn test_clear() {
        let mut ring = RingBuffer::new(2);
        ring.push("a");
        ring.push("b");
        ring.push("c");
        ring.clear();

        assert!(ring.is_empty());
        ring.push("d");
        assert_eq!(ring.to_vec(), vec!["d"]);
    }

    #[test]
    fn test_zero_capacity_holds_one() {
        let mut ring = RingBuffer::new(0);
        ring.push(1);
        ring.push(2);
        assert_eq!(ring.capacity(), 1);
        assert_eq!(ring.to_vec(), vec![2]);
    }

    #[test]
    fn test_serializes_newest_first() {
        let mut ring = RingBuffer::new(2);
        ring.push(1);
        ring.push(2);
        ring.push(3);
        assert_eq!(serde_json::to_string(&ring).unwrap(), "[3,2]");
    }

    proptest! {
        // Contents always equal the last `capacity` pushes, newest first.
        #[test]
        fn prop_keeps_last_n(capacity in 1usize..50, items in prop::collection::vec(any::<u32>(), 0..200)) {
            let mut ring = RingBuffer::new(capacity);
            for item in &items {
                ring.push(*item);
            }

            let expected: Vec<u32> = items.iter().rev().take(capacity).cloned().collect();
            prop_assert_eq!(ring.to_vec(), expected);
            prop_assert!(ring.len() <= capacity);
        }
    }
}
