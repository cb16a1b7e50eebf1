use fxhash::FxHashMap;
use std::hash::Hash;

use crate::error::HeapError;

/// Whether the smallest or the largest priority sits at the top of a [PriorityQueue].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeapOrder {
    Min,
    Max,
}

/// Binary heap over `(key, priority)` pairs that tracks the slot of every key, so membership
/// tests are O(1) and a queued key can have its priority changed in place in O(log n).
///
/// Uses 0-indexed storage with parent = (i-1)/2, children = 2i+1, 2i+2. Keys are unique: pushing
/// a key that is already queued updates its priority instead of adding a second entry.
#[derive(Clone, Debug)]
pub struct PriorityQueue<K, P> {
    order: HeapOrder,
    items: Vec<(K, P)>,
    positions: FxHashMap<K, usize>,
}

impl<K, P> PriorityQueue<K, P>
where
    K: Copy + Eq + Hash,
    P: Ord,
{
    pub fn new(order: HeapOrder) -> Self {
        Self::with_capacity(order, 0)
    }
    pub fn new_min() -> Self {
        Self::new(HeapOrder::Min)
    }
    pub fn new_max() -> Self {
        Self::new(HeapOrder::Max)
    }
    pub fn with_capacity(order: HeapOrder, capacity: usize) -> Self {
        PriorityQueue {
            order,
            items: Vec::with_capacity(capacity),
            positions: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }
    pub fn order(&self) -> HeapOrder {
        self.order
    }
    pub fn len(&self) -> usize {
        self.items.len()
    }
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
    pub fn clear(&mut self) {
        self.items.clear();
        self.positions.clear();
    }
    pub fn contains(&self, key: &K) -> bool {
        self.positions.contains_key(key)
    }
    pub fn priority(&self, key: &K) -> Option<&P> {
        self.positions.get(key).map(|&pos| &self.items[pos].1)
    }
    /// The item that [pop](Self::pop) would return next.
    pub fn peek(&self) -> Option<(&K, &P)> {
        self.items.first().map(|(k, p)| (k, p))
    }
    /// Iterates over the queued items in storage order, which is not priority order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &P)> + '_ {
        self.items.iter().map(|(k, p)| (k, p))
    }

    /// Inserts `key` with the given priority. If `key` is already queued its priority is replaced
    /// and the previous one returned.
    pub fn push(&mut self, key: K, priority: P) -> Option<P> {
        if let Some(&pos) = self.positions.get(&key) {
            let old = std::mem::replace(&mut self.items[pos].1, priority);
            self.restore(pos);
            return Some(old);
        }
        let pos = self.items.len();
        self.items.push((key, priority));
        self.positions.insert(key, pos);
        self.sift_up(pos);
        None
    }

    /// Removes and returns the top item.
    pub fn pop(&mut self) -> Result<(K, P), HeapError> {
        let last = match self.items.len() {
            0 => return Err(HeapError::Empty),
            n => n - 1,
        };
        self.swap(0, last);
        let (key, priority) = self.items.pop().ok_or(HeapError::Empty)?;
        self.positions.remove(&key);
        if !self.items.is_empty() {
            self.sift_down(0);
        }
        Ok((key, priority))
    }

    /// Removes a key from anywhere in the queue, returning its priority.
    pub fn remove(&mut self, key: &K) -> Option<P> {
        let pos = *self.positions.get(key)?;
        let last = self.items.len() - 1;
        self.swap(pos, last);
        let (key, priority) = self.items.pop()?;
        self.positions.remove(&key);
        if pos < self.items.len() {
            self.restore(pos);
        }
        Some(priority)
    }

    /// Replaces the priority of a queued key and restores heap order around its slot.
    /// Works for both decreases and increases. Returns the previous priority.
    pub fn change_priority(&mut self, key: &K, priority: P) -> Result<P, HeapError> {
        let pos = *self.positions.get(key).ok_or(HeapError::Missing)?;
        let old = std::mem::replace(&mut self.items[pos].1, priority);
        self.restore(pos);
        Ok(old)
    }

    /// Checks heap order and the slot index of every key. O(n), meant for tests and debugging.
    pub fn is_valid(&self) -> bool {
        let ordered = (1..self.items.len()).all(|i| !self.before(i, (i - 1) / 2));
        let indexed = self.positions.len() == self.items.len()
            && self
                .items
                .iter()
                .enumerate()
                .all(|(i, (k, _))| self.positions.get(k) == Some(&i));
        ordered && indexed
    }

    fn before(&self, a: usize, b: usize) -> bool {
        match self.order {
            HeapOrder::Min => self.items[a].1 < self.items[b].1,
            HeapOrder::Max => self.items[a].1 > self.items[b].1,
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.items.swap(a, b);
        self.positions.insert(self.items[a].0, a);
        self.positions.insert(self.items[b].0, b);
    }

    fn restore(&mut self, pos: usize) {
        let pos = self.sift_up(pos);
        self.sift_down(pos);
    }

    fn sift_up(&mut self, mut index: usize) -> usize {
        while index > 0 {
            let parent = (index - 1) / 2;
            if !self.before(index, parent) {
                break;
            }
            self.swap(index, parent);
            index = parent;
        }
        index
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.items.len();
        loop {
            let left = 2 * index + 1;
            let right = left + 1;
            let mut top = index;
            if left < len && self.before(left, top) {
                top = left;
            }
            if right < len && self.before(right, top) {
                top = right;
            }
            if top == index {
                break;
            }
            self.swap(index, top);
            index = top;
        }
    }
}

impl<K, P> Default for PriorityQueue<K, P>
where
    K: Copy + Eq + Hash,
    P: Ord,
{
    fn default() -> Self {
        Self::new_min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain<K: Copy + Eq + Hash, P: Ord + Copy>(heap: &mut PriorityQueue<K, P>) -> Vec<P> {
        let mut out = Vec::new();
        while let Ok((_, p)) = heap.pop() {
            out.push(p);
        }
        out
    }

    #[test]
    fn extracts_in_ascending_order() {
        let mut heap = PriorityQueue::new_min();
        for (key, priority) in [5, 3, 8, 1, 4].into_iter().enumerate() {
            heap.push(key, priority);
        }
        assert!(heap.is_valid());
        assert_eq!(drain(&mut heap), vec![1, 3, 4, 5, 8]);
    }

    #[test]
    fn max_order_extracts_descending() {
        let mut heap = PriorityQueue::new_max();
        for (key, priority) in [5, 3, 8, 1, 4].into_iter().enumerate() {
            heap.push(key, priority);
        }
        assert_eq!(heap.peek(), Some((&2, &8)));
        assert_eq!(drain(&mut heap), vec![8, 5, 4, 3, 1]);
    }

    #[test]
    fn empty_pop_is_an_error() {
        let mut heap: PriorityQueue<u32, i32> = PriorityQueue::default();
        assert_eq!(heap.pop(), Err(HeapError::Empty));
        heap.push(7, 1);
        assert_eq!(heap.pop(), Ok((7, 1)));
        assert_eq!(heap.pop(), Err(HeapError::Empty));
    }

    #[test]
    fn change_priority_moves_item() {
        let mut heap = PriorityQueue::new_min();
        heap.push('a', 10);
        heap.push('b', 20);
        heap.push('c', 30);
        assert_eq!(heap.change_priority(&'c', 5), Ok(30));
        assert!(heap.is_valid());
        assert_eq!(heap.peek(), Some((&'c', &5)));
        assert_eq!(heap.change_priority(&'c', 50), Ok(5));
        assert_eq!(heap.peek(), Some((&'a', &10)));
        assert_eq!(heap.change_priority(&'z', 1), Err(HeapError::Missing));
        assert_eq!(drain(&mut heap), vec![10, 20, 50]);
    }

    #[test]
    fn push_existing_key_replaces_priority() {
        let mut heap = PriorityQueue::new_min();
        heap.push(1, 9);
        heap.push(2, 4);
        assert_eq!(heap.push(1, 2), Some(9));
        assert_eq!(heap.len(), 2);
        assert_eq!(heap.priority(&1), Some(&2));
        assert_eq!(heap.pop(), Ok((1, 2)));
        assert!(!heap.contains(&1));
        assert!(heap.contains(&2));
    }

    #[test]
    fn remove_from_middle() {
        let mut heap = PriorityQueue::new_min();
        for i in 0..10 {
            heap.push(i, 10 - i);
        }
        assert_eq!(heap.remove(&4), Some(6));
        assert_eq!(heap.remove(&4), None);
        assert!(heap.is_valid());
        assert_eq!(drain(&mut heap), vec![1, 2, 3, 4, 5, 7, 8, 9, 10]);
    }

    #[test]
    fn ties_on_first_field_use_second() {
        let mut heap = PriorityQueue::new_min();
        heap.push(0, (56, 30));
        heap.push(1, (56, 10));
        heap.push(2, (60, 0));
        assert_eq!(heap.pop().map(|x| x.0), Ok(1));
        assert_eq!(heap.pop().map(|x| x.0), Ok(0));
        assert_eq!(heap.pop().map(|x| x.0), Ok(2));
    }

    #[test]
    fn large_heap_with_updates_stays_ordered() {
        let mut heap = PriorityQueue::with_capacity(HeapOrder::Min, 1000);
        for i in 0u32..1000 {
            heap.push(i, (i * 997) % 1000);
        }
        for i in (0u32..1000).step_by(7) {
            heap.change_priority(&i, (i * 31) % 1000).unwrap();
        }
        assert!(heap.is_valid());
        let out = drain(&mut heap);
        assert_eq!(out.len(), 1000);
        assert!(out.windows(2).all(|w| w[0] <= w[1]));
    }
}
