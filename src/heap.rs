//! Bounded min-heap over a caller-owned buffer.
//!
//! Used to keep the top-K elements of a stream (best scored documents at
//! query time, most frequent terms at indexing time) without storing the
//! whole stream. The heap never allocates: it works in place over a slice
//! supplied by the caller, whose length is the heap capacity.

use std::cmp::Ordering;

/// Three-way comparison used to order the heap
///
/// `Less` means that `a` ranks before `b`, i.e. is closer to the root.
pub trait Compare<T> {
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

impl<T, F> Compare<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}

/// Orders elements with their [`Ord`] implementation
#[derive(Clone, Copy, Debug, Default)]
pub struct NaturalOrder;

impl<T: Ord> Compare<T> for NaturalOrder {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

/// A min-heap over the whole of `array`
///
/// The heap does not check whether a key belongs in it: callers push a key
/// only once they know it outranks the root.
pub struct BoundedMinHeap<'a, T, C> {
    array: &'a mut [T],
    compare: C,
}

impl<'a, T, C> BoundedMinHeap<'a, T, C>
where
    T: Clone,
    C: Compare<T>,
{
    pub fn new(array: &'a mut [T], compare: C) -> Self {
        Self { array, compare }
    }

    /// Capacity of the heap
    #[inline]
    pub fn size(&self) -> usize {
        self.array.len()
    }

    /// The smallest element (panics on an empty buffer)
    #[inline]
    pub fn peek(&self) -> &T {
        &self.array[0]
    }

    #[inline]
    fn left_of(position: usize) -> usize {
        (position << 1) + 1
    }

    #[inline]
    fn right_of(position: usize) -> usize {
        (position << 1) + 2
    }

    #[inline]
    fn less(&self, a: &T, b: &T) -> bool {
        self.compare.compare(a, b) == Ordering::Less
    }

    /// Restores the heap property below `position`, assuming both subtrees are heaps
    fn heapify(&mut self, mut position: usize) {
        let size = self.size();
        loop {
            let left = Self::left_of(position);
            let right = Self::right_of(position);

            let mut smallest = position;
            if left < size && self.less(&self.array[left], &self.array[smallest]) {
                smallest = left;
            }
            if right < size && self.less(&self.array[right], &self.array[smallest]) {
                smallest = right;
            }

            if smallest == position {
                break;
            }
            self.array.swap(position, smallest);
            position = smallest;
        }
    }

    /// Sifts `key` down from `position`, moving the smaller child up until
    /// `key` ranks before both children
    fn insert_from(&mut self, key: T, mut position: usize) {
        let size = self.size();
        while position < size {
            let left = Self::left_of(position);
            let right = Self::right_of(position);

            let child = if right < size {
                if self.compare.compare(&key, &self.array[left]) != Ordering::Greater
                    && self.compare.compare(&key, &self.array[right]) != Ordering::Greater
                {
                    break;
                }
                if self.less(&self.array[left], &self.array[right]) {
                    left
                } else {
                    right
                }
            } else if left < size {
                if self.compare.compare(&key, &self.array[left]) != Ordering::Greater {
                    break;
                }
                left
            } else {
                break;
            };

            self.array[position] = self.array[child].clone();
            position = child;
        }

        if position < size {
            self.array[position] = key;
        }
    }

    /// Builds the heap over the current content of the buffer, in O(size)
    pub fn make_heap(&mut self) {
        for position in (0..self.size() / 2).rev() {
            self.heapify(position);
        }
    }

    /// Replaces the root by `key` and sifts it down.
    ///
    /// The caller is responsible for checking that `key` outranks the root.
    #[inline]
    pub fn push_back(&mut self, key: T) {
        self.insert_from(key, 0);
    }

    /// `key` is an element whose value changed: sifts it down from its position.
    ///
    /// The element is located by a linear scan, so this costs O(size) and is
    /// only meant for small top-K heaps. If `key` is not in the buffer, it
    /// replaces the last slot and `false` is returned.
    pub fn promote(&mut self, key: T) -> bool
    where
        T: PartialEq,
    {
        let found = self.array.iter().position(|x| *x == key);
        let position = match found {
            Some(position) => position,
            None => self.size().saturating_sub(1),
        };
        self.insert_from(key, position);
        found.is_some()
    }

    /// Checks the heap property (every element ranks after its parent)
    pub fn is_heap(&self) -> bool {
        (1..self.size()).all(|ix| !self.less(&self.array[ix], &self.array[(ix - 1) / 2]))
    }
}
