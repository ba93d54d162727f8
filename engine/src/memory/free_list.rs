use std::collections::VecDeque;

/// An ordered sequence of reusable values, used as a FIFO queue.
///
/// Values are appended at the tail and normally taken from the head, so the value that has
/// been waiting the longest is handed out first. Removing from an arbitrary position is
/// supported but costs O(n) away from either end.
#[derive(Debug, Clone, Default)]
pub struct FreeList<T> {
    items: VecDeque<T>,
}

impl<T> FreeList<T> {
    pub fn new() -> Self {
        FreeList {
            items: VecDeque::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        FreeList {
            items: VecDeque::with_capacity(capacity),
        }
    }

    pub fn append(&mut self, value: T) {
        self.items.push_back(value);
    }

    /// Removes and returns the value at `position`, or `None` if the position is out of range.
    pub fn remove_at(&mut self, position: usize) -> Option<T> {
        if position == 0 {
            return self.items.pop_front();
        }

        if self.items.len().checked_sub(1) == Some(position) {
            return self.items.pop_back();
        }

        self.items.remove(position)
    }

    pub fn pop_front(&mut self) -> Option<T> {
        self.remove_at(0)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }
}

impl<T: Clone> FreeList<T> {
    pub fn to_vec(&self) -> Vec<T> {
        self.items.iter().cloned().collect()
    }
}

impl<T> Extend<T> for FreeList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}
