//! Worklist used by every propagation walk.

use std::collections::{HashSet, VecDeque};
use std::hash::Hash;

/// Decision taken by a traversal step for the item it just processed.
#[derive(Debug, PartialEq, Eq)]
pub enum Step<T> {
    /// Continue into these items.
    Descend(Vec<T>),
    /// Stop this branch of the traversal.
    Prune,
}

/// FIFO worklist.
///
/// In the default mode an item is accepted at most once per walker, no
/// matter how often it is pushed. In revisit mode an item is only rejected
/// while it is still pending, so it can be pushed again after being popped.
#[derive(Debug)]
pub struct Walker<T> {
    queue: VecDeque<T>,
    tracked: HashSet<T>,
    revisit: bool,
}

impl<T> Walker<T>
where
    T: Clone + Eq + Hash,
{
    #[must_use]
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            tracked: HashSet::new(),
            revisit: false,
        }
    }

    #[must_use]
    pub fn with_revisit() -> Self {
        Self {
            revisit: true,
            ..Self::new()
        }
    }

    /// Enqueue an item. Returns `false` if it was rejected as a duplicate.
    pub fn push(&mut self, item: T) -> bool {
        if !self.tracked.insert(item.clone()) {
            return false;
        }
        self.queue.push_back(item);
        true
    }

    pub fn push_all<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        for item in items {
            self.push(item);
        }
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Drain the worklist starting from `roots`, letting `step` decide for
    /// each popped item which items to visit next.
    ///
    /// Returns the number of items processed.
    pub fn walk<I, F>(mut self, roots: I, mut step: F) -> usize
    where
        I: IntoIterator<Item = T>,
        F: FnMut(&T) -> Step<T>,
    {
        self.push_all(roots);

        let mut processed = 0;
        while let Some(item) = self.next() {
            processed += 1;
            if let Step::Descend(next) = step(&item) {
                self.push_all(next);
            }
        }
        processed
    }
}

impl<T> Default for Walker<T>
where
    T: Clone + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Iterator for Walker<T>
where
    T: Clone + Eq + Hash,
{
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let item = self.queue.pop_front()?;
        if self.revisit {
            self.tracked.remove(&item);
        }
        Some(item)
    }
}
