use std::sync::Arc;

/// Number of snapshots kept when no capacity is configured.
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// A bounded, linear undo/redo log of immutable snapshots.
///
/// The log holds at most `capacity` entries. Committing a new snapshot discards any redo
/// entries past the cursor, appends the snapshot, and then drops the *oldest* entries if
/// the log is over capacity. Snapshots are shared through `Arc`, so moving the cursor never
/// copies or mutates a published value.
#[derive(Debug, Clone)]
pub struct History<T> {
    entries: Vec<Arc<T>>,
    cursor: Option<usize>,
    capacity: usize,
}

impl<T> History<T> {
    /// Creates an empty log. A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            cursor: None,
            capacity: capacity.max(1),
        }
    }

    /// Discards all entries and starts over with `snapshot` as the only one.
    pub fn reset(&mut self, snapshot: Arc<T>) {
        self.entries.clear();
        self.entries.push(snapshot);
        self.cursor = Some(0);
    }

    /// Records `snapshot` as the newest state and moves the cursor onto it.
    pub fn commit(&mut self, snapshot: Arc<T>) {
        let keep = self.cursor.map_or(0, |c| c + 1);
        self.entries.truncate(keep);
        self.entries.push(snapshot);

        if self.entries.len() > self.capacity {
            let overflow = self.entries.len() - self.capacity;
            self.entries.drain(..overflow);
        }
        self.cursor = Some(self.entries.len() - 1);
    }

    /// Steps back one entry and returns the snapshot there, or `None` at the oldest entry.
    pub fn undo(&mut self) -> Option<Arc<T>> {
        match self.cursor {
            Some(c) if c > 0 => {
                self.cursor = Some(c - 1);
                self.current()
            }
            _ => None,
        }
    }

    /// Steps forward one entry and returns the snapshot there, or `None` at the newest entry.
    pub fn redo(&mut self) -> Option<Arc<T>> {
        match self.cursor {
            Some(c) if c + 1 < self.entries.len() => {
                self.cursor = Some(c + 1);
                self.current()
            }
            _ => None,
        }
    }

    pub fn current(&self) -> Option<Arc<T>> {
        self.cursor.and_then(|c| self.entries.get(c)).cloned()
    }

    pub fn current_ref(&self) -> Option<&T> {
        self.cursor
            .and_then(|c| self.entries.get(c))
            .map(|snapshot| snapshot.as_ref())
    }

    pub fn can_undo(&self) -> bool {
        self.cursor.is_some_and(|c| c > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.cursor.is_some_and(|c| c + 1 < self.entries.len())
    }

    /// The cursor position, or `None` while the log is empty.
    pub fn current_index(&self) -> Option<usize> {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn snapshots(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|s| s.as_ref())
    }
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
