use ahash::AHashMap;

/// A partial correspondence from old step numbers to new ones.
///
/// Only numbers that actually change are stored; identity pairs are discarded on insert.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Renumbering {
    changes: AHashMap<u32, u32>,
}

impl Renumbering {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, old: u32, new: u32) {
        if old != new {
            self.changes.insert(old, new);
        }
    }

    pub fn get(&self, old: u32) -> Option<u32> {
        self.changes.get(&old).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Derives the renumbering implied by moving from the `before` id order to the `after`
    /// id order. Each step keeps its identity; its number follows its new position.
    /// Ids missing from `after` are skipped.
    pub fn between_orders<A: AsRef<str>, B: AsRef<str>>(before: &[A], after: &[B]) -> Self {
        let new_positions: AHashMap<&str, usize> = after
            .iter()
            .enumerate()
            .map(|(i, id)| (id.as_ref(), i))
            .collect();

        before
            .iter()
            .enumerate()
            .filter_map(|(old_index, id)| {
                new_positions
                    .get(id.as_ref())
                    .map(|&new_index| (old_index as u32 + 1, new_index as u32 + 1))
            })
            .collect()
    }

    /// The renumbering caused by removing the step at 1-based `removed` from a workflow of
    /// `len` steps: every later step moves one position up.
    pub fn after_removal(removed: u32, len: u32) -> Self {
        ((removed + 1)..=len).map(|n| (n, n - 1)).collect()
    }
}

impl FromIterator<(u32, u32)> for Renumbering {
    fn from_iter<I: IntoIterator<Item = (u32, u32)>>(iter: I) -> Self {
        let mut renumbering = Renumbering::new();
        for (old, new) in iter {
            renumbering.insert(old, new);
        }
        renumbering
    }
}
