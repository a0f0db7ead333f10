//! Selection controller: which items are selected and how clicks change that.
//!
//! States are implicit in the set size (none, single, multi). Plain clicks
//! replace, Ctrl/Cmd-clicks toggle, Shift-clicks add. A marquee release
//! unions every intersected item into either the previous selection (when a
//! modifier was held at drag start) or an empty one.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use std::collections::HashSet;

use crate::doc::{ItemBox, ItemId};
use crate::geom::Rect;
use crate::input::Modifiers;

/// How a click on an item combines with the existing selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectMode {
    /// Selection becomes exactly the clicked item.
    Replace,
    /// Clicked item flips membership.
    Toggle,
    /// Clicked item is added; never removed.
    Add,
}

impl SelectMode {
    /// Ctrl/Cmd toggles, Shift adds, otherwise replace. Toggle wins when both are held.
    #[must_use]
    pub fn from_modifiers(modifiers: Modifiers) -> Self {
        if modifiers.ctrl || modifiers.meta {
            Self::Toggle
        } else if modifiers.shift {
            Self::Add
        } else {
            Self::Replace
        }
    }
}

/// The set of selected item ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: HashSet<ItemId>,
}

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The only selected id, when exactly one is selected.
    #[must_use]
    pub fn single(&self) -> Option<&ItemId> {
        if self.ids.len() == 1 { self.ids.iter().next() } else { None }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemId> {
        self.ids.iter()
    }

    /// Selected ids sorted, for deterministic output.
    #[must_use]
    pub fn to_sorted_vec(&self) -> Vec<ItemId> {
        let mut ids: Vec<ItemId> = self.ids.iter().cloned().collect();
        ids.sort();
        ids
    }

    /// Apply a click on `id` according to `mode`. Returns true when the set changed.
    pub fn click(&mut self, id: &str, mode: SelectMode) -> bool {
        match mode {
            SelectMode::Replace => {
                if self.ids.len() == 1 && self.ids.contains(id) {
                    return false;
                }
                self.ids.clear();
                self.ids.insert(id.to_owned());
                true
            }
            SelectMode::Toggle => {
                if !self.ids.remove(id) {
                    self.ids.insert(id.to_owned());
                }
                true
            }
            SelectMode::Add => self.ids.insert(id.to_owned()),
        }
    }

    /// Deselect everything. Returns true when something was selected.
    pub fn clear(&mut self) -> bool {
        let changed = !self.ids.is_empty();
        self.ids.clear();
        changed
    }

    /// Replace the selection with every given id.
    pub fn select_all<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = ItemId>,
    {
        self.ids = ids.into_iter().collect();
    }

    /// Union the items intersecting `marquee` into the selection.
    ///
    /// When `keep_existing` is false the selection is cleared first. A marquee
    /// with zero width and zero height (press and release without movement)
    /// adds nothing.
    pub fn apply_marquee(&mut self, marquee: Rect, items: &[ItemBox], keep_existing: bool) {
        if !keep_existing {
            self.ids.clear();
        }
        self.ids.extend(marquee_hits(marquee, items));
    }

    /// Drop ids that are not in `existing`.
    pub fn retain_existing(&mut self, existing: &[ItemId]) {
        self.ids.retain(|id| existing.contains(id));
    }

    /// Remove one id. Returns true when it was selected.
    pub fn remove(&mut self, id: &str) -> bool {
        self.ids.remove(id)
    }
}

/// Ids of items whose bounds intersect `marquee`. Empty for a zero-extent marquee.
#[must_use]
pub fn marquee_hits(marquee: Rect, items: &[ItemBox]) -> Vec<ItemId> {
    if marquee.is_point() {
        return Vec::new();
    }
    items
        .iter()
        .filter(|item| item.rect.intersects(&marquee))
        .map(|item| item.id.clone())
        .collect()
}
