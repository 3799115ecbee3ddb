// ── Row selection ──
//
// Set of marked rule ids, independent of pagination. Ids that scroll
// out of every fetched page stay in the set — selection is durable
// across page changes and searches, and a stale id is simply inert.

use std::collections::HashSet;

/// Tracks which rows the user has marked, by rule id.
#[derive(Debug, Default, Clone)]
pub struct SelectionModel {
    selected: HashSet<String>,
}

impl SelectionModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the mark on a single id.
    pub fn toggle(&mut self, id: &str) {
        if !self.selected.remove(id) {
            self.selected.insert(id.to_owned());
        }
    }

    /// Mark exactly the ids in `ids`, replacing any prior selection —
    /// the select branch of [`toggle_all`](Self::toggle_all).
    pub fn select_all<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected = ids.into_iter().map(Into::into).collect();
    }

    /// All-or-nothing toggle over the current view.
    ///
    /// If every id in `ids` is already selected, the whole selection
    /// empties. Otherwise the selection becomes exactly `ids` — prior
    /// unrelated marks are dropped, not unioned in.
    pub fn toggle_all(&mut self, ids: &[String]) {
        if !ids.is_empty() && self.all_selected(ids) {
            self.selected.clear();
        } else {
            self.selected = ids.iter().cloned().collect();
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    /// True when every id in `ids` is marked. Empty input is never
    /// "all selected" — a header checkbox over zero rows stays unticked.
    pub fn all_selected(&self, ids: &[String]) -> bool {
        !ids.is_empty() && ids.iter().all(|id| self.selected.contains(id))
    }

    /// True when some but not all of `ids` are marked.
    pub fn is_partially_selected(&self, ids: &[String]) -> bool {
        let marked = ids.iter().filter(|id| self.selected.contains(*id)).count();
        marked > 0 && marked < ids.len()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Snapshot of the selected ids, in no particular order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }
}
