//! In-memory result set for the current query.
//!
//! The store does no locking of its own. The feed controller owns it behind
//! its state mutex and only commits into it from the fetch that holds the
//! current generation.

use std::collections::HashSet;

use tally_core::entities::{Cursor, Edge, Page, PageInfo};

#[derive(Debug, Clone, Default)]
pub struct PagedResultStore {
    edges: Vec<Edge>,
    page_info: PageInfo,
}

impl PagedResultStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard everything and adopt `page` as the whole result set.
    pub fn replace(&mut self, page: Page) {
        self.edges = page.edges;
        self.page_info = page.page_info;
    }

    /// Append the edges of `page` whose cursor is not already present,
    /// keeping server order. Returns how many were added.
    ///
    /// The page info is always taken from `page`, even when nothing new was
    /// added, so a server that repeats itself cannot keep the feed asking for
    /// more forever.
    pub fn append(&mut self, page: Page) -> usize {
        let mut seen: HashSet<Cursor> = self.edges.iter().map(|e| e.cursor.clone()).collect();
        let before = self.edges.len();
        self.edges.extend(
            page.edges
                .into_iter()
                .filter(|edge| seen.insert(edge.cursor.clone())),
        );
        self.page_info = page.page_info;
        self.edges.len() - before
    }

    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    #[must_use]
    pub const fn page_info(&self) -> &PageInfo {
        &self.page_info
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{cursors, page};
    use pretty_assertions::assert_eq;

    #[test]
    fn fresh_store_expects_more() {
        let store = PagedResultStore::new();
        assert!(store.is_empty());
        assert!(store.page_info().has_next_page);
        assert_eq!(store.page_info().end_cursor, None);
    }

    #[test]
    fn replace_discards_previous_rows() {
        let mut store = PagedResultStore::new();
        store.replace(page(1..=3, true));
        store.replace(page(10..=11, false));
        assert_eq!(cursors(store.edges()), ["c10", "c11"]);
        assert!(!store.page_info().has_next_page);
        assert_eq!(store.page_info().end_cursor, Some(Cursor::from("c11")));
    }

    #[test]
    fn append_skips_known_cursors_and_keeps_server_order() {
        let mut store = PagedResultStore::new();
        store.replace(page(1..=3, true));

        let added = store.append(page(2..=5, true));
        assert_eq!(added, 2);
        assert_eq!(cursors(store.edges()), ["c1", "c2", "c3", "c4", "c5"]);
    }

    #[test]
    fn append_dedups_within_one_page() {
        let mut store = PagedResultStore::new();
        let mut overlapping = page(1..=2, true);
        overlapping.edges.extend(page(1..=2, true).edges);
        assert_eq!(store.append(overlapping), 2);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn page_info_advances_even_when_nothing_is_added() {
        let mut store = PagedResultStore::new();
        store.replace(page(1..=3, true));

        let added = store.append(page(1..=3, false));
        assert_eq!(added, 0);
        assert_eq!(store.len(), 3);
        assert!(!store.page_info().has_next_page);
    }

    #[test]
    fn repeated_overlapping_appends_never_duplicate() {
        let mut store = PagedResultStore::new();
        for start in 0..10 {
            store.append(page(start..=start + 4, true));
        }
        let all = cursors(store.edges());
        let unique: HashSet<_> = all.iter().collect();
        assert_eq!(unique.len(), all.len());
        assert_eq!(all.first().map(String::as_str), Some("c0"));
        assert_eq!(all.last().map(String::as_str), Some("c13"));
    }
}
