//! Sub-table engine.
//!
//! A sub-table field renders a bounded list of repeatable rows whose columns
//! are configured on the field itself. Row identity is ephemeral: each
//! rendered instance (design canvas, preview) owns its own `SubTableRows`
//! and only the row count is constrained.

use super::schema::SubTableConfig;

/// Row limit applied when a sub-table has no explicit `max_rows`.
pub const DEFAULT_MAX_ROWS: u32 = 10;

/// Highest row limit the property panel accepts.
pub const MAX_ROWS_LIMIT: u32 = 20;

pub type RowId = u64;

/// Result of an append attempt.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAppend {
    Added(RowId),
    LimitReached,
}

/// Ephemeral row list of one rendered sub-table instance.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubTableRows {
    rows: Vec<RowId>,
    next_row: RowId,
}

impl Default for SubTableRows {
    fn default() -> Self {
        SubTableRows::new()
    }
}

impl SubTableRows {
    /// Return a row list holding the initial single row.
    ///
    pub fn new() -> Self {
        SubTableRows {
            rows: vec![1],
            next_row: 2,
        }
    }

    pub fn empty() -> Self {
        SubTableRows {
            rows: vec![],
            next_row: 1,
        }
    }

    pub fn rows(&self) -> &[RowId] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether another row fits under the limit.
    ///
    pub fn can_add(&self, max_rows: u32) -> bool {
        self.rows.len() < max_rows as usize
    }

    /// Append a row unless the limit is reached, in which case nothing changes.
    ///
    pub fn add_row(&mut self, max_rows: u32) -> RowAppend {
        if !self.can_add(max_rows) {
            return RowAppend::LimitReached;
        }
        let id = self.next_row;
        self.next_row += 1;
        self.rows.push(id);
        RowAppend::Added(id)
    }

    /// Remove a row by id. Returns false when the row does not exist.
    ///
    pub fn remove_row(&mut self, row: RowId) -> bool {
        match self.rows.iter().position(|r| *r == row) {
            Some(pos) => {
                self.rows.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Remove the most recently added row, if any.
    ///
    pub fn remove_last(&mut self) -> Option<RowId> {
        self.rows.pop()
    }

    /// Drop trailing rows after the limit was lowered.
    ///
    pub fn clamp_to(&mut self, max_rows: u32) {
        self.rows.truncate(max_rows as usize);
    }
}

impl SubTableConfig {
    /// Return the row limit, falling back to the default.
    ///
    pub fn effective_max_rows(&self) -> u32 {
        match self.max_rows {
            Some(0) | None => DEFAULT_MAX_ROWS,
            Some(limit) => limit,
        }
    }

    pub fn remove_column(&mut self, id: &str) -> bool {
        let before = self.columns.len();
        self.columns.retain(|c| c.id != id);
        self.columns.len() != before
    }

    pub fn rename_column(&mut self, id: &str, label: String) -> bool {
        match self.columns.iter_mut().find(|c| c.id == id) {
            Some(column) => {
                column.label = label;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::schema::{CommonProps, FieldKind};

    #[test]
    fn test_new_rows_start_with_one() {
        let rows = SubTableRows::new();
        assert_eq!(rows.len(), 1);
        assert!(SubTableRows::empty().is_empty());
    }

    #[test]
    fn test_add_row_stops_at_limit() {
        let mut rows = SubTableRows::new();
        assert!(matches!(rows.add_row(3), RowAppend::Added(_)));
        assert!(matches!(rows.add_row(3), RowAppend::Added(_)));
        assert_eq!(rows.len(), 3);
        assert!(!rows.can_add(3));
        assert_eq!(rows.add_row(3), RowAppend::LimitReached);
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn test_rows_never_exceed_limit() {
        for limit in 1..=MAX_ROWS_LIMIT {
            let mut rows = SubTableRows::new();
            for _ in 0..(limit * 2) {
                rows.add_row(limit);
                assert!(rows.len() <= limit as usize);
            }
            assert_eq!(rows.len(), limit as usize);
        }
    }

    #[test]
    fn test_remove_row_never_underflows() {
        let mut rows = SubTableRows::new();
        let first = rows.rows()[0];
        assert!(rows.remove_row(first));
        assert!(rows.is_empty());
        assert!(!rows.remove_row(first));
        assert_eq!(rows.remove_last(), None);
        assert_eq!(rows.len(), 0);
    }

    #[test]
    fn test_row_ids_are_not_reused() {
        let mut rows = SubTableRows::new();
        let added = match rows.add_row(5) {
            RowAppend::Added(id) => id,
            RowAppend::LimitReached => panic!("limit reached"),
        };
        rows.remove_row(added);
        match rows.add_row(5) {
            RowAppend::Added(id) => assert_ne!(id, added),
            RowAppend::LimitReached => panic!("limit reached"),
        }
    }

    #[test]
    fn test_clamp_to_lowered_limit() {
        let mut rows = SubTableRows::new();
        for _ in 0..4 {
            rows.add_row(10);
        }
        rows.clamp_to(2);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows.rows(), &[1u64, 2]);
    }

    #[test]
    fn test_effective_max_rows() {
        let mut config = match FieldKind::SubTable.default_config() {
            crate::form::schema::FieldConfig::SubTable(c) => c,
            other => panic!("unexpected config {:?}", other),
        };
        assert_eq!(config.effective_max_rows(), 10);
        config.max_rows = None;
        assert_eq!(config.effective_max_rows(), DEFAULT_MAX_ROWS);
        config.max_rows = Some(3);
        assert_eq!(config.effective_max_rows(), 3);

        let empty = SubTableConfig {
            common: CommonProps::default(),
            columns: vec![],
            max_rows: Some(0),
        };
        assert_eq!(empty.effective_max_rows(), DEFAULT_MAX_ROWS);
    }
}
