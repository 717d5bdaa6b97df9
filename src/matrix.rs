//! Dense per-(path, day) count table indexed by interned ids.

use crate::intern::{DayId, Id, PathId};

/// `[path][day] -> u64` counter table. Rows and columns grow in lockstep with
/// the owning scope's interners: a new path appends an all-zero row sized to
/// the current day count, a new day back-fills a zero column into every
/// existing row, so every row always has `day_count` cells.
#[derive(Debug, Default)]
pub struct CountMatrix {
    rows: Vec<Vec<u64>>,
    day_count: usize,
}

impl CountMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path_count(&self) -> usize {
        self.rows.len()
    }

    pub fn day_count(&self) -> usize {
        self.day_count
    }

    /// Append an all-zero row for a freshly interned path.
    pub fn push_path_row(&mut self) {
        self.rows.push(vec![0; self.day_count]);
    }

    /// Append a zero column to every existing row for a freshly interned day.
    pub fn push_day_column(&mut self) {
        self.day_count += 1;
        for row in &mut self.rows {
            row.push(0);
        }
    }

    #[inline]
    pub fn add(&mut self, path: PathId, day: DayId, n: u64) {
        self.rows[path.index()][day.index()] += n;
    }

    #[inline]
    pub fn get(&self, path: PathId, day: DayId) -> u64 {
        self.rows[path.index()][day.index()]
    }

    pub fn row(&self, path: PathId) -> &[u64] {
        &self.rows[path.index()]
    }

    pub fn into_rows(self) -> Vec<Vec<u64>> {
        self.rows
    }
}
