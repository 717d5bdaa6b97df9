//! Sequential merge of worker partials into the global aggregate.

use crate::intern::{DayId, Id, Interner, PathId};
use crate::matrix::CountMatrix;
use crate::partial::PartialResult;
use crate::scanner::ScanStats;

/// The single global count state. Mutated only by [`GlobalAggregate::absorb`];
/// treated as immutable once the merge loop finishes.
///
/// Absorbing partials in worker-index order makes the global first-discovery
/// order of paths equal their first-appearance order in the input file, which
/// is what the output contract keys on. Per-(path, day) counts themselves are
/// order-independent: the remap-and-add below is associative and commutative.
#[derive(Default)]
pub struct GlobalAggregate {
    pub(crate) paths: Interner<PathId>,
    pub(crate) days: Interner<DayId>,
    pub(crate) counts: CountMatrix,
    pub(crate) stats: ScanStats,
}

impl GlobalAggregate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one worker's partial into the global state: map local day and path
    /// ids to global ids (reusing or creating, growing the matrix to match),
    /// then add every non-zero cell.
    pub fn absorb(&mut self, part: PartialResult) {
        let mut day_map: Vec<DayId> = Vec::with_capacity(part.days.len());
        for day in &part.days {
            let (gid, created) = self.days.intern(day);
            if created {
                self.counts.push_day_column();
            }
            day_map.push(gid);
        }

        for (path, row) in part.paths.iter().zip(part.counts.iter()) {
            let (gid, created) = self.paths.intern(path);
            if created {
                self.counts.push_path_row();
            }
            for (local_day, &n) in row.iter().enumerate() {
                if n == 0 {
                    continue;
                }
                self.counts.add(gid, day_map[local_day], n);
            }
        }

        self.stats.merge(part.stats);
    }

    /// Day ids sorted by day string — lexicographic, which is chronological
    /// for `YYYY-MM-DD`.
    pub(crate) fn day_order(&self) -> Vec<DayId> {
        let mut order: Vec<DayId> = (0..self.days.len() as u32).map(DayId::from_raw).collect();
        order.sort_by(|a, b| self.days.key(*a).cmp(self.days.key(*b)));
        order
    }

    pub fn path_count(&self) -> usize {
        self.paths.len()
    }

    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    pub fn stats(&self) -> ScanStats {
        self.stats
    }
}
