//! Worker roster: which worker is assigned to which operation.
//!
//! Releasing a worker on operation `i` removes them from `i` and from every
//! later operation of the run. The release point is computed once per run.

use crate::models::distribution_mode::DistributionMode;
use crate::models::operation::OperationDefinition;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerRoster {
    count: usize,
    /// Per worker (0-based slot): first operation index they are excluded from.
    released_at: Vec<Option<usize>>,
}

impl WorkerRoster {
    pub fn from_operations(ops: &[OperationDefinition], count: usize) -> Self {
        let mut released_at = vec![None; count];

        for (i, op) in ops.iter().enumerate() {
            for &w in &op.released {
                if let Some(slot) = released_at.get_mut(w.wrapping_sub(1))
                    && slot.is_none()
                {
                    *slot = Some(i);
                }
            }
        }

        Self { count, released_at }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Worker (1-based) still part of the run at operation `op_index` (0-based).
    pub fn is_active(&self, worker: usize, op_index: usize) -> bool {
        match self.released_at.get(worker.wrapping_sub(1)) {
            Some(Some(from)) => op_index < *from,
            Some(None) => true,
            None => false,
        }
    }

    /// Workers performing the operation, in worker order.
    pub fn assigned(
        &self,
        op: &OperationDefinition,
        op_index: usize,
        mode: DistributionMode,
    ) -> Vec<usize> {
        (1..=self.count)
            .filter(|w| self.is_active(*w, op_index))
            .filter(|w| match (&op.workers, mode) {
                (Some(subset), DistributionMode::Individual) => subset.contains(w),
                _ => true,
            })
            .collect()
    }
}
