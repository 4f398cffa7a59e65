//! Solve outcome: status, assignment and objective.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{ItemId, SlotId};

/// Outcome classification of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SolveStatus {
    /// Proven best assignment found within budget.
    Optimal,
    /// Valid assignment found, optimality unproven.
    Feasible,
    /// No assignment satisfies the constraints.
    ///
    /// Unreachable for this formulation: leaving every item unassigned is
    /// always feasible.
    Infeasible,
    /// Budget or cancellation hit before any assignment existed.
    Timeout,
    /// The engine failed internally.
    Error,
}

impl SolveStatus {
    /// Returns true if a solution with this status carries an assignment.
    pub fn has_assignment(&self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Feasible)
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveStatus::Optimal => write!(f, "OPTIMAL"),
            SolveStatus::Feasible => write!(f, "FEASIBLE"),
            SolveStatus::Infeasible => write!(f, "INFEASIBLE"),
            SolveStatus::Timeout => write!(f, "TIMEOUT"),
            SolveStatus::Error => write!(f, "ERROR"),
        }
    }
}

/// Counters recorded by an engine during one solve.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SolveStats {
    /// Name of the engine that produced the solution.
    pub engine: String,
    /// Search nodes visited (1 per placement step for the greedy engine).
    pub nodes_explored: u64,
    /// Search nodes discarded by bounding.
    pub nodes_pruned: u64,
    /// Times the incumbent improved.
    pub improvements: u64,
    /// Wall-clock time in milliseconds.
    pub duration_ms: u64,
}

/// Result of one solve call. Immutable once produced.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use loadforge_core::{Solution, SolveStats, SolveStatus};
///
/// let mut assignment = BTreeMap::new();
/// assignment.insert(0, None);
/// assignment.insert(1, Some(1));
///
/// let solution = Solution::new(SolveStatus::Optimal, assignment, 20.0, SolveStats::default());
/// assert_eq!(solution.slot_of(1), Some(1));
/// assert_eq!(solution.unassigned_items(), vec![0]);
/// assert_eq!(solution.assigned_count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Solution {
    status: SolveStatus,
    assignment: BTreeMap<ItemId, Option<SlotId>>,
    objective_value: f64,
    stats: SolveStats,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl Solution {
    /// Creates a solution carrying an assignment.
    pub fn new(
        status: SolveStatus,
        assignment: BTreeMap<ItemId, Option<SlotId>>,
        objective_value: f64,
        stats: SolveStats,
    ) -> Self {
        Self {
            status,
            assignment,
            objective_value,
            stats,
            message: None,
        }
    }

    /// Creates a solution that carries no assignment (`Timeout` or `Error`).
    pub fn without_assignment(status: SolveStatus, stats: SolveStats, message: impl Into<String>) -> Self {
        Self {
            status,
            assignment: BTreeMap::new(),
            objective_value: 0.0,
            stats,
            message: Some(message.into()),
        }
    }

    /// Returns a copy with a different status and explanatory message.
    pub fn with_status(mut self, status: SolveStatus, message: impl Into<String>) -> Self {
        if !status.has_assignment() {
            self.assignment.clear();
            self.objective_value = 0.0;
        }
        self.status = status;
        self.message = Some(message.into());
        self
    }

    pub fn status(&self) -> SolveStatus {
        self.status
    }

    /// Returns true if the status is `Optimal`.
    pub fn is_optimal(&self) -> bool {
        self.status == SolveStatus::Optimal
    }

    /// Returns true if the solver produced an assignment.
    pub fn has_assignment(&self) -> bool {
        self.status.has_assignment()
    }

    /// Total packed volume reported by the engine.
    pub fn objective_value(&self) -> f64 {
        self.objective_value
    }

    /// Item id → slot id, `None` meaning unassigned.
    pub fn assignment(&self) -> &BTreeMap<ItemId, Option<SlotId>> {
        &self.assignment
    }

    /// Slot the item was loaded into, if any.
    pub fn slot_of(&self, item: ItemId) -> Option<SlotId> {
        self.assignment.get(&item).copied().flatten()
    }

    /// Ids of the items left behind, ascending.
    pub fn unassigned_items(&self) -> Vec<ItemId> {
        self.assignment
            .iter()
            .filter(|(_, slot)| slot.is_none())
            .map(|(&item, _)| item)
            .collect()
    }

    /// Number of items loaded into some slot.
    pub fn assigned_count(&self) -> usize {
        self.assignment.values().filter(|s| s.is_some()).count()
    }

    pub fn stats(&self) -> &SolveStats {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut SolveStats {
        &mut self.stats
    }

    /// Explanation attached to non-optimal outcomes.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}
