//! Node count termination.

use super::Termination;
use crate::scope::SolveScope;

/// Terminates after a number of explored search nodes.
///
/// # Example
///
/// ```
/// use loadforge_solver::termination::NodeCountTermination;
///
/// // Terminate after one million nodes
/// let term = NodeCountTermination::new(1_000_000);
/// ```
#[derive(Debug, Clone)]
pub struct NodeCountTermination {
    limit: u64,
}

impl NodeCountTermination {
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }
}

impl Termination for NodeCountTermination {
    fn is_terminated(&self, scope: &SolveScope) -> bool {
        scope.nodes_explored() >= self.limit
    }
}
