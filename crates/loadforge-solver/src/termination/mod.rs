//! Termination conditions for engine runs.
//!
//! Engines poll their termination between search nodes, so a solve never
//! runs past its budget by more than one node.

mod composite;
mod external;
mod node_count;
mod time;

use std::fmt::Debug;

use crate::scope::SolveScope;

pub use composite::OrTermination;
pub use external::ExternalTermination;
pub use node_count::NodeCountTermination;
pub use time::TimeTermination;

/// Trait for determining when to stop solving.
pub trait Termination: Send + Sync + Debug {
    /// Returns true if solving should terminate.
    fn is_terminated(&self, scope: &SolveScope) -> bool;
}

impl<T: Termination + ?Sized> Termination for Box<T> {
    fn is_terminated(&self, scope: &SolveScope) -> bool {
        (**self).is_terminated(scope)
    }
}

/// Never terminates. Used when a caller supplies no budget at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTermination;

impl Termination for NoTermination {
    fn is_terminated(&self, _scope: &SolveScope) -> bool {
        false
    }
}
