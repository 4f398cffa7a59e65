//! Exact engine: depth-first branch-and-bound.
//!
//! Items are decided one at a time in order of decreasing volume. Each item
//! branches into every candidate slot that still has room, in slot order,
//! and finally into "unassigned". A node is pruned when its optimistic
//! bound cannot beat the incumbent.
//!
//! Two symmetry rules keep equivalent assignments from being enumerated
//! twice:
//! - among empty slots of identical capacity only the first is tried
//! - an item identical to its predecessor goes to the same or a later slot,
//!   and stays unassigned if the predecessor did

use smallvec::SmallVec;
use tracing::{debug, info, trace};

use loadforge_config::GreedyOrder;
use loadforge_core::{Solution, SolveStatus};

use super::bound::{cannot_improve, reaches_bound, volume_order, Bounder};
use super::greedy::GreedyEngine;
use super::state::LoadState;
use super::{solution_from_positions, trivial_solution, SolveContext, SolverEngine};
use crate::model::AssignmentModel;
use crate::scope::SolveScope;

/// Branch-and-bound search proving optimality when it runs to completion.
///
/// # Example
///
/// ```
/// use loadforge_core::domain::{Item, VehicleSlot};
/// use loadforge_core::SolveStatus;
/// use loadforge_solver::engine::{BranchAndBoundEngine, SolveContext, SolverEngine};
/// use loadforge_solver::model::AssignmentModel;
///
/// // first-fit decreasing would load the 6 and stop at 6
/// let items = vec![Item::new(0, 1.0, 6.0), Item::new(1, 1.0, 5.0), Item::new(2, 1.0, 5.0)];
/// let slots = vec![VehicleSlot::new(0, "A", 100.0, 10.0)];
/// let model = AssignmentModel::build(&items, &slots, true).unwrap();
///
/// let solution = BranchAndBoundEngine::new().solve(&model, &SolveContext::unbounded());
/// assert_eq!(solution.status(), SolveStatus::Optimal);
/// assert_eq!(solution.objective_value(), 10.0);
/// ```
#[derive(Debug, Clone)]
pub struct BranchAndBoundEngine {
    warm_start: bool,
    symmetry_breaking: bool,
    greedy_order: GreedyOrder,
}

impl Default for BranchAndBoundEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl BranchAndBoundEngine {
    pub fn new() -> Self {
        Self {
            warm_start: true,
            symmetry_breaking: true,
            greedy_order: GreedyOrder::default(),
        }
    }

    /// Seeds the incumbent with a greedy pass.
    pub fn with_warm_start(mut self, enabled: bool) -> Self {
        self.warm_start = enabled;
        self
    }

    pub fn with_symmetry_breaking(mut self, enabled: bool) -> Self {
        self.symmetry_breaking = enabled;
        self
    }

    /// Item order of the warm start pass.
    pub fn with_greedy_order(mut self, order: GreedyOrder) -> Self {
        self.greedy_order = order;
        self
    }
}

/// Choices left at one depth of the search.
struct Frame {
    options: SmallVec<[Option<usize>; 8]>,
    next: usize,
    placed: bool,
}

impl Frame {
    fn next_option(&mut self) -> Option<Option<usize>> {
        let option = self.options.get(self.next).copied();
        self.next += 1;
        option
    }
}

/// Search state for one solve.
struct Search<'a> {
    model: &'a AssignmentModel,
    context: &'a SolveContext,
    symmetry_breaking: bool,
    /// Item positions in decision order.
    order: Vec<usize>,
    /// Decision depth of each item position.
    depth_of: Vec<usize>,
    /// Smallest slot position with the same capacity, per slot.
    capacity_class: Vec<usize>,
    bounder: Bounder,
    state: LoadState,
    best: Vec<Option<usize>>,
    best_objective: f64,
    root_bound: f64,
}

/// How the search ended.
enum Outcome {
    /// Every branch was explored or pruned, or the incumbent met the root bound.
    Proven,
    /// The termination fired first.
    Terminated,
}

impl<'a> Search<'a> {
    fn new(model: &'a AssignmentModel, context: &'a SolveContext, symmetry_breaking: bool) -> Self {
        let order = volume_order(model);
        let mut depth_of = vec![0; order.len()];
        for (depth, &item) in order.iter().enumerate() {
            depth_of[item] = depth;
        }

        let slots = model.slots();
        let capacity_class = slots
            .iter()
            .enumerate()
            .map(|(j, slot)| {
                slots[..j]
                    .iter()
                    .position(|other| other.same_capacity(slot))
                    .unwrap_or(j)
            })
            .collect();

        let bounder = Bounder::new(model);
        let state = LoadState::new(model);
        let root_bound = bounder.remaining(model, &state, |_| true);

        Self {
            model,
            context,
            symmetry_breaking,
            order,
            depth_of,
            capacity_class,
            bounder,
            state,
            best: vec![None; model.item_count()],
            best_objective: 0.0,
            root_bound,
        }
    }

    fn identical(&self, a: usize, b: usize) -> bool {
        let items = self.model.items();
        items[a].weight == items[b].weight && items[a].volume == items[b].volume
    }

    /// Builds the choices for the item decided at `depth`.
    fn frame(&self, depth: usize) -> Frame {
        let item = self.order[depth];
        let mut options = SmallVec::new();
        let mut min_slot = 0;

        if self.symmetry_breaking && depth > 0 {
            let previous = self.order[depth - 1];
            if self.identical(previous, item) {
                match self.state.position(previous) {
                    None => {
                        options.push(None);
                        return Frame {
                            options,
                            next: 0,
                            placed: false,
                        };
                    }
                    Some(slot) => min_slot = slot,
                }
            }
        }

        let mut opened: SmallVec<[usize; 8]> = SmallVec::new();
        for slot in self.model.candidate_slots(item) {
            if self.symmetry_breaking && self.state.is_empty_slot(slot) {
                let class = self.capacity_class[slot];
                if opened.contains(&class) {
                    continue;
                }
                opened.push(class);
            }
            if slot < min_slot || !self.state.can_place(self.model, item, slot) {
                continue;
            }
            options.push(Some(slot));
        }
        options.push(None);

        Frame {
            options,
            next: 0,
            placed: false,
        }
    }

    /// Bound on the objective reachable once `depth` items are decided.
    fn bound_after(&self, depth: usize) -> f64 {
        let depth_of = &self.depth_of;
        self.state.packed()
            + self
                .bounder
                .remaining(self.model, &self.state, |item| depth_of[item] >= depth)
    }

    /// Takes the current state as incumbent if it is strictly better.
    fn consider(&mut self, scope: &mut SolveScope) {
        let packed = self.state.packed();
        if !scope.record_improvement(packed) {
            return;
        }
        self.best.copy_from_slice(self.state.positions());
        self.best_objective = packed;
        self.context.notify_improvement(packed);
        debug!(
            event = "improvement",
            objective = packed,
            nodes = scope.nodes_explored(),
            elapsed_ms = scope.elapsed().as_millis() as u64,
        );
    }

    fn adopt(&mut self, positions: &[Option<usize>], objective: f64, scope: &mut SolveScope) {
        if scope.record_improvement(objective) {
            self.best.copy_from_slice(positions);
            self.best_objective = objective;
            self.context.notify_improvement(objective);
        }
    }

    fn run(&mut self, scope: &mut SolveScope) -> Outcome {
        if self.order.is_empty() || cannot_improve(self.root_bound, self.best_objective) {
            return Outcome::Proven;
        }

        let mut frames: Vec<Frame> = Vec::with_capacity(self.order.len());
        frames.push(self.frame(0));

        while !frames.is_empty() {
            let depth = frames.len() - 1;
            let frame = &mut frames[depth];
            let item = self.order[depth];
            if frame.placed {
                self.state.remove(self.model, item);
                frame.placed = false;
            }

            let Some(option) = frame.next_option() else {
                frames.pop();
                continue;
            };

            if self.context.is_terminated(scope) {
                return Outcome::Terminated;
            }
            let node = scope.increment_node_count();

            if let Some(slot) = option {
                self.state.place(self.model, item, slot);
                frame.placed = true;
            }
            trace!(event = "node", node, depth, item, slot = ?option, packed = self.state.packed());

            if option.is_some() && self.state.packed() > self.best_objective {
                self.consider(scope);
                if reaches_bound(self.best_objective, self.root_bound) {
                    return Outcome::Proven;
                }
            }

            if depth + 1 == self.order.len() {
                continue;
            }
            if cannot_improve(self.bound_after(depth + 1), self.best_objective) {
                scope.record_prune();
                continue;
            }
            let child = self.frame(depth + 1);
            frames.push(child);
        }

        Outcome::Proven
    }
}

impl SolverEngine for BranchAndBoundEngine {
    fn solve(&self, model: &AssignmentModel, context: &SolveContext) -> Solution {
        info!(
            event = "engine_start",
            engine = self.name(),
            variable_count = model.variable_count(),
            warm_start = self.warm_start,
            symmetry_breaking = self.symmetry_breaking,
        );

        let mut scope = context.scope();
        if model.variable_count() == 0 {
            return trivial_solution(model, scope.to_stats(self.name()));
        }
        if context.is_terminated(&scope) {
            return Solution::without_assignment(
                SolveStatus::Timeout,
                scope.to_stats(self.name()),
                "terminated before the search started",
            );
        }

        let mut search = Search::new(model, context, self.symmetry_breaking);

        if self.warm_start {
            let greedy = GreedyEngine::new(self.greedy_order);
            if let Some(run) = greedy.construct(model, context, &mut scope) {
                search.adopt(run.state.positions(), run.state.packed(), &mut scope);
            }
        }
        // the empty assignment is always feasible
        if scope.best_objective().is_none() {
            scope.record_improvement(0.0);
        }

        debug!(
            event = "search_start",
            root_bound = search.root_bound,
            incumbent = search.best_objective,
        );

        let outcome = search.run(&mut scope);

        debug!(
            event = "search_end",
            proven = matches!(outcome, Outcome::Proven),
            nodes = scope.nodes_explored(),
            pruned = scope.nodes_pruned(),
            objective = search.best_objective,
        );

        let stats = scope.to_stats(self.name());
        match outcome {
            Outcome::Proven => {
                solution_from_positions(model, &search.best, SolveStatus::Optimal, stats)
            }
            Outcome::Terminated => {
                solution_from_positions(model, &search.best, SolveStatus::Feasible, stats)
                    .with_status(SolveStatus::Feasible, "terminated before optimality was proven")
            }
        }
    }

    fn name(&self) -> &'static str {
        "branch_and_bound"
    }
}
