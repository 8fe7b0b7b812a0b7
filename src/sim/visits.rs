//! "Dig once" bookkeeping
//!
//! Per-actor set of height cells that actor has already lowered. Records
//! grow monotonically for as long as the actor exists; the lifecycle layer
//! calls [`VisitRegistry::forget`] when it destroys an actor.

use std::collections::{HashMap, HashSet};

use super::actor::ActorId;
use super::raster::Cell;

#[derive(Debug, Clone, Default)]
pub struct VisitRegistry {
    visits: HashMap<ActorId, HashSet<Cell>>,
}

impl VisitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_visited(&self, actor: &ActorId, cell: Cell) -> bool {
        self.visits
            .get(actor)
            .is_some_and(|cells| cells.contains(&cell))
    }

    /// Record a visit. Returns `true` the first time `actor` reaches `cell`.
    pub fn record(&mut self, actor: &ActorId, cell: Cell) -> bool {
        // Avoid cloning the id on the hot path once the actor has an entry
        if let Some(cells) = self.visits.get_mut(actor) {
            return cells.insert(cell);
        }
        self.visits
            .entry(actor.clone())
            .or_default()
            .insert(cell)
    }

    /// Number of cells `actor` has dug
    pub fn visited_count(&self, actor: &ActorId) -> usize {
        self.visits.get(actor).map_or(0, HashSet::len)
    }

    /// Number of actors with at least one recorded visit
    pub fn actor_count(&self) -> usize {
        self.visits.len()
    }

    /// Drop everything recorded for `actor`, returning how many cells it held
    pub fn forget(&mut self, actor: &ActorId) -> usize {
        let dropped = self.visits.remove(actor).map_or(0, |cells| cells.len());
        if dropped > 0 {
            log::debug!("Forgot {} dug cells for {}", dropped, actor);
        }
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_first_visit_only() {
        let mut reg = VisitRegistry::new();
        let p1 = ActorId::from("p1");
        assert!(!reg.has_visited(&p1, Cell::new(1, 1)));
        assert!(reg.record(&p1, Cell::new(1, 1)));
        assert!(!reg.record(&p1, Cell::new(1, 1)));
        assert!(reg.has_visited(&p1, Cell::new(1, 1)));
        assert!(!reg.has_visited(&p1, Cell::new(1, 2)));
        assert_eq!(reg.visited_count(&p1), 1);
    }

    #[test]
    fn test_actors_are_independent() {
        let mut reg = VisitRegistry::new();
        let p1 = ActorId::from("p1");
        let p2 = ActorId::from("p2");
        reg.record(&p1, Cell::new(0, 0));
        assert!(!reg.has_visited(&p2, Cell::new(0, 0)));
        assert!(reg.record(&p2, Cell::new(0, 0)));
        assert_eq!(reg.actor_count(), 2);
    }

    #[test]
    fn test_forget_drops_actor() {
        let mut reg = VisitRegistry::new();
        let p1 = ActorId::from("p1");
        reg.record(&p1, Cell::new(0, 0));
        reg.record(&p1, Cell::new(0, 1));
        assert_eq!(reg.forget(&p1), 2);
        assert_eq!(reg.forget(&p1), 0);
        assert!(!reg.has_visited(&p1, Cell::new(0, 0)));
        assert_eq!(reg.actor_count(), 0);
    }
}
