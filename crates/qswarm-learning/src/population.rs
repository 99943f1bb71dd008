//! Agent population.
//!
//! The population is a fixed-size arena of agent slots. Each slot holds one [`Agent`]:
//! a stable [`AgentId`], the environment body that embodies it and an episode-local
//! score. Q-tables are stored beside the slots, keyed by agent id.
//!
//! Agents are never added or removed after [`Population::spawn`]. Cloning replaces
//! the contents of a slot with a fresh agent id, a fresh body and a new table, so the
//! population size stays fixed for the lifetime of a run.

use std::collections::{HashMap, HashSet};

use qswarm_arena::{BodyId, Environment};
use serde::{Deserialize, Serialize};

use crate::{
    error::{InvariantViolation, MissingTableError},
    q_table::QTable,
};

/// Identity of an agent, unique for the lifetime of a population.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[display("agent-{_0}")]
pub struct AgentId(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    id: AgentId,
    body: BodyId,
    score: f64,
}

impl Agent {
    #[must_use]
    pub const fn id(&self) -> AgentId {
        self.id
    }

    /// Environment body embodying this agent.
    #[must_use]
    pub const fn body(&self) -> BodyId {
        self.body
    }

    /// Score accumulated since the last success.
    #[must_use]
    pub const fn score(&self) -> f64 {
        self.score
    }

    pub fn add_score(&mut self, delta: f64) {
        self.score += delta;
    }

    pub fn reset_score(&mut self) {
        self.score = 0.0;
    }
}

#[derive(Debug, Clone)]
pub struct Population {
    slots: Vec<Agent>,
    tables: HashMap<AgentId, QTable>,
    next_id: u64,
}

impl Population {
    /// Creates `size` agents with empty tables, each embodied at the environment start.
    pub fn spawn<E>(size: usize, env: &mut E) -> Self
    where
        E: Environment + ?Sized,
    {
        let mut population = Self {
            slots: Vec::with_capacity(size),
            tables: HashMap::with_capacity(size),
            next_id: 0,
        };
        let start = env.start_position();
        for _ in 0..size {
            let body = env.spawn_agent(start);
            let agent = population.new_agent(body);
            population.tables.insert(agent.id, QTable::new());
            population.slots.push(agent);
        }
        population
    }

    fn new_agent(&mut self, body: BodyId) -> Agent {
        let id = AgentId(self.next_id);
        self.next_id += 1;
        Agent {
            id,
            body,
            score: 0.0,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Agents in slot order.
    #[must_use]
    pub fn agents(&self) -> &[Agent] {
        &self.slots
    }

    #[must_use]
    pub fn agent(&self, slot: usize) -> Option<&Agent> {
        self.slots.get(slot)
    }

    pub fn agent_mut(&mut self, slot: usize) -> Option<&mut Agent> {
        self.slots.get_mut(slot)
    }

    /// Slot of the agent embodied by `body`, if any.
    #[must_use]
    pub fn slot_of_body(&self, body: BodyId) -> Option<usize> {
        self.slots.iter().position(|agent| agent.body == body)
    }

    pub fn table(&self, agent: AgentId) -> Result<&QTable, MissingTableError> {
        self.tables.get(&agent).ok_or(MissingTableError { agent })
    }

    pub fn table_mut(&mut self, agent: AgentId) -> Result<&mut QTable, MissingTableError> {
        self.tables.get_mut(&agent).ok_or(MissingTableError { agent })
    }

    /// Agent and table of a slot, borrowed together.
    pub fn slot_mut(
        &mut self,
        slot: usize,
    ) -> Option<Result<(&mut Agent, &mut QTable), MissingTableError>> {
        let agent = self.slots.get_mut(slot)?;
        match self.tables.get_mut(&agent.id) {
            Some(table) => Some(Ok((agent, table))),
            None => Some(Err(MissingTableError { agent: agent.id })),
        }
    }

    /// Puts a new agent with `body` and `table` into `slot`, discarding the old table.
    ///
    /// Returns the agent that was replaced; the caller owns removing its body.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is out of bounds.
    pub fn replace(&mut self, slot: usize, body: BodyId, table: QTable) -> Agent {
        let agent = self.new_agent(body);
        self.tables.insert(agent.id, table);
        let old = std::mem::replace(&mut self.slots[slot], agent);
        self.tables.remove(&old.id);
        old
    }

    /// Total number of Q-table entries across the population.
    #[must_use]
    pub fn table_entries(&self) -> usize {
        self.tables.values().map(QTable::len).sum()
    }

    /// Checks the population size and that ids and bodies are unique.
    pub fn verify(&self, expected: usize) -> Result<(), InvariantViolation> {
        if self.slots.len() != expected {
            return Err(InvariantViolation::PopulationSize {
                expected,
                actual: self.slots.len(),
            });
        }
        let mut ids = HashSet::with_capacity(expected);
        let mut bodies = HashSet::with_capacity(expected);
        for agent in &self.slots {
            if !ids.insert(agent.id) {
                return Err(InvariantViolation::DuplicateAgent { agent: agent.id });
            }
            if !bodies.insert(agent.body) {
                return Err(InvariantViolation::SharedBody { agent: agent.id });
            }
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn detach_table(&mut self, agent: AgentId) -> Option<QTable> {
        self.tables.remove(&agent)
    }

    #[cfg(test)]
    pub(crate) fn slots_mut(&mut self) -> &mut Vec<Agent> {
        &mut self.slots
    }
}

#[cfg(test)]
mod tests {
    use qswarm_arena::Vec2;

    use super::*;
    use crate::test_support::MockEnvironment;

    #[test]
    fn spawn_embodies_every_agent_at_start() {
        let mut env = MockEnvironment::new(Vec2::new(10.0, 20.0));
        let population = Population::spawn(3, &mut env);
        assert_eq!(population.len(), 3);
        for agent in population.agents() {
            let k = env.kinematics(agent.body()).unwrap();
            assert_eq!(k.position, Vec2::new(10.0, 20.0));
            assert!(population.table(agent.id()).unwrap().is_empty());
        }
        assert_eq!(population.verify(3), Ok(()));
    }

    #[test]
    fn replace_assigns_fresh_identity() {
        let mut env = MockEnvironment::new(Vec2::ZERO);
        let mut population = Population::spawn(2, &mut env);
        let old_ids: Vec<_> = population.agents().iter().map(Agent::id).collect();

        let body = env.spawn_agent(Vec2::ZERO);
        let old = population.replace(1, body, QTable::new());
        assert_eq!(old.id(), old_ids[1]);
        assert!(population.table(old.id()).is_err());

        let new = population.agent(1).unwrap();
        assert!(!old_ids.contains(&new.id()));
        assert_eq!(new.body(), body);
        assert_eq!(new.score(), 0.0);
        assert_eq!(population.verify(2), Ok(()));
    }

    #[test]
    fn verify_reports_size_change() {
        let mut env = MockEnvironment::new(Vec2::ZERO);
        let mut population = Population::spawn(2, &mut env);
        population.slots_mut().pop();
        assert_eq!(
            population.verify(2),
            Err(InvariantViolation::PopulationSize {
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn verify_reports_duplicate_ids() {
        let mut env = MockEnvironment::new(Vec2::ZERO);
        let mut population = Population::spawn(2, &mut env);
        let first = population.agents()[0].clone();
        population.slots_mut()[1] = first.clone();
        assert_eq!(
            population.verify(2),
            Err(InvariantViolation::DuplicateAgent { agent: first.id() })
        );
    }

    #[test]
    fn missing_table_is_reported() {
        let mut env = MockEnvironment::new(Vec2::ZERO);
        let mut population = Population::spawn(1, &mut env);
        let id = population.agents()[0].id();
        population.detach_table(id);
        assert_eq!(
            population.table(id).unwrap_err(),
            MissingTableError { agent: id }
        );
        assert!(matches!(population.slot_mut(0), Some(Err(_))));
    }
}
