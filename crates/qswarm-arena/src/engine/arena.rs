use std::collections::{BTreeMap, BTreeSet};

use crate::{
    LayoutError,
    core::{BodyId, BodyKind, Kinematics, StaticBody, Vec2},
};

use super::{
    environment::{CollisionPair, Environment},
    layout::{ArenaLayout, BodySpec},
};

/// Headless 2-D arena with circular agents and static walls, obstacles and a target.
///
/// Each [`step`](Arena::step) integrates agent motion, pushes agents out of the static
/// bodies they penetrate and reports the contacts that *began* during the step. A pair
/// that stays in contact over several steps is reported once. Agents pass through each
/// other.
///
/// # Example
///
/// ```
/// use qswarm_arena::{Arena, ArenaLayout, Environment, Vec2};
///
/// let mut arena = Arena::new(ArenaLayout::default()).unwrap();
/// let agent = arena.spawn_agent(Vec2::new(400.0, 550.0));
/// arena.set_velocity(agent, Vec2::new(0.0, 5.0));
///
/// // the agent reaches the bottom wall after a few steps
/// let hit = (0..10).flat_map(|_| arena.step()).any(|pair| pair.a == agent);
/// assert!(hit);
/// ```
#[derive(Debug, Clone)]
pub struct Arena {
    layout: ArenaLayout,
    statics: Vec<StaticBody>,
    agents: BTreeMap<BodyId, Kinematics>,
    contacts: BTreeSet<(BodyId, BodyId)>,
    next_id: u64,
    steps: u64,
}

impl Arena {
    pub fn new(layout: ArenaLayout) -> Result<Self, LayoutError> {
        layout.validate()?;
        let mut arena = Self {
            layout,
            statics: vec![],
            agents: BTreeMap::new(),
            contacts: BTreeSet::new(),
            next_id: 0,
            steps: 0,
        };
        for spec in arena.layout.walls() {
            arena.add_static(BodyKind::Wall, spec);
        }
        for spec in arena.layout.obstacles.clone() {
            arena.add_static(BodyKind::Obstacle, spec);
        }
        arena.add_static(BodyKind::Target, arena.layout.target);
        Ok(arena)
    }

    fn allocate_id(&mut self) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        id
    }

    fn add_static(&mut self, kind: BodyKind, spec: BodySpec) -> BodyId {
        let id = self.allocate_id();
        self.statics.push(StaticBody {
            id,
            kind,
            position: spec.position,
            shape: spec.shape,
        });
        id
    }

    #[must_use]
    pub fn statics(&self) -> &[StaticBody] {
        &self.statics
    }

    /// Id of the target body.
    ///
    /// # Panics
    ///
    /// Never panics for arenas built with [`Arena::new`], which always adds a target.
    #[must_use]
    pub fn target(&self) -> BodyId {
        self.statics
            .iter()
            .find(|body| body.kind.is_target())
            .map(|body| body.id)
            .expect("arena always has a target")
    }

    /// Ids of all live agent bodies, in creation order.
    pub fn agents(&self) -> impl Iterator<Item = BodyId> + '_ {
        self.agents.keys().copied()
    }

    /// Number of steps simulated so far.
    #[must_use]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Advances the simulation by one step and returns the contacts that began in it.
    pub fn step(&mut self) -> Vec<CollisionPair> {
        self.steps += 1;
        let radius = self.layout.agent_radius;
        let slop = self.layout.contact_slop;
        let time_scale = self.layout.time_scale;

        let mut current = BTreeSet::new();
        for (&agent, kinematics) in &mut self.agents {
            kinematics.position = kinematics.position + kinematics.velocity * time_scale;
            for body in &self.statics {
                let contact =
                    body.shape
                        .circle_contact(body.position, kinematics.position, radius, slop);
                let Some(contact) = contact else {
                    continue;
                };
                if contact.depth > 0.0 {
                    kinematics.position = kinematics.position + contact.normal * contact.depth;
                    let approach = kinematics.velocity.dot(contact.normal);
                    if approach < 0.0 {
                        kinematics.velocity = kinematics.velocity - contact.normal * approach;
                    }
                }
                current.insert((agent, body.id));
            }
        }

        let started = current
            .difference(&self.contacts)
            .map(|&(agent, other)| CollisionPair::new(agent, other))
            .collect();
        self.contacts = current;
        started
    }

    fn forget_contacts(&mut self, agent: BodyId) {
        self.contacts.retain(|&(a, _)| a != agent);
    }
}

impl Environment for Arena {
    fn start_position(&self) -> Vec2 {
        self.layout.start
    }

    fn kinematics(&self, body: BodyId) -> Option<Kinematics> {
        self.agents.get(&body).copied()
    }

    fn body_kind(&self, body: BodyId) -> Option<BodyKind> {
        if self.agents.contains_key(&body) {
            return Some(BodyKind::Agent);
        }
        self.statics
            .iter()
            .find(|b| b.id == body)
            .map(|b| b.kind)
    }

    fn reset_agent(&mut self, body: BodyId, position: Vec2, velocity: Vec2) {
        if let Some(kinematics) = self.agents.get_mut(&body) {
            *kinematics = Kinematics { position, velocity };
            self.forget_contacts(body);
        }
    }

    fn set_velocity(&mut self, body: BodyId, velocity: Vec2) {
        if let Some(kinematics) = self.agents.get_mut(&body) {
            kinematics.velocity = velocity;
        }
    }

    fn spawn_agent(&mut self, position: Vec2) -> BodyId {
        let id = self.allocate_id();
        self.agents.insert(
            id,
            Kinematics {
                position,
                velocity: Vec2::ZERO,
            },
        );
        id
    }

    fn remove_agent(&mut self, body: BodyId) {
        if self.agents.remove(&body).is_some() {
            self.forget_contacts(body);
        }
    }
}
