use std::collections::BTreeMap;

use qswarm_arena::{BodyId, BodyKind, Environment, Kinematics, Vec2};

use crate::observer::{SuccessReport, TickReport, TrainingObserver, TrainingStatus};

/// Physics-free environment: bodies only move when a test places them.
#[derive(Debug, Default)]
pub(crate) struct MockEnvironment {
    start: Vec2,
    kinds: BTreeMap<BodyId, BodyKind>,
    agents: BTreeMap<BodyId, Kinematics>,
    next_id: u64,
    pub(crate) resets: Vec<BodyId>,
    pub(crate) removed: Vec<BodyId>,
}

impl MockEnvironment {
    pub(crate) fn new(start: Vec2) -> Self {
        Self {
            start,
            ..Self::default()
        }
    }

    fn allocate(&mut self) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        id
    }

    pub(crate) fn add_static(&mut self, kind: BodyKind) -> BodyId {
        let id = self.allocate();
        self.kinds.insert(id, kind);
        id
    }

    pub(crate) fn place(&mut self, body: BodyId, position: Vec2, velocity: Vec2) {
        self.agents.insert(body, Kinematics { position, velocity });
    }

    pub(crate) fn agent_count(&self) -> usize {
        self.agents.len()
    }
}

impl Environment for MockEnvironment {
    fn start_position(&self) -> Vec2 {
        self.start
    }

    fn kinematics(&self, body: BodyId) -> Option<Kinematics> {
        self.agents.get(&body).copied()
    }

    fn body_kind(&self, body: BodyId) -> Option<BodyKind> {
        self.kinds.get(&body).copied()
    }

    fn reset_agent(&mut self, body: BodyId, position: Vec2, velocity: Vec2) {
        self.resets.push(body);
        if let Some(kinematics) = self.agents.get_mut(&body) {
            *kinematics = Kinematics { position, velocity };
        }
    }

    fn set_velocity(&mut self, body: BodyId, velocity: Vec2) {
        if let Some(kinematics) = self.agents.get_mut(&body) {
            kinematics.velocity = velocity;
        }
    }

    fn spawn_agent(&mut self, position: Vec2) -> BodyId {
        let id = self.allocate();
        self.kinds.insert(id, BodyKind::Agent);
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
        self.removed.push(body);
        self.kinds.remove(&body);
        self.agents.remove(&body);
    }
}

#[derive(Debug, Default)]
pub(crate) struct RecordingObserver {
    pub(crate) ticks: Vec<TickReport>,
    pub(crate) successes: Vec<SuccessReport>,
    pub(crate) chart_resets: usize,
    pub(crate) statuses: Vec<TrainingStatus>,
}

impl TrainingObserver for RecordingObserver {
    fn on_tick(&mut self, report: &TickReport) {
        self.ticks.push(*report);
    }

    fn on_success(&mut self, report: &SuccessReport) {
        self.successes.push(*report);
    }

    fn on_chart_reset(&mut self) {
        self.chart_resets += 1;
    }

    fn on_status(&mut self, status: &TrainingStatus) {
        self.statuses.push(*status);
    }
}
