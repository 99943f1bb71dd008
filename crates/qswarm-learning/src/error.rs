use serde::Serialize;

use crate::population::AgentId;

/// An agent has no Q-table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("{agent} has no Q-table")]
pub struct MissingTableError {
    pub agent: AgentId,
}

/// An agent's body does not exist in the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("{agent} has no body in the environment")]
pub struct MissingBodyError {
    pub agent: AgentId,
}

/// Why an agent was left out of an update.
///
/// Skips are recoverable: the agent is passed over for the current event and
/// training continues.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
#[serde(tag = "reason", content = "agent", rename_all = "snake_case")]
pub enum SkipReason {
    #[display("{_0} has no Q-table")]
    MissingTable(AgentId),
    #[display("{_0} has no body in the environment")]
    MissingBody(AgentId),
}

impl SkipReason {
    #[must_use]
    pub const fn agent(&self) -> AgentId {
        match self {
            Self::MissingTable(agent) | Self::MissingBody(agent) => *agent,
        }
    }
}

impl From<MissingTableError> for SkipReason {
    fn from(error: MissingTableError) -> Self {
        Self::MissingTable(error.agent)
    }
}

impl From<MissingBodyError> for SkipReason {
    fn from(error: MissingBodyError) -> Self {
        Self::MissingBody(error.agent)
    }
}

/// A population invariant was broken. Training stops when this is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum InvariantViolation {
    #[display("population has {actual} agents, expected {expected}")]
    PopulationSize { expected: usize, actual: usize },
    #[display("{agent} appears more than once in the population")]
    DuplicateAgent { agent: AgentId },
    #[display("{agent} shares its body with another agent")]
    SharedBody { agent: AgentId },
}
