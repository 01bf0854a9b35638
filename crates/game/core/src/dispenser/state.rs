use crate::budget::UsageBudget;

/// Identifies one dispenser container within a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContainerId(pub u32);

impl std::fmt::Display for ContainerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "container-{}", self.0)
    }
}

/// Lifecycle of the container. `Locked` and `Despawned` are terminal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ContainerState {
    #[default]
    Active,
    Locked,
    Despawned,
}

impl ContainerState {
    #[inline]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Active)
    }
}

/// Point-in-time view of a dispenser.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DispenserStatus {
    pub container: ContainerId,
    pub state: ContainerState,
    pub budget: UsageBudget,
    pub spawn_in_flight: bool,
    pub pool_size: usize,
    /// Spawn requests handed to the spawner so far.
    pub restocks_issued: u64,
}
