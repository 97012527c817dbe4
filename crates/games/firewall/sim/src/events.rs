use crate::errors::UpgradeError;
use crate::world::{EnemyId, TowerId};
use firewall_types::{EnemyKind, SpecialAbility, TowerKind};
use sim_core::{TerminalOutcome, Tick};

/// Everything observable that happened during a tick, in order.
#[derive(Clone, Debug)]
pub enum FwEvent {
    GameStarted,
    WaveStarted {
        wave: u32,
    },
    WaveEnded {
        wave: u32,
        award: u32,
    },
    EnemySpawned {
        id: EnemyId,
        kind: EnemyKind,
    },
    EnemyKilled {
        id: EnemyId,
        kind: EnemyKind,
        reward: u32,
    },
    EnemyLeaked {
        id: EnemyId,
    },
    AbilityTriggered {
        id: EnemyId,
        ability: SpecialAbility,
    },
    TowerPlaced {
        id: TowerId,
        kind: TowerKind,
    },
    PlacementRejected {
        kind: TowerKind,
        cost: u32,
        have: u32,
    },
    TowerUpgraded {
        id: TowerId,
        level: u32,
    },
    UpgradeRejected {
        id: TowerId,
        reason: UpgradeError,
    },
    TowerFired {
        tower: TowerId,
        target: EnemyId,
        damage: i32,
    },
    TowerDisabled {
        id: TowerId,
        until_tick: Tick,
    },
    GameOver {
        outcome: TerminalOutcome,
    },
}
