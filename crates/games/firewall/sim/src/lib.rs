pub mod actions;
pub mod catalog;
pub mod errors;
pub mod events;
pub mod game;
pub mod observe;
pub mod path;
pub mod systems;
pub mod world;

pub use actions::FwAction;
pub use catalog::{EnemySpec, FirewallConfig, TowerSpec};
pub use errors::{PlaceError, UpgradeError};
pub use events::FwEvent;
pub use firewall_types::{EnemyKind, Position, SpecialAbility, TowerKind};
pub use game::FirewallGame;
pub use path::{Path, PathProgress};
pub use world::{
    Enemy, EnemyId, EnemyRegistry, EnemyStatus, FirewallState, Ledger, Tower, TowerId,
    TowerRegistry, WavePhase, World,
};
