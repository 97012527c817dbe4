use crate::world::TowerId;
use firewall_types::{Position, TowerKind};

/// Player inputs forwarded by the UI layer. Submitted between frames and
/// applied at the start of the next tick.
#[derive(Clone, Debug)]
pub enum FwAction {
    StartGame,
    PlaceTower { kind: TowerKind, pos: Position },
    UpgradeTower { tower_id: TowerId },
}
