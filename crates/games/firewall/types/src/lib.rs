//! Canonical serializable types for the Firewall Frenzy simulation.
//!
//! Shared between `sim_firewall` (the game core) and any front end that
//! renders HUD state from observations.

use serde::{Deserialize, Serialize};

/// Position on the grid, in fractional grid units measured from cell
/// centers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to `other`. Range checks compare squared
    /// values to avoid the square root.
    pub fn distance_squared(self, other: Position) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    pub fn distance(self, other: Position) -> f32 {
        self.distance_squared(other).sqrt()
    }
}

/// Malware species. Stats live in the simulation catalog, keyed by this
/// enum rather than by name strings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnemyKind {
    Virus,
    Worm,
    Trojan,
    Ransomware,
}

impl EnemyKind {
    /// All kinds in catalog order. Wave spawning cycles through this list.
    pub const ALL: [EnemyKind; 4] = [
        EnemyKind::Virus,
        EnemyKind::Worm,
        EnemyKind::Trojan,
        EnemyKind::Ransomware,
    ];
}

/// Defense tower species.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TowerKind {
    Firewall,
    Antivirus,
    PacketScrubber,
    AiSentry,
}

impl TowerKind {
    pub const ALL: [TowerKind; 4] = [
        TowerKind::Firewall,
        TowerKind::Antivirus,
        TowerKind::PacketScrubber,
        TowerKind::AiSentry,
    ];
}

/// Probabilistic, cooldown-gated enemy behavior.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpecialAbility {
    /// Spawn weaker copies of the enemy.
    Split,
    /// Re-type into the revealed payload kind.
    Transform,
    /// Suppress nearby towers for a while.
    Disable,
}

/// Current wave status.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WaveStatus {
    /// Between waves, waiting for the next wave to start.
    Pause {
        /// Tick when the next wave starts.
        until_tick: u64,
    },
    /// Currently spawning enemies.
    InWave {
        /// Number of enemies spawned so far this wave.
        spawned: u16,
        /// Total enemies in this wave.
        wave_size: u16,
        /// Tick when the next enemy spawns.
        next_spawn_tick: u64,
    },
}

impl Default for WaveStatus {
    fn default() -> Self {
        Self::Pause { until_tick: 0 }
    }
}

/// Information about a placed tower.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TowerInfo {
    pub id: u64,
    pub kind: TowerKind,
    pub level: u32,
    pub x: f32,
    pub y: f32,
    /// Damage per hit at the current level.
    pub damage: i32,
    /// Effective targeting range at the current level.
    pub range: f32,
    /// Cost of the next upgrade.
    pub upgrade_cost: u32,
    /// Whether the tower could fire this tick.
    pub ready: bool,
    /// Whether the tower is currently suppressed by a disable ability.
    pub disabled: bool,
}

/// Information about a live enemy.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EnemyInfo {
    pub id: u64,
    pub kind: EnemyKind,
    pub x: f32,
    pub y: f32,
    pub hp: i32,
    pub max_hp: i32,
}

/// Full game state observation for HUD rendering.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FwObservation {
    pub tick: u64,
    pub ticks_per_second: u32,

    pub current_wave: u32,
    pub waves_total: u32,
    pub wave_status: WaveStatus,

    pub cpu_cycles: u32,
    pub leaks: u16,
    pub max_leaks: u16,
    pub game_started: bool,
    pub game_over: bool,

    /// The fixed path geometry enemies follow, shared with the scene.
    pub path: Vec<Position>,

    pub towers: Vec<TowerInfo>,
    pub enemies: Vec<EnemyInfo>,
}
