use firewall_types::{EnemyKind, Position, SpecialAbility, TowerKind};
use sim_core::{Micros, Speed};

/// Static per-kind enemy stats. Immutable once the config is built.
#[derive(Clone, Debug)]
pub struct EnemySpec {
    pub name: &'static str,
    pub max_hp: i32,
    pub speed: Speed,
    pub damage: i32,
    pub special_ability: Option<SpecialAbility>,
    /// Probability of an ability roll succeeding, per tick, in [0, 1].
    pub special_chance: f64,
    /// Minimum wall time between two triggers on the same enemy.
    pub special_cooldown: Micros,
    /// CPU cycles awarded when this enemy is destroyed.
    pub reward: u32,
}

/// Static per-kind tower stats plus per-level upgrade deltas.
#[derive(Clone, Debug)]
pub struct TowerSpec {
    pub name: &'static str,
    /// Placement cost in CPU cycles.
    pub cost: u32,
    pub base_damage: i32,
    /// Targeting radius in grid units.
    pub range: f32,
    /// Wall time between attacks at level 1.
    pub attack_period_ms: u32,
    /// Base upgrade price; an upgrade from level L costs `upgrade_cost * L`.
    pub upgrade_cost: u32,
    pub damage_per_level: i32,
    pub range_per_level: f32,
    /// Per-level change to the attack period. Negative means faster.
    pub attack_period_delta_ms: i32,
}

impl TowerSpec {
    /// Damage per hit at `level`.
    pub fn damage_at(&self, level: u32) -> i32 {
        self.base_damage + self.damage_per_level * (level as i32 - 1)
    }

    /// Effective targeting radius at `level`.
    pub fn range_at(&self, level: u32) -> f32 {
        self.range + self.range_per_level * (level as f32 - 1.0)
    }
}

/// Full game configuration: catalogs, path geometry, wave pacing, economy,
/// and the tuning constants behind the decided ability mechanics.
#[derive(Clone, Debug)]
pub struct FirewallConfig {
    pub tick_hz: u32,
    /// Ordered waypoints enemies follow, shared with the rendering scene.
    pub path: Vec<Position>,

    pub waves_total: u32,
    pub inter_wave_pause: Micros,
    pub spawn_interval: Micros,
    pub wave_base_size: u16,
    pub wave_size_growth: u16,
    /// A run is lost when leaks exceed this count.
    pub max_leaks: u16,

    // Economy
    pub cycles_start: u32,
    pub cycles_per_wave_base: u32,
    pub cycles_per_wave_growth: u32,

    // Ability tuning
    pub split_children: u8,
    pub disable_radius: f32,
    pub disable_duration: Micros,

    /// Floor for the effective attack period. Upgrade deltas shrink the
    /// period and would otherwise drive it to zero at high levels.
    pub min_attack_period_ticks: u64,

    // Enemy catalog
    pub virus: EnemySpec,
    pub worm: EnemySpec,
    pub trojan: EnemySpec,
    pub ransomware: EnemySpec,

    // Tower catalog
    pub firewall: TowerSpec,
    pub antivirus: TowerSpec,
    pub packet_scrubber: TowerSpec,
    pub ai_sentry: TowerSpec,
}

impl FirewallConfig {
    pub fn enemy_spec(&self, kind: EnemyKind) -> &EnemySpec {
        match kind {
            EnemyKind::Virus => &self.virus,
            EnemyKind::Worm => &self.worm,
            EnemyKind::Trojan => &self.trojan,
            EnemyKind::Ransomware => &self.ransomware,
        }
    }

    pub fn tower_spec(&self, kind: TowerKind) -> &TowerSpec {
        match kind {
            TowerKind::Firewall => &self.firewall,
            TowerKind::Antivirus => &self.antivirus,
            TowerKind::PacketScrubber => &self.packet_scrubber,
            TowerKind::AiSentry => &self.ai_sentry,
        }
    }

    pub fn tower_cost(&self, kind: TowerKind) -> u32 {
        self.tower_spec(kind).cost
    }

    /// Price of upgrading a tower that currently sits at `level`.
    pub fn upgrade_cost(&self, kind: TowerKind, level: u32) -> u32 {
        self.tower_spec(kind).upgrade_cost * level
    }

    pub fn duration_to_ticks(&self, d: Micros) -> u64 {
        d.to_ticks(self.tick_hz)
    }

    /// Effective attack period in ticks for `kind` at `level`, clamped to
    /// the configured floor so it can never reach zero.
    pub fn attack_period_ticks(&self, kind: TowerKind, level: u32) -> u64 {
        let spec = self.tower_spec(kind);
        let ms = spec.attack_period_ms as i64
            + spec.attack_period_delta_ms as i64 * (level as i64 - 1);
        let ms = ms.clamp(0, u32::MAX as i64) as u32;
        Micros::from_millis(ms)
            .to_ticks(self.tick_hz)
            .max(self.min_attack_period_ticks)
    }

    /// Ability cooldown in ticks for an enemy kind. Kinds without an
    /// ability never roll, so the value is unused for them.
    pub fn special_cooldown_ticks(&self, kind: EnemyKind) -> u64 {
        self.duration_to_ticks(self.enemy_spec(kind).special_cooldown)
    }

    /// Size of wave number `wave` (1-based).
    pub fn wave_size(&self, wave: u32) -> u16 {
        self.wave_base_size + self.wave_size_growth * (wave.saturating_sub(1)) as u16
    }

    /// CPU cycles awarded for clearing wave number `wave` (1-based).
    pub fn wave_award(&self, wave: u32) -> u32 {
        self.cycles_per_wave_base + self.cycles_per_wave_growth * wave.saturating_sub(1)
    }

    pub fn disable_duration_ticks(&self) -> u64 {
        self.duration_to_ticks(self.disable_duration)
    }
}

impl Default for FirewallConfig {
    fn default() -> Self {
        Self {
            tick_hz: 60,
            path: vec![
                Position::new(0.0, 5.0),
                Position::new(6.0, 5.0),
                Position::new(6.0, 2.0),
                Position::new(12.0, 2.0),
                Position::new(12.0, 8.0),
                Position::new(19.0, 8.0),
            ],

            waves_total: 10,
            inter_wave_pause: Micros::from_secs(10),
            spawn_interval: Micros::from_secs(1),
            wave_base_size: 5,
            wave_size_growth: 3,
            max_leaks: 10,

            cycles_start: 100,
            cycles_per_wave_base: 25,
            cycles_per_wave_growth: 5,

            split_children: 2,
            disable_radius: 2.0,
            disable_duration: Micros::from_secs(3),

            min_attack_period_ticks: 1,

            virus: EnemySpec {
                name: "Virus",
                max_hp: 100,
                speed: Speed::from_cells_per_sec(2),
                damage: 5,
                special_ability: Some(SpecialAbility::Split),
                special_chance: 0.1,
                special_cooldown: Micros::from_millis(2000),
                reward: 10,
            },
            worm: EnemySpec {
                name: "Worm",
                max_hp: 150,
                speed: Speed::from_cells_per_sec_frac(3, 2),
                damage: 10,
                special_ability: Some(SpecialAbility::Split),
                special_chance: 0.3,
                special_cooldown: Micros::from_millis(1000),
                reward: 15,
            },
            trojan: EnemySpec {
                name: "Trojan",
                max_hp: 200,
                speed: Speed::from_cells_per_sec(1),
                damage: 15,
                special_ability: Some(SpecialAbility::Transform),
                special_chance: 0.2,
                special_cooldown: Micros::from_millis(3000),
                reward: 20,
            },
            ransomware: EnemySpec {
                name: "Ransomware",
                max_hp: 300,
                speed: Speed::from_cells_per_sec_frac(1, 2),
                damage: 25,
                special_ability: Some(SpecialAbility::Disable),
                special_chance: 0.15,
                special_cooldown: Micros::from_millis(4000),
                reward: 30,
            },

            firewall: TowerSpec {
                name: "Firewall",
                cost: 50,
                base_damage: 10,
                range: 2.0,
                attack_period_ms: 1000,
                upgrade_cost: 50,
                damage_per_level: 5,
                range_per_level: 1.0,
                attack_period_delta_ms: -100,
            },
            antivirus: TowerSpec {
                name: "Antivirus Scanner",
                cost: 75,
                base_damage: 20,
                range: 1.0,
                attack_period_ms: 2000,
                upgrade_cost: 75,
                damage_per_level: 10,
                range_per_level: 0.0,
                attack_period_delta_ms: -200,
            },
            packet_scrubber: TowerSpec {
                name: "Packet Scrubber",
                cost: 100,
                base_damage: 15,
                range: 3.0,
                attack_period_ms: 500,
                upgrade_cost: 100,
                damage_per_level: 7,
                range_per_level: 1.0,
                attack_period_delta_ms: -50,
            },
            ai_sentry: TowerSpec {
                name: "AI Sentry",
                cost: 150,
                base_damage: 25,
                range: 4.0,
                attack_period_ms: 1500,
                upgrade_cost: 150,
                damage_per_level: 12,
                range_per_level: 1.0,
                attack_period_delta_ms: -150,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upgrade_cost_scales_with_level() {
        let config = FirewallConfig::default();
        assert_eq!(config.upgrade_cost(TowerKind::Firewall, 1), 50);
        assert_eq!(config.upgrade_cost(TowerKind::Firewall, 2), 100);
        assert_eq!(config.upgrade_cost(TowerKind::AiSentry, 3), 450);
    }

    #[test]
    fn tower_stats_scale_with_level() {
        let config = FirewallConfig::default();
        let spec = config.tower_spec(TowerKind::Firewall);
        assert_eq!(spec.damage_at(1), 10);
        assert_eq!(spec.damage_at(3), 20);
        assert_eq!(spec.range_at(2), 3.0);
    }

    #[test]
    fn attack_period_shrinks_with_level() {
        let config = FirewallConfig::default();
        // 1000 ms at level 1, 800 ms at level 3, at 60 Hz.
        assert_eq!(config.attack_period_ticks(TowerKind::Firewall, 1), 60);
        assert_eq!(config.attack_period_ticks(TowerKind::Firewall, 3), 48);
    }

    #[test]
    fn attack_period_clamps_at_floor() {
        let config = FirewallConfig::default();
        // At level 11 the firewall delta sums to -1000 ms; the raw period
        // would be zero or negative without the clamp.
        assert_eq!(
            config.attack_period_ticks(TowerKind::Firewall, 11),
            config.min_attack_period_ticks
        );
        assert_eq!(
            config.attack_period_ticks(TowerKind::Firewall, 40),
            config.min_attack_period_ticks
        );
    }

    #[test]
    fn wave_size_grows() {
        let config = FirewallConfig::default();
        assert_eq!(config.wave_size(1), 5);
        assert_eq!(config.wave_size(4), 14);
    }
}
