use crate::catalog::FirewallConfig;
use crate::path::Path;
use firewall_types::{EnemyKind, Position, TowerKind};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sim_core::Tick;
use slotmap::{new_key_type, SlotMap};

new_key_type! { pub struct EnemyId; }
new_key_type! { pub struct TowerId; }

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyStatus {
    Active,
    Dead,
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub kind: EnemyKind,
    /// Current health, clamped to >= 0. Zero means dead.
    pub hp: i32,
    pub pos: Position,
    pub status: EnemyStatus,
    /// Tick of the last successful special-ability trigger.
    pub last_special_tick: Tick,
    /// Index of the path segment the enemy is walking.
    pub path_index: usize,
}

impl Enemy {
    pub fn is_active(&self) -> bool {
        self.status == EnemyStatus::Active
    }
}

#[derive(Clone, Debug)]
pub struct Tower {
    pub kind: TowerKind,
    /// Upgrade level, starting at 1. Towers never move once placed.
    pub level: u32,
    pub pos: Position,
    /// First tick at which the tower may fire again.
    pub cooldown_until: Tick,
    pub last_attack_tick: Tick,
    /// Suppression deadline set by the ransomware disable ability.
    pub disabled_until: Tick,
}

/// Mutable collection of spawned enemies.
///
/// Keys identify exactly one instance for their lifetime; operations on
/// stale keys are defined silent no-ops so the tick never halts on a bad
/// reference.
#[derive(Clone, Debug, Default)]
pub struct EnemyRegistry {
    enemies: SlotMap<EnemyId, Enemy>,
}

impl EnemyRegistry {
    /// Insert a new enemy and return its id. `hp` comes from the catalog
    /// for regular spawns and from the parent for split children.
    pub fn spawn(&mut self, kind: EnemyKind, hp: i32, pos: Position, path_index: usize) -> EnemyId {
        self.enemies.insert(Enemy {
            kind,
            hp,
            pos,
            status: EnemyStatus::Active,
            last_special_tick: 0,
            path_index,
        })
    }

    /// Subtract `amount` from an enemy's health, clamping at zero. The
    /// enemy becomes dead exactly when its health reaches zero. Stale id:
    /// no-op.
    pub fn apply_damage(&mut self, id: EnemyId, amount: i32) {
        if let Some(enemy) = self.enemies.get_mut(id) {
            enemy.hp = (enemy.hp - amount).max(0);
            if enemy.hp == 0 {
                enemy.status = EnemyStatus::Dead;
            }
        }
    }

    /// Overwrite an enemy's position. Stale id: no-op.
    pub fn set_position(&mut self, id: EnemyId, pos: Position) {
        if let Some(enemy) = self.enemies.get_mut(id) {
            enemy.pos = pos;
        }
    }

    /// Roll the special ability for one enemy: a uniform draw against
    /// `chance`, gated by the per-kind cooldown. Does NOT stamp
    /// `last_special_tick` — the ability dispatcher records trigger time
    /// once per actual trigger.
    pub fn roll_special(
        &self,
        id: EnemyId,
        tick: Tick,
        chance: f64,
        cooldown_ticks: u64,
        rng: &mut StdRng,
    ) -> bool {
        let Some(enemy) = self.enemies.get(id) else {
            return false;
        };
        let triggered = rng.gen::<f64>() < chance;
        let ready = tick.saturating_sub(enemy.last_special_tick) >= cooldown_ticks;
        triggered && ready
    }

    /// Record a successful ability trigger. Stale id: no-op.
    pub fn mark_special(&mut self, id: EnemyId, tick: Tick) {
        if let Some(enemy) = self.enemies.get_mut(id) {
            enemy.last_special_tick = tick;
        }
    }

    pub fn get(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.get(id)
    }

    pub fn get_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.enemies.get_mut(id)
    }

    pub fn remove(&mut self, id: EnemyId) -> Option<Enemy> {
        self.enemies.remove(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EnemyId, &Enemy)> {
        self.enemies.iter()
    }

    /// Live, targetable enemies. Dead enemies awaiting the purge pass are
    /// excluded from targeting and collision checks.
    pub fn active_iter(&self) -> impl Iterator<Item = (EnemyId, &Enemy)> {
        self.enemies.iter().filter(|(_, e)| e.is_active())
    }

    pub fn ids(&self) -> Vec<EnemyId> {
        self.enemies.keys().collect()
    }

    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }
}

/// Mutable collection of placed towers.
#[derive(Clone, Debug, Default)]
pub struct TowerRegistry {
    towers: SlotMap<TowerId, Tower>,
}

impl TowerRegistry {
    /// Insert a freshly placed level-1 tower. Funding checks happen in the
    /// placement system before this is called.
    pub fn place(&mut self, kind: TowerKind, pos: Position, tick: Tick) -> TowerId {
        self.towers.insert(Tower {
            kind,
            level: 1,
            pos,
            cooldown_until: tick,
            last_attack_tick: 0,
            disabled_until: 0,
        })
    }

    /// Whether a tower may fire at `tick`: its cooldown has expired and it
    /// is not suppressed. Pure read — repeated calls agree until the tick
    /// crosses one of the deadlines. Stale id: false.
    pub fn can_attack(&self, id: TowerId, tick: Tick) -> bool {
        match self.towers.get(id) {
            Some(tower) => tick >= tower.cooldown_until && tick >= tower.disabled_until,
            None => false,
        }
    }

    /// Restart a tower's cooldown after it fired. `period_ticks` is the
    /// level-adjusted, floor-clamped attack period. Stale id: no-op.
    pub fn resolve_attack(&mut self, id: TowerId, tick: Tick, period_ticks: u64) {
        if let Some(tower) = self.towers.get_mut(id) {
            tower.cooldown_until = tick + period_ticks;
            tower.last_attack_tick = tick;
        }
    }

    /// Extend a tower's suppression deadline. Never shortens an existing
    /// one. Stale id: no-op.
    pub fn suppress(&mut self, id: TowerId, until: Tick) {
        if let Some(tower) = self.towers.get_mut(id) {
            tower.disabled_until = tower.disabled_until.max(until);
        }
    }

    pub fn get(&self, id: TowerId) -> Option<&Tower> {
        self.towers.get(id)
    }

    pub fn get_mut(&mut self, id: TowerId) -> Option<&mut Tower> {
        self.towers.get_mut(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (TowerId, &Tower)> {
        self.towers.iter()
    }

    pub fn ids(&self) -> Vec<TowerId> {
        self.towers.keys().collect()
    }

    pub fn len(&self) -> usize {
        self.towers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.towers.is_empty()
    }
}

/// Player resources and run-level flags.
#[derive(Clone, Debug)]
pub struct Ledger {
    /// The single player currency. Debits that would go negative are
    /// refused instead.
    pub cpu_cycles: u32,
    pub current_wave: u32,
    pub waves_total: u32,
    pub leaks: u16,
    pub game_started: bool,
    pub game_over: bool,
}

impl Ledger {
    fn new(config: &FirewallConfig) -> Self {
        Self {
            cpu_cycles: config.cycles_start,
            current_wave: 0,
            waves_total: config.waves_total,
            leaks: 0,
            game_started: false,
            game_over: false,
        }
    }

    pub fn can_afford(&self, cost: u32) -> bool {
        self.cpu_cycles >= cost
    }

    /// Spend `cost` cycles. Returns false and leaves the balance untouched
    /// when unaffordable.
    pub fn debit(&mut self, cost: u32) -> bool {
        if self.cpu_cycles < cost {
            return false;
        }
        self.cpu_cycles -= cost;
        true
    }

    pub fn credit(&mut self, amount: u32) {
        self.cpu_cycles += amount;
    }
}

#[derive(Clone, Debug)]
pub enum WavePhase {
    Pause {
        until_tick: Tick,
    },
    InWave {
        spawned: u16,
        wave_size: u16,
        next_spawn_tick: Tick,
    },
}

#[derive(Clone, Debug, Default)]
pub struct World {
    pub enemies: EnemyRegistry,
    pub towers: TowerRegistry,
}

/// Complete simulation state. Owns the registries and the seeded RNG; the
/// tick holds no state outside this struct, so independent instances run
/// deterministically side by side.
#[derive(Clone, Debug)]
pub struct FirewallState {
    pub config: FirewallConfig,
    pub tick: Tick,
    pub world: World,
    pub ledger: Ledger,
    pub phase: WavePhase,
    pub path: Path,
    pub rng: StdRng,
}

impl FirewallState {
    pub fn new(config: FirewallConfig, seed: u64) -> Self {
        let ledger = Ledger::new(&config);
        let path = Path::new(config.path.clone());
        Self {
            tick: 0,
            world: World::default(),
            ledger,
            phase: WavePhase::Pause { until_tick: 0 },
            path,
            rng: StdRng::seed_from_u64(seed),
            config,
        }
    }

    /// Spawn an enemy with full catalog health at `pos`, entering the path
    /// at its first segment.
    pub fn spawn_enemy(&mut self, kind: EnemyKind, pos: Position) -> EnemyId {
        let hp = self.config.enemy_spec(kind).max_hp;
        self.world.enemies.spawn(kind, hp, pos, 0)
    }

    /// Catalog-aware ability roll for one enemy.
    pub fn roll_special(&mut self, id: EnemyId, tick: Tick) -> bool {
        let Some(enemy) = self.world.enemies.get(id) else {
            return false;
        };
        let spec = self.config.enemy_spec(enemy.kind);
        if spec.special_ability.is_none() {
            return false;
        }
        let cooldown_ticks = self.config.special_cooldown_ticks(enemy.kind);
        self.world
            .enemies
            .roll_special(id, tick, spec.special_chance, cooldown_ticks, &mut self.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> FirewallState {
        FirewallState::new(FirewallConfig::default(), 7)
    }

    #[test]
    fn spawn_uses_catalog_health() {
        let mut s = state();
        let id = s.spawn_enemy(EnemyKind::Trojan, Position::new(0.0, 5.0));
        let enemy = s.world.enemies.get(id).unwrap();
        assert_eq!(enemy.hp, 200);
        assert!(enemy.is_active());
        assert_eq!(enemy.path_index, 0);
    }

    #[test]
    fn damage_clamps_at_zero_and_marks_dead() {
        let mut s = state();
        let id = s.spawn_enemy(EnemyKind::Virus, Position::new(0.0, 5.0));

        s.world.enemies.apply_damage(id, 60);
        let enemy = s.world.enemies.get(id).unwrap();
        assert_eq!(enemy.hp, 40);
        assert_eq!(enemy.status, EnemyStatus::Active);

        s.world.enemies.apply_damage(id, 500);
        let enemy = s.world.enemies.get(id).unwrap();
        assert_eq!(enemy.hp, 0);
        assert_eq!(enemy.status, EnemyStatus::Dead);
    }

    #[test]
    fn set_position_overwrites() {
        let mut s = state();
        let id = s.spawn_enemy(EnemyKind::Virus, Position::new(0.0, 5.0));
        s.world.enemies.set_position(id, Position::new(3.5, 4.0));
        assert_eq!(s.world.enemies.get(id).unwrap().pos, Position::new(3.5, 4.0));
    }

    #[test]
    fn operations_on_stale_ids_are_noops() {
        let mut s = state();
        let id = s.spawn_enemy(EnemyKind::Virus, Position::new(0.0, 5.0));
        s.world.enemies.remove(id);

        s.world.enemies.apply_damage(id, 10);
        s.world.enemies.set_position(id, Position::new(1.0, 1.0));
        s.world.enemies.mark_special(id, 5);
        assert!(s.world.enemies.get(id).is_none());
        assert!(!s.world.towers.can_attack(TowerId::default(), 100));
    }

    #[test]
    fn ledger_refuses_overdraft() {
        let mut s = state();
        assert_eq!(s.ledger.cpu_cycles, 100);
        assert!(s.ledger.can_afford(100));
        assert!(!s.ledger.can_afford(150));
        assert!(!s.ledger.debit(150));
        assert_eq!(s.ledger.cpu_cycles, 100);
        assert!(s.ledger.debit(60));
        assert_eq!(s.ledger.cpu_cycles, 40);
    }

    #[test]
    fn suppress_never_shortens() {
        let mut s = state();
        let id = s.world.towers.place(TowerKind::Firewall, Position::new(2.0, 2.0), 1);
        s.world.towers.suppress(id, 500);
        s.world.towers.suppress(id, 300);
        assert_eq!(s.world.towers.get(id).unwrap().disabled_until, 500);
        assert!(!s.world.towers.can_attack(id, 499));
        assert!(s.world.towers.can_attack(id, 500));
    }
}
