use crate::errors::{PlaceError, UpgradeError};
use crate::events::FwEvent;
use crate::path::PathProgress;
use crate::world::{EnemyId, EnemyRegistry, FirewallState, TowerId, WavePhase};
use firewall_types::{EnemyKind, Position, SpecialAbility, TowerKind};
use sim_core::Tick;

/// Place a tower at `pos`, debiting the ledger. Fails without side effects
/// when the player cannot afford the kind's cost.
pub fn try_place_tower(
    state: &mut FirewallState,
    kind: TowerKind,
    pos: Position,
    tick: Tick,
) -> Result<TowerId, PlaceError> {
    let cost = state.config.tower_cost(kind);
    if !state.ledger.debit(cost) {
        return Err(PlaceError::InsufficientFunds {
            cost,
            have: state.ledger.cpu_cycles,
        });
    }
    Ok(state.world.towers.place(kind, pos, tick))
}

/// Upgrade a tower one level. The price scales with the current level:
/// upgrading from level L costs `upgrade_cost * L`. Returns the new level.
pub fn try_upgrade_tower(state: &mut FirewallState, id: TowerId) -> Result<u32, UpgradeError> {
    let Some(tower) = state.world.towers.get(id) else {
        return Err(UpgradeError::UnknownTower);
    };

    let cost = state.config.upgrade_cost(tower.kind, tower.level);
    if !state.ledger.debit(cost) {
        return Err(UpgradeError::InsufficientFunds {
            cost,
            have: state.ledger.cpu_cycles,
        });
    }

    let tower = state
        .world
        .towers
        .get_mut(id)
        .expect("tower existed above; nothing removes towers");
    tower.level += 1;
    Ok(tower.level)
}

/// Advance the wave machine: open the next wave after the pause, spawn
/// enemies round-robin across the catalog while a wave is live, and award
/// cycles when the wave clears. Idle until the game is started.
pub fn update_wave(state: &mut FirewallState, tick: Tick, events: &mut Vec<FwEvent>) {
    if !state.ledger.game_started || state.ledger.game_over {
        return;
    }

    match &mut state.phase {
        WavePhase::Pause { until_tick } => {
            if tick >= *until_tick {
                state.ledger.current_wave += 1;

                if state.ledger.current_wave > state.ledger.waves_total {
                    // All waves done; win detection happens once the field
                    // clears.
                    state.ledger.current_wave = state.ledger.waves_total;
                    return;
                }

                let wave_size = state.config.wave_size(state.ledger.current_wave);
                state.phase = WavePhase::InWave {
                    spawned: 0,
                    wave_size,
                    next_spawn_tick: tick,
                };

                events.push(FwEvent::WaveStarted {
                    wave: state.ledger.current_wave,
                });
            }
        }
        WavePhase::InWave {
            spawned,
            wave_size,
            next_spawn_tick,
        } => {
            if tick >= *next_spawn_tick && *spawned < *wave_size {
                if let Some(pos) = state.path.start() {
                    let kind = EnemyKind::ALL[*spawned as usize % EnemyKind::ALL.len()];
                    let hp = state.config.enemy_spec(kind).max_hp;
                    let id = state.world.enemies.spawn(kind, hp, pos, 0);
                    events.push(FwEvent::EnemySpawned { id, kind });
                }
                *spawned += 1;
                *next_spawn_tick = tick + state.config.duration_to_ticks(state.config.spawn_interval);
            }

            if *spawned >= *wave_size && state.world.enemies.is_empty() {
                let wave = state.ledger.current_wave;
                let award = state.config.wave_award(wave);
                state.ledger.credit(award);

                events.push(FwEvent::WaveEnded { wave, award });
                state.phase = WavePhase::Pause {
                    until_tick: tick
                        + state.config.duration_to_ticks(state.config.inter_wave_pause),
                };
            }
        }
    }
}

/// Step every active enemy along the path by its per-tick speed fraction.
/// An enemy that runs off the final waypoint leaks: it is removed and the
/// leak counter advances.
pub fn move_enemies(state: &mut FirewallState, _tick: Tick, events: &mut Vec<FwEvent>) {
    for id in state.world.enemies.ids() {
        let Some(enemy) = state.world.enemies.get(id) else {
            continue;
        };
        if !enemy.is_active() {
            continue;
        }

        let step = state
            .config
            .enemy_spec(enemy.kind)
            .speed
            .cells_per_tick(state.config.tick_hz);
        let (pos, index, progress) = state.path.advance(enemy.pos, enemy.path_index, step);

        match progress {
            PathProgress::Advanced => {
                let enemy = state.world.enemies.get_mut(id).expect("checked above");
                enemy.pos = pos;
                enemy.path_index = index;
            }
            PathProgress::ReachedEnd => {
                state.world.enemies.remove(id);
                state.ledger.leaks = state.ledger.leaks.saturating_add(1);
                events.push(FwEvent::EnemyLeaked { id });
            }
        }
    }
}

/// Roll every active enemy's special ability and dispatch triggers.
///
/// The roll itself never stamps the cooldown; this dispatcher records the
/// trigger time exactly once per trigger, then applies the mechanic.
pub fn roll_abilities(state: &mut FirewallState, tick: Tick, events: &mut Vec<FwEvent>) {
    for id in state.world.enemies.ids() {
        let Some(enemy) = state.world.enemies.get(id) else {
            continue;
        };
        if !enemy.is_active() {
            continue;
        }
        let Some(ability) = state.config.enemy_spec(enemy.kind).special_ability else {
            continue;
        };

        if !state.roll_special(id, tick) {
            continue;
        }

        state.world.enemies.mark_special(id, tick);
        events.push(FwEvent::AbilityTriggered { id, ability });

        match ability {
            SpecialAbility::Split => split_enemy(state, id, events),
            SpecialAbility::Transform => transform_enemy(state, id),
            SpecialAbility::Disable => disable_towers_near(state, id, tick, events),
        }
    }
}

/// Break the enemy into weaker copies at its current position and path
/// progress. The parent is consumed and each child carries half its
/// health, so repeated splits halve down to 1 hp and then stop — the
/// population stays bounded.
fn split_enemy(state: &mut FirewallState, id: EnemyId, events: &mut Vec<FwEvent>) {
    let Some(parent) = state.world.enemies.get(id) else {
        return;
    };
    let child_hp = parent.hp / 2;
    if child_hp == 0 {
        // Too small to split further.
        return;
    }
    let (kind, pos, path_index) = (parent.kind, parent.pos, parent.path_index);

    state.world.enemies.remove(id);
    for _ in 0..state.config.split_children {
        let child = state.world.enemies.spawn(kind, child_hp, pos, path_index);
        events.push(FwEvent::EnemySpawned { id: child, kind });
    }
}

/// Reveal the enemy's payload: it becomes ransomware, keeping its health
/// up to the new kind's maximum.
fn transform_enemy(state: &mut FirewallState, id: EnemyId) {
    let max_hp = state.config.ransomware.max_hp;
    if let Some(enemy) = state.world.enemies.get_mut(id) {
        enemy.kind = EnemyKind::Ransomware;
        enemy.hp = enemy.hp.min(max_hp);
    }
}

/// Suppress every tower within the disable radius of the enemy.
fn disable_towers_near(
    state: &mut FirewallState,
    id: EnemyId,
    tick: Tick,
    events: &mut Vec<FwEvent>,
) {
    let Some(enemy) = state.world.enemies.get(id) else {
        return;
    };
    let center = enemy.pos;
    let radius_sq = state.config.disable_radius * state.config.disable_radius;
    let until = tick + state.config.disable_duration_ticks();

    for tower_id in state.world.towers.ids() {
        let Some(tower) = state.world.towers.get(tower_id) else {
            continue;
        };
        if tower.pos.distance_squared(center) <= radius_sq {
            state.world.towers.suppress(tower_id, until);
            events.push(FwEvent::TowerDisabled {
                id: tower_id,
                until_tick: until,
            });
        }
    }
}

/// Fire every ready tower at its selected target, in registry iteration
/// order.
pub fn tower_attacks(state: &mut FirewallState, tick: Tick, events: &mut Vec<FwEvent>) {
    for tower_id in state.world.towers.ids() {
        if !state.world.towers.can_attack(tower_id, tick) {
            continue;
        }
        let Some(tower) = state.world.towers.get(tower_id) else {
            continue;
        };
        let (kind, level, pos) = (tower.kind, tower.level, tower.pos);
        let spec = state.config.tower_spec(kind);
        let range = spec.range_at(level);
        let damage = spec.damage_at(level);

        let Some(target) = select_target(kind, pos, range, &state.world.enemies) else {
            continue;
        };

        state.world.enemies.apply_damage(target, damage);
        let period = state.config.attack_period_ticks(kind, level);
        state.world.towers.resolve_attack(tower_id, tick, period);
        events.push(FwEvent::TowerFired {
            tower: tower_id,
            target,
            damage,
        });
    }
}

/// Pick a target among active enemies within `range` of `pos`.
///
/// The AI Sentry prefers the highest current health; every other kind
/// prefers the smallest Euclidean distance. Ties keep the first candidate
/// in iteration order. Never returns an enemy outside the range.
pub fn select_target(
    kind: TowerKind,
    pos: Position,
    range: f32,
    enemies: &EnemyRegistry,
) -> Option<EnemyId> {
    let range_sq = range * range;

    match kind {
        TowerKind::AiSentry => {
            let mut best: Option<(EnemyId, i32)> = None;
            for (id, enemy) in enemies.active_iter() {
                if enemy.pos.distance_squared(pos) > range_sq {
                    continue;
                }
                if best.map_or(true, |(_, best_hp)| enemy.hp > best_hp) {
                    best = Some((id, enemy.hp));
                }
            }
            best.map(|(id, _)| id)
        }
        _ => {
            let mut best: Option<(EnemyId, f32)> = None;
            for (id, enemy) in enemies.active_iter() {
                let dist_sq = enemy.pos.distance_squared(pos);
                if dist_sq > range_sq {
                    continue;
                }
                if best.map_or(true, |(_, best_dist)| dist_sq < best_dist) {
                    best = Some((id, dist_sq));
                }
            }
            best.map(|(id, _)| id)
        }
    }
}

/// Diagnostic range scan: counts tower/enemy pairs currently in range.
/// Mutates nothing; the count only feeds trace logging and tests.
pub fn collision_scan(state: &FirewallState) -> usize {
    let mut pairs = 0;
    for (_, tower) in state.world.towers.iter() {
        let range = state.config.tower_spec(tower.kind).range_at(tower.level);
        let range_sq = range * range;
        for (_, enemy) in state.world.enemies.active_iter() {
            if enemy.pos.distance_squared(tower.pos) <= range_sq {
                pairs += 1;
            }
        }
    }

    tracing::trace!(
        pairs,
        towers = state.world.towers.len(),
        enemies = state.world.enemies.len(),
        "range scan"
    );
    pairs
}

/// Remove dead enemies and pay out their rewards.
pub fn purge_dead(state: &mut FirewallState, events: &mut Vec<FwEvent>) {
    let dead: Vec<EnemyId> = state
        .world
        .enemies
        .iter()
        .filter_map(|(id, e)| (!e.is_active()).then_some(id))
        .collect();

    for id in dead {
        if let Some(enemy) = state.world.enemies.remove(id) {
            let reward = state.config.enemy_spec(enemy.kind).reward;
            state.ledger.credit(reward);
            events.push(FwEvent::EnemyKilled {
                id,
                kind: enemy.kind,
                reward,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::FirewallConfig;
    use crate::world::FirewallState;

    fn state() -> FirewallState {
        FirewallState::new(FirewallConfig::default(), 99)
    }

    fn spawn_at(state: &mut FirewallState, kind: EnemyKind, x: f32, y: f32) -> EnemyId {
        let hp = state.config.enemy_spec(kind).max_hp;
        state.world.enemies.spawn(kind, hp, Position::new(x, y), 0)
    }

    #[test]
    fn sentry_picks_highest_health() {
        let mut s = state();
        let weak = spawn_at(&mut s, EnemyKind::Virus, 1.0, 0.0);
        let strong = spawn_at(&mut s, EnemyKind::Virus, 2.0, 0.0);
        s.world.enemies.apply_damage(weak, 50); // 50 hp
        s.world.enemies.apply_damage(strong, 20); // 80 hp

        let target = select_target(
            TowerKind::AiSentry,
            Position::new(0.0, 0.0),
            4.0,
            &s.world.enemies,
        );
        assert_eq!(target, Some(strong));
    }

    #[test]
    fn other_towers_pick_nearest() {
        let mut s = state();
        let near = spawn_at(&mut s, EnemyKind::Virus, 1.0, 0.0);
        let _far = spawn_at(&mut s, EnemyKind::Virus, 3.0, 0.0);

        let target = select_target(
            TowerKind::Firewall,
            Position::new(0.0, 0.0),
            5.0,
            &s.world.enemies,
        );
        assert_eq!(target, Some(near));
    }

    #[test]
    fn out_of_range_enemies_are_ignored() {
        let mut s = state();
        let _far = spawn_at(&mut s, EnemyKind::Virus, 10.0, 0.0);

        let target = select_target(
            TowerKind::Firewall,
            Position::new(0.0, 0.0),
            2.0,
            &s.world.enemies,
        );
        assert_eq!(target, None);
    }

    #[test]
    fn dead_enemies_are_not_targets() {
        let mut s = state();
        let id = spawn_at(&mut s, EnemyKind::Virus, 1.0, 0.0);
        s.world.enemies.apply_damage(id, 1_000);

        let target = select_target(
            TowerKind::Firewall,
            Position::new(0.0, 0.0),
            5.0,
            &s.world.enemies,
        );
        assert_eq!(target, None);
    }

    #[test]
    fn purge_pays_rewards() {
        let mut s = state();
        let id = spawn_at(&mut s, EnemyKind::Worm, 1.0, 0.0);
        s.world.enemies.apply_damage(id, 1_000);
        let before = s.ledger.cpu_cycles;

        let mut events = Vec::new();
        purge_dead(&mut s, &mut events);

        assert!(s.world.enemies.is_empty());
        assert_eq!(s.ledger.cpu_cycles, before + 15);
        assert!(matches!(events[0], FwEvent::EnemyKilled { reward: 15, .. }));
    }
}
