use crate::world::{EnemyId, FirewallState, TowerId, WavePhase};
use firewall_types::{EnemyInfo, FwObservation, TowerInfo, WaveStatus};
use sim_core::Tick;
use slotmap::Key;

pub fn tower_id_to_u64(id: TowerId) -> u64 {
    id.data().as_ffi()
}

pub fn enemy_id_to_u64(id: EnemyId) -> u64 {
    id.data().as_ffi()
}

/// Snapshot everything the HUD needs: ledger, wave status, path geometry,
/// and per-entity positions and stats.
pub fn build_observation(state: &FirewallState, tick: Tick) -> FwObservation {
    let config = &state.config;

    let wave_status = match &state.phase {
        WavePhase::Pause { until_tick } => WaveStatus::Pause {
            until_tick: *until_tick,
        },
        WavePhase::InWave {
            spawned,
            wave_size,
            next_spawn_tick,
        } => WaveStatus::InWave {
            spawned: *spawned,
            wave_size: *wave_size,
            next_spawn_tick: *next_spawn_tick,
        },
    };

    FwObservation {
        tick,
        ticks_per_second: config.tick_hz,

        current_wave: state.ledger.current_wave,
        waves_total: state.ledger.waves_total,
        wave_status,

        cpu_cycles: state.ledger.cpu_cycles,
        leaks: state.ledger.leaks,
        max_leaks: config.max_leaks,
        game_started: state.ledger.game_started,
        game_over: state.ledger.game_over,

        path: config.path.clone(),

        towers: state
            .world
            .towers
            .iter()
            .map(|(id, t)| {
                let spec = config.tower_spec(t.kind);
                TowerInfo {
                    id: tower_id_to_u64(id),
                    kind: t.kind,
                    level: t.level,
                    x: t.pos.x,
                    y: t.pos.y,
                    damage: spec.damage_at(t.level),
                    range: spec.range_at(t.level),
                    upgrade_cost: config.upgrade_cost(t.kind, t.level),
                    ready: state.world.towers.can_attack(id, tick),
                    disabled: tick < t.disabled_until,
                }
            })
            .collect(),
        enemies: state
            .world
            .enemies
            .active_iter()
            .map(|(id, e)| EnemyInfo {
                id: enemy_id_to_u64(id),
                kind: e.kind,
                x: e.pos.x,
                y: e.pos.y,
                hp: e.hp,
                max_hp: config.enemy_spec(e.kind).max_hp,
            })
            .collect(),
    }
}
