use crate::actions::FwAction;
use crate::catalog::FirewallConfig;
use crate::events::FwEvent;
use crate::systems;
use crate::world::{FirewallState, WavePhase};
use firewall_types::FwObservation;
use sim_core::{ActionEnvelope, Game, TerminalOutcome, Tick};

pub struct FirewallGame {
    state: FirewallState,
    seed: u64,
}

impl FirewallGame {
    pub fn state(&self) -> &FirewallState {
        &self.state
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Game for FirewallGame {
    type Config = FirewallConfig;
    type Action = FwAction;
    type Observation = FwObservation;
    type Event = FwEvent;

    fn new(config: Self::Config, seed: u64) -> Self {
        Self {
            state: FirewallState::new(config, seed),
            seed,
        }
    }

    fn step(
        &mut self,
        tick: Tick,
        actions: &[ActionEnvelope<Self::Action>],
        out_events: &mut Vec<Self::Event>,
    ) {
        self.state.tick = tick;

        // 1. Apply player actions. Failures become events, never halts.
        for action in actions {
            match &action.payload {
                FwAction::StartGame => {
                    if !self.state.ledger.game_started {
                        self.state.ledger.game_started = true;
                        out_events.push(FwEvent::GameStarted);
                    }
                }
                FwAction::PlaceTower { kind, pos } => {
                    match systems::try_place_tower(&mut self.state, *kind, *pos, tick) {
                        Ok(id) => out_events.push(FwEvent::TowerPlaced { id, kind: *kind }),
                        Err(crate::PlaceError::InsufficientFunds { cost, have }) => {
                            out_events.push(FwEvent::PlacementRejected {
                                kind: *kind,
                                cost,
                                have,
                            })
                        }
                    }
                }
                FwAction::UpgradeTower { tower_id } => {
                    match systems::try_upgrade_tower(&mut self.state, *tower_id) {
                        Ok(level) => out_events.push(FwEvent::TowerUpgraded {
                            id: *tower_id,
                            level,
                        }),
                        Err(reason) => out_events.push(FwEvent::UpgradeRejected {
                            id: *tower_id,
                            reason,
                        }),
                    }
                }
            }
        }

        // 2. Wave phase: open waves, spawn enemies, award cleared waves.
        systems::update_wave(&mut self.state, tick, out_events);

        // 3. Enemy movement along the path; arrivals leak.
        systems::move_enemies(&mut self.state, tick, out_events);

        // 4. Special-ability rolls and dispatch.
        systems::roll_abilities(&mut self.state, tick, out_events);

        // 5. Tower targeting and damage, in registry iteration order.
        systems::tower_attacks(&mut self.state, tick, out_events);

        // 6. Diagnostic range scan.
        systems::collision_scan(&self.state);

        // 7. Purge dead enemies, pay rewards.
        systems::purge_dead(&mut self.state, out_events);

        // 8. Latch the game-over flag once an outcome exists.
        if let Some(outcome) = self.is_terminal() {
            if !self.state.ledger.game_over {
                self.state.ledger.game_over = true;
                out_events.push(FwEvent::GameOver { outcome });
            }
        }
    }

    fn observe(&self, tick: Tick) -> Self::Observation {
        crate::observe::build_observation(&self.state, tick)
    }

    fn is_terminal(&self) -> Option<TerminalOutcome> {
        if self.state.ledger.leaks > self.state.config.max_leaks {
            return Some(TerminalOutcome::Lose);
        }

        // Win: final wave opened and fully resolved, field clear.
        if self.state.ledger.game_started
            && self.state.ledger.current_wave >= self.state.ledger.waves_total
        {
            if let WavePhase::Pause { .. } = self.state.phase {
                if self.state.world.enemies.is_empty() {
                    return Some(TerminalOutcome::Win);
                }
            }
        }

        None
    }
}
