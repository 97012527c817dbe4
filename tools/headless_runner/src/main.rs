use clap::Parser;
use sim_firewall::{FirewallConfig, FirewallGame, FwAction, FwEvent, Position, TowerKind};
use sim_host::GameHost;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "headless_runner",
    about = "Run the Firewall Frenzy simulation without a renderer"
)]
struct Args {
    /// RNG seed for the run.
    #[arg(long, default_value_t = 12345)]
    seed: u64,

    /// Give up after this many ticks (10 minutes at 60 Hz by default).
    #[arg(long, default_value_t = 36_000)]
    max_ticks: u64,

    /// Override the number of waves.
    #[arg(long)]
    waves: Option<u32>,

    /// Step in real time at the configured tick rate instead of flat out.
    #[arg(long, short)]
    realtime: bool,

    /// Print the final observation as JSON.
    #[arg(long)]
    json: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = FirewallConfig::default();
    if let Some(waves) = args.waves {
        config.waves_total = waves;
    }
    let tick_hz = config.tick_hz;

    let mut host: GameHost<FirewallGame> = GameHost::new(config, args.seed, tick_hz);
    tracing::info!(seed = args.seed, tick_hz, "starting run");

    host.submit(FwAction::StartGame);

    // Opening build order with the starting 100 cycles: two firewalls on
    // the first leg of the path. The later placements are scheduled blind
    // and simply get rejected if the wave economy has not caught up yet.
    host.submit(FwAction::PlaceTower {
        kind: TowerKind::Firewall,
        pos: Position::new(3.0, 4.0),
    });
    host.submit(FwAction::PlaceTower {
        kind: TowerKind::Firewall,
        pos: Position::new(6.0, 4.0),
    });
    host.submit_at(
        FwAction::PlaceTower {
            kind: TowerKind::PacketScrubber,
            pos: Position::new(9.0, 3.0),
        },
        tick_at_secs(tick_hz, 45),
    );
    host.submit_at(
        FwAction::PlaceTower {
            kind: TowerKind::AiSentry,
            pos: Position::new(12.0, 5.0),
        },
        tick_at_secs(tick_hz, 120),
    );

    if args.realtime {
        run_realtime(&mut host, tick_hz, args.max_ticks);
    } else {
        run_fast(&mut host, args.max_ticks);
    }

    if args.json {
        match serde_json::to_string_pretty(&host.observe()) {
            Ok(json) => println!("{}", json),
            Err(err) => tracing::error!(%err, "failed to serialize observation"),
        }
    }
}

/// Tick number `secs` seconds into the run.
fn tick_at_secs(tick_hz: u32, secs: u64) -> u64 {
    secs * tick_hz as u64
}

fn run_fast(host: &mut GameHost<FirewallGame>, max_ticks: u64) {
    let result = host.run_for_ticks(max_ticks);

    println!("=== Firewall Frenzy Simulation Complete ===");
    println!("Outcome: {:?}", result.outcome);
    println!("Final tick: {}", result.final_tick);

    print_state(host);
    print_event_summary(&result.events);
}

fn run_realtime(host: &mut GameHost<FirewallGame>, tick_hz: u32, max_ticks: u64) {
    let tick_duration = Duration::from_secs_f64(1.0 / tick_hz as f64);
    let mut last_status = Instant::now();
    let mut all_events = Vec::new();

    println!("=== Running in Real-Time Mode ({}Hz) ===", tick_hz);
    println!("Press Ctrl+C to stop\n");

    while host.current_tick() < max_ticks {
        let tick_start = Instant::now();

        let Some(events) = host.step_one_tick() else {
            break; // terminal
        };

        for event in &events {
            print_event(host.current_tick(), event);
        }
        all_events.extend(events);

        if last_status.elapsed() >= Duration::from_secs(1) {
            print_status(host);
            last_status = Instant::now();
        }

        let elapsed = tick_start.elapsed();
        if elapsed < tick_duration {
            std::thread::sleep(tick_duration - elapsed);
        }
    }

    println!("\n=== Firewall Frenzy Simulation Complete ===");
    println!("Outcome: {:?}", host.is_terminal());
    println!("Final tick: {}", host.current_tick());

    print_state(host);
    print_event_summary(&all_events);
}

fn print_state(host: &GameHost<FirewallGame>) {
    let state = host.game().state();
    println!("Seed: {}", host.game().seed());
    println!("CPU cycles: {}", state.ledger.cpu_cycles);
    println!("Leaks: {}/{}", state.ledger.leaks, state.config.max_leaks);
    println!("Towers: {}", state.world.towers.len());
    println!("Enemies remaining: {}", state.world.enemies.len());
    println!(
        "Wave: {}/{}",
        state.ledger.current_wave, state.ledger.waves_total
    );
}

fn print_status(host: &GameHost<FirewallGame>) {
    let state = host.game().state();
    let time_secs = host.current_tick() as f64 / host.tick_hz() as f64;
    println!(
        "  [{:>6.1}s] Wave {}/{}, Enemies: {}, Towers: {}, Cycles: {}, Leaks: {}/{}",
        time_secs,
        state.ledger.current_wave,
        state.ledger.waves_total,
        state.world.enemies.len(),
        state.world.towers.len(),
        state.ledger.cpu_cycles,
        state.ledger.leaks,
        state.config.max_leaks
    );
}

fn print_event(tick: u64, event: &FwEvent) {
    match event {
        FwEvent::GameStarted => println!("[{:>6}] Game started", tick),
        FwEvent::WaveStarted { wave } => println!("[{:>6}] === Wave {} started ===", tick, wave),
        FwEvent::WaveEnded { wave, award } => println!(
            "[{:>6}] === Wave {} cleared (+{} cycles) ===",
            tick, wave, award
        ),
        FwEvent::EnemySpawned { kind, .. } => println!("[{:>6}] {:?} spawned", tick, kind),
        FwEvent::EnemyKilled { kind, reward, .. } => {
            println!("[{:>6}] {:?} destroyed (+{} cycles)", tick, kind, reward)
        }
        FwEvent::EnemyLeaked { .. } => println!("[{:>6}] Enemy leaked!", tick),
        FwEvent::AbilityTriggered { ability, .. } => {
            println!("[{:>6}] Ability triggered: {:?}", tick, ability)
        }
        FwEvent::TowerPlaced { kind, .. } => println!("[{:>6}] {:?} placed", tick, kind),
        FwEvent::PlacementRejected { kind, cost, have } => println!(
            "[{:>6}] {:?} rejected: need {} cycles, have {}",
            tick, kind, cost, have
        ),
        FwEvent::TowerUpgraded { level, .. } => {
            println!("[{:>6}] Tower upgraded to level {}", tick, level)
        }
        FwEvent::UpgradeRejected { reason, .. } => {
            println!("[{:>6}] Upgrade rejected: {}", tick, reason)
        }
        FwEvent::TowerFired { damage, .. } => {
            println!("[{:>6}] Tower fired for {} damage", tick, damage)
        }
        FwEvent::TowerDisabled { until_tick, .. } => {
            println!("[{:>6}] Tower disabled until tick {}", tick, until_tick)
        }
        FwEvent::GameOver { outcome } => println!("[{:>6}] GAME OVER: {:?}", tick, outcome),
    }
}

fn print_event_summary(events: &[FwEvent]) {
    let mut spawned = 0;
    let mut killed = 0;
    let mut leaked = 0;
    let mut abilities = 0;
    let mut placed = 0;
    let mut rejected = 0;
    let mut upgraded = 0;
    let mut shots = 0;
    let mut disabled = 0;

    for event in events {
        match event {
            FwEvent::EnemySpawned { .. } => spawned += 1,
            FwEvent::EnemyKilled { .. } => killed += 1,
            FwEvent::EnemyLeaked { .. } => leaked += 1,
            FwEvent::AbilityTriggered { .. } => abilities += 1,
            FwEvent::TowerPlaced { .. } => placed += 1,
            FwEvent::PlacementRejected { .. } | FwEvent::UpgradeRejected { .. } => rejected += 1,
            FwEvent::TowerUpgraded { .. } => upgraded += 1,
            FwEvent::TowerFired { .. } => shots += 1,
            FwEvent::TowerDisabled { .. } => disabled += 1,
            _ => {}
        }
    }

    println!("\n=== Event Summary ===");
    println!("Enemies spawned: {}", spawned);
    println!("Enemies destroyed: {}", killed);
    println!("Enemies leaked: {}", leaked);
    println!("Abilities triggered: {}", abilities);
    println!("Towers placed: {}", placed);
    println!("Actions rejected: {}", rejected);
    println!("Towers upgraded: {}", upgraded);
    println!("Shots fired: {}", shots);
    println!("Towers disabled: {}", disabled);
}
