use sim_core::{ActionEnvelope, ActionId, Game, Micros, TerminalOutcome, Tick};
use std::collections::BTreeMap;

#[derive(Debug)]
pub struct RunResult<G: Game> {
    pub outcome: Option<TerminalOutcome>,
    pub final_tick: Tick,
    pub events: Vec<G::Event>,
}

/// Single-threaded frame-driven host for one [`Game`] instance.
///
/// The host owns the game and is the only code that steps it, so placement
/// and upgrade actions submitted between frames are serialized with tick
/// execution by construction. Frame callbacks with variable deltas feed
/// [`GameHost::advance`], which converts elapsed wall time into whole fixed
/// ticks and carries the remainder to the next frame.
pub struct GameHost<G: Game> {
    game: G,
    current_tick: Tick,
    tick_hz: u32,
    next_action_id: ActionId,
    pending_actions: BTreeMap<Tick, Vec<ActionEnvelope<G::Action>>>,
    // Unconsumed frame time, raw Q32.32 microseconds.
    accumulator: u64,
}

impl<G: Game> GameHost<G> {
    pub fn new(config: G::Config, seed: u64, tick_hz: u32) -> Self {
        Self {
            game: G::new(config, seed),
            current_tick: 0,
            tick_hz,
            next_action_id: 1,
            pending_actions: BTreeMap::new(),
            accumulator: 0,
        }
    }

    /// Submit an action for the next tick. Returns the assigned action id
    /// and the tick it was scheduled for.
    pub fn submit(&mut self, payload: G::Action) -> (ActionId, Tick) {
        let next = self.current_tick + 1;
        self.submit_at(payload, next)
    }

    /// Submit an action for a specific tick. Ticks already executed slide
    /// forward to the next tick. Returns the assigned action id and the
    /// actual scheduled tick.
    pub fn submit_at(&mut self, payload: G::Action, intended_tick: Tick) -> (ActionId, Tick) {
        let scheduled_tick = if intended_tick <= self.current_tick {
            self.current_tick + 1
        } else {
            intended_tick
        };

        let action_id = self.next_action_id;
        self.next_action_id += 1;

        self.pending_actions
            .entry(scheduled_tick)
            .or_default()
            .push(ActionEnvelope {
                action_id,
                intended_tick: scheduled_tick,
                payload,
            });

        (action_id, scheduled_tick)
    }

    /// Consume a frame's elapsed time, stepping zero or more fixed ticks.
    ///
    /// The remainder below one tick period is retained, so calling this at
    /// any frame rate accumulates no drift. Stops early if the game reaches
    /// a terminal state.
    pub fn advance(&mut self, delta: Micros) -> Vec<G::Event> {
        let period = Micros::per_tick(self.tick_hz).raw();
        let mut events = Vec::new();

        if period == 0 {
            return events;
        }

        self.accumulator += delta.raw();
        while self.accumulator >= period {
            self.accumulator -= period;
            match self.step_one_tick() {
                Some(tick_events) => events.extend(tick_events),
                None => break,
            }
        }

        events
    }

    /// Advance by exactly one tick. Returns `None` if the game is already
    /// terminal, otherwise the events emitted by this tick.
    pub fn step_one_tick(&mut self) -> Option<Vec<G::Event>> {
        if self.game.is_terminal().is_some() {
            return None;
        }

        self.current_tick += 1;

        let mut actions = self
            .pending_actions
            .remove(&self.current_tick)
            .unwrap_or_default();

        // Sort by action id for determinism.
        actions.sort_by_key(|a| a.action_id);

        let mut tick_events = Vec::new();
        self.game
            .step(self.current_tick, &actions, &mut tick_events);

        Some(tick_events)
    }

    pub fn run_for_ticks(&mut self, max_ticks: Tick) -> RunResult<G> {
        let mut all_events = Vec::new();

        for _ in 0..max_ticks {
            match self.step_one_tick() {
                Some(tick_events) => all_events.extend(tick_events),
                None => break,
            }
        }

        RunResult {
            outcome: self.game.is_terminal(),
            final_tick: self.current_tick,
            events: all_events,
        }
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn observe(&self) -> G::Observation {
        self.game.observe(self.current_tick)
    }

    pub fn current_tick(&self) -> Tick {
        self.current_tick
    }

    pub fn tick_hz(&self) -> u32 {
        self.tick_hz
    }

    pub fn is_terminal(&self) -> Option<TerminalOutcome> {
        self.game.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal game for host tests: counter increments via actions, wins at
    /// a target value.
    struct CounterGame {
        counter: u64,
        target: u64,
    }

    #[derive(Clone, Debug)]
    struct CounterConfig {
        target: u64,
    }

    #[derive(Clone, Debug)]
    enum CounterAction {
        Increment(u64),
    }

    #[derive(Clone, Debug)]
    enum CounterEvent {
        Incremented { new_value: u64 },
    }

    impl Game for CounterGame {
        type Config = CounterConfig;
        type Action = CounterAction;
        type Observation = u64;
        type Event = CounterEvent;

        fn new(config: Self::Config, _seed: u64) -> Self {
            Self {
                counter: 0,
                target: config.target,
            }
        }

        fn step(
            &mut self,
            _tick: Tick,
            actions: &[ActionEnvelope<Self::Action>],
            out_events: &mut Vec<Self::Event>,
        ) {
            for action in actions {
                let CounterAction::Increment(amount) = &action.payload;
                self.counter += *amount;
                out_events.push(CounterEvent::Incremented {
                    new_value: self.counter,
                });
            }
        }

        fn observe(&self, _tick: Tick) -> Self::Observation {
            self.counter
        }

        fn is_terminal(&self) -> Option<TerminalOutcome> {
            (self.counter >= self.target).then_some(TerminalOutcome::Win)
        }
    }

    fn host(target: u64) -> GameHost<CounterGame> {
        GameHost::new(CounterConfig { target }, 42, 60)
    }

    #[test]
    fn past_dated_actions_slide_to_next_tick() {
        let mut h = host(1000);
        h.run_for_ticks(5);

        let (_, scheduled) = h.submit_at(CounterAction::Increment(1), 3);
        assert_eq!(scheduled, 6);
    }

    #[test]
    fn actions_apply_on_their_scheduled_tick() {
        let mut h = host(1000);
        h.submit_at(CounterAction::Increment(7), 4);

        h.run_for_ticks(3);
        assert_eq!(h.observe(), 0);

        h.run_for_ticks(1);
        assert_eq!(h.observe(), 7);
    }

    #[test]
    fn run_stops_at_terminal() {
        let mut h = host(10);
        h.submit_at(CounterAction::Increment(10), 2);

        let result = h.run_for_ticks(100);
        assert_eq!(result.outcome, Some(TerminalOutcome::Win));
        assert_eq!(result.final_tick, 2);
        assert!(h.step_one_tick().is_none());
    }

    #[test]
    fn advance_steps_whole_ticks_and_carries_remainder() {
        let mut h = host(1000);

        // One 60 Hz tick is ~16.67 ms; a 10 ms frame steps nothing.
        h.advance(Micros::from_millis(10));
        assert_eq!(h.current_tick(), 0);

        // The next 10 ms frame crosses the period boundary exactly once.
        h.advance(Micros::from_millis(10));
        assert_eq!(h.current_tick(), 1);

        // One second of frame time always lands on 60 ticks total.
        for _ in 0..98 {
            h.advance(Micros::from_millis(10));
        }
        assert_eq!(h.current_tick(), 60);
    }

    #[test]
    fn same_tick_actions_apply_in_submission_order() {
        let mut h = host(1000);
        h.submit_at(CounterAction::Increment(1), 2);
        h.submit_at(CounterAction::Increment(2), 2);

        let result = h.run_for_ticks(2);
        let values: Vec<u64> = result
            .events
            .iter()
            .map(|e| {
                let CounterEvent::Incremented { new_value } = e;
                *new_value
            })
            .collect();
        assert_eq!(values, vec![1, 3]);
    }
}
