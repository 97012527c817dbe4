/// Simulation tick counter. Tick 0 means "before the first step".
pub type Tick = u64;

/// Monotonically increasing identifier assigned to submitted actions.
/// Used to order actions deterministically within a tick.
pub type ActionId = u64;
