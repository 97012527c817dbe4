use crate::types::{ActionId, Tick};

/// An action submitted to the host, stamped with scheduling metadata.
///
/// `action_id` is assigned by the host in submission order and is the
/// tie-breaker when several actions land on the same tick.
#[derive(Clone, Debug)]
pub struct ActionEnvelope<A> {
    pub action_id: ActionId,
    pub intended_tick: Tick,
    pub payload: A,
}
