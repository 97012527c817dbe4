use std::fmt;

/// Error when placing a tower.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceError {
    /// Not enough CPU cycles for this tower kind. The ledger is untouched.
    InsufficientFunds { cost: u32, have: u32 },
}

impl fmt::Display for PlaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaceError::InsufficientFunds { cost, have } => {
                write!(f, "insufficient cpu cycles: need {}, have {}", cost, have)
            }
        }
    }
}

impl std::error::Error for PlaceError {}

/// Error when upgrading a tower.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeError {
    /// No tower with the provided id exists (or it is stale).
    UnknownTower,
    /// Not enough CPU cycles for the level-scaled upgrade price.
    InsufficientFunds { cost: u32, have: u32 },
}

impl fmt::Display for UpgradeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpgradeError::UnknownTower => write!(f, "unknown tower"),
            UpgradeError::InsufficientFunds { cost, have } => {
                write!(f, "insufficient cpu cycles: need {}, have {}", cost, have)
            }
        }
    }
}

impl std::error::Error for UpgradeError {}
