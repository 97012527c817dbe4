pub mod host;

pub use host::{GameHost, RunResult};
