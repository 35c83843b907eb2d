mod common;
mod event;
mod match_stats;
mod team_stats;

pub use common::*;
pub use event::*;
pub use match_stats::*;
pub use team_stats::*;
