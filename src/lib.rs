//! Event-driven football match state.
//!
//! A [`MatchTimeline`] ingests time-ordered [`Event`]s, routes each one to the
//! [`TeamStats`] of the side it belongs to (or both sides for half and full
//! time) and keeps an immutable [`MatchStats`] snapshot per match minute.
//! Snapshots flatten into a fixed-schema [`MatchRecord`] that an external
//! [`Predictor`] consumes.

pub use error::{MatchError, Result};
pub use model::*;
pub use predictor::{predict, MatchPrediction, Predictor, PROBABILITY_TOLERANCE};
pub use record::{parse_goal_timings, MatchRecord, RecordValue, FEATURE_SCHEMA, TEAM_FIELDS};
pub use timeline::MatchTimeline;

pub mod error;
pub mod model;
pub mod predictor;
pub mod record;
pub mod timeline;
