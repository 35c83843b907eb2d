use serde::{Deserialize, Serialize};
use strum_macros::EnumString;

/// Which of the two teams an event belongs to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TeamSide {
    Home,
    Away,
}

impl TeamSide {
    /// Prefix used for this side's fields in a flattened record.
    pub fn prefix(self) -> &'static str {
        match self {
            TeamSide::Home => "home_team_",
            TeamSide::Away => "away_team_",
        }
    }
}

/// Colour of a disciplinary card.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum CardType {
    Yellow,
    Red,
}
