use serde::{Deserialize, Serialize};
use strum_macros::EnumString;

use crate::error::{MatchError, Result};
use crate::model::{CardType, Event, EventKind};

/// Possession share assigned to a team before any possession event.
pub const DEFAULT_POSSESSION: u8 = 50;

/// How far a team's view of the match has progressed.
#[derive(
    Debug,
    Default,
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
#[strum(ascii_case_insensitive)]
pub enum MatchPhase {
    #[default]
    #[strum(to_string = "first half", serialize = "first_half")]
    FirstHalf,
    #[strum(to_string = "second half", serialize = "second_half")]
    SecondHalf,
    #[strum(to_string = "complete")]
    Complete,
}

impl MatchPhase {
    /// Parse a human-readable label such as `"First Half"` or `"SECOND_HALF"`.
    pub fn from_label(label: &str) -> Result<Self> {
        label
            .trim()
            .replace(' ', "_")
            .parse()
            .map_err(|_| MatchError::InvalidField {
                field: "phase".to_string(),
                value: label.to_string(),
            })
    }
}

/// Running totals for one team over one match.
///
/// Fields are public so a collector can fill them in directly; such values
/// should go through [`TeamStats::validate`] before use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamStats {
    pub team_name: String,
    pub goal_count: u32,
    pub goal_count_half_time: u32,
    pub goal_timings: Vec<u32>,
    pub corner_count: u32,
    pub yellow_cards: u32,
    pub red_cards: u32,
    pub first_half_cards: u32,
    pub second_half_cards: u32,
    pub shots: u32,
    pub shots_on_target: u32,
    pub shots_off_target: u32,
    pub fouls: u32,
    pub possession: u8,
    pub phase: MatchPhase,
}

impl TeamStats {
    pub fn new(team_name: impl Into<String>) -> Self {
        Self {
            team_name: team_name.into(),
            goal_count: 0,
            goal_count_half_time: 0,
            goal_timings: Vec::new(),
            corner_count: 0,
            yellow_cards: 0,
            red_cards: 0,
            first_half_cards: 0,
            second_half_cards: 0,
            shots: 0,
            shots_on_target: 0,
            shots_off_target: 0,
            fouls: 0,
            possession: DEFAULT_POSSESSION,
            phase: MatchPhase::FirstHalf,
        }
    }

    /// Apply one event to this team. A rejected event leaves the stats untouched.
    pub fn process_event(&mut self, event: &Event) -> Result<()> {
        self.check(event)?;
        self.apply(event);
        Ok(())
    }

    /// Reject events that would make an illegal phase transition.
    pub(crate) fn check(&self, event: &Event) -> Result<()> {
        let legal = match event.kind() {
            EventKind::HalfTime => self.phase == MatchPhase::FirstHalf,
            EventKind::FullTime => self.phase != MatchPhase::Complete,
            _ => true,
        };
        if legal {
            Ok(())
        } else {
            Err(MatchError::InvalidPhaseTransition {
                from: self.phase.to_string(),
                event: event.kind().name(),
            })
        }
    }

    /// Must only be called after [`TeamStats::check`] accepted the event.
    pub(crate) fn apply(&mut self, event: &Event) {
        match event.kind() {
            EventKind::Goal => {
                self.goal_count = self.goal_count.saturating_add(1);
                self.goal_timings.push(event.time());
                if self.phase == MatchPhase::FirstHalf {
                    self.goal_count_half_time = self.goal_count_half_time.saturating_add(1);
                }
            }
            EventKind::Shot { on_target } => {
                self.shots = self.shots.saturating_add(1);
                if on_target {
                    self.shots_on_target = self.shots_on_target.saturating_add(1);
                } else {
                    self.shots_off_target = self.shots_off_target.saturating_add(1);
                }
            }
            EventKind::Corner => self.corner_count = self.corner_count.saturating_add(1),
            EventKind::Possession { percentage } => self.possession = percentage,
            EventKind::Card { card_type } => {
                match card_type {
                    CardType::Yellow => self.yellow_cards = self.yellow_cards.saturating_add(1),
                    CardType::Red => self.red_cards = self.red_cards.saturating_add(1),
                }
                if self.phase == MatchPhase::FirstHalf {
                    self.first_half_cards = self.first_half_cards.saturating_add(1);
                } else {
                    self.second_half_cards = self.second_half_cards.saturating_add(1);
                }
            }
            EventKind::HalfTime => self.phase = MatchPhase::SecondHalf,
            EventKind::FullTime => self.phase = MatchPhase::Complete,
        }
    }

    /// Yellow plus red, widened to `u64`.
    pub fn total_cards(&self) -> u64 {
        u64::from(self.yellow_cards) + u64::from(self.red_cards)
    }

    /// Check the counter invariants that event processing maintains on its own.
    pub fn validate(&self) -> Result<()> {
        let violation = |reason| MatchError::InvariantViolation {
            team: self.team_name.clone(),
            reason,
        };
        let shots_split = u64::from(self.shots_on_target) + u64::from(self.shots_off_target);
        if u64::from(self.shots) != shots_split {
            return Err(violation("shots must equal on target plus off target"));
        }
        if self.goal_count_half_time > self.goal_count {
            return Err(violation("half time goals exceed total goals"));
        }
        let cards_split = u64::from(self.first_half_cards) + u64::from(self.second_half_cards);
        if cards_split != self.total_cards() {
            return Err(violation("cards per half must add up to total cards"));
        }
        if self.possession > 100 {
            return Err(violation("possession above 100"));
        }
        Ok(())
    }
}
