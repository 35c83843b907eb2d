use serde::{Deserialize, Serialize};

use crate::error::{MatchError, Result};
use crate::model::{Event, MatchPhase, TeamSide, TeamStats};

/// Both teams' running statistics for one match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchStats {
    pub home_team_stats: TeamStats,
    pub away_team_stats: TeamStats,
}

impl MatchStats {
    pub fn new(home_team_stats: TeamStats, away_team_stats: TeamStats) -> Self {
        Self {
            home_team_stats,
            away_team_stats,
        }
    }

    /// Kickoff state: every counter zero, both teams in the first half.
    pub fn for_teams(home_team_name: impl Into<String>, away_team_name: impl Into<String>) -> Self {
        Self::new(
            TeamStats::new(home_team_name),
            TeamStats::new(away_team_name),
        )
    }

    /// Route an event to its team, or to both teams for phase events.
    ///
    /// Phase events are checked against both sides before either is changed.
    pub fn process_event(&mut self, event: &Event) -> Result<()> {
        match event.side() {
            _ if event.kind().is_phase() => {
                self.home_team_stats.check(event)?;
                self.away_team_stats.check(event)?;
                self.home_team_stats.apply(event);
                self.away_team_stats.apply(event);
                Ok(())
            }
            Some(side) => self.team_mut(side).process_event(event),
            None => Err(MatchError::MalformedEvent {
                kind: event.kind().name().to_string(),
                reason: "team event without a side",
            }),
        }
    }

    pub fn team(&self, side: TeamSide) -> &TeamStats {
        match side {
            TeamSide::Home => &self.home_team_stats,
            TeamSide::Away => &self.away_team_stats,
        }
    }

    fn team_mut(&mut self, side: TeamSide) -> &mut TeamStats {
        match side {
            TeamSide::Home => &mut self.home_team_stats,
            TeamSide::Away => &mut self.away_team_stats,
        }
    }

    pub fn total_goal_count(&self) -> u32 {
        self.home_team_stats.goal_count + self.away_team_stats.goal_count
    }

    pub fn total_goals_at_half_time(&self) -> u32 {
        self.home_team_stats.goal_count_half_time + self.away_team_stats.goal_count_half_time
    }

    /// Current phase. Event processing keeps both teams in the same phase.
    pub fn phase(&self) -> MatchPhase {
        self.home_team_stats.phase
    }

    /// Validate both teams and that their phases agree.
    pub fn validate(&self) -> Result<()> {
        self.home_team_stats.validate()?;
        self.away_team_stats.validate()?;
        if self.home_team_stats.phase != self.away_team_stats.phase {
            return Err(MatchError::InvariantViolation {
                team: self.away_team_stats.team_name.clone(),
                reason: "phase differs from the home team",
            });
        }
        Ok(())
    }
}
