use std::collections::BTreeMap;

use tracing::{debug, instrument, warn};

use crate::error::{MatchError, Result};
use crate::model::{Event, MatchStats};

/// Replayable history of a match, keyed by match minute.
///
/// Every recorded event produces a fresh [`MatchStats`] snapshot derived from
/// a copy of the latest snapshot at or before the event's minute. Stored
/// snapshots are never modified afterwards. Several events at the same minute
/// accumulate into one snapshot; the last write for a minute wins.
///
/// A timeline is a single-writer value: producers feeding it from several
/// sources must serialize their events before calling [`MatchTimeline::record`].
///
/// # Examples
///
/// ```
/// use match_state::{Event, MatchTimeline, TeamSide};
///
/// let mut timeline = MatchTimeline::new("Arsenal", "Chelsea");
/// timeline.simulate([
///     Event::goal(TeamSide::Home, 10),
///     Event::half_time(45),
/// ])?;
/// let stats = timeline.snapshot_at(60)?;
/// assert_eq!(stats.total_goals_at_half_time(), 1);
/// # Ok::<(), match_state::MatchError>(())
/// ```
#[derive(Debug, Clone)]
pub struct MatchTimeline {
    kickoff: MatchStats,
    events: BTreeMap<u32, Vec<Event>>,
    snapshots: BTreeMap<u32, MatchStats>,
}

impl MatchTimeline {
    /// Start a timeline for two teams from an all-zero kickoff state.
    pub fn new(home_team_name: impl Into<String>, away_team_name: impl Into<String>) -> Self {
        Self::with_kickoff(MatchStats::for_teams(home_team_name, away_team_name))
    }

    /// Start a timeline from caller-supplied stats instead of an empty kickoff.
    pub fn with_kickoff(kickoff: MatchStats) -> Self {
        Self {
            kickoff,
            events: BTreeMap::new(),
            snapshots: BTreeMap::new(),
        }
    }

    /// Apply one event on top of the latest snapshot at or before its minute.
    ///
    /// On error nothing is stored.
    #[instrument(skip(self))]
    pub fn record(&mut self, event: Event) -> Result<()> {
        let time = event.time();
        if let Some(latest) = self.latest_time() {
            if time < latest {
                warn!(time, latest, "recording event behind the latest snapshot");
            }
        }

        let mut stats = self.base_for(time).clone();
        stats.process_event(&event)?;
        self.snapshots.insert(time, stats);
        self.events.entry(time).or_default().push(event);
        debug!(snapshots = self.snapshots.len(), "recorded event");
        Ok(())
    }

    /// Record each event in the order given, stopping at the first failure.
    ///
    /// Events before the failing one stay recorded.
    #[instrument(skip_all)]
    pub fn simulate<I>(&mut self, events: I) -> Result<()>
    where
        I: IntoIterator<Item = Event>,
    {
        let mut count = 0usize;
        for event in events {
            self.record(event)?;
            count += 1;
        }
        debug!(
            count,
            total_goals = self.latest().total_goal_count(),
            "simulation finished"
        );
        Ok(())
    }

    /// The most recent snapshot at or before `time`.
    #[instrument(skip(self))]
    pub fn snapshot_at(&self, time: u32) -> Result<&MatchStats> {
        self.snapshots
            .range(..=time)
            .next_back()
            .map(|(_, stats)| stats)
            .ok_or(MatchError::NotFound { time })
    }

    /// Events recorded at exactly `time`, in recording order.
    pub fn events_at(&self, time: u32) -> &[Event] {
        self.events.get(&time).map(Vec::as_slice).unwrap_or_default()
    }

    /// All recorded events by minute, in recording order within a minute.
    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.events.values().flatten()
    }

    /// Snapshots keyed by minute, earliest first.
    pub fn snapshots(&self) -> impl Iterator<Item = (u32, &MatchStats)> {
        self.snapshots.iter().map(|(time, stats)| (*time, stats))
    }

    /// The state before any event.
    pub fn kickoff(&self) -> &MatchStats {
        &self.kickoff
    }

    /// The latest snapshot, or the kickoff state if nothing was recorded.
    pub fn latest(&self) -> &MatchStats {
        self.snapshots
            .values()
            .next_back()
            .unwrap_or(&self.kickoff)
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.events.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    fn latest_time(&self) -> Option<u32> {
        self.snapshots.keys().next_back().copied()
    }

    fn base_for(&self, time: u32) -> &MatchStats {
        self.snapshot_at(time).unwrap_or(&self.kickoff)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::model::{CardType, MatchPhase, TeamSide};

    fn timeline() -> MatchTimeline {
        MatchTimeline::new("Home FC", "Away FC")
    }

    #[test]
    fn test_empty_stream() {
        let mut timeline = timeline();
        timeline.simulate(Vec::new()).unwrap();

        assert!(timeline.is_empty());
        let stats = timeline.latest();
        assert_eq!(stats, &MatchStats::for_teams("Home FC", "Away FC"));
        assert_eq!(stats.home_team_stats.shots, 0);
        assert_eq!(stats.away_team_stats.yellow_cards + stats.away_team_stats.red_cards, 0);
        assert_eq!(stats.total_goal_count(), 0);
        assert_eq!(stats.phase(), MatchPhase::FirstHalf);
        assert_eq!(stats.home_team_stats.possession, 50);
        assert_eq!(stats.away_team_stats.possession, 50);
        assert!(matches!(
            timeline.snapshot_at(90),
            Err(MatchError::NotFound { time: 90 })
        ));
    }

    #[test]
    fn test_replay_scenario() {
        let mut timeline = timeline();
        timeline
            .simulate([
                Event::goal(TeamSide::Home, 10),
                Event::card(TeamSide::Away, 10, CardType::Yellow),
                Event::half_time(45),
                Event::goal(TeamSide::Home, 50),
            ])
            .unwrap();

        let stats = timeline.snapshot_at(50).unwrap();
        assert_eq!(stats.home_team_stats.goal_count, 2);
        assert_eq!(stats.home_team_stats.goal_count_half_time, 1);
        assert_eq!(stats.away_team_stats.yellow_cards, 1);
        assert_eq!(stats.away_team_stats.first_half_cards, 1);
        assert_eq!(stats.home_team_stats.phase, MatchPhase::SecondHalf);
        assert_eq!(stats.away_team_stats.phase, MatchPhase::SecondHalf);

        assert_eq!(timeline.events_at(10).len(), 2);
        assert_eq!(timeline.len(), 4);
    }

    #[test]
    fn test_snapshot_between_keys() {
        let mut timeline = timeline();
        timeline.record(Event::goal(TeamSide::Away, 20)).unwrap();
        timeline.record(Event::goal(TeamSide::Away, 70)).unwrap();

        assert!(timeline.snapshot_at(19).is_err());
        assert_eq!(timeline.snapshot_at(20).unwrap().total_goal_count(), 1);
        assert_eq!(timeline.snapshot_at(69).unwrap().total_goal_count(), 1);
        assert_eq!(timeline.snapshot_at(120).unwrap().total_goal_count(), 2);
    }

    #[test]
    fn test_past_snapshots_are_not_mutated() {
        let mut timeline = timeline();
        timeline.record(Event::corner(TeamSide::Home, 5)).unwrap();
        let early = timeline.snapshot_at(5).unwrap().clone();

        timeline.record(Event::corner(TeamSide::Home, 8)).unwrap();
        timeline.record(Event::half_time(45)).unwrap();

        assert_eq!(timeline.snapshot_at(5).unwrap(), &early);
        assert_eq!(timeline.snapshot_at(8).unwrap().home_team_stats.corner_count, 2);
    }

    #[test]
    fn test_out_of_order_event_builds_on_earlier_snapshot() {
        let mut timeline = timeline();
        timeline.record(Event::goal(TeamSide::Home, 30)).unwrap();
        timeline.record(Event::goal(TeamSide::Away, 10)).unwrap();

        let at_ten = timeline.snapshot_at(10).unwrap();
        assert_eq!(at_ten.away_team_stats.goal_count, 1);
        assert_eq!(at_ten.home_team_stats.goal_count, 0);
        assert_eq!(timeline.snapshot_at(30).unwrap().away_team_stats.goal_count, 0);
    }

    #[test]
    fn test_failed_record_stores_nothing() {
        let mut timeline = timeline();
        timeline.record(Event::half_time(45)).unwrap();

        let result = timeline.simulate([Event::half_time(46), Event::goal(TeamSide::Home, 47)]);
        assert!(matches!(
            result,
            Err(MatchError::InvalidPhaseTransition { .. })
        ));
        assert!(timeline.events_at(46).is_empty());
        assert!(timeline.events_at(47).is_empty());
        assert_eq!(timeline.len(), 1);
    }

    #[test]
    fn test_with_kickoff() {
        let mut kickoff = MatchStats::for_teams("A", "B");
        kickoff.home_team_stats.fouls = 3;
        let mut timeline = MatchTimeline::with_kickoff(kickoff);
        timeline.record(Event::corner(TeamSide::Home, 1)).unwrap();

        let stats = timeline.snapshot_at(1).unwrap();
        assert_eq!(stats.home_team_stats.fouls, 3);
        assert_eq!(stats.home_team_stats.corner_count, 1);
        assert_eq!(timeline.kickoff().home_team_stats.corner_count, 0);
    }

    fn any_event() -> impl Strategy<Value = Event> {
        let side = prop_oneof![Just(TeamSide::Home), Just(TeamSide::Away)];
        (side, 0u32..100, 0u8..8, any::<bool>(), 0u8..=100).prop_map(
            |(side, time, kind, flag, pct)| match kind {
                0 => Event::goal(side, time),
                1 => Event::shot(side, time, flag),
                2 => Event::corner(side, time),
                3 => Event::possession(side, time, pct).unwrap(),
                4 => Event::card(side, time, CardType::Yellow),
                5 => Event::card(side, time, CardType::Red),
                6 => Event::half_time(time),
                _ => Event::full_time(time),
            },
        )
    }

    proptest! {
        #[test]
        fn prop_snapshots_stay_consistent(
            mut events in proptest::collection::vec(any_event(), 0..48)
        ) {
            events.sort_by_key(Event::time);
            let mut timeline = timeline();
            for event in events {
                let _ = timeline.record(event);
                let latest = timeline.latest();
                prop_assert!(latest.validate().is_ok());
                prop_assert!(latest.total_goals_at_half_time() <= latest.total_goal_count());
            }
        }
    }
}
