use std::fmt::{Display, Formatter};

use itertools::Itertools;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{MatchError, Result};
use crate::model::{MatchPhase, MatchStats, TeamSide, TeamStats};

/// Per-team fields of a flattened record, in record order.
pub const TEAM_FIELDS: [&str; 15] = [
    "name",
    "goal_count",
    "goal_count_half_time",
    "goal_timings",
    "corner_count",
    "yellow_cards",
    "red_cards",
    "first_half_cards",
    "second_half_cards",
    "shots",
    "shots_on_target",
    "shots_off_target",
    "fouls",
    "possession",
    "phase",
];

/// Every key of a flattened record, in the order [`MatchStats::to_record`] emits them.
///
/// Predictors rely on this order as their feature schema.
pub const FEATURE_SCHEMA: [&str; 30] = [
    "home_team_name",
    "home_team_goal_count",
    "home_team_goal_count_half_time",
    "home_team_goal_timings",
    "home_team_corner_count",
    "home_team_yellow_cards",
    "home_team_red_cards",
    "home_team_first_half_cards",
    "home_team_second_half_cards",
    "home_team_shots",
    "home_team_shots_on_target",
    "home_team_shots_off_target",
    "home_team_fouls",
    "home_team_possession",
    "home_team_phase",
    "away_team_name",
    "away_team_goal_count",
    "away_team_goal_count_half_time",
    "away_team_goal_timings",
    "away_team_corner_count",
    "away_team_yellow_cards",
    "away_team_red_cards",
    "away_team_first_half_cards",
    "away_team_second_half_cards",
    "away_team_shots",
    "away_team_shots_on_target",
    "away_team_shots_off_target",
    "away_team_fouls",
    "away_team_possession",
    "away_team_phase",
];

/// A single value in a flattened record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordValue {
    Count(u32),
    Text(String),
}

impl Display for RecordValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordValue::Count(n) => write!(f, "{n}"),
            RecordValue::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<u32> for RecordValue {
    fn from(value: u32) -> Self {
        RecordValue::Count(value)
    }
}

impl From<String> for RecordValue {
    fn from(value: String) -> Self {
        RecordValue::Text(value)
    }
}

/// Ordered key/value view of a [`MatchStats`], used as a predictor's feature vector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchRecord {
    fields: Vec<(String, RecordValue)>,
}

impl MatchRecord {
    /// Build a record from textual key/value pairs, e.g. a row of a table.
    ///
    /// Values stay text until [`MatchStats::from_record`] decodes them.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), RecordValue::Text(v.into())))
                .collect_vec(),
        }
    }

    /// Set `key`, replacing any value already stored under it.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<RecordValue>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&RecordValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RecordValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for MatchRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

/// Parse a comma-separated list of goal minutes. Blank input yields no goals.
pub fn parse_goal_timings(input: &str) -> Result<Vec<u32>> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<u32>().map_err(MatchError::from))
        .collect()
}

fn team_values(stats: &TeamStats) -> [RecordValue; 15] {
    [
        stats.team_name.clone().into(),
        stats.goal_count.into(),
        stats.goal_count_half_time.into(),
        stats.goal_timings.iter().join(",").into(),
        stats.corner_count.into(),
        stats.yellow_cards.into(),
        stats.red_cards.into(),
        stats.first_half_cards.into(),
        stats.second_half_cards.into(),
        stats.shots.into(),
        stats.shots_on_target.into(),
        stats.shots_off_target.into(),
        stats.fouls.into(),
        u32::from(stats.possession).into(),
        stats.phase.to_string().into(),
    ]
}

struct TeamReader<'a> {
    record: &'a MatchRecord,
    prefix: &'static str,
}

impl TeamReader<'_> {
    fn key(&self, field: &str) -> String {
        format!("{}{field}", self.prefix)
    }

    fn value(&self, field: &str) -> Result<&RecordValue> {
        let key = self.key(field);
        self.record
            .get(&key)
            .ok_or(MatchError::MissingField(key))
    }

    fn text(&self, field: &str) -> Result<String> {
        Ok(self.value(field)?.to_string())
    }

    fn count(&self, field: &str) -> Result<u32> {
        match self.value(field)? {
            RecordValue::Count(n) => Ok(*n),
            RecordValue::Text(s) => Ok(s.trim().parse()?),
        }
    }

    fn possession(&self) -> Result<u8> {
        let value = self.count("possession")?;
        u8::try_from(value)
            .ok()
            .filter(|p| *p <= 100)
            .ok_or(MatchError::OutOfRangeValue {
                field: "possession",
                value: i64::from(value),
            })
    }

    fn goal_timings(&self) -> Result<Vec<u32>> {
        match self.record.get(&self.key("goal_timings")) {
            None => Ok(Vec::new()),
            Some(RecordValue::Count(minute)) => Ok(vec![*minute]),
            Some(RecordValue::Text(s)) => parse_goal_timings(s),
        }
    }

    fn team(&self) -> Result<TeamStats> {
        Ok(TeamStats {
            team_name: self.text("name")?,
            goal_count: self.count("goal_count")?,
            goal_count_half_time: self.count("goal_count_half_time")?,
            goal_timings: self.goal_timings()?,
            corner_count: self.count("corner_count")?,
            yellow_cards: self.count("yellow_cards")?,
            red_cards: self.count("red_cards")?,
            first_half_cards: self.count("first_half_cards")?,
            second_half_cards: self.count("second_half_cards")?,
            shots: self.count("shots")?,
            shots_on_target: self.count("shots_on_target")?,
            shots_off_target: self.count("shots_off_target")?,
            fouls: self.count("fouls")?,
            possession: self.possession()?,
            phase: MatchPhase::from_label(&self.text("phase")?)?,
        })
    }
}

impl MatchStats {
    /// Flatten both teams into a record keyed by [`FEATURE_SCHEMA`].
    pub fn to_record(&self) -> MatchRecord {
        let fields = [TeamSide::Home, TeamSide::Away]
            .into_iter()
            .flat_map(|side| {
                TEAM_FIELDS
                    .iter()
                    .zip(team_values(self.team(side)))
                    .map(move |(field, value)| (format!("{}{field}", side.prefix()), value))
            })
            .collect_vec();
        MatchRecord { fields }
    }

    /// Rebuild stats from a flattened record and validate them.
    ///
    /// A missing goal timing field is read as no goals; every other field is required.
    pub fn from_record(record: &MatchRecord) -> Result<Self> {
        let read = |side: TeamSide| {
            TeamReader {
                record,
                prefix: side.prefix(),
            }
            .team()
        };
        let stats = MatchStats::new(read(TeamSide::Home)?, read(TeamSide::Away)?);
        stats.validate()?;
        Ok(stats)
    }
}
