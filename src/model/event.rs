use serde::{Deserialize, Serialize};

use crate::error::{MatchError, Result};
use crate::model::{CardType, TeamSide};

/// The closed set of occurrences a match can produce, with their payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Goal,
    Shot { on_target: bool },
    Corner,
    Possession { percentage: u8 },
    Card { card_type: CardType },
    HalfTime,
    FullTime,
}

impl EventKind {
    /// Wire name of the kind.
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::Goal => "goal",
            EventKind::Shot { .. } => "shot",
            EventKind::Corner => "corner",
            EventKind::Possession { .. } => "possession",
            EventKind::Card { .. } => "card",
            EventKind::HalfTime => "half_time",
            EventKind::FullTime => "full_time",
        }
    }

    /// Phase events apply to both teams and carry no side.
    pub fn is_phase(&self) -> bool {
        matches!(self, EventKind::HalfTime | EventKind::FullTime)
    }
}

/// A single validated match occurrence.
///
/// Events can only be built through the constructors below (or deserialized
/// through [`RawEvent`]), so every value held by the rest of the crate already
/// carries the payload and side its kind requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawEvent", into = "RawEvent")]
pub struct Event {
    kind: EventKind,
    side: Option<TeamSide>,
    time: u32,
}

impl Event {
    /// Build an event, rejecting team events without a side and possession
    /// values above 100. The side of a phase event is discarded.
    pub fn new(kind: EventKind, side: Option<TeamSide>, time: u32) -> Result<Self> {
        if let EventKind::Possession { percentage } = kind {
            if percentage > 100 {
                return Err(MatchError::OutOfRangeValue {
                    field: "possession",
                    value: i64::from(percentage),
                });
            }
        }
        let side = if kind.is_phase() {
            None
        } else {
            Some(side.ok_or_else(|| MatchError::MalformedEvent {
                kind: kind.name().to_string(),
                reason: "team event without a side",
            })?)
        };
        Ok(Self { kind, side, time })
    }

    pub fn goal(side: TeamSide, time: u32) -> Self {
        Self::team(EventKind::Goal, side, time)
    }

    pub fn shot(side: TeamSide, time: u32, on_target: bool) -> Self {
        Self::team(EventKind::Shot { on_target }, side, time)
    }

    pub fn corner(side: TeamSide, time: u32) -> Self {
        Self::team(EventKind::Corner, side, time)
    }

    pub fn card(side: TeamSide, time: u32, card_type: CardType) -> Self {
        Self::team(EventKind::Card { card_type }, side, time)
    }

    pub fn possession(side: TeamSide, time: u32, percentage: u8) -> Result<Self> {
        Self::new(EventKind::Possession { percentage }, Some(side), time)
    }

    pub fn half_time(time: u32) -> Self {
        Self {
            kind: EventKind::HalfTime,
            side: None,
            time,
        }
    }

    pub fn full_time(time: u32) -> Self {
        Self {
            kind: EventKind::FullTime,
            side: None,
            time,
        }
    }

    fn team(kind: EventKind, side: TeamSide, time: u32) -> Self {
        Self {
            kind,
            side: Some(side),
            time,
        }
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// The team this event belongs to, `None` for phase events.
    pub fn side(&self) -> Option<TeamSide> {
        self.side
    }

    /// Match minute.
    pub fn time(&self) -> u32 {
        self.time
    }
}

/// Loosely typed wire form of an [`Event`], as produced by external collectors.
///
/// `kind` is matched case-insensitively, with spaces or dashes accepted in place
/// of underscores. The legacy kinds `yellow_card` and `red_card` are read as a
/// `card` with the implied colour.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEvent {
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<TeamSide>,
    pub time: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_target: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_type: Option<CardType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage: Option<i64>,
}

impl RawEvent {
    fn kind(&self) -> Result<EventKind> {
        let normalized = self
            .kind
            .trim()
            .to_ascii_lowercase()
            .replace([' ', '-'], "_");
        let kind = match normalized.as_str() {
            "goal" => EventKind::Goal,
            "shot" => EventKind::Shot {
                on_target: self.on_target.ok_or_else(|| malformed("shot", "missing on_target"))?,
            },
            "corner" => EventKind::Corner,
            "possession" => {
                let value = self
                    .percentage
                    .ok_or_else(|| malformed("possession", "missing percentage"))?;
                let percentage = u8::try_from(value)
                    .ok()
                    .filter(|p| *p <= 100)
                    .ok_or(MatchError::OutOfRangeValue {
                        field: "possession",
                        value,
                    })?;
                EventKind::Possession { percentage }
            }
            "card" => EventKind::Card {
                card_type: self
                    .card_type
                    .ok_or_else(|| malformed("card", "missing card_type"))?,
            },
            "yellow_card" => EventKind::Card {
                card_type: CardType::Yellow,
            },
            "red_card" => EventKind::Card {
                card_type: CardType::Red,
            },
            "half_time" => EventKind::HalfTime,
            "full_time" => EventKind::FullTime,
            _ => return Err(MatchError::UnknownEventKind(self.kind.clone())),
        };
        Ok(kind)
    }
}

fn malformed(kind: &str, reason: &'static str) -> MatchError {
    MatchError::MalformedEvent {
        kind: kind.to_string(),
        reason,
    }
}

impl TryFrom<RawEvent> for Event {
    type Error = MatchError;

    fn try_from(raw: RawEvent) -> Result<Self> {
        Event::new(raw.kind()?, raw.side, raw.time)
    }
}

impl From<Event> for RawEvent {
    fn from(event: Event) -> Self {
        let mut raw = RawEvent {
            kind: event.kind.name().to_string(),
            side: event.side,
            time: event.time,
            ..Default::default()
        };
        match event.kind {
            EventKind::Shot { on_target } => raw.on_target = Some(on_target),
            EventKind::Possession { percentage } => raw.percentage = Some(i64::from(percentage)),
            EventKind::Card { card_type } => raw.card_type = Some(card_type),
            EventKind::Goal | EventKind::Corner | EventKind::HalfTime | EventKind::FullTime => {}
        }
        raw
    }
}
