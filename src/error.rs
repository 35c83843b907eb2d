use std::num::ParseIntError;

/// All errors that can occur while building or replaying match state.
#[derive(thiserror::Error, Debug)]
pub enum MatchError {
    /// An event is missing a payload field or a side it needs.
    #[error("malformed {kind} event: {reason}")]
    MalformedEvent { kind: String, reason: &'static str },

    /// An event kind outside the supported set was encountered.
    #[error("unknown event kind: {0}")]
    UnknownEventKind(String),

    /// A value is outside its permitted range.
    #[error("{field} out of range: {value}")]
    OutOfRangeValue { field: &'static str, value: i64 },

    /// No snapshot has been recorded at or before the requested time.
    #[error("no snapshot at or before minute {time}")]
    NotFound { time: u32 },

    /// A phase event arrived in a phase it cannot leave.
    #[error("cannot apply {event} during {from}")]
    InvalidPhaseTransition { from: String, event: &'static str },

    /// A flattened record lacks a required field.
    #[error("missing record field: {0}")]
    MissingField(String),

    /// A flattened record field holds a value that cannot be decoded.
    #[error("invalid value for {field}: {value:?}")]
    InvalidField { field: String, value: String },

    /// Failed to parse an integer from a record value.
    #[error("failed to parse integer: {0}")]
    IntParse(#[from] ParseIntError),

    /// Directly supplied team stats break a counter invariant.
    #[error("inconsistent stats for {team}: {reason}")]
    InvariantViolation { team: String, reason: &'static str },

    /// A predictor returned probabilities that are not a distribution.
    #[error("invalid prediction: home {home_win}, draw {draw}, away {away_win}")]
    InvalidPrediction {
        home_win: f64,
        draw: f64,
        away_win: f64,
    },
}

pub type Result<T> = std::result::Result<T, MatchError>;
