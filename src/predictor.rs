use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::{MatchError, Result};
use crate::model::MatchStats;
use crate::record::MatchRecord;

/// Allowed distance between the sum of a prediction and 1.
pub const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// An outcome model fed with flattened match records.
///
/// Implementations are constructed and owned by the caller and passed in
/// explicitly wherever a prediction is needed.
pub trait Predictor {
    /// Return `[home_win, draw, away_win]` probabilities for the record.
    fn predict_proba(&self, record: &MatchRecord) -> Result<[f64; 3]>;
}

/// Validated outcome probabilities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatchPrediction {
    pub home_win: f64,
    pub draw: f64,
    pub away_win: f64,
}

impl MatchPrediction {
    /// Each probability must lie in `[0, 1]` and together they must sum to 1.
    pub fn new(home_win: f64, draw: f64, away_win: f64) -> Result<Self> {
        let in_range = [home_win, draw, away_win]
            .iter()
            .all(|p| (0.0..=1.0).contains(p));
        let sum = home_win + draw + away_win;
        if !in_range || (sum - 1.0).abs() > PROBABILITY_TOLERANCE {
            return Err(MatchError::InvalidPrediction {
                home_win,
                draw,
                away_win,
            });
        }
        Ok(Self {
            home_win,
            draw,
            away_win,
        })
    }
}

impl TryFrom<[f64; 3]> for MatchPrediction {
    type Error = MatchError;

    fn try_from([home_win, draw, away_win]: [f64; 3]) -> Result<Self> {
        Self::new(home_win, draw, away_win)
    }
}

/// Flatten `stats`, run the predictor on it and validate the result.
#[instrument(skip_all, fields(
    home = %stats.home_team_stats.team_name,
    away = %stats.away_team_stats.team_name,
))]
pub fn predict<P: Predictor + ?Sized>(predictor: &P, stats: &MatchStats) -> Result<MatchPrediction> {
    let record = stats.to_record();
    let prediction = MatchPrediction::try_from(predictor.predict_proba(&record)?)?;
    debug!(
        home_win = prediction.home_win,
        draw = prediction.draw,
        away_win = prediction.away_win,
        "predicted match result"
    );
    Ok(prediction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Event, TeamSide};
    use crate::record::{RecordValue, FEATURE_SCHEMA};

    /// Favours whichever side has more goals in the record.
    struct GoalLeader;

    impl Predictor for GoalLeader {
        fn predict_proba(&self, record: &MatchRecord) -> Result<[f64; 3]> {
            let goals = |key: &str| match record.get(key) {
                Some(RecordValue::Count(n)) => Ok(*n),
                _ => Err(MatchError::MissingField(key.to_string())),
            };
            let home = goals("home_team_goal_count")?;
            let away = goals("away_team_goal_count")?;
            Ok(match home.cmp(&away) {
                std::cmp::Ordering::Greater => [0.7, 0.2, 0.1],
                std::cmp::Ordering::Equal => [0.35, 0.3, 0.35],
                std::cmp::Ordering::Less => [0.1, 0.2, 0.7],
            })
        }
    }

    struct Fixed([f64; 3]);

    impl Predictor for Fixed {
        fn predict_proba(&self, record: &MatchRecord) -> Result<[f64; 3]> {
            assert_eq!(record.keys().count(), FEATURE_SCHEMA.len());
            Ok(self.0)
        }
    }

    #[test]
    fn test_predict_with_explicit_predictor() {
        let mut stats = MatchStats::for_teams("Brighton", "Fulham");
        stats.process_event(&Event::goal(TeamSide::Away, 33)).unwrap();

        let prediction = predict(&GoalLeader, &stats).unwrap();
        assert_eq!(prediction.away_win, 0.7);
        assert_eq!(prediction.home_win, 0.1);

        let boxed: Box<dyn Predictor> = Box::new(GoalLeader);
        assert_eq!(predict(boxed.as_ref(), &stats).unwrap(), prediction);
    }

    #[test]
    fn test_rejects_invalid_distributions() {
        let stats = MatchStats::for_teams("A", "B");
        assert!(predict(&Fixed([0.5, 0.5, 0.5]), &stats).is_err());
        assert!(predict(&Fixed([1.2, -0.1, -0.1]), &stats).is_err());
        assert!(predict(&Fixed([f64::NAN, 0.5, 0.5]), &stats).is_err());
        assert!(predict(&Fixed([0.2, 0.3, 0.5]), &stats).is_ok());
    }

    #[test]
    fn test_tolerance() {
        assert!(MatchPrediction::new(0.1, 0.2, 0.7 + 1e-9).is_ok());
        assert!(MatchPrediction::new(0.1, 0.2, 0.7 + 1e-3).is_err());
    }
}
