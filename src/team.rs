use statrs::statistics::Statistics;

use crate::constants::MIN_HISTORY_WEEKS;

/// A fantasy team (identified by its manager) with its realized weekly scores.
///
/// `scores` holds regular-season weeks only, in week order. Statistics are
/// computed once at construction since the score table is read-only.
#[derive(Clone, Debug, PartialEq)]
pub struct Team {
    pub name: String,

    pub scores: Vec<f64>,

    /// Mean weekly score, 0.0 when the team has no scores yet
    pub mean: f64,

    /// Sample standard deviation of weekly scores; `None` with fewer than two weeks
    pub std_dev: Option<f64>,
}

impl Team {
    pub fn new(name: String, scores: Vec<f64>) -> Self {
        let mean = if scores.is_empty() {
            0.0
        } else {
            scores.iter().mean()
        };
        let std_dev = if scores.len() >= MIN_HISTORY_WEEKS {
            Some(scores.iter().std_dev())
        } else {
            None
        };

        Team {
            name,
            scores,
            mean,
            std_dev,
        }
    }

    pub fn total_points(&self) -> f64 {
        self.scores.iter().sum()
    }

    pub fn weeks_played(&self) -> usize {
        self.scores.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_std_dev() {
        let team = Team::new("Ann".to_string(), vec![100.0, 110.0, 120.0]);
        assert!((team.mean - 110.0).abs() < 1e-10);
        // sample variance: (100 + 0 + 100) / 2 = 100
        let sd = team.std_dev.expect("three weeks of history");
        assert!((sd - 10.0).abs() < 1e-10);
        assert!((team.total_points() - 330.0).abs() < 1e-10);
    }

    #[test]
    fn test_single_week_has_no_std_dev() {
        let team = Team::new("Bo".to_string(), vec![95.5]);
        assert_eq!(team.std_dev, None);
        assert!((team.mean - 95.5).abs() < 1e-10);
    }

    #[test]
    fn test_empty_history() {
        let team = Team::new("Cy".to_string(), Vec::new());
        assert_eq!(team.std_dev, None);
        assert_eq!(team.mean, 0.0);
        assert_eq!(team.weeks_played(), 0);
    }

    #[test]
    fn test_constant_scores_zero_std_dev() {
        let team = Team::new("Di".to_string(), vec![80.0, 80.0, 80.0, 80.0]);
        assert_eq!(team.std_dev, Some(0.0));
    }
}
