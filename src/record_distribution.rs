use rayon::prelude::*;
use std::collections::HashMap;

use crate::config::LeagueConfig;
use crate::constants::PROBABILITY_TOLERANCE;
use crate::error::{LeagueError, Result};
use crate::score_matrix::ScoreMatrix;
use crate::win_counter::count_beaten;

/// Probability mass over a team's possible regular-season win totals.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordDistribution {
    pub team: String,

    /// probabilities[k] = P(team finishes with exactly k wins), k in 0..=weeks
    pub probabilities: Vec<f64>,

    /// Sum of k * probabilities[k] over the same vector
    pub expected_wins: f64,
}

impl RecordDistribution {
    /// Build from per-week beat probabilities.
    pub fn from_weekly(team: String, weekly: &[f64]) -> Self {
        let probabilities = win_distribution(weekly);
        let expected_wins = expected_wins(&probabilities);
        RecordDistribution {
            team,
            probabilities,
            expected_wins,
        }
    }

    /// Like [`RecordDistribution::from_weekly`] for probabilities computed
    /// elsewhere; each must lie in [0, 1]. Weeks are numbered from 1.
    pub fn try_from_weekly(team: String, weekly: &[f64]) -> Result<Self> {
        for (week, &p) in weekly.iter().enumerate() {
            check_probability(&team, week as u32 + 1, p)?;
        }
        Ok(Self::from_weekly(team, weekly))
    }

    pub fn weeks(&self) -> usize {
        self.probabilities.len().saturating_sub(1)
    }

    pub fn probability(&self, wins: usize) -> f64 {
        self.probabilities.get(wins).copied().unwrap_or(0.0)
    }

    pub fn total_mass(&self) -> f64 {
        self.probabilities.iter().sum()
    }

    pub fn is_normalized(&self) -> bool {
        (self.total_mass() - 1.0).abs() <= PROBABILITY_TOLERANCE
    }

    /// `"<wins>-<losses>"` labels with their probability, most wins first.
    pub fn records(&self) -> Vec<(String, f64)> {
        let weeks = self.weeks();
        self.probabilities
            .iter()
            .enumerate()
            .rev()
            .map(|(wins, &p)| (record_label(wins, weeks), p))
            .collect()
    }
}

pub fn record_label(wins: usize, weeks: usize) -> String {
    format!("{}-{}", wins, weeks.saturating_sub(wins))
}

/// Fraction of the league's N - 1 possible opponents a team outscored.
///
/// # Errors
///
/// `InvalidLeagueSize` when the league has no opponents to divide by, and
/// `InvalidProbability` when the result falls outside [0, 1]. Out-of-range
/// values are never clamped: they mean the score table and the configured
/// league size disagree.
pub fn beat_probability(team: &str, week: u32, beaten: usize, num_teams: usize) -> Result<f64> {
    if num_teams < 2 {
        return Err(LeagueError::InvalidLeagueSize { teams: num_teams });
    }
    let probability = beaten as f64 / (num_teams - 1) as f64;
    check_probability(team, week, probability)?;
    Ok(probability)
}

fn check_probability(team: &str, week: u32, probability: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&probability) {
        return Err(LeagueError::InvalidProbability {
            team: team.to_string(),
            week,
            probability,
        });
    }
    Ok(())
}

/// Distribution of total wins over independent weekly Bernoulli trials.
///
/// Forward DP over win buckets, one week at a time:
/// `prob[w][k] = prob[w-1][k-1] * p_w + prob[w-1][k] * (1 - p_w)`.
/// The row is updated in place from the top bucket down, so the whole season
/// takes O(W^2) time and O(W) space.
///
/// Treating weeks as independent ignores that real opponents' results are
/// correlated through the schedule. That approximation is the statistical
/// model of record distributions and is kept on purpose.
pub fn win_distribution(weekly: &[f64]) -> Vec<f64> {
    let mut dist = vec![0.0; weekly.len() + 1];
    dist[0] = 1.0;
    for (week, &p) in weekly.iter().enumerate() {
        let played = week + 1;
        for k in (1..=played).rev() {
            dist[k] = dist[k] * (1.0 - p) + dist[k - 1] * p;
        }
        dist[0] *= 1.0 - p;
    }
    dist
}

pub fn expected_wins(dist: &[f64]) -> f64 {
    dist.iter().enumerate().map(|(k, &p)| k as f64 * p).sum()
}

/// Record distribution for every team over the configured regular season.
///
/// Weekly beat counts are derived once per week, then each team's DP runs on
/// the rayon pool; teams have no ordering dependency on each other.
pub fn compute_distributions(
    matrix: &ScoreMatrix,
    config: &LeagueConfig,
) -> Result<HashMap<String, RecordDistribution>> {
    matrix.check_league(config)?;
    let weeks = matrix.regular_season_weeks(config.season_weeks);

    // beaten[week][team]
    let beaten: Vec<Vec<usize>> = weeks
        .iter()
        .map(|&w| {
            let scores: Vec<f64> = (0..matrix.team_count())
                .map(|t| matrix.score(t, w))
                .collect();
            count_beaten(&scores)
        })
        .collect();

    let distributions = (0..matrix.team_count())
        .into_par_iter()
        .map(|t| -> Result<RecordDistribution> {
            let name = matrix.team_name(t);
            let weekly = weeks
                .iter()
                .zip(&beaten)
                .map(|(&w, counts)| {
                    beat_probability(name, matrix.weeks()[w].number, counts[t], config.num_teams)
                })
                .collect::<Result<Vec<f64>>>()?;
            Ok(RecordDistribution::from_weekly(name.to_string(), &weekly))
        })
        .collect::<Result<Vec<_>>>()?;

    log::debug!(
        "computed record distributions for {} teams over {} weeks",
        distributions.len(),
        weeks.len()
    );

    Ok(distributions
        .into_iter()
        .map(|d| (d.team.clone(), d))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score_matrix::ScoreRow;

    #[test]
    fn test_single_week_distribution() {
        let b = RecordDistribution::from_weekly("B".to_string(), &[2.0 / 3.0]);
        let records = b.records();
        assert_eq!(records[0].0, "1-0");
        assert_eq!(records[1].0, "0-1");
        assert!((records[0].1 - 0.67).abs() < 0.005);
        assert!((records[1].1 - 0.33).abs() < 0.005);

        let a = RecordDistribution::from_weekly("A".to_string(), &[1.0]);
        assert_eq!(a.records(), vec![("1-0".to_string(), 1.0), ("0-1".to_string(), 0.0)]);
        let d = RecordDistribution::from_weekly("D".to_string(), &[0.0]);
        assert_eq!(d.probability(0), 1.0);
        assert_eq!(d.expected_wins, 0.0);
    }

    #[test]
    fn test_binomial_case() {
        // Constant p reduces to Binomial(3, 0.5)
        let dist = win_distribution(&[0.5, 0.5, 0.5]);
        let expected = [0.125, 0.375, 0.375, 0.125];
        for (got, want) in dist.iter().zip(expected) {
            assert!((got - want).abs() < 1e-12);
        }
        assert!((expected_wins(&dist) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_mass_and_expectation() {
        let weekly = [0.1, 0.9, 0.444, 0.777, 0.0, 1.0, 0.333];
        let d = RecordDistribution::from_weekly("X".to_string(), &weekly);
        assert_eq!(d.weeks(), 7);
        assert!(d.is_normalized());
        let sum_p: f64 = weekly.iter().sum();
        assert!((d.expected_wins - sum_p).abs() < 1e-9);
        assert_eq!(d.expected_wins, expected_wins(&d.probabilities));
    }

    #[test]
    fn test_out_of_range_probabilities_rejected() {
        let err = RecordDistribution::try_from_weekly("X".to_string(), &[0.5, 1.2]).unwrap_err();
        assert_eq!(
            err,
            LeagueError::InvalidProbability {
                team: "X".to_string(),
                week: 2,
                probability: 1.2
            }
        );
        assert!(RecordDistribution::try_from_weekly("X".to_string(), &[-0.1]).is_err());
        assert!(RecordDistribution::try_from_weekly("X".to_string(), &[f64::NAN]).is_err());
        assert!(RecordDistribution::try_from_weekly("X".to_string(), &[0.0, 1.0]).is_ok());
    }

    #[test]
    fn test_empty_season() {
        let d = RecordDistribution::from_weekly("X".to_string(), &[]);
        assert_eq!(d.records(), vec![("0-0".to_string(), 1.0)]);
    }

    #[test]
    fn test_beat_probability_bounds() {
        assert!((beat_probability("A", 1, 3, 4).expect("in range") - 1.0).abs() < 1e-12);
        assert!((beat_probability("A", 1, 9, 10).expect("in range") - 1.0).abs() < 1e-12);
        // Eight of nine opponents in a ten-team league
        assert!((beat_probability("A", 1, 8, 10).expect("in range") - 8.0 / 9.0).abs() < 1e-12);
        assert!(matches!(
            beat_probability("A", 2, 5, 4),
            Err(LeagueError::InvalidProbability { week: 2, .. })
        ));
        assert!(matches!(
            beat_probability("A", 1, 0, 1),
            Err(LeagueError::InvalidLeagueSize { teams: 1 })
        ));
    }

    #[test]
    fn test_compute_distributions_four_teams() {
        let rows = vec![
            ScoreRow::regular("A", 1, 100.0, Some("B")),
            ScoreRow::regular("B", 1, 90.0, Some("A")),
            ScoreRow::regular("C", 1, 80.0, Some("D")),
            ScoreRow::regular("D", 1, 70.0, Some("C")),
        ];
        let matrix = ScoreMatrix::from_rows(&rows).expect("valid table");
        let config = LeagueConfig::new(4, 1);
        let dists = compute_distributions(&matrix, &config).expect("valid league");

        assert_eq!(dists.len(), 4);
        assert_eq!(dists["A"].probability(1), 1.0);
        assert_eq!(dists["D"].probability(0), 1.0);
        assert!((dists["B"].probability(1) - 2.0 / 3.0).abs() < 1e-12);
        assert!((dists["C"].probability(1) - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_compute_distributions_rejects_wrong_league_size() {
        let rows = vec![
            ScoreRow::regular("A", 1, 100.0, None),
            ScoreRow::regular("B", 1, 90.0, None),
        ];
        let matrix = ScoreMatrix::from_rows(&rows).expect("valid table");
        let err = compute_distributions(&matrix, &LeagueConfig::new(10, 1)).unwrap_err();
        assert!(matches!(err, LeagueError::TeamCountMismatch { .. }));
    }
}
