use std::collections::HashMap;
use std::ops::AddAssign;

/// Number of other teams each team strictly outscored in one week.
///
/// Output is parallel to `scores`. Ties count as zero beats, so a week in which
/// every team scores the same yields all zeros.
pub fn count_beaten(scores: &[f64]) -> Vec<usize> {
    let sorted = sorted_scores(scores);
    scores
        .iter()
        .map(|&s| sorted.partition_point(|&other| other < s))
        .collect()
}

/// Named form of [`count_beaten`] for one week's (team, score) vector.
pub fn teams_beaten_this_week(week: &[(&str, f64)]) -> HashMap<String, usize> {
    let scores: Vec<f64> = week.iter().map(|&(_, score)| score).collect();
    week.iter()
        .zip(count_beaten(&scores))
        .map(|(&(team, _), beaten)| (team.to_string(), beaten))
        .collect()
}

/// A team's record had it played every other team.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AllPlayRecord {
    pub wins: usize,
    pub losses: usize,
    pub ties: usize,
}

impl AllPlayRecord {
    pub fn games(&self) -> usize {
        self.wins + self.losses + self.ties
    }

    /// Wins over games with ties counted as half; 0.0 before any games.
    pub fn win_pct(&self) -> f64 {
        let games = self.games();
        if games == 0 {
            return 0.0;
        }
        (self.wins as f64 + 0.5 * self.ties as f64) / games as f64
    }
}

impl AddAssign for AllPlayRecord {
    fn add_assign(&mut self, other: Self) {
        self.wins += other.wins;
        self.losses += other.losses;
        self.ties += other.ties;
    }
}

/// One week's all-play record for every team, parallel to `scores`.
pub fn all_play_week(scores: &[f64]) -> Vec<AllPlayRecord> {
    let sorted = sorted_scores(scores);
    let opponents = scores.len().saturating_sub(1);
    scores
        .iter()
        .map(|&s| {
            let wins = sorted.partition_point(|&other| other < s);
            let not_above = sorted.partition_point(|&other| other <= s);
            let losses = sorted.len() - not_above;
            AllPlayRecord {
                wins,
                losses,
                ties: opponents - wins - losses,
            }
        })
        .collect()
}

fn sorted_scores(scores: &[f64]) -> Vec<f64> {
    let mut sorted = scores.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_four_team_week() {
        let week = [("A", 100.0), ("B", 90.0), ("C", 80.0), ("D", 70.0)];
        let beaten = teams_beaten_this_week(&week);
        assert_eq!(beaten["A"], 3);
        assert_eq!(beaten["B"], 2);
        assert_eq!(beaten["C"], 1);
        assert_eq!(beaten["D"], 0);
    }

    #[test]
    fn test_all_equal_week_is_zero() {
        assert_eq!(count_beaten(&[88.0, 88.0, 88.0, 88.0]), vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_ties_do_not_count() {
        assert_eq!(count_beaten(&[100.0, 90.0, 90.0, 70.0]), vec![3, 1, 1, 0]);
    }

    #[test]
    fn test_distinct_scores_sum() {
        let scores = [112.4, 87.0, 99.9, 130.2, 64.1, 101.0];
        let total: usize = count_beaten(&scores).iter().sum();
        assert_eq!(total, 6 * 5 / 2);
    }

    #[test]
    fn test_all_play_with_tie() {
        let records = all_play_week(&[100.0, 90.0, 90.0, 70.0]);
        assert_eq!(
            records[1],
            AllPlayRecord {
                wins: 1,
                losses: 1,
                ties: 1
            }
        );
        assert_eq!(records[0].wins, 3);
        assert_eq!(records[3].losses, 3);
        assert!(records.iter().all(|r| r.games() == 3));
    }

    #[test]
    fn test_all_play_accumulates() {
        let mut season = AllPlayRecord::default();
        season += AllPlayRecord {
            wins: 2,
            losses: 1,
            ties: 0,
        };
        season += AllPlayRecord {
            wins: 0,
            losses: 2,
            ties: 1,
        };
        assert_eq!(season.games(), 6);
        assert!((season.win_pct() - 2.5 / 6.0).abs() < 1e-12);
        assert_eq!(AllPlayRecord::default().win_pct(), 0.0);
    }
}
