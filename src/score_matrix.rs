use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::config::LeagueConfig;
use crate::error::{LeagueError, Result};
use crate::matchup::{Matchup, Week};
use crate::schedule::{Pairing, Schedule};
use crate::team::Team;

/// One row of the score table handed over by the dashboard: a team's
/// realized score in one week.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreRow {
    pub team: String,
    pub week: u32,
    pub score: f64,
    #[serde(default)]
    pub is_playoffs: bool,
    #[serde(default)]
    pub is_consolation: bool,
    #[serde(default)]
    pub opponent: Option<String>,
}

impl ScoreRow {
    pub fn regular(team: &str, week: u32, score: f64, opponent: Option<&str>) -> Self {
        ScoreRow {
            team: team.to_string(),
            week,
            score,
            is_playoffs: false,
            is_consolation: false,
            opponent: opponent.map(str::to_string),
        }
    }
}

/// Read-only per-team, per-week realized scores.
///
/// Teams are sorted by name and weeks by number, so team and week indices are
/// stable for the lifetime of the matrix. Every (team, week) cell is filled.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoreMatrix {
    teams: Vec<Team>,
    weeks: Vec<Week>,
    /// scores[team][week]
    scores: Vec<Vec<f64>>,
    /// opponents[team][week]
    opponents: Vec<Vec<Option<usize>>>,
}

impl ScoreMatrix {
    /// Build the matrix from a rectangular score table.
    ///
    /// # Errors
    ///
    /// Fails on non-finite scores, missing or duplicate (team, week) cells,
    /// weeks whose rows disagree on phase flags, and opponents that are not
    /// teams of the league.
    pub fn from_rows(rows: &[ScoreRow]) -> Result<Self> {
        let team_names: Vec<String> = rows
            .iter()
            .map(|r| r.team.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let team_index: HashMap<&str, usize> = team_names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_str(), i))
            .collect();

        let mut week_flags: BTreeMap<u32, (bool, bool)> = BTreeMap::new();
        for row in rows {
            if !row.score.is_finite() {
                return Err(LeagueError::InvalidScore {
                    team: row.team.clone(),
                    week: row.week,
                    score: row.score,
                });
            }
            let flags = (row.is_playoffs, row.is_consolation);
            match week_flags.get(&row.week) {
                Some(existing) if *existing != flags => {
                    return Err(LeagueError::InconsistentWeekPhase { week: row.week });
                }
                Some(_) => {}
                None => {
                    week_flags.insert(row.week, flags);
                }
            }
        }

        let weeks: Vec<Week> = week_flags
            .iter()
            .map(|(&number, &(is_playoffs, is_consolation))| Week {
                number,
                is_playoffs,
                is_consolation,
            })
            .collect();
        let week_index: HashMap<u32, usize> =
            weeks.iter().enumerate().map(|(i, w)| (w.number, i)).collect();

        let mut cells: Vec<Vec<Option<f64>>> = vec![vec![None; weeks.len()]; team_names.len()];
        let mut opponents: Vec<Vec<Option<usize>>> =
            vec![vec![None; weeks.len()]; team_names.len()];

        for row in rows {
            let t = team_index[row.team.as_str()];
            let w = week_index[&row.week];
            if cells[t][w].is_some() {
                return Err(LeagueError::DuplicateScore {
                    team: row.team.clone(),
                    week: row.week,
                });
            }
            cells[t][w] = Some(row.score);

            if let Some(opponent) = &row.opponent {
                match team_index.get(opponent.as_str()) {
                    Some(&o) => opponents[t][w] = Some(o),
                    None => {
                        return Err(LeagueError::UnknownOpponent {
                            team: row.team.clone(),
                            week: row.week,
                            opponent: Some(opponent.clone()),
                        });
                    }
                }
            }
        }

        let mut scores = Vec::with_capacity(team_names.len());
        for (t, row) in cells.into_iter().enumerate() {
            let mut filled = Vec::with_capacity(row.len());
            for (w, cell) in row.into_iter().enumerate() {
                match cell {
                    Some(score) => filled.push(score),
                    None => {
                        return Err(LeagueError::MissingScore {
                            team: team_names[t].clone(),
                            week: weeks[w].number,
                        });
                    }
                }
            }
            scores.push(filled);
        }

        let regular: Vec<usize> = (0..weeks.len())
            .filter(|&w| weeks[w].is_regular_season())
            .collect();
        let teams = team_names
            .into_iter()
            .enumerate()
            .map(|(t, name)| Team::new(name, regular.iter().map(|&w| scores[t][w]).collect()))
            .collect();

        Ok(ScoreMatrix {
            teams,
            weeks,
            scores,
            opponents,
        })
    }

    /// Check that the table matches the configured league.
    pub fn check_league(&self, config: &LeagueConfig) -> Result<()> {
        config.validate()?;
        if self.teams.len() != config.num_teams {
            return Err(LeagueError::TeamCountMismatch {
                configured: config.num_teams,
                found: self.teams.len(),
            });
        }
        Ok(())
    }

    pub fn team_count(&self) -> usize {
        self.teams.len()
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn team_name(&self, team: usize) -> &str {
        &self.teams[team].name
    }

    pub fn team_index(&self, name: &str) -> Option<usize> {
        self.teams.binary_search_by(|t| t.name.as_str().cmp(name)).ok()
    }

    pub fn weeks(&self) -> &[Week] {
        &self.weeks
    }

    /// Realized score of `team` in the week at `week` (a week index, not a week number).
    pub fn score(&self, team: usize, week: usize) -> f64 {
        self.scores[team][week]
    }

    /// Indices of the regular-season weeks that count toward a season of
    /// `season_weeks`, in week order.
    pub fn regular_season_weeks(&self, season_weeks: usize) -> Vec<usize> {
        (0..self.weeks.len())
            .filter(|&w| self.weeks[w].is_regular_season())
            .take(season_weeks)
            .collect()
    }

    /// Every team's score for one week, in team order.
    pub fn week_scores(&self, week: usize) -> Vec<(&str, f64)> {
        self.teams
            .iter()
            .enumerate()
            .map(|(t, team)| (team.name.as_str(), self.scores[t][week]))
            .collect()
    }

    /// The pairings actually played in one week, from the opponent column.
    ///
    /// # Errors
    ///
    /// `UnknownOpponent` when a team has no opponent, plays itself, or its
    /// opponent lists somebody else.
    pub fn realized_pairings(&self, week: usize) -> Result<Vec<Pairing>> {
        let number = self.weeks[week].number;
        let mut pairings = Vec::with_capacity(self.teams.len() / 2);
        for t in 0..self.teams.len() {
            let opponent = self.opponents[t][week];
            let inconsistent = || LeagueError::UnknownOpponent {
                team: self.teams[t].name.clone(),
                week: number,
                opponent: opponent.map(|o| self.teams[o].name.clone()),
            };
            let o = opponent.ok_or_else(inconsistent)?;
            if o == t || self.opponents[o][week] != Some(t) {
                return Err(inconsistent());
            }
            if t < o {
                pairings.push(Pairing::new(t, o));
            }
        }
        Ok(pairings)
    }

    /// Head-to-head games of one week with realized scores.
    pub fn matchups(&self, week: usize) -> Result<Vec<Matchup>> {
        let number = self.weeks[week].number;
        Ok(self
            .realized_pairings(week)?
            .into_iter()
            .map(|p| Matchup {
                week: number,
                team_a: self.teams[p.home].name.clone(),
                team_b: self.teams[p.away].name.clone(),
                score_a: self.scores[p.home][week],
                score_b: self.scores[p.away][week],
            })
            .collect())
    }

    /// The league's real schedule over the given week indices.
    pub fn realized_schedule(&self, weeks: &[usize]) -> Result<Schedule> {
        let pairings = weeks
            .iter()
            .map(|&w| self.realized_pairings(w))
            .collect::<Result<Vec<_>>>()?;
        Ok(Schedule::new(self.teams.len(), pairings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<ScoreRow> {
        vec![
            ScoreRow::regular("B", 1, 90.0, Some("A")),
            ScoreRow::regular("A", 1, 100.0, Some("B")),
            ScoreRow::regular("A", 2, 80.0, Some("B")),
            ScoreRow::regular("B", 2, 85.0, Some("A")),
            ScoreRow {
                team: "A".to_string(),
                week: 3,
                score: 120.0,
                is_playoffs: true,
                is_consolation: false,
                opponent: Some("B".to_string()),
            },
            ScoreRow {
                team: "B".to_string(),
                week: 3,
                score: 110.0,
                is_playoffs: true,
                is_consolation: false,
                opponent: Some("A".to_string()),
            },
        ]
    }

    #[test]
    fn test_from_rows_sorts_and_fills() {
        let matrix = ScoreMatrix::from_rows(&rows()).expect("valid table");
        assert_eq!(matrix.team_count(), 2);
        assert_eq!(matrix.team_name(0), "A");
        assert_eq!(matrix.team_index("B"), Some(1));
        assert_eq!(matrix.weeks().len(), 3);
        assert_eq!(matrix.score(1, 1), 85.0);

        // Playoff week excluded from team statistics
        assert_eq!(matrix.teams()[0].scores, vec![100.0, 80.0]);
        assert_eq!(matrix.regular_season_weeks(14), vec![0, 1]);
        assert_eq!(matrix.regular_season_weeks(1), vec![0]);
    }

    #[test]
    fn test_matchups_from_opponent_column() {
        let matrix = ScoreMatrix::from_rows(&rows()).expect("valid table");
        let games = matrix.matchups(1).expect("consistent opponents");
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].winner(), Some("B"));

        let schedule = matrix
            .realized_schedule(&matrix.regular_season_weeks(14))
            .expect("consistent opponents");
        assert_eq!(schedule.week_count(), 2);
        assert_eq!(schedule.opponent(0, 0), Some(1));
    }

    #[test]
    fn test_missing_cell() {
        let mut table = rows();
        table.remove(0);
        let err = ScoreMatrix::from_rows(&table).unwrap_err();
        assert_eq!(
            err,
            LeagueError::MissingScore {
                team: "B".to_string(),
                week: 1
            }
        );
    }

    #[test]
    fn test_duplicate_cell() {
        let mut table = rows();
        table.push(ScoreRow::regular("A", 1, 70.0, Some("B")));
        assert!(matches!(
            ScoreMatrix::from_rows(&table),
            Err(LeagueError::DuplicateScore { week: 1, .. })
        ));
    }

    #[test]
    fn test_non_finite_score() {
        let mut table = rows();
        table[0].score = f64::NAN;
        assert!(matches!(
            ScoreMatrix::from_rows(&table),
            Err(LeagueError::InvalidScore { .. })
        ));
    }

    #[test]
    fn test_inconsistent_phase() {
        let mut table = rows();
        table[5].is_playoffs = false;
        assert_eq!(
            ScoreMatrix::from_rows(&table).unwrap_err(),
            LeagueError::InconsistentWeekPhase { week: 3 }
        );
    }

    #[test]
    fn test_unknown_opponent() {
        let mut table = rows();
        table[0].opponent = Some("Z".to_string());
        assert!(matches!(
            ScoreMatrix::from_rows(&table),
            Err(LeagueError::UnknownOpponent { .. })
        ));
    }

    #[test]
    fn test_missing_opponent_only_fails_schedule() {
        let mut table = rows();
        table[0].opponent = None;
        let matrix = ScoreMatrix::from_rows(&table).expect("opponent column is optional");
        assert!(matrix.matchups(0).is_err());
        assert!(matrix.matchups(1).is_ok());
    }

    #[test]
    fn test_team_count_checked_against_config() {
        let matrix = ScoreMatrix::from_rows(&rows()).expect("valid table");
        assert!(matrix.check_league(&LeagueConfig::new(2, 2)).is_ok());
        assert_eq!(
            matrix.check_league(&LeagueConfig::new(4, 2)).unwrap_err(),
            LeagueError::TeamCountMismatch {
                configured: 4,
                found: 2
            }
        );
    }
}
