use std::cmp::Ordering;

/// A team's simulated season totals before seeding.
#[derive(Clone, Debug, PartialEq)]
pub struct TeamTotals {
    pub team: String,
    pub wins: usize,
    pub losses: usize,
    pub ties: usize,
    pub points: f64,
}

impl TeamTotals {
    pub fn new(team: String) -> Self {
        TeamTotals {
            team,
            wins: 0,
            losses: 0,
            ties: 0,
            points: 0.0,
        }
    }
}

/// A team's simulated finish with its playoff seed.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulatedStanding {
    pub team: String,
    pub wins: usize,
    pub losses: usize,
    pub ties: usize,
    pub points: f64,
    /// 1-based and unique within a league
    pub seed: usize,
}

/// Standings order: wins descending, then points descending, then team name
/// ascending. Total over any set of distinct team names.
pub fn standings_order(a: &TeamTotals, b: &TeamTotals) -> Ordering {
    b.wins
        .cmp(&a.wins)
        .then_with(|| b.points.total_cmp(&a.points))
        .then_with(|| a.team.cmp(&b.team))
}

/// Rank teams and hand out seeds 1..=N. Output is ordered by seed.
pub fn assign_seeds(mut totals: Vec<TeamTotals>) -> Vec<SimulatedStanding> {
    totals.sort_by(standings_order);
    totals
        .into_iter()
        .enumerate()
        .map(|(i, t)| SimulatedStanding {
            team: t.team,
            wins: t.wins,
            losses: t.losses,
            ties: t.ties,
            points: t.points,
            seed: i + 1,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals(team: &str, wins: usize, points: f64) -> TeamTotals {
        TeamTotals {
            wins,
            points,
            ..TeamTotals::new(team.to_string())
        }
    }

    #[test]
    fn test_wins_then_points() {
        let standings = assign_seeds(vec![
            totals("A", 8, 1500.0),
            totals("B", 9, 1400.0),
            totals("C", 8, 1550.0),
            totals("D", 3, 1700.0),
        ]);
        let order: Vec<&str> = standings.iter().map(|s| s.team.as_str()).collect();
        assert_eq!(order, vec!["B", "C", "A", "D"]);
        let seeds: Vec<usize> = standings.iter().map(|s| s.seed).collect();
        assert_eq!(seeds, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_exact_tie_broken_by_name() {
        let forward = assign_seeds(vec![totals("Zed", 7, 1234.5), totals("Amy", 7, 1234.5)]);
        let backward = assign_seeds(vec![totals("Amy", 7, 1234.5), totals("Zed", 7, 1234.5)]);
        assert_eq!(forward, backward);
        assert_eq!(forward[0].team, "Amy");
        assert_eq!(forward[1].seed, 2);
    }

    #[test]
    fn test_empty_league() {
        assert!(assign_seeds(Vec::new()).is_empty());
    }
}
