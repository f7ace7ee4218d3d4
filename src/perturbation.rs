use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::LeagueConfig;
use crate::schedule::Schedule;
use crate::score_matrix::ScoreMatrix;
use crate::seeding::{assign_seeds, SimulatedStanding, TeamTotals};

/// Draws bounded random score deltas for "what-if" standings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScorePerturbationEngine {
    sigma_divisor: f64,
}

impl ScorePerturbationEngine {
    pub fn new(sigma_divisor: f64) -> Self {
        ScorePerturbationEngine { sigma_divisor }
    }

    pub fn from_config(config: &LeagueConfig) -> Self {
        Self::new(config.sigma_divisor)
    }

    /// Half-width of the draw interval for a team with the given weekly
    /// standard deviation. Undefined history means no perturbation.
    pub fn bound(&self, std_dev: Option<f64>) -> f64 {
        match std_dev {
            Some(sd) if sd.is_finite() && sd > 0.0 => sd / self.sigma_divisor,
            _ => 0.0,
        }
    }

    /// One delta drawn uniformly from [-bound, +bound]. A zero bound returns
    /// exactly 0.0 without touching the rng.
    pub fn draw<R: Rng>(&self, std_dev: Option<f64>, rng: &mut R) -> f64 {
        let bound = self.bound(std_dev);
        if bound > 0.0 {
            rng.gen_range(-bound..=bound)
        } else {
            0.0
        }
    }

    /// Perturb every team's score in the given weeks.
    ///
    /// Draws happen week by week, teams in name order, from a `ChaCha8Rng`
    /// seeded with `seed`, so the same inputs always give the same table.
    pub fn perturb(&self, matrix: &ScoreMatrix, weeks: &[usize], seed: u64) -> TweakedScores {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let teams = matrix.teams();

        let insufficient_history: Vec<String> = teams
            .iter()
            .filter(|team| team.std_dev.is_none())
            .map(|team| team.name.clone())
            .collect();
        for name in &insufficient_history {
            log::warn!(
                "insufficient history for {}: fewer than two weeks scored, perturbation is zero",
                name
            );
        }

        let mut deltas = vec![vec![0.0; weeks.len()]; teams.len()];
        for i in 0..weeks.len() {
            for (t, team) in teams.iter().enumerate() {
                deltas[t][i] = self.draw(team.std_dev, &mut rng);
            }
        }

        let scores = deltas
            .iter()
            .enumerate()
            .map(|(t, row)| {
                weeks
                    .iter()
                    .zip(row)
                    .map(|(&w, &delta)| matrix.score(t, w) + delta)
                    .collect()
            })
            .collect();

        TweakedScores {
            weeks: weeks.to_vec(),
            scores,
            deltas,
            insufficient_history,
        }
    }
}

/// Immutable table of perturbed scores.
///
/// Column `i` corresponds to the matrix week index `weeks()[i]` and to week
/// `i` of any schedule simulated against it.
#[derive(Clone, Debug, PartialEq)]
pub struct TweakedScores {
    weeks: Vec<usize>,
    /// scores[team][i]
    scores: Vec<Vec<f64>>,
    deltas: Vec<Vec<f64>>,
    insufficient_history: Vec<String>,
}

impl TweakedScores {
    /// The realized scores with no perturbation applied.
    pub fn realized(matrix: &ScoreMatrix, weeks: &[usize]) -> Self {
        let n = matrix.team_count();
        TweakedScores {
            weeks: weeks.to_vec(),
            scores: (0..n)
                .map(|t| weeks.iter().map(|&w| matrix.score(t, w)).collect())
                .collect(),
            deltas: vec![vec![0.0; weeks.len()]; n],
            insufficient_history: Vec::new(),
        }
    }

    pub fn weeks(&self) -> &[usize] {
        &self.weeks
    }

    pub fn score(&self, team: usize, week: usize) -> f64 {
        self.scores[team][week]
    }

    pub fn delta(&self, team: usize, week: usize) -> f64 {
        self.deltas[team][week]
    }

    /// Teams whose perturbation defaulted to zero for lack of history.
    pub fn insufficient_history(&self) -> &[String] {
        &self.insufficient_history
    }
}

/// Re-resolve every game of `schedule` on the tweaked scores and seed the
/// league.
///
/// A strictly higher tweaked score wins; equal scores are a tie and count as
/// neither a win nor a loss. Point totals sum each team's tweaked scores over
/// the simulated weeks.
pub fn resolve_standings(
    matrix: &ScoreMatrix,
    schedule: &Schedule,
    tweaked: &TweakedScores,
) -> Vec<SimulatedStanding> {
    let weeks = schedule.week_count().min(tweaked.weeks.len());
    let mut totals: Vec<TeamTotals> = matrix
        .teams()
        .iter()
        .map(|team| TeamTotals::new(team.name.clone()))
        .collect();

    for (t, total) in totals.iter_mut().enumerate() {
        total.points = tweaked.scores[t][..weeks].iter().sum();
    }

    for (week, pairings) in schedule.weeks()[..weeks].iter().enumerate() {
        for pairing in pairings {
            let (a, b) = (pairing.home, pairing.away);
            let (score_a, score_b) = (tweaked.score(a, week), tweaked.score(b, week));
            if score_a > score_b {
                totals[a].wins += 1;
                totals[b].losses += 1;
            } else if score_b > score_a {
                totals[b].wins += 1;
                totals[a].losses += 1;
            } else {
                totals[a].ties += 1;
                totals[b].ties += 1;
            }
        }
    }

    assign_seeds(totals)
}
