use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use std::collections::HashMap;

use crate::config::LeagueConfig;
use crate::error::{LeagueError, Result};
use crate::perturbation::{resolve_standings, ScorePerturbationEngine, TweakedScores};
use crate::record_distribution::{compute_distributions, RecordDistribution};
use crate::schedule::{CancelToken, Schedule, ScheduleEnumerator};
use crate::score_matrix::ScoreMatrix;
use crate::seeding::SimulatedStanding;
use crate::validator::{ScheduleValidator, ScheduleViolation};
use crate::win_counter::{all_play_week, AllPlayRecord};

/// Record distribution of every team over the configured regular season.
pub fn compute_record_distribution(
    scores: &ScoreMatrix,
    config: &LeagueConfig,
) -> Result<HashMap<String, RecordDistribution>> {
    compute_distributions(scores, config)
}

/// "What-if" standings: realized scores perturbed with `rng_seed`, replayed
/// over the league's real schedule. Ordered by seed.
pub fn compute_simulated_standings(
    scores: &ScoreMatrix,
    config: &LeagueConfig,
    rng_seed: u64,
) -> Result<Vec<SimulatedStanding>> {
    scores.check_league(config)?;
    let weeks = scores.regular_season_weeks(config.season_weeks);
    let schedule = scores.realized_schedule(&weeks)?;
    let tweaked = ScorePerturbationEngine::from_config(config).perturb(scores, &weeks, rng_seed);
    Ok(resolve_standings(scores, &schedule, &tweaked))
}

/// Schedules for `num_teams` over `num_weeks` that pass the league's rules.
///
/// Lazy: candidates are generated and validated one at a time, and the
/// sequence ends when the search budget runs out or `cancel` fires.
pub fn enumerate_valid_schedules(
    num_teams: usize,
    num_weeks: usize,
    config: &LeagueConfig,
    seed: u64,
    cancel: CancelToken,
) -> Result<impl Iterator<Item = Schedule>> {
    let validator = ScheduleValidator::from_config(config).for_league_size(num_teams);
    let enumerator = ScheduleEnumerator::new(num_teams, num_weeks, config, seed, cancel)?;
    Ok(enumerator.filter(move |schedule| validator.is_valid(schedule)))
}

/// Where a simulation run takes its schedule from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScheduleSource {
    /// The opponent column of the score table
    Realized,
    /// The first valid schedule from a seeded enumerator
    Enumerated { seed: u64 },
}

/// Phases of a simulation run, in order. `Perturbed` is skipped when the
/// run has no perturbation seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimulationPhase {
    Configured,
    SchedulesEnumerated,
    Validated,
    ProbabilitiesComputed,
    Perturbed,
    Seeded,
    Terminal,
}

/// Why a run ended without a result.
#[derive(Clone, Debug, PartialEq)]
pub enum EmptyReason {
    /// No candidate passed validation within the search budget
    SearchExhausted(LeagueError),
    /// The cancel token fired before a valid schedule was found
    Cancelled { candidates_tried: usize },
    /// The realized schedule breaks league rules
    InvalidSchedule(Vec<ScheduleViolation>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct SimulationReport {
    pub schedule: Schedule,
    pub distributions: HashMap<String, RecordDistribution>,
    /// Ordered by seed
    pub standings: Vec<SimulatedStanding>,
    pub perturbed: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SimulationResult {
    Complete(SimulationReport),
    Empty { reason: EmptyReason },
}

impl SimulationResult {
    pub fn report(&self) -> Option<&SimulationReport> {
        match self {
            SimulationResult::Complete(report) => Some(report),
            SimulationResult::Empty { .. } => None,
        }
    }
}

/// One simulation request over a read-only score matrix.
///
/// Structural problems (league size, malformed scores, out-of-range
/// probabilities) are returned as `Err`. Failing to find a valid schedule is
/// a legitimate outcome and ends the run with `SimulationResult::Empty`.
pub struct SimulationRun<'a> {
    matrix: &'a ScoreMatrix,
    config: &'a LeagueConfig,
    source: ScheduleSource,
    perturbation_seed: Option<u64>,
    cancel: CancelToken,
    phase: SimulationPhase,
}

impl<'a> SimulationRun<'a> {
    pub fn new(matrix: &'a ScoreMatrix, config: &'a LeagueConfig) -> Self {
        SimulationRun {
            matrix,
            config,
            source: ScheduleSource::Realized,
            perturbation_seed: None,
            cancel: CancelToken::new(),
            phase: SimulationPhase::Configured,
        }
    }

    pub fn with_schedule_source(mut self, source: ScheduleSource) -> Self {
        self.source = source;
        self
    }

    pub fn with_perturbation(mut self, seed: u64) -> Self {
        self.perturbation_seed = Some(seed);
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn phase(&self) -> SimulationPhase {
        self.phase
    }

    pub fn run(&mut self) -> Result<SimulationResult> {
        self.matrix.check_league(self.config)?;
        let weeks = self.matrix.regular_season_weeks(self.config.season_weeks);
        let validator = ScheduleValidator::from_config(self.config);

        let schedule = match self.source {
            ScheduleSource::Realized => {
                let schedule = self.matrix.realized_schedule(&weeks)?;
                self.advance(SimulationPhase::SchedulesEnumerated);
                let violations = validator.violations(&schedule);
                if !violations.is_empty() {
                    return Ok(self.empty(EmptyReason::InvalidSchedule(violations)));
                }
                schedule
            }
            ScheduleSource::Enumerated { seed } => {
                let mut candidates = ScheduleEnumerator::new(
                    self.config.num_teams,
                    weeks.len(),
                    self.config,
                    seed,
                    self.cancel.clone(),
                )?;
                self.advance(SimulationPhase::SchedulesEnumerated);
                match candidates.by_ref().find(|s| validator.is_valid(s)) {
                    Some(schedule) => schedule,
                    None if candidates.was_cancelled() => {
                        return Ok(self.empty(EmptyReason::Cancelled {
                            candidates_tried: candidates.candidates_tried(),
                        }));
                    }
                    None => {
                        return Ok(self.empty(EmptyReason::SearchExhausted(
                            LeagueError::ScheduleConstraintUnsatisfiable {
                                max_rematches: self.config.max_rematches,
                                candidates_tried: candidates.candidates_tried(),
                            },
                        )));
                    }
                }
            }
        };
        self.advance(SimulationPhase::Validated);

        let distributions = compute_distributions(self.matrix, self.config)?;
        self.advance(SimulationPhase::ProbabilitiesComputed);

        let tweaked = match self.perturbation_seed {
            Some(seed) => {
                let tweaked = ScorePerturbationEngine::from_config(self.config)
                    .perturb(self.matrix, &weeks, seed);
                self.advance(SimulationPhase::Perturbed);
                tweaked
            }
            None => TweakedScores::realized(self.matrix, &weeks),
        };

        let standings = resolve_standings(self.matrix, &schedule, &tweaked);
        self.advance(SimulationPhase::Seeded);
        self.advance(SimulationPhase::Terminal);

        log::info!(
            "simulated {} teams over {} weeks ({:?} schedule, perturbed: {})",
            standings.len(),
            weeks.len(),
            self.source,
            self.perturbation_seed.is_some()
        );

        Ok(SimulationResult::Complete(SimulationReport {
            schedule,
            distributions,
            standings,
            perturbed: self.perturbation_seed.is_some(),
        }))
    }

    fn advance(&mut self, next: SimulationPhase) {
        log::debug!("simulation phase {:?} -> {:?}", self.phase, next);
        self.phase = next;
    }

    fn empty(&mut self, reason: EmptyReason) -> SimulationResult {
        log::info!("simulation ended without a result: {:?}", reason);
        self.advance(SimulationPhase::Terminal);
        SimulationResult::Empty { reason }
    }
}

/// How often a team finished inside the bye and playoff cutoffs across
/// perturbed simulations.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayoffOdds {
    pub team: String,
    pub bye_probability: f64,
    pub playoff_probability: f64,
    pub mean_seed: f64,
}

/// Run `n_simulations` perturbed seasons over the realized schedule.
///
/// Per-simulation seeds come from a `ChaCha8Rng` seeded with `seed`, so the
/// result does not depend on how rayon schedules the simulations.
pub fn compute_playoff_odds(
    scores: &ScoreMatrix,
    config: &LeagueConfig,
    n_simulations: usize,
    seed: u64,
) -> Result<HashMap<String, PlayoffOdds>> {
    scores.check_league(config)?;
    let weeks = scores.regular_season_weeks(config.season_weeks);
    let schedule = scores.realized_schedule(&weeks)?;
    let engine = ScorePerturbationEngine::from_config(config);

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let sim_seeds: Vec<u64> = (0..n_simulations).map(|_| rng.gen::<u64>()).collect();

    let results: Vec<Vec<SimulatedStanding>> = sim_seeds
        .par_iter()
        .map(|&sim_seed| {
            let tweaked = engine.perturb(scores, &weeks, sim_seed);
            resolve_standings(scores, &schedule, &tweaked)
        })
        .collect();

    // (byes, playoffs, seed sum) per team
    let mut tallies: HashMap<&str, (usize, usize, usize)> = HashMap::new();
    for standing in results.iter().flatten() {
        let tally = tallies.entry(standing.team.as_str()).or_insert((0, 0, 0));
        if standing.seed <= config.bye_cutoff {
            tally.0 += 1;
        }
        if standing.seed <= config.playoff_cutoff {
            tally.1 += 1;
        }
        tally.2 += standing.seed;
    }

    let runs = n_simulations.max(1) as f64;
    Ok(scores
        .teams()
        .iter()
        .map(|team| {
            let (byes, playoffs, seed_sum) = tallies
                .get(team.name.as_str())
                .copied()
                .unwrap_or((0, 0, 0));
            let odds = PlayoffOdds {
                team: team.name.clone(),
                bye_probability: byes as f64 / runs,
                playoff_probability: playoffs as f64 / runs,
                mean_seed: seed_sum as f64 / runs,
            };
            (team.name.clone(), odds)
        })
        .collect())
}

/// Actual results set against what the team's scoring deserved.
#[derive(Clone, Debug, PartialEq)]
pub struct LuckEntry {
    pub team: String,
    pub actual_wins: usize,
    pub actual_losses: usize,
    pub actual_ties: usize,
    pub expected_wins: f64,
    pub all_play: AllPlayRecord,
    /// actual_wins - expected_wins
    pub luck: f64,
}

/// Schedule luck of every team, luckiest first (team name breaks ties).
pub fn compute_luck_report(scores: &ScoreMatrix, config: &LeagueConfig) -> Result<Vec<LuckEntry>> {
    let distributions = compute_distributions(scores, config)?;
    let weeks = scores.regular_season_weeks(config.season_weeks);
    let schedule = scores.realized_schedule(&weeks)?;
    let actual = resolve_standings(scores, &schedule, &TweakedScores::realized(scores, &weeks));

    let mut all_play = vec![AllPlayRecord::default(); scores.team_count()];
    for &w in &weeks {
        let week_scores: Vec<f64> = (0..scores.team_count()).map(|t| scores.score(t, w)).collect();
        for (season, week) in all_play.iter_mut().zip(all_play_week(&week_scores)) {
            *season += week;
        }
    }

    let mut report: Vec<LuckEntry> = actual
        .into_iter()
        .filter_map(|standing| {
            let t = scores.team_index(&standing.team)?;
            let expected_wins = distributions.get(&standing.team)?.expected_wins;
            Some(LuckEntry {
                luck: standing.wins as f64 - expected_wins,
                team: standing.team,
                actual_wins: standing.wins,
                actual_losses: standing.losses,
                actual_ties: standing.ties,
                expected_wins,
                all_play: all_play[t],
            })
        })
        .collect();
    report.sort_by(|a, b| b.luck.total_cmp(&a.luck).then_with(|| a.team.cmp(&b.team)));
    Ok(report)
}
