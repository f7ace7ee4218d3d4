use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use std::collections::HashMap;
use std::time::Duration;

use crate::config::LeagueConfig;
use crate::constants::{
    DEFAULT_BYE_CUTOFF, DEFAULT_MAX_REMATCHES, DEFAULT_PLAYOFF_CUTOFF, DEFAULT_SEARCH_BUDGET,
    FULL_COVERAGE_MIN_WEEKS, PERTURBATION_SIGMA_DIVISOR,
};
use crate::error::LeagueError;
use crate::schedule::CancelToken;
use crate::score_matrix::{ScoreMatrix, ScoreRow};
use crate::simulation;
use crate::win_counter::teams_beaten_this_week;

/// (team, week, score, is_playoffs, is_consolation, opponent)
type PyScoreRow = (String, u32, f64, bool, bool, Option<String>);

impl From<LeagueError> for PyErr {
    fn from(err: LeagueError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

fn to_matrix(rows: Vec<PyScoreRow>) -> PyResult<ScoreMatrix> {
    let rows: Vec<ScoreRow> = rows
        .into_iter()
        .map(
            |(team, week, score, is_playoffs, is_consolation, opponent)| ScoreRow {
                team,
                week,
                score,
                is_playoffs,
                is_consolation,
                opponent,
            },
        )
        .collect();
    Ok(ScoreMatrix::from_rows(&rows)?)
}

/// League rules, exposed to Python as `LeagueConfig`.
#[pyclass(name = "LeagueConfig")]
#[derive(Clone)]
pub struct PyLeagueConfig {
    inner: LeagueConfig,
}

#[pymethods]
impl PyLeagueConfig {
    #[new]
    #[pyo3(signature = (
        num_teams,
        season_weeks,
        max_rematches = DEFAULT_MAX_REMATCHES,
        bye_cutoff = DEFAULT_BYE_CUTOFF,
        playoff_cutoff = DEFAULT_PLAYOFF_CUTOFF,
        full_coverage_min_weeks = FULL_COVERAGE_MIN_WEEKS,
        search_budget = DEFAULT_SEARCH_BUDGET,
        sigma_divisor = PERTURBATION_SIGMA_DIVISOR,
    ))]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        num_teams: usize,
        season_weeks: usize,
        max_rematches: usize,
        bye_cutoff: usize,
        playoff_cutoff: usize,
        full_coverage_min_weeks: usize,
        search_budget: usize,
        sigma_divisor: f64,
    ) -> PyResult<Self> {
        let inner = LeagueConfig {
            num_teams,
            season_weeks,
            max_rematches,
            bye_cutoff,
            playoff_cutoff,
            full_coverage_min_weeks,
            search_budget,
            sigma_divisor,
        };
        inner.validate()?;
        Ok(PyLeagueConfig { inner })
    }

    /// Parse a JSON config; omitted fields take the league defaults.
    #[staticmethod]
    pub fn from_json(json: &str) -> PyResult<Self> {
        Ok(PyLeagueConfig {
            inner: LeagueConfig::from_json_str(json)?,
        })
    }

    #[getter]
    pub fn num_teams(&self) -> usize {
        self.inner.num_teams
    }

    #[getter]
    pub fn season_weeks(&self) -> usize {
        self.inner.season_weeks
    }

    #[getter]
    pub fn max_rematches(&self) -> usize {
        self.inner.max_rematches
    }

    fn __repr__(&self) -> String {
        format!(
            "LeagueConfig({} teams, {} weeks, max_rematches={})",
            self.inner.num_teams, self.inner.season_weeks, self.inner.max_rematches
        )
    }
}

/// Record distribution per team: ([("wins-losses", probability), ...], expected_wins).
#[pyfunction]
fn record_distribution(
    py: Python<'_>,
    rows: Vec<PyScoreRow>,
    config: &PyLeagueConfig,
) -> PyResult<HashMap<String, (Vec<(String, f64)>, f64)>> {
    let matrix = to_matrix(rows)?;
    let config = config.inner.clone();
    let dists = py.allow_threads(|| simulation::compute_record_distribution(&matrix, &config))?;
    Ok(dists
        .into_iter()
        .map(|(team, d)| {
            let records = d.records();
            (team, (records, d.expected_wins))
        })
        .collect())
}

/// Perturbed standings ordered by seed: (team, wins, losses, ties, points, seed).
#[pyfunction]
fn simulated_standings(
    rows: Vec<PyScoreRow>,
    config: &PyLeagueConfig,
    seed: u64,
) -> PyResult<Vec<(String, usize, usize, usize, f64, usize)>> {
    let matrix = to_matrix(rows)?;
    let standings = simulation::compute_simulated_standings(&matrix, &config.inner, seed)?;
    Ok(standings
        .into_iter()
        .map(|s| (s.team, s.wins, s.losses, s.ties, s.points, s.seed))
        .collect())
}

/// Playoff odds per team: (bye_probability, playoff_probability, mean_seed).
#[pyfunction]
#[pyo3(signature = (rows, config, n_simulations, seed = None))]
fn playoff_odds(
    py: Python<'_>,
    rows: Vec<PyScoreRow>,
    config: &PyLeagueConfig,
    n_simulations: usize,
    seed: Option<u64>,
) -> PyResult<HashMap<String, (f64, f64, f64)>> {
    let matrix = to_matrix(rows)?;
    let config = config.inner.clone();
    let seed = seed.unwrap_or_else(rand::random);
    let odds = py.allow_threads(|| {
        simulation::compute_playoff_odds(&matrix, &config, n_simulations, seed)
    })?;
    Ok(odds
        .into_iter()
        .map(|(team, o)| (team, (o.bye_probability, o.playoff_probability, o.mean_seed)))
        .collect())
}

/// Luck report, luckiest first: (team, actual_wins, expected_wins, luck).
#[pyfunction]
fn luck_report(
    rows: Vec<PyScoreRow>,
    config: &PyLeagueConfig,
) -> PyResult<Vec<(String, usize, f64, f64)>> {
    let matrix = to_matrix(rows)?;
    let report = simulation::compute_luck_report(&matrix, &config.inner)?;
    Ok(report
        .into_iter()
        .map(|e| (e.team, e.actual_wins, e.expected_wins, e.luck))
        .collect())
}

/// Up to `limit` valid schedules as lists of weeks of (team, team) index pairs.
#[pyfunction]
#[pyo3(signature = (num_teams, num_weeks, config, limit, seed = 0, timeout_secs = None))]
fn valid_schedules(
    py: Python<'_>,
    num_teams: usize,
    num_weeks: usize,
    config: &PyLeagueConfig,
    limit: usize,
    seed: u64,
    timeout_secs: Option<f64>,
) -> PyResult<Vec<Vec<Vec<(usize, usize)>>>> {
    let cancel = match timeout_secs {
        Some(secs) if secs.is_finite() && secs >= 0.0 => {
            CancelToken::with_timeout(Duration::from_secs_f64(secs))
        }
        Some(secs) => {
            return Err(PyValueError::new_err(format!("invalid timeout: {}", secs)));
        }
        None => CancelToken::new(),
    };
    let config = config.inner.clone();
    let schedules = py.allow_threads(|| -> Result<Vec<_>, LeagueError> {
        Ok(
            simulation::enumerate_valid_schedules(num_teams, num_weeks, &config, seed, cancel)?
                .take(limit)
                .collect(),
        )
    })?;
    Ok(schedules
        .into_iter()
        .map(|schedule| {
            schedule
                .weeks()
                .iter()
                .map(|week| week.iter().map(|p| (p.home, p.away)).collect())
                .collect()
        })
        .collect())
}

/// Teams beaten by each team in one week of (team, score) pairs.
#[pyfunction]
fn teams_beaten(week: Vec<(String, f64)>) -> HashMap<String, usize> {
    let week: Vec<(&str, f64)> = week.iter().map(|(team, score)| (team.as_str(), *score)).collect();
    teams_beaten_this_week(&week)
}

/// Python module definition
#[pymodule]
fn league_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Classes
    m.add_class::<PyLeagueConfig>()?;

    // Simulation functions
    m.add_function(wrap_pyfunction!(record_distribution, m)?)?;
    m.add_function(wrap_pyfunction!(simulated_standings, m)?)?;
    m.add_function(wrap_pyfunction!(playoff_odds, m)?)?;
    m.add_function(wrap_pyfunction!(luck_report, m)?)?;
    m.add_function(wrap_pyfunction!(valid_schedules, m)?)?;
    m.add_function(wrap_pyfunction!(teams_beaten, m)?)?;

    // Constants
    m.add("DEFAULT_MAX_REMATCHES", DEFAULT_MAX_REMATCHES)?;
    m.add("DEFAULT_BYE_CUTOFF", DEFAULT_BYE_CUTOFF)?;
    m.add("DEFAULT_PLAYOFF_CUTOFF", DEFAULT_PLAYOFF_CUTOFF)?;
    m.add("PERTURBATION_SIGMA_DIVISOR", PERTURBATION_SIGMA_DIVISOR)?;

    Ok(())
}
