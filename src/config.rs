use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BYE_CUTOFF, DEFAULT_MAX_REMATCHES, DEFAULT_PLAYOFF_CUTOFF, DEFAULT_SEARCH_BUDGET,
    FULL_COVERAGE_MIN_WEEKS, PERTURBATION_SIGMA_DIVISOR,
};
use crate::error::{LeagueError, Result};

/// League rules the simulation engine runs under.
///
/// Only `num_teams` and `season_weeks` are required when deserializing;
/// every other field falls back to the league defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueConfig {
    /// Number of teams N
    pub num_teams: usize,

    /// Regular-season length W
    pub season_weeks: usize,

    #[serde(default = "LeagueConfig::default_max_rematches")]
    pub max_rematches: usize,

    /// Seeds 1..=bye_cutoff receive a bye
    #[serde(default = "LeagueConfig::default_bye_cutoff")]
    pub bye_cutoff: usize,

    /// Seeds 1..=playoff_cutoff make the playoffs
    #[serde(default = "LeagueConfig::default_playoff_cutoff")]
    pub playoff_cutoff: usize,

    #[serde(default = "LeagueConfig::default_full_coverage_min_weeks")]
    pub full_coverage_min_weeks: usize,

    #[serde(default = "LeagueConfig::default_search_budget")]
    pub search_budget: usize,

    #[serde(default = "LeagueConfig::default_sigma_divisor")]
    pub sigma_divisor: f64,
}

impl LeagueConfig {
    /// Config with default rules; seed cutoffs are capped at the league size.
    pub fn new(num_teams: usize, season_weeks: usize) -> Self {
        LeagueConfig {
            num_teams,
            season_weeks,
            max_rematches: Self::default_max_rematches(),
            bye_cutoff: Self::default_bye_cutoff().min(num_teams),
            playoff_cutoff: Self::default_playoff_cutoff().min(num_teams),
            full_coverage_min_weeks: Self::default_full_coverage_min_weeks(),
            search_budget: Self::default_search_budget(),
            sigma_divisor: Self::default_sigma_divisor(),
        }
    }

    /// Parse a config from JSON and validate it.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: LeagueConfig =
            serde_json::from_str(json).map_err(|e| LeagueError::InvalidConfig {
                field: "json",
                reason: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns `InvalidLeagueSize` for an odd or degenerate team count, and
    /// `InvalidConfig` when any other field violates its bounds.
    pub fn validate(&self) -> Result<()> {
        validate_league_size(self.num_teams)?;
        if self.season_weeks == 0 {
            return Err(LeagueError::InvalidConfig {
                field: "season_weeks",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.max_rematches == 0 {
            return Err(LeagueError::InvalidConfig {
                field: "max_rematches",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.bye_cutoff > self.playoff_cutoff {
            return Err(LeagueError::InvalidConfig {
                field: "bye_cutoff",
                reason: format!(
                    "{} exceeds playoff_cutoff {}",
                    self.bye_cutoff, self.playoff_cutoff
                ),
            });
        }
        if self.playoff_cutoff > self.num_teams {
            return Err(LeagueError::InvalidConfig {
                field: "playoff_cutoff",
                reason: format!("{} exceeds num_teams {}", self.playoff_cutoff, self.num_teams),
            });
        }
        if self.search_budget == 0 {
            return Err(LeagueError::InvalidConfig {
                field: "search_budget",
                reason: "must be at least 1".to_string(),
            });
        }
        if !(self.sigma_divisor.is_finite() && self.sigma_divisor > 0.0) {
            return Err(LeagueError::InvalidConfig {
                field: "sigma_divisor",
                reason: format!("must be positive (got {})", self.sigma_divisor),
            });
        }
        Ok(())
    }

    /// Opponents each team could face in a week, N - 1.
    pub fn opponents_per_week(&self) -> usize {
        self.num_teams.saturating_sub(1)
    }

    const fn default_max_rematches() -> usize {
        DEFAULT_MAX_REMATCHES
    }

    const fn default_bye_cutoff() -> usize {
        DEFAULT_BYE_CUTOFF
    }

    const fn default_playoff_cutoff() -> usize {
        DEFAULT_PLAYOFF_CUTOFF
    }

    const fn default_full_coverage_min_weeks() -> usize {
        FULL_COVERAGE_MIN_WEEKS
    }

    const fn default_search_budget() -> usize {
        DEFAULT_SEARCH_BUDGET
    }

    const fn default_sigma_divisor() -> f64 {
        PERTURBATION_SIGMA_DIVISOR
    }
}

/// A league needs an even number of teams, at least two, so every week is a
/// perfect matching.
pub fn validate_league_size(teams: usize) -> Result<()> {
    if teams < 2 || teams % 2 != 0 {
        return Err(LeagueError::InvalidLeagueSize { teams });
    }
    Ok(())
}
