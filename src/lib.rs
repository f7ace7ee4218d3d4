//! League Core - season outcome simulation for fantasy leagues.
//!
//! Given realized weekly team scores, this library enumerates and validates
//! round-robin schedules, computes each team's distribution over final
//! records, and perturbs scores to produce "what-if" standings and playoff
//! odds. Python bindings are available behind the `python` feature.

pub mod config;
pub mod constants;
pub mod error;
pub mod matchup;
pub mod perturbation;
pub mod record_distribution;
pub mod schedule;
pub mod score_matrix;
pub mod seeding;
pub mod simulation;
pub mod team;
pub mod validator;
pub mod win_counter;

#[cfg(feature = "python")]
mod python;

pub use config::LeagueConfig;
pub use error::{LeagueError, Result};
pub use matchup::{Matchup, MatchupOutcome, Week, WeekPhase};
pub use perturbation::{resolve_standings, ScorePerturbationEngine, TweakedScores};
pub use record_distribution::{win_distribution, RecordDistribution};
pub use schedule::{CancelToken, Pairing, Schedule, ScheduleEnumerator, SearchStrategy};
pub use score_matrix::{ScoreMatrix, ScoreRow};
pub use seeding::{assign_seeds, SimulatedStanding, TeamTotals};
pub use simulation::{
    compute_luck_report, compute_playoff_odds, compute_record_distribution,
    compute_simulated_standings, enumerate_valid_schedules, EmptyReason, LuckEntry, PlayoffOdds,
    ScheduleSource, SimulationPhase, SimulationReport, SimulationResult, SimulationRun,
};
pub use team::Team;
pub use validator::{ScheduleValidator, ScheduleViolation};
pub use win_counter::{count_beaten, teams_beaten_this_week, AllPlayRecord};
