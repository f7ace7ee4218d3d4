use thiserror::Error;

/// Errors raised when league input or configuration is malformed.
///
/// Structural problems are returned immediately. Schedule search exhaustion
/// is not a fault: it is reported as the reason of an empty simulation
/// result rather than propagated with `?`.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LeagueError {
    #[error("league size must be even and at least 2 (got {teams})")]
    InvalidLeagueSize { teams: usize },

    #[error("configured league has {configured} teams but the score table has {found}")]
    TeamCountMismatch { configured: usize, found: usize },

    #[error("beat probability {probability} for {team} in week {week} is outside [0, 1]")]
    InvalidProbability {
        team: String,
        week: u32,
        probability: f64,
    },

    #[error(
        "no schedule satisfies max_rematches={max_rematches} after {candidates_tried} candidates"
    )]
    ScheduleConstraintUnsatisfiable {
        max_rematches: usize,
        candidates_tried: usize,
    },

    #[error("score {score} for {team} in week {week} is not finite")]
    InvalidScore { team: String, week: u32, score: f64 },

    #[error("no score recorded for {team} in week {week}")]
    MissingScore { team: String, week: u32 },

    #[error("more than one score recorded for {team} in week {week}")]
    DuplicateScore { team: String, week: u32 },

    #[error("rows for week {week} disagree on playoff/consolation flags")]
    InconsistentWeekPhase { week: u32 },

    #[error("{team} has unknown or inconsistent opponent {opponent:?} in week {week}")]
    UnknownOpponent {
        team: String,
        week: u32,
        opponent: Option<String>,
    },

    #[error("invalid config: {field} {reason}")]
    InvalidConfig { field: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, LeagueError>;
