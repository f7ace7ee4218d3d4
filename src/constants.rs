/// Maximum number of times any pair of teams may meet in one season
pub const DEFAULT_MAX_REMATCHES: usize = 2;

/// Seasons at least this long must have every team face every other team
pub const FULL_COVERAGE_MIN_WEEKS: usize = 12;

/// Seeds that earn a first-round bye (seeds 1..=2)
pub const DEFAULT_BYE_CUTOFF: usize = 2;

/// Seeds that make the playoffs (seeds 1..=6)
pub const DEFAULT_PLAYOFF_CUTOFF: usize = 6;

/// Perturbations are drawn from [-sigma / divisor, +sigma / divisor]
pub const PERTURBATION_SIGMA_DIVISOR: f64 = 3.0;

/// Candidate schedules examined before a search gives up
pub const DEFAULT_SEARCH_BUDGET: usize = 256;

/// Tolerance used when checking that a distribution sums to one
pub const PROBABILITY_TOLERANCE: f64 = 1e-9;

/// Minimum number of weekly scores needed for a sample standard deviation
pub const MIN_HISTORY_WEEKS: usize = 2;
