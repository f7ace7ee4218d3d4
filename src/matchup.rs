use serde::{Deserialize, Serialize};

/// Season phase of a week, derived from the score table's phase flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeekPhase {
    RegularSeason,
    Playoffs,
    Consolation,
}

impl WeekPhase {
    /// Consolation wins over playoffs when a row carries both flags.
    pub fn from_flags(is_playoffs: bool, is_consolation: bool) -> Self {
        match (is_playoffs, is_consolation) {
            (_, true) => WeekPhase::Consolation,
            (true, false) => WeekPhase::Playoffs,
            (false, false) => WeekPhase::RegularSeason,
        }
    }
}

/// A week of the season.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Week {
    /// Ordinal position in the season as it appears in the score table
    pub number: u32,
    pub is_playoffs: bool,
    pub is_consolation: bool,
}

impl Week {
    pub fn phase(&self) -> WeekPhase {
        WeekPhase::from_flags(self.is_playoffs, self.is_consolation)
    }

    pub fn is_regular_season(&self) -> bool {
        self.phase() == WeekPhase::RegularSeason
    }
}

/// Result of a single head-to-head game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MatchupOutcome {
    Winner(String),
    Tie,
}

/// One head-to-head game with both sides' scores.
#[derive(Clone, Debug, PartialEq)]
pub struct Matchup {
    pub week: u32,
    pub team_a: String,
    pub team_b: String,
    pub score_a: f64,
    pub score_b: f64,
}

impl Matchup {
    /// Strict comparison; equal scores are a tie.
    pub fn outcome(&self) -> MatchupOutcome {
        if self.score_a > self.score_b {
            MatchupOutcome::Winner(self.team_a.clone())
        } else if self.score_b > self.score_a {
            MatchupOutcome::Winner(self.team_b.clone())
        } else {
            MatchupOutcome::Tie
        }
    }

    pub fn winner(&self) -> Option<&str> {
        if self.score_a > self.score_b {
            Some(&self.team_a)
        } else if self.score_b > self.score_a {
            Some(&self.team_b)
        } else {
            None
        }
    }
}
