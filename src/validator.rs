use crate::config::LeagueConfig;
use crate::schedule::Schedule;

/// A rule a candidate schedule breaks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScheduleViolation {
    WrongLeagueSize { expected: usize, found: usize },
    UnknownTeam { week: usize, team: usize },
    SelfPairing { week: usize, team: usize },
    DuplicateAppearance { week: usize, team: usize },
    MissingAppearance { week: usize, team: usize },
    TooManyRematches { team_a: usize, team_b: usize, meetings: usize },
    NeverMet { team_a: usize, team_b: usize },
}

/// Accepts or rejects schedules against the league's pairing rules.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduleValidator {
    num_teams: usize,
    max_rematches: usize,
    full_coverage_min_weeks: usize,
}

impl ScheduleValidator {
    pub fn new(num_teams: usize, max_rematches: usize, full_coverage_min_weeks: usize) -> Self {
        ScheduleValidator {
            num_teams,
            max_rematches,
            full_coverage_min_weeks,
        }
    }

    pub fn from_config(config: &LeagueConfig) -> Self {
        Self::new(
            config.num_teams,
            config.max_rematches,
            config.full_coverage_min_weeks,
        )
    }

    /// Same rules, different league size.
    pub fn for_league_size(&self, num_teams: usize) -> Self {
        ScheduleValidator {
            num_teams,
            ..self.clone()
        }
    }

    pub fn max_rematches(&self) -> usize {
        self.max_rematches
    }

    /// Whether every pair must meet at least once over `weeks` weeks.
    ///
    /// With fewer than N - 1 weeks a team cannot face all N - 1 opponents, so
    /// coverage is not required no matter how long the season threshold is.
    pub fn requires_full_coverage(&self, weeks: usize) -> bool {
        weeks >= self.full_coverage_min_weeks && weeks + 1 >= self.num_teams
    }

    pub fn is_valid(&self, schedule: &Schedule) -> bool {
        self.violations(schedule).is_empty()
    }

    /// Every rule the schedule breaks, in week order then pair order.
    pub fn violations(&self, schedule: &Schedule) -> Vec<ScheduleViolation> {
        let n = self.num_teams;
        if schedule.num_teams() != n {
            return vec![ScheduleViolation::WrongLeagueSize {
                expected: n,
                found: schedule.num_teams(),
            }];
        }

        let mut violations = Vec::new();
        for (week, pairings) in schedule.weeks().iter().enumerate() {
            let mut appearances = vec![0usize; n];
            for pairing in pairings {
                if pairing.home == pairing.away {
                    violations.push(ScheduleViolation::SelfPairing {
                        week,
                        team: pairing.home,
                    });
                }
                for team in pairing.teams() {
                    match appearances.get_mut(team) {
                        Some(count) => *count += 1,
                        None => violations.push(ScheduleViolation::UnknownTeam { week, team }),
                    }
                }
            }
            for (team, &count) in appearances.iter().enumerate() {
                match count {
                    0 => violations.push(ScheduleViolation::MissingAppearance { week, team }),
                    1 => {}
                    _ => violations.push(ScheduleViolation::DuplicateAppearance { week, team }),
                }
            }
        }

        let meetings = schedule.meeting_counts();
        let coverage = self.requires_full_coverage(schedule.week_count());
        for team_a in 0..n {
            for team_b in (team_a + 1)..n {
                let count = meetings[team_a][team_b];
                if count > self.max_rematches {
                    violations.push(ScheduleViolation::TooManyRematches {
                        team_a,
                        team_b,
                        meetings: count,
                    });
                }
                if coverage && count == 0 {
                    violations.push(ScheduleViolation::NeverMet { team_a, team_b });
                }
            }
        }

        violations
    }
}
