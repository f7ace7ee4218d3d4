use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::{validate_league_size, LeagueConfig};
use crate::error::{LeagueError, Result};
use crate::validator::ScheduleValidator;

/// Two teams (by index) meeting in one week.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pairing {
    pub home: usize,
    pub away: usize,
}

impl Pairing {
    pub fn new(home: usize, away: usize) -> Self {
        Pairing { home, away }
    }

    pub fn teams(&self) -> [usize; 2] {
        [self.home, self.away]
    }

    /// The other side of the pairing, if `team` plays in it.
    pub fn opponent_of(&self, team: usize) -> Option<usize> {
        if self.home == team {
            Some(self.away)
        } else if self.away == team {
            Some(self.home)
        } else {
            None
        }
    }
}

/// Pairings for every week of a season.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Schedule {
    num_teams: usize,
    weeks: Vec<Vec<Pairing>>,
}

impl Schedule {
    pub fn new(num_teams: usize, weeks: Vec<Vec<Pairing>>) -> Self {
        Schedule { num_teams, weeks }
    }

    pub fn num_teams(&self) -> usize {
        self.num_teams
    }

    pub fn week_count(&self) -> usize {
        self.weeks.len()
    }

    pub fn weeks(&self) -> &[Vec<Pairing>] {
        &self.weeks
    }

    pub fn opponent(&self, week: usize, team: usize) -> Option<usize> {
        self.weeks
            .get(week)?
            .iter()
            .find_map(|pairing| pairing.opponent_of(team))
    }

    /// meetings[a][b] = number of weeks a and b are paired. Self pairings and
    /// out-of-range teams are ignored.
    pub fn meeting_counts(&self) -> Vec<Vec<usize>> {
        let n = self.num_teams;
        let mut meetings = vec![vec![0usize; n]; n];
        for pairing in self.weeks.iter().flatten() {
            let (a, b) = (pairing.home, pairing.away);
            if a != b && a < n && b < n {
                meetings[a][b] += 1;
                meetings[b][a] += 1;
            }
        }
        meetings
    }
}

/// One full round robin for `n` teams (n even) by the circle method.
///
/// Team 0 stays fixed while teams 1..n rotate one position per round, giving
/// n - 1 rounds in which every pair meets exactly once.
pub fn circle_rounds(n: usize) -> Vec<Vec<Pairing>> {
    if n < 2 {
        return Vec::new();
    }
    let mut ring: Vec<usize> = (1..n).collect();
    (0..n - 1)
        .map(|_| {
            let mut round = Vec::with_capacity(n / 2);
            round.push(Pairing::new(0, ring[0]));
            for i in 1..n / 2 {
                round.push(Pairing::new(ring[i], ring[n - 1 - i]));
            }
            ring.rotate_right(1);
            round
        })
        .collect()
}

/// Cooperative cancellation signal for long-running searches.
///
/// Clones share the same flag, so a caller can keep one copy and cancel a
/// search running elsewhere. An optional deadline cancels on its own.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        CancelToken {
            flag: Arc::new(AtomicBool::new(false)),
            deadline: Instant::now().checked_add(timeout),
        }
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
            || self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }
}

/// How the enumerator produces candidates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchStrategy {
    /// Relabelled, round-shuffled circle-method schedules
    Circle,
    /// Greedy least-met-opponent matching with random tie-breaks
    RandomSearch,
}

/// Lazy, finite sequence of candidate schedules.
///
/// Candidate 0 is the canonical circle schedule. Later candidates come from a
/// `ChaCha8Rng` seeded at construction, so the same seed replays the same
/// sequence. Iteration ends after `search_budget` candidates or once the
/// cancel token fires; the token is checked once per candidate.
pub struct ScheduleEnumerator {
    num_teams: usize,
    num_weeks: usize,
    budget: usize,
    produced: usize,
    strategy: SearchStrategy,
    rounds: Vec<Vec<Pairing>>,
    rng: ChaCha8Rng,
    cancel: CancelToken,
    cancelled: bool,
}

impl ScheduleEnumerator {
    /// # Errors
    ///
    /// `InvalidLeagueSize` for odd or degenerate `num_teams`, `InvalidConfig`
    /// for a zero-week season.
    pub fn new(
        num_teams: usize,
        num_weeks: usize,
        config: &LeagueConfig,
        seed: u64,
        cancel: CancelToken,
    ) -> Result<Self> {
        validate_league_size(num_teams)?;
        if num_weeks == 0 {
            return Err(LeagueError::InvalidConfig {
                field: "season_weeks",
                reason: "must be at least 1".to_string(),
            });
        }

        let rounds = circle_rounds(num_teams);
        let validator = ScheduleValidator::from_config(config).for_league_size(num_teams);
        let canonical = Schedule::new(num_teams, cycle_rounds(&rounds, num_weeks, None));
        let strategy = if validator.is_valid(&canonical) {
            SearchStrategy::Circle
        } else {
            log::debug!(
                "circle schedule for {} teams over {} weeks breaks league rules, falling back to randomized search",
                num_teams,
                num_weeks
            );
            SearchStrategy::RandomSearch
        };

        Ok(ScheduleEnumerator {
            num_teams,
            num_weeks,
            budget: config.search_budget,
            produced: 0,
            strategy,
            rounds,
            rng: ChaCha8Rng::seed_from_u64(seed),
            cancel,
            cancelled: false,
        })
    }

    pub fn strategy(&self) -> SearchStrategy {
        self.strategy
    }

    /// Candidates handed out so far.
    pub fn candidates_tried(&self) -> usize {
        self.produced
    }

    /// Whether iteration stopped because the cancel token fired.
    pub fn was_cancelled(&self) -> bool {
        self.cancelled
    }

    fn circle_candidate(&mut self) -> Schedule {
        if self.produced == 0 {
            return Schedule::new(
                self.num_teams,
                cycle_rounds(&self.rounds, self.num_weeks, None),
            );
        }

        let mut labels: Vec<usize> = (0..self.num_teams).collect();
        labels.shuffle(&mut self.rng);
        let weeks = cycle_rounds(&self.rounds, self.num_weeks, Some(&mut self.rng))
            .into_iter()
            .map(|round| {
                round
                    .into_iter()
                    .map(|p| Pairing::new(labels[p.home], labels[p.away]))
                    .collect()
            })
            .collect();
        Schedule::new(self.num_teams, weeks)
    }

    fn random_candidate(&mut self) -> Schedule {
        let n = self.num_teams;
        let mut meetings = vec![vec![0usize; n]; n];
        let mut weeks = Vec::with_capacity(self.num_weeks);

        for _ in 0..self.num_weeks {
            let mut pool: Vec<usize> = (0..n).collect();
            pool.shuffle(&mut self.rng);
            let mut round = Vec::with_capacity(n / 2);

            while let Some(team) = pool.pop() {
                // Shuffled pool order breaks ties between equally-met opponents
                let Some((pos, _)) = pool
                    .iter()
                    .enumerate()
                    .min_by_key(|&(_, &other)| meetings[team][other])
                else {
                    break;
                };
                let partner = pool.swap_remove(pos);
                meetings[team][partner] += 1;
                meetings[partner][team] += 1;
                round.push(Pairing::new(team, partner));
            }
            weeks.push(round);
        }

        Schedule::new(n, weeks)
    }
}

impl Iterator for ScheduleEnumerator {
    type Item = Schedule;

    fn next(&mut self) -> Option<Schedule> {
        if self.produced >= self.budget || self.cancelled {
            return None;
        }
        if self.cancel.is_cancelled() {
            log::debug!(
                "schedule enumeration cancelled after {} candidates",
                self.produced
            );
            self.cancelled = true;
            return None;
        }

        let schedule = match self.strategy {
            SearchStrategy::Circle => self.circle_candidate(),
            SearchStrategy::RandomSearch => self.random_candidate(),
        };
        self.produced += 1;
        Some(schedule)
    }
}

/// Repeat the round robin until `weeks` weeks are filled. With an rng, the
/// round order is reshuffled for every pass through the rounds.
fn cycle_rounds(
    rounds: &[Vec<Pairing>],
    weeks: usize,
    mut rng: Option<&mut ChaCha8Rng>,
) -> Vec<Vec<Pairing>> {
    let mut order: Vec<usize> = (0..rounds.len()).collect();
    let mut schedule = Vec::with_capacity(weeks);
    while schedule.len() < weeks {
        if let Some(rng) = rng.as_deref_mut() {
            order.shuffle(rng);
        }
        for &round in &order {
            if schedule.len() == weeks {
                break;
            }
            schedule.push(rounds[round].clone());
        }
    }
    schedule
}
