use criterion::{black_box, criterion_group, criterion_main, Criterion};
use league_core::record_distribution::{compute_distributions, win_distribution};
use league_core::schedule::{circle_rounds, CancelToken};
use league_core::score_matrix::{ScoreMatrix, ScoreRow};
use league_core::simulation::{
    compute_playoff_odds, compute_simulated_standings, enumerate_valid_schedules,
};
use league_core::LeagueConfig;

/// A league playing the circle schedule, with spread-out deterministic scores.
fn create_league(teams: usize, weeks: usize) -> ScoreMatrix {
    let rounds = circle_rounds(teams);
    let mut rows = Vec::with_capacity(teams * weeks);

    for week in 0..weeks {
        for pairing in &rounds[week % rounds.len()] {
            for (team, opp) in [(pairing.home, pairing.away), (pairing.away, pairing.home)] {
                let score = 80.0 + ((team * 37 + week * 11) % 60) as f64 + team as f64 * 0.13;
                rows.push(ScoreRow::regular(
                    &format!("Team{}", team),
                    week as u32 + 1,
                    score,
                    Some(&format!("Team{}", opp)),
                ));
            }
        }
    }

    ScoreMatrix::from_rows(&rows).expect("generated table is rectangular")
}

fn bench_win_distribution(c: &mut Criterion) {
    let weekly: Vec<f64> = (0..17).map(|w| (w % 10) as f64 / 9.0).collect();

    c.bench_function("win_distribution_17_weeks", |b| {
        b.iter(|| win_distribution(black_box(&weekly)))
    });
}

fn bench_record_distributions(c: &mut Criterion) {
    let matrix = create_league(12, 14);
    let config = LeagueConfig::new(12, 14);

    c.bench_function("record_distributions_12_teams", |b| {
        b.iter(|| compute_distributions(black_box(&matrix), black_box(&config)))
    });
}

fn bench_schedule_enumeration(c: &mut Criterion) {
    let config = LeagueConfig::new(12, 14);

    c.bench_function("enumerate_100_valid_schedules_12_teams", |b| {
        b.iter(|| {
            enumerate_valid_schedules(12, 14, black_box(&config), 42, CancelToken::new())
                .map(|schedules| schedules.take(100).count())
        })
    });
}

fn bench_monte_carlo(c: &mut Criterion) {
    let matrix = create_league(12, 14);
    let config = LeagueConfig::new(12, 14);

    c.bench_function("simulated_standings_single", |b| {
        b.iter(|| compute_simulated_standings(black_box(&matrix), &config, 42))
    });

    c.bench_function("playoff_odds_1000_sims", |b| {
        b.iter(|| compute_playoff_odds(black_box(&matrix), &config, 1000, 42))
    });
}

criterion_group!(
    benches,
    bench_win_distribution,
    bench_record_distributions,
    bench_schedule_enumeration,
    bench_monte_carlo,
);
criterion_main!(benches);
