//! End-to-end tests through the public entry points.

use league_core::{
    compute_record_distribution, compute_simulated_standings, enumerate_valid_schedules,
    teams_beaten_this_week, CancelToken, LeagueConfig, LeagueError, ScheduleValidator,
    ScoreMatrix, ScoreRow,
};

fn single_week_league() -> ScoreMatrix {
    let rows = vec![
        ScoreRow::regular("A", 1, 100.0, Some("D")),
        ScoreRow::regular("B", 1, 90.0, Some("C")),
        ScoreRow::regular("C", 1, 80.0, Some("B")),
        ScoreRow::regular("D", 1, 70.0, Some("A")),
    ];
    ScoreMatrix::from_rows(&rows).expect("valid table")
}

fn round(p: f64) -> f64 {
    (p * 100.0).round() / 100.0
}

#[test]
fn test_four_team_single_week_example() {
    let matrix = single_week_league();

    let beaten = teams_beaten_this_week(&matrix.week_scores(0));
    assert_eq!(beaten["A"], 3);
    assert_eq!(beaten["B"], 2);
    assert_eq!(beaten["C"], 1);
    assert_eq!(beaten["D"], 0);

    let dists = compute_record_distribution(&matrix, &LeagueConfig::new(4, 1))
        .expect("valid league");

    assert_eq!(dists["A"].records()[0], ("1-0".to_string(), 1.0));
    assert_eq!(dists["D"].records()[1], ("0-1".to_string(), 1.0));

    let b: Vec<(String, f64)> = dists["B"]
        .records()
        .into_iter()
        .map(|(label, p)| (label, round(p)))
        .collect();
    assert_eq!(b, vec![("1-0".to_string(), 0.67), ("0-1".to_string(), 0.33)]);
}

#[test]
fn test_playoff_weeks_excluded() {
    let mut rows = vec![
        ScoreRow::regular("A", 1, 100.0, Some("B")),
        ScoreRow::regular("B", 1, 90.0, Some("A")),
    ];
    for (team, score, opp) in [("A", 50.0, "B"), ("B", 150.0, "A")] {
        rows.push(ScoreRow {
            team: team.to_string(),
            week: 2,
            score,
            is_playoffs: true,
            is_consolation: false,
            opponent: Some(opp.to_string()),
        });
    }
    let matrix = ScoreMatrix::from_rows(&rows).expect("valid table");
    let dists = compute_record_distribution(&matrix, &LeagueConfig::new(2, 14))
        .expect("valid league");
    assert_eq!(dists["A"].weeks(), 1);
    assert_eq!(dists["A"].probability(1), 1.0);
}

#[test]
fn test_standings_without_opponents_fail() {
    let rows = vec![
        ScoreRow::regular("A", 1, 100.0, None),
        ScoreRow::regular("B", 1, 90.0, None),
    ];
    let matrix = ScoreMatrix::from_rows(&rows).expect("opponents are optional");
    let err = compute_simulated_standings(&matrix, &LeagueConfig::new(2, 1), 1).unwrap_err();
    assert!(matches!(err, LeagueError::UnknownOpponent { opponent: None, .. }));
}

#[test]
fn test_config_json_round_trip_into_engine() {
    let config = LeagueConfig::from_json_str(
        r#"{"num_teams": 4, "season_weeks": 1, "bye_cutoff": 1, "playoff_cutoff": 2}"#,
    )
    .expect("valid config");
    let standings =
        compute_simulated_standings(&single_week_league(), &config, 3).expect("valid league");
    assert_eq!(standings.len(), 4);
    assert_eq!(standings[0].team, "A");
}

#[test]
fn test_enumeration_rejects_odd_league() {
    let config = LeagueConfig::new(10, 13);
    assert!(matches!(
        enumerate_valid_schedules(9, 13, &config, 0, CancelToken::new()),
        Err(LeagueError::InvalidLeagueSize { teams: 9 })
    ));
}

#[test]
fn test_enumeration_twelve_team_season() {
    let config = LeagueConfig::new(12, 14);
    let validator = ScheduleValidator::from_config(&config);
    let mut schedules =
        enumerate_valid_schedules(12, 14, &config, 2024, CancelToken::new()).expect("even league");
    let first = schedules.next().expect("circle schedule is valid");
    assert!(validator.is_valid(&first));
    let meetings = first.meeting_counts();
    for a in 0..12 {
        for b in (a + 1)..12 {
            assert!((1..=2).contains(&meetings[a][b]));
        }
    }
}
