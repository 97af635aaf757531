use wp_dashboard::game_index::GameIndex;
use wp_dashboard::record_store::{PlayRecord, RecordStore, WinProbInput};
use wp_dashboard::series::{
    EmptyWeekPolicy, SeriesPoint, excitement_series, season_aggregate, season_aggregate_with,
    total_excitement, win_probability_series,
};

fn play(week: u32, game_id: &str, home: &str, away: &str, wp: f64) -> PlayRecord {
    PlayRecord {
        play_id: None,
        week,
        game_id: game_id.to_string(),
        home_team: home.to_string(),
        away_team: away.to_string(),
        game_date: "2023-09-11".to_string(),
        home_wp: Some(WinProbInput::Number(wp)),
    }
}

fn assert_points(actual: &[SeriesPoint], expected: &[(usize, f64)]) {
    assert_eq!(actual.len(), expected.len());
    for (point, (idx, value)) in actual.iter().zip(expected) {
        assert_eq!(point.index, *idx);
        assert!(
            (point.value - value).abs() < 1e-9,
            "point {idx}: {} != {value}",
            point.value
        );
    }
}

fn g1_plays() -> Vec<PlayRecord> {
    vec![
        play(1, "G1", "BUF", "NYJ", 0.5),
        play(1, "G1", "BUF", "NYJ", 0.7),
        play(1, "G1", "BUF", "NYJ", 0.4),
    ]
}

#[test]
fn single_game_series_and_total() {
    let plays = g1_plays();
    assert_points(
        &win_probability_series(&plays),
        &[(0, 0.5), (1, 0.7), (2, 0.4)],
    );
    assert_points(&excitement_series(&plays), &[(0, 0.0), (1, 0.2), (2, 0.3)]);
    assert!((total_excitement(&plays) - 0.5).abs() < 1e-9);
}

#[test]
fn empty_input_yields_empty_series() {
    let plays: Vec<PlayRecord> = Vec::new();
    assert!(win_probability_series(&plays).is_empty());
    assert!(excitement_series(&plays).is_empty());
    assert_eq!(total_excitement(&plays), 0.0);
}

#[test]
fn excitement_starts_at_zero_and_matches_length() {
    for len in 1..6 {
        let plays = (0..len)
            .map(|i| play(1, "G", "BUF", "MIA", (i as f64 * 0.37) % 1.0))
            .collect::<Vec<_>>();
        let series = excitement_series(&plays);
        assert_eq!(series.len(), plays.len());
        assert_eq!(series[0].value, 0.0);
        assert!(series.iter().all(|p| p.value >= 0.0));
    }
    let single = vec![play(1, "G", "BUF", "MIA", 0.9)];
    assert_points(&excitement_series(&single), &[(0, 0.0)]);
}

#[test]
fn win_probability_series_is_stable_and_order_preserving() {
    let plays = vec![
        play(1, "G", "BUF", "MIA", 0.3),
        play(1, "G", "BUF", "MIA", 0.1),
        play(1, "G", "BUF", "MIA", 0.8),
    ];
    let first = win_probability_series(&plays);
    let second = win_probability_series(&plays);
    assert_eq!(first, second);
    for (point, p) in first.iter().zip(&plays) {
        assert_eq!(point.value, p.home_win_prob());
    }
}

#[test]
fn series_accept_borrowed_play_lists() {
    let plays = g1_plays();
    let refs = plays.iter().collect::<Vec<_>>();
    assert_eq!(
        win_probability_series(refs.iter().copied()),
        win_probability_series(&plays)
    );
}

#[test]
fn nan_propagates_into_excitement() {
    let mut plays = g1_plays();
    plays[1].home_wp = Some(WinProbInput::Text("oops".to_string()));
    let series = excitement_series(&plays);
    assert_eq!(series[0].value, 0.0);
    assert!(series[1].value.is_nan());
    assert!(series[2].value.is_nan());
    assert!(total_excitement(&plays).is_nan());
}

#[test]
fn out_of_range_values_are_not_clamped() {
    let plays = vec![
        play(1, "G", "BUF", "MIA", -0.2),
        play(1, "G", "BUF", "MIA", 1.3),
    ];
    assert_points(&win_probability_series(&plays), &[(0, -0.2), (1, 1.3)]);
    assert_points(&excitement_series(&plays), &[(0, 0.0), (1, 1.5)]);
}

fn index(plays: Vec<PlayRecord>) -> GameIndex {
    GameIndex::new(RecordStore::from_plays(plays).expect("non-empty store"))
}

#[test]
fn season_aggregate_zero_for_bye_week() {
    let idx = index(vec![
        play(1, "G1", "BUF", "NYJ", 0.5),
        play(1, "G1", "BUF", "NYJ", 0.6),
        play(2, "G2", "KC", "DEN", 0.7),
    ]);
    let agg = season_aggregate(&idx, 1..=2, "BUF");
    assert_eq!(agg, vec![(1, 0.6), (2, 0.0)]);
}

#[test]
fn season_aggregate_uses_last_play_and_averages_games() {
    let idx = index(vec![
        play(3, "A", "BUF", "NE", 0.2),
        play(3, "B", "MIA", "BUF", 0.9),
        play(3, "A", "BUF", "NE", 0.4),
        play(3, "B", "MIA", "BUF", 0.6),
        play(3, "C", "KC", "DEN", 0.1),
    ]);
    let agg = season_aggregate(&idx, [3], "BUF");
    assert_eq!(agg.len(), 1);
    assert_eq!(agg[0].0, 3);
    assert!((agg[0].1 - 0.5).abs() < 1e-9);
}

#[test]
fn season_aggregate_gap_policy_emits_none() {
    let idx = index(vec![play(1, "G1", "BUF", "NYJ", 0.6)]);
    let agg = season_aggregate_with(&idx, 1..=3, "BUF", EmptyWeekPolicy::Gap);
    assert_eq!(agg, vec![(1, Some(0.6)), (2, None), (3, None)]);

    let zero = season_aggregate_with(&idx, 1..=2, "BUF", EmptyWeekPolicy::Zero);
    assert_eq!(zero, vec![(1, Some(0.6)), (2, Some(0.0))]);
}

#[test]
fn season_aggregate_matches_team_case_insensitively() {
    let idx = index(vec![play(1, "G1", "NYJ", "BUF", 0.3)]);
    assert_eq!(season_aggregate(&idx, [1], "buf"), vec![(1, 0.3)]);
}
