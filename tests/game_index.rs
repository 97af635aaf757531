use wp_dashboard::game_index::GameIndex;
use wp_dashboard::record_store::{PlayRecord, RecordStore, WinProbInput};

fn play(week: u32, game_id: &str, home: &str, away: &str, wp: f64) -> PlayRecord {
    PlayRecord {
        play_id: None,
        week,
        game_id: game_id.to_string(),
        home_team: home.to_string(),
        away_team: away.to_string(),
        game_date: format!("2023-09-{:02}", 3 + week * 7),
        home_wp: Some(WinProbInput::Number(wp)),
    }
}

fn interleaved_index() -> GameIndex {
    let plays = vec![
        play(1, "C", "KC", "DET", 0.5),
        play(1, "A", "NYJ", "BUF", 0.5),
        play(1, "C", "KC", "DET", 0.4),
        play(1, "B", "LAC", "MIA", 0.5),
        play(1, "A", "NYJ", "BUF", 0.6),
        play(3, "D", "BUF", "LV", 0.5),
        play(1, "B", "LAC", "MIA", 0.7),
        play(1, "A", "NYJ", "BUF", 0.3),
    ];
    GameIndex::new(RecordStore::from_plays(plays).expect("non-empty store"))
}

#[test]
fn games_for_week_dedups_in_first_seen_order() {
    let idx = interleaved_index();
    let ids = idx
        .games_for_week(1)
        .iter()
        .map(|g| g.game_id.as_str())
        .collect::<Vec<_>>();
    assert_eq!(ids, vec!["C", "A", "B"]);
    assert_eq!(idx.game_count(), 4);
}

#[test]
fn weeks_without_data_are_empty_not_errors() {
    let idx = interleaved_index();
    for week in [0, 2, 4, 21, 99] {
        assert!(idx.games_for_week(week).is_empty());
        assert!(!idx.week_has_games(week));
    }
    assert!(idx.week_has_games(3));
}

#[test]
fn plays_for_game_keeps_encounter_order() {
    let idx = interleaved_index();
    let values = idx
        .plays_for_game("A")
        .iter()
        .map(|p| p.home_win_prob())
        .collect::<Vec<_>>();
    assert_eq!(values, vec![0.5, 0.6, 0.3]);
    assert!(idx.plays_for_game("missing").is_empty());
}

#[test]
fn games_for_team_matches_home_or_away() {
    let idx = interleaved_index();
    let week1 = idx.games_for_team(1, "BUF");
    assert_eq!(week1.len(), 1);
    assert_eq!(week1[0].game_id, "A");
    assert_eq!(week1[0].home_team, "NYJ");

    let week3 = idx.games_for_team(3, "BUF");
    assert_eq!(week3.len(), 1);
    assert_eq!(week3[0].away_team, "LV");

    assert!(idx.games_for_team(2, "BUF").is_empty());
}

#[test]
fn games_iterate_weeks_ascending() {
    let idx = interleaved_index();
    let order = idx
        .games()
        .map(|g| (g.week, g.game_id.as_str()))
        .collect::<Vec<_>>();
    assert_eq!(order, vec![(1, "C"), (1, "A"), (1, "B"), (3, "D")]);
}

#[test]
fn game_fields_come_from_first_play() {
    let idx = interleaved_index();
    let game = &idx.games_for_week(3)[0];
    assert_eq!(game.game_id, "D");
    assert_eq!(game.week, 3);
    assert_eq!(game.game_date, "2023-09-24");
}
