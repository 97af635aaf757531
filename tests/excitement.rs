use wp_dashboard::excitement::most_exciting_game;
use wp_dashboard::game_index::GameIndex;
use wp_dashboard::record_store::{PlayRecord, RecordStore, WinProbInput};

fn play(week: u32, game_id: &str, wp: f64) -> PlayRecord {
    PlayRecord {
        play_id: None,
        week,
        game_id: game_id.to_string(),
        home_team: "BUF".to_string(),
        away_team: "NYJ".to_string(),
        game_date: String::new(),
        home_wp: Some(WinProbInput::Number(wp)),
    }
}

fn index(plays: Vec<PlayRecord>) -> GameIndex {
    GameIndex::new(RecordStore::from_plays(plays).expect("non-empty store"))
}

#[test]
fn picks_the_most_volatile_game() {
    // G1 moves 0.5 in total, G2 moves 0.9.
    let idx = index(vec![
        play(1, "G1", 0.5),
        play(1, "G1", 0.7),
        play(1, "G1", 0.4),
        play(2, "G2", 0.5),
        play(2, "G2", 0.1),
        play(2, "G2", 0.6),
    ]);
    let ranking = most_exciting_game(&idx).expect("ranking exists");
    assert_eq!(ranking.week, 2);
    assert_eq!(ranking.game_id, "G2");
    assert!((ranking.total_excitement - 0.9).abs() < 1e-9);
}

#[test]
fn ties_go_to_the_earlier_week() {
    // Source order lists the week 5 game first; week order still wins.
    let idx = index(vec![
        play(5, "LATE", 0.25),
        play(5, "LATE", 0.75),
        play(2, "EARLY", 0.75),
        play(2, "EARLY", 0.25),
    ]);
    let ranking = most_exciting_game(&idx).expect("ranking exists");
    assert_eq!(ranking.game_id, "EARLY");
    assert_eq!(ranking.week, 2);
}

#[test]
fn ties_within_a_week_go_to_first_seen() {
    let idx = index(vec![
        play(1, "B", 0.0),
        play(1, "A", 0.0),
        play(1, "B", 0.5),
        play(1, "A", 0.5),
    ]);
    let ranking = most_exciting_game(&idx).expect("ranking exists");
    assert_eq!(ranking.game_id, "B");
}

#[test]
fn non_finite_games_never_lead() {
    let mut broken = play(1, "BROKEN", 0.0);
    broken.home_wp = Some(WinProbInput::Text("??".to_string()));
    let idx = index(vec![
        play(1, "BROKEN", 0.9),
        broken,
        play(3, "OK", 0.5),
        play(3, "OK", 0.55),
    ]);
    let ranking = most_exciting_game(&idx).expect("ranking exists");
    assert_eq!(ranking.game_id, "OK");
    assert_eq!(ranking.week, 3);
}

#[test]
fn single_play_games_still_rank() {
    let idx = index(vec![play(4, "ONLY", 0.5)]);
    let ranking = most_exciting_game(&idx).expect("ranking exists");
    assert_eq!(ranking.game_id, "ONLY");
    assert_eq!(ranking.total_excitement, 0.0);
}
