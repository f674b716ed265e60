//! Session
//!
//! Turn sequencing, engine round trips, navigation, tally and save/load
//! through the public Session API.

use std::thread;
use std::time::Duration;

use shakmaty::{Color, Square};

use sparring_engine::*;

fn sq(s: &str) -> Square {
    s.parse().unwrap()
}

fn low_config() -> SessionConfig {
    SessionConfig::new().difficulty(Difficulty::Low)
}

fn board_after(sans: &[&str]) -> ChessBoard {
    let mut board = ChessBoard::start_position();
    for san in sans {
        board.play_san(&san.parse().unwrap()).unwrap();
    }
    board
}

#[test]
fn go_to_move_zero_shows_first_move() {
    let mut session = Session::default();
    session.load_record("1. e4 e5 2. Nf3").unwrap();
    assert_eq!(session.cursor(), 2);

    session.go_to_move(0).unwrap();
    assert_eq!(session.cursor(), 0);
    assert!(session.board().same_position(&board_after(&["e4"])));
    assert_eq!(session.history().len(), 3);
}

#[test]
fn go_to_move_is_idempotent() {
    let mut session = Session::default();
    session.load_record("1. d4 Nf6 2. c4 e6 3. Nc3 Bb4").unwrap();

    session.go_to_move(3).unwrap();
    let once = session.board().clone();
    session.go_to_move(3).unwrap();

    assert!(session.board().same_position(&once));
    assert_eq!(session.cursor(), 3);
}

#[test]
fn go_to_move_out_of_range_changes_nothing() {
    let mut session = Session::default();
    session.load_record("1. e4 e5").unwrap();
    session.go_to_move(0).unwrap();

    for index in [-2, 2, 100] {
        let err = session.go_to_move(index).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NavigationOutOfRange);
        assert_eq!(session.cursor(), 0);
    }
}

#[test]
fn replay_matches_live_play() {
    let mut session = Session::default();
    let moves = [
        ("e2", "e4"),
        ("c7", "c5"),
        ("g1", "f3"),
        ("d7", "d6"),
        ("d2", "d4"),
        ("c5", "d4"),
        ("f3", "d4"),
        ("g8", "f6"),
    ];

    let mut live = Vec::new();
    for (from, to) in moves {
        session.apply_human_move(sq(from), sq(to)).unwrap();
        live.push(session.board().clone());
    }

    session.go_to_move(-1).unwrap();
    assert!(session.board().same_position(&ChessBoard::start_position()));
    for (index, expected) in live.iter().enumerate() {
        session.go_to_move(index as isize).unwrap();
        assert!(session.board().same_position(expected), "move {index}");
    }
}

#[test]
fn navigation_helpers_and_flags() {
    let mut session = Session::default();
    let nav = session.navigation();
    assert!(!nav.first && !nav.previous && !nav.next && !nav.last);

    session.load_record("1. e4 e5 2. Nf3").unwrap();
    session.go_to_start().unwrap();
    assert_eq!(session.cursor(), -1);
    assert!(!session.navigation().previous);
    assert!(session.go_to_previous().is_err());

    session.go_to_next().unwrap();
    session.go_to_next().unwrap();
    assert_eq!(session.cursor(), 1);

    session.go_to_end().unwrap();
    assert_eq!(session.cursor(), 2);
    assert!(!session.navigation().next);
    assert!(session.go_to_next().is_err());
}

#[test]
fn move_from_navigated_cursor_truncates_history() {
    let mut session = Session::default();
    session.load_record("1. e4 e5 2. Nf3 Nc6").unwrap();
    session.go_to_move(1).unwrap();

    let san = session.apply_human_move(sq("f1"), sq("c4")).unwrap();
    assert_eq!(san.to_string(), "Bc4");
    assert_eq!(session.history().len(), 3);
    assert_eq!(session.cursor(), 2);
}

#[test]
fn opening_move_then_engine_reply() {
    let mut session = Session::new(low_config());
    session.start_game(Color::White);

    session.apply_human_move(sq("e2"), sq("e4")).unwrap();
    assert!(session.is_ai_turn());
    assert!(session.trigger_ai_move_if_due());

    let reply = session.await_ai_move().unwrap();
    assert_eq!(session.history().len(), 2);
    assert_eq!(session.history()[1], reply);
    assert!(session.is_human_turn());
    assert_eq!(evaluation::material(session.board().pieces()), Cp(0));
}

#[test]
fn engine_moves_first_for_black_human() {
    let mut session = Session::new(low_config());
    session.start_game(Color::Black);

    assert!(session.trigger_ai_move_if_due());
    let reply = session.await_ai_move();
    assert!(reply.is_some());
    assert_eq!(session.board().turn(), Color::Black);
    assert!(!session.trigger_ai_move_if_due());
}

#[test]
fn one_search_in_flight() {
    let mut session = Session::new(low_config());
    session.start_game(Color::Black);

    assert!(session.trigger_ai_move_if_due());
    assert!(session.is_search_pending());
    assert!(!session.trigger_ai_move_if_due());

    let err = session.apply_human_move(sq("e7"), sq("e5")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SearchInFlight);

    session.await_ai_move().unwrap();
    assert!(!session.is_search_pending());
    assert!(session.apply_human_move(sq("e7"), sq("e5")).is_ok());
}

#[test]
fn poll_applies_finished_search() {
    let mut session = Session::new(low_config());
    session.start_game(Color::Black);
    assert!(session.trigger_ai_move_if_due());

    let mut applied = None;
    for _ in 0..500 {
        applied = session.poll_ai_move();
        if applied.is_some() {
            break;
        }
        thread::sleep(Duration::from_millis(10));
    }
    assert!(applied.is_some());
    assert_eq!(session.history().len(), 1);
    assert!(!session.is_search_pending());
}

#[test]
fn navigation_discards_pending_search() {
    let mut session = Session::new(low_config());
    session.start_game(Color::Black);
    assert!(session.trigger_ai_move_if_due());

    session.go_to_move(-1).unwrap();
    assert!(!session.is_search_pending());
    assert_eq!(session.poll_ai_move(), None);
    assert_eq!(session.await_ai_move(), None);
    assert!(session.history().is_empty());

    // Still the engine's turn at the new cursor, so it may be asked again.
    assert!(session.trigger_ai_move_if_due());
    assert!(session.await_ai_move().is_some());
}

#[test]
fn disabling_ai_discards_pending_search() {
    let mut session = Session::new(low_config());
    session.start_game(Color::Black);
    assert!(session.trigger_ai_move_if_due());

    session.set_ai_enabled(false).unwrap();
    assert_eq!(session.await_ai_move(), None);
    assert!(session.history().is_empty());
    assert_eq!(session.phase(), Phase::Idle);
    assert!(!session.trigger_ai_move_if_due());

    // With AI mode off the human moves both sides.
    assert!(session.apply_human_move(sq("e2"), sq("e4")).is_ok());
}

#[test]
fn replacing_game_stops_clock_and_search() {
    let mut session = Session::new(low_config());
    session.start_game(Color::Black);
    assert!(session.trigger_ai_move_if_due());

    session.load_record("1. e4 e5").unwrap();
    assert!(!session.is_search_pending());
    assert!(!session.clock().is_running());
    assert_eq!(session.tick(), Tick::Idle);
    assert_eq!(session.history().len(), 2);
    assert_eq!(session.await_ai_move(), None);

    session.start_game(Color::Black);
    assert!(session.trigger_ai_move_if_due());
    session.start_game(Color::White);
    assert!(session.history().is_empty());
    assert!(!session.is_search_pending());
    assert_eq!(session.poll_ai_move(), None);
    assert!(!session.trigger_ai_move_if_due());
}

#[test]
fn win_rate_without_games_is_zero() {
    let session = Session::default();
    assert_eq!(session.tally().total(), 0);
    assert_eq!(session.tally().win_rate(), 0.0);
}

#[test]
fn tally_after_loss_and_draw() {
    let config = SessionConfig::new()
        .time_budget_secs(2)
        .timeout_policy(TimeoutPolicy::HumanForfeits);
    let mut session = Session::new(config);

    // Loss on time.
    session.start_game(Color::White);
    assert_eq!(session.tick(), Tick::Remaining(1));
    assert_eq!(session.tick(), Tick::Expired);
    assert_eq!(session.phase(), Phase::Concluded);

    // Draw by repeating the start position a third time.
    session.start_game(Color::Black);
    session
        .load_record("1. Nf3 Nf6 2. Ng1 Ng8 3. Nf3 Nf6 4. Ng1")
        .unwrap();
    session.set_ai_enabled(true).unwrap();
    assert!(session.is_human_turn());
    session.apply_human_move(sq("f6"), sq("g8")).unwrap();

    assert!(session.board().is_draw());
    assert_eq!(session.phase(), Phase::Concluded);
    assert_eq!(
        *session.tally(),
        Tally {
            wins: 0,
            losses: 1,
            draws: 1
        }
    );
    assert_eq!(session.tally().win_rate(), 0.0);
}

#[test]
fn checkmate_concludes_and_counts_win() {
    let mut session = Session::new(low_config());
    session.start_game(Color::White);
    session
        .load_record("1. e4 e5 2. Qh5 Nc6 3. Bc4 Nf6")
        .unwrap();
    session.set_ai_enabled(true).unwrap();

    let san = session.apply_human_move(sq("h5"), sq("f7")).unwrap();
    assert_eq!(san.to_string(), "Qxf7#");
    assert_eq!(session.phase(), Phase::Concluded);
    assert!(!session.ai_enabled());
    assert!(!session.clock().is_running());
    assert_eq!(session.tally().wins, 1);
    assert!(!session.trigger_ai_move_if_due());
    assert_eq!(
        session.apply_human_move(sq("e8"), sq("f7")).unwrap_err().kind(),
        ErrorKind::GameOver
    );
}

#[test]
fn free_play_never_touches_tally() {
    let mut session = Session::default();
    for (from, to) in [("f2", "f3"), ("e7", "e5"), ("g2", "g4"), ("d8", "h4")] {
        session.apply_human_move(sq(from), sq(to)).unwrap();
    }
    assert!(session.board().is_checkmate());
    assert_eq!(session.tally().total(), 0);
}

#[test]
fn save_then_load_round_trip() {
    let mut session = Session::default();
    session
        .load_record("1. e4 c5 2. Nf3 d6 3. d4 cxd4 4. Nxd4 Nf6 5. Nc3 a6")
        .unwrap();
    let history = session.history().to_vec();

    assert_eq!(session.save_current_game("najdorf").unwrap(), 0);
    assert_eq!(session.save_current_game("najdorf").unwrap(), 1);
    session.start_game(Color::White);
    assert!(session.history().is_empty());

    session.load_saved_game(1).unwrap();
    assert_eq!(session.history(), history.as_slice());
    assert_eq!(session.cursor(), history.len() as isize - 1);
    assert!(!session.ai_enabled());
    assert_eq!(session.phase(), Phase::Idle);
    assert_eq!(session.saved_game_names(), vec!["najdorf", "najdorf"]);
}

#[test]
fn save_rejects_blank_name() {
    let mut session = Session::default();
    let err = session.save_current_game(" \t ").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SaveNameEmpty);
    assert!(session.saved_games().is_empty());
}

#[test]
fn bad_record_leaves_session_unchanged() {
    let mut session = Session::new(low_config());
    session.start_game(Color::White);
    session.apply_human_move(sq("d2"), sq("d4")).unwrap();

    let err = session.load_record("1. e4 e5 2. Ke3").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RecordIllegalMove);
    assert_eq!(session.history().len(), 1);
    assert!(session.ai_enabled());
    assert_eq!(session.phase(), Phase::InProgress);

    let err = session.load_saved_game(0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SavedGameNotFound);
}

#[test]
fn legal_destinations_for_highlighting() {
    let session = Session::default();
    assert_eq!(
        session.legal_destinations(sq("b1")),
        vec![sq("a3"), sq("c3")]
    );
    assert!(session.legal_destinations(sq("e4")).is_empty());
}
