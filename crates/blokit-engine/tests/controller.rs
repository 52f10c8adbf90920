//! Integration tests for the computer player.
//!
//! Exercises the request/outcome protocol against the real searcher and a
//! set of misbehaving engines: illegal moves, faults, panics, missing
//! moves, and searches that ignore the stop flag.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use blokit_core::{Board, Color, Move, Variant};
use blokit_engine::{
    Book, ComputerPlayer, EngineError, FailureReason, PlayerError, PlayerState, SearchControl,
    SearchEngine, SearchLimits, SearchOutcome, SearchResult, limits_for_level,
};

fn result_with(best_move: Option<Move>) -> SearchResult {
    SearchResult {
        best_move,
        score: 0,
        nodes: 0,
        depth: 1,
    }
}

/// Answers instantly with a fixed move.
struct FixedEngine(Move);

impl SearchEngine for FixedEngine {
    fn search(
        &self,
        _: &Board,
        _: Color,
        _: &SearchLimits,
        _: &SearchControl,
    ) -> Result<SearchResult, EngineError> {
        Ok(result_with(Some(self.0.clone())))
    }
}

/// Claims there is nothing to play.
struct EmptyEngine;

impl SearchEngine for EmptyEngine {
    fn search(
        &self,
        _: &Board,
        _: Color,
        _: &SearchLimits,
        _: &SearchControl,
    ) -> Result<SearchResult, EngineError> {
        Ok(result_with(None))
    }
}

struct FaultyEngine;

impl SearchEngine for FaultyEngine {
    fn search(
        &self,
        _: &Board,
        _: Color,
        _: &SearchLimits,
        _: &SearchControl,
    ) -> Result<SearchResult, EngineError> {
        Err(EngineError::Internal("out of cheese".to_string()))
    }
}

struct PanickingEngine;

impl SearchEngine for PanickingEngine {
    fn search(
        &self,
        _: &Board,
        _: Color,
        _: &SearchLimits,
        _: &SearchControl,
    ) -> Result<SearchResult, EngineError> {
        panic!("engine exploded");
    }
}

/// Spins until told to stop, then gives up without a move.
struct PatientEngine;

impl SearchEngine for PatientEngine {
    fn search(
        &self,
        board: &Board,
        color: Color,
        _: &SearchLimits,
        control: &SearchControl,
    ) -> Result<SearchResult, EngineError> {
        while !control.is_stopped() {
            thread::sleep(Duration::from_millis(5));
        }
        Ok(result_with(board.legal_moves(color).into_iter().next()))
    }
}

/// Ignores the stop flag entirely.
struct StubbornEngine(Duration);

impl SearchEngine for StubbornEngine {
    fn search(
        &self,
        board: &Board,
        color: Color,
        _: &SearchLimits,
        _: &SearchControl,
    ) -> Result<SearchResult, EngineError> {
        thread::sleep(self.0);
        Ok(result_with(board.legal_moves(color).into_iter().next()))
    }
}

fn duo_opening() -> Board {
    Board::new(Variant::Duo)
        .make_move(Color::ALL[0], &"d10,e9,e10,e11,f10".parse().unwrap())
        .make_move(Color::ALL[1], &"i5,j4,j5,j6,k5".parse().unwrap())
}

// ── Book and search ──────────────────────────────────────────────────────────

#[test]
fn book_hit_completes_immediately() {
    let mut player = ComputerPlayer::default().with_book(Arc::new(Book::builtin()));
    let board = Board::new(Variant::Duo);
    player.request_move(&board, Color::ALL[0], 9, true).unwrap();
    match player.poll() {
        Some(SearchOutcome::Completed(Some(mv))) => assert!(board.is_legal(Color::ALL[0], &mv)),
        other => panic!("expected an immediate book move, got {other:?}"),
    }
}

#[test]
fn book_disabled_falls_back_to_search() {
    let mut player = ComputerPlayer::default().with_book(Arc::new(Book::builtin()));
    let board = Board::new(Variant::Duo);
    player.request_move(&board, Color::ALL[0], 1, false).unwrap();
    assert_eq!(player.state(), PlayerState::Searching);
    let outcome = player.wait().unwrap();
    let SearchOutcome::Completed(Some(mv)) = outcome else {
        panic!("expected a move, got {outcome:?}");
    };
    assert!(board.is_legal(Color::ALL[0], &mv));
}

#[test]
fn level_6_finishes_within_its_deadline() {
    let mut player = ComputerPlayer::default();
    let board = duo_opening();
    let color = Color::ALL[0];
    player.request_move(&board, color, 6, false).unwrap();

    let request = player.request().unwrap();
    let started = request.started;
    let deadline = request.deadline;
    assert!(deadline - started >= limits_for_level(6).budget);
    assert!(deadline - started > limits_for_level(1).budget);

    let outcome = player.wait().unwrap();
    assert!(Instant::now() <= deadline + Duration::from_millis(50));
    let SearchOutcome::Completed(Some(mv)) = outcome else {
        panic!("expected a move, got {outcome:?}");
    };
    assert!(board.is_legal(color, &mv));
    assert_eq!(player.state(), PlayerState::Idle);
}

#[test]
fn no_legal_move_completes_with_none() {
    let mut player = ComputerPlayer::new(Arc::new(EmptyEngine));
    let mut board = Board::new(Variant::Duo);
    // Play the largest pieces until the first color is stuck.
    while board.has_legal_move(Color::ALL[0]) {
        let color = board.to_play();
        match board.legal_moves(color).into_iter().max_by_key(|m| m.points().len()) {
            Some(mv) => board = board.make_move(color, &mv),
            None => board = board.with_to_play(color.next(2)),
        }
    }
    player.request_move(&board, Color::ALL[0], 1, false).unwrap();
    assert_eq!(player.wait(), Some(SearchOutcome::Completed(None)));
}

// ── Protocol ─────────────────────────────────────────────────────────────────

#[test]
fn request_while_searching_is_busy() {
    let mut player = ComputerPlayer::new(Arc::new(PatientEngine));
    let board = Board::new(Variant::Duo);
    player.request_move(&board, Color::ALL[0], 1, false).unwrap();
    assert_eq!(
        player.request_move(&board, Color::ALL[0], 1, false),
        Err(PlayerError::Busy)
    );
    assert_eq!(player.cancel(), Some(SearchOutcome::Cancelled));
}

#[test]
fn cancel_stops_a_cooperative_search() {
    let mut player = ComputerPlayer::new(Arc::new(PatientEngine));
    let board = Board::new(Variant::Duo);
    player.request_move(&board, Color::ALL[0], 9, false).unwrap();
    thread::sleep(Duration::from_millis(20));

    let start = Instant::now();
    assert_eq!(player.cancel(), Some(SearchOutcome::Cancelled));
    assert!(start.elapsed() < Duration::from_millis(400));
    assert_eq!(player.state(), PlayerState::Idle);
    assert_eq!(player.poll(), None);
}

#[test]
fn cancel_after_result_arrived_still_cancels() {
    let board = Board::new(Variant::Duo);
    let mv: Move = "e10".parse().unwrap();
    let mut player = ComputerPlayer::new(Arc::new(FixedEngine(mv.clone())));
    player.request_move(&board, Color::ALL[0], 1, false).unwrap();
    thread::sleep(Duration::from_millis(50));

    assert_eq!(player.cancel(), Some(SearchOutcome::Cancelled));
    assert_eq!(player.poll(), None);

    // The next request gets its own answer, not a leftover.
    player.request_move(&board, Color::ALL[0], 1, false).unwrap();
    assert_eq!(player.wait(), Some(SearchOutcome::Completed(Some(mv))));
}

#[test]
fn stubborn_search_is_force_cancelled_at_deadline() {
    let mut player = ComputerPlayer::new(Arc::new(StubbornEngine(Duration::from_secs(2))))
        .with_grace(Duration::from_millis(100));
    let board = Board::new(Variant::Duo);
    player.request_move(&board, Color::ALL[0], 1, false).unwrap();
    let deadline = player.deadline().unwrap();

    assert_eq!(player.wait(), Some(SearchOutcome::Cancelled));
    assert!(Instant::now() >= deadline);
    assert!(Instant::now() < deadline + Duration::from_secs(1));
    assert_eq!(player.state(), PlayerState::Idle);
}

#[test]
fn late_result_of_abandoned_search_is_dropped() {
    let mut player = ComputerPlayer::new(Arc::new(StubbornEngine(Duration::from_millis(150))))
        .with_grace(Duration::from_millis(10));
    let board = Board::new(Variant::Duo);
    player.request_move(&board, Color::ALL[0], 1, false).unwrap();
    assert_eq!(player.cancel(), Some(SearchOutcome::Cancelled));

    // The abandoned worker answers while the next search is running.
    player.request_move(&board, Color::ALL[1], 3, false).unwrap();
    let outcome = player.wait().unwrap();
    let SearchOutcome::Completed(Some(mv)) = outcome else {
        panic!("expected a move, got {outcome:?}");
    };
    assert!(board.is_legal(Color::ALL[1], &mv));
}

// ── Failures ─────────────────────────────────────────────────────────────────

#[test]
fn illegal_move_is_rejected() {
    let board = Board::new(Variant::Duo);
    let mut player = ComputerPlayer::new(Arc::new(FixedEngine("a1".parse().unwrap())));
    player.request_move(&board, Color::ALL[0], 1, false).unwrap();
    match player.wait() {
        Some(SearchOutcome::Failed(FailureReason::IllegalMove { mv, .. })) => {
            assert_eq!(mv.to_string(), "a1");
        }
        other => panic!("expected IllegalMove, got {other:?}"),
    }
}

#[test]
fn missing_move_is_a_failure() {
    let mut player = ComputerPlayer::new(Arc::new(EmptyEngine));
    player
        .request_move(&Board::new(Variant::Duo), Color::ALL[0], 1, false)
        .unwrap();
    assert!(matches!(
        player.wait(),
        Some(SearchOutcome::Failed(FailureReason::MissingMove { .. }))
    ));
}

#[test]
fn engine_error_is_a_fault() {
    let mut player = ComputerPlayer::new(Arc::new(FaultyEngine));
    player
        .request_move(&Board::new(Variant::Duo), Color::ALL[0], 1, false)
        .unwrap();
    assert_eq!(
        player.wait(),
        Some(SearchOutcome::Failed(FailureReason::EngineFault(
            EngineError::Internal("out of cheese".to_string())
        )))
    );
}

#[test]
fn engine_panic_is_a_fault_and_player_recovers() {
    let mut player = ComputerPlayer::new(Arc::new(PanickingEngine));
    let board = Board::new(Variant::Duo);
    player.request_move(&board, Color::ALL[0], 1, false).unwrap();
    match player.wait() {
        Some(SearchOutcome::Failed(FailureReason::EngineFault(EngineError::Panicked {
            message,
        }))) => assert_eq!(message, "engine exploded"),
        other => panic!("expected a panic fault, got {other:?}"),
    }
    assert_eq!(player.state(), PlayerState::Idle);
    player.request_move(&board, Color::ALL[0], 1, false).unwrap();
    assert!(player.wait().is_some());
}
