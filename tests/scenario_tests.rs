use std::sync::mpsc;

use liquid_sort::{
    EnginePhase, PourOutcome, PuzzleConfig, PuzzleEngine, PuzzleError, PuzzleEvent, PuzzleState,
    SelectOutcome, Transition, TransitionOutcome,
};

fn engine_from(repr: &str, config: PuzzleConfig) -> PuzzleEngine {
    let state = PuzzleState::from_repr(repr, config.capacity).unwrap();
    PuzzleEngine::from_layout(config, state).unwrap()
}

#[test]
fn run_of_three_moves_into_empty_container() {
    // C=green, B=blue: the blue run on top of container 0 has length 3
    let mut engine = engine_from("CBBB|AAAD|CCCB|ADDD|EEEE||", PuzzleConfig::default());
    assert!(engine.can_pour(0, 5).unwrap());
    let outcome = engine.pour(0, 5).unwrap();
    assert_eq!(outcome.moved, 3);
    assert_eq!(engine.state().containers()[0].to_string(), "C");
    assert_eq!(engine.state().containers()[5].to_string(), "BBB");
}

#[test]
fn space_limited_pour_moves_one_unit() {
    let mut engine = engine_from("ABBB|CCB|AAAD|CDDD|EEEE|C|", PuzzleConfig::default());
    assert!(engine.can_pour(0, 1).unwrap());
    let outcome = engine.pour(0, 1).unwrap();
    assert_eq!(
        outcome,
        PourOutcome {
            moved: 1,
            completed_container: None,
            won: false,
        }
    );
    assert_eq!(engine.state().containers()[0].to_string(), "ABB");
    assert_eq!(engine.state().containers()[1].to_string(), "CCBB");
}

#[test]
fn win_detection() {
    let solved = PuzzleState::from_repr("AAAA||BBBB|CCCC|DDDD||EEEE", 4).unwrap();
    assert!(solved.check_win());

    let partial = PuzzleState::from_repr("AAA|A|BBBB|CCCC|DDDD||EEEE", 4).unwrap();
    assert!(!partial.check_win());

    let mixed = PuzzleState::from_repr("AAAB|BBBA|CCCC|DDDD|EEEE||", 4).unwrap();
    assert!(!mixed.check_win());
}

#[test]
fn two_color_end_to_end() {
    let config = PuzzleConfig::new(2, 2, 1).unwrap();
    let mut engine = engine_from("AB|BA|", config);

    assert!(engine.can_pour(0, 2).unwrap());
    let outcome = engine.pour(0, 2).unwrap();
    assert_eq!(outcome.moved, 1);
    assert_eq!(engine.state().containers()[0].to_string(), "A");
    assert_eq!(engine.state().containers()[2].to_string(), "B");

    // top of 1 is A, top of 2 is B
    assert!(!engine.can_pour(1, 2).unwrap());
    // matching tops, but container 1 is full
    assert!(!engine.can_pour(0, 1).unwrap());
    assert_eq!(engine.pour(0, 1).unwrap().moved, 0);

    assert!(engine.can_pour(1, 0).unwrap());
    let outcome = engine.pour(1, 0).unwrap();
    assert_eq!(outcome.completed_container, Some(0));
    assert!(!outcome.won);

    let outcome = engine.pour(1, 2).unwrap();
    assert_eq!(outcome.completed_container, Some(2));
    assert!(outcome.won);
    assert_eq!(engine.state().to_string(), "AA||BB");
}

#[test]
fn generated_two_color_puzzle_has_expected_shape() {
    let config = PuzzleConfig::new(2, 2, 1).unwrap();
    for seed in 0..50 {
        let engine = PuzzleEngine::seeded(config, seed).unwrap();
        let layout = engine.state().to_string();
        assert!(
            ["AB|BA|", "BA|AB|", "AB|AB|", "BA|BA|"].contains(&layout.as_str()),
            "unexpected layout {}",
            layout
        );
    }
}

#[test]
fn clicks_drive_a_full_game_through_transitions() {
    let config = PuzzleConfig::new(2, 2, 1).unwrap();
    let mut engine = engine_from("AB|BA|", config);
    let (tx, rx) = mpsc::channel();
    engine.subscribe(move |event| {
        let _ = tx.send(event.clone());
    });

    assert_eq!(engine.select_container(0).unwrap(), SelectOutcome::Selected(0));
    assert_eq!(
        engine.select_container(2).unwrap(),
        SelectOutcome::PourPending { from: 0, to: 2 }
    );
    assert_eq!(engine.select_container(1).unwrap(), SelectOutcome::Ignored);
    engine.complete_transition().unwrap();

    engine.select_container(1).unwrap();
    engine.select_container(0).unwrap();
    engine.complete_transition().unwrap();

    engine.select_container(1).unwrap();
    let outcome = engine.select_container(2).unwrap();
    assert_eq!(outcome, SelectOutcome::PourPending { from: 1, to: 2 });
    let outcome = engine.complete_transition().unwrap();
    assert!(matches!(
        outcome,
        Some(TransitionOutcome::Poured(PourOutcome { won: true, .. }))
    ));
    assert_eq!(
        engine.phase(),
        EnginePhase::AwaitingTransition(Transition::NewPuzzle)
    );

    let events: Vec<PuzzleEvent> = rx.try_iter().collect();
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, PuzzleEvent::ContainerCompleted(_)))
            .count(),
        2
    );
    assert_eq!(events.last(), Some(&PuzzleEvent::PuzzleWon));

    assert_eq!(
        engine.complete_transition().unwrap(),
        Some(TransitionOutcome::PuzzleStarted)
    );
    assert_eq!(rx.try_recv().unwrap(), PuzzleEvent::PuzzleStarted);
    assert!(engine.state().is_conserved(&config));
}

#[test]
fn layouts_breaking_conservation_are_refused() {
    let config = PuzzleConfig::new(2, 2, 1).unwrap();
    let state = PuzzleState::from_repr("AA|AB|", 2).unwrap();
    assert!(matches!(
        PuzzleEngine::from_layout(config, state),
        Err(PuzzleError::InvalidLayout(_))
    ));
}

#[test]
fn new_puzzle_replaces_state_wholesale() {
    let mut engine = PuzzleEngine::seeded(PuzzleConfig::default(), 99).unwrap();
    engine.select_container(0).unwrap();
    let state = engine.new_puzzle().unwrap().clone();
    assert_eq!(state.selected(), None);
    assert!(state.is_conserved(&PuzzleConfig::default()));
    assert!(!engine.is_busy());
}

#[test]
fn new_puzzle_keeps_the_configured_shape() {
    let config = PuzzleConfig::new(3, 3, 1).unwrap();
    let mut engine = PuzzleEngine::seeded(config, 5).unwrap();
    let state = engine.new_puzzle().unwrap().clone();
    assert_eq!(state.len(), config.container_count());
    assert!(state.is_conserved(&config));
    assert_eq!(*engine.config(), config);
}
