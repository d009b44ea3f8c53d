//! Whole-game walkthroughs driven through the public engine API.

use empath_ring::game::action::GameAction;
use empath_ring::game::{GameConfig, GameState, SelectionError, TokenError, ValueError};
use empath_ring::snapshot::VisibleAlignment;
use empath_ring::{Actor, Character, Game, Phase, Verdict};
use empath_ring::players::RandomSeat;

fn seated(tokens: usize, reds: &[u16], demon: u16) -> GameState {
    let mut state = GameState::new(GameConfig::default());
    state.start_setup(tokens, reds.len()).expect("valid counts");
    for id in reds {
        state.select_red_token(*id).expect("red selection");
    }
    state.select_demon(demon).expect("demon selection");
    state
}

fn shown(state: &GameState, id: u16) -> u8 {
    state.ring().get(id).expect("seated token").displayed_count
}

#[test]
fn seven_tokens_demon_executed() {
    let mut state = seated(7, &[3, 5], 5);
    assert_eq!(shown(&state, 1), 0);
    assert_eq!(shown(&state, 4), 2);
    assert_eq!(state.pending_red(), Some(3));

    state.set_red_disinformation(3, 2).unwrap();
    state.set_red_disinformation(5, 0).unwrap();
    assert_eq!(state.phase(), Phase::AwaitingPlayerExecution);

    let outcome = state.execute_token(5).unwrap();
    assert_eq!(outcome.verdict, Verdict::BlueWin);
    assert_eq!(state.phase(), Phase::GameOver);
    assert!(
        outcome
            .snapshot
            .iter()
            .all(|t| t.alignment == VisibleAlignment::Unknown)
    );
}

#[test]
fn five_tokens_red_reaches_the_threshold() {
    let mut state = seated(5, &[2, 4], 2);
    state.set_red_disinformation(2, 1).unwrap();
    state.set_red_disinformation(4, 1).unwrap();

    let outcome = state.execute_token(1).unwrap();
    assert_eq!(outcome.verdict, Verdict::None);
    state.skip_reentry().unwrap();

    let outcome = state.kill_token(3).unwrap();
    assert_eq!(outcome.verdict, Verdict::None);
    assert_eq!(state.phase(), Phase::AwaitingModeratorNeighborReentry);
    state.skip_reentry().unwrap();
    assert_eq!(state.phase(), Phase::AwaitingPlayerExecution);
    assert_eq!(state.ring().living_count(), 3);

    let outcome = state.execute_token(5).unwrap();
    assert_eq!(outcome.verdict, Verdict::RedWin);
    assert_eq!(state.ring().living_count(), 2);
    assert!(state.ring().demon().is_some_and(|t| t.alive));
}

#[test]
fn demon_outside_the_red_set_is_rejected() {
    let mut state = GameState::new(GameConfig::default());
    state.start_setup(6, 2).unwrap();
    state.select_red_token(1).unwrap();
    state.select_red_token(2).unwrap();

    assert_eq!(state.select_demon(4), Err(SelectionError::DemonNotRed(4)));
    assert_eq!(state.phase(), Phase::AssigningRoles);
    assert!(state.ring().demon().is_none());
    state.select_demon(2).unwrap();
    assert_eq!(state.phase(), Phase::AssigningInfo);
}

#[test]
fn three_token_table_neighbours() {
    let state = seated(3, &[2], 2);
    let neighbors = state.ring().nearest_living_neighbors(1).unwrap();
    assert_eq!(neighbors.left, Some(3));
    assert_eq!(neighbors.right, Some(2));
    assert_eq!(shown(&state, 1), 1);
    assert_eq!(shown(&state, 3), 1);
}

#[test]
fn rejected_calls_leave_the_session_untouched() {
    let mut state = seated(6, &[2, 5], 5);
    let before = state.snapshot(Actor::Moderator);

    assert_eq!(
        state.set_red_disinformation(2, 3),
        Err(ValueError::OutOfRange(3))
    );
    assert!(matches!(
        state.execute_token(1),
        Err(TokenError::WrongPhase { .. })
    ));
    assert!(state.start_setup(2, 2).is_err());

    assert_eq!(state.snapshot(Actor::Moderator), before);
    assert_eq!(state.phase(), Phase::AssigningInfo);
}

#[test]
fn player_view_never_reveals_roles() {
    let mut state = seated(6, &[2, 5], 5);
    state.set_red_disinformation(2, 0).unwrap();
    state.set_red_disinformation(5, 0).unwrap();
    state.execute_token(2).unwrap();

    let view = state.snapshot(Actor::Player);
    assert!(view.iter().all(|t| t.character.is_none()));
    assert!(view.iter().all(|t| t.alignment == VisibleAlignment::Unknown));
    assert!(!view[1].alive);

    let moderator = state.snapshot(Actor::Moderator);
    assert_eq!(moderator[1].alignment, VisibleAlignment::Red);
    assert_eq!(moderator[4].character, Some(Character::Demon));
}

#[test]
fn action_log_replays_to_the_same_table() {
    let config = GameConfig {
        seed: 11,
        tokens_count: 10,
        red_count: 3,
        ..GameConfig::default()
    };
    let mut game = Game::new(config.clone());
    let verdict = game.play(&RandomSeat::seeded(5), &RandomSeat::seeded(6));
    assert!(verdict.is_decided());

    let json = serde_json::to_string(game.state.action_log()).unwrap();
    let actions: Vec<GameAction> = serde_json::from_str(&json).unwrap();

    let mut replay = GameState::new(config);
    for action in actions {
        replay.step(action).expect("recorded action replays");
    }
    assert_eq!(replay.verdict(), verdict);
    assert_eq!(replay.round(), game.state.round());
    assert_eq!(
        replay.snapshot(Actor::Moderator),
        game.state.snapshot(Actor::Moderator)
    );
}

#[test]
fn night_kill_is_followed_by_a_red_refresh() {
    let mut state = seated(9, &[3, 7], 7);
    state.set_red_disinformation(3, 1).unwrap();
    state.set_red_disinformation(7, 1).unwrap();
    state.execute_token(1).unwrap();
    state.skip_reentry().unwrap();

    state.kill_token(5).unwrap();
    assert_eq!(state.phase(), Phase::AwaitingModeratorNeighborReentry);
    assert_eq!(state.pending_red(), Some(3));
    assert_eq!(state.round(), 1);

    state.set_red_disinformation(3, 2).unwrap();
    state.set_red_disinformation(7, 0).unwrap();
    assert_eq!(state.phase(), Phase::AwaitingPlayerExecution);
    assert_eq!(shown(&state, 3), 2);
    assert_eq!(shown(&state, 7), 0);
}

#[test]
fn players_learn_of_the_night_kill_once_the_refresh_is_over() {
    let mut state = seated(9, &[3, 7], 7);
    state.set_red_disinformation(3, 1).unwrap();
    state.set_red_disinformation(7, 1).unwrap();
    state.execute_token(1).unwrap();
    state.skip_reentry().unwrap();
    state.kill_token(5).unwrap();

    let row = |state: &GameState, viewer| state.snapshot(viewer)[4].clone();
    assert!(row(&state, Actor::Player).alive);
    assert!(!row(&state, Actor::Moderator).alive);
    assert!(!state.ring().get(5).unwrap().alive);
    let observation = empath_ring::observation_from_state(&state, Actor::Player);
    assert_eq!(observation.tokens.iter().filter(|t| t.alive).count(), 8);

    state.skip_reentry().unwrap();
    assert!(!row(&state, Actor::Player).alive);
    let observation = empath_ring::observation_from_state(&state, Actor::Player);
    assert_eq!(observation.tokens.iter().filter(|t| t.alive).count(), 7);
}

#[test]
fn two_token_table_is_decided_as_soon_as_roles_are_set() {
    let mut state = seated(2, &[1], 1);
    assert_eq!(state.phase(), Phase::GameOver);
    assert_eq!(state.verdict(), Verdict::RedWin);
    assert!(state.legal_actions().is_empty());
    assert!(state.execute_token(2).is_err());
}

#[test]
fn a_second_session_replays_from_its_own_log() {
    let config = GameConfig {
        seed: 23,
        tokens_count: 10,
        red_count: 3,
        random_roles: true,
        random_disinformation: true,
        ..GameConfig::default()
    };
    let moderator = RandomSeat::seeded(1);
    let player = RandomSeat::seeded(2);
    let mut game = Game::new(config.clone());
    assert!(game.play(&moderator, &player).is_decided());

    game.execute(GameAction::start_setup(10, 3)).unwrap();
    let verdict = game.play(&moderator, &player);
    assert!(verdict.is_decided());

    let mut replay = GameState::new(config);
    for action in game.state.action_log().to_vec() {
        replay.step(action).expect("recorded action replays");
    }
    assert_eq!(replay.verdict(), verdict);
    assert_eq!(
        replay.snapshot(Actor::Moderator),
        game.state.snapshot(Actor::Moderator)
    );
}
