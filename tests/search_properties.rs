//! Property tests over random reachable positions.
//!
//! Positions come from seeded random playouts, so every failure shrinks to a
//! `(seed, plies)` pair that reproduces it exactly.

use fastrand::Rng;
use proptest::prelude::*;

use knight_isolation::constants::{LOSS_SCORE, WIN_SCORE};
use knight_isolation::heuristics::{Heuristic, HeuristicKind};
use knight_isolation::isolation::{Isolation, PlayerId};
use knight_isolation::search::{AlphaBeta, Minimax};
use knight_isolation::turn::Turn;

/// Play up to `plies` random moves from the empty board, stopping early at a
/// finished game.
fn random_state(seed: u64, plies: u32) -> Isolation {
    let mut rng = Rng::with_seed(seed);
    let mut state = Isolation::new();
    for _ in 0..plies {
        if state.terminal_test() {
            break;
        }
        let actions = state.actions();
        state = state.result(actions[rng.usize(..actions.len())]).unwrap();
    }
    state
}

/// Random positions past the placement phase, where branching is small
/// enough for an unpruned reference search.
fn midgame() -> impl Strategy<Value = Isolation> {
    (any::<u64>(), 2u32..40).prop_map(|(seed, plies)| random_state(seed, plies))
}

fn player() -> impl Strategy<Value = PlayerId> {
    prop_oneof![Just(PlayerId::FIRST), Just(PlayerId::SECOND)]
}

fn heuristic() -> impl Strategy<Value = HeuristicKind> {
    prop::sample::select(HeuristicKind::ALL.to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_pruning_matches_minimax(state in midgame(), depth in 1u32..4, kind in heuristic()) {
        prop_assume!(!state.terminal_test());
        let me = state.player();
        let (turn, _rx, _stop) = Turn::channel(None);

        let mut pruned = AlphaBeta::new(me, kind);
        let got = pruned.search(&state, depth, &mut Rng::with_seed(0), &turn).unwrap();
        let mut full = Minimax::new(me, kind);
        let want = full.search(&state, depth, &turn).unwrap();

        prop_assert_eq!(got.score, want.score);
        prop_assert_eq!(got.action, want.action);
        prop_assert!(got.nodes <= want.nodes);
    }

    #[test]
    fn prop_search_is_deterministic(state in midgame(), seed in any::<u64>()) {
        prop_assume!(!state.terminal_test());
        let me = state.player();
        let (turn, _rx, _stop) = Turn::channel(None);

        let mut a = AlphaBeta::new(me, HeuristicKind::Build);
        let mut b = AlphaBeta::new(me, HeuristicKind::Build);
        let first = a.search(&state, 3, &mut Rng::with_seed(seed), &turn).unwrap();
        let second = b.search(&state, 3, &mut Rng::with_seed(seed), &turn).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_heuristics_are_pure(state in midgame(), me in player(), kind in heuristic()) {
        let before = state;
        let first = kind.score(&state, me);
        let second = kind.score(&state, me);
        prop_assert_eq!(first, second);
        prop_assert_eq!(state, before);
    }

    #[test]
    fn prop_basic_is_zero_sum(state in midgame()) {
        let first = HeuristicKind::Basic.score(&state, PlayerId::FIRST);
        let second = HeuristicKind::Basic.score(&state, PlayerId::SECOND);
        prop_assert_eq!(first, -second);
    }

    #[test]
    fn prop_terminal_values_dominate(state in midgame(), me in player(), kind in heuristic()) {
        prop_assert!(kind.score(&state, me).abs() < WIN_SCORE);
        if state.terminal_test() {
            let u = state.utility(me);
            prop_assert!(u == WIN_SCORE || u == LOSS_SCORE);
            prop_assert_eq!(u, -state.utility(me.opponent()));
        } else {
            prop_assert_eq!(state.utility(me), 0.0);
        }
    }

    #[test]
    fn prop_forced_move_is_chosen(seed in any::<u64>(), depth in 1u32..5) {
        // Walk a random game until the mover has exactly one option.
        let mut rng = Rng::with_seed(seed);
        let mut state = random_state(seed, 2);
        while !state.terminal_test() && state.actions().len() != 1 {
            let actions = state.actions();
            state = state.result(actions[rng.usize(..actions.len())]).unwrap();
        }
        if !state.terminal_test() {
            let only = state.actions()[0];
            let (turn, _rx, _stop) = Turn::channel(None);
            let mut search = AlphaBeta::new(state.player(), HeuristicKind::Basic);
            prop_assert_eq!(search.best_move(&state, depth, &mut rng, &turn).unwrap(), only);
        }
    }
}
