//! Proof-search round trips: a claimed win, played out, must be a win.

use board::board::Board;
use board::rules::check_five;
use board::square::Square;
use board::stone::Stone;
use board::stone::Stone::*;
use hoshi::{ProofSequence, Solver, SolverLimits};

fn board(diagram: &str) -> Board {
    diagram.parse().unwrap()
}

fn solver() -> Solver {
    Solver::new(SolverLimits::default())
}

/// Replay a proof and confirm the final attacker move completes a win.
fn replay_wins(start: &Board, stone: Stone, proof: &ProofSequence) -> bool {
    let mut replay = start.clone();
    let mut last = proof.steps[0].attack;

    for step in &proof.steps {
        replay.place(step.attack, stone);
        last = step.attack;

        if let Some(defence) = step.defence {
            replay.place(defence, !stone);
        }
    }

    board::rules::check_win(&replay, last, stone)
}

#[test]
fn vcf_proofs_replay_to_a_five() {
    let positions = [
        // A straight three: the four point forces, the five follows.
        "
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . x x x . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . . . o . . . . .
        . . . . . . . o . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
        ",
        // A four-chain through two crossing shapes.
        "
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . x . . . . . . .
        . . . . . . . x . . . . . . .
        . . . . . . . x . . . . . . .
        . . . o x x x . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . o . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
        ",
    ];

    for diagram in positions {
        let b = board(diagram);
        let proof = solver().find_vcf(&b, Black).expect("VCF exists");
        assert!(replay_wins(&b, Black, &proof), "proof fails on:\n{diagram}");
    }
}

#[test]
fn no_vcf_is_claimed_without_fours() {
    let b = board(
        "
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . o . . . . . . . .
        . . . . . x x . . . . . . . .
        . . . . . . . o . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
    ",
    );

    assert!(solver().find_vcf(&b, Black).is_none());
    assert!(solver().find_vcf(&b, White).is_none());
}

#[test]
fn vct_defers_to_vcf_against_a_standing_open_three() {
    // White's open three is already on the board. Black holds only quiet
    // material, so no proof of any kind may come back.
    let b = board(
        "
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . o o o . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . x x . . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . . x . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
    ",
    );

    assert!(solver().find_vct(&b, Black).is_none());
}

#[test]
fn vct_proof_replays_to_a_win() {
    // White's crossing pairs: the double-three fork converts by force.
    let b = board(
        "
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . o . . . . . . .
        . . . . . . . o . . . . . . .
        . . . . . o o . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
    ",
    );

    let proof = solver().find_vct(&b, White).expect("VCT exists");
    assert!(replay_wins(&b, White, &proof));
}

#[test]
fn mise_vcf_rejects_defences_with_tempo() {
    // Any position where every mise defence makes its own threat must
    // come back empty under the nori filter. A sparse board trivially
    // has no mise at all; the point is that the call is safe and clean.
    let mut b = Board::new();
    b.place(Square::new(7, 7), Black);
    b.place(Square::new(8, 8), White);

    assert!(solver().find_mise_vcf(&b, Black, true).is_none());
}

#[test]
fn solver_black_proofs_respect_exact_fives() {
    // Black's "five point" on a line that would make six is not a win;
    // the solver must not claim it.
    let b = board(
        "
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
        . x x x x . x . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
    ",
    );

    // (7, 5) would make six in a row: forbidden for black and no five.
    // The genuine five point is (7, 0).
    let proof = solver().find_vcf(&b, Black).expect("VCF via the open end");
    assert_eq!(proof.first_move(), Square::new(7, 0));

    let mut replay = b.clone();
    replay.place(proof.first_move(), Black);
    assert!(check_five(&replay, proof.first_move(), Black));
}
