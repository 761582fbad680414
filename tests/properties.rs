//! Property tests for the verifier: purity, monotonicity in strength and
//! invariance under row and column permutations.

use oacheck::prelude::*;
use proptest::prelude::*;

fn to_matrix(rows: &[Vec<bool>]) -> BinaryMatrix {
    BinaryMatrix::from_rows(rows).expect("strategy produces rectangular rows")
}

/// Arbitrary small rectangular matrices.
fn arb_rows() -> impl Strategy<Value = Vec<Vec<bool>>> {
    (1usize..=5, 1usize..=16).prop_flat_map(|(factors, runs)| {
        prop::collection::vec(prop::collection::vec(any::<bool>(), factors), runs)
    })
}

/// Full factorials on `factors` columns, replicated and shuffled: always
/// orthogonal of strength `factors`.
fn arb_orthogonal_rows() -> impl Strategy<Value = Vec<Vec<bool>>> {
    (1usize..=4, 1usize..=3).prop_flat_map(|(factors, replicas)| {
        let rows: Vec<Vec<bool>> = (0..replicas)
            .flat_map(|_| 0..1usize << factors)
            .map(|i| (0..factors).rev().map(|b| (i >> b) & 1 == 1).collect())
            .collect();
        Just(rows).prop_shuffle()
    })
}

fn arb_any_rows() -> impl Strategy<Value = Vec<Vec<bool>>> {
    prop_oneof![arb_rows(), arb_orthogonal_rows()]
}

fn with_strength(
    rows: impl Strategy<Value = Vec<Vec<bool>>>,
) -> impl Strategy<Value = (Vec<Vec<bool>>, u32)> {
    rows.prop_flat_map(|rows| {
        let factors = rows[0].len() as u32;
        (Just(rows), 1..=factors)
    })
}

fn with_permutation(
    rows: impl Strategy<Value = Vec<Vec<bool>>>,
    of_columns: bool,
) -> impl Strategy<Value = (Vec<Vec<bool>>, Vec<usize>)> {
    rows.prop_flat_map(move |rows| {
        let len = if of_columns { rows[0].len() } else { rows.len() };
        (Just(rows), Just((0..len).collect::<Vec<_>>()).prop_shuffle())
    })
}

proptest! {
    #[test]
    fn verification_is_idempotent((rows, t) in with_strength(arb_any_rows())) {
        let m = to_matrix(&rows);
        let first = verify_strength(&m, t).unwrap();
        let second = verify_strength(&m, t).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn strength_is_monotone((rows, t) in with_strength(arb_any_rows())) {
        let m = to_matrix(&rows);
        let verdict = verify_strength(&m, t).unwrap();
        let certified = verdict.certified_strength();
        prop_assert!(certified <= t);
        for lower in 1..=certified {
            prop_assert!(verify_strength(&m, lower).unwrap().is_orthogonal());
        }
        if certified < t {
            prop_assert!(!verify_strength(&m, certified + 1).unwrap().is_orthogonal());
        }
    }

    #[test]
    fn factorials_are_orthogonal(rows in arb_orthogonal_rows()) {
        let m = to_matrix(&rows);
        let k = m.factors() as u32;
        let verdict = verify_strength(&m, k).unwrap();
        prop_assert!(verdict.is_orthogonal());
        prop_assert_eq!(compute_strength(&m, k).unwrap(), k);
    }

    #[test]
    fn column_permutation_preserves_verdict((rows, perm) in with_permutation(arb_any_rows(), true)) {
        let m = to_matrix(&rows);
        let permuted = m.select_columns(&perm).unwrap();
        for t in 1..=m.factors() as u32 {
            let a = verify_strength(&m, t).unwrap();
            let b = verify_strength(&permuted, t).unwrap();
            prop_assert_eq!(a.is_orthogonal(), b.is_orthogonal());
            prop_assert_eq!(a.certified_strength(), b.certified_strength());
        }
    }

    #[test]
    fn row_permutation_preserves_verdict((rows, perm) in with_permutation(arb_any_rows(), false)) {
        let m = to_matrix(&rows);
        let permuted = m.select_rows(&perm).unwrap();
        for t in 1..=m.factors() as u32 {
            // Row order never affects which subset fails first either
            prop_assert_eq!(
                verify_strength(&m, t).unwrap(),
                verify_strength(&permuted, t).unwrap()
            );
        }
    }

    #[test]
    fn walsh_distance_vanishes_exactly_on_orthogonal((rows, t) in with_strength(arb_any_rows())) {
        let m = to_matrix(&rows);
        let orthogonal = verify_strength(&m, t).unwrap().is_orthogonal();
        prop_assert_eq!(walsh_distance(&m, t).unwrap() == 0, orthogonal);
    }

    #[test]
    fn delta_distance_zero_when_orthogonal((rows, t) in with_strength(arb_any_rows())) {
        let m = to_matrix(&rows);
        if verify_strength(&m, t).unwrap().is_orthogonal() {
            prop_assert_eq!(delta_distance(&m, t).unwrap(), 0.0);
        }
    }

    #[test]
    fn display_reparses(rows in arb_rows()) {
        let m = to_matrix(&rows);
        let reparsed: BinaryMatrix = m.to_string().parse().unwrap();
        prop_assert_eq!(reparsed, m);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_agrees_with_sequential((rows, t) in with_strength(arb_any_rows())) {
        let m = to_matrix(&rows);
        let seq = verify_strength(&m, t).unwrap();
        let par = par_verify_strength(&m, t).unwrap();
        prop_assert_eq!(seq.is_orthogonal(), par.is_orthogonal());
        prop_assert_eq!(seq.certified_strength(), par.certified_strength());
        if let (Some(a), Some(b)) = (seq.counterexample(), par.counterexample()) {
            prop_assert_eq!(a.weight, b.weight);
        }
    }
}

// ============ Scenarios ============

#[test]
fn scenario_full_2x2_is_oa_4_2_2_2() {
    let m: BinaryMatrix = "0 0\n0 1\n1 0\n1 1\n".parse().unwrap();
    let verdict = verify_strength(&m, 2).unwrap();
    assert_eq!(Report::new(&verdict).to_string(), "orthogonal: OA(4, 2, 2, 2)");
    assert_eq!(Report::new(&verdict).outcome().exit_code(), 0);
}

#[test]
fn scenario_flipped_cell_not_orthogonal() {
    // A single flip unbalances a column, so the weight-1 scan catches it.
    let m: BinaryMatrix = "0 0\n0 0\n1 0\n1 1\n".parse().unwrap();
    let verdict = verify_strength(&m, 2).unwrap();
    assert!(!verdict.is_orthogonal());
    assert_eq!(Report::new(&verdict).outcome(), Outcome::NotOrthogonal);

    // With both columns still balanced the 2-column subset is named.
    let m: BinaryMatrix = "0 0\n1 1\n0 0\n1 1\n".parse().unwrap();
    let verdict = verify_strength(&m, 2).unwrap();
    let cex = verdict.counterexample().unwrap();
    assert_eq!(cex.columns, vec![0, 1]);
    assert_eq!(cex.weight, 2);
    assert!(Report::new(&verdict).to_string().contains("columns [0, 1] at weight 2"));
}

#[test]
fn scenario_three_rows_indivisible() {
    let m: BinaryMatrix = "0 1\n1 0\n1 1\n".parse().unwrap();
    let verdict = verify_strength(&m, 1).unwrap();
    assert_eq!(
        verdict.counterexample().unwrap().defect,
        Defect::Indivisible { runs: 3, weight: 1 }
    );
}

#[test]
fn scenario_ragged_row_rejected() {
    let err = "0 0\n0 1\n1 0 1\n1 1\n".parse::<BinaryMatrix>().unwrap_err();
    assert!(matches!(err, Error::RaggedMatrix { row: 3, expected: 2, actual: 3, .. }));
    assert_eq!(Outcome::from_result(&Err(err)).exit_code(), 2);
}

#[test]
fn scenario_strength_above_columns_rejected() {
    let m: BinaryMatrix = "0 0 0\n0 1 1\n1 0 1\n1 1 0\n".parse().unwrap();
    assert_eq!(
        verify_strength(&m, 5),
        Err(Error::InvalidStrength {
            strength: 5,
            factors: 3
        })
    );
}

#[test]
fn infeasible_configuration_rejected_before_scanning() {
    // 4096 runs admit weights up to 12, far beyond the default ceiling
    let rows = vec![vec![false; 40]; 1 << 12];
    let m = BinaryMatrix::from_rows(&rows).unwrap();
    let err = Verifier::new().verify(&m, 20).unwrap_err();
    assert!(matches!(err, Error::InfeasibleConfiguration { factors: 40, strength: 20, .. }));
}

#[test]
fn wide_matrix_with_few_runs_is_feasible() {
    // N = 2 stops at weight 1 on divisibility, whatever t is requested
    let rows = vec![vec![false; 40], vec![true; 40]];
    let m = BinaryMatrix::from_rows(&rows).unwrap();
    let verdict = Verifier::new().verify(&m, 20).unwrap();
    let cex = verdict.counterexample().unwrap();
    assert_eq!(cex.weight, 2);
    assert_eq!(cex.defect, Defect::Indivisible { runs: 2, weight: 2 });
    assert_eq!(compute_strength(&m, 40).unwrap(), 1);
}
