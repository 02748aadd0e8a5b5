//! Model property tests against the public API.
//!
//! Each test states a hypothesis the closed forms must survive and the
//! observation that would falsify it.

use queuecalc::laws::{check_metrics, DEFAULT_TOLERANCE};
use queuecalc::prelude::*;

fn close(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol * b.abs().max(1.0)
}

// H0: M/M/1 textbook values are reproduced exactly
// Falsification: λ=4, μ=5 deviates from ρ=0.8, P0=0.2, L=4, Lq=3.2, W=1, Wq=0.8
#[test]
fn h0_1_mm1_reference_values() {
    let m = Mm1Params::new(4.0, 5.0).unwrap().evaluate().unwrap();
    assert!(close(m.rho, 0.8, 1e-12));
    assert!(close(m.p0, 0.2, 1e-12));
    assert!(close(m.l, 4.0, 1e-12));
    assert!(close(m.lq, 3.2, 1e-12));
    assert!(close(m.w, 1.0, 1e-12));
    assert!(close(m.wq, 0.8, 1e-12));
}

// H0: The M/M/1 distribution sums to one and satisfies L = Lq + ρ, W = Wq + 1/μ
// Falsification: any identity off by more than 1e-9
#[test]
fn h0_2_mm1_identities() {
    for (lambda, mu) in [(0.1, 1.0), (3.0, 7.0), (9.9, 10.0)] {
        let params = Mm1Params::new(lambda, mu).unwrap();
        let m = params.evaluate().unwrap();
        let total: f64 = (0..20_000).map(|n| params.state_probability(n)).sum();
        assert!(close(total, 1.0, 1e-9), "ΣPn = {total}");
        assert!(close(m.l, m.lq + m.rho, 1e-9));
        assert!(close(m.w, m.wq + 1.0 / mu, 1e-9));
        assert!(check_metrics(&m, DEFAULT_TOLERANCE).iter().all(|c| c.passed));
    }
}

// H0: Load at or above capacity is rejected, load just below is finite
// Falsification: λ = μ evaluates, or λ = μ − ε produces a non-finite metric
#[test]
fn h0_3_stability_boundary() {
    let err = Mm1Params::new(5.0, 5.0).unwrap().evaluate().unwrap_err();
    assert!(matches!(err, QueueError::UnstableSystem { .. }));

    let m = Mm1Params::new(5.0 - 1e-6, 5.0).unwrap().evaluate().unwrap();
    assert!(m.l.is_finite() && m.l > 1e5);
    assert!(m.w.is_finite());

    for params in [
        ModelParameters::from(Mg1Params::new(2.0, 2.0, None).unwrap()),
        ModelParameters::from(Md1Params::new(3.0, 2.0).unwrap()),
        ModelParameters::from(Mm2Params::new(5.0, 2.0, 3.0).unwrap()),
        ModelParameters::from(PriorityParams::two_class(2.0, 3.0, 5.0).unwrap()),
    ] {
        assert!(matches!(
            evaluate(&params),
            Err(QueueError::UnstableSystem { .. })
        ));
    }
}

// H0: M/M/1/N matches the truncated geometric reference
// Falsification: λ=4, μ=5, N=3 gives P0 ≠ 0.2/0.5904
#[test]
fn h0_4_mm1n_reference_and_conservation() {
    let params = Mm1nParams::new(4.0, 5.0, 3).unwrap();
    let m = params.evaluate().unwrap();
    assert!(close(m.p0, 0.2 / 0.5904, 1e-12));

    let total: f64 = (0..=3).map(|n| params.state_probability(n)).sum();
    assert!(close(total, 1.0, 1e-12));
    assert_eq!(params.state_probability(4), 0.0);

    let lambda_eff = m.lambda_eff.unwrap();
    assert!(lambda_eff <= m.lambda);
    assert!(check_metrics(&m, DEFAULT_TOLERANCE).iter().all(|c| c.passed));
}

// H0: A large buffer behaves like the infinite queue
// Falsification: λ_eff or L of M/M/1/200 differs from M/M/1 at ρ = 0.5
#[test]
fn h0_5_mm1n_converges_to_mm1() {
    let finite = Mm1nParams::new(1.0, 2.0, 200).unwrap().evaluate().unwrap();
    let infinite = Mm1Params::new(1.0, 2.0).unwrap().evaluate().unwrap();
    assert!(close(finite.lambda_eff.unwrap(), 1.0, 1e-12));
    assert!(close(finite.l, infinite.l, 1e-9));
    assert!(close(finite.w, infinite.w, 1e-9));
}

// H0: An overloaded finite queue still has a valid distribution
// Falsification: ρ > 1 gives probabilities outside [0, 1] or a non-unit sum
#[test]
fn h0_6_mm1n_overload_is_bounded() {
    let params = Mm1nParams::new(50.0, 1.0, 40).unwrap().with_pax(40);
    let m = params.evaluate().unwrap();
    assert!(m.rho > 1.0);
    assert!((0.0..=1.0).contains(&m.p0));
    let total: f64 = (0..=40).map(|n| params.state_probability(n)).sum();
    assert!(close(total, 1.0, 1e-9));
    let pax = m.pax.unwrap().value;
    assert!(close(pax, params.state_probability(40), 1e-12));
    assert!(m.l <= 40.0 && m.lq >= 0.0);
}

// H0: P-K with exponential variance reproduces M/M/1
// Falsification: M/G/1(σ² = 1/μ²) differs from M/M/1 in any headline metric
#[test]
fn h0_7_mg1_exponential_equals_mm1() {
    let mg1 = Mg1Params::new(3.0, 4.0, Some(1.0 / 16.0))
        .unwrap()
        .evaluate()
        .unwrap();
    let defaulted = Mg1Params::new(3.0, 4.0, None).unwrap().evaluate().unwrap();
    let mm1 = Mm1Params::new(3.0, 4.0).unwrap().evaluate().unwrap();
    for m in [&mg1, &defaulted] {
        assert!(close(m.l, mm1.l, 1e-12));
        assert!(close(m.lq, mm1.lq, 1e-12));
        assert!(close(m.w, mm1.w, 1e-12));
        assert!(close(m.wq, mm1.wq, 1e-12));
    }
}

// H0: M/D/1 is M/G/1 with zero variance, and halves the M/M/1 queue
// Falsification: Lq(M/D/1) ≠ Lq(M/G/1, σ²=0) or ≠ Lq(M/M/1)/2
#[test]
fn h0_8_md1_is_deterministic_mg1() {
    let md1 = Md1Params::new(4.0, 5.0).unwrap().evaluate().unwrap();
    let mg1 = Mg1Params::new(4.0, 5.0, Some(0.0)).unwrap().evaluate().unwrap();
    let mm1 = Mm1Params::new(4.0, 5.0).unwrap().evaluate().unwrap();
    assert_eq!(md1.model, ModelKind::Md1);
    assert!(close(md1.lq, mg1.lq, 1e-12));
    assert!(close(md1.l, mg1.l, 1e-12));
    assert!(close(md1.lq, mm1.lq / 2.0, 1e-12));
    assert!(close(md1.mean_service_time.unwrap(), 0.2, 1e-12));
}

// H0: Identical servers make both M/M/2 modes agree
// Falsification: symmetric and heterogeneous differ at μ1 = μ2
#[test]
fn h0_9_mm2_modes_agree_for_identical_servers() {
    for (lambda, mu) in [(0.5, 1.0), (3.0, 2.0), (7.5, 4.0)] {
        let exact = Mm2Params::identical(lambda, mu).unwrap();
        let symmetric = exact.clone().with_mode(Mm2Mode::Symmetric);
        let a = exact.evaluate().unwrap();
        let b = symmetric.evaluate().unwrap();
        assert!(close(a.p0, b.p0, 1e-12));
        assert!(close(a.l, b.l, 1e-12));
        assert!(close(a.lq, b.lq, 1e-12));
        assert!(close(a.w, b.w, 1e-12));
        for n in 0..6 {
            assert!(close(
                exact.state_probability(n),
                symmetric.state_probability(n),
                1e-12
            ));
        }
    }
}

// H0: Both M/M/2 distributions are proper
// Falsification: ΣPn ≠ 1 for unequal servers
#[test]
fn h0_10_mm2_distribution_sums_to_one() {
    for mode in [Mm2Mode::Heterogeneous, Mm2Mode::Symmetric] {
        let params = Mm2Params::new(2.0, 1.0, 3.0).unwrap().with_mode(mode);
        let total: f64 = (0..5_000).map(|n| params.state_probability(n)).sum();
        assert!(close(total, 1.0, 1e-9), "{mode}: ΣPn = {total}");
        let m = params.evaluate().unwrap();
        assert!(check_metrics(&m, DEFAULT_TOLERANCE).iter().all(|c| c.passed));
    }
}

// H0: An idle low-priority class leaves class 1 as a plain M/M/1
// Falsification: class 1 with λ₂ = 0 differs from M/M/1(λ₁, μ)
#[test]
fn h0_11_priority_reduces_to_mm1() {
    let m = PriorityParams::two_class(3.0, 0.0, 5.0)
        .unwrap()
        .evaluate()
        .unwrap();
    let mm1 = Mm1Params::new(3.0, 5.0).unwrap().evaluate().unwrap();
    let class1 = &m.classes[0];
    assert!(close(class1.wq, mm1.wq, 1e-12));
    assert!(close(class1.w, mm1.w, 1e-12));
    assert!(close(class1.l, mm1.l, 1e-12));
    assert!(close(m.l, mm1.l, 1e-12));
}

// H0: Priority conserves work: the aggregate queue equals M/M/1 at total load
// Falsification: Σλ_r Wq_r differs from the FCFS M/M/1 Lq
#[test]
fn h0_12_priority_conservation() {
    let params = PriorityParams::new(vec![0.5, 1.0, 1.5], 4.0).unwrap();
    let m = params.evaluate().unwrap();
    let fcfs = Mm1Params::new(3.0, 4.0).unwrap().evaluate().unwrap();
    assert_eq!(m.classes.len(), 3);
    assert!(close(m.lq, fcfs.lq, 1e-9));
    assert!(m.classes.windows(2).all(|w| w[0].wq < w[1].wq));
    assert!(check_metrics(&m, DEFAULT_TOLERANCE).iter().all(|c| c.passed));
}

// H0: Invalid inputs never reach the formulas
// Falsification: any non-positive, non-finite or fractional input is accepted
#[test]
fn h0_13_invalid_parameters_rejected() {
    assert!(Mm1Params::new(0.0, 1.0).is_err());
    assert!(Mm1Params::new(1.0, f64::NAN).is_err());
    assert!(Mm2Params::new(1.0, -1.0, 2.0).is_err());
    assert!(Mm1nParams::new(1.0, 2.0, 0).is_err());
    assert!(Mm1nParams::from_real_capacity(1.0, 2.0, 2.5).is_err());
    assert!(Mg1Params::new(1.0, 2.0, Some(-0.1)).is_err());
    assert!(PriorityParams::new(vec![], 1.0).is_err());
    assert!(PriorityParams::new(vec![0.0, 0.0], 1.0).is_err());

    let err = Mm1Params::new(-1.0, 1.0).unwrap_err();
    assert!(matches!(err, QueueError::InvalidParameter { .. }));
}
